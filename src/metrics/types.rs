// src/metrics/types.rs

/// Header of the region identifier column in the source CSV.
pub const REGION_HEADER: &str = "Région";

/// One row of the source table, as loaded.
///
/// Counts are kept as `f64` so that an empty or malformed cell can be carried
/// as `NaN` instead of failing the whole load.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRecord {
    pub region: String,
    /// Total number of communes (denominator of every share).
    pub cr: f64,
    /// Communes that moved into P5P6.
    pub evo_to_p5p6: f64,
    /// Communes in P5P6 at the start snapshot.
    pub before: f64,
    /// Communes in P5P6 at the end snapshot.
    pub end22: f64,
    pub ipm_2014: f64,
    pub ipm_2024: f64,
    pub tp_2014: f64,
    pub tp_2024: f64,
}

/// A region row with its derived columns appended.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRegion {
    pub record: RegionRecord,
    pub pct_evolution: f64,
    pub p5p6_before_pct: f64,
    pub p5p6_end_pct: f64,
    pub delta_p5p6_pts: f64,
    pub delta_ipm_abs: f64,
    pub delta_ipm_rel_pct: f64,
    pub delta_tp_rel_pct: f64,
}

impl EnrichedRegion {
    pub fn region(&self) -> &str {
        &self.record.region
    }

    pub fn value(&self, metric: Metric) -> f64 {
        metric.value(self)
    }
}

/// Every numeric column of the enriched table, raw columns first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    Cr,
    EvoToP5p6,
    Before,
    End22,
    Ipm2014,
    Ipm2024,
    Tp2014,
    Tp2024,
    PctEvolution,
    P5p6BeforePct,
    P5p6EndPct,
    DeltaP5p6Pts,
    DeltaIpmAbs,
    DeltaIpmRelPct,
    DeltaTpRelPct,
}

impl Metric {
    pub const RAW: [Metric; 8] = [
        Metric::Cr,
        Metric::EvoToP5p6,
        Metric::Before,
        Metric::End22,
        Metric::Ipm2014,
        Metric::Ipm2024,
        Metric::Tp2014,
        Metric::Tp2024,
    ];

    pub const DERIVED: [Metric; 7] = [
        Metric::PctEvolution,
        Metric::P5p6BeforePct,
        Metric::P5p6EndPct,
        Metric::DeltaP5p6Pts,
        Metric::DeltaIpmAbs,
        Metric::DeltaIpmRelPct,
        Metric::DeltaTpRelPct,
    ];

    /// Raw columns followed by derived columns, in table order.
    pub fn all() -> impl Iterator<Item = Metric> {
        Self::RAW.into_iter().chain(Self::DERIVED)
    }

    /// Column header, as it appears in the source CSV or on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Cr => "CR",
            Metric::EvoToP5p6 => "Evo vers P5P6",
            Metric::Before => "avant",
            Metric::End22 => "fin22",
            Metric::Ipm2014 => "IPM 2014",
            Metric::Ipm2024 => "IPM 2024",
            Metric::Tp2014 => "TP 2014",
            Metric::Tp2024 => "TP 2024",
            Metric::PctEvolution => "% Évolution",
            Metric::P5p6BeforePct => "P5P6 Avant (%)",
            Metric::P5p6EndPct => "P5P6 Fin (%)",
            Metric::DeltaP5p6Pts => "Δ P5P6 (pts)",
            Metric::DeltaIpmAbs => "Δ IPM Absolu",
            Metric::DeltaIpmRelPct => "Δ IPM Relatif (%)",
            Metric::DeltaTpRelPct => "Δ TP Relatif (%)",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().find(|m| m.label() == label.trim())
    }

    pub fn is_derived(&self) -> bool {
        Self::DERIVED.contains(self)
    }

    pub fn value(&self, row: &EnrichedRegion) -> f64 {
        let r = &row.record;
        match self {
            Metric::Cr => r.cr,
            Metric::EvoToP5p6 => r.evo_to_p5p6,
            Metric::Before => r.before,
            Metric::End22 => r.end22,
            Metric::Ipm2014 => r.ipm_2014,
            Metric::Ipm2024 => r.ipm_2024,
            Metric::Tp2014 => r.tp_2014,
            Metric::Tp2024 => r.tp_2024,
            Metric::PctEvolution => row.pct_evolution,
            Metric::P5p6BeforePct => row.p5p6_before_pct,
            Metric::P5p6EndPct => row.p5p6_end_pct,
            Metric::DeltaP5p6Pts => row.delta_p5p6_pts,
            Metric::DeltaIpmAbs => row.delta_ipm_abs,
            Metric::DeltaIpmRelPct => row.delta_ipm_rel_pct,
            Metric::DeltaTpRelPct => row.delta_tp_rel_pct,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_label() {
        for m in Metric::all() {
            assert_eq!(Metric::from_label(m.label()), Some(m));
        }
        assert_eq!(Metric::from_label(" TP 2024 "), Some(Metric::Tp2024));
        assert_eq!(Metric::from_label(REGION_HEADER), None);
    }

    #[test]
    fn raw_and_derived_partition_all_metrics() {
        assert_eq!(Metric::all().count(), 15);
        assert!(Metric::RAW.iter().all(|m| !m.is_derived()));
        assert!(Metric::DERIVED.iter().all(|m| m.is_derived()));
    }
}
