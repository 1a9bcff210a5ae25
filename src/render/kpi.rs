// src/render/kpi.rs
//
// National figures shown on the dashboard. These are fixed literals and are
// NOT computed from the loaded table; they do not necessarily agree with it
// (e.g. the 604 communes of the waterfall vs. the sum of `fin22`).

/// A headline card: label, value, and a short delta caption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiCard {
    pub label: &'static str,
    pub value: &'static str,
    pub delta: &'static str,
}

pub const NATIONAL_KPIS: [KpiCard; 4] = [
    KpiCard {
        label: "Total Communes (CR)",
        value: "1 256",
        delta: "",
    },
    KpiCard {
        label: "% Évolution vers P5P6",
        value: "53.9%",
        delta: "↑",
    },
    KpiCard {
        label: "Part P5P6 (2024)",
        value: "48.15%",
        delta: "↑ +23.15 pts",
    },
    KpiCard {
        label: "IPM (2024)",
        value: "0.0610",
        delta: "↓ 45.6%",
    },
];

/// Communes in P5P6 nationally, start and end snapshot.
pub const P5P6_COMMUNES_2014: f64 = 314.0;
pub const P5P6_COMMUNES_2024: f64 = 604.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Bar from zero, sets the running total.
    Absolute,
    /// Floating bar from the running total.
    Relative,
    /// Bar from zero showing the running total.
    Total,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallStep {
    pub label: &'static str,
    pub kind: StepKind,
    pub value: f64,
    pub text: String,
}

/// 314 → +290 → 604.
pub fn p5p6_waterfall() -> Vec<WaterfallStep> {
    let delta = P5P6_COMMUNES_2024 - P5P6_COMMUNES_2014;
    vec![
        WaterfallStep {
            label: "P5P6 (2014)",
            kind: StepKind::Absolute,
            value: P5P6_COMMUNES_2014,
            text: format!("{}", P5P6_COMMUNES_2014),
        },
        WaterfallStep {
            label: "Augmentation",
            kind: StepKind::Relative,
            value: delta,
            text: format!("{:+}", delta),
        },
        WaterfallStep {
            label: "P5P6 (2024)",
            kind: StepKind::Total,
            value: P5P6_COMMUNES_2024,
            text: format!("{}", P5P6_COMMUNES_2024),
        },
    ]
}

/// Running level after each step (bar top for totals, bar end for relatives).
pub fn running_levels(steps: &[WaterfallStep]) -> Vec<(f64, f64)> {
    let mut level = 0.0;
    steps
        .iter()
        .map(|s| match s.kind {
            StepKind::Absolute => {
                level = s.value;
                (0.0, level)
            }
            StepKind::Relative => {
                let start = level;
                level += s.value;
                (start, level)
            }
            StepKind::Total => (0.0, level),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waterfall_reads_314_plus_290_to_604() {
        let steps = p5p6_waterfall();
        let texts: Vec<&str> = steps.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["314", "+290", "604"]);
        assert_eq!(
            running_levels(&steps),
            vec![(0.0, 314.0), (314.0, 604.0), (0.0, 604.0)]
        );
    }

    #[test]
    fn kpi_literals_are_fixed() {
        let values: Vec<&str> = NATIONAL_KPIS.iter().map(|k| k.value).collect();
        assert_eq!(values, vec!["1 256", "53.9%", "48.15%", "0.0610"]);
        assert_eq!(NATIONAL_KPIS[2].delta, "↑ +23.15 pts");
        assert_eq!(NATIONAL_KPIS[3].delta, "↓ 45.6%");
    }
}
