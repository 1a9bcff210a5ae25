// src/metrics/derive.rs

use super::types::{EnrichedRegion, RegionRecord};

/// Append the seven derived columns to every row, preserving row order.
///
/// Ratios are not guarded: a zero `cr`, `ipm_2014` or `tp_2014` yields an
/// infinite or NaN value which is carried through to the display as-is.
pub fn derive(rows: Vec<RegionRecord>) -> Vec<EnrichedRegion> {
    rows.into_iter().map(derive_one).collect()
}

pub fn derive_one(record: RegionRecord) -> EnrichedRegion {
    let pct_evolution = record.evo_to_p5p6 / record.cr * 100.0;
    let p5p6_before_pct = record.before / record.cr * 100.0;
    let p5p6_end_pct = record.end22 / record.cr * 100.0;
    let delta_ipm_abs = record.ipm_2014 - record.ipm_2024;

    EnrichedRegion {
        pct_evolution,
        p5p6_before_pct,
        p5p6_end_pct,
        delta_p5p6_pts: p5p6_end_pct - p5p6_before_pct,
        delta_ipm_abs,
        delta_ipm_rel_pct: delta_ipm_abs / record.ipm_2014 * 100.0,
        delta_tp_rel_pct: (record.tp_2014 - record.tp_2024) / record.tp_2014 * 100.0,
        record,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(region: &str, cr: f64, evo: f64, before: f64, end22: f64) -> RegionRecord {
        RegionRecord {
            region: region.to_string(),
            cr,
            evo_to_p5p6: evo,
            before,
            end22,
            ipm_2014: 0.10,
            ipm_2024: 0.05,
            tp_2014: 20.0,
            tp_2024: 10.0,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn souss_massa_example() {
        let row = derive_one(record("Souss-Massa", 100.0, 50.0, 20.0, 60.0));

        assert!(close(row.pct_evolution, 50.0));
        assert!(close(row.p5p6_before_pct, 20.0));
        assert!(close(row.p5p6_end_pct, 60.0));
        assert!(close(row.delta_p5p6_pts, 40.0));
        assert!(close(row.delta_ipm_abs, 0.05));
        assert!(close(row.delta_ipm_rel_pct, 50.0));
        assert!(close(row.delta_tp_rel_pct, 50.0));
        assert_eq!(row.region(), "Souss-Massa");
    }

    #[test]
    fn delta_points_is_exact_difference_of_shares() {
        let rows = derive(vec![
            record("A", 137.0, 12.0, 31.0, 77.0),
            record("B", 3.0, 1.0, 1.0, 2.0),
            record("C", 1021.0, 404.0, 211.0, 599.0),
        ]);
        for r in &rows {
            assert_eq!(r.p5p6_end_pct - r.p5p6_before_pct, r.delta_p5p6_pts);
        }
    }

    #[test]
    fn evolution_share_is_bounded_when_count_fits() {
        for (cr, evo) in [(1.0, 0.0), (1.0, 1.0), (97.0, 13.0), (250.0, 250.0)] {
            let r = derive_one(record("X", cr, evo, 0.0, 0.0));
            assert!((0.0..=100.0).contains(&r.pct_evolution), "{}", r.pct_evolution);
        }
    }

    #[test]
    fn zero_commune_count_does_not_panic() {
        let r = derive_one(record("Vide", 0.0, 5.0, 0.0, 0.0));
        assert!(r.pct_evolution.is_infinite());
        // 0 / 0
        assert!(r.p5p6_before_pct.is_nan());
        assert!(r.delta_p5p6_pts.is_nan());
    }

    #[test]
    fn zero_baselines_propagate_non_finite_ratios() {
        let mut rec = record("Z", 10.0, 1.0, 1.0, 1.0);
        rec.ipm_2014 = 0.0;
        rec.tp_2014 = 0.0;
        let r = derive_one(rec);
        assert!(!r.delta_ipm_rel_pct.is_finite());
        assert!(!r.delta_tp_rel_pct.is_finite());
    }

    #[test]
    fn order_is_preserved() {
        let rows = derive(vec![
            record("Oriental", 10.0, 9.0, 0.0, 0.0),
            record("Drâa-Tafilalet", 10.0, 1.0, 0.0, 0.0),
            record("Fès-Meknès", 10.0, 5.0, 0.0, 0.0),
        ]);
        let names: Vec<&str> = rows.iter().map(|r| r.region()).collect();
        assert_eq!(names, vec!["Oriental", "Drâa-Tafilalet", "Fès-Meknès"]);
    }
}
