// src/metrics/rank.rs

use std::cmp::Ordering;

use super::types::{EnrichedRegion, Metric};

/// The `n` rows with the greatest `key`, largest first.
///
/// The sort is stable, so equal values keep their table order. NaN ranks
/// below every number, which keeps the result at `min(n, rows.len())` rows.
pub fn top_n(rows: &[EnrichedRegion], key: Metric, n: usize) -> Vec<&EnrichedRegion> {
    let mut ranked: Vec<&EnrichedRegion> = rows.iter().collect();
    ranked.sort_by(|a, b| descending(key.value(a), key.value(b)));
    ranked.truncate(n);
    ranked
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::derive::{derive, tests::record};

    fn names<'a>(rows: &[&'a EnrichedRegion]) -> Vec<&'a str> {
        rows.iter().map(|r| r.region()).collect()
    }

    #[test]
    fn returns_largest_first() {
        let rows = derive(vec![
            record("A", 100.0, 10.0, 0.0, 0.0),
            record("B", 100.0, 70.0, 0.0, 0.0),
            record("C", 100.0, 40.0, 0.0, 0.0),
            record("D", 100.0, 90.0, 0.0, 0.0),
        ]);
        let top = top_n(&rows, Metric::PctEvolution, 3);
        assert_eq!(names(&top), vec!["D", "B", "C"]);
        assert!(top
            .windows(2)
            .all(|w| w[0].pct_evolution >= w[1].pct_evolution));
    }

    #[test]
    fn ties_keep_table_order() {
        let rows = derive(vec![
            record("first", 100.0, 50.0, 0.0, 0.0),
            record("low", 100.0, 10.0, 0.0, 0.0),
            record("second", 100.0, 50.0, 0.0, 0.0),
            record("third", 100.0, 50.0, 0.0, 0.0),
        ]);
        let top = top_n(&rows, Metric::PctEvolution, 3);
        assert_eq!(names(&top), vec!["first", "second", "third"]);
    }

    #[test]
    fn short_input_returns_everything() {
        let rows = derive(vec![
            record("A", 100.0, 10.0, 0.0, 0.0),
            record("B", 100.0, 20.0, 0.0, 0.0),
        ]);
        assert_eq!(names(&top_n(&rows, Metric::PctEvolution, 3)), vec!["B", "A"]);
        assert!(top_n(&[], Metric::Tp2024, 3).is_empty());
        assert!(top_n(&rows, Metric::Tp2024, 0).is_empty());
    }

    #[test]
    fn nan_ranks_last_and_infinity_first() {
        let rows = derive(vec![
            record("nan", 0.0, 0.0, 0.0, 0.0),
            record("mid", 100.0, 30.0, 0.0, 0.0),
            record("inf", 0.0, 5.0, 0.0, 0.0),
        ]);
        let top = top_n(&rows, Metric::PctEvolution, 3);
        assert_eq!(names(&top), vec!["inf", "mid", "nan"]);
    }

    #[test]
    fn ranks_by_raw_poverty_rate() {
        let mut a = record("A", 1.0, 0.0, 0.0, 0.0);
        a.tp_2024 = 3.5;
        let mut b = record("B", 1.0, 0.0, 0.0, 0.0);
        b.tp_2024 = 9.25;
        let rows = derive(vec![a, b]);
        assert_eq!(names(&top_n(&rows, Metric::Tp2024, 1)), vec!["B"]);
    }
}
