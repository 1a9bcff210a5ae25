// src/render/tables.rs

use prettytable::{format, Cell, Row, Table};

use super::escape_html;
use crate::metrics::{top_n, EnrichedRegion, Metric, REGION_HEADER};

/// How a numeric cell is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormat {
    /// `53.9%`
    Percent1,
    /// `10.21%`
    Percent2,
    /// `40.0 pts`
    Points1,
    /// Six decimals, no unit.
    Plain,
}

impl CellFormat {
    pub fn apply(self, v: f64) -> String {
        match self {
            CellFormat::Percent1 => format!("{:.1}%", v),
            CellFormat::Percent2 => format!("{:.2}%", v),
            CellFormat::Points1 => format!("{:.1} pts", v),
            CellFormat::Plain => format!("{:.6}", v),
        }
    }
}

/// A top-N table: which metric ranks the rows and which columns are shown.
#[derive(Debug, Clone, Copy)]
pub struct RankingTable {
    pub title: &'static str,
    pub key: Metric,
    pub columns: &'static [(Metric, CellFormat)],
}

pub const TOP_EVOLUTION: RankingTable = RankingTable {
    title: "Meilleurs performeurs (Évolution)",
    key: Metric::PctEvolution,
    columns: &[
        (Metric::PctEvolution, CellFormat::Percent1),
        (Metric::DeltaP5p6Pts, CellFormat::Plain),
        (Metric::DeltaIpmRelPct, CellFormat::Percent1),
        (Metric::Tp2024, CellFormat::Percent2),
    ],
};

pub const HIGHEST_POVERTY_RATE: RankingTable = RankingTable {
    title: "Régions avec TP le plus élevé (2024)",
    key: Metric::Tp2024,
    columns: &[
        (Metric::Tp2024, CellFormat::Percent2),
        (Metric::PctEvolution, CellFormat::Percent1),
        (Metric::DeltaP5p6Pts, CellFormat::Points1),
    ],
};

pub const RANKINGS: [RankingTable; 2] = [TOP_EVOLUTION, HIGHEST_POVERTY_RATE];

/// A ranking table with every cell already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RankingTable {
    pub fn build(&self, rows: &[EnrichedRegion], n: usize) -> RenderedTable {
        let headers = std::iter::once(REGION_HEADER.to_string())
            .chain(self.columns.iter().map(|(m, _)| m.label().to_string()))
            .collect();

        let rows = top_n(rows, self.key, n)
            .into_iter()
            .map(|r| {
                std::iter::once(r.region().to_string())
                    .chain(self.columns.iter().map(|(m, f)| f.apply(m.value(r))))
                    .collect()
            })
            .collect();

        RenderedTable {
            title: self.title.to_string(),
            headers,
            rows,
        }
    }
}

impl RenderedTable {
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table class=\"ranking\">\n<thead><tr>");
        for h in &self.headers {
            html.push_str(&format!("<th>{}</th>", escape_html(h)));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for row in &self.rows {
            html.push_str("<tr>");
            for (i, cell) in row.iter().enumerate() {
                let class = if i == 0 { "label" } else { "num" };
                html.push_str(&format!("<td class=\"{}\">{}</td>", class, escape_html(cell)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>");
        html
    }

    /// Box-drawn terminal table; numeric columns right aligned.
    pub fn to_prettytable(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(Row::new(
            self.headers
                .iter()
                .map(|h| Cell::new(h).style_spec("bFg"))
                .collect(),
        ));
        for row in &self.rows {
            table.add_row(Row::new(
                row.iter()
                    .enumerate()
                    .map(|(i, c)| {
                        if i == 0 {
                            Cell::new(c)
                        } else {
                            Cell::new(c).style_spec("r")
                        }
                    })
                    .collect(),
            ));
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::derive::{derive, tests::record};

    fn sample() -> Vec<EnrichedRegion> {
        let mut a = record("Souss-Massa", 100.0, 50.0, 20.0, 60.0);
        a.tp_2024 = 10.0;
        let mut b = record("Oriental", 200.0, 20.0, 10.0, 30.0);
        b.tp_2024 = 5.314;
        let mut c = record("Béni Mellal-Khénifra", 50.0, 45.0, 5.0, 40.0);
        c.tp_2024 = 12.5;
        let mut d = record("Rabat-Salé-Kénitra", 80.0, 8.0, 8.0, 8.0);
        d.tp_2024 = 1.0;
        derive(vec![a, b, c, d])
    }

    #[test]
    fn formats_cells() {
        assert_eq!(CellFormat::Percent1.apply(53.94), "53.9%");
        assert_eq!(CellFormat::Percent2.apply(10.0), "10.00%");
        assert_eq!(CellFormat::Points1.apply(40.0), "40.0 pts");
        assert_eq!(CellFormat::Plain.apply(40.0), "40.000000");
        assert_eq!(CellFormat::Percent1.apply(f64::INFINITY), "inf%");
    }

    #[test]
    fn top_evolution_table() {
        let t = TOP_EVOLUTION.build(&sample(), 3);
        assert_eq!(
            t.headers,
            vec!["Région", "% Évolution", "Δ P5P6 (pts)", "Δ IPM Relatif (%)", "TP 2024"]
        );
        assert_eq!(t.rows.len(), 3);
        assert_eq!(
            t.rows[0],
            vec!["Béni Mellal-Khénifra", "90.0%", "70.000000", "50.0%", "12.50%"]
        );
        assert_eq!(t.rows[1][0], "Souss-Massa");
        assert_eq!(t.rows[2][0], "Oriental");
    }

    #[test]
    fn highest_poverty_rate_table() {
        let t = HIGHEST_POVERTY_RATE.build(&sample(), 3);
        let regions: Vec<&str> = t.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(regions, vec!["Béni Mellal-Khénifra", "Souss-Massa", "Oriental"]);
        assert_eq!(t.rows[2], vec!["Oriental", "5.31%", "10.0%", "10.0 pts"]);
    }

    #[test]
    fn html_escapes_cells() {
        let t = RenderedTable {
            title: "t".into(),
            headers: vec!["Région".into()],
            rows: vec![vec!["<Tanger & Tétouan>".into()]],
        };
        let html = t.to_html();
        assert!(html.contains("&lt;Tanger &amp; Tétouan&gt;"));
        assert!(!html.contains("<Tanger"));
    }

    #[test]
    fn terminal_table_has_one_line_per_row() {
        let t = TOP_EVOLUTION.build(&sample(), 2).to_prettytable();
        assert_eq!(t.len(), 2);
        let text = t.to_string();
        assert!(text.contains("Souss-Massa"));
        assert!(text.contains("% Évolution"));
    }
}
