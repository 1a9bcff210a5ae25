// src/render/charts.rs
//
// Inline SVG generators for the four dashboard charts. Non-finite values are
// not drawn.

use super::escape_html;
use super::kpi::{running_levels, StepKind, WaterfallStep};
use crate::metrics::{EnrichedRegion, Metric};

pub const TEAL: &str = "#00BFC4";
pub const SALMON: &str = "#F8766D";
const BLUE: &str = "#636EFA";
const RED: &str = "#EF553B";
const INCREASING: &str = "#3D9970";
const DECREASING: &str = "#FF4136";
const TOTALS: &str = "#4499FF";
const CONNECTOR: &str = "rgb(30, 30, 30)";

const WIDTH: f64 = 960.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;

/// Value range of an axis; always includes zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub lo: f64,
    pub hi: f64,
}

impl AxisRange {
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (mut lo, mut hi) = (0.0f64, 0.0f64);
        for v in values.into_iter().filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if hi - lo <= f64::EPSILON {
            hi = lo + 1.0;
        }
        // headroom for value labels
        Self {
            lo: if lo < 0.0 { lo * 1.1 } else { lo },
            hi: hi * 1.1,
        }
    }

    /// Map `v` onto `[px_lo, px_hi]` (either order).
    pub fn scale(&self, v: f64, px_lo: f64, px_hi: f64) -> f64 {
        px_lo + (v - self.lo) / (self.hi - self.lo) * (px_hi - px_lo)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let step = (self.hi - self.lo) / count as f64;
        (0..=count).map(|i| self.lo + step * i as f64).collect()
    }

    fn tick_label(&self, v: f64) -> String {
        let span = self.hi - self.lo;
        if span >= 10.0 {
            format!("{:.0}", v)
        } else if span >= 1.0 {
            format!("{:.1}", v)
        } else {
            format!("{:.3}", v)
        }
    }
}

fn open_svg(height: f64, title: &str) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" class="chart" font-family="sans-serif">
<rect width="{w}" height="{h}" fill="white"/>
<text x="{tx}" y="28" font-size="17" font-weight="bold" fill="#2a3f5f">{title}</text>
"##,
        w = WIDTH,
        h = height,
        tx = MARGIN_LEFT,
        title = escape_html(title),
    )
}

fn legend(items: &[(&str, &str)], y: f64) -> String {
    let mut out = String::new();
    let mut x = WIDTH - MARGIN_RIGHT - 190.0 * items.len() as f64;
    for (label, color) in items {
        out.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="12" height="12" fill="{}"/><text x="{:.1}" y="{:.1}" font-size="12">{}</text>
"#,
            x,
            y - 10.0,
            color,
            x + 18.0,
            y,
            escape_html(label)
        ));
        x += 190.0;
    }
    out
}

/// Horizontal grid lines + y tick labels for a vertical-value chart.
fn y_grid(axis: &AxisRange, top: f64, bottom: f64) -> String {
    let mut out = String::new();
    for t in axis.ticks(5) {
        let y = axis.scale(t, bottom, top);
        out.push_str(&format!(
            r##"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#e5ecf6"/><text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end" fill="#444">{}</text>
"##,
            MARGIN_LEFT,
            WIDTH - MARGIN_RIGHT,
            MARGIN_LEFT - 8.0,
            y + 4.0,
            axis.tick_label(t),
            y = y,
        ));
    }
    out
}

/// Region names under each band, rotated -45°.
fn rotated_labels(names: &[&str], band: f64, baseline: f64) -> String {
    let mut out = String::new();
    for (i, name) in names.iter().enumerate() {
        let x = MARGIN_LEFT + band * (i as f64 + 0.5);
        let y = baseline + 14.0;
        out.push_str(&format!(
            r##"<text x="{x:.1}" y="{y:.1}" font-size="11" text-anchor="end" transform="rotate(-45 {x:.1} {y:.1})" fill="#444">{}</text>
"##,
            escape_html(name),
            x = x,
            y = y,
        ));
    }
    out
}

fn empty_note(height: f64) -> String {
    format!(
        r##"<text x="{:.1}" y="{:.1}" font-size="14" text-anchor="middle" fill="#888">Aucune donnée</text>
"##,
        WIDTH / 2.0,
        height / 2.0
    )
}

/// Grouped bars: `% Évolution` and `P5P6 Fin (%)` per region.
pub fn grouped_bar_svg(rows: &[EnrichedRegion]) -> String {
    let series = [(Metric::PctEvolution, TEAL), (Metric::P5p6EndPct, SALMON)];
    let height = 460.0;
    let bottom = height - 150.0;
    let mut svg = open_svg(height, "% Évolution vers P5P6 & Part finale en P5P6");
    svg.push_str(&legend(
        &series.map(|(m, c)| (m.label(), c)),
        MARGIN_TOP - 16.0,
    ));

    if rows.is_empty() {
        svg.push_str(&empty_note(height));
        svg.push_str("</svg>");
        return svg;
    }

    let axis = AxisRange::from_values(
        rows.iter()
            .flat_map(|r| series.iter().map(move |(m, _)| m.value(r))),
    );
    svg.push_str(&y_grid(&axis, MARGIN_TOP, bottom));

    let band = (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) / rows.len() as f64;
    let bar_w = band * 0.8 / series.len() as f64;
    let zero = axis.scale(0.0, bottom, MARGIN_TOP);

    for (i, row) in rows.iter().enumerate() {
        let x0 = MARGIN_LEFT + band * i as f64 + band * 0.1;
        for (j, (metric, color)) in series.iter().enumerate() {
            let v = metric.value(row);
            if !v.is_finite() {
                continue;
            }
            let x = x0 + bar_w * j as f64;
            let y = axis.scale(v, bottom, MARGIN_TOP);
            let (top, h) = if y < zero { (y, zero - y) } else { (zero, y - zero) };
            svg.push_str(&format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{}: {:.2}</title></rect>
<text x="{:.1}" y="{:.1}" font-size="10" text-anchor="middle">{:.1}</text>
"#,
                x,
                top,
                bar_w,
                h,
                color,
                escape_html(row.region()),
                v,
                x + bar_w / 2.0,
                top - 4.0,
                v
            ));
        }
    }

    let names: Vec<&str> = rows.iter().map(|r| r.region()).collect();
    svg.push_str(&rotated_labels(&names, band, bottom));
    svg.push_str("</svg>");
    svg
}

/// One row per region: IPM 2014 and IPM 2024 joined by a segment.
pub fn dumbbell_svg(rows: &[EnrichedRegion]) -> String {
    let row_h = 32.0;
    let left = 190.0;
    let height = MARGIN_TOP + row_h * rows.len().max(1) as f64 + 70.0;
    let bottom = height - 70.0;
    let mut svg = open_svg(height, "Évolution de l'IPM (2014 → 2024)");
    svg.push_str(&legend(
        &[(Metric::Ipm2014.label(), SALMON), (Metric::Ipm2024.label(), TEAL)],
        MARGIN_TOP - 16.0,
    ));

    if rows.is_empty() {
        svg.push_str(&empty_note(height));
        svg.push_str("</svg>");
        return svg;
    }

    let axis = AxisRange::from_values(rows.iter().flat_map(|r| [r.record.ipm_2014, r.record.ipm_2024]));
    let right = WIDTH - MARGIN_RIGHT;

    for t in axis.ticks(5) {
        let x = axis.scale(t, left, right);
        svg.push_str(&format!(
            r##"<line x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{:.1}" stroke="#e5ecf6"/><text x="{x:.1}" y="{:.1}" font-size="11" text-anchor="middle" fill="#444">{}</text>
"##,
            MARGIN_TOP,
            bottom,
            bottom + 16.0,
            axis.tick_label(t),
            x = x,
        ));
    }

    for (i, row) in rows.iter().enumerate() {
        let y = MARGIN_TOP + row_h * (i as f64 + 0.5);
        svg.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="end" fill="#444">{}</text>
"##,
            left - 10.0,
            y + 4.0,
            escape_html(row.region())
        ));

        let (a, b) = (row.record.ipm_2014, row.record.ipm_2024);
        if a.is_finite() && b.is_finite() {
            svg.push_str(&format!(
                r##"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#bbb" stroke-width="3"/>
"##,
                axis.scale(a, left, right),
                axis.scale(b, left, right),
                y = y,
            ));
        }
        for (v, color) in [(a, SALMON), (b, TEAL)] {
            if v.is_finite() {
                svg.push_str(&format!(
                    r#"<circle cx="{:.1}" cy="{:.1}" r="6" fill="{}"><title>{}: {:.4}</title></circle>
"#,
                    axis.scale(v, left, right),
                    y,
                    color,
                    escape_html(row.region()),
                    v
                ));
            }
        }
    }

    svg.push_str(&format!(
        r##"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="middle" fill="#444">Indice de pauvreté multidimensionnelle</text>
"##,
        (left + right) / 2.0,
        bottom + 40.0
    ));
    svg.push_str("</svg>");
    svg
}

/// Smooth path through `pts` (Catmull-Rom converted to cubic Béziers).
pub fn spline_path(pts: &[(f64, f64)]) -> String {
    let Some(&(x0, y0)) = pts.first() else {
        return String::new();
    };
    let mut d = format!("M{:.1},{:.1}", x0, y0);
    for i in 0..pts.len().saturating_sub(1) {
        let p0 = pts[i.saturating_sub(1)];
        let p1 = pts[i];
        let p2 = pts[i + 1];
        let p3 = pts[(i + 2).min(pts.len() - 1)];
        let c1 = (p1.0 + (p2.0 - p0.0) / 6.0, p1.1 + (p2.1 - p0.1) / 6.0);
        let c2 = (p2.0 - (p3.0 - p1.0) / 6.0, p2.1 - (p3.1 - p1.1) / 6.0);
        d.push_str(&format!(
            " C{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
            c1.0, c1.1, c2.0, c2.1, p2.0, p2.1
        ));
    }
    d
}

/// Split `values` into runs of consecutive finite points; gaps break the line.
fn finite_runs(values: &[f64]) -> Vec<Vec<(usize, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (i, &v) in values.iter().enumerate() {
        if v.is_finite() {
            current.push((i, v));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Two smoothed lines across regions: P5P6 share before and after.
pub fn slope_svg(rows: &[EnrichedRegion]) -> String {
    let series = [(Metric::P5p6BeforePct, BLUE), (Metric::P5p6EndPct, RED)];
    let height = 460.0;
    let bottom = height - 150.0;
    let mut svg = open_svg(height, "Évolution de la part des communes en P5P6");
    svg.push_str(&legend(
        &series.map(|(m, c)| (m.label(), c)),
        MARGIN_TOP - 16.0,
    ));

    if rows.is_empty() {
        svg.push_str(&empty_note(height));
        svg.push_str("</svg>");
        return svg;
    }

    let axis = AxisRange::from_values(
        rows.iter()
            .flat_map(|r| series.iter().map(move |(m, _)| m.value(r))),
    );
    svg.push_str(&y_grid(&axis, MARGIN_TOP, bottom));

    let band = (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) / rows.len() as f64;
    let x_of = |i: usize| MARGIN_LEFT + band * (i as f64 + 0.5);

    for (metric, color) in series {
        let values: Vec<f64> = rows.iter().map(|r| metric.value(r)).collect();
        for run in finite_runs(&values) {
            let pts: Vec<(f64, f64)> = run
                .iter()
                .map(|&(i, v)| (x_of(i), axis.scale(v, bottom, MARGIN_TOP)))
                .collect();
            if pts.len() > 1 {
                svg.push_str(&format!(
                    r#"<path d="{}" fill="none" stroke="{}" stroke-width="2"/>
"#,
                    spline_path(&pts),
                    color
                ));
            }
            for (&(x, y), &(_, v)) in pts.iter().zip(&run) {
                svg.push_str(&format!(
                    r#"<circle cx="{:.1}" cy="{:.1}" r="4" fill="{}"/><text x="{:.1}" y="{:.1}" font-size="10" text-anchor="middle">{:.1}</text>
"#,
                    x,
                    y,
                    color,
                    x,
                    y - 8.0,
                    v
                ));
            }
        }
    }

    let names: Vec<&str> = rows.iter().map(|r| r.region()).collect();
    svg.push_str(&rotated_labels(&names, band, bottom));
    svg.push_str("</svg>");
    svg
}

/// Waterfall of fixed national steps.
pub fn waterfall_svg(steps: &[WaterfallStep]) -> String {
    let height = 420.0;
    let bottom = height - 60.0;
    let mut svg = open_svg(height, "Augmentation de la part en P5P6 (2014 → 2024)");

    if steps.is_empty() {
        svg.push_str(&empty_note(height));
        svg.push_str("</svg>");
        return svg;
    }

    let levels = running_levels(steps);
    let axis = AxisRange::from_values(levels.iter().flat_map(|&(a, b)| [a, b]));
    svg.push_str(&y_grid(&axis, MARGIN_TOP, bottom));
    svg.push_str(&format!(
        r##"<text x="18" y="{:.1}" font-size="12" text-anchor="middle" fill="#444" transform="rotate(-90 18 {:.1})">Nombre de communes</text>
"##,
        (MARGIN_TOP + bottom) / 2.0,
        (MARGIN_TOP + bottom) / 2.0
    ));

    let band = (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) / steps.len() as f64;
    let bar_w = band * 0.6;
    let mut prev_end: Option<(f64, f64)> = None;

    for (i, (step, &(from, to))) in steps.iter().zip(&levels).enumerate() {
        let x = MARGIN_LEFT + band * i as f64 + band * 0.2;
        let (y_from, y_to) = (axis.scale(from, bottom, MARGIN_TOP), axis.scale(to, bottom, MARGIN_TOP));
        let (top, h) = (y_from.min(y_to), (y_from - y_to).abs());
        let color = match step.kind {
            StepKind::Relative if step.value < 0.0 => DECREASING,
            StepKind::Relative => INCREASING,
            StepKind::Absolute | StepKind::Total => TOTALS,
        };

        // connector at the previous running level
        if let Some((px, py)) = prev_end {
            svg.push_str(&format!(
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-dasharray="4 2"/>
"#,
                px, py, x, py, CONNECTOR
            ));
        }

        svg.push_str(&format!(
            r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>
<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="middle">{}</text>
<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="middle" fill="#444">{}</text>
"##,
            x,
            top,
            bar_w,
            h,
            color,
            x + bar_w / 2.0,
            top - 6.0,
            escape_html(&step.text),
            x + bar_w / 2.0,
            bottom + 18.0,
            escape_html(step.label)
        ));
        prev_end = Some((x + bar_w, axis.scale(to, bottom, MARGIN_TOP)));
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::derive::{derive, tests::record};
    use crate::render::kpi::p5p6_waterfall;

    fn rows() -> Vec<EnrichedRegion> {
        derive(vec![
            record("Souss-Massa", 100.0, 50.0, 20.0, 60.0),
            record("Oriental", 113.0, 61.0, 30.0, 72.0),
            record("Vide", 0.0, 1.0, 0.0, 0.0),
        ])
    }

    #[test]
    fn axis_includes_zero_and_ignores_non_finite() {
        let axis = AxisRange::from_values([5.0, f64::NAN, f64::INFINITY, 10.0]);
        assert_eq!(axis.lo, 0.0);
        assert!((axis.hi - 11.0).abs() < 1e-9);
        assert_eq!(axis.scale(0.0, 300.0, 50.0), 300.0);
        assert_eq!(axis.ticks(5).len(), 6);

        let flat = AxisRange::from_values([f64::NAN]);
        assert!(flat.hi > flat.lo);
    }

    #[test]
    fn bar_chart_draws_finite_values_only() {
        let svg = grouped_bar_svg(&rows());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        // two finite bars for each of the first two regions; "Vide" is inf/NaN
        assert_eq!(svg.matches("<rect x=").count() - 2, 4);
        assert!(svg.contains("Oriental"));
        assert!(svg.contains(TEAL) && svg.contains(SALMON));
        assert!(!svg.contains("NaN") && !svg.contains("inf"));
    }

    #[test]
    fn dumbbell_has_two_points_per_region() {
        let svg = dumbbell_svg(&rows());
        assert_eq!(svg.matches("<circle").count(), 6);
        assert!(svg.contains("Indice de pauvreté multidimensionnelle"));
    }

    #[test]
    fn slope_breaks_lines_on_gaps() {
        let svg = slope_svg(&rows());
        // one path per series over the two finite regions
        assert_eq!(svg.matches("<path").count(), 2);
        assert_eq!(svg.matches("<circle").count(), 4);
    }

    #[test]
    fn spline_passes_through_points() {
        let d = spline_path(&[(0.0, 0.0), (10.0, 5.0), (20.0, 0.0)]);
        assert!(d.starts_with("M0.0,0.0"));
        assert!(d.contains("10.0,5.0"));
        assert!(d.ends_with("20.0,0.0"));
        assert_eq!(spline_path(&[]), "");
    }

    #[test]
    fn waterfall_labels_steps() {
        let svg = waterfall_svg(&p5p6_waterfall());
        for text in ["314", "+290", "604", "Augmentation", "Nombre de communes"] {
            assert!(svg.contains(text), "missing {}", text);
        }
        assert_eq!(svg.matches("stroke-dasharray").count(), 2);
    }

    #[test]
    fn empty_table_still_renders_frames() {
        for svg in [grouped_bar_svg(&[]), dumbbell_svg(&[]), slope_svg(&[])] {
            assert!(svg.contains("Aucune donnée"));
            assert!(svg.ends_with("</svg>"));
        }
    }
}
