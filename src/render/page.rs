// src/render/page.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use super::charts::{dumbbell_svg, grouped_bar_svg, slope_svg, waterfall_svg};
use super::kpi::{p5p6_waterfall, KpiCard, NATIONAL_KPIS};
use super::tables::RANKINGS;
use super::escape_html;
use crate::metrics::EnrichedRegion;

pub const PAGE_FILE: &str = "index.html";

/// Everything the dashboard page shows.
pub struct Page<'a> {
    pub rows: &'a [EnrichedRegion],
    pub top_n: usize,
    /// File name of the copied source CSV, relative to the page.
    pub csv_name: &'a str,
    /// File name of the Parquet export, relative to the page.
    pub parquet_name: &'a str,
    pub dashboard_url: &'a str,
    pub generated_at: DateTime<Utc>,
}

/// Render the whole dashboard as one self-contained HTML document.
pub fn render_page(page: &Page<'_>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Tableau de Suivi de la Pauvreté</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1>Tableau de Suivi de la Réduction de la Pauvreté Multidimensionnelle (2014 → 2024)</h1>
        <h3>Analyse régionale du Maroc – Données actualisées 2024</h3>
        {kpis}
        {charts}
        {rankings}
        <hr>
        {exports}
        {instructions}
        {footer}
    </div>
</body>
</html>"#,
        css = inline_css(),
        kpis = render_kpis(&NATIONAL_KPIS),
        charts = render_charts(page.rows),
        rankings = render_rankings(page.rows, page.top_n),
        exports = render_exports(page),
        instructions = render_instructions(page.csv_name),
        footer = render_footer(page),
    )
}

/// Write `html` to `<out_dir>/index.html`.
pub fn write_page(html: &str, out_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {:?}", out_dir))?;
    let path = out_dir.join(PAGE_FILE);
    fs::write(&path, html).with_context(|| format!("writing {:?}", path))?;
    info!(path = %path.display(), bytes = html.len(), "wrote dashboard page");
    Ok(path)
}

fn render_kpis(cards: &[KpiCard]) -> String {
    let mut html = String::from("<h2>KPIs Nationaux (2014 → 2024)</h2>\n<div class=\"kpis\">\n");
    for card in cards {
        html.push_str(&format!(
            r#"<div class="kpi"><div class="kpi-label">{}</div><div class="kpi-value">{}</div><div class="kpi-delta">{}</div></div>
"#,
            escape_html(card.label),
            escape_html(card.value),
            escape_html(card.delta)
        ));
    }
    html.push_str("</div>");
    html
}

fn render_charts(rows: &[EnrichedRegion]) -> String {
    format!(
        r#"<h2>Évolution Régionale</h2>
<div class="chart-box">{bars}</div>
<div class="chart-box">{dumbbell}</div>
<div class="chart-box">{slope}</div>
<h2>Augmentation de la Part P5P6 (Nationale)</h2>
<div class="chart-box">{waterfall}</div>"#,
        bars = grouped_bar_svg(rows),
        dumbbell = dumbbell_svg(rows),
        slope = slope_svg(rows),
        waterfall = waterfall_svg(&p5p6_waterfall()),
    )
}

fn render_rankings(rows: &[EnrichedRegion], n: usize) -> String {
    let mut html = String::from("<h2>Classements Régionaux</h2>\n");
    for ranking in RANKINGS {
        let table = ranking.build(rows, n);
        html.push_str(&format!(
            "<h3>{}</h3>\n{}\n",
            escape_html(&table.title),
            table.to_html()
        ));
    }
    html
}

fn render_exports(page: &Page<'_>) -> String {
    format!(
        r#"<h3>Export &amp; Partage</h3>
<ul>
    <li><a href="{csv}" download>Télécharger les données au format CSV</a></li>
    <li><a href="{parquet}" download>Télécharger le tableau enrichi (Parquet)</a></li>
    <li><a href="{url}">Lien vers le dashboard en ligne</a></li>
</ul>"#,
        csv = escape_html(page.csv_name),
        parquet = escape_html(page.parquet_name),
        url = escape_html(page.dashboard_url),
    )
}

fn render_instructions(csv_name: &str) -> String {
    format!(
        r#"<h3>Informatique</h3>
<pre><code>1. Créer un dossier `dashboard-pauvrete-maroc`
2. Copier {csv} dans ce dossier
3. Exécuter : cargo build --release
4. Lancer : RUST_LOG=info {bin}
</code></pre>"#,
        csv = escape_html(csv_name),
        bin = env!("CARGO_PKG_NAME"),
    )
}

fn render_footer(page: &Page<'_>) -> String {
    format!(
        r#"<footer>{} régions · généré le {}</footer>"#,
        page.rows.len(),
        page.generated_at.format("%Y-%m-%d %H:%M UTC")
    )
}

fn inline_css() -> &'static str {
    r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; background: #f5f7fa; color: #222; margin: 0; }
.container { max-width: 1000px; margin: 0 auto; padding: 24px; }
h1 { font-size: 24px; } h2 { margin-top: 36px; border-bottom: 1px solid #dde; padding-bottom: 4px; }
.kpis { display: grid; grid-template-columns: repeat(4, 1fr); gap: 12px; }
.kpi { background: white; border-radius: 8px; padding: 12px 16px; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
.kpi-label { font-size: 13px; color: #666; } .kpi-value { font-size: 28px; font-weight: 600; }
.kpi-delta { font-size: 13px; color: #09ab3b; min-height: 1em; }
.chart-box { background: white; border-radius: 8px; margin: 16px 0; overflow-x: auto; }
table.ranking { border-collapse: collapse; background: white; min-width: 60%; }
table.ranking th, table.ranking td { border: 1px solid #e5e7eb; padding: 6px 10px; }
table.ranking th { background: #f0f2f6; text-align: left; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
pre { background: #272822; color: #f8f8f2; padding: 12px; border-radius: 6px; }
footer { margin-top: 32px; font-size: 12px; color: #888; }
"#
}
