use anyhow::{Context, Result};
use parquet::file::reader::{FileReader, SerializedFileReader};
use povdash::{
    export::{read_enriched_parquet, PARQUET_FILE},
    metrics::{Metric, REGION_HEADER},
};
use prettytable::{format, Cell, Row, Table};
use std::{env, fs::File, path::PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

/// Print the metadata and every row of an exported enriched table.
///
/// Usage: `inspect_export [PARQUET_FILE]` (defaults to `dashboard/regions_enriched.parquet`).
fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dashboard").join(PARQUET_FILE));

    // 1) File-level metadata
    let file = File::open(&path).with_context(|| format!("opening {:?}", path))?;
    let reader = SerializedFileReader::new(file)?;
    let meta = reader.metadata();
    let file_meta = meta.file_metadata();
    println!("=== Parquet File: {} ===", path.display());
    println!(
        "Created by:           {}",
        file_meta.created_by().unwrap_or("<unknown>")
    );
    println!("Total rows:           {}", file_meta.num_rows());
    println!("Number of row groups: {}", meta.num_row_groups());
    println!(
        "File size on disk:    {} bytes",
        std::fs::metadata(&path)?.len()
    );
    println!();

    // 2) Rows, one metric per column
    let rows = read_enriched_parquet(&path)?;
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    let mut titles = vec![Cell::new(REGION_HEADER).style_spec("bFg")];
    titles.extend(Metric::all().map(|m| Cell::new(m.label()).style_spec("bFg")));
    table.set_titles(Row::new(titles));

    for row in &rows {
        let mut cells = vec![Cell::new(row.region())];
        cells.extend(
            Metric::all().map(|m| Cell::new(&format!("{:.4}", m.value(row))).style_spec("r")),
        );
        table.add_row(Row::new(cells));
    }

    println!("=== Enriched table ({} regions) ===", rows.len());
    table.printstd();
    Ok(())
}
