use anyhow::Result;
use chrono::Utc;
use povdash::{
    config::Config,
    export::{copy_source_csv, write_enriched_parquet, PARQUET_FILE},
    load,
    render::{render_page, write_page, Page, RANKINGS},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr) // stdout is for the tables
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let config = Config::load()?;
    info!(
        csv = %config.csv_path.display(),
        out = %config.out_dir.display(),
        top_n = config.top_n,
        "configured"
    );

    // ─── 3) load + derive (memoized) ─────────────────────────────────
    let table = load::shared(&config.csv_path).get_or_load()?;
    info!(regions = table.len(), "enriched table ready");

    // ─── 4) exports ──────────────────────────────────────────────────
    let csv_name = copy_source_csv(&config.csv_path, &config.out_dir)?;
    write_enriched_parquet(&table, &config.out_dir.join(PARQUET_FILE))?;

    // ─── 5) dashboard page ───────────────────────────────────────────
    let page = Page {
        rows: &table,
        top_n: config.top_n,
        csv_name: &csv_name,
        parquet_name: PARQUET_FILE,
        dashboard_url: &config.dashboard_url,
        generated_at: Utc::now(),
    };
    let path = write_page(&render_page(&page), &config.out_dir)?;

    // ─── 6) rankings on the terminal ─────────────────────────────────
    for ranking in RANKINGS {
        let rendered = ranking.build(&table, config.top_n);
        println!("\n--- {} ---", rendered.title);
        rendered.to_prettytable().printstd();
    }

    info!(page = %path.display(), "all done");
    Ok(())
}
