// src/export/mod.rs

use anyhow::{anyhow, Context, Result};
use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{fs, fs::File, path::Path, sync::Arc};
use tracing::info;

use crate::metrics::{EnrichedRegion, Metric, RegionRecord, REGION_HEADER};

pub const PARQUET_FILE: &str = "regions_enriched.parquet";

/// Copy the source CSV into `out_dir` unchanged; returns the copied file name.
pub fn copy_source_csv(src: &Path, out_dir: &Path) -> Result<String> {
    let name = src
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("source CSV path has no file name: {:?}", src))?
        .to_string();
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {:?}", out_dir))?;
    let dest = out_dir.join(&name);
    // copying a file onto itself would truncate it
    let same_file = dest.exists() && fs::canonicalize(src).ok() == fs::canonicalize(&dest).ok();
    if !same_file {
        fs::copy(src, &dest).with_context(|| format!("copying {:?} -> {:?}", src, dest))?;
    }
    info!(dest = %dest.display(), "copied source CSV");
    Ok(name)
}

/// `Région` as Utf8, then one non-null Float64 column per metric (NaN kept).
pub fn enriched_schema() -> Schema {
    let mut fields = vec![Field::new(REGION_HEADER, DataType::Utf8, false)];
    fields.extend(Metric::all().map(|m| Field::new(m.label(), DataType::Float64, false)));
    Schema::new(fields)
}

/// Write the enriched table as a single-row-group Parquet file.
pub fn write_enriched_parquet(rows: &[EnrichedRegion], path: &Path) -> Result<()> {
    let schema = Arc::new(enriched_schema());

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    columns.push(Arc::new(StringArray::from_iter_values(
        rows.iter().map(|r| r.region()),
    )));
    for metric in Metric::all() {
        columns.push(Arc::new(Float64Array::from_iter_values(
            rows.iter().map(|r| metric.value(r)),
        )));
    }

    let batch = RecordBatch::try_new(Arc::clone(&schema), columns)
        .context("building enriched record batch")?;
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))
        .context("creating Arrow writer for enriched table")?;
    writer.write(&batch).context("writing enriched batch")?;
    writer.close().context("closing enriched writer")?;

    info!(path = %path.display(), rows = rows.len(), "wrote enriched parquet");
    Ok(())
}

fn float_column<'a>(batch: &'a RecordBatch, metric: Metric) -> Result<&'a Float64Array> {
    batch
        .column_by_name(metric.label())
        .ok_or_else(|| anyhow!("missing column `{}`", metric))?
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| anyhow!("column `{}` is not Float64", metric))
}

/// Read a file written by [`write_enriched_parquet`] back into rows.
///
/// Derived columns are taken from the file, not recomputed.
pub fn read_enriched_parquet(path: &Path) -> Result<Vec<EnrichedRegion>> {
    let file = File::open(path).with_context(|| format!("opening {:?}", path))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("reading parquet metadata of {:?}", path))?
        .build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch.context("reading record batch")?;
        let regions = batch
            .column_by_name(REGION_HEADER)
            .and_then(|c| c.as_any().downcast_ref::<StringArray>())
            .ok_or_else(|| anyhow!("missing Utf8 column `{}`", REGION_HEADER))?;
        let col = |m: Metric| float_column(&batch, m);

        let (cr, evo, before, end22) = (
            col(Metric::Cr)?,
            col(Metric::EvoToP5p6)?,
            col(Metric::Before)?,
            col(Metric::End22)?,
        );
        let (ipm14, ipm24, tp14, tp24) = (
            col(Metric::Ipm2014)?,
            col(Metric::Ipm2024)?,
            col(Metric::Tp2014)?,
            col(Metric::Tp2024)?,
        );
        let (pct, before_pct, end_pct, d_pts, d_ipm, d_ipm_rel, d_tp_rel) = (
            col(Metric::PctEvolution)?,
            col(Metric::P5p6BeforePct)?,
            col(Metric::P5p6EndPct)?,
            col(Metric::DeltaP5p6Pts)?,
            col(Metric::DeltaIpmAbs)?,
            col(Metric::DeltaIpmRelPct)?,
            col(Metric::DeltaTpRelPct)?,
        );

        for i in 0..batch.num_rows() {
            if regions.is_null(i) {
                continue;
            }
            rows.push(EnrichedRegion {
                record: RegionRecord {
                    region: regions.value(i).to_string(),
                    cr: cr.value(i),
                    evo_to_p5p6: evo.value(i),
                    before: before.value(i),
                    end22: end22.value(i),
                    ipm_2014: ipm14.value(i),
                    ipm_2024: ipm24.value(i),
                    tp_2014: tp14.value(i),
                    tp_2024: tp24.value(i),
                },
                pct_evolution: pct.value(i),
                p5p6_before_pct: before_pct.value(i),
                p5p6_end_pct: end_pct.value(i),
                delta_p5p6_pts: d_pts.value(i),
                delta_ipm_abs: d_ipm.value(i),
                delta_ipm_rel_pct: d_ipm_rel.value(i),
                delta_tp_rel_pct: d_tp_rel.value(i),
            });
        }
    }
    Ok(rows)
}
