// src/load/mod.rs
use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::{collections::HashMap, fs, path::Path};
use tracing::{debug, info, warn};

use crate::metrics::{Metric, RegionRecord, REGION_HEADER};

pub mod cache;
pub mod utils;

pub use cache::{shared, TableCache};

use utils::{clean_str, decode_text, parse_decimal};

/// Field delimiter of the source table.
pub const DELIMITER: u8 = b';';

/// Read the regional table at `path`.
///
/// The file may be UTF-8 or Latin-1. Rows whose region cell is empty are
/// dropped (this removes a trailing "grand total" row).
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_regions<P: AsRef<Path>>(path: P) -> Result<Vec<RegionRecord>> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read regions CSV: {:?}", path))?;
    let text = decode_text(&bytes);
    let rows = parse_regions(&text).with_context(|| format!("Failed to parse {:?}", path))?;
    info!(rows = rows.len(), "loaded regions");
    Ok(rows)
}

/// Column positions of the fields we read, resolved from the header row.
struct HeaderMap {
    region: usize,
    numeric: Vec<(Metric, usize)>,
}

impl HeaderMap {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let names: Vec<String> = headers.iter().map(clean_str).collect();

        // first occurrence of each column wins
        let mut region = None;
        let mut positions: HashMap<Metric, usize> = HashMap::new();
        for (i, name) in names.iter().enumerate() {
            if name == REGION_HEADER {
                region.get_or_insert(i);
                continue;
            }
            match Metric::from_label(name) {
                Some(m) if m.is_derived() => {
                    debug!(column = %m, "ignoring derived column in source table")
                }
                Some(m) => {
                    positions.entry(m).or_insert(i);
                }
                None => {}
            }
        }

        let Some(region) = region else {
            bail!("missing column `{}` (found: {:?})", REGION_HEADER, names);
        };
        let mut numeric = Vec::with_capacity(Metric::RAW.len());
        for metric in Metric::RAW {
            match positions.get(&metric) {
                Some(&i) => numeric.push((metric, i)),
                None => bail!("missing column `{}` (found: {:?})", metric.label(), names),
            }
        }
        Ok(Self { region, numeric })
    }
}

/// Parse already-decoded CSV text into region records, in file order.
pub fn parse_regions(text: &str) -> Result<Vec<RegionRecord>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true) // a short total row must not abort the load
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let header_map = HeaderMap::resolve(rdr.headers().context("reading header row")?)?;

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error at record {}", idx))?;

        let region = record
            .get(header_map.region)
            .map(clean_str)
            .unwrap_or_default();
        if region.is_empty() {
            dropped += 1;
            continue;
        }

        let mut values = [f64::NAN; 8];
        for (slot, (metric, col)) in values.iter_mut().zip(&header_map.numeric) {
            let raw = record.get(*col).unwrap_or("");
            match parse_decimal(raw) {
                Some(v) => *slot = v,
                None if clean_str(raw).is_empty() => {}
                None => warn!(region = %region, column = %metric, value = raw, "non-numeric cell"),
            }
        }

        let [cr, evo_to_p5p6, before, end22, ipm_2014, ipm_2024, tp_2014, tp_2024] = values;
        rows.push(RegionRecord {
            region,
            cr,
            evo_to_p5p6,
            before,
            end22,
            ipm_2014,
            ipm_2024,
            tp_2014,
            tp_2024,
        });
    }

    if dropped > 0 {
        debug!(dropped, "dropped rows without a region");
    }
    Ok(rows)
}
