// src/metrics/mod.rs
pub mod derive;
pub mod rank;
pub mod types;

pub use derive::{derive, derive_one};
pub use rank::top_n;
pub use types::{EnrichedRegion, Metric, RegionRecord, REGION_HEADER};
