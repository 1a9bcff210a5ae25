pub mod config;
pub mod export;
pub mod load;
pub mod metrics;
pub mod render;
