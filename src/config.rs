// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Env var naming an explicit YAML config file.
pub const CONFIG_ENV: &str = "DASHBOARD_CONFIG";
/// Picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.yaml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Semicolon-delimited source table.
    pub csv_path: PathBuf,
    /// Where `index.html` and the exports are written.
    pub out_dir: PathBuf,
    /// Rows per ranking table.
    pub top_n: usize,
    /// Link to the hosted dashboard, shown in the export section.
    pub dashboard_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("pauvrete_regions.csv"),
            out_dir: PathBuf::from("dashboard"),
            top_n: 3,
            dashboard_url: "https://your-dashboard-streamlit.app".to_string(),
        }
    }
}

impl Config {
    /// `$DASHBOARD_CONFIG` if set (must exist), else `./dashboard.yaml` if it
    /// exists, else defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(
            env::var_os(CONFIG_ENV).map(PathBuf::from),
            Path::new(DEFAULT_CONFIG_FILE),
        )
    }

    /// `explicit` if given (must exist), else `fallback` if it is a file,
    /// else defaults.
    pub fn load_from(explicit: Option<PathBuf>, fallback: &Path) -> Result<Self> {
        match explicit {
            Some(p) => Self::from_file(p),
            None if fallback.is_file() => Self::from_file(fallback),
            None => {
                debug!(fallback = %fallback.display(), "no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {:?}", path))?;
        let cfg = Self::from_yaml_str(&text).with_context(|| format!("parsing config {:?}", path))?;
        info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(Into::into)
    }
}
