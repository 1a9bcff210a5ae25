// src/load/cache.rs

use anyhow::Result;
use once_cell::sync::OnceCell;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, warn};

use super::load_regions;
use crate::metrics::{derive, EnrichedRegion};

/// Read-through memo of the enriched table for one source file.
///
/// The first `get_or_load` reads and derives; every later call hands back the
/// same allocation. There is no invalidation.
pub struct TableCache {
    path: PathBuf,
    table: OnceCell<Arc<Vec<EnrichedRegion>>>,
}

impl TableCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    pub fn get_or_load(&self) -> Result<Arc<Vec<EnrichedRegion>>> {
        if let Some(table) = self.table.get() {
            debug!(path = %self.path.display(), "table cache hit");
            return Ok(Arc::clone(table));
        }
        let table = self
            .table
            .get_or_try_init(|| load_regions(&self.path).map(|rows| Arc::new(derive(rows))))?;
        Ok(Arc::clone(table))
    }
}

static SHARED: OnceCell<TableCache> = OnceCell::new();

/// Process-wide cache. The first caller fixes the source path.
pub fn shared(path: impl AsRef<Path>) -> &'static TableCache {
    let cache = SHARED.get_or_init(|| TableCache::new(path.as_ref()));
    if cache.path() != path.as_ref() {
        warn!(
            cached = %cache.path().display(),
            requested = %path.as_ref().display(),
            "shared table cache already bound to another file"
        );
    }
    cache
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::tests::{init_test_logging, sample_file};
    use std::fs;

    #[test]
    fn warm_load_returns_same_table() -> Result<()> {
        init_test_logging();
        let tmp = sample_file()?;
        let cache = TableCache::new(tmp.path());
        assert!(!cache.is_loaded());

        let cold = cache.get_or_load()?;
        assert!(cache.is_loaded());
        let warm = cache.get_or_load()?;

        assert!(Arc::ptr_eq(&cold, &warm));
        assert_eq!(*cold, *warm);
        assert_eq!(cold.len(), 3);
        Ok(())
    }

    #[test]
    fn warm_load_ignores_later_file_changes() -> Result<()> {
        let tmp = sample_file()?;
        let cache = TableCache::new(tmp.path());
        let cold = cache.get_or_load()?;

        fs::write(tmp.path(), "Région;CR\n")?;
        let warm = cache.get_or_load()?;
        assert_eq!(*cold, *warm);
        Ok(())
    }

    #[test]
    fn independent_caches_agree() -> Result<()> {
        let tmp = sample_file()?;
        let a = TableCache::new(tmp.path()).get_or_load()?;
        let b = TableCache::new(tmp.path()).get_or_load()?;
        assert_eq!(*a, *b);
        Ok(())
    }

    #[test]
    fn failed_load_is_not_memoized() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("late.csv");
        let cache = TableCache::new(&path);
        assert!(cache.get_or_load().is_err());
        assert!(!cache.is_loaded());

        fs::write(&path, crate::load::tests::SAMPLE)?;
        assert_eq!(cache.get_or_load()?.len(), 3);
        Ok(())
    }

    // Only test in the crate that touches the process-wide instance.
    #[test]
    fn shared_cache_is_bound_to_first_path() -> Result<()> {
        init_test_logging();
        let tmp = sample_file()?;
        let first = shared(tmp.path());
        let second = shared("/elsewhere.csv");

        assert!(std::ptr::eq(first, second));
        assert_eq!(second.path(), tmp.path());
        assert_eq!(second.get_or_load()?.len(), 3);
        Ok(())
    }
}
