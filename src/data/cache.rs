use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::error::LoadError;
use super::loader::load_file;
use super::model::Dataset;

/// What we remember about a file to tell whether it changed since loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    len: u64,
    modified: Option<SystemTime>,
}

impl Fingerprint {
    fn of(path: &Path) -> Result<Self, LoadError> {
        let meta = fs::metadata(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Fingerprint {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

#[derive(Debug)]
struct Entry {
    fingerprint: Fingerprint,
    dataset: Arc<Dataset>,
}

/// Load-once cache of datasets keyed by path.
///
/// An entry is reused only while the file's size and modification time are
/// unchanged; otherwise the file is read again.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Entry>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, loading it if absent or stale.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, LoadError> {
        let fingerprint = Fingerprint::of(path)?;

        if let Some(entry) = self.entries.get(path) {
            if entry.fingerprint == fingerprint {
                log::debug!("Dataset cache hit for {}", path.display());
                return Ok(Arc::clone(&entry.dataset));
            }
            log::debug!("{} changed on disk, reloading", path.display());
        }

        let dataset = Arc::new(load_file(path)?);
        self.entries.insert(
            path.to_path_buf(),
            Entry {
                fingerprint,
                dataset: Arc::clone(&dataset),
            },
        );
        Ok(dataset)
    }

    /// Forget a single path.
    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "date,headline,source,market_event,market_index,index_change_percent,trading_volume,sentiment,sector,impact_level,related_company";
    const ROW: &str = "2025-01-02,h,Reuters,Earnings,NASDAQ,1.0,10,Positive,IT,Low,Acme";

    fn write_csv(path: &Path, rows: usize) {
        let mut f = fs::File::create(path).unwrap();
        writeln!(f, "{HEADER}").unwrap();
        for _ in 0..rows {
            writeln!(f, "{ROW}").unwrap();
        }
    }

    #[test]
    fn unchanged_file_is_served_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");
        write_csv(&path, 2);

        let mut cache = DatasetCache::new();
        let a = cache.get_or_load(&path).unwrap();
        let b = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn rewritten_file_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");
        write_csv(&path, 2);

        let mut cache = DatasetCache::new();
        let before = cache.get_or_load(&path).unwrap();
        write_csv(&path, 3);
        let after = cache.get_or_load(&path).unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.len(), 2);
        assert_eq!(after.len(), 3);
    }

    #[test]
    fn invalidate_forces_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");
        write_csv(&path, 1);

        let mut cache = DatasetCache::new();
        let a = cache.get_or_load(&path).unwrap();
        cache.invalidate(&path);
        assert!(cache.is_empty());
        let b = cache.get_or_load(&path).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DatasetCache::new()
            .get_or_load(&dir.path().join("absent.csv"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
