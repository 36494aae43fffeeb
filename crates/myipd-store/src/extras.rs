// ABOUTME: Extras store holding operator-configured `[tag] address` entries from an optional file.
// ABOUTME: Malformed lines are warned about and skipped; the rest of the file still loads in order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use myipd_core::{ExtraEntry, ExtraLineError};
use tokio::sync::{Mutex, RwLock};

use crate::{StoreError, data_lines};

/// Parse raw extras file contents into entries, in file order.
///
/// Comment lines and empty lines are skipped silently. Each malformed or
/// undecodable line is returned alongside its 1-based line number so the
/// caller can report it.
pub fn parse_extras(contents: &[u8]) -> (Vec<ExtraEntry>, Vec<(usize, ExtraLineError)>) {
    let mut entries = Vec::new();
    let mut rejected = Vec::new();

    for (line_no, line) in data_lines(contents) {
        let parsed = line
            .map_err(|_| ExtraLineError::NotUtf8)
            .and_then(ExtraEntry::parse_line);
        match parsed {
            Ok(entry) => entries.push(entry),
            Err(e) => rejected.push((line_no, e)),
        }
    }

    (entries, rejected)
}

/// Read an extras file, logging a warning for every malformed line.
pub async fn load_extras(path: &Path) -> Result<Vec<ExtraEntry>, StoreError> {
    let contents = tokio::fs::read(path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let (entries, rejected) = parse_extras(&contents);
    for (line, err) in rejected {
        tracing::warn!(path = %path.display(), line, "skipping extras line: {}", err);
    }
    Ok(entries)
}

/// Shared, reloadable list of extras entries.
///
/// A store without a path is permanently empty and reloading it is a no-op.
pub struct ExtrasStore {
    path: Option<PathBuf>,
    current: RwLock<Arc<Vec<ExtraEntry>>>,
    reload_lock: Mutex<()>,
}

impl ExtrasStore {
    /// Create a store for the given extras file. An empty path is the same as
    /// no path.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path: path.filter(|p| !p.as_os_str().is_empty()),
            current: RwLock::new(Arc::new(Vec::new())),
            reload_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Re-read the extras file and install the result as the active list.
    ///
    /// On a read failure the active list becomes empty. Returns the number of
    /// entries loaded.
    pub async fn reload(&self) -> Result<usize, StoreError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(0);
        };

        // Serialized so an older read can never overwrite a newer one.
        let _reloading = self.reload_lock.lock().await;
        let (next, result) = match load_extras(path).await {
            Ok(entries) => {
                let count = entries.len();
                (entries, Ok(count))
            }
            Err(e) => (Vec::new(), Err(e)),
        };
        *self.current.write().await = Arc::new(next);
        result
    }

    /// Current snapshot of the extras list.
    pub async fn snapshot(&self) -> Arc<Vec<ExtraEntry>> {
        Arc::clone(&*self.current.read().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_keeps_file_order_and_skips_bad_lines() {
        let contents = "# lab hosts\nhome 10.0.0.5\nlan office 10.0.0.6\n\n172.16.0.1\nvpn 10.8.0.1\n";
        let (entries, rejected) = parse_extras(contents.as_bytes());

        let addrs: Vec<&str> = entries.iter().map(|e| e.address.as_str()).collect();
        assert_eq!(addrs, vec!["10.0.0.5", "172.16.0.1", "10.8.0.1"]);
        assert_eq!(entries[0].tag.as_deref(), Some("home"));
        assert_eq!(entries[1].tag, None);

        assert_eq!(rejected, vec![(3, ExtraLineError::TooManyFields(3))]);
    }

    #[test]
    fn parse_reports_whitespace_only_lines() {
        let (entries, rejected) = parse_extras(b"  \nhome 10.0.0.5\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(rejected, vec![(1, ExtraLineError::Blank)]);
    }

    #[tokio::test]
    async fn store_without_path_stays_empty() {
        let store = ExtrasStore::new(None);
        assert!(!store.is_enabled());
        assert_eq!(store.reload().await.unwrap(), 0);
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn empty_path_disables_store() {
        let store = ExtrasStore::new(Some(PathBuf::new()));
        assert!(!store.is_enabled());
        assert_eq!(store.reload().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn reload_installs_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("extras.conf");
        std::fs::write(&path, "home 10.0.0.5\n").unwrap();

        let store = ExtrasStore::new(Some(path.clone()));
        assert_eq!(store.reload().await.unwrap(), 1);
        let snapshot = store.snapshot().await;
        assert_eq!(
            snapshot.as_slice(),
            &[ExtraEntry {
                tag: Some("home".into()),
                address: "10.0.0.5".into(),
            }]
        );

        std::fs::write(&path, "10.0.0.7\n").unwrap();
        store.reload().await.unwrap();
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].address, "10.0.0.7");
    }

    #[tokio::test]
    async fn failed_reload_empties_the_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("extras.conf");
        std::fs::write(&path, "home 10.0.0.5\n").unwrap();

        let store = ExtrasStore::new(Some(path.clone()));
        store.reload().await.unwrap();
        assert_eq!(store.snapshot().await.len(), 1);

        std::fs::remove_file(&path).unwrap();
        assert!(store.reload().await.is_err());
        assert!(store.snapshot().await.is_empty());
    }

    #[test]
    fn parse_skips_undecodable_line_and_keeps_the_rest() {
        let (entries, rejected) = parse_extras(b"# caf\xe9\nhome 10.0.0.5\nbad \xff\n10.0.0.7\n");
        let addrs: Vec<&str> = entries.iter().map(|e| e.address.as_str()).collect();
        assert_eq!(addrs, vec!["10.0.0.5", "10.0.0.7"]);
        assert_eq!(rejected, vec![(3, ExtraLineError::NotUtf8)]);
    }

    #[tokio::test]
    async fn latin1_bytes_do_not_wipe_the_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("extras.conf");
        std::fs::write(&path, b"# caf\xe9\nh\xf4te 10.0.0.9\nhome 10.0.0.5\n").unwrap();

        let store = ExtrasStore::new(Some(path));
        assert_eq!(store.reload().await.unwrap(), 1);
        assert_eq!(store.snapshot().await[0].address, "10.0.0.5");
    }

    #[tokio::test]
    async fn reload_waits_for_the_reload_lock_before_reading() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("extras.conf");
        std::fs::write(&path, "10.0.0.1\n").unwrap();
        let store = Arc::new(ExtrasStore::new(Some(path.clone())));

        let guard = store.reload_lock.lock().await;
        let pending = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.reload().await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(store.snapshot().await.is_empty());

        std::fs::write(&path, "10.0.0.2\n").unwrap();
        drop(guard);
        assert_eq!(pending.await.unwrap().unwrap(), 1);
        assert_eq!(store.snapshot().await[0].address, "10.0.0.2");
    }
}
