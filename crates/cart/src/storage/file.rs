//! File-backed key-value store.
//!
//! Each key maps to `<root>/<percent-encoded key>.json`. Writes go to a
//! sibling `.tmp` file first and are renamed into place, so a reader never
//! observes a half-written value.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::KeyValueStore;
use crate::error::StorageError;

/// A key-value store persisted as files under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the stored values.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that holds the value for `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", urlencoding::encode(key)))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_owned(),
        source,
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_error(key, e))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value.as_bytes())
            .await
            .map_err(|e| io_error(key, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(key, e))?;

        debug!(path = %path.display(), bytes = value.len(), "Wrote stored value");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("gomarket-file-store-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_path_for_encodes_key() {
        let store = FileStore::new("/data");
        assert_eq!(
            store.path_for("@GoMarket:products"),
            PathBuf::from("/data/%40GoMarket%3Aproducts.json")
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let store = FileStore::new(temp_root());
        assert_eq!(store.get("@GoMarket:products").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let root = temp_root();
        let store = FileStore::new(&root);

        store
            .set("@GoMarket:products", "[]".to_string())
            .await
            .unwrap();
        assert_eq!(
            store.get("@GoMarket:products").await.unwrap().as_deref(),
            Some("[]")
        );

        store
            .set("@GoMarket:products", "[{}]".to_string())
            .await
            .unwrap();
        assert_eq!(
            store.get("@GoMarket:products").await.unwrap().as_deref(),
            Some("[{}]")
        );
        assert!(!store.path_for("@GoMarket:products").with_extension("json.tmp").exists());

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_read_error_is_reported() {
        let root = temp_root();
        // A directory where the value file should be cannot be read as a string.
        let store = FileStore::new(&root);
        tokio::fs::create_dir_all(store.path_for("k")).await.unwrap();

        let err = store.get("k").await.unwrap_err();
        assert!(matches!(err, StorageError::Io { ref key, .. } if key == "k"));

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
