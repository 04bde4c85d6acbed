//! Local filesystem state store.
//!
//! The file contains exactly the digest text. Reads trim surrounding
//! whitespace so hand-edited files with a trailing newline still compare
//! equal.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Fingerprint;
use crate::storage::StateStore;

/// Fingerprint stored in a plain text file.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Temp file next to the target: `<file name>.tmp`.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.tmp_path();
        let result = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(bytes).await?;
            file.flush().await?;
            drop(file);
            tokio::fs::rename(&tmp, &self.path).await
        }
        .await;

        if result.is_err() {
            let _ = tokio::fs::remove_file(&tmp).await;
        }
        result
    }
}

/// Errors meaning "nothing stored at this path".
pub(crate) fn is_missing(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
    )
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn read(&self) -> Result<Option<Fingerprint>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if is_missing(&e) => {
                log::info!("No previous checksum file found at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(AppError::state_read(&self.path, e)),
        };

        let content = String::from_utf8_lossy(&bytes);
        let trimmed = content.trim();
        if trimmed.is_empty() {
            log::warn!(
                "Checksum file {} is empty; any fetched content counts as a change",
                self.path.display()
            );
        }

        log::info!("Previous checksum read from file: {}", trimmed);
        Ok(Some(Fingerprint::new(trimmed)))
    }

    async fn write(&self, fingerprint: &Fingerprint) -> Result<()> {
        self.write_bytes(fingerprint.as_str().as_bytes())
            .await
            .map_err(|e| AppError::state_write(&self.path, e))?;

        log::info!(
            "Checksum written to {}: {}",
            self.path.display(),
            fingerprint
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let store = FileStateStore::new(tmp.path().join(".checksum"));

        assert!(store.read().await.unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let store = FileStateStore::new(tmp.path().join(".checksum"));
        let fp = Fingerprint::new("5d41402abc4b2a76b9719d911017c592");

        store.write(&fp).await.unwrap();
        assert_eq!(store.read().await.unwrap(), Some(fp.clone()));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, fp.as_str());
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let tmp = TempDir::new().unwrap();
        let store = FileStateStore::new(tmp.path().join(".checksum"));

        store.write(&Fingerprint::new("aaaa")).await.unwrap();
        store.write(&Fingerprint::new("bb")).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "bb");
    }

    #[tokio::test]
    async fn test_read_trims_whitespace() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".checksum");
        std::fs::write(&path, "  abc123\n\n").unwrap();

        let store = FileStateStore::new(&path);
        assert_eq!(store.read().await.unwrap(), Some(Fingerprint::new("abc123")));
    }

    #[tokio::test]
    async fn test_empty_file_is_an_empty_fingerprint() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".checksum");
        std::fs::write(&path, " \n").unwrap();

        let store = FileStateStore::new(&path);
        assert_eq!(store.read().await.unwrap(), Some(Fingerprint::new("")));
    }

    #[tokio::test]
    async fn test_non_utf8_file_is_read_lossily() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".checksum");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let store = FileStateStore::new(&path);
        let stored = store.read().await.unwrap().unwrap();
        assert_ne!(stored, Fingerprint::new("abc"));

        store.write(&Fingerprint::new("abc")).await.unwrap();
        assert_eq!(store.read().await.unwrap(), Some(Fingerprint::new("abc")));
    }

    #[tokio::test]
    async fn test_path_below_a_file_reads_as_missing() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let store = FileStateStore::new(blocker.join(".checksum"));
        assert!(store.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_temp_file_keeps_extension() {
        let tmp = TempDir::new().unwrap();
        let unrelated = tmp.path().join("page.tmp");
        std::fs::write(&unrelated, "keep").unwrap();
        let store = FileStateStore::new(tmp.path().join("page.sum"));

        assert_eq!(store.tmp_path(), tmp.path().join("page.sum.tmp"));
        store.write(&Fingerprint::new("abc")).await.unwrap();

        assert_eq!(std::fs::read_to_string(&unrelated).unwrap(), "keep");
        assert!(!store.tmp_path().exists());
    }

    #[tokio::test]
    async fn test_failed_rename_removes_temp_file() {
        let tmp = TempDir::new().unwrap();
        // A non-empty directory at the target blocks the rename.
        let path = tmp.path().join(".checksum");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("inner"), "x").unwrap();
        let store = FileStateStore::new(&path);

        let err = store.write(&Fingerprint::new("abc")).await.unwrap_err();
        assert!(matches!(err, AppError::StateWriteFailed { .. }));
        assert!(!store.tmp_path().exists());
    }

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let store = FileStateStore::new(tmp.path().join("state/nested/.checksum"));

        store.write(&Fingerprint::new("abc")).await.unwrap();
        assert_eq!(store.read().await.unwrap(), Some(Fingerprint::new("abc")));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        // Parent "directory" is a regular file, so the write cannot succeed.
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let store = FileStateStore::new(blocker.join(".checksum"));

        let err = store.write(&Fingerprint::new("abc")).await.unwrap_err();
        assert!(matches!(err, AppError::StateWriteFailed { .. }));
    }

    #[tokio::test]
    async fn test_read_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        // A directory at the state path cannot be read as text.
        let path = tmp.path().join(".checksum");
        std::fs::create_dir(&path).unwrap();

        let store = FileStateStore::new(&path);
        let err = store.read().await.unwrap_err();
        assert!(matches!(err, AppError::StateReadFailed { .. }));
    }
}
