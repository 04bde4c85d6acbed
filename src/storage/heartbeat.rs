//! Last liveness-ping timestamp, stored as RFC 3339 text.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};

use super::local::is_missing;

#[derive(Debug, Clone)]
pub struct HeartbeatStore {
    path: PathBuf,
}

impl HeartbeatStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the last ping time. Missing or unparseable files yield `None`.
    pub async fn last_sent(&self) -> Result<Option<DateTime<Utc>>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if is_missing(&e) => return Ok(None),
            Err(e) => return Err(AppError::state_read(&self.path, e)),
        };

        match DateTime::parse_from_rfc3339(content.trim()) {
            Ok(ts) => Ok(Some(ts.with_timezone(&Utc))),
            Err(e) => {
                log::warn!(
                    "Ignoring unparseable heartbeat file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    /// Record a ping time, replacing the previous one.
    pub async fn record(&self, at: DateTime<Utc>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AppError::state_write(&self.path, e))?;
            }
        }
        tokio::fs::write(&self.path, at.to_rfc3339())
            .await
            .map_err(|e| AppError::state_write(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = HeartbeatStore::new(tmp.path().join(".heartbeat"));
        assert!(store.last_sent().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_and_read() {
        let tmp = TempDir::new().unwrap();
        let store = HeartbeatStore::new(tmp.path().join(".heartbeat"));
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap();

        store.record(at).await.unwrap();
        assert_eq!(store.last_sent().await.unwrap(), Some(at));
    }

    #[tokio::test]
    async fn test_garbage_is_none() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".heartbeat");
        std::fs::write(&path, "last tuesday").unwrap();

        let store = HeartbeatStore::new(&path);
        assert!(store.last_sent().await.unwrap().is_none());
    }
}
