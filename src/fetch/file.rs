//! Local file snapshot source

use async_trait::async_trait;
use std::path::PathBuf;

use super::{FetchError, SnapshotSource};
use crate::snapshot::Snapshot;

/// Reads a snapshot from a JSON file on every fetch
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        let body = tokio::fs::read(&self.path).await?;
        let snapshot = serde_json::from_slice(&body)?;
        Ok(snapshot)
    }
}
