//! Snapshot Fetcher
//!
//! Pulls one [`Snapshot`] per poll cycle from a [`SnapshotSource`].
//!
//! - [`HttpSnapshotSource`]: GET `<base_url>/<path>?_=<epoch ms>`
//! - [`FileSnapshotSource`]: read a local JSON file
//!
//! [`fetch_snapshot`] is the boundary the poller calls: any failure is
//! logged there and turned into `None`, so a bad cycle never escapes.

mod file;
mod http;

pub use file::FileSnapshotSource;
pub use http::HttpSnapshotSource;

use async_trait::async_trait;
use thiserror::Error;

use crate::snapshot::Snapshot;

/// A place snapshots come from
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Human-readable location, for logs
    fn describe(&self) -> String;

    /// Fetch and decode one snapshot
    async fn fetch(&self) -> Result<Snapshot, FetchError>;
}

/// Errors that can occur while fetching a snapshot
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid snapshot URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response status {0}")]
    Status(u16),

    #[error("Failed to decode snapshot: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fetch a snapshot, logging and swallowing any failure
pub async fn fetch_snapshot(source: &dyn SnapshotSource) -> Option<Snapshot> {
    match source.fetch().await {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::error!(source = %source.describe(), error = %e, "Failed to fetch snapshot");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl SnapshotSource for Failing {
        fn describe(&self) -> String {
            "failing".to_string()
        }

        async fn fetch(&self) -> Result<Snapshot, FetchError> {
            Err(FetchError::Status(503))
        }
    }

    #[tokio::test]
    async fn test_failure_becomes_none() {
        assert!(fetch_snapshot(&Failing).await.is_none());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FetchError::Status(500).to_string(),
            "Unexpected response status 500"
        );
        assert!(FetchError::InvalidUrl("::".into())
            .to_string()
            .contains("Invalid snapshot URL"));
    }
}
