//! HTTP snapshot source

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use std::time::Duration;

use super::{FetchError, SnapshotSource};
use crate::snapshot::Snapshot;

/// Query parameter carrying the cache-busting timestamp
pub const CACHE_BUST_PARAM: &str = "_";

/// Fetches snapshots over HTTP
pub struct HttpSnapshotSource {
    client: Client,
    url: Url,
}

impl HttpSnapshotSource {
    /// Create a source for `path` resolved against `base_url`
    ///
    /// `timeout` of `None` leaves the transport default in place.
    pub fn new(
        base_url: &str,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let base = Url::parse(base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        let url = base
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", path, e)))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, url })
    }

    /// Resolved snapshot URL, without the cache-busting parameter
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        let stamp = Utc::now().timestamp_millis();

        let response = self
            .client
            .get(self.url.clone())
            .query(&[(CACHE_BUST_PARAM, stamp)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let snapshot = serde_json::from_slice(&body)?;
        Ok(snapshot)
    }
}
