//! Snapshot sources: where each cycle's list of aircraft comes from.

pub mod file;
pub mod http;

use flarmcore::condor_interface::AircraftSnapshotEntry;
use log::warn;
use std::time::Duration;
use thiserror::Error;

pub use file::FileSource;
pub use http::HttpSource;

/// Wait before polling again after a failed fetch.
pub const SOURCE_BACKOFF: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot is not a JSON array")]
    NotAnArray,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(reqwest::StatusCode),
}

/// Produces one complete snapshot per call, or an error the cycle retries.
pub trait SnapshotSource {
    async fn fetch(&mut self) -> Result<Vec<AircraftSnapshotEntry>, SnapshotError>;

    fn backoff(&self) -> Duration {
        SOURCE_BACKOFF
    }

    fn describe(&self) -> String;
}

/// Parses a JSON array of aircraft objects.
///
/// Elements that are not aircraft objects are logged and dropped; the rest of
/// the snapshot is kept.
pub fn parse_snapshot(text: &str) -> Result<Vec<AircraftSnapshotEntry>, SnapshotError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Array(items) = value else {
        return Err(SnapshotError::NotAnArray);
    };

    let mut entries = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<AircraftSnapshotEntry>(item) {
            Ok(entry) => entries.push(entry),
            Err(err) => warn!("dropping snapshot element {}: {}", idx, err),
        }
    }
    Ok(entries)
}
