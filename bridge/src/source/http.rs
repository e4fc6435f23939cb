use flarmcore::condor_interface::AircraftSnapshotEntry;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::{parse_snapshot, SnapshotError, SnapshotSource};

pub const DEFAULT_URL: &str = "http://127.0.0.1:8081/allPilots";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const TRAILER: &str = "[General]";

/// Polls the Condor spectator HTTP endpoint.
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

/// The endpoint answers with back-to-back JSON objects followed by a
/// `[General]` marker; turn that into one JSON array.
pub fn repair_concatenated(body: &str) -> String {
    let trimmed = body.trim();
    let trimmed = trimmed.strip_suffix(TRAILER).unwrap_or(trimmed);
    format!("[{}]", trimmed.replace("}{", "},{"))
}

impl SnapshotSource for HttpSource {
    async fn fetch(&mut self) -> Result<Vec<AircraftSnapshotEntry>, SnapshotError> {
        let response = self.client.get(&self.url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(SnapshotError::Status(response.status()));
        }
        let body = response.text().await?;
        parse_snapshot(&repair_concatenated(&body))
    }

    fn describe(&self) -> String {
        format!("url {}", self.url)
    }
}
