use flarmcore::condor_interface::AircraftSnapshotEntry;
use std::path::PathBuf;

use super::{parse_snapshot, SnapshotError, SnapshotSource};

/// Reads the spectator JSON dump Condor writes to disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SnapshotSource for FileSource {
    async fn fetch(&mut self) -> Result<Vec<AircraftSnapshotEntry>, SnapshotError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SnapshotError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        parse_snapshot(text.trim())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
