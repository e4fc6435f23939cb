use anyhow::{ensure, Context};
use flarmcore::processing::{AltitudeUnit, ProcessorConfig, SpeedUnit, SuppressionRule};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::generator::scenario::ScenarioConfig;
use crate::source::http::DEFAULT_URL;

/// Where snapshots are read from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    File {
        path: PathBuf,
    },
    Http {
        #[serde(default = "default_url")]
        url: String,
    },
    Synthetic(ScenarioConfig),
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Http { url: default_url() }
    }
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Destination {
    pub host: String,
    pub port: u16,
}

impl Default for Destination {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4352,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub target_cn: String,
    pub source: SourceConfig,
    pub destination: Destination,
    pub cycle_period_ms: u64,
    pub ownship_backoff_ms: u64,
    #[serde(flatten)]
    pub processing: ProcessorConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            target_cn: "DC1".to_string(),
            source: SourceConfig::default(),
            destination: Destination::default(),
            cycle_period_ms: 1000,
            ownship_backoff_ms: 10_000,
            processing: ProcessorConfig::default(),
        }
    }
}

/// Command-line values that take precedence over the YAML file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub target_cn: Option<String>,
    pub source: Option<SourceConfig>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cycle_period_ms: Option<u64>,
    pub altitude_unit: Option<AltitudeUnit>,
    pub speed_unit: Option<SpeedUnit>,
    pub suppression: Option<SuppressionRule>,
}

impl BridgeConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading bridge config {}", path_ref.display()))?;
        let config: BridgeConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing bridge config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(target) = overrides.target_cn {
            self.target_cn = target;
        }
        if let Some(source) = overrides.source {
            self.source = source;
        }
        if let Some(host) = overrides.host {
            self.destination.host = host;
        }
        if let Some(port) = overrides.port {
            self.destination.port = port;
        }
        if let Some(period) = overrides.cycle_period_ms {
            self.cycle_period_ms = period;
        }
        if let Some(unit) = overrides.altitude_unit {
            self.processing.altitude_unit = unit;
        }
        if let Some(unit) = overrides.speed_unit {
            self.processing.speed_unit = unit;
        }
        if let Some(rule) = overrides.suppression {
            self.processing.suppression = rule;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.target_cn.is_empty(), "target_cn must not be empty");
        ensure!(self.cycle_period_ms > 0, "cycle_period_ms must be positive");
        ensure!(self.destination.port > 0, "destination port must be positive");
        Ok(())
    }

    pub fn cycle_period(&self) -> Duration {
        Duration::from_millis(self.cycle_period_ms)
    }

    pub fn ownship_backoff(&self) -> Duration {
        Duration::from_millis(self.ownship_backoff_ms)
    }
}
