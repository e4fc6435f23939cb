use flarmcore::condor_interface::AircraftSnapshotEntry;
use flarmcore::geo::{encode, Axis, EARTH_RADIUS_M};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::source::{SnapshotError, SnapshotSource};

/// Configuration for synthetic traffic orbiting a stationary ownship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude: f64,
    pub gliders: usize,
    pub min_radius_m: f64,
    pub max_radius_m: f64,
    pub vertical_spread_m: f64,
    pub airspeed_mps: f64,
    pub noise_m: f64,
    pub seed: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            latitude_deg: 45.0,
            longitude_deg: 7.0,
            altitude: 1500.0,
            gliders: 6,
            min_radius_m: 80.0,
            max_radius_m: 2000.0,
            vertical_spread_m: 150.0,
            airspeed_mps: 30.0,
            noise_m: 3.0,
            seed: 0,
        }
    }
}

struct Orbit {
    cn: String,
    radius_m: f64,
    phase: f64,
    altitude_offset: f64,
}

/// Snapshot source that fabricates gliders circling the ownship, one step per fetch.
pub struct SyntheticSource {
    config: ScenarioConfig,
    ownship_cn: String,
    orbits: Vec<Orbit>,
    rng: StdRng,
    step: u64,
}

impl SyntheticSource {
    pub fn new(config: ScenarioConfig, ownship_cn: &str) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let count = config.gliders;
        let span = (config.max_radius_m - config.min_radius_m).max(0.0);

        let orbits = (0..count)
            .map(|idx| {
                let fraction = if count > 1 {
                    idx as f64 / (count - 1) as f64
                } else {
                    0.0
                };
                Orbit {
                    cn: format!("S{:02}", idx + 1),
                    radius_m: config.min_radius_m + span * fraction,
                    phase: rng.gen::<f64>() * 2.0 * PI,
                    altitude_offset: if config.vertical_spread_m > 0.0 {
                        rng.gen_range(-config.vertical_spread_m..config.vertical_spread_m)
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        Self {
            config,
            ownship_cn: ownship_cn.to_string(),
            orbits,
            rng,
            step: 0,
        }
    }

    /// Builds the snapshot for the current step and advances one second.
    pub fn next_snapshot(&mut self) -> Vec<AircraftSnapshotEntry> {
        let cfg = &self.config;
        let mut snapshot = Vec::with_capacity(self.orbits.len() + 1);
        snapshot.push(
            AircraftSnapshotEntry::new(
                &self.ownship_cn,
                &encode(cfg.latitude_deg, Axis::Latitude),
                &encode(cfg.longitude_deg, Axis::Longitude),
                cfg.altitude,
            )
            .with_motion(0_i64, 0.0, 0.0),
        );

        let lat_rad = cfg.latitude_deg.to_radians();
        for orbit in &self.orbits {
            let angular_rate = cfg.airspeed_mps / orbit.radius_m.max(1.0);
            let angle = orbit.phase + angular_rate * self.step as f64;

            let (jitter_n, jitter_e) = if cfg.noise_m > 0.0 {
                (
                    self.rng.gen_range(-cfg.noise_m..cfg.noise_m),
                    self.rng.gen_range(-cfg.noise_m..cfg.noise_m),
                )
            } else {
                (0.0, 0.0)
            };
            let north = orbit.radius_m * angle.cos() + jitter_n;
            let east = orbit.radius_m * angle.sin() + jitter_e;

            let latitude = cfg.latitude_deg + (north / EARTH_RADIUS_M).to_degrees();
            let longitude = cfg.longitude_deg + (east / (EARTH_RADIUS_M * lat_rad.cos())).to_degrees();
            // clockwise orbit: track leads the radial by 90 degrees
            let track = (angle.to_degrees() + 90.0).rem_euclid(360.0).round() as i64;
            let climb = (angle * 3.0).sin() * 2.0;

            snapshot.push(
                AircraftSnapshotEntry::new(
                    &orbit.cn,
                    &encode(latitude, Axis::Latitude),
                    &encode(longitude, Axis::Longitude),
                    (cfg.altitude + orbit.altitude_offset).round(),
                )
                .with_motion(track, cfg.airspeed_mps, (climb * 10.0).round() / 10.0),
            );
        }

        self.step += 1;
        snapshot
    }
}

impl SnapshotSource for SyntheticSource {
    async fn fetch(&mut self) -> Result<Vec<AircraftSnapshotEntry>, SnapshotError> {
        Ok(self.next_snapshot())
    }

    fn describe(&self) -> String {
        format!(
            "synthetic scenario ({} gliders, seed {})",
            self.orbits.len(),
            self.config.seed
        )
    }
}
