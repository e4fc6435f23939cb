use serde::{Deserialize, Serialize};

use crate::condor_interface::{AircraftSnapshotEntry, RawValue};
use crate::flarm_interface::{encode, to_hex, PflaaFields, TrafficSentence};
use crate::geo::{classify, feet_to_meters, knots_to_mps, relative};
use crate::prelude::{GeoPosition, RelativeState, TrafficResult};
use crate::telemetry::log::LogManager;

/// When a relative offset is considered "ownship" and left off the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressionRule {
    /// Both north and east are exactly zero.
    Colocated,
    /// Either north or east is exactly zero.
    #[default]
    AxisZero,
}

impl SuppressionRule {
    pub fn suppresses(self, north: i64, east: i64) -> bool {
        match self {
            SuppressionRule::Colocated => north == 0 && east == 0,
            SuppressionRule::AxisZero => north == 0 || east == 0,
        }
    }
}

/// Unit the feed reports altitude in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltitudeUnit {
    /// Passed through unconverted.
    #[default]
    Raw,
    Feet,
}

/// Unit the feed reports speed and vario in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedUnit {
    #[default]
    Raw,
    Knots,
}

/// Shared configuration for per-aircraft processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub suppression: SuppressionRule,
    pub altitude_unit: AltitudeUnit,
    pub speed_unit: SpeedUnit,
}

/// Result of running one snapshot entry through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Sentence {
        sentence: TrafficSentence,
        state: RelativeState,
    },
    Suppressed(RelativeState),
}

/// Turns snapshot entries into PFLAA sentences relative to one ownship.
pub struct TrafficProcessor {
    config: ProcessorConfig,
    logger: LogManager,
}

impl TrafficProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            logger: LogManager::new("traffic"),
        }
    }

    /// First entry whose identifier equals `target`.
    pub fn locate_ownship<'a>(
        snapshot: &'a [AircraftSnapshotEntry],
        target: &str,
    ) -> Option<&'a AircraftSnapshotEntry> {
        snapshot.iter().find(|entry| entry.identifier() == target)
    }

    /// Decoded position with the configured altitude unit applied.
    pub fn position(&self, entry: &AircraftSnapshotEntry) -> TrafficResult<GeoPosition> {
        let mut position = entry.position()?;
        if self.config.altitude_unit == AltitudeUnit::Feet {
            position.altitude = feet_to_meters(position.altitude);
        }
        Ok(position)
    }

    pub fn relative_state(
        &self,
        ownship: &GeoPosition,
        entry: &AircraftSnapshotEntry,
    ) -> TrafficResult<RelativeState> {
        let other = self.position(entry)?;
        let (east, north, vertical) = relative(ownship, &other);
        Ok(RelativeState {
            north,
            east,
            vertical,
            alarm: classify(vertical, east, north),
        })
    }

    pub fn process(
        &self,
        ownship: &GeoPosition,
        entry: &AircraftSnapshotEntry,
    ) -> TrafficResult<EntryOutcome> {
        let state = self.relative_state(ownship, entry)?;

        if self.config.suppression.suppresses(state.north, state.east) {
            self.logger.trace(&format!(
                "suppressed {} at north {} east {}",
                entry.identifier(),
                state.north,
                state.east
            ));
            return Ok(EntryOutcome::Suppressed(state));
        }

        let fields = PflaaFields {
            alarm: state.alarm,
            north: state.north,
            east: state.east,
            vertical: state.vertical,
            id_hex: to_hex(&entry.identifier()),
            track: entry.track(),
            ground_speed: self.speed_field(entry.raw_speed()),
            climb_rate: self.speed_field(entry.raw_vario()),
        };

        Ok(EntryOutcome::Sentence {
            sentence: encode(&fields),
            state,
        })
    }

    fn speed_field(&self, raw: Option<&RawValue>) -> String {
        match (self.config.speed_unit, raw) {
            (_, None) => String::new(),
            (SpeedUnit::Knots, Some(value)) => value
                .as_f64()
                .map(|knots| knots_to_mps(knots).to_string())
                .unwrap_or_else(|| value.to_string()),
            (SpeedUnit::Raw, Some(value)) => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::AlarmLevel;

    fn ownship() -> AircraftSnapshotEntry {
        AircraftSnapshotEntry::new("DC1", "45.00.000N", "7.00.000E", 1000.0)
            .with_motion(90_i64, 25.0, 0.0)
    }

    #[test]
    fn colocated_rule_only_suppresses_exact_overlap() {
        assert!(SuppressionRule::Colocated.suppresses(0, 0));
        assert!(!SuppressionRule::Colocated.suppresses(100, 0));
        assert!(SuppressionRule::AxisZero.suppresses(100, 0));
        assert!(!SuppressionRule::AxisZero.suppresses(100, -3));
    }

    #[test]
    fn ownship_entry_is_suppressed() {
        let processor = TrafficProcessor::new(ProcessorConfig::default());
        let entry = ownship();
        let position = processor.position(&entry).unwrap();

        match processor.process(&position, &entry).unwrap() {
            EntryOutcome::Suppressed(state) => {
                assert_eq!((state.north, state.east, state.vertical), (0, 0, 0));
            }
            other => panic!("expected suppression, got {other:?}"),
        }
    }

    #[test]
    fn north_offset_produces_low_alarm_sentence() {
        let processor = TrafficProcessor::new(ProcessorConfig {
            suppression: SuppressionRule::Colocated,
            ..Default::default()
        });
        let own = processor.position(&ownship()).unwrap();
        let other = AircraftSnapshotEntry::new("AB", "45.00.054N", "7.00.000E", 1010.0)
            .with_motion("45", "30", "-1.4");

        match processor.process(&own, &other).unwrap() {
            EntryOutcome::Sentence { sentence, state } => {
                assert_eq!(state.north, 100);
                assert_eq!(state.east, 0);
                assert_eq!(state.vertical, 10);
                assert_eq!(state.alarm, AlarmLevel::Low);
                assert!(sentence
                    .as_str()
                    .starts_with("$PFLAA,1,100,0,10,1,4142FF,45,,30,-1.4,1*"));
            }
            other => panic!("expected sentence, got {other:?}"),
        }
    }

    #[test]
    fn default_rule_suppresses_on_axis_traffic() {
        let processor = TrafficProcessor::new(ProcessorConfig::default());
        assert_eq!(processor.config.suppression, SuppressionRule::AxisZero);
        let own = GeoPosition::new(45.0, 7.0, 1000.0);
        let other = AircraftSnapshotEntry::new("AB", "45.00.054N", "7.00.000E", 1010.0)
            .with_motion(180_i64, "30", "-1.4");

        match processor.process(&own, &other).unwrap() {
            EntryOutcome::Suppressed(state) => {
                assert_eq!((state.north, state.east, state.vertical), (100, 0, 10));
                assert_eq!(state.alarm, AlarmLevel::Low);
            }
            other => panic!("expected suppression, got {other:?}"),
        }
    }

    #[test]
    fn off_axis_traffic_is_sent_under_default_rule() {
        let processor = TrafficProcessor::new(ProcessorConfig::default());
        let own = GeoPosition::new(45.0, 7.0, 1000.0);
        let other = AircraftSnapshotEntry::new("AB", "45.00.054N", "7.00.054E", 1010.0)
            .with_motion(180_i64, "30", "-1.4");

        let EntryOutcome::Sentence { sentence, .. } = processor.process(&own, &other).unwrap()
        else {
            panic!("expected sentence");
        };
        assert!(sentence
            .as_str()
            .starts_with("$PFLAA,1,100,71,10,1,4142FF,180,,30,-1.4,1*"));
    }

    #[test]
    fn unit_conversions_apply_when_configured() {
        let processor = TrafficProcessor::new(ProcessorConfig {
            altitude_unit: AltitudeUnit::Feet,
            speed_unit: SpeedUnit::Knots,
            ..Default::default()
        });
        let own = GeoPosition::new(45.0, 7.0, 0.0);
        let other = AircraftSnapshotEntry::new("Z9", "45.00.540N", "7.00.540E", 1000.0)
            .with_motion(10_i64, 100.0, "bad");

        let EntryOutcome::Sentence { sentence, state } = processor.process(&own, &other).unwrap()
        else {
            panic!("expected sentence");
        };
        assert_eq!(state.vertical, 305);
        assert!(sentence.as_str().contains(",51.4,bad,1*"));
    }

    #[test]
    fn locates_first_matching_ownship() {
        let snapshot = vec![
            AircraftSnapshotEntry::new("X", "1.00.000N", "1.00.000E", 0.0),
            ownship(),
        ];
        let found = TrafficProcessor::locate_ownship(&snapshot, "DC1").unwrap();
        assert_eq!(found.identifier(), "DC1");
        assert!(TrafficProcessor::locate_ownship(&snapshot, "NOPE").is_none());
    }
}
