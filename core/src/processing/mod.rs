pub mod traffic;

pub use traffic::{
    AltitudeUnit, EntryOutcome, ProcessorConfig, SpeedUnit, SuppressionRule, TrafficProcessor,
};
