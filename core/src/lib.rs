//! Relative-traffic core for the Condor FLARM bridge.
//!
//! Decodes Condor spectator positions, computes each aircraft's offset from a
//! designated ownship, classifies proximity, and encodes the result as
//! checksummed `$PFLAA` sentences.

pub mod condor_interface;
pub mod flarm_interface;
pub mod geo;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{AlarmLevel, FormatError, GeoPosition, RelativeState, TrafficError};
