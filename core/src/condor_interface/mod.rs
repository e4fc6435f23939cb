pub mod entry;

pub use entry::{AircraftSnapshotEntry, RawValue};
