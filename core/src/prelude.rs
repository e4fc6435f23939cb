use serde::{Deserialize, Serialize};
use std::fmt;

/// Geodetic position of one aircraft for the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude: f64,
}

impl GeoPosition {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude,
        }
    }
}

/// Proximity severity reported in the first PFLAA field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlarmLevel {
    None,
    Low,
    Important,
}

impl AlarmLevel {
    pub fn as_u8(self) -> u8 {
        match self {
            AlarmLevel::None => 0,
            AlarmLevel::Low => 1,
            AlarmLevel::Important => 2,
        }
    }
}

impl fmt::Display for AlarmLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Position of another aircraft relative to ownship, in whole meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeState {
    pub north: i64,
    pub east: i64,
    pub vertical: i64,
    pub alarm: AlarmLevel,
}

/// Raised when a coordinate string is not in `DD.MM.mmmH` form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("empty coordinate")]
    Empty,
    #[error("invalid hemisphere '{0}'")]
    Hemisphere(char),
    #[error("expected 3 dot-separated fields, found {0}")]
    FieldCount(usize),
    #[error("non-numeric field '{0}'")]
    NonNumeric(String),
}

/// Per-aircraft failure; the cycle skips the entry and carries on.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TrafficError {
    #[error("{field}: {source}")]
    Coordinate {
        field: &'static str,
        #[source]
        source: FormatError,
    },
    #[error("{field}: cannot parse '{value}'")]
    Field { field: &'static str, value: String },
}

pub type TrafficResult<T> = Result<T, TrafficError>;
