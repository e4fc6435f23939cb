use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geo::coordinate;
use crate::prelude::{GeoPosition, TrafficError, TrafficResult};

/// A feed value that may arrive as a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(serde_json::Number),
    Text(String),
}

impl RawValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => n.as_f64(),
            RawValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Whole-number reading; fractional text is rejected, fractional numbers truncate.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RawValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|v| v.trunc() as i64)),
            RawValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(RawValue::Number)
            .unwrap_or_else(|| RawValue::Text(value.to_string()))
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value.into())
    }
}

/// One aircraft as reported by the Condor spectator feed.
///
/// Missing or null keys deserialize to `None` so a single broken entry cannot
/// poison the whole snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AircraftSnapshotEntry {
    #[serde(rename = "CN", default)]
    pub cn: Option<RawValue>,
    #[serde(default)]
    pub latitude: Option<RawValue>,
    #[serde(default)]
    pub longitude: Option<RawValue>,
    #[serde(default)]
    pub altitude: Option<RawValue>,
    #[serde(default)]
    pub heading: Option<RawValue>,
    #[serde(default)]
    pub speed: Option<RawValue>,
    #[serde(default)]
    pub vario: Option<RawValue>,
}

impl AircraftSnapshotEntry {
    pub fn new(cn: &str, latitude: &str, longitude: &str, altitude: impl Into<RawValue>) -> Self {
        Self {
            cn: Some(cn.into()),
            latitude: Some(latitude.into()),
            longitude: Some(longitude.into()),
            altitude: Some(altitude.into()),
            ..Default::default()
        }
    }

    pub fn with_motion(
        mut self,
        heading: impl Into<RawValue>,
        speed: impl Into<RawValue>,
        vario: impl Into<RawValue>,
    ) -> Self {
        self.heading = Some(heading.into());
        self.speed = Some(speed.into());
        self.vario = Some(vario.into());
        self
    }

    pub fn identifier(&self) -> String {
        self.cn.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    /// Decoded position; altitude is returned in whatever unit the feed uses.
    pub fn position(&self) -> TrafficResult<GeoPosition> {
        let latitude = decode_field("latitude", self.latitude.as_ref(), 90.0)?;
        let longitude = decode_field("longitude", self.longitude.as_ref(), 180.0)?;
        let altitude = self
            .altitude
            .as_ref()
            .and_then(RawValue::as_f64)
            .ok_or_else(|| field_error("altitude", self.altitude.as_ref()))?;

        Ok(GeoPosition::new(latitude, longitude, altitude))
    }

    /// Track in whole degrees, 0 when the heading is missing or unparseable.
    pub fn track(&self) -> i64 {
        self.heading
            .as_ref()
            .and_then(RawValue::as_i64)
            .unwrap_or(0)
    }

    pub fn raw_speed(&self) -> Option<&RawValue> {
        self.speed.as_ref()
    }

    pub fn raw_vario(&self) -> Option<&RawValue> {
        self.vario.as_ref()
    }
}

fn decode_field(
    field: &'static str,
    value: Option<&RawValue>,
    limit: f64,
) -> TrafficResult<f64> {
    match value {
        Some(RawValue::Text(text)) => {
            let degrees = coordinate::decode(text)
                .map_err(|source| TrafficError::Coordinate { field, source })?;
            if degrees.abs() > limit {
                return Err(field_error(field, value));
            }
            Ok(degrees)
        }
        other => Err(field_error(field, other)),
    }
}

fn field_error(field: &'static str, value: Option<&RawValue>) -> TrafficError {
    TrafficError::Field {
        field,
        value: value.map(ToString::to_string).unwrap_or_else(|| "<missing>".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::FormatError;

    #[test]
    fn deserializes_strings_and_numbers() {
        let json = r#"{"CN":"DC1","latitude":"45.30.500N","longitude":"7.00.000E",
            "altitude":"1234.5","heading":270,"speed":"31.2","vario":-0.8,"extra":true}"#;
        let entry: AircraftSnapshotEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.identifier(), "DC1");
        let position = entry.position().unwrap();
        assert!((position.latitude_deg - 45.508333).abs() < 1e-9);
        assert_eq!(position.altitude, 1234.5);
        assert_eq!(entry.track(), 270);
        assert_eq!(entry.raw_speed().unwrap().to_string(), "31.2");
        assert_eq!(entry.raw_vario().unwrap().to_string(), "-0.8");
    }

    #[test]
    fn missing_and_null_keys_are_tolerated() {
        let entry: AircraftSnapshotEntry =
            serde_json::from_str(r#"{"CN":"X","latitude":null}"#).unwrap();
        assert_eq!(
            entry.position(),
            Err(TrafficError::Field {
                field: "latitude",
                value: "<missing>".into()
            })
        );
        assert_eq!(entry.track(), 0);
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let entry = AircraftSnapshotEntry::new("XX", "95.00.000N", "7.00.000E", 100.0);
        assert_eq!(
            entry.position(),
            Err(TrafficError::Field {
                field: "latitude",
                value: "95.00.000N".into()
            })
        );

        let entry = AircraftSnapshotEntry::new("XX", "45.00.000N", "180.30.000W", 100.0);
        assert!(matches!(
            entry.position(),
            Err(TrafficError::Field {
                field: "longitude",
                ..
            })
        ));

        let edge = AircraftSnapshotEntry::new("XX", "90.00.000S", "180.00.000E", 100.0);
        let position = edge.position().unwrap();
        assert_eq!(position.latitude_deg, -90.0);
        assert_eq!(position.longitude_deg, 180.0);
    }

    #[test]
    fn malformed_coordinate_reports_field() {
        let entry = AircraftSnapshotEntry::new("A1", "45.30N", "7.00.000E", 100.0);
        assert_eq!(
            entry.position(),
            Err(TrafficError::Coordinate {
                field: "latitude",
                source: FormatError::FieldCount(2)
            })
        );
    }

    #[test]
    fn unparseable_heading_defaults_to_zero() {
        let entry = AircraftSnapshotEntry::new("A1", "45.30.000N", "7.00.000E", 100.0)
            .with_motion("n/a", 20.0, 0.5);
        assert_eq!(entry.track(), 0);

        let entry = entry.with_motion(" 182 ", 20.0, 0.5);
        assert_eq!(entry.track(), 182);
    }
}
