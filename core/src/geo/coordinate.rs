use crate::prelude::FormatError;

const FEET_TO_METERS: f64 = 0.3048;
const KNOTS_TO_MPS: f64 = 0.514444;

/// Which hemisphere letters apply when encoding a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

/// Decodes a Condor `DD.MM.mmmH` coordinate into signed decimal degrees.
///
/// The three dot-separated integers are degrees, minutes and thousandths of a
/// minute. `S` and `W` yield negative values. The result is rounded to six
/// decimal places.
pub fn decode(coord: &str) -> Result<f64, FormatError> {
    let hemisphere = coord.chars().last().ok_or(FormatError::Empty)?;
    let negative = match hemisphere {
        'N' | 'E' => false,
        'S' | 'W' => true,
        other => return Err(FormatError::Hemisphere(other)),
    };

    let body = &coord[..coord.len() - hemisphere.len_utf8()];
    let fields: Vec<&str> = body.split('.').collect();
    if fields.len() != 3 {
        return Err(FormatError::FieldCount(fields.len()));
    }

    let degrees = parse_field(fields[0])?;
    let minutes = parse_field(fields[1])?;
    let milli_minutes = parse_field(fields[2])?;

    let magnitude = degrees as f64 + (minutes as f64 + milli_minutes as f64 / 1000.0) / 60.0;
    let signed = if negative { -magnitude } else { magnitude };
    Ok(round6(signed))
}

/// Encodes signed decimal degrees back into the `DD.MM.mmmH` form.
pub fn encode(value_deg: f64, axis: Axis) -> String {
    let hemisphere = match (axis, value_deg < 0.0) {
        (Axis::Latitude, false) => 'N',
        (Axis::Latitude, true) => 'S',
        (Axis::Longitude, false) => 'E',
        (Axis::Longitude, true) => 'W',
    };

    let magnitude = value_deg.abs();
    let mut degrees = magnitude.trunc() as i64;
    let mut milli_total = ((magnitude - degrees as f64) * 60_000.0).round() as i64;
    if milli_total >= 60_000 {
        degrees += 1;
        milli_total -= 60_000;
    }

    format!(
        "{}.{:02}.{:03}{}",
        degrees,
        milli_total / 1000,
        milli_total % 1000,
        hemisphere
    )
}

pub fn feet_to_meters(feet: f64) -> f64 {
    feet * FEET_TO_METERS
}

/// Converts knots to meters per second, rounded to one decimal.
pub fn knots_to_mps(knots: f64) -> f64 {
    (knots * KNOTS_TO_MPS * 10.0).round() / 10.0
}

fn parse_field(field: &str) -> Result<i64, FormatError> {
    field
        .trim()
        .parse::<i64>()
        .map_err(|_| FormatError::NonNumeric(field.to_string()))
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_degrees_minutes_and_thousandths() {
        let value = decode("45.30.500N").unwrap();
        assert!((value - 45.508333).abs() < 1e-6);
    }

    #[test]
    fn southern_and_western_hemispheres_are_negative() {
        assert!((decode("33.52.200S").unwrap() + 33.870_000).abs() < 1e-6);
        assert!((decode("151.12.600W").unwrap() + 151.21).abs() < 1e-6);
        assert!((decode("7.00.000E").unwrap() - 7.0).abs() < 1e-9);
        assert!(decode("0.00.000W").unwrap().abs() < 1e-9);
    }

    #[test]
    fn rejects_missing_hemisphere() {
        assert_eq!(decode("45.30.500"), Err(FormatError::Hemisphere('0')));
        assert_eq!(decode("45.30.500n"), Err(FormatError::Hemisphere('n')));
        assert_eq!(decode(""), Err(FormatError::Empty));
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(decode("45.30N"), Err(FormatError::FieldCount(2)));
        assert_eq!(decode("45.30.500.1N"), Err(FormatError::FieldCount(4)));
    }

    #[test]
    fn rejects_non_numeric_fields() {
        assert_eq!(
            decode("45.3x.500N"),
            Err(FormatError::NonNumeric("3x".into()))
        );
        assert!(decode("..N").is_err());
    }

    #[test]
    fn encode_is_inverse_of_decode() {
        for (value, axis) in [
            (45.508333, Axis::Latitude),
            (-12.25, Axis::Latitude),
            (7.000015, Axis::Longitude),
            (-122.999999, Axis::Longitude),
        ] {
            let text = encode(value, axis);
            let decoded = decode(&text).unwrap();
            // one thousandth of a minute is ~1.7e-5 degrees
            assert!((decoded - value).abs() < 1e-5, "{text} -> {decoded}");
        }
        assert_eq!(encode(45.508333, Axis::Latitude), "45.30.500N");
        assert_eq!(encode(-0.5, Axis::Longitude), "0.30.000W");
    }

    #[test]
    fn unit_helpers_convert() {
        assert!((feet_to_meters(1000.0) - 304.8).abs() < 1e-9);
        assert_eq!(knots_to_mps(100.0), 51.4);
    }
}
