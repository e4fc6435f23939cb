use crate::prelude::AlarmLevel;

const IMPORTANT_VERTICAL_M: f64 = 50.0;
const IMPORTANT_RADIUS_M: f64 = 100.0;
const LOW_VERTICAL_M: f64 = 100.0;
const LOW_RADIUS_M: f64 = 400.0;

/// Classifies a relative offset into a proximity alarm level.
pub fn classify(vertical: i64, east: i64, north: i64) -> AlarmLevel {
    let vertical = (vertical as f64).abs();
    let radius = (east as f64).hypot(north as f64);

    if vertical < IMPORTANT_VERTICAL_M && radius < IMPORTANT_RADIUS_M {
        AlarmLevel::Important
    } else if vertical < LOW_VERTICAL_M && radius < LOW_RADIUS_M {
        AlarmLevel::Low
    } else {
        AlarmLevel::None
    }
}
