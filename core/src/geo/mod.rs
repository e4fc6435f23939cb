pub mod alarm;
pub mod coordinate;
pub mod relative;

pub use alarm::classify;
pub use coordinate::{decode, encode, feet_to_meters, knots_to_mps, Axis};
pub use relative::{haversine_distance, initial_bearing, relative, EARTH_RADIUS_M};
