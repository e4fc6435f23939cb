pub mod scenario;

pub use scenario::{ScenarioConfig, SyntheticSource};
