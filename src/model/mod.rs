pub mod constants;
pub mod ranking;
pub mod score_value;
pub mod structures;
pub mod trend;
