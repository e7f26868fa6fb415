pub mod args;
pub mod model;
pub mod source;
pub mod utils;
