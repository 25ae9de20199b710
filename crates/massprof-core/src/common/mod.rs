pub mod config;
pub mod constants;

pub use config::{FitConfig, ModelChoice, ParamEntry, parse_config};
