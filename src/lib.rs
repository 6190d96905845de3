pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LocalStorage;
pub use config::{Defaults, EnvSnapshot, Flags, Settings};
pub use self::core::{engine::TalksEngine, pipeline::SchedPipeline, pipeline::SystemClock};
pub use utils::error::{Result, TalksError};
