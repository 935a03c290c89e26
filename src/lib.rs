pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::gemini::GeminiClient;
pub use config::{EnvConfig, TomlConfig};
pub use core::engine::LifeCodeEngine;
pub use domain::model::{AnalysisReport, AnalysisRequest, Language, WorldAnalysis};
pub use utils::error::{LifeCodeError, Result};
