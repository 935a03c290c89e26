#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use env::EnvConfig;
pub use toml_config::TomlConfig;

pub const DEFAULT_NARRATIVE_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_NARRATIVE_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 2;
pub const DEFAULT_RETRY_DELAY_SECONDS: u64 = 2;
pub const DEFAULT_BUDGET_SECONDS: u64 = 120;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Checks shared by every `ConfigProvider`.
pub(crate) fn validate_provider<C: crate::domain::ports::ConfigProvider + ?Sized>(
    prefix: &str,
    config: &C,
) -> crate::utils::error::Result<()> {
    use crate::utils::validation::*;

    validate_url(&format!("{}endpoint", prefix), config.narrative_endpoint())?;
    validate_non_empty_string(&format!("{}model", prefix), config.narrative_model())?;
    validate_positive_number(
        &format!("{}timeout_seconds", prefix),
        config.request_timeout().as_secs(),
        1,
    )?;
    validate_range(
        &format!("{}retry_attempts", prefix),
        config.retry_attempts(),
        0,
        10,
    )?;
    validate_positive_number(
        &format!("{}budget_seconds", prefix),
        config.narrative_budget().as_secs(),
        1,
    )?;
    Ok(())
}
