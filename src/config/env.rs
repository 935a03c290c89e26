use crate::config::{
    validate_provider, API_KEY_ENV, DEFAULT_BIND_ADDRESS, DEFAULT_BUDGET_SECONDS,
    DEFAULT_NARRATIVE_ENDPOINT, DEFAULT_NARRATIVE_MODEL, DEFAULT_RETRY_ATTEMPTS,
    DEFAULT_RETRY_DELAY_SECONDS, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::ConfigProvider;
use crate::utils::error::{LifeCodeError, Result};
use crate::utils::validation::Validate;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Settings for the server and Lambda surfaces, read from the environment.
#[derive(Clone)]
pub struct EnvConfig {
    pub narrative_enabled: bool,
    pub narrative_endpoint: String,
    pub narrative_model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_seconds: u64,
    pub budget_seconds: u64,
    pub bind_address: String,
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| LifeCodeError::InvalidConfigValueError {
                field: name.to_string(),
                value: raw.clone(),
                reason: "could not be parsed".to_string(),
            }),
        Err(_) => Ok(default),
    }
}

impl EnvConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            narrative_enabled: parse_var("NARRATIVE_ENABLED", true)?,
            narrative_endpoint: env::var("NARRATIVE_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_NARRATIVE_ENDPOINT.to_string()),
            narrative_model: env::var("NARRATIVE_MODEL")
                .unwrap_or_else(|_| DEFAULT_NARRATIVE_MODEL.to_string()),
            api_key: env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()),
            timeout_seconds: parse_var("NARRATIVE_TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECONDS)?,
            retry_attempts: parse_var("NARRATIVE_RETRY_ATTEMPTS", DEFAULT_RETRY_ATTEMPTS)?,
            retry_delay_seconds: parse_var(
                "NARRATIVE_RETRY_DELAY_SECONDS",
                DEFAULT_RETRY_DELAY_SECONDS,
            )?,
            budget_seconds: parse_var("NARRATIVE_BUDGET_SECONDS", DEFAULT_BUDGET_SECONDS)?,
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
        })
    }
}

impl std::fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvConfig")
            .field("narrative_enabled", &self.narrative_enabled)
            .field("narrative_endpoint", &self.narrative_endpoint)
            .field("narrative_model", &self.narrative_model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("retry_attempts", &self.retry_attempts)
            .field("budget_seconds", &self.budget_seconds)
            .field("bind_address", &self.bind_address)
            .finish()
    }
}

impl ConfigProvider for EnvConfig {
    fn narrative_enabled(&self) -> bool {
        self.narrative_enabled
    }

    fn narrative_endpoint(&self) -> &str {
        &self.narrative_endpoint
    }

    fn narrative_model(&self) -> &str {
        &self.narrative_model
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }

    fn narrative_budget(&self) -> Duration {
        Duration::from_secs(self.budget_seconds)
    }
}

impl Validate for EnvConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::validate_socket_addr;

        validate_provider("NARRATIVE_", self)?;
        validate_socket_addr("BIND_ADDRESS", &self.bind_address)?;

        if self.narrative_enabled && self.api_key.is_none() {
            tracing::warn!(
                "⚠️ {} is not set; requests without their own api_key get no narrative",
                API_KEY_ENV
            );
        }

        tracing::info!("✅ Environment configuration validation passed");
        Ok(())
    }
}
