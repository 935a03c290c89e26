use crate::config::{
    validate_provider, API_KEY_ENV, DEFAULT_BUDGET_SECONDS, DEFAULT_NARRATIVE_ENDPOINT,
    DEFAULT_NARRATIVE_MODEL, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_SECONDS,
    DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::ConfigProvider;
use crate::domain::model::{AnalysisRequest, Language};
use crate::utils::error::{LifeCodeError, Result};
use crate::utils::validation::Validate;
use clap::{Parser, ValueEnum};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Board,
}

#[derive(Clone, Parser)]
#[command(name = "life-code")]
#[command(about = "Life code numerology matrix from Thai and Chinese calendar birth dates")]
pub struct CliConfig {
    /// Gregorian birth date (YYYY-MM-DD); both calendar dates are derived from it
    #[arg(short, long)]
    pub date: Option<String>,

    /// Thai calendar birth date (YYYY-MM-DD, Gregorian year)
    #[arg(long)]
    pub thai_dob: Option<String>,

    /// Chinese lunar birth date (YYYY-MM-DD, lunar month and day)
    #[arg(long)]
    pub chinese_dob: Option<String>,

    /// The Chinese date falls in that year's leap month
    #[arg(long)]
    pub chinese_leap_month: bool,

    /// Narrative language (defaults to the config file, then th)
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Path to TOML configuration file; replaces the narrative flags below
    #[arg(short, long)]
    pub config: Option<String>,

    /// Skip the narrative and print numbers only
    #[arg(long)]
    pub no_narrative: bool,

    /// Narrative API key (falls back to GEMINI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_NARRATIVE_ENDPOINT)]
    pub endpoint: String,

    #[arg(long, default_value = DEFAULT_NARRATIVE_MODEL)]
    pub model: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, default_value_t = DEFAULT_RETRY_ATTEMPTS)]
    pub retry_attempts: u32,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Fills the API key from the environment when no flag was given.
    pub fn with_env_api_key(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = std::env::var(API_KEY_ENV)
                .ok()
                .filter(|k| !k.trim().is_empty());
        }
        self
    }

    pub fn to_request(&self, default_language: Language) -> AnalysisRequest {
        AnalysisRequest {
            birth_date: self.date.clone(),
            thai_dob: self.thai_dob.clone(),
            chinese_dob: self.chinese_dob.clone(),
            chinese_leap_month: self.chinese_leap_month,
            language: self.language.unwrap_or(default_language),
            // The configured key is used by the client itself.
            api_key: None,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn narrative_enabled(&self) -> bool {
        !self.no_narrative
    }

    fn narrative_endpoint(&self) -> &str {
        &self.endpoint
    }

    fn narrative_model(&self) -> &str {
        &self.model
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
        Duration::from_secs(DEFAULT_RETRY_DELAY_SECONDS)
    }

    fn narrative_budget(&self) -> Duration {
        Duration::from_secs(DEFAULT_BUDGET_SECONDS.max(self.timeout_seconds))
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.date.is_none() && self.thai_dob.is_none() && self.chinese_dob.is_none() {
            return Err(LifeCodeError::MissingConfigError {
                field: "--date, --thai-dob or --chinese-dob".to_string(),
            });
        }
        validate_provider("--", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_birth_date_args() {
        let config =
            CliConfig::try_parse_from(["life-code", "--date", "1990-05-15", "-l", "en"]).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.narrative_enabled());
        assert_eq!(config.narrative_model(), DEFAULT_NARRATIVE_MODEL);

        let request = config.to_request(Language::Th);
        assert_eq!(request.birth_date.as_deref(), Some("1990-05-15"));
        assert_eq!(request.language, Language::En);
    }

    #[test]
    fn test_parse_explicit_dates() {
        let config = CliConfig::try_parse_from([
            "life-code",
            "--thai-dob",
            "1990-05-15",
            "--chinese-dob",
            "1990-04-21",
            "--no-narrative",
            "--format",
            "board",
        ])
        .unwrap();

        assert!(!config.narrative_enabled());
        assert_eq!(config.format, OutputFormat::Board);
        let request = config.to_request(Language::En);
        assert_eq!(request.language, Language::En);
        assert_eq!(request.chinese_dob.as_deref(), Some("1990-04-21"));
    }

    #[test]
    fn test_validation_requires_a_date() {
        let config = CliConfig::try_parse_from(["life-code"]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(LifeCodeError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_bad_endpoint() {
        let config = CliConfig::try_parse_from([
            "life-code",
            "--date",
            "1990-05-15",
            "--endpoint",
            "not a url",
        ])
        .unwrap();
        assert!(config.validate().is_err());
    }
}
