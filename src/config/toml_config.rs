use crate::config::{
    validate_provider, DEFAULT_BIND_ADDRESS, DEFAULT_BUDGET_SECONDS, DEFAULT_NARRATIVE_ENDPOINT,
    DEFAULT_NARRATIVE_MODEL, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_SECONDS,
    DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::ConfigProvider;
use crate::domain::model::Language;
use crate::utils::error::{LifeCodeError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub narrative: NarrativeConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub server: Option<ServerConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NarrativeConfig {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
    pub budget_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub default_language: Option<Language>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LifeCodeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LifeCodeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LifeCodeError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_provider("narrative.", self)?;

        if let Some(server) = &self.server {
            crate::utils::validation::validate_socket_addr(
                "server.bind_address",
                &server.bind_address,
            )?;
        }

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level) {
                return Err(LifeCodeError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }

    pub fn default_language(&self) -> Language {
        self.analysis.default_language.unwrap_or_default()
    }

    pub fn bind_address(&self) -> &str {
        self.server
            .as_ref()
            .map(|s| s.bind_address.as_str())
            .unwrap_or(DEFAULT_BIND_ADDRESS)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(true)
    }
}

impl ConfigProvider for TomlConfig {
    fn narrative_enabled(&self) -> bool {
        self.narrative.enabled.unwrap_or(true)
    }

    fn narrative_endpoint(&self) -> &str {
        self.narrative
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_NARRATIVE_ENDPOINT)
    }

    fn narrative_model(&self) -> &str {
        self.narrative
            .model
            .as_deref()
            .unwrap_or(DEFAULT_NARRATIVE_MODEL)
    }

    fn api_key(&self) -> Option<&str> {
        // An unresolved ${VAR} placeholder means the variable was not set.
        self.narrative
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty() && !k.starts_with("${"))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.narrative
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    fn retry_attempts(&self) -> u32 {
        self.narrative
            .retry_attempts
            .unwrap_or(DEFAULT_RETRY_ATTEMPTS)
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_secs(
            self.narrative
                .retry_delay_seconds
                .unwrap_or(DEFAULT_RETRY_DELAY_SECONDS),
        )
    }

    fn narrative_budget(&self) -> Duration {
        Duration::from_secs(self.narrative.budget_seconds.unwrap_or(DEFAULT_BUDGET_SECONDS))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[narrative]
enabled = true
endpoint = "https://narrative.example.com/"
model = "test-model"
api_key = "abc"
timeout_seconds = 30
retry_attempts = 1
retry_delay_seconds = 1
budget_seconds = 45

[analysis]
default_language = "en"

[server]
bind_address = "127.0.0.1:9000"

[logging]
level = "debug"
json = false
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.narrative_endpoint(), "https://narrative.example.com/");
        assert_eq!(config.narrative_model(), "test-model");
        assert_eq!(config.api_key(), Some("abc"));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_attempts(), 1);
        assert_eq!(config.narrative_budget(), Duration::from_secs(45));
        assert_eq!(config.default_language(), Language::En);
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.log_level(), Some("debug"));
        assert!(!config.json_logs());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert!(config.validate().is_ok());
        assert!(config.narrative_enabled());
        assert_eq!(config.narrative_endpoint(), DEFAULT_NARRATIVE_ENDPOINT);
        assert_eq!(config.narrative_model(), DEFAULT_NARRATIVE_MODEL);
        assert_eq!(config.api_key(), None);
        assert_eq!(config.retry_attempts(), DEFAULT_RETRY_ATTEMPTS);
        assert_eq!(config.default_language(), Language::Th);
        assert_eq!(config.bind_address(), DEFAULT_BIND_ADDRESS);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LIFE_CODE_TEST_API_KEY", "from-env");

        let toml_content = r#"
[narrative]
api_key = "${LIFE_CODE_TEST_API_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), Some("from-env"));

        std::env::remove_var("LIFE_CODE_TEST_API_KEY");
    }

    #[test]
    fn test_unresolved_placeholder_is_no_key() {
        let toml_content = r#"
[narrative]
api_key = "${LIFE_CODE_TEST_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_config_validation() {
        let bad_endpoint = TomlConfig::from_toml_str("[narrative]\nendpoint = \"invalid-url\"\n").unwrap();
        assert!(bad_endpoint.validate().is_err());

        let bad_retries = TomlConfig::from_toml_str("[narrative]\nretry_attempts = 50\n").unwrap();
        assert!(bad_retries.validate().is_err());

        let bad_level = TomlConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(bad_level.validate().is_err());

        let bad_bind = TomlConfig::from_toml_str("[server]\nbind_address = \"nowhere\"\n").unwrap();
        assert!(bad_bind.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = TomlConfig::from_toml_str("[narrative\nenabled = ").unwrap_err();
        assert!(matches!(err, LifeCodeError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[narrative]
enabled = false
model = "file-model"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert!(!config.narrative_enabled());
        assert_eq!(config.narrative_model(), "file-model");
    }
}
