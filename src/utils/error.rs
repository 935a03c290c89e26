use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifeCodeError {
    #[error("Invalid date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("Lunar conversion failed for '{date}': {reason}")]
    LunarConversion { date: String, reason: String },

    #[error("Narrative service error: {message}")]
    NarrativeService { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

pub type Result<T> = std::result::Result<T, LifeCodeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller supplied a bad date or an inconsistent request.
    Input,
    /// Text-generation collaborator failed.
    Narrative,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LifeCodeError {
    pub fn invalid_date(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn lunar(date: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LunarConversion {
            date: date.into(),
            reason: reason.into(),
        }
    }

    pub fn narrative(message: impl Into<String>) -> Self {
        Self::NarrativeService {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDate { .. }
            | Self::LunarConversion { .. }
            | Self::ValidationError { .. } => ErrorCategory::Input,
            Self::NarrativeService { .. } | Self::ApiError(_) => ErrorCategory::Narrative,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Narrative => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::InvalidDate { .. } => {
                "Use the YYYY-MM-DD format with a date that exists in the Gregorian calendar"
                    .to_string()
            }
            Self::LunarConversion { .. } => {
                "Lunar dates are supported for lunar years 1900 to 2100 (Gregorian 1900-01-31 to 2101-01-28); check the month length and leap-month flag"
                    .to_string()
            }
            Self::NarrativeService { .. } | Self::ApiError(_) => {
                "Check the API key and endpoint, or run without the narrative".to_string()
            }
            Self::ValidationError { .. } => {
                "Provide either birth_date, or thai_dob and/or chinese_dob".to_string()
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Review the configuration file and environment variables".to_string()
            }
            Self::IoError(_) => "Check file paths and permissions".to_string(),
            Self::SerializationError(_) => "Report this as a bug".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("The birth date could not be analysed: {}", self),
            ErrorCategory::Narrative => format!("The narrative could not be generated: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::System => format!("An internal error occurred: {}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_errors_are_fatal_input_errors() {
        let err = LifeCodeError::invalid_date("1990-02-30", "day out of range");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("1990-02-30"));

        let err = LifeCodeError::lunar("2150-01-01", "outside table");
        assert_eq!(err.category(), ErrorCategory::Input);
    }

    #[test]
    fn test_narrative_errors_are_medium_severity() {
        let err = LifeCodeError::narrative("quota exceeded");
        assert_eq!(err.category(), ErrorCategory::Narrative);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("quota exceeded"));
    }
}
