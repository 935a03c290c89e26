use crate::utils::error::{LifeCodeError, Result};
use std::net::SocketAddr;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(LifeCodeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(LifeCodeError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(LifeCodeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<()> {
    addr.parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|e| LifeCodeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(LifeCodeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LifeCodeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(LifeCodeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("narrative.endpoint", "https://example.com").is_ok());
        assert!(validate_url("narrative.endpoint", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("narrative.endpoint", "").is_err());
        assert!(validate_url("narrative.endpoint", "invalid-url").is_err());
        assert!(validate_url("narrative.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("narrative.timeout_seconds", 5, 1).is_ok());
        assert!(validate_positive_number("narrative.timeout_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_socket_addr() {
        assert!(validate_socket_addr("server.bind_address", "0.0.0.0:8000").is_ok());
        assert!(validate_socket_addr("server.bind_address", "localhost").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("narrative.retry_attempts", 3u32, 0, 10).is_ok());
        assert!(validate_range("narrative.retry_attempts", 11u32, 0, 10).is_err());
    }
}
