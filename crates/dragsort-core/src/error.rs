#![forbid(unsafe_code)]

//! Error types.
//!
//! The drag machinery itself never fails: missing geometry degrades to a
//! no-op. Only configuration loading and validation can produce errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating a [`ReorderConfig`](crate::config::ReorderConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_joins_entries() {
        let err = ConfigError::Validation(vec!["a must be > 0".into(), "b too big".into()]);
        assert_eq!(err.to_string(), "validation errors: a must be > 0; b too big");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ConfigError = io.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
