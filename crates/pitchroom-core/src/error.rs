//! Validation errors for boundary-checked configuration.

use thiserror::Error;

/// Result type alias for core validation.
pub type CoreResult<T> = Result<T, ConfigError>;

/// Errors raised by boundary validation of configuration values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("missing configuration: {0}")]
    Missing(String),
}
