//! Binding errors with codes and serializable reports
//!
//! Every failure a binding can produce is a variant of [`BindingError`]:
//! - Static misuse (unrecognized source, unsupported value type)
//! - Runtime data problems (missing value, bad enum name, wrong kind)
//! - Store and configuration I/O
//!
//! Errors are returned to the immediate caller and never retried.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, BindingError>;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Declaration errors (1xxx)
    /// E1001: source is not a known container
    UnrecognizedSourceKind = 1001,
    /// E1002: no adapter for the value type
    UnsupportedValueType = 1002,

    // Value errors (2xxx)
    /// E2001: required value absent
    MissingRequiredValue = 2001,
    /// E2002: stored name is not an enum constant
    EnumDecodeFailure = 2002,
    /// E2003: stored value has the wrong kind
    TypeMismatch = 2003,
    /// E2004: store refused the value
    RejectedValue = 2004,

    // Configuration errors (3xxx)
    /// E3000: invalid configuration value
    ConfigError = 3000,
    /// E3002: malformed TOML
    ConfigParseError = 3002,

    // IO errors (4xxx)
    /// E4001: filesystem failure
    IoError = 4001,
    /// E4002: JSON encode or decode failure
    JsonError = 4002,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "Declaration",
            2 => "Value",
            3 => "Configuration",
            4 => "IO",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Errors raised while declaring, reading or writing a binding.
#[derive(Debug, Error)]
pub enum BindingError {
    /// The source object is none of the container kinds a family understands
    #[error("Unable to find a store on type {type_name}")]
    UnrecognizedSourceKind {
        /// Name of the offending type
        type_name: String,
    },

    /// No adapter is registered for the requested value type
    #[error("Unsupported value type (name = {key}, type = {type_name})")]
    UnsupportedValueType {
        /// Name of the requested type
        type_name: String,
        /// Key the binding was declared for
        key: String,
    },

    /// A required binding found neither a stored value nor a default
    #[error("Key \"{key}\" is missed")]
    MissingRequiredValue {
        /// Key that was read
        key: String,
    },

    /// The stored name is not a constant of the target enumeration
    #[error("\"{value}\" stored under \"{key}\" is not a constant in \"{enum_name}\"")]
    EnumDecodeFailure {
        /// Key that was read
        key: String,
        /// Raw stored value
        value: String,
        /// Name of the enumeration
        enum_name: String,
    },

    /// The stored value has a different kind than the adapter expects
    #[error("Key \"{key}\" expected {expected} but value was {found}")]
    TypeMismatch {
        /// Key that was read
        key: String,
        /// Kind the adapter expected
        expected: String,
        /// Kind actually stored
        found: String,
    },

    /// The store refuses values of this kind
    #[error("{store} cannot hold {kind} values (key = {key})")]
    RejectedValue {
        /// Key that was written
        key: String,
        /// Kind of the rejected value
        kind: String,
        /// Description of the store
        store: String,
    },

    /// Configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BindingError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BindingError::UnrecognizedSourceKind { .. } => ErrorCode::UnrecognizedSourceKind,
            BindingError::UnsupportedValueType { .. } => ErrorCode::UnsupportedValueType,
            BindingError::MissingRequiredValue { .. } => ErrorCode::MissingRequiredValue,
            BindingError::EnumDecodeFailure { .. } => ErrorCode::EnumDecodeFailure,
            BindingError::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            BindingError::RejectedValue { .. } => ErrorCode::RejectedValue,
            BindingError::Config(_) => ErrorCode::ConfigError,
            BindingError::Toml(_) => ErrorCode::ConfigParseError,
            BindingError::Io(_) => ErrorCode::IoError,
            BindingError::Json(_) => ErrorCode::JsonError,
        }
    }

    /// Whether this error signals a programming mistake rather than bad data
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            BindingError::UnrecognizedSourceKind { .. } | BindingError::UnsupportedValueType { .. }
        )
    }

    /// Source of type `T` is not a container this family understands
    pub fn unrecognized_source<T: ?Sized>() -> Self {
        BindingError::UnrecognizedSourceKind {
            type_name: short_type_name::<T>().to_string(),
        }
    }

    /// No adapter for `V` on the binding for `key`
    pub fn unsupported_type<V: ?Sized>(key: &str) -> Self {
        BindingError::UnsupportedValueType {
            type_name: std::any::type_name::<V>().to_string(),
            key: key.to_string(),
        }
    }

    /// Required value absent under `key`
    pub fn missing(key: impl Into<String>) -> Self {
        BindingError::MissingRequiredValue { key: key.into() }
    }

    /// Invalid configuration with a free-form message
    pub fn config(message: impl Into<String>) -> Self {
        BindingError::Config(message.into())
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        let code = self.code();
        ErrorReport {
            code,
            code_str: code.to_string(),
            category: code.category().to_string(),
            message: self.to_string(),
        }
    }
}

/// Serializable error report for logging and API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Typed code
    pub code: ErrorCode,
    /// Code as rendered, e.g. `E2001`
    pub code_str: String,
    /// Category name of the code
    pub category: String,
    /// Display text of the error
    pub message: String,
}

/// Last path segment of a type name, e.g. `Fragment` for `jetpack_arguments::Fragment`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::UnrecognizedSourceKind.to_string(), "E1001");
        assert_eq!(ErrorCode::MissingRequiredValue.to_string(), "E2001");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::UnsupportedValueType.category(), "Declaration");
        assert_eq!(ErrorCode::TypeMismatch.category(), "Value");
        assert_eq!(ErrorCode::ConfigParseError.category(), "Configuration");
        assert_eq!(ErrorCode::IoError.category(), "IO");
    }

    #[test]
    fn test_unrecognized_source_names_type() {
        let err = BindingError::unrecognized_source::<Widget>();
        assert_eq!(err.to_string(), "Unable to find a store on type Widget");
        assert!(err.is_static());
    }

    #[test]
    fn test_missing_value_message() {
        let err = BindingError::missing("count");
        assert_eq!(err.to_string(), "Key \"count\" is missed");
        assert_eq!(err.code(), ErrorCode::MissingRequiredValue);
        assert!(!err.is_static());
    }

    #[test]
    fn test_error_report_serialization() {
        let err = BindingError::unsupported_type::<Widget>("widget");
        let report = err.to_report();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("E1002"));
        assert!(json.contains("Declaration"));
        assert!(json.contains("widget"));
    }
}
