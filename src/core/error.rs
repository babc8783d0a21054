//! Typed error handling for request guards and template registration
//!
//! Guards never return a stringly-typed error: a missing header, cookie,
//! query arg or form field surfaces as [`MissingRequiredFieldError`] so
//! callers can tell it apart from unrelated failures.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: a guard found the request incomplete or wrong
//! - [`RequestError`]: the request was aborted or could not be read
//! - [`ConfigError`]: guard or template configuration could not be loaded
//! - [`TemplateError`]: the template engine rejected its setup
//!
//! # Example
//!
//! ```rust
//! use extras::core::error::{ExtrasError, MissingRequiredFieldError, RequirementKind};
//!
//! let err: ExtrasError = MissingRequiredFieldError::new(
//!     RequirementKind::Header,
//!     vec!["X-Foo".to_string()],
//! )
//! .into();
//!
//! assert_eq!(err.to_string(), "Missing required header(s): ['X-Foo']");
//! assert_eq!(err.error_code(), "MISSING_REQUIRED_FIELD");
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type of the crate
#[derive(Debug)]
pub enum ExtrasError {
    /// A guard rejected the request
    Validation(ValidationError),

    /// The request was aborted or unreadable
    Request(RequestError),

    /// Configuration errors
    Config(ConfigError),

    /// Template engine errors
    Template(TemplateError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ExtrasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtrasError::Validation(e) => write!(f, "{}", e),
            ExtrasError::Request(e) => write!(f, "{}", e),
            ExtrasError::Config(e) => write!(f, "{}", e),
            ExtrasError::Template(e) => write!(f, "{}", e),
            ExtrasError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ExtrasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtrasError::Validation(e) => Some(e),
            ExtrasError::Request(e) => Some(e),
            ExtrasError::Config(e) => Some(e),
            ExtrasError::Template(e) => Some(e),
            ExtrasError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ExtrasError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExtrasError::Validation(_) => StatusCode::BAD_REQUEST,
            ExtrasError::Request(e) => e.status_code(),
            ExtrasError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ExtrasError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ExtrasError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ExtrasError::Validation(e) => e.error_code(),
            ExtrasError::Request(e) => e.error_code(),
            ExtrasError::Config(_) => "CONFIG_ERROR",
            ExtrasError::Template(_) => "TEMPLATE_ERROR",
            ExtrasError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Returns the missing-field error if this is one
    pub fn as_missing_field(&self) -> Option<&MissingRequiredFieldError> {
        match self {
            ExtrasError::Validation(ValidationError::MissingRequired(e)) => Some(e),
            _ => None,
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ExtrasError::Validation(ValidationError::MissingRequired(e)) => {
                Some(serde_json::json!({
                    "kind": e.kind.as_str(),
                    "fields": e.names,
                }))
            }
            ExtrasError::Validation(ValidationError::InvalidValue {
                name,
                expected,
                actual,
            }) => Some(serde_json::json!({
                "param": name,
                "expected": expected,
                "actual": actual,
            })),
            _ => None,
        }
    }
}

/// Missing-item rejections also carry the typed error in the response
/// extensions, where an outer layer can pick it up and re-map the response.
impl IntoResponse for ExtrasError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        let mut response = (status, body).into_response();
        if let Some(missing) = self.as_missing_field() {
            response.extensions_mut().insert(missing.clone());
        }
        response
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Which part of the request a requirement applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    Header,
    Cookie,
    Arg,
    FormField,
}

impl RequirementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementKind::Header => "header",
            RequirementKind::Cookie => "cookie",
            RequirementKind::Arg => "arg",
            RequirementKind::FormField => "form_field",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            RequirementKind::Header => "header(s)",
            RequirementKind::Cookie => "cookie(s)",
            RequirementKind::Arg => "arg(s)",
            RequirementKind::FormField => "form field(s)",
        }
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One or more required request items were absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingRequiredFieldError {
    pub kind: RequirementKind,
    /// Missing names, in the order they were configured
    pub names: Vec<String>,
}

impl MissingRequiredFieldError {
    pub fn new(kind: RequirementKind, names: Vec<String>) -> Self {
        Self { kind, names }
    }
}

impl fmt::Display for MissingRequiredFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self.names.iter().map(|n| format!("'{}'", n)).collect();
        write!(
            f,
            "Missing required {}: [{}]",
            self.kind.label(),
            quoted.join(", ")
        )
    }
}

impl std::error::Error for MissingRequiredFieldError {}

/// Errors raised by request guards
#[derive(Debug)]
pub enum ValidationError {
    /// Required items were absent from the request
    MissingRequired(MissingRequiredFieldError),

    /// A value-checked query argument was absent
    MissingParam { name: String },

    /// A value-checked query argument carried the wrong value
    InvalidValue {
        name: String,
        expected: String,
        actual: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingRequired(e) => write!(f, "{}", e),
            ValidationError::MissingParam { name } => write!(f, "Missing param `{}`", name),
            ValidationError::InvalidValue { name, actual, .. } => {
                write!(f, "Invalid value `{}` for param {}.", actual, name)
            }
        }
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ValidationError::MissingRequired(e) => Some(e),
            _ => None,
        }
    }
}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::MissingRequired(_) => "MISSING_REQUIRED_FIELD",
            ValidationError::MissingParam { .. } => "MISSING_PARAM",
            ValidationError::InvalidValue { .. } => "INVALID_ARGUMENT_VALUE",
        }
    }
}

impl From<ValidationError> for ExtrasError {
    fn from(err: ValidationError) -> Self {
        ExtrasError::Validation(err)
    }
}

impl From<MissingRequiredFieldError> for ExtrasError {
    fn from(err: MissingRequiredFieldError) -> Self {
        ExtrasError::Validation(ValidationError::MissingRequired(err))
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug)]
pub enum RequestError {
    /// Request processing was stopped with an explicit status
    Aborted { status: StatusCode },

    /// The request body could not be buffered or decoded
    UnreadableBody { message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Aborted { status } => write!(f, "Request aborted: {}", status),
            RequestError::UnreadableBody { message } => {
                write!(f, "Unreadable request body: {}", message)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Aborted { status } => *status,
            RequestError::UnreadableBody { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Aborted { .. } => "REQUEST_ABORTED",
            RequestError::UnreadableBody { .. } => "UNREADABLE_BODY",
        }
    }
}

impl From<RequestError> for ExtrasError {
    fn from(err: RequestError) -> Self {
        ExtrasError::Request(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::IoError { message } => write!(f, "IO error: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ExtrasError {
    fn from(err: ConfigError) -> Self {
        ExtrasError::Config(err)
    }
}

// =============================================================================
// Template Errors
// =============================================================================

/// Errors raised while building the template engine
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template engine error: {0}")]
    Engine(#[from] tera::Error),
}

impl From<TemplateError> for ExtrasError {
    fn from(err: TemplateError) -> Self {
        ExtrasError::Template(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<tera::Error> for ExtrasError {
    fn from(err: tera::Error) -> Self {
        ExtrasError::Template(TemplateError::Engine(err))
    }
}

impl From<std::io::Error> for ExtrasError {
    fn from(err: std::io::Error) -> Self {
        ExtrasError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for ExtrasError {
    fn from(err: serde_yaml::Error) -> Self {
        ExtrasError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

/// Convert from anyhow::Error for callers mixing both styles
impl From<anyhow::Error> for ExtrasError {
    fn from(err: anyhow::Error) -> Self {
        ExtrasError::Internal(err.to_string())
    }
}

/// A specialized Result type for this crate
pub type ExtrasResult<T> = Result<T, ExtrasError>;
