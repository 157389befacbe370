//! Typed error handling for the blog API
//!
//! Every failure that can reach a client is a [`BlogError`]. Handlers return
//! `BlogResult<T>` and the error is turned into a structured JSON response at
//! the API boundary.
//!
//! # Error Categories
//!
//! - [`ArticleError`]: article lookups and slug uniqueness
//! - [`UserError`]: user lookups
//! - [`ValidationError`]: request payload validation
//! - [`RequestError`]: authentication and authorization
//! - [`StorageError`]: storage backend failures
//! - [`ConfigError`]: configuration loading
//!
//! # Example
//!
//! ```rust,ignore
//! match service.create(article).await {
//!     Ok(created) => println!("created {}", created.slug),
//!     Err(BlogError::Article(ArticleError::SlugTaken { slug })) => {
//!         println!("slug {} is already used", slug);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Realm advertised in `WWW-Authenticate` challenges
pub const AUTH_REALM: &str = "api";

/// The main error type of the blog API
#[derive(Debug, Error)]
pub enum BlogError {
    #[error(transparent)]
    Article(#[from] ArticleError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Should not happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl BlogError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BlogError::Article(e) => e.status_code(),
            BlogError::User(_) => StatusCode::NOT_FOUND,
            BlogError::Validation(_) => StatusCode::BAD_REQUEST,
            BlogError::Request(e) => e.status_code(),
            BlogError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BlogError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BlogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BlogError::Article(e) => e.error_code(),
            BlogError::User(_) => "USER_NOT_FOUND",
            BlogError::Validation(_) => "VALIDATION_ERROR",
            BlogError::Request(e) => e.error_code(),
            BlogError::Storage(_) => "STORAGE_ERROR",
            BlogError::Config(_) => "CONFIG_ERROR",
            BlogError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response body
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            BlogError::Article(ArticleError::NotFound { slug })
            | BlogError::Article(ArticleError::SlugTaken { slug }) => {
                Some(serde_json::json!({ "slug": slug }))
            }
            BlogError::User(UserError::NotFound { id }) => Some(serde_json::json!({ "id": id })),
            BlogError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            BlogError::Validation(ValidationError::FieldError { field, message }) => {
                Some(serde_json::json!({ "fields": [{ "field": field, "message": message }] }))
            }
            _ => None,
        }
    }

    /// Shorthand for a single-field validation failure
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        BlogError::Validation(ValidationError::FieldError {
            field: field.into(),
            message: message.into(),
        })
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let challenge = matches!(
            self,
            BlogError::Request(RequestError::Unauthorized { .. })
        );
        let mut response = (status, Json(self.to_response())).into_response();
        if challenge {
            let value = format!("Basic realm=\"{}\"", AUTH_REALM);
            if let Ok(value) = HeaderValue::from_str(&value) {
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, value);
            }
        }
        response
    }
}

// =============================================================================
// Article Errors
// =============================================================================

/// Errors related to article operations
#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("article with slug '{slug}' not found")]
    NotFound { slug: String },

    /// Slug uniqueness violation reported by the store
    #[error("article with slug '{slug}' already exists")]
    SlugTaken { slug: String },
}

impl ArticleError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ArticleError::NotFound { .. } => StatusCode::NOT_FOUND,
            ArticleError::SlugTaken { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ArticleError::NotFound { .. } => "ARTICLE_NOT_FOUND",
            ArticleError::SlugTaken { .. } => "SLUG_ALREADY_EXISTS",
        }
    }
}

// =============================================================================
// User Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user with id '{id}' not found")]
    NotFound { id: i64 },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Validation error for field '{field}': {message}")]
    FieldError { field: String, message: String },

    #[error("Validation errors: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Invalid identifier: {value}")]
    InvalidId { value: String },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldValidationError {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                })
            })
            .collect();
        // field_errors() is backed by a HashMap
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for BlogError {
    fn from(errors: validator::ValidationErrors) -> Self {
        BlogError::Validation(errors.into())
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Authentication and authorization failures
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden { .. } => StatusCode::FORBIDDEN,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::Forbidden { .. } => "FORBIDDEN",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to connect to {backend}: {message}")]
    ConnectionError { backend: String, message: String },

    #[error("{backend} query error: {message}")]
    QueryError { backend: String, message: String },

    #[error("Storage lock poisoned: {message}")]
    LockPoisoned { message: String },
}

// =============================================================================
// Config Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for blog operations
pub type BlogResult<T> = Result<T, BlogError>;
