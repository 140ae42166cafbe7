//! Error types for TapNex

use thiserror::Error;

/// Error returned when a string does not name one of the four roles
#[derive(Debug, Clone, Error)]
#[error("Role '{value}' not found. Available roles: {}", available_roles.join(", "))]
pub struct UnknownRoleError {
    pub value: String,
    pub available_roles: Vec<String>,
}

/// Failures of the remote `profiles` table (or any other table)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("No row with id '{id}' in '{table}'")]
    NotFound { table: String, id: String },

    #[error("A row with id '{id}' already exists in '{table}'")]
    Duplicate { table: String, id: String },

    #[error("Table '{0}' does not exist")]
    TableMissing(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of an authentication operation that did not succeed
///
/// Returned to callers; the session provider never presents these itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("User already registered: {0}")]
    EmailTaken(String),

    #[error("Invalid email address: '{0}'")]
    InvalidEmail(String),

    #[error("Password should be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("No user logged in")]
    NotSignedIn,

    #[error("Auth service unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported config format '{0}' (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
