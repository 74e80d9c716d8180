//! Error types for taskline
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad input, unknown task or account, bad config)
//! - 3: Authentication failed
//! - 4: Operation failed (I/O, file codec)

use thiserror::Error;

/// Exit codes for the taskline CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const AUTH_FAILED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskline operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid username '{0}': must be non-empty and alphanumeric")]
    InvalidUsername(String),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("Invalid priority '{0}': expected High, Medium or Low")]
    InvalidPriority(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Authentication (exit code 3)
    #[error("Invalid username or password")]
    InvalidCredentials,

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidUsername(_)
            | Error::UsernameTaken(_)
            | Error::InvalidPassword(_)
            | Error::AccountNotFound(_)
            | Error::TaskNotFound(_)
            | Error::InvalidDate { .. }
            | Error::InvalidPriority(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            Error::InvalidCredentials => exit_codes::AUTH_FAILED,

            Error::Io(_)
            | Error::Csv(_)
            | Error::Json(_)
            | Error::TomlParse(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Stable category name for JSON output.
    pub fn kind(&self) -> &'static str {
        match self.exit_code() {
            exit_codes::USER_ERROR => "user_error",
            exit_codes::AUTH_FAILED => "auth_failed",
            _ => "operation_failed",
        }
    }

    /// Structured details for JSON error output, when the variant has any.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::InvalidDate { input, reason } => Some(serde_json::json!({
                "input": input,
                "reason": reason,
                "expected": "YYYY-MM-DD hh:mm AM/PM",
            })),
            Error::TaskNotFound(title) => Some(serde_json::json!({ "title": title })),
            Error::UsernameTaken(username) | Error::AccountNotFound(username) => {
                Some(serde_json::json!({ "username": username }))
            }
            _ => None,
        }
    }
}

/// Result type alias for taskline operations
pub type Result<T> = std::result::Result<T, Error>;

/// The `error` object of a JSON error envelope
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
            details: err.details(),
        }
    }
}
