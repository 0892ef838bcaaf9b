//! Error types for the shelltex client.
//!
//! This module defines the centralized error type [`ShelltexError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Field validation failures and generation failures are deliberately absent here:
//! a rejected field is a [`ValidationResult`](crate::domain::ValidationResult) and a
//! failed request is a [`GenerationOutcome`](crate::domain::GenerationOutcome). Both
//! are ordinary values the workflow reports to the user.

use thiserror::Error;

/// The main error type for shelltex operations.
///
/// # Examples
///
/// ```
/// use shelltex::ShelltexError;
///
/// fn check_endpoint(endpoint: &str) -> Result<(), ShelltexError> {
///     if endpoint.is_empty() {
///         return Err(ShelltexError::Config("endpoint must not be empty".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(check_endpoint("").is_err());
/// ```
#[derive(Debug, Error)]
pub enum ShelltexError {
    /// Configuration is invalid or missing.
    ///
    /// Occurs when required configuration values are missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations, e.g. reading a
    /// configuration file or the interactive driver's stdin.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP client could not be constructed.
    ///
    /// Request-level failures never surface here; the submitter folds them
    /// into a failed generation outcome.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Input text could not be interpreted.
    ///
    /// Covers unknown parameter names and malformed configuration files.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<toml::de::Error> for ShelltexError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// A specialized `Result` type for shelltex operations.
pub type Result<T> = std::result::Result<T, ShelltexError>;
