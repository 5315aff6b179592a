//! Error types for medsafe.
//!
//! This module provides a unified error type with explicit variants for
//! transport, backend, authentication, storage and input validation errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for medsafe operations.
///
/// Every failure the client can report maps to one of these variants so
/// callers can tell a dropped connection from a rejected request.
#[derive(Debug, Error)]
pub enum Error {
    /// No response was received (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The backend answered with a non-2xx status.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Local authentication state prevents the operation.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The credential store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A successful response body did not have the expected shape.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// Input validation errors (base URL, header values, file paths).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns the backend error if this is an HTTP status failure.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the HTTP status code, if the backend answered.
    pub fn status(&self) -> Option<u16> {
        self.as_api().map(|e| e.status)
    }

    /// True for a 401 response from the backend.
    pub fn is_unauthorized(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_unauthorized)
    }

    /// True for a 403 response from the backend.
    pub fn is_forbidden(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_forbidden)
    }

    /// Message to show a user: the backend's own message when it sent one,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.as_api()
            .and_then(|e| e.message.clone())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }

    pub(crate) fn decode(err: impl fmt::Display) -> Self {
        Error::Decode {
            message: err.to_string(),
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors raised locally, before or instead of a request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credential is stored.
    #[error("not logged in")]
    NotLoggedIn,

    /// A refresh was requested but no refresh token is stored.
    #[error("no refresh token available")]
    RefreshTokenMissing,
}

/// A non-2xx response from the backend.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Backend error code (if present).
    pub error: Option<String>,
    /// Human-readable message from the backend (if present).
    pub message: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// 401: the credential is missing or no longer accepted.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// 403: authenticated but not allowed. Never handled by the client itself.
    pub fn is_forbidden(&self) -> bool {
        self.status == 403
    }
}

/// Credential store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Stored data could not be parsed.
    #[error("corrupt credential data: {message}")]
    Corrupt { message: String },

    /// The platform store is unavailable (locked keychain, no secret service).
    #[error("credential store unavailable: {message}")]
    Unavailable { message: String },
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(StorageError::from(err))
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// Header name or value that cannot be sent.
    #[error("invalid header '{name}': {reason}")]
    Header { name: String, reason: String },

    /// Request body that cannot be encoded.
    #[error("invalid request body: {message}")]
    Body { message: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
