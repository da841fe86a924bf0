//! Centralized error types for ShoreSquad.
//!
//! Every crate keeps its own error enum; the UI layer maps them into
//! [`AppError`] so the page can pick a user-facing message and decide how to
//! present the failure.

use thiserror::Error;

/// How a failure is presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Blocking notice; the input is left unchanged.
    Validation,
    /// Retry button plus an alternate path (e.g. manual place entry).
    Permission,
    /// Recovered with canned data and only logged.
    Transient,
    /// Generic error panel with a retry button.
    Rendering,
}

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Coordinates could not be obtained. `message` is what the page shows.
    #[error("Location error: {detail}")]
    Location {
        detail: String,
        message: &'static str,
    },

    /// Live weather failed and canned data is shown instead.
    #[error("Weather service error: {0}")]
    Weather(String),

    #[error("Rendering error: {0}")]
    Render(String),

    /// Service-level errors that have no closer mapping.
    #[error("Service error: {0}")]
    Service(String),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the page.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Storage(e) => e.user_message(),
            AppError::Validation(_) => "Please fill in all fields",
            AppError::Location { message, .. } => message,
            AppError::Weather(_) => "Live weather is unavailable; showing sample data.",
            AppError::Render(_) => "Something went wrong while showing this section.",
            AppError::Service(_) => "Something went wrong. Please try again.",
        }
    }

    /// The presentation class of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            AppError::Validation(_) => ErrorClass::Validation,
            AppError::Location { .. } => ErrorClass::Permission,
            AppError::Network(_) | AppError::Weather(_) => ErrorClass::Transient,
            AppError::Render(_) => ErrorClass::Rendering,
            AppError::Storage(_) | AppError::Service(_) => ErrorClass::Rendering,
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Local key-value and cache storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Stored record is corrupt: {0}")]
    Corruption(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::Unavailable(_) => "Local storage is unavailable in this browser.",
            StorageError::Corruption(_) => "Your saved profile could not be read. Please create it again.",
            StorageError::WriteFailed(_) => "Your profile could not be saved. Please try again.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
