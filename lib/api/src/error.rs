//! Error types for the API client.
//!
//! The backend has no structured error codes. Any non-2xx response is a
//! uniform failure; the only detail read from it is an optional `message`
//! (or `error`) field of the JSON body.

use std::fmt;

/// Errors from dashboard API calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS).
    Transport {
        method: &'static str,
        path: String,
        details: String,
    },
    /// The backend answered with a non-success status.
    Status {
        method: &'static str,
        path: String,
        status: u16,
        message: Option<String>,
    },
    /// The response body did not have the expected shape.
    Decode { path: String, details: String },
    /// A request could not be built from the given input.
    InvalidRequest { details: String },
    /// Client configuration is unusable.
    InvalidConfig { details: String },
}

impl ApiError {
    /// Text suitable for a toast: the backend's message when present,
    /// otherwise a generic failure line.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Status { status, .. } => format!("Request failed ({status})"),
            Self::Transport { .. } => "Network error, please try again".to_string(),
            Self::Decode { .. } => "Unexpected response from server".to_string(),
            Self::InvalidRequest { details } | Self::InvalidConfig { details } => details.clone(),
        }
    }

    /// HTTP status of the failure, if the backend answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport {
                method,
                path,
                details,
            } => write!(f, "{method} {path} failed: {details}"),
            Self::Status {
                method,
                path,
                status,
                message,
            } => {
                write!(f, "{method} {path} returned {status}")?;
                if let Some(message) = message {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
            Self::Decode { path, details } => {
                write!(f, "unexpected response from {path}: {details}")
            }
            Self::InvalidRequest { details } => write!(f, "invalid request: {details}"),
            Self::InvalidConfig { details } => write!(f, "invalid api configuration: {details}"),
        }
    }
}

impl std::error::Error for ApiError {}
