//! Error types for talking to the record API.

use thiserror::Error;

/// Result type alias for record API operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Everything that can go wrong between the views and the backend.
///
/// Views never show these directly; each view maps any variant to its own
/// static message.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The backend answered with a non-success status
    #[error("{method} {url} returned status {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },

    /// The response body did not have the expected shape
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// The configured base URL cannot be used
    #[error("invalid API configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub fn transport(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            url: url.into(),
            message: err.to_string(),
        }
    }

    pub fn decode(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            url: url.into(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = ApiError::Status {
            method: "PUT",
            url: "http://localhost:3000/api/interpretations/1".to_string(),
            status: 404,
        };

        assert_eq!(
            err.to_string(),
            "PUT http://localhost:3000/api/interpretations/1 returned status 404"
        );
    }
}
