use thiserror::Error;

use crate::domain::errors::DashboardError;

/// Errors that can occur when talking to the task store API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed request (400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Credential missing, expired or not allowed (401, 403)
    #[error("Authorization denied: {0}")]
    Unauthorized(String),

    /// Resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// API server encountered an internal error (5xx)
    #[error("API server error: {0}")]
    ServerError(String),

    /// Network error occurred during request
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Unknown error occurred
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ApiError {
    /// Map an HTTP status code and response body to an error variant.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 => Self::InvalidRequest(body),
            401 | 403 => Self::Unauthorized(body),
            404 => Self::NotFound(body),
            500..=599 => Self::ServerError(body),
            _ => Self::Unknown(format!("HTTP {status}: {body}")),
        }
    }

    /// Whether the server rejected the credential.
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// The `error` field of a JSON error body, when there is one.
    pub fn server_message(&self) -> Option<String> {
        let body = match self {
            Self::InvalidRequest(body)
            | Self::Unauthorized(body)
            | Self::NotFound(body)
            | Self::ServerError(body) => body,
            _ => return None,
        };
        serde_json::from_str::<serde_json::Value>(body)
            .ok()?
            .get("error")?
            .as_str()
            .map(str::to_string)
    }
}

impl From<ApiError> for DashboardError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized(_) => {
                let message = err
                    .server_message()
                    .unwrap_or_else(|| "credential rejected".to_string());
                Self::AuthDenied(message)
            }
            other => Self::FetchFailed(other.to_string()),
        }
    }
}
