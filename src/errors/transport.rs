use thiserror::Error;

use super::{AppError, ConfigError};

/// Failures reported by a `WebDAVTransport` implementation
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{method} {path} failed with status {status}: {message}")]
    Http {
        method: String,
        path: String,
        status: u16,
        message: String,
    },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("XML parsing error: {0}")]
    Xml(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Stream error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    pub fn http<M: Into<String>, P: Into<String>>(
        method: M,
        path: P,
        status: reqwest::StatusCode,
        message: String,
    ) -> Self {
        Self::Http {
            method: method.into(),
            path: path.into(),
            status: status.as_u16(),
            message,
        }
    }

    /// HTTP status of the failed request, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            TransportError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl AppError for TransportError {
    fn error_code(&self) -> &'static str {
        match self {
            TransportError::Http { status: 401, .. } | TransportError::Http { status: 403, .. } => {
                "TRANSPORT_AUTH_FAILED"
            }
            TransportError::Http { status: 404, .. } => "TRANSPORT_NOT_FOUND",
            TransportError::Http { .. } => "TRANSPORT_HTTP_ERROR",
            TransportError::Request(_) => "TRANSPORT_REQUEST_FAILED",
            TransportError::Xml(_) => "TRANSPORT_INVALID_XML",
            TransportError::InvalidUrl(_) => "TRANSPORT_INVALID_URL",
            TransportError::Config(_) => "TRANSPORT_CONFIG_INVALID",
            TransportError::Io(_) => "TRANSPORT_STREAM_ERROR",
        }
    }

    fn user_message(&self) -> String {
        match self {
            TransportError::Http { status: 401, .. } | TransportError::Http { status: 403, .. } => {
                "Authentication failed - please check credentials".to_string()
            }
            TransportError::Http { status: 404, .. } => "File or folder not found".to_string(),
            TransportError::Http { .. } => "Server returned an error".to_string(),
            TransportError::Request(_) => "Unable to reach the cloud storage".to_string(),
            TransportError::Xml(_) => "Server sent an unreadable listing".to_string(),
            TransportError::InvalidUrl(_) | TransportError::Config(_) => {
                "Invalid cloud storage configuration".to_string()
            }
            TransportError::Io(_) => "Failed to read file content".to_string(),
        }
    }

    fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    fn suggested_action(&self) -> Option<String> {
        match self {
            TransportError::Http { status: 401, .. } => Some(
                "Mail.Ru Cloud requires an application password, not the account password"
                    .to_string(),
            ),
            _ => None,
        }
    }
}
