use thiserror::Error;

/// Common trait for all custom error types in the crate
pub trait AppError: std::error::Error + Send + Sync + 'static {
    /// Get a stable error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Whether the backend reported the target as missing
    fn is_not_found(&self) -> bool {
        false
    }

    /// Get optional suggested action for the user
    fn suggested_action(&self) -> Option<String> {
        None
    }
}

/// Errors raised while validating a `WebDAVConfig`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Server URL cannot be empty")]
    EmptyServerUrl,

    #[error("Server URL must start with http:// or https://, got '{url}'")]
    InvalidScheme { url: String },
}

impl AppError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::EmptyServerUrl => "CONFIG_EMPTY_SERVER_URL",
            ConfigError::InvalidScheme { .. } => "CONFIG_INVALID_SCHEME",
        }
    }

    fn user_message(&self) -> String {
        match self {
            ConfigError::EmptyServerUrl => "No WebDAV server configured".to_string(),
            ConfigError::InvalidScheme { .. } => {
                "WebDAV server URL is not an HTTP(S) URL".to_string()
            }
        }
    }

    fn suggested_action(&self) -> Option<String> {
        Some(format!("Use a URL such as {}", crate::services::webdav::MAILRU_WEBDAV_URL))
    }
}

pub mod cloud;
pub mod transport;

pub use cloud::CloudError;
pub use transport::TransportError;
