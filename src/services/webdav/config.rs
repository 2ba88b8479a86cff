use crate::errors::ConfigError;
use crate::models::Credentials;

/// Mail.Ru Cloud WebDAV endpoint
pub const MAILRU_WEBDAV_URL: &str = "https://webdav.cloud.mail.ru/";

/// WebDAV server configuration
#[derive(Clone)]
pub struct WebDAVConfig {
    pub server_url: String,
    pub username: String,
    pub password: String,
    pub timeout_seconds: u64,
}

impl WebDAVConfig {
    /// Creates a configuration for the Mail.Ru Cloud endpoint
    pub fn new(credentials: Credentials) -> Self {
        Self {
            server_url: MAILRU_WEBDAV_URL.to_string(),
            username: credentials.username,
            password: credentials.password,
            timeout_seconds: 30,
        }
    }

    pub fn with_server_url<S: Into<String>>(mut self, server_url: S) -> Self {
        self.server_url = server_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Validates the configuration.
    ///
    /// Credentials are not checked here; bad credentials surface on the first request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_url.is_empty() {
            return Err(ConfigError::EmptyServerUrl);
        }

        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err(ConfigError::InvalidScheme {
                url: self.server_url.clone(),
            });
        }

        Ok(())
    }

    /// Returns the base URL for WebDAV operations, without trailing slash
    pub fn webdav_url(&self) -> String {
        self.server_url.trim_end_matches('/').to_string()
    }

    /// Gets the timeout duration
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

impl std::fmt::Debug for WebDAVConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebDAVConfig")
            .field("server_url", &self.server_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}
