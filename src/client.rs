use tracing::info;

use crate::errors::TransportError;
use crate::models::Credentials;
use crate::services::webdav::{WebDAVConfig, WebDAVConnection, WebDAVTransport};
use crate::services::{FileService, FolderService};

/// Entry point for Mail.Ru Cloud.
///
/// Owns the transport for its whole lifetime; the file and folder services
/// borrow it per call site.
///
/// ```no_run
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// use mailru_cloud::{Credentials, MailRuCloud, SearchCriteria};
///
/// let cloud = MailRuCloud::new(Credentials::new("user@mail.ru", "app-password"))?;
/// cloud.folder().create("reports", "/").await?;
/// let found = cloud
///     .file()
///     .find(&SearchCriteria::by_name("summary.pdf").recursive(true))
///     .await?;
/// # let _ = found;
/// # Ok(())
/// # }
/// ```
pub struct MailRuCloud<T = WebDAVConnection> {
    transport: T,
}

impl MailRuCloud<WebDAVConnection> {
    /// Connects to the Mail.Ru Cloud WebDAV endpoint.
    ///
    /// Credentials are not verified here; a wrong password shows up as an
    /// error on the first operation.
    pub fn new(credentials: Credentials) -> Result<Self, TransportError> {
        Self::with_config(WebDAVConfig::new(credentials))
    }

    pub fn with_config(config: WebDAVConfig) -> Result<Self, TransportError> {
        info!("☁️ Creating cloud client for {}", config.server_url);
        Ok(Self::from_transport(WebDAVConnection::new(config)?))
    }
}

impl<T: WebDAVTransport> MailRuCloud<T> {
    pub fn from_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn file(&self) -> FileService<'_, T> {
        FileService::new(&self.transport)
    }

    pub fn folder(&self) -> FolderService<'_, T> {
        FolderService::new(&self.transport)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
