// WebDAV transport modules organized by functionality

pub mod config;
pub mod connection;
pub mod transport;
pub mod url_management;

// Re-export main types for convenience
pub use config::{WebDAVConfig, MAILRU_WEBDAV_URL};
pub use connection::WebDAVConnection;
pub use transport::{ByteStream, WebDAVTransport};
pub use url_management::WebDAVUrlManager;
