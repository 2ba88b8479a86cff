use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::errors::TransportError;
use crate::models::DirectoryContents;

/// Content stream used for uploads and downloads
pub type ByteStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send + Sync>>;

/// High-level WebDAV operations the file and folder services are built on.
///
/// Paths are relative to the WebDAV root (`/docs/a.txt`). Implementations own
/// authentication and the wire protocol.
#[async_trait]
pub trait WebDAVTransport: Send + Sync {
    /// Store `content` at `path`, overwriting any existing file
    async fn put_file_contents(
        &self,
        path: &str,
        content: ByteStream,
    ) -> Result<(), TransportError>;

    /// Fetch the complete content of the file at `path`
    async fn get_file_contents(&self, path: &str) -> Result<Bytes, TransportError>;

    /// List the immediate children of `path`, excluding `path` itself
    async fn get_directory_contents(&self, path: &str) -> Result<DirectoryContents, TransportError>;

    async fn move_file(&self, from: &str, to: &str) -> Result<(), TransportError>;

    async fn copy_file(&self, from: &str, to: &str) -> Result<(), TransportError>;

    /// Delete a file or an (empty) directory
    async fn delete_file(&self, path: &str) -> Result<(), TransportError>;

    /// Create a single directory level
    async fn create_directory(&self, path: &str) -> Result<(), TransportError>;
}
