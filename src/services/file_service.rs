use bytes::Bytes;
use futures::{future, stream, Stream};
use tokio::io::AsyncRead;
use tokio_util::io::{ReaderStream, StreamReader};
use tracing::{debug, error, info};

use crate::errors::{CloudError, TransportError};
use crate::models::{DirectoryEntry, SearchCriteria};
use crate::services::webdav::{ByteStream, WebDAVTransport};

/// File transfer, lookup and relocation on top of a borrowed transport
pub struct FileService<'a, T: ?Sized> {
    client: &'a T,
}

impl<'a, T: WebDAVTransport + ?Sized> FileService<'a, T> {
    pub fn new(client: &'a T) -> Self {
        Self { client }
    }

    /// Streams `stream` to `destination_path`, overwriting any existing file.
    ///
    /// A failed upload may leave a partial file behind; nothing is cleaned up.
    pub async fn upload<S>(&self, stream: S, destination_path: &str) -> Result<(), CloudError>
    where
        S: Stream<Item = std::io::Result<Bytes>> + Send + Sync + 'static,
    {
        info!("⬆️ Uploading file: {}", destination_path);
        let content: ByteStream = Box::pin(stream);

        self.client
            .put_file_contents(destination_path, content)
            .await
            .map_err(|source| {
                error!("❌ Upload of '{}' failed: {}", destination_path, source);
                CloudError::Upload {
                    path: destination_path.to_string(),
                    source,
                }
            })
    }

    /// Uploads everything `reader` yields
    pub async fn upload_reader<R>(
        &self,
        reader: R,
        destination_path: &str,
    ) -> Result<(), CloudError>
    where
        R: AsyncRead + Send + Sync + 'static,
    {
        self.upload(ReaderStream::new(reader), destination_path).await
    }

    /// Fetches the whole file and hands it back as a stream.
    ///
    /// The content is buffered in memory before the stream is returned.
    pub async fn download(&self, remote_path: &str) -> Result<ByteStream, CloudError> {
        info!("⬇️ Downloading file: {}", remote_path);

        let content = self
            .client
            .get_file_contents(remote_path)
            .await
            .map_err(|source| {
                error!("❌ Download of '{}' failed: {}", remote_path, source);
                CloudError::Download {
                    path: remote_path.to_string(),
                    source,
                }
            })?;

        Ok(Box::pin(stream::once(future::ready(Ok::<_, std::io::Error>(content)))))
    }

    /// Like `download`, but as an `AsyncRead`
    pub async fn download_reader(
        &self,
        remote_path: &str,
    ) -> Result<StreamReader<ByteStream, Bytes>, CloudError> {
        Ok(StreamReader::new(self.download(remote_path).await?))
    }

    /// Finds the first file matching `criteria`.
    ///
    /// Every file of a folder is checked before any of its subfolders is
    /// entered; subfolders are then searched depth-first in listing order.
    /// A failed listing anywhere aborts the whole search.
    pub async fn find(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Option<DirectoryEntry>, CloudError> {
        info!(
            "🔍 Searching for file in {} (recursive: {})",
            criteria.folder_path, criteria.recursive
        );

        let mut pending = vec![criteria.folder_path.clone()];

        while let Some(folder) = pending.pop() {
            debug!("Searching folder: {}", folder);

            let mut entries = self
                .client
                .get_directory_contents(&folder)
                .await
                .map_err(|source| search_failed(&folder, source))?
                .into_entries();

            if let Some(idx) = entries.iter().position(|entry| criteria.matches(entry)) {
                let found = entries.swap_remove(idx);
                info!("✅ Found file: {}", found.path);
                return Ok(Some(found));
            }

            if criteria.recursive {
                // Reversed so the first subfolder is popped first
                pending.extend(
                    entries
                        .into_iter()
                        .rev()
                        .filter(DirectoryEntry::is_directory)
                        .map(|entry| entry.path),
                );
            }
        }

        debug!("No file matched in {}", criteria.folder_path);
        Ok(None)
    }

    pub async fn move_file(&self, source_path: &str, target_path: &str) -> Result<(), CloudError> {
        info!("📦 Moving file: {} -> {}", source_path, target_path);
        self.client
            .move_file(source_path, target_path)
            .await
            .map_err(|source| CloudError::Move {
                path: source_path.to_string(),
                source,
            })
    }

    pub async fn copy(&self, source_path: &str, target_path: &str) -> Result<(), CloudError> {
        info!("📋 Copying file: {} -> {}", source_path, target_path);
        self.client
            .copy_file(source_path, target_path)
            .await
            .map_err(|source| CloudError::Copy {
                path: source_path.to_string(),
                source,
            })
    }

    pub async fn remove(&self, file_path: &str) -> Result<(), CloudError> {
        info!("🗑️ Removing file: {}", file_path);
        self.client
            .delete_file(file_path)
            .await
            .map_err(|source| CloudError::Remove {
                path: file_path.to_string(),
                source,
            })
    }
}

fn search_failed(folder: &str, source: TransportError) -> CloudError {
    error!("❌ Search failed while listing '{}': {}", folder, source);
    CloudError::Search {
        path: folder.to_string(),
        source,
    }
}
