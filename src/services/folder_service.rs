use tracing::{debug, error, info};

use crate::errors::{CloudError, TransportError};
use crate::models::DirectoryEntry;
use crate::services::webdav::url_management::join_path;
use crate::services::webdav::WebDAVTransport;

/// A folder being emptied by `FolderService::delete`
struct PendingFolder {
    path: String,
    remaining: std::vec::IntoIter<DirectoryEntry>,
}

/// Directory creation, listing and recursive deletion on top of a borrowed transport
pub struct FolderService<'a, T: ?Sized> {
    client: &'a T,
}

impl<'a, T: WebDAVTransport + ?Sized> FolderService<'a, T> {
    pub fn new(client: &'a T) -> Self {
        Self { client }
    }

    /// Creates `folder_name` inside `parent_path`
    pub async fn create(&self, folder_name: &str, parent_path: &str) -> Result<(), CloudError> {
        let path = join_path(parent_path, folder_name);
        info!("📁 Creating directory: {}", path);

        self.client
            .create_directory(&path)
            .await
            .map_err(|source| {
                error!("❌ Failed to create directory '{}': {}", path, source);
                CloudError::CreateFolder {
                    path: path.clone(),
                    source,
                }
            })
    }

    /// Creates `folder_name` in the root folder
    pub async fn create_in_root(&self, folder_name: &str) -> Result<(), CloudError> {
        self.create(folder_name, "/").await
    }

    /// Lists the immediate children of `folder_path`
    pub async fn list(&self, folder_path: &str) -> Result<Vec<DirectoryEntry>, CloudError> {
        debug!("Listing directory: {}", folder_path);

        let contents = self
            .client
            .get_directory_contents(folder_path)
            .await
            .map_err(|source| CloudError::List {
                path: folder_path.to_string(),
                source,
            })?;

        Ok(contents.into_entries())
    }

    /// Deletes `folder_path` with everything below it.
    ///
    /// Entries are handled in listing order: files are deleted directly,
    /// subfolders are emptied and deleted when reached. The folder itself goes
    /// last. The first failure stops the walk; whatever was already deleted
    /// stays deleted.
    pub async fn delete(&self, folder_path: &str) -> Result<(), CloudError> {
        info!("🗑️ Deleting directory recursively: {}", folder_path);

        let root = self
            .open(folder_path)
            .await
            .map_err(|source| delete_failed(folder_path, source))?;
        let mut stack = vec![root];

        loop {
            let next = match stack.last_mut() {
                Some(folder) => folder.remaining.next(),
                None => break,
            };

            match next {
                Some(entry) if entry.is_directory() => {
                    let child = self
                        .open(&entry.path)
                        .await
                        .map_err(|source| delete_failed(folder_path, source))?;
                    stack.push(child);
                }
                Some(entry) => {
                    debug!("Deleting file: {}", entry.path);
                    self.client
                        .delete_file(&entry.path)
                        .await
                        .map_err(|source| delete_failed(folder_path, source))?;
                }
                None => {
                    if let Some(done) = stack.pop() {
                        debug!("Deleting emptied directory: {}", done.path);
                        self.client
                            .delete_file(&done.path)
                            .await
                            .map_err(|source| delete_failed(folder_path, source))?;
                    }
                }
            }
        }

        info!("✅ Deleted directory: {}", folder_path);
        Ok(())
    }

    async fn open(&self, path: &str) -> Result<PendingFolder, TransportError> {
        let entries = self.client.get_directory_contents(path).await?.into_entries();
        debug!("{} entries to delete in {}", entries.len(), path);

        Ok(PendingFolder {
            path: path.to_string(),
            remaining: entries.into_iter(),
        })
    }
}

fn delete_failed(folder_path: &str, source: TransportError) -> CloudError {
    error!("❌ Failed to delete directory '{}': {}", folder_path, source);
    CloudError::DeleteFolder {
        path: folder_path.to_string(),
        source,
    }
}
