use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One item of a directory listing as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Absolute path below the WebDAV root, e.g. `/docs/a.txt`
    pub path: String,
    /// Last path segment, e.g. `a.txt`
    pub basename: String,
    pub kind: EntryKind,
    /// Opaque content version token, quotes preserved as sent by the server
    pub etag: Option<String>,
    /// Content length in bytes (0 for directories)
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub mime_type: Option<String>,
}

impl DirectoryEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Extra response information a transport may attach to a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailedResponse {
    pub data: Vec<DirectoryEntry>,
    /// HTTP status of the listing request
    pub status: u16,
}

/// Directory listing as handed back by a transport.
///
/// Transports either return the bare entries or wrap them together with
/// response details; callers go through [`DirectoryContents::into_entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryContents {
    Entries(Vec<DirectoryEntry>),
    Detailed(DetailedResponse),
}

impl DirectoryContents {
    pub fn into_entries(self) -> Vec<DirectoryEntry> {
        match self {
            DirectoryContents::Entries(entries) => entries,
            DirectoryContents::Detailed(response) => response.data,
        }
    }
}

impl From<Vec<DirectoryEntry>> for DirectoryContents {
    fn from(entries: Vec<DirectoryEntry>) -> Self {
        DirectoryContents::Entries(entries)
    }
}
