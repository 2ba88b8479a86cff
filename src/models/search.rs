use serde::{Deserialize, Serialize};

use super::DirectoryEntry;

/// Parameters for `FileService::find`.
///
/// An entry matches when its basename equals `filename` (case-insensitively
/// unless `case_sensitive` is set) or its etag equals `etag` exactly. With
/// neither supplied nothing matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub filename: Option<String>,
    pub etag: Option<String>,
    /// Folder to start in (default: `/`)
    pub folder_path: String,
    /// Descend into subdirectories when the current level has no match (default: false)
    pub recursive: bool,
    /// Compare names exactly instead of ignoring case (default: false)
    pub case_sensitive: bool,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            filename: None,
            etag: None,
            folder_path: "/".to_string(),
            recursive: false,
            case_sensitive: false,
        }
    }
}

impl SearchCriteria {
    pub fn by_name<S: Into<String>>(filename: S) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Self::default()
        }
    }

    pub fn by_etag<S: Into<String>>(etag: S) -> Self {
        Self {
            etag: Some(etag.into()),
            ..Self::default()
        }
    }

    pub fn with_etag<S: Into<String>>(mut self, etag: S) -> Self {
        self.etag = Some(etag.into());
        self
    }

    pub fn in_folder<S: Into<String>>(mut self, folder_path: S) -> Self {
        self.folder_path = folder_path.into();
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    fn name_matches(&self, entry: &DirectoryEntry) -> bool {
        match self.filename.as_deref() {
            None => false,
            Some(name) if self.case_sensitive => entry.basename == name,
            Some(name) => entry.basename.to_lowercase() == name.to_lowercase(),
        }
    }

    fn etag_matches(&self, entry: &DirectoryEntry) -> bool {
        match (self.etag.as_deref(), entry.etag.as_deref()) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => false,
        }
    }

    /// Whether `entry` is a file satisfying the name or etag rule
    pub fn matches(&self, entry: &DirectoryEntry) -> bool {
        entry.is_file() && (self.name_matches(entry) || self.etag_matches(entry))
    }
}
