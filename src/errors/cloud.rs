use thiserror::Error;

use super::{AppError, TransportError};

/// Errors returned by the file and folder services.
///
/// One variant per operation family. Each keeps the path the operation was
/// invoked with and the transport failure that caused it.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Error uploading file: {source}")]
    Upload {
        path: String,
        #[source]
        source: TransportError,
    },

    #[error("Error downloading file: {source}")]
    Download {
        path: String,
        #[source]
        source: TransportError,
    },

    #[error("Error searching for file: {source}")]
    Search {
        path: String,
        #[source]
        source: TransportError,
    },

    #[error("Error moving file: {source}")]
    Move {
        path: String,
        #[source]
        source: TransportError,
    },

    #[error("Error copying file: {source}")]
    Copy {
        path: String,
        #[source]
        source: TransportError,
    },

    #[error("Error removing file: {source}")]
    Remove {
        path: String,
        #[source]
        source: TransportError,
    },

    #[error("Error creating directory: {source}")]
    CreateFolder {
        path: String,
        #[source]
        source: TransportError,
    },

    #[error("Error listing directory contents: {source}")]
    List {
        path: String,
        #[source]
        source: TransportError,
    },

    #[error("Error deleting directory: {source}")]
    DeleteFolder {
        path: String,
        #[source]
        source: TransportError,
    },
}

impl CloudError {
    /// Path the failed operation was invoked with
    pub fn path(&self) -> &str {
        match self {
            CloudError::Upload { path, .. }
            | CloudError::Download { path, .. }
            | CloudError::Search { path, .. }
            | CloudError::Move { path, .. }
            | CloudError::Copy { path, .. }
            | CloudError::Remove { path, .. }
            | CloudError::CreateFolder { path, .. }
            | CloudError::List { path, .. }
            | CloudError::DeleteFolder { path, .. } => path,
        }
    }

    /// The underlying transport failure
    pub fn transport_error(&self) -> &TransportError {
        match self {
            CloudError::Upload { source, .. }
            | CloudError::Download { source, .. }
            | CloudError::Search { source, .. }
            | CloudError::Move { source, .. }
            | CloudError::Copy { source, .. }
            | CloudError::Remove { source, .. }
            | CloudError::CreateFolder { source, .. }
            | CloudError::List { source, .. }
            | CloudError::DeleteFolder { source, .. } => source,
        }
    }

    pub fn into_transport_error(self) -> TransportError {
        match self {
            CloudError::Upload { source, .. }
            | CloudError::Download { source, .. }
            | CloudError::Search { source, .. }
            | CloudError::Move { source, .. }
            | CloudError::Copy { source, .. }
            | CloudError::Remove { source, .. }
            | CloudError::CreateFolder { source, .. }
            | CloudError::List { source, .. }
            | CloudError::DeleteFolder { source, .. } => source,
        }
    }
}

impl AppError for CloudError {
    fn error_code(&self) -> &'static str {
        match self {
            CloudError::Upload { .. } => "FILE_UPLOAD_FAILED",
            CloudError::Download { .. } => "FILE_DOWNLOAD_FAILED",
            CloudError::Search { .. } => "FILE_SEARCH_FAILED",
            CloudError::Move { .. } => "FILE_MOVE_FAILED",
            CloudError::Copy { .. } => "FILE_COPY_FAILED",
            CloudError::Remove { .. } => "FILE_REMOVE_FAILED",
            CloudError::CreateFolder { .. } => "FOLDER_CREATE_FAILED",
            CloudError::List { .. } => "FOLDER_LIST_FAILED",
            CloudError::DeleteFolder { .. } => "FOLDER_DELETE_FAILED",
        }
    }

    fn user_message(&self) -> String {
        let action = match self {
            CloudError::Upload { .. } => "upload",
            CloudError::Download { .. } => "download",
            CloudError::Search { .. } => "search in",
            CloudError::Move { .. } => "move",
            CloudError::Copy { .. } => "copy",
            CloudError::Remove { .. } => "remove",
            CloudError::CreateFolder { .. } => "create",
            CloudError::List { .. } => "list",
            CloudError::DeleteFolder { .. } => "delete",
        };
        format!(
            "Could not {} '{}': {}",
            action,
            self.path(),
            self.transport_error().user_message()
        )
    }

    fn is_not_found(&self) -> bool {
        self.transport_error().is_not_found()
    }

    fn suggested_action(&self) -> Option<String> {
        self.transport_error().suggested_action()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found(path: &str) -> TransportError {
        TransportError::Http {
            method: "GET".to_string(),
            path: path.to_string(),
            status: 404,
            message: "Not Found".to_string(),
        }
    }

    #[test]
    fn test_display_prefixes_operation() {
        let err = CloudError::Download {
            path: "/docs/c.txt".to_string(),
            source: not_found("/docs/c.txt"),
        };
        assert_eq!(
            err.to_string(),
            "Error downloading file: GET /docs/c.txt failed with status 404: Not Found"
        );
    }

    #[test]
    fn test_not_found_is_inspectable() {
        let err = CloudError::Download {
            path: "/docs/c.txt".to_string(),
            source: not_found("/docs/c.txt"),
        };
        assert!(err.is_not_found());
        assert_eq!(err.error_code(), "FILE_DOWNLOAD_FAILED");
        assert_eq!(err.transport_error().status(), Some(404));
        assert_eq!(err.path(), "/docs/c.txt");

        let err = CloudError::DeleteFolder {
            path: "/docs".to_string(),
            source: TransportError::Http {
                method: "DELETE".to_string(),
                path: "/docs/a.txt".to_string(),
                status: 500,
                message: "Internal Server Error".to_string(),
            },
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_source_chain_is_preserved() {
        use std::error::Error;

        let err = CloudError::Search {
            path: "/".to_string(),
            source: TransportError::Xml("unexpected EOF".to_string()),
        };
        let source = err.source().expect("search error should carry its cause");
        assert_eq!(source.to_string(), "XML parsing error: unexpected EOF");
    }

    #[test]
    fn test_user_message_mentions_path() {
        let err = CloudError::CreateFolder {
            path: "/docs/new".to_string(),
            source: TransportError::Http {
                method: "MKCOL".to_string(),
                path: "/docs/new".to_string(),
                status: 401,
                message: String::new(),
            },
        };
        assert_eq!(
            err.user_message(),
            "Could not create '/docs/new': Authentication failed - please check credentials"
        );
        assert!(err.suggested_action().is_some());
    }
}
