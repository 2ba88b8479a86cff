pub mod client;
pub mod errors;
pub mod models;
pub mod services;
pub mod webdav_xml_parser;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::MailRuCloud;
pub use errors::{AppError, CloudError, TransportError};
pub use models::{Credentials, DirectoryEntry, EntryKind, SearchCriteria};
pub use services::webdav::{ByteStream, WebDAVConfig, WebDAVConnection, WebDAVTransport};
pub use services::{FileService, FolderService};
