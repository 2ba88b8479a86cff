use url::Url;

use crate::errors::TransportError;
use crate::models::DirectoryEntry;
use super::config::WebDAVConfig;

/// Centralized URL and path management for WebDAV operations
///
/// Converts between the paths callers use (`/docs/a.txt`, always relative to
/// the WebDAV root) and the URLs and hrefs that go over the wire.
#[derive(Debug, Clone)]
pub struct WebDAVUrlManager {
    base_url: String,
    /// Path component of the server URL, without trailing slash ("" for root)
    base_path: String,
}

impl WebDAVUrlManager {
    pub fn new(config: &WebDAVConfig) -> Result<Self, TransportError> {
        let parsed = Url::parse(&config.server_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", config.server_url, e)))?;

        Ok(Self {
            base_url: config.webdav_url(),
            base_path: parsed.path().trim_end_matches('/').to_string(),
        })
    }

    /// Convert relative path to full URL for WebDAV requests
    ///
    /// Input:  "/Photos/my image.jpg"
    /// Output: "https://webdav.cloud.mail.ru/Photos/my%20image.jpg"
    pub fn relative_path_to_url(&self, relative_path: &str) -> String {
        let encoded: Vec<String> = relative_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();

        format!("{}/{}", self.base_url, encoded.join("/"))
    }

    /// Convert a WebDAV href (from XML response) to a relative path
    ///
    /// Input:  "/dav/Photos/my%20image.jpg" (server URL "https://host/dav")
    /// Output: "/Photos/my image.jpg"
    pub fn href_to_relative_path(&self, href: &str) -> String {
        // Some servers send absolute URLs instead of paths
        let raw_path = match Url::parse(href) {
            Ok(url) => url.path().to_string(),
            Err(_) => href.to_string(),
        };

        let stripped = match raw_path.strip_prefix(&self.base_path) {
            Some(rest)
                if self.base_path.is_empty() || rest.is_empty() || rest.starts_with('/') =>
            {
                rest
            }
            _ => raw_path.as_str(),
        };

        let decoded = urlencoding::decode(stripped)
            .map(|cow| cow.into_owned())
            .unwrap_or_else(|_| stripped.to_string());

        normalize_path(&decoded)
    }

    /// Rewrite an entry from the XML parser so its path is relative to the WebDAV root
    pub fn process_entry(&self, mut entry: DirectoryEntry) -> DirectoryEntry {
        entry.path = self.href_to_relative_path(&entry.path);
        entry.basename = basename(&entry.path).to_string();
        entry
    }

    /// Process a collection of parsed entries
    pub fn process_entries(&self, entries: Vec<DirectoryEntry>) -> Vec<DirectoryEntry> {
        entries
            .into_iter()
            .map(|entry| self.process_entry(entry))
            .collect()
    }
}

/// Collapse a path to the `/a/b` form: leading slash, no trailing slash, no empty segments
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Join a parent folder and a child name with exactly one separator
pub fn join_path(parent: &str, name: &str) -> String {
    format!(
        "{}/{}",
        parent.trim_end_matches('/'),
        name.trim_start_matches('/')
    )
}

/// Last segment of a normalized path ("" for the root)
pub fn basename(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}
