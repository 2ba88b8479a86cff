use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Body, Client, Method, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::errors::TransportError;
use crate::models::{DetailedResponse, DirectoryContents};
use crate::webdav_xml_parser::parse_propfind_response;
use super::config::WebDAVConfig;
use super::transport::{ByteStream, WebDAVTransport};
use super::url_management::{normalize_path, WebDAVUrlManager};

const PROPFIND_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
            <D:propfind xmlns:D="DAV:">
                <D:prop>
                    <D:displayname/>
                    <D:getcontentlength/>
                    <D:getlastmodified/>
                    <D:getcontenttype/>
                    <D:getetag/>
                    <D:resourcetype/>
                </D:prop>
            </D:propfind>"#;

/// Authenticated WebDAV client speaking HTTP through reqwest.
///
/// No retries: every failed request is reported to the caller as is.
#[derive(Clone)]
pub struct WebDAVConnection {
    client: Client,
    config: WebDAVConfig,
    url_manager: WebDAVUrlManager,
}

impl WebDAVConnection {
    pub fn new(config: WebDAVConfig) -> Result<Self, TransportError> {
        // Validate configuration first
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()?;
        let url_manager = WebDAVUrlManager::new(&config)?;

        Ok(Self {
            client,
            config,
            url_manager,
        })
    }

    pub fn config(&self) -> &WebDAVConfig {
        &self.config
    }

    /// Gets the WebDAV URL for a specific path
    pub fn get_url_for_path(&self, path: &str) -> String {
        self.url_manager.relative_path_to_url(path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.get_url_for_path(path))
            .basic_auth(&self.config.username, Some(&self.config.password))
    }

    /// Sends the request and turns any non-2xx answer into `TransportError::Http`
    async fn send(
        &self,
        request: RequestBuilder,
        method: &str,
        path: &str,
    ) -> Result<Response, TransportError> {
        debug!("{} {}", method, path);
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        warn!("{} {} failed with status {}", method, path, status);
        Err(TransportError::http(method, path, status, message))
    }

    async fn relocate(&self, method: &str, from: &str, to: &str) -> Result<(), TransportError> {
        let method_value = Method::from_bytes(method.as_bytes())
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        let request = self
            .request(method_value, from)
            .header("Destination", self.get_url_for_path(to))
            .header("Overwrite", "T");

        self.send(request, method, from).await?;
        Ok(())
    }
}

#[async_trait]
impl WebDAVTransport for WebDAVConnection {
    async fn put_file_contents(
        &self,
        path: &str,
        content: ByteStream,
    ) -> Result<(), TransportError> {
        let request = self
            .request(Method::PUT, path)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(Body::wrap_stream(content));

        self.send(request, "PUT", path).await?;
        debug!("✅ Uploaded file: {}", path);
        Ok(())
    }

    async fn get_file_contents(&self, path: &str) -> Result<Bytes, TransportError> {
        let response = self.send(self.request(Method::GET, path), "GET", path).await?;
        let content = response.bytes().await?;
        debug!("✅ Downloaded {} bytes for file: {}", content.len(), path);
        Ok(content)
    }

    async fn get_directory_contents(
        &self,
        path: &str,
    ) -> Result<DirectoryContents, TransportError> {
        let method = Method::from_bytes(b"PROPFIND")
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        let request = self
            .request(method, path)
            .header("Depth", "1")
            .header(header::CONTENT_TYPE, "application/xml")
            .body(PROPFIND_BODY);

        let response = self.send(request, "PROPFIND", path).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let listed = normalize_path(path);
        let data: Vec<_> = self
            .url_manager
            .process_entries(parse_propfind_response(&body)?)
            .into_iter()
            .filter(|entry| entry.path != listed)
            .collect();

        debug!("Listed {} entries in directory: {}", data.len(), path);
        Ok(DirectoryContents::Detailed(DetailedResponse { data, status }))
    }

    async fn move_file(&self, from: &str, to: &str) -> Result<(), TransportError> {
        self.relocate("MOVE", from, to).await
    }

    async fn copy_file(&self, from: &str, to: &str) -> Result<(), TransportError> {
        self.relocate("COPY", from, to).await
    }

    async fn delete_file(&self, path: &str) -> Result<(), TransportError> {
        self.send(self.request(Method::DELETE, path), "DELETE", path).await?;
        Ok(())
    }

    async fn create_directory(&self, path: &str) -> Result<(), TransportError> {
        let method = Method::from_bytes(b"MKCOL")
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        self.send(self.request(method, path), "MKCOL", path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Credentials;

    #[test]
    fn test_rejects_invalid_config() {
        let config =
            WebDAVConfig::new(Credentials::new("u", "p")).with_server_url("webdav.cloud.mail.ru");
        assert!(matches!(
            WebDAVConnection::new(config),
            Err(TransportError::Config(_))
        ));
    }

    #[test]
    fn test_url_for_path() {
        let connection =
            WebDAVConnection::new(WebDAVConfig::new(Credentials::new("u", "p"))).unwrap();
        assert_eq!(
            connection.get_url_for_path("/docs/a.txt"),
            "https://webdav.cloud.mail.ru/docs/a.txt"
        );
    }
}
