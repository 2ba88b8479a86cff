use chrono::{DateTime, Utc};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::reader::Reader;
use std::str;

use crate::errors::TransportError;
use crate::models::{DirectoryEntry, EntryKind};

#[derive(Debug, Default)]
struct PropFindResponse {
    href: String,
    content_length: Option<u64>,
    last_modified: Option<String>,
    content_type: Option<String>,
    etag: Option<String>,
    is_collection: bool,
}

impl PropFindResponse {
    fn into_entry(self) -> DirectoryEntry {
        let encoded_name = self.href.trim_end_matches('/').rsplit('/').next().unwrap_or("");
        let basename = urlencoding::decode(encoded_name)
            .map(|cow| cow.into_owned())
            .unwrap_or_else(|_| encoded_name.to_string());

        let kind = if self.is_collection {
            EntryKind::Directory
        } else {
            EntryKind::File
        };

        DirectoryEntry {
            path: self.href,
            basename,
            kind,
            etag: self.etag,
            size: if self.is_collection { 0 } else { self.content_length.unwrap_or(0) },
            last_modified: self.last_modified.as_deref().and_then(parse_http_date),
            mime_type: if self.is_collection { None } else { self.content_type },
        }
    }
}

/// Parse a PROPFIND multistatus body into entries, files and directories alike.
///
/// `path` of each entry is the raw href as sent by the server; callers map it
/// through `WebDAVUrlManager::process_entries`. Responses without a 200
/// propstat are dropped.
pub fn parse_propfind_response(xml_text: &str) -> Result<Vec<DirectoryEntry>, TransportError> {
    let mut reader = Reader::from_str(xml_text);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current_response: Option<PropFindResponse> = None;
    let mut current_element = String::new();
    let mut in_propstat = false;
    let mut in_resourcetype = false;
    let mut status_ok = false;

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = get_local_name(&e)?;

                match name.as_str() {
                    "response" => {
                        current_response = Some(PropFindResponse::default());
                        status_ok = false;
                    }
                    "propstat" => in_propstat = true,
                    "resourcetype" => in_resourcetype = true,
                    "collection" if in_resourcetype => {
                        if let Some(ref mut resp) = current_response {
                            resp.is_collection = true;
                        }
                    }
                    _ => {}
                }
                current_element = name;
            }
            Ok(Event::Empty(e)) => {
                let name = get_local_name(&e)?;
                if name == "collection" && in_resourcetype {
                    if let Some(ref mut resp) = current_response {
                        resp.is_collection = true;
                    }
                }
                current_element.clear();
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| TransportError::Xml(e.to_string()))?;
                let text = text.trim();

                if let Some(ref mut resp) = current_response {
                    match current_element.as_str() {
                        "href" => resp.href = text.to_string(),
                        "getcontentlength" => resp.content_length = text.parse().ok(),
                        "getlastmodified" => resp.last_modified = Some(text.to_string()),
                        "getcontenttype" => resp.content_type = Some(text.to_string()),
                        "getetag" => resp.etag = Some(text.to_string()),
                        "status" if in_propstat => {
                            if text.contains(" 200") {
                                status_ok = true;
                            }
                        }
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = get_local_name_from_end(&e)?;

                match name.as_str() {
                    "response" => {
                        if let Some(resp) = current_response.take() {
                            if status_ok && !resp.href.is_empty() {
                                entries.push(resp.into_entry());
                            }
                        }
                        status_ok = false;
                    }
                    "propstat" => in_propstat = false,
                    "resourcetype" => in_resourcetype = false,
                    _ => {}
                }

                current_element.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(TransportError::Xml(e.to_string())),
            _ => {}
        }

        buf.clear();
    }

    Ok(entries)
}

fn get_local_name(e: &BytesStart) -> Result<String, TransportError> {
    let qname = e.name();
    let local = qname.local_name();
    let name = str::from_utf8(local.as_ref())
        .map_err(|e| TransportError::Xml(format!("Invalid UTF-8 in element name: {}", e)))?;
    Ok(name.to_string())
}

fn get_local_name_from_end(e: &BytesEnd) -> Result<String, TransportError> {
    let qname = e.name();
    let local = qname.local_name();
    let name = str::from_utf8(local.as_ref())
        .map_err(|e| TransportError::Xml(format!("Invalid UTF-8 in element name: {}", e)))?;
    Ok(name.to_string())
}

fn parse_http_date(date_str: &str) -> Option<DateTime<Utc>> {
    if date_str.is_empty() {
        return None;
    }

    // WebDAV uses RFC 2822 dates
    DateTime::parse_from_rfc2822(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            DateTime::parse_from_rfc3339(date_str)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(date_str, "%a, %d %b %Y %H:%M:%S GMT")
                .ok()
                .map(|ndt| DateTime::from_naive_utc_and_offset(ndt, Utc))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_propfind() {
        let xml = r#"<?xml version="1.0"?>
        <d:multistatus xmlns:d="DAV:">
            <d:response>
                <d:href>/docs/test.pdf</d:href>
                <d:propstat>
                    <d:prop>
                        <d:displayname>test.pdf</d:displayname>
                        <d:getcontentlength>1024</d:getcontentlength>
                        <d:getlastmodified>Mon, 01 Jan 2024 12:00:00 GMT</d:getlastmodified>
                        <d:getcontenttype>application/pdf</d:getcontenttype>
                        <d:getetag>"abc123"</d:getetag>
                        <d:resourcetype/>
                    </d:prop>
                    <d:status>HTTP/1.1 200 OK</d:status>
                </d:propstat>
            </d:response>
        </d:multistatus>"#;

        let entries = parse_propfind_response(xml).unwrap();
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.path, "/docs/test.pdf");
        assert_eq!(entry.basename, "test.pdf");
        assert_eq!(entry.kind, EntryKind::File);
        assert_eq!(entry.size, 1024);
        assert_eq!(entry.mime_type.as_deref(), Some("application/pdf"));
        assert_eq!(entry.etag.as_deref(), Some("\"abc123\""));
        assert!(entry.last_modified.is_some());
    }

    #[test]
    fn test_parse_propfind_keeps_directories() {
        let xml = r#"<?xml version="1.0"?>
        <d:multistatus xmlns:d="DAV:">
            <d:response>
                <d:href>/Documents/</d:href>
                <d:propstat>
                    <d:prop>
                        <d:displayname>Documents</d:displayname>
                        <d:resourcetype>
                            <d:collection/>
                        </d:resourcetype>
                    </d:prop>
                    <d:status>HTTP/1.1 200 OK</d:status>
                </d:propstat>
            </d:response>
            <d:response>
                <d:href>/Documents/file.txt</d:href>
                <d:propstat>
                    <d:prop>
                        <d:getcontentlength>256</d:getcontentlength>
                        <d:getcontenttype>text/plain</d:getcontenttype>
                        <d:resourcetype/>
                    </d:prop>
                    <d:status>HTTP/1.1 200 OK</d:status>
                </d:propstat>
            </d:response>
        </d:multistatus>"#;

        let entries = parse_propfind_response(xml).unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].kind, EntryKind::Directory);
        assert_eq!(entries[0].basename, "Documents");
        assert_eq!(entries[0].size, 0);
        assert_eq!(entries[1].kind, EntryKind::File);
        assert_eq!(entries[1].basename, "file.txt");
        assert_eq!(entries[1].size, 256);
    }

    #[test]
    fn test_empty_resourcetype_does_not_leak_into_next_response() {
        let xml = r#"<?xml version="1.0"?>
        <D:multistatus xmlns:D="DAV:">
            <D:response>
                <D:href>/a.txt</D:href>
                <D:propstat>
                    <D:prop><D:resourcetype/></D:prop>
                    <D:status>HTTP/1.1 200 OK</D:status>
                </D:propstat>
            </D:response>
            <D:response>
                <D:href>/b.txt</D:href>
                <D:propstat>
                    <D:prop><D:resourcetype/><D:getetag>"b"</D:getetag></D:prop>
                    <D:status>HTTP/1.1 200 OK</D:status>
                </D:propstat>
            </D:response>
        </D:multistatus>"#;

        let entries = parse_propfind_response(xml).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.kind == EntryKind::File));
        assert_eq!(entries[1].etag.as_deref(), Some("\"b\""));
    }

    #[test]
    fn test_parse_url_encoded_filenames() {
        let xml = r#"<?xml version="1.0"?>
        <d:multistatus xmlns:d="DAV:">
            <d:response>
                <d:href>/File%20with%20spaces.pdf</d:href>
                <d:propstat>
                    <d:prop>
                        <d:resourcetype/>
                    </d:prop>
                    <d:status>HTTP/1.1 200 OK</d:status>
                </d:propstat>
            </d:response>
        </d:multistatus>"#;

        let entries = parse_propfind_response(xml).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].basename, "File with spaces.pdf");
        assert_eq!(entries[0].path, "/File%20with%20spaces.pdf");
    }

    #[test]
    fn test_failed_propstat_is_dropped() {
        let xml = r#"<?xml version="1.0"?>
        <d:multistatus xmlns:d="DAV:">
            <d:response>
                <d:href>/gone.txt</d:href>
                <d:propstat>
                    <d:prop><d:getetag/></d:prop>
                    <d:status>HTTP/1.1 404 Not Found</d:status>
                </d:propstat>
            </d:response>
        </d:multistatus>"#;

        let entries = parse_propfind_response(xml).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_empty_response() {
        let xml = r#"<?xml version="1.0"?>
        <d:multistatus xmlns:d="DAV:">
        </d:multistatus>"#;

        let entries = parse_propfind_response(xml).unwrap();
        assert_eq!(entries.len(), 0);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let xml = r#"<d:multistatus xmlns:d="DAV:"><d:response></d:multistatus>"#;
        assert!(matches!(parse_propfind_response(xml), Err(TransportError::Xml(_))));
    }
}
