//! Test utilities: an in-memory WebDAV backend
//!
//! `MemoryTransport` keeps a tree of files and directories, records every call
//! it receives and can be told to fail specific operations. Listings come back
//! in insertion order so tests control traversal order.

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;

use crate::errors::TransportError;
use crate::models::{DetailedResponse, DirectoryContents, DirectoryEntry, EntryKind};
use crate::services::webdav::url_management::{basename, normalize_path};
use crate::services::webdav::{ByteStream, WebDAVTransport};

/// Transport operation, used to target failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Put,
    Get,
    List,
    Move,
    Copy,
    Delete,
    CreateDirectory,
}

impl Op {
    /// HTTP method a WebDAV server would see for this operation
    pub fn method(self) -> &'static str {
        match self {
            Op::Put => "PUT",
            Op::Get => "GET",
            Op::List => "PROPFIND",
            Op::Move => "MOVE",
            Op::Copy => "COPY",
            Op::Delete => "DELETE",
            Op::CreateDirectory => "MKCOL",
        }
    }
}

/// A call received by the transport, in order of arrival
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Put(String),
    Get(String),
    List(String),
    Move(String, String),
    Copy(String, String),
    Delete(String),
    CreateDirectory(String),
}

#[derive(Debug, Clone)]
struct Node {
    path: String,
    kind: EntryKind,
    content: Bytes,
    etag: String,
}

impl Node {
    fn to_entry(&self) -> DirectoryEntry {
        DirectoryEntry {
            path: self.path.clone(),
            basename: basename(&self.path).to_string(),
            kind: self.kind,
            etag: Some(self.etag.clone()),
            size: self.content.len() as u64,
            last_modified: None,
            mime_type: match self.kind {
                EntryKind::File => Some("application/octet-stream".to_string()),
                EntryKind::Directory => None,
            },
        }
    }
}

fn parent_of(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

fn is_within(path: &str, root: &str) -> bool {
    path == root || path.starts_with(&format!("{}/", root))
}

fn not_found(method: &str, path: &str) -> TransportError {
    TransportError::http(method, path, reqwest::StatusCode::NOT_FOUND, "Not Found".to_string())
}

fn conflict(method: &str, path: &str, message: &str) -> TransportError {
    TransportError::http(method, path, reqwest::StatusCode::CONFLICT, message.to_string())
}

#[derive(Default)]
pub struct MemoryTransport {
    nodes: Mutex<Vec<Node>>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<Vec<(Op, String)>>,
    etag_counter: Mutex<u64>,
    detailed_listings: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return listings wrapped in `DirectoryContents::Detailed`
    pub fn with_detailed_listings(mut self) -> Self {
        self.detailed_listings = true;
        self
    }

    /// Add a directory, creating missing parents
    pub fn with_dir(self, path: &str) -> Self {
        let path = normalize_path(path);
        self.ensure_dir(&path);
        self
    }

    /// Add a file with a generated etag, creating missing parents
    pub fn with_file(self, path: &str, content: &str) -> Self {
        let etag = self.next_etag();
        self.with_file_etag(path, content, &etag)
    }

    pub fn with_file_etag(self, path: &str, content: &str, etag: &str) -> Self {
        let path = normalize_path(path);
        self.ensure_dir(&parent_of(&path));
        self.upsert_file(&path, Bytes::copy_from_slice(content.as_bytes()), etag.to_string());
        self
    }

    /// Make every `op` call on `path` fail
    pub fn fail_on(self, op: Op, path: &str) -> Self {
        self.failures
            .lock()
            .expect("failures lock poisoned")
            .push((op, normalize_path(path)));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    /// Paths passed to `delete_file`, in order
    pub fn deleted_paths(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Delete(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn exists(&self, path: &str) -> bool {
        let path = normalize_path(path);
        path == "/" || self.find_node(&path).is_some()
    }

    pub fn content(&self, path: &str) -> Option<Bytes> {
        self.find_node(&normalize_path(path))
            .filter(|node| node.kind == EntryKind::File)
            .map(|node| node.content)
    }

    /// Remove a node behind the services' back, e.g. to simulate another client
    pub fn remove_silently(&self, path: &str) {
        let path = normalize_path(path);
        self.nodes
            .lock()
            .expect("nodes lock poisoned")
            .retain(|node| !is_within(&node.path, &path));
    }

    fn next_etag(&self) -> String {
        let mut counter = self.etag_counter.lock().expect("etag lock poisoned");
        *counter += 1;
        format!("\"etag-{}\"", *counter)
    }

    fn find_node(&self, path: &str) -> Option<Node> {
        self.nodes
            .lock()
            .expect("nodes lock poisoned")
            .iter()
            .find(|node| node.path == path)
            .cloned()
    }

    fn is_dir(&self, path: &str) -> bool {
        path == "/"
            || matches!(self.find_node(path), Some(node) if node.kind == EntryKind::Directory)
    }

    fn ensure_dir(&self, path: &str) {
        if path == "/" || self.is_dir(path) {
            return;
        }
        self.ensure_dir(&parent_of(path));
        let etag = self.next_etag();
        self.nodes.lock().expect("nodes lock poisoned").push(Node {
            path: path.to_string(),
            kind: EntryKind::Directory,
            content: Bytes::new(),
            etag,
        });
    }

    fn upsert_file(&self, path: &str, content: Bytes, etag: String) {
        let mut nodes = self.nodes.lock().expect("nodes lock poisoned");
        match nodes.iter_mut().find(|node| node.path == path) {
            Some(node) => {
                node.content = content;
                node.etag = etag;
            }
            None => nodes.push(Node {
                path: path.to_string(),
                kind: EntryKind::File,
                content,
                etag,
            }),
        }
    }

    /// Records the call and applies failure injection
    fn enter(&self, call: Call, op: Op, path: &str) -> Result<String, TransportError> {
        self.calls.lock().expect("calls lock poisoned").push(call);
        let path = normalize_path(path);

        let injected = self
            .failures
            .lock()
            .expect("failures lock poisoned")
            .iter()
            .any(|(failing_op, failing_path)| *failing_op == op && *failing_path == path);
        if injected {
            return Err(TransportError::http(
                op.method(),
                path,
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                "Injected failure".to_string(),
            ));
        }

        Ok(path)
    }

    fn relocate(&self, from: &str, to: &str, keep_source: bool) -> Result<(), TransportError> {
        let method = if keep_source { "COPY" } else { "MOVE" };
        if self.find_node(from).is_none() {
            return Err(not_found(method, from));
        }
        if !self.is_dir(&parent_of(to)) {
            return Err(conflict(method, to, "Missing parent"));
        }

        let mut nodes = self.nodes.lock().expect("nodes lock poisoned");
        nodes.retain(|node| !is_within(&node.path, to));

        let moved: Vec<Node> = nodes
            .iter()
            .filter(|node| is_within(&node.path, from))
            .map(|node| Node {
                path: format!("{}{}", to, &node.path[from.len()..]),
                ..node.clone()
            })
            .collect();

        if !keep_source {
            nodes.retain(|node| !is_within(&node.path, from));
        }
        nodes.extend(moved);
        Ok(())
    }
}

#[async_trait]
impl WebDAVTransport for MemoryTransport {
    async fn put_file_contents(
        &self,
        path: &str,
        mut content: ByteStream,
    ) -> Result<(), TransportError> {
        let path = self.enter(Call::Put(path.to_string()), Op::Put, path)?;

        let mut buf = Vec::new();
        while let Some(chunk) = content.next().await {
            buf.extend_from_slice(&chunk?);
        }

        if !self.is_dir(&parent_of(&path)) {
            return Err(conflict("PUT", &path, "Missing parent"));
        }
        let etag = self.next_etag();
        self.upsert_file(&path, Bytes::from(buf), etag);
        Ok(())
    }

    async fn get_file_contents(&self, path: &str) -> Result<Bytes, TransportError> {
        let path = self.enter(Call::Get(path.to_string()), Op::Get, path)?;
        self.content(&path).ok_or_else(|| not_found("GET", &path))
    }

    async fn get_directory_contents(
        &self,
        path: &str,
    ) -> Result<DirectoryContents, TransportError> {
        let path = self.enter(Call::List(path.to_string()), Op::List, path)?;
        if !self.is_dir(&path) {
            return Err(not_found("PROPFIND", &path));
        }

        let data: Vec<DirectoryEntry> = self
            .nodes
            .lock()
            .expect("nodes lock poisoned")
            .iter()
            .filter(|node| parent_of(&node.path) == path)
            .map(Node::to_entry)
            .collect();

        if self.detailed_listings {
            Ok(DirectoryContents::Detailed(DetailedResponse { data, status: 207 }))
        } else {
            Ok(DirectoryContents::Entries(data))
        }
    }

    async fn move_file(&self, from: &str, to: &str) -> Result<(), TransportError> {
        let from = self.enter(Call::Move(from.to_string(), to.to_string()), Op::Move, from)?;
        self.relocate(&from, &normalize_path(to), false)
    }

    async fn copy_file(&self, from: &str, to: &str) -> Result<(), TransportError> {
        let from = self.enter(Call::Copy(from.to_string(), to.to_string()), Op::Copy, from)?;
        self.relocate(&from, &normalize_path(to), true)
    }

    async fn delete_file(&self, path: &str) -> Result<(), TransportError> {
        let path = self.enter(Call::Delete(path.to_string()), Op::Delete, path)?;
        let node = self.find_node(&path).ok_or_else(|| not_found("DELETE", &path))?;

        let mut nodes = self.nodes.lock().expect("nodes lock poisoned");
        if node.kind == EntryKind::Directory
            && nodes.iter().any(|other| parent_of(&other.path) == path)
        {
            return Err(conflict("DELETE", &path, "Directory not empty"));
        }
        nodes.retain(|other| other.path != path);
        Ok(())
    }

    async fn create_directory(&self, path: &str) -> Result<(), TransportError> {
        let path = self.enter(Call::CreateDirectory(path.to_string()), Op::CreateDirectory, path)?;
        if self.exists(&path) {
            return Err(TransportError::http(
                "MKCOL",
                &path,
                reqwest::StatusCode::METHOD_NOT_ALLOWED,
                "Resource exists".to_string(),
            ));
        }
        if !self.is_dir(&parent_of(&path)) {
            return Err(conflict("MKCOL", &path, "Missing parent"));
        }
        self.ensure_dir(&path);
        Ok(())
    }
}
