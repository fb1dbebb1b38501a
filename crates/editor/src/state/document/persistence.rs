//! Autosave/load of the document and the scene-tree side table
//!
//! Saving is fire-and-forget: `FileStore` serializes on the caller's thread
//! and hands the bytes to one background writer task, so writes land in
//! issue order and the last one wins. Failures are logged and swallowed;
//! the in-memory document stays authoritative.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use shared::DocumentFile;
use tokio::sync::mpsc;

use crate::state::tree::TreeState;
use crate::validation::parse_document;

const DOCUMENT_FILE: &str = "autosave.json";
const TREE_FILE: &str = "scene_tree.json";

/// Where documents go between sessions
pub trait DocumentStore {
    /// Best-effort; never blocks on I/O completion
    fn save(&mut self, doc: &DocumentFile);
    /// Last saved document, or None on first run or failure
    fn load_last(&mut self) -> Option<DocumentFile>;
    fn save_tree_state(&mut self, state: &TreeState);
    fn load_tree_state(&mut self) -> TreeState;
}

struct WriteJob {
    path: PathBuf,
    contents: String,
}

/// JSON files in a directory, written by a background tokio task
pub struct FileStore {
    dir: PathBuf,
    runtime: tokio::runtime::Runtime,
    tx: Option<mpsc::UnboundedSender<WriteJob>>,
    writer: Option<tokio::task::JoinHandle<()>>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("autosave")
            .enable_all()
            .build()?;
        let (tx, mut rx) = mpsc::unbounded_channel::<WriteJob>();

        let writer = runtime.spawn(async move {
            while let Some(job) = rx.recv().await {
                if let Some(parent) = job.path.parent() {
                    if let Err(e) = tokio::fs::create_dir_all(parent).await {
                        tracing::warn!("Failed to create {}: {e}", parent.display());
                        continue;
                    }
                }
                if let Err(e) = tokio::fs::write(&job.path, job.contents).await {
                    tracing::warn!("Failed to write {}: {e}", job.path.display());
                }
            }
        });

        Ok(Self {
            dir: dir.into(),
            runtime,
            tx: Some(tx),
            writer: Some(writer),
        })
    }

    /// Store in the platform data directory
    pub fn open_default() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("com", "treed", "treed")?;
        match Self::new(dirs.data_dir()) {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::warn!("Autosave unavailable: {e}");
                None
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn enqueue(&self, name: &str, contents: String) {
        let Some(tx) = &self.tx else {
            return;
        };
        let job = WriteJob {
            path: self.dir.join(name),
            contents,
        };
        if tx.send(job).is_err() {
            tracing::warn!("Autosave writer stopped; dropped write of {name}");
        }
    }

    fn read(&self, name: &str) -> Option<String> {
        let path = self.dir.join(name);
        match std::fs::read_to_string(&path) {
            Ok(json) => Some(json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}", path.display());
                None
            }
        }
    }

    /// Stop accepting writes and wait for queued ones to land.
    ///
    /// Must not be called from inside an async context.
    pub fn close(&mut self) {
        self.tx.take();
        if let Some(writer) = self.writer.take() {
            if let Err(e) = self.runtime.block_on(writer) {
                tracing::warn!("Autosave writer failed: {e}");
            }
        }
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        self.close();
    }
}

impl DocumentStore for FileStore {
    fn save(&mut self, doc: &DocumentFile) {
        match serde_json::to_string_pretty(doc) {
            Ok(json) => self.enqueue(DOCUMENT_FILE, json),
            Err(e) => tracing::warn!("Failed to serialize document: {e}"),
        }
    }

    fn load_last(&mut self) -> Option<DocumentFile> {
        let json = self.read(DOCUMENT_FILE)?;
        match parse_document(&json) {
            Ok(doc) => {
                tracing::info!("Loaded autosave ({} nodes)", doc.nodes.len());
                Some(doc)
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable autosave: {e}");
                None
            }
        }
    }

    fn save_tree_state(&mut self, state: &TreeState) {
        match serde_json::to_string_pretty(state) {
            Ok(json) => self.enqueue(TREE_FILE, json),
            Err(e) => tracing::warn!("Failed to serialize scene tree: {e}"),
        }
    }

    fn load_tree_state(&mut self) -> TreeState {
        let Some(json) = self.read(TREE_FILE) else {
            return TreeState::default();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable scene tree: {e}");
            TreeState::default()
        })
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    document: Option<DocumentFile>,
    tree: TreeState,
    saves: usize,
}

/// In-process store; clones share the same contents
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: DocumentFile) -> Self {
        let store = Self::default();
        if let Ok(mut inner) = store.inner.lock() {
            inner.document = Some(doc);
        }
        store
    }

    /// Last saved document
    pub fn document(&self) -> Option<DocumentFile> {
        self.inner.lock().ok().and_then(|i| i.document.clone())
    }

    pub fn tree(&self) -> TreeState {
        self.inner.lock().map(|i| i.tree.clone()).unwrap_or_default()
    }

    /// Number of document saves so far
    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|i| i.saves).unwrap_or(0)
    }
}

impl DocumentStore for MemoryStore {
    fn save(&mut self, doc: &DocumentFile) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.document = Some(doc.clone());
            inner.saves += 1;
        }
    }

    fn load_last(&mut self) -> Option<DocumentFile> {
        self.document()
    }

    fn save_tree_state(&mut self, state: &TreeState) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.tree = state.clone();
        }
    }

    fn load_tree_state(&mut self) -> TreeState {
        self.tree()
    }
}
