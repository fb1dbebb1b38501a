//! Document model
//!
//! Ordered node list with snapshot-based undo/redo history. Every mutation
//! completes (including its history push) before the matching
//! `DocumentChange` is queued for the synchronizer.

mod history;
mod node_ops;
mod persistence;

pub use persistence::{DocumentStore, FileStore, MemoryStore};

use shared::{Node, ObjectId};

/// What a document mutation changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentChange {
    /// Nodes added or removed
    Structure,
    /// One node's transform was committed
    Transform(ObjectId),
    /// Undo or redo replaced the node list
    History,
    /// External document replaced everything
    Loaded,
    Cleared,
}

impl DocumentChange {
    /// Transform commits come from the live scene and need no rebuild
    pub fn needs_rebuild(&self) -> bool {
        !matches!(self, DocumentChange::Transform(_))
    }
}

/// Node list with undo/redo history
#[derive(Debug)]
pub struct DocumentState {
    pub(crate) nodes: Vec<Node>,
    /// Snapshots before each mutation, oldest first
    pub(crate) past: Vec<Vec<Node>>,
    /// Snapshots undone, most recent last
    pub(crate) future: Vec<Vec<Node>>,
    max_depth: usize,
    /// Monotonically increasing version counter
    version: u64,
    pending: Vec<DocumentChange>,
}

impl Default for DocumentState {
    fn default() -> Self {
        Self::new(100)
    }
}

impl DocumentState {
    pub fn new(max_depth: usize) -> Self {
        Self {
            nodes: Vec::new(),
            past: Vec::new(),
            future: Vec::new(),
            max_depth: max_depth.max(1),
            version: 0,
            pending: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of undo snapshots
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Drain queued change notifications, oldest first
    pub fn take_changes(&mut self) -> Vec<DocumentChange> {
        std::mem::take(&mut self.pending)
    }

    /// Change the undo depth, dropping the oldest snapshots beyond it.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth.max(1);
        self.trim_past();
    }

    /// Record the pre-mutation sequence and invalidate redo.
    pub(crate) fn save_undo(&mut self) {
        self.past.push(self.nodes.clone());
        self.trim_past();
        self.future.clear();
    }

    fn trim_past(&mut self) {
        let excess = self.past.len().saturating_sub(self.max_depth);
        self.past.drain(..excess);
    }

    pub(crate) fn notify(&mut self, change: DocumentChange) {
        self.version += 1;
        self.pending.push(change);
    }
}
