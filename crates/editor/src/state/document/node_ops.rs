//! Node mutations

use std::collections::HashSet;

use shared::{Node, Transform};

use super::{DocumentChange, DocumentState};

impl DocumentState {
    /// Append a node. Rejected (false) if its id is already present.
    pub fn add(&mut self, node: Node) -> bool {
        if self.contains(&node.id) {
            tracing::warn!("Rejected node with duplicate id {}", node.id);
            return false;
        }
        self.save_undo();
        self.nodes.push(node);
        self.notify(DocumentChange::Structure);
        true
    }

    /// Append several nodes as one undoable step.
    pub fn add_many(&mut self, nodes: Vec<Node>) -> bool {
        if nodes.is_empty() {
            return false;
        }
        let mut seen: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        if let Some(dup) = nodes.iter().find(|n| !seen.insert(n.id.as_str())) {
            tracing::warn!("Rejected batch with duplicate id {}", dup.id);
            return false;
        }
        self.save_undo();
        self.nodes.extend(nodes);
        self.notify(DocumentChange::Structure);
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let Some(pos) = self.nodes.iter().position(|n| n.id == id) else {
            return false;
        };
        self.save_undo();
        self.nodes.remove(pos);
        self.notify(DocumentChange::Structure);
        true
    }

    /// Commit a transform. No history entry when the id is unknown or the
    /// stored transform is already exactly equal.
    pub fn update_transform(&mut self, id: &str, transform: Transform) -> bool {
        let Some(pos) = self.nodes.iter().position(|n| n.id == id) else {
            return false;
        };
        if self.nodes[pos].transform == Some(transform) {
            return false;
        }
        self.save_undo();
        self.nodes[pos].transform = Some(transform);
        self.notify(DocumentChange::Transform(id.to_string()));
        true
    }

    /// Replace everything with an external document; not undoable.
    pub fn load(&mut self, nodes: Vec<Node>) {
        self.nodes = nodes;
        self.past.clear();
        self.future.clear();
        self.notify(DocumentChange::Loaded);
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.past.clear();
        self.future.clear();
        self.notify(DocumentChange::Cleared);
    }
}
