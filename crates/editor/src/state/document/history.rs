//! Undo/redo functionality

use super::{DocumentChange, DocumentState};

impl DocumentState {
    /// Undo last change; false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.past.pop() else {
            return false;
        };
        self.future.push(std::mem::replace(&mut self.nodes, prev));
        self.notify(DocumentChange::History);
        true
    }

    /// Redo last undone change
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        self.past.push(std::mem::replace(&mut self.nodes, next));
        self.notify(DocumentChange::History);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::super::DocumentState;
    use shared::{Node, Primitive, Transform};

    fn node(id: &str) -> Node {
        Node::new(id, Primitive::Sphere { radius: 1.0 })
    }

    fn ids(doc: &DocumentState) -> Vec<&str> {
        doc.nodes().iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_undo_empty_is_noop() {
        let mut doc = DocumentState::default();
        assert!(!doc.undo());
        assert!(!doc.redo());
        assert!(doc.take_changes().is_empty());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut doc = DocumentState::default();
        doc.add(node("a"));
        doc.add(node("b"));
        doc.add(node("c"));

        for _ in 0..3 {
            assert!(doc.undo());
        }
        assert!(doc.is_empty());
        assert!(!doc.can_undo());

        for _ in 0..3 {
            assert!(doc.redo());
        }
        assert_eq!(ids(&doc), vec!["a", "b", "c"]);
        assert!(!doc.can_redo());
    }

    #[test]
    fn test_mutation_clears_future() {
        let mut doc = DocumentState::default();
        doc.add(node("a"));
        doc.undo();
        assert!(doc.can_redo());
        doc.add(node("b"));
        assert!(!doc.can_redo());
        assert_eq!(ids(&doc), vec!["b"]);
    }

    #[test]
    fn test_snapshots_do_not_alias_live_nodes() {
        let mut doc = DocumentState::default();
        doc.add(node("a"));
        doc.update_transform("a", Transform::from_position([1.0, 0.0, 0.0]));
        assert!(doc.undo());

        // Edit the live sequence in place; the redo snapshot keeps its value
        doc.nodes[0].transform = Some(Transform::from_position([9.0, 0.0, 0.0]));
        assert_eq!(doc.future[0][0].transform.map(|t| t.position[0]), Some(1.0));
        assert!(doc.past[0].is_empty());

        assert!(doc.redo());
        assert_eq!(doc.get("a").unwrap().transform.map(|t| t.position[0]), Some(1.0));
    }
}
