//! Document-level operations: add, duplicate, array, mirror, history, load

use serde::{Deserialize, Serialize};
use shared::{DocumentFile, Node, ObjectId, Primitive, Transform};

use super::Editor;
use crate::export::snapshot_json;
use crate::geometry::Axis;
use crate::state::selection::SelectionMode;
use crate::validation::{parse_document, DocumentError};

/// Mirror result: a mirrored clone, or the selection flipped in place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorMode {
    #[default]
    Copy,
    Flip,
}

fn new_id() -> ObjectId {
    uuid::Uuid::new_v4().to_string()
}

/// Reflection through the origin across the plane perpendicular to `axis`
pub fn mirror_transform(t: Transform, axis: Axis) -> Transform {
    let i = axis.index();
    let mut out = t;
    out.position[i] = -t.position[i];
    out.scale[i] = -t.scale[i];
    out
}

impl Editor {
    /// Add a primitive with a fresh id and select it (body mode).
    pub fn add_primitive(&mut self, primitive: Primitive) -> ObjectId {
        let id = new_id();
        self.add_node(Node::new(id.clone(), primitive));
        id
    }

    /// Add a node (undoable); false when its id is taken.
    pub fn add_node(&mut self, node: Node) -> bool {
        let id = node.id.clone();
        if !self.document.add(node) {
            return false;
        }
        self.pump_document();
        self.select_new(id);
        true
    }

    fn select_new(&mut self, id: ObjectId) {
        if self.selection.mode() == SelectionMode::Bodies {
            let delta = self.selection.select_body(Some(id));
            self.refresh_outline();
            self.rebind_gizmo();
            self.publish(delta);
        }
        self.updated();
    }

    pub fn undo(&mut self) -> bool {
        if !self.document.undo() {
            return false;
        }
        self.pump_document();
        self.updated();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.document.redo() {
            return false;
        }
        self.pump_document();
        self.updated();
        true
    }

    /// Replace the document; history is dropped.
    pub fn load(&mut self, doc: DocumentFile) {
        self.document.load(doc.nodes);
        self.prune_tree();
        self.pump_document();
        self.updated();
    }

    /// Load an untrusted document. On error nothing changes.
    pub fn load_document_json(&mut self, json: &str) -> Result<(), DocumentError> {
        let doc = parse_document(json).inspect_err(|e| tracing::warn!("Rejected document: {e}"))?;
        tracing::info!("Loaded document ({} nodes)", doc.nodes.len());
        self.load(doc);
        Ok(())
    }

    /// Empty document, fresh names
    pub fn new_document(&mut self) {
        self.document.clear();
        self.tree.reset();
        self.pump_document();
        self.updated();
    }

    /// Set a body's transform through the live scene; committed like any live edit.
    pub fn set_transform(&mut self, id: &str, transform: Transform) -> bool {
        let Some(index) = self.scene.find(id) else {
            return false;
        };
        self.scene.set_transform(index, transform);
        self.pump_scene_changes();
        self.follow_plane();
        self.updated();
        true
    }

    /// Clone the selected body next to itself and select the clone.
    ///
    /// Rebuilds explicitly once; the document change it causes is marked as
    /// an echo so the synchronizer does not rebuild a second time.
    pub fn duplicate_selection(&mut self) -> Option<ObjectId> {
        let source = self.selection.body()?.clone();
        let primitive = self.document.get(&source)?.primitive.clone();
        let mut transform = self.scene.find_object(&source)?.transform;
        transform.position[0] += self.settings.snap.move_step;

        let id = new_id();
        let copy = Node::new(id.clone(), primitive).with_transform(transform);
        if !self.add_echoed(vec![copy]) {
            return None;
        }
        self.select_new(id.clone());
        Some(id)
    }

    /// `count` copies of the selection stepped by `spacing` along `axis`, as one undo step.
    pub fn array_selection(&mut self, count: usize, spacing: f64, axis: Axis) -> Vec<ObjectId> {
        if count < 1 {
            return Vec::new();
        }
        let Some(source) = self.selection.body().cloned() else {
            return Vec::new();
        };
        let (Some(node), Some(object)) = (self.document.get(&source), self.scene.find_object(&source)) else {
            return Vec::new();
        };
        let base = object.transform;
        let copies: Vec<Node> = (1..=count)
            .map(|i| {
                let mut t = base;
                t.position[axis.index()] += spacing * i as f64;
                Node::new(new_id(), node.primitive.clone()).with_transform(t)
            })
            .collect();
        let ids: Vec<ObjectId> = copies.iter().map(|n| n.id.clone()).collect();

        if !self.add_echoed(copies) {
            return Vec::new();
        }
        self.updated();
        ids
    }

    /// Mirror the selection through the origin on `axis`.
    pub fn mirror_selection(&mut self, axis: Axis, mode: MirrorMode) -> Option<ObjectId> {
        let source = self.selection.body()?.clone();
        let primitive = self.document.get(&source)?.primitive.clone();
        let mirrored = mirror_transform(self.scene.find_object(&source)?.transform, axis);

        match mode {
            MirrorMode::Copy => {
                let id = new_id();
                self.add_node(Node::new(id.clone(), primitive).with_transform(mirrored))
                    .then_some(id)
            }
            MirrorMode::Flip => self.set_transform(&source, mirrored).then_some(source),
        }
    }

    /// Add nodes, rebuild explicitly, and let the echoed change skip its rebuild.
    fn add_echoed(&mut self, nodes: Vec<Node>) -> bool {
        self.sync.expect_echo();
        if !self.document.add_many(nodes) {
            self.sync.cancel_echo();
            return false;
        }
        self.rebuild();
        self.pump_document();
        true
    }

    /// Document nodes in order, with transforms taken from the live scene
    pub fn scene_snapshot(&self) -> Vec<Node> {
        self.document
            .nodes()
            .iter()
            .map(|node| {
                let mut node = node.clone();
                if let Some(object) = self.scene.find_object(&node.id) {
                    node.transform = Some(object.transform);
                }
                node
            })
            .collect()
    }

    pub fn export_scene_json(&self) -> Result<String, serde_json::Error> {
        snapshot_json(&self.scene_snapshot())
    }
}
