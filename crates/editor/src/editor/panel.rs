//! Imperative accessors used by panels: scene graph, selection, flags.
//!
//! Every operation validates its id, silently does nothing for unknown
//! ids, and raises `updated` on success.

use shared::{ObjectId, SceneGraphNode};

use super::Editor;
use crate::state::selection::SelectionMode;

impl Editor {
    /// Display projection of the live scene, ordered by the side table
    pub fn get_scene_graph(&self) -> Vec<SceneGraphNode> {
        let mut roots: Vec<SceneGraphNode> = self
            .scene
            .roots()
            .map(|(index, object)| {
                let item = self.tree.get(&object.id);
                SceneGraphNode {
                    id: object.id.clone(),
                    name: item
                        .map(|i| i.name.clone())
                        .unwrap_or_else(|| object.node_type.label().to_string()),
                    node_type: object.node_type,
                    visible: object.visible,
                    locked: object.locked,
                    children: self
                        .scene
                        .children(index)
                        .map(|(_, child)| SceneGraphNode {
                            id: child.id.clone(),
                            name: child.id.clone(),
                            node_type: child.node_type,
                            visible: child.visible,
                            locked: child.locked,
                            children: Vec::new(),
                        })
                        .collect(),
                }
            })
            .collect();
        roots.sort_by_key(|n| self.tree.order_of(&n.id));
        roots
    }

    /// Select bodies by id (only the first is used). An empty list clears.
    pub fn select(&mut self, ids: &[ObjectId]) -> bool {
        let target = match ids.first() {
            Some(id) if self.scene.find(id).is_some() => Some(id.clone()),
            Some(_) => return false,
            None => None,
        };

        let delta = match target {
            Some(id) => {
                let mut delta = Default::default();
                if self.selection.mode() == SelectionMode::Planes {
                    delta = self.selection.set_mode(SelectionMode::Bodies);
                }
                self.selection.select_body(Some(id)).merge(delta)
            }
            None => self.selection.clear(),
        };
        self.refresh_outline();
        self.rebind_gizmo();
        self.publish(delta);
        self.updated();
        true
    }

    pub fn clear_selection(&mut self) {
        let delta = self.selection.clear();
        self.refresh_outline();
        self.rebind_gizmo();
        if delta.any() {
            self.publish(delta);
            self.updated();
        }
    }

    /// Hiding a body drops it from every selection; any toggle drops a plane on it.
    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        let Some(index) = self.scene.find(id) else {
            return false;
        };
        self.tree.set_visible(id, visible);
        if let Some(object) = self.scene.get_mut(index) {
            object.visible = visible;
        }

        let mut delta = Default::default();
        if self.selection.plane().is_some_and(|p| p.object_id == id) {
            delta = self.selection.select_plane(None);
        }
        if !visible {
            delta = self.selection.forget(id).merge(delta);
        }
        self.refresh_outline();
        self.rebind_gizmo();
        self.save_tree();
        self.publish(delta);
        self.updated();
        true
    }

    /// Locking detaches the gizmo but keeps the selection.
    pub fn set_locked(&mut self, id: &str, locked: bool) -> bool {
        let Some(index) = self.scene.find(id) else {
            return false;
        };
        self.tree.set_locked(id, locked);
        if let Some(object) = self.scene.get_mut(index) {
            object.locked = locked;
        }
        self.rebind_gizmo();
        self.save_tree();
        self.updated();
        true
    }

    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        if self.scene.find(id).is_none() || !self.tree.rename(id, name) {
            return false;
        }
        self.save_tree();
        self.updated();
        true
    }

    /// Remove a body from the document (undoable)
    pub fn delete(&mut self, id: &str) -> bool {
        if !self.document.contains(id) {
            return false;
        }
        let delta = self.selection.forget(id);
        self.publish(delta);
        self.document.remove(id);
        self.pump_document();
        self.updated();
        true
    }

    /// Panel order of top-level bodies; every id must exist.
    pub fn reorder(&mut self, ids: &[ObjectId]) -> bool {
        if ids.iter().any(|id| self.scene.find(id).is_none()) {
            return false;
        }
        self.tree.reorder(ids);
        self.save_tree();
        self.updated();
        true
    }
}
