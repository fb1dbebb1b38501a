//! Scene-tree side table: per-id name, visibility, lock and order.
//!
//! Survives rebuilds of the live scene; the scene graph handed to panels is
//! re-derived from the live scene and this table on every pass.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use shared::{NodeType, ObjectId, SceneTreeItem};

/// Persisted form of the side table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeState {
    #[serde(default)]
    pub items: BTreeMap<ObjectId, SceneTreeItem>,
    /// Last number handed out per kind label ("Cube" → 3)
    #[serde(default)]
    pub counters: BTreeMap<String, usize>,
}

#[derive(Debug, Default)]
pub struct SceneTree {
    state: TreeState,
}

impl SceneTree {
    pub fn from_state(state: TreeState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &TreeState {
        &self.state
    }

    pub fn get(&self, id: &str) -> Option<&SceneTreeItem> {
        self.state.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.items.contains_key(id)
    }

    /// Entry for `id`, created with the next "<Kind> <n>" name if missing.
    pub fn ensure(&mut self, id: &str, node_type: NodeType) -> &SceneTreeItem {
        if !self.state.items.contains_key(id) {
            let label = node_type.label();
            let counter = self.state.counters.entry(label.to_string()).or_insert(0);
            *counter += 1;
            let item = SceneTreeItem {
                name: format!("{label} {counter}"),
                visible: true,
                locked: false,
                order: self.next_order(),
            };
            self.state.items.insert(id.to_string(), item);
        }
        &self.state.items[id]
    }

    fn next_order(&self) -> usize {
        self.state
            .items
            .values()
            .map(|i| i.order + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        match self.state.items.get_mut(id) {
            Some(item) => {
                item.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn set_locked(&mut self, id: &str, locked: bool) -> bool {
        match self.state.items.get_mut(id) {
            Some(item) => {
                item.locked = locked;
                true
            }
            None => false,
        }
    }

    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        match self.state.items.get_mut(id) {
            Some(item) => {
                item.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Put the listed ids first, in the given order; the rest follow in
    /// their previous relative order. Unknown ids are ignored.
    pub fn reorder(&mut self, ids: &[ObjectId]) {
        let listed: Vec<&ObjectId> = ids.iter().filter(|id| self.contains(id)).collect();
        let listed_set: HashSet<&ObjectId> = listed.iter().copied().collect();

        let mut rest: Vec<(usize, ObjectId)> = self
            .state
            .items
            .iter()
            .filter(|(id, _)| !listed_set.contains(id))
            .map(|(id, item)| (item.order, id.clone()))
            .collect();
        rest.sort();

        let order: Vec<ObjectId> = listed
            .into_iter()
            .cloned()
            .chain(rest.into_iter().map(|(_, id)| id))
            .collect();
        for (i, id) in order.iter().enumerate() {
            if let Some(item) = self.state.items.get_mut(id) {
                item.order = i;
            }
        }
    }

    /// Order key for sorting panel rows
    pub fn order_of(&self, id: &str) -> usize {
        self.get(id).map(|i| i.order).unwrap_or(usize::MAX)
    }

    /// Drop entries for ids not in `live`
    pub fn retain(&mut self, live: &HashSet<ObjectId>) {
        self.state.items.retain(|id, _| live.contains(id));
    }

    /// Forget everything, counters included
    pub fn reset(&mut self) {
        self.state = TreeState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names_per_kind() {
        let mut tree = SceneTree::default();
        assert_eq!(tree.ensure("a", NodeType::Cube).name, "Cube 1");
        assert_eq!(tree.ensure("b", NodeType::Sphere).name, "Sphere 1");
        assert_eq!(tree.ensure("c", NodeType::Cube).name, "Cube 2");
        // Existing entries keep their name
        assert_eq!(tree.ensure("a", NodeType::Cube).name, "Cube 1");
        assert_eq!(tree.get("c").unwrap().order, 2);
    }

    #[test]
    fn test_flags_and_rename_require_known_id() {
        let mut tree = SceneTree::default();
        tree.ensure("a", NodeType::Cube);
        assert!(tree.set_visible("a", false));
        assert!(tree.set_locked("a", true));
        assert!(tree.rename("a", "Base"));
        assert!(!tree.rename("zz", "x"));
        let item = tree.get("a").unwrap();
        assert!(!item.visible && item.locked);
        assert_eq!(item.name, "Base");
    }

    #[test]
    fn test_reorder() {
        let mut tree = SceneTree::default();
        for id in ["a", "b", "c", "d"] {
            tree.ensure(id, NodeType::Cube);
        }
        tree.reorder(&["c".into(), "missing".into(), "a".into()]);
        let mut ids: Vec<&str> = ["a", "b", "c", "d"].to_vec();
        ids.sort_by_key(|id| tree.order_of(id));
        assert_eq!(ids, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_retain_and_reset() {
        let mut tree = SceneTree::default();
        tree.ensure("a", NodeType::Cube);
        tree.ensure("b", NodeType::Cube);
        tree.retain(&HashSet::from(["b".to_string()]));
        assert!(!tree.contains("a"));
        // Counters survive pruning
        assert_eq!(tree.ensure("c", NodeType::Cube).name, "Cube 3");
        tree.reset();
        assert_eq!(tree.ensure("d", NodeType::Cube).name, "Cube 1");
    }
}
