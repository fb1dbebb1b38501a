//! Editor engine: live scene, document, selection and gizmo behind one owner.
//!
//! All operations are synchronous. A document mutation completes (history
//! included) before its change is pumped to the synchronizer, which may
//! rebuild the live scene and re-resolve the selection by id.

mod document_ops;
mod input;
mod panel;

pub use document_ops::MirrorMode;

use glam::Vec3;
use shared::{DocumentFile, ObjectId};

use crate::build::primitives::{MeshFactory, PrimitiveFactory};
use crate::build::scene::LiveScene;
use crate::events::{EditorEvent, EventBus, SubscriptionId};
use crate::state::document::{DocumentState, DocumentStore};
use crate::state::selection::{PlaneSelection, SelectionDelta, SelectionState};
use crate::state::settings::EditorSettings;
use crate::state::tree::SceneTree;
use crate::sync::Synchronizer;
use crate::viewport::gizmo::GizmoState;
use crate::viewport::pointer::PointerTracker;
use crate::viewport::region::detect_region;

pub struct Editor {
    pub(crate) settings: EditorSettings,
    pub(crate) document: DocumentState,
    pub(crate) scene: LiveScene,
    pub(crate) tree: SceneTree,
    pub(crate) selection: SelectionState,
    pub(crate) gizmo: GizmoState,
    pub(crate) pointer: PointerTracker,
    pub(crate) sync: Synchronizer,
    events: EventBus,
    factory: Box<dyn PrimitiveFactory>,
    store: Option<Box<dyn DocumentStore>>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl Editor {
    /// Empty editor without persistence
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            document: DocumentState::new(settings.history.max_depth),
            pointer: PointerTracker::new(settings.picking.click_tolerance),
            settings,
            scene: LiveScene::new(),
            tree: SceneTree::default(),
            selection: SelectionState::default(),
            gizmo: GizmoState::default(),
            sync: Synchronizer::default(),
            events: EventBus::default(),
            factory: Box::new(MeshFactory::default()),
            store: None,
        }
    }

    /// Editor restored from `store`: side table first, then the last document.
    pub fn with_store(settings: EditorSettings, mut store: Box<dyn DocumentStore>) -> Self {
        let mut editor = Self::new(settings);
        editor.tree = SceneTree::from_state(store.load_tree_state());
        let last = store.load_last();
        editor.store = Some(store);

        if let Some(doc) = last {
            editor.document.load(doc.nodes);
            editor.document.take_changes();
            editor.prune_tree();
            editor.rebuild();
        }
        editor
    }

    /// Replace the primitive factory and rebuild with it
    pub fn set_factory(&mut self, factory: Box<dyn PrimitiveFactory>) {
        self.factory = factory;
        self.rebuild();
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Edit settings in place; values cached by sub-components are refreshed.
    pub fn update_settings(&mut self, edit: impl FnOnce(&mut EditorSettings)) {
        edit(&mut self.settings);
        self.pointer.set_click_tolerance(self.settings.picking.click_tolerance);
        self.document.set_max_depth(self.settings.history.max_depth);
    }

    pub fn document(&self) -> &DocumentState {
        &self.document
    }

    pub fn scene(&self) -> &LiveScene {
        &self.scene
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn gizmo(&self) -> &GizmoState {
        &self.gizmo
    }

    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    pub fn synchronizer(&self) -> &Synchronizer {
        &self.sync
    }

    pub fn rebuild_count(&self) -> u64 {
        self.sync.rebuild_count()
    }

    pub fn selected_plane(&self) -> Option<&PlaneSelection> {
        self.selection.plane()
    }

    pub fn selected_ids(&self) -> Vec<ObjectId> {
        self.selection.selected_ids()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // ── Synchronization ───────────────────────────────────────

    /// Deliver queued document changes: rebuild when needed, then autosave.
    pub(crate) fn pump_document(&mut self) {
        let changes = self.document.take_changes();
        if changes.is_empty() {
            return;
        }
        let mut rebuild = false;
        for change in &changes {
            rebuild |= self.sync.on_document_change(change);
        }
        if rebuild {
            self.rebuild();
        }
        self.autosave();
    }

    /// Write live transform edits back into the document.
    pub(crate) fn pump_scene_changes(&mut self) {
        for id in self.scene.take_changes() {
            if !self.sync.on_object_changed(&id) {
                continue;
            }
            if let Some(transform) = self.scene.find_object(&id).map(|o| o.transform) {
                self.document.update_transform(&id, transform);
            }
        }
        self.pump_document();
    }

    /// Full rebuild of the live scene, then selection re-resolution by id.
    pub(crate) fn rebuild(&mut self) {
        let report = self.sync.rebuild(
            &self.document,
            &mut self.scene,
            &mut self.tree,
            self.factory.as_ref(),
        );
        for id in report.removed {
            self.events.emit(&EditorEvent::ObjectRemoved(id));
        }
        for id in report.added {
            self.events.emit(&EditorEvent::ObjectAdded(id));
        }
        let delta = self.resolve_selection();
        self.publish(delta);
        self.save_tree();
    }

    fn resolve_selection(&mut self) -> SelectionDelta {
        let mut delta = SelectionDelta::default();
        if let Some(hover) = self.selection.hover() {
            if self.scene.find(&hover.object_id).is_none() {
                delta = delta.merge(self.selection.set_hover(None));
            }
        }
        if let Some(id) = self.selection.body() {
            if self.scene.find(id).is_none() {
                delta = delta.merge(self.selection.select_body(None));
            }
        }
        if let Some(plane) = self.selection.plane().cloned() {
            let next = self.derive_plane(&plane.object_id, plane.seed());
            delta = delta.merge(self.selection.select_plane(next));
        }
        self.refresh_outline();
        self.rebind_gizmo();
        delta
    }

    /// Plane selection on a body's mesh grown from `seed`, in world space
    pub(crate) fn derive_plane(&self, object_id: &str, seed: Option<usize>) -> Option<PlaneSelection> {
        let index = self.scene.find(object_id)?;
        let object = self.scene.get(index)?;
        if !self.scene.is_effectively_visible(index) {
            return None;
        }
        let region = detect_region(object.mesh.as_ref()?, seed?, &self.settings.region)?;
        Some(PlaneSelection::from_region(
            object.id.clone(),
            &region,
            &self.scene.world_matrix(index),
        ))
    }

    /// Outline helper follows the committed selection
    pub(crate) fn refresh_outline(&mut self) {
        self.scene.detach_outline();
        if let Some(plane) = self.selection.plane() {
            if let Some(index) = self.scene.find(&plane.object_id) {
                let inverse = self.scene.world_matrix(index).inverse();
                let local = plane
                    .boundary
                    .iter()
                    .map(|p| inverse.transform_point3(Vec3::from_array(*p)))
                    .collect();
                self.scene.attach_outline(index, local);
            }
        } else if let Some(id) = self.selection.body() {
            if let Some(index) = self.scene.find(id) {
                self.scene.attach_outline(index, Vec::new());
            }
        }
    }

    pub(crate) fn rebind_gizmo(&mut self) {
        let locked = self
            .selection
            .body()
            .and_then(|id| self.scene.find_object(id))
            .is_some_and(|o| o.locked);
        let Some((id, start)) = self.gizmo.bind(self.selection.body(), locked) else {
            return;
        };
        // The drag lost its body: drop the uncommitted preview
        self.pointer.set_gizmo_dragging(false);
        if let Some(index) = self.scene.find(&id) {
            self.scene.preview_transform(index, start);
        }
        tracing::debug!("Gizmo drag on {id} interrupted, preview rolled back");
    }

    // ── Events ────────────────────────────────────────────────

    /// Emit selection events for whatever the delta says changed
    pub(crate) fn publish(&mut self, delta: SelectionDelta) {
        if delta.body {
            let ids = self.selection.selected_ids();
            self.events.emit(&EditorEvent::SelectionChanged(ids));
        }
        if delta.plane {
            let plane = self.selection.plane().cloned();
            self.events.emit(&EditorEvent::PlaneSelected(plane));
        }
    }

    pub(crate) fn updated(&mut self) {
        self.events.emit(&EditorEvent::Updated);
    }

    // ── Persistence ───────────────────────────────────────────

    fn autosave(&mut self) {
        if !self.settings.autosave.enabled {
            return;
        }
        let snapshot = DocumentFile {
            nodes: self.scene_snapshot(),
        };
        if let Some(store) = self.store.as_mut() {
            store.save(&snapshot);
        }
    }

    pub(crate) fn save_tree(&mut self) {
        if let Some(store) = self.store.as_mut() {
            store.save_tree_state(self.tree.state());
        }
    }

    /// Drop side-table entries for ids the document no longer has
    pub(crate) fn prune_tree(&mut self) {
        let live = self.document.nodes().iter().map(|n| n.id.clone()).collect();
        self.tree.retain(&live);
    }
}
