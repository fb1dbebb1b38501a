//! Scene–document synchronization.
//!
//! Full rebuild policy: every pass discards all live bodies and rebuilds
//! them from the document nodes. Two directions are kept from feeding each
//! other through an explicit reconciliation state:
//!
//! - while `Rebuilding`, live-scene change notifications are dropped, so a
//!   rebuild never writes transforms back into the document;
//! - `expect_echo` marks the next rebuild-worthy document change as already
//!   handled by the caller's own explicit rebuild, and is consumed by it.

use std::collections::HashSet;

use shared::ObjectId;

use crate::build::primitives::PrimitiveFactory;
use crate::build::scene::{LiveObject, LiveScene};
use crate::state::document::{DocumentChange, DocumentState};
use crate::state::tree::SceneTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcileState {
    #[default]
    Idle,
    Rebuilding,
}

/// Bodies that entered or left the live scene in one rebuild
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildReport {
    pub added: Vec<ObjectId>,
    pub removed: Vec<ObjectId>,
}

#[derive(Debug, Default)]
pub struct Synchronizer {
    state: ReconcileState,
    expect_echo: bool,
    rebuild_count: u64,
    dropped_notifications: u64,
}

impl Synchronizer {
    pub fn state(&self) -> ReconcileState {
        self.state
    }

    /// Total rebuilds performed
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    /// Change notifications discarded because a rebuild was running
    pub fn dropped_notifications(&self) -> u64 {
        self.dropped_notifications
    }

    /// The next rebuild-worthy document change is an echo of an explicit rebuild.
    pub fn expect_echo(&mut self) {
        self.expect_echo = true;
    }

    /// Withdraw an `expect_echo` whose mutation did not happen
    pub fn cancel_echo(&mut self) {
        self.expect_echo = false;
    }

    pub fn is_expecting_echo(&self) -> bool {
        self.expect_echo
    }

    /// Whether a document change should trigger a rebuild.
    pub fn on_document_change(&mut self, change: &DocumentChange) -> bool {
        if !change.needs_rebuild() {
            return false;
        }
        if self.expect_echo {
            self.expect_echo = false;
            tracing::debug!("Skipping rebuild for echoed {change:?}");
            return false;
        }
        true
    }

    /// Whether a live-object change should be written back to the document.
    pub fn on_object_changed(&mut self, id: &str) -> bool {
        if self.state == ReconcileState::Rebuilding {
            self.dropped_notifications += 1;
            tracing::debug!("Dropped change notification for {id} during rebuild");
            return false;
        }
        true
    }

    /// Rebuild every live body from the document.
    pub fn rebuild(
        &mut self,
        document: &DocumentState,
        scene: &mut LiveScene,
        tree: &mut SceneTree,
        factory: &dyn PrimitiveFactory,
    ) -> RebuildReport {
        self.state = ReconcileState::Rebuilding;
        let before: Vec<ObjectId> = scene.ids();
        scene.remove_pickable();

        for node in document.nodes() {
            let renderable = factory.build(&node.primitive);
            let item = tree.ensure(&node.id, renderable.node_type);
            let mut object = LiveObject::body(
                node.id.clone(),
                renderable.node_type,
                renderable.mesh,
                renderable.placement,
            );
            object.visible = item.visible;
            object.locked = item.locked;
            let index = scene.add(object);
            // Applying the TRS raises a change notification like any other edit
            scene.set_transform(index, node.transform.unwrap_or(renderable.placement));
        }

        for id in scene.take_changes() {
            self.on_object_changed(&id);
        }

        self.rebuild_count += 1;
        self.state = ReconcileState::Idle;

        let after = scene.ids();
        let before_set: HashSet<&ObjectId> = before.iter().collect();
        let after_set: HashSet<&ObjectId> = after.iter().collect();
        let report = RebuildReport {
            added: after.iter().filter(|id| !before_set.contains(id)).cloned().collect(),
            removed: before.iter().filter(|id| !after_set.contains(id)).cloned().collect(),
        };
        tracing::debug!(
            "Rebuild #{}: {} bodies (+{} -{})",
            self.rebuild_count,
            after.len(),
            report.added.len(),
            report.removed.len()
        );
        report
    }
}
