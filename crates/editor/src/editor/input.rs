//! Pointer input, picking, tools and gizmo drags

use shared::{ObjectId, Transform};

use super::Editor;
use crate::state::selection::{HoverTarget, PlaneSelection, SelectionMode};
use crate::viewport::gizmo::{snap_transform, TransformTool};
use crate::viewport::picking::{pick_scene, Hit, Ray};
use crate::viewport::pointer::{Gesture, PointerEvent};
use crate::viewport::region::detect_region;

impl Editor {
    /// Nearest hit and the id of its top-level owner
    pub fn pick(&self, ray: &Ray) -> Option<(Hit, ObjectId)> {
        let hit = pick_scene(&self.scene, ray)?;
        let owner = self.scene.top_level(hit.object)?;
        let id = self.scene.get(owner)?.id.clone();
        Some((hit, id))
    }

    /// Continuous hover; suspended during orbit and gizmo drags.
    pub fn pointer_move(&mut self, event: &PointerEvent) {
        if !self.settings.picking.hover || !self.pointer.hover_allowed() {
            return;
        }
        let target = self.pick(&event.ray).map(|(hit, object_id)| HoverTarget {
            object_id,
            triangle_index: hit.triangle_index,
        });
        self.selection.set_hover(target);
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) {
        self.pointer.pointer_down(event.position);
    }

    /// Returns true when the gesture was a click and a pick was made.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> bool {
        match self.pointer.pointer_up(event.position) {
            Gesture::Click => {
                self.click(&event.ray);
                true
            }
            Gesture::Drag | Gesture::None => false,
        }
    }

    pub fn set_orbiting(&mut self, orbiting: bool) {
        self.pointer.set_orbiting(orbiting);
        if orbiting {
            self.selection.set_hover(None);
        }
    }

    /// Committed click: select the hit body or plane, or clear on a miss.
    pub fn click(&mut self, ray: &Ray) {
        let picked = self.pick(ray);
        let delta = match (self.selection.mode(), picked) {
            (_, None) => self.selection.clear(),
            (SelectionMode::Bodies, Some((_, owner))) => self.selection.select_body(Some(owner)),
            (SelectionMode::Planes, Some((hit, owner))) => {
                let plane = self.plane_at(&hit, owner);
                self.selection.select_plane(plane)
            }
        };
        self.refresh_outline();
        self.rebind_gizmo();
        if delta.body || delta.plane {
            self.publish(delta);
            self.updated();
        }
    }

    fn plane_at(&self, hit: &Hit, owner: ObjectId) -> Option<PlaneSelection> {
        let mesh = self.scene.get(hit.object)?.mesh.as_ref()?;
        let region = detect_region(mesh, hit.triangle_index, &self.settings.region)?;
        Some(PlaneSelection::from_region(
            owner,
            &region,
            &self.scene.world_matrix(hit.object),
        ))
    }

    /// Switch between body and plane picking; clears every selection.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        if self.selection.mode() == mode {
            return;
        }
        let delta = self.selection.set_mode(mode);
        self.refresh_outline();
        self.rebind_gizmo();
        self.publish(delta);
        self.updated();
    }

    pub fn set_tool(&mut self, tool: TransformTool) {
        self.gizmo.tool = tool;
        self.rebind_gizmo();
    }

    /// g / r / s choose translate / rotate / scale
    pub fn key_pressed(&mut self, key: char) -> bool {
        match TransformTool::from_key(key) {
            Some(tool) => {
                self.set_tool(tool);
                true
            }
            None => false,
        }
    }

    // ── Gizmo drag ────────────────────────────────────────────

    pub fn begin_drag(&mut self) -> bool {
        let Some(index) = self.gizmo.attached().and_then(|id| self.scene.find(id)) else {
            return false;
        };
        let Some(current) = self.scene.get(index).map(|o| o.transform) else {
            return false;
        };
        if !self.gizmo.begin_drag(current) {
            return false;
        }
        self.pointer.set_gizmo_dragging(true);
        self.selection.set_hover(None);
        true
    }

    /// Live drag frame: moves the body in the scene only.
    pub fn drag_to(&mut self, transform: Transform) -> bool {
        if !self.gizmo.is_dragging() {
            return false;
        }
        let Some(index) = self.gizmo.attached().and_then(|id| self.scene.find(id)) else {
            return false;
        };
        let snapped = snap_transform(transform, self.gizmo.tool, &self.settings.snap);
        self.scene.preview_transform(index, snapped)
    }

    /// Commit the dragged transform; false when it equals the stored one.
    pub fn end_drag(&mut self) -> bool {
        self.pointer.set_gizmo_dragging(false);
        if self.gizmo.end_drag().is_none() {
            return false;
        }
        let Some(id) = self.gizmo.attached().cloned() else {
            return false;
        };
        let Some(live) = self.scene.find_object(&id).map(|o| o.transform) else {
            return false;
        };

        let committed = self.sync.on_object_changed(&id) && self.document.update_transform(&id, live);
        self.pump_document();
        if committed {
            self.follow_plane();
            self.updated();
        }
        committed
    }

    /// Abort a drag, restoring the transform it started from
    pub fn cancel_drag(&mut self) -> bool {
        self.pointer.set_gizmo_dragging(false);
        let Some(start) = self.gizmo.end_drag() else {
            return false;
        };
        if let Some(index) = self.gizmo.attached().and_then(|id| self.scene.find(id)) {
            self.scene.preview_transform(index, start);
        }
        true
    }

    /// Recompute the world-space plane selection after its body moved
    pub(crate) fn follow_plane(&mut self) {
        let Some(plane) = self.selection.plane().cloned() else {
            return;
        };
        let next = self.derive_plane(&plane.object_id, plane.seed());
        let delta = self.selection.select_plane(next);
        self.refresh_outline();
        self.publish(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use shared::Primitive;

    fn down_ray() -> Ray {
        // Straight down onto the top face of a cube resting on the ground
        Ray::new(Vec3::new(0.2, 50.0, 0.1), Vec3::NEG_Y)
    }

    fn editor_with_cube() -> (Editor, ObjectId) {
        let mut e = Editor::default();
        let id = e.add_primitive(Primitive::Cube { size: 2.0 });
        e.clear_selection();
        (e, id)
    }

    #[test]
    fn test_click_selects_top_level_body() {
        let (mut e, id) = editor_with_cube();
        e.click(&down_ray());
        assert_eq!(e.selected_ids(), vec![id]);
    }

    #[test]
    fn test_click_miss_clears() {
        let (mut e, _) = editor_with_cube();
        e.click(&down_ray());
        // Misses the cube; only the ground grid helper is below
        e.click(&Ray::new(Vec3::new(30.0, 50.0, 0.0), Vec3::NEG_Y));
        assert!(e.selected_ids().is_empty());
    }

    #[test]
    fn test_drag_gesture_suppresses_click() {
        let (mut e, _) = editor_with_cube();
        e.pointer_down(&PointerEvent::new(Vec2::new(0.0, 0.0), down_ray()));
        assert!(!e.pointer_up(&PointerEvent::new(Vec2::new(5.0, 0.0), down_ray())));
        assert!(e.selected_ids().is_empty());

        e.pointer_down(&PointerEvent::new(Vec2::new(0.0, 0.0), down_ray()));
        assert!(e.pointer_up(&PointerEvent::new(Vec2::new(1.0, 0.5), down_ray())));
        assert_eq!(e.selected_ids().len(), 1);
    }

    #[test]
    fn test_click_tolerance_follows_settings() {
        let (mut e, _) = editor_with_cube();
        e.update_settings(|s| s.picking.click_tolerance = 30.0);
        e.pointer_down(&PointerEvent::new(Vec2::new(0.0, 0.0), down_ray()));
        assert!(e.pointer_up(&PointerEvent::new(Vec2::new(5.0, 0.0), down_ray())));
        assert_eq!(e.selected_ids().len(), 1);
    }

    #[test]
    fn test_hover_suspended_while_orbiting() {
        let (mut e, id) = editor_with_cube();
        let ev = PointerEvent::new(Vec2::ZERO, down_ray());
        e.set_orbiting(true);
        e.pointer_move(&ev);
        assert!(e.selection().hover().is_none());
        e.set_orbiting(false);
        e.pointer_move(&ev);
        assert_eq!(e.selection().hover().unwrap().object_id, id);
    }

    #[test]
    fn test_plane_click_on_top_face() {
        let (mut e, id) = editor_with_cube();
        e.set_mode(SelectionMode::Planes);
        e.click(&down_ray());
        let plane = e.selected_plane().unwrap();
        assert_eq!(plane.object_id, id);
        assert_eq!(plane.face_ids.len(), 2);
        assert!((plane.normal() - Vec3::Y).length() < 1e-5);
        // Cube of size 2 rests on the ground: top face at y = 2
        assert!((plane.origin() - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-4);
        assert!(e.selected_ids().is_empty());
    }

    #[test]
    fn test_gizmo_requires_tool_and_unlocked() {
        let (mut e, id) = editor_with_cube();
        e.click(&down_ray());
        assert!(e.gizmo().attached().is_none());
        assert!(e.key_pressed('g'));
        assert!(e.gizmo().is_attached_to(&id));

        e.set_locked(&id, true);
        assert!(e.gizmo().attached().is_none());
        assert_eq!(e.selected_ids(), vec![id.clone()]);
        e.set_locked(&id, false);
        assert!(e.gizmo().is_attached_to(&id));
    }

    #[test]
    fn test_drag_commits_once() {
        let (mut e, id) = editor_with_cube();
        e.click(&down_ray());
        e.set_tool(TransformTool::Translate);
        let past = e.document().past_len();

        assert!(e.begin_drag());
        for x in 1..5 {
            assert!(e.drag_to(Transform::from_position([x as f64, 1.0, 0.0])));
        }
        // Drag frames never touch the document
        assert_eq!(e.document().past_len(), past);
        assert!(e.end_drag());
        assert_eq!(e.document().past_len(), past + 1);
        assert_eq!(e.document().get(&id).unwrap().transform.unwrap().position, [4.0, 1.0, 0.0]);

        // Same value again: no history entry
        assert!(e.begin_drag());
        assert!(!e.end_drag());
        assert_eq!(e.document().past_len(), past + 1);
    }

    #[test]
    fn test_drag_snaps_when_enabled() {
        let (mut e, id) = editor_with_cube();
        e.update_settings(|s| s.snap.enabled = true);
        e.click(&down_ray());
        e.set_tool(TransformTool::Translate);
        e.begin_drag();
        e.drag_to(Transform::from_position([2.4, 1.2, -0.7]));
        e.end_drag();
        assert_eq!(e.document().get(&id).unwrap().transform.unwrap().position, [2.0, 1.0, -1.0]);
    }

    #[test]
    fn test_cancel_drag_restores() {
        let (mut e, id) = editor_with_cube();
        e.click(&down_ray());
        e.set_tool(TransformTool::Translate);
        e.begin_drag();
        e.drag_to(Transform::from_position([9.0, 9.0, 9.0]));
        assert!(e.cancel_drag());
        assert_eq!(e.scene().find_object(&id).unwrap().transform.position, [0.0, 1.0, 0.0]);
        assert!(e.document().get(&id).unwrap().transform.is_none());
    }

    #[test]
    fn test_lock_mid_drag_rolls_back_preview() {
        let (mut e, id) = editor_with_cube();
        e.click(&down_ray());
        e.set_tool(TransformTool::Translate);
        assert!(e.begin_drag());
        e.drag_to(Transform::from_position([6.0, 1.0, 0.0]));

        e.set_locked(&id, true);
        assert!(!e.gizmo().is_dragging());
        assert_eq!(e.scene().find_object(&id).unwrap().transform.position, [0.0, 1.0, 0.0]);
        assert!(e.document().get(&id).unwrap().transform.is_none());
        assert!(!e.end_drag());
        assert!(!e.cancel_drag());

        e.set_locked(&id, false);
        e.pointer_move(&PointerEvent::new(Vec2::ZERO, down_ray()));
        assert_eq!(e.selection().hover().unwrap().object_id, id);
    }

    #[test]
    fn test_deselect_mid_drag_restores_hover() {
        let (mut e, id) = editor_with_cube();
        e.click(&down_ray());
        e.set_tool(TransformTool::Translate);
        assert!(e.begin_drag());
        e.drag_to(Transform::from_position([0.0, 1.0, 4.0]));

        e.clear_selection();
        assert!(e.gizmo().attached().is_none());
        assert_eq!(e.scene().find_object(&id).unwrap().transform.position, [0.0, 1.0, 0.0]);
        assert_eq!(e.document().past_len(), 1);

        e.pointer_move(&PointerEvent::new(Vec2::ZERO, down_ray()));
        assert_eq!(e.selection().hover().unwrap().object_id, id);
    }
}
