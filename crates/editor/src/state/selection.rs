use std::collections::BTreeSet;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use shared::ObjectId;

use crate::viewport::region::CoplanarRegion;

/// What a click selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    Bodies,
    Planes,
}

/// A committed planar face pick, in world space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneSelection {
    /// Owning body
    pub object_id: ObjectId,
    /// Triangle indices of the merged coplanar region
    pub face_ids: BTreeSet<usize>,
    /// A point on the plane (center of the boundary)
    pub origin: [f32; 3],
    /// Unit normal
    pub normal: [f32; 3],
    /// Boundary loop for the outline
    #[serde(default)]
    pub boundary: Vec<[f32; 3]>,
}

impl PlaneSelection {
    /// Lift a mesh-local region into world space with the body's matrix.
    pub fn from_region(object_id: ObjectId, region: &CoplanarRegion, world: &Mat4) -> Self {
        let normal = world
            .inverse()
            .transpose()
            .transform_vector3(region.normal)
            .normalize_or_zero();
        Self {
            object_id,
            face_ids: region.triangle_ids.clone(),
            origin: world.transform_point3(region.origin()).to_array(),
            normal: normal.to_array(),
            boundary: region
                .boundary_loop
                .iter()
                .map(|p| world.transform_point3(*p).to_array())
                .collect(),
        }
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    pub fn origin(&self) -> Vec3 {
        Vec3::from_array(self.origin)
    }

    /// Lowest face id; used to re-derive the region after a rebuild
    pub fn seed(&self) -> Option<usize> {
        self.face_ids.first().copied()
    }
}

/// Object (and triangle) under the pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverTarget {
    pub object_id: ObjectId,
    pub triangle_index: usize,
}

/// Coarse state of the selection machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    Hovering,
    Selected,
}

/// Which parts of the selection an operation changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionDelta {
    pub hover: bool,
    pub body: bool,
    pub plane: bool,
}

impl SelectionDelta {
    pub fn any(&self) -> bool {
        self.hover || self.body || self.plane
    }

    pub fn merge(self, other: SelectionDelta) -> SelectionDelta {
        SelectionDelta {
            hover: self.hover || other.hover,
            body: self.body || other.body,
            plane: self.plane || other.plane,
        }
    }
}

/// Hover plus committed selection, parameterized by mode.
///
/// Hover and the committed selection are independent and may name
/// different objects. At most one body and one plane are committed, and
/// only the one matching the mode is ever set.
#[derive(Debug, Default)]
pub struct SelectionState {
    mode: SelectionMode,
    hover: Option<HoverTarget>,
    body: Option<ObjectId>,
    plane: Option<PlaneSelection>,
}

impl SelectionState {
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn hover(&self) -> Option<&HoverTarget> {
        self.hover.as_ref()
    }

    pub fn body(&self) -> Option<&ObjectId> {
        self.body.as_ref()
    }

    pub fn plane(&self) -> Option<&PlaneSelection> {
        self.plane.as_ref()
    }

    /// Selected body as a list of 0 or 1 ids
    pub fn selected_ids(&self) -> Vec<ObjectId> {
        self.body.iter().cloned().collect()
    }

    pub fn phase(&self) -> SelectionPhase {
        if self.body.is_some() || self.plane.is_some() {
            SelectionPhase::Selected
        } else if self.hover.is_some() {
            SelectionPhase::Hovering
        } else {
            SelectionPhase::Idle
        }
    }

    /// Switching mode clears hover and both committed selections.
    pub fn set_mode(&mut self, mode: SelectionMode) -> SelectionDelta {
        if self.mode == mode {
            return SelectionDelta::default();
        }
        self.mode = mode;
        self.set_hover(None).merge(self.clear())
    }

    pub fn set_hover(&mut self, target: Option<HoverTarget>) -> SelectionDelta {
        let hover = self.hover != target;
        self.hover = target;
        SelectionDelta {
            hover,
            ..Default::default()
        }
    }

    pub fn select_body(&mut self, id: Option<ObjectId>) -> SelectionDelta {
        let body = self.body != id;
        self.body = id;
        SelectionDelta {
            body,
            ..Default::default()
        }
    }

    pub fn select_plane(&mut self, plane: Option<PlaneSelection>) -> SelectionDelta {
        let changed = self.plane != plane;
        self.plane = plane;
        SelectionDelta {
            plane: changed,
            ..Default::default()
        }
    }

    /// Clear both committed selections (hover is left alone)
    pub fn clear(&mut self) -> SelectionDelta {
        self.select_body(None).merge(self.select_plane(None))
    }

    /// Drop every reference to `id` (deleted or hidden object)
    pub fn forget(&mut self, id: &str) -> SelectionDelta {
        let mut delta = SelectionDelta::default();
        if self.hover.as_ref().is_some_and(|h| h.object_id == id) {
            delta = delta.merge(self.set_hover(None));
        }
        if self.body.as_deref() == Some(id) {
            delta = delta.merge(self.select_body(None));
        }
        if self.plane.as_ref().is_some_and(|p| p.object_id == id) {
            delta = delta.merge(self.select_plane(None));
        }
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(id: &str) -> PlaneSelection {
        PlaneSelection {
            object_id: id.to_string(),
            face_ids: BTreeSet::from([0, 1]),
            origin: [0.0; 3],
            normal: [0.0, 0.0, 1.0],
            boundary: Vec::new(),
        }
    }

    fn hover(id: &str) -> HoverTarget {
        HoverTarget {
            object_id: id.to_string(),
            triangle_index: 0,
        }
    }

    #[test]
    fn test_initial_idle() {
        let s = SelectionState::default();
        assert_eq!(s.mode(), SelectionMode::Bodies);
        assert_eq!(s.phase(), SelectionPhase::Idle);
        assert!(s.selected_ids().is_empty());
    }

    #[test]
    fn test_hover_and_selection_independent() {
        let mut s = SelectionState::default();
        assert!(s.set_hover(Some(hover("a"))).hover);
        assert_eq!(s.phase(), SelectionPhase::Hovering);
        assert!(s.select_body(Some("b".into())).body);
        assert_eq!(s.hover().unwrap().object_id, "a");
        assert_eq!(s.selected_ids(), vec!["b".to_string()]);
        assert_eq!(s.phase(), SelectionPhase::Selected);
    }

    #[test]
    fn test_reselect_same_is_not_a_change() {
        let mut s = SelectionState::default();
        s.select_body(Some("a".into()));
        assert!(!s.select_body(Some("a".into())).any());
        assert!(!s.set_hover(None).any());
    }

    #[test]
    fn test_mode_switch_clears_everything() {
        let mut s = SelectionState::default();
        s.set_mode(SelectionMode::Planes);
        s.select_plane(Some(plane("a")));
        s.set_hover(Some(hover("a")));

        let delta = s.set_mode(SelectionMode::Bodies);
        assert!(delta.plane && delta.hover && !delta.body);
        assert!(s.plane().is_none());
        assert!(s.body().is_none());
        assert!(s.hover().is_none());
    }

    #[test]
    fn test_same_mode_is_noop() {
        let mut s = SelectionState::default();
        s.select_body(Some("a".into()));
        assert!(!s.set_mode(SelectionMode::Bodies).any());
        assert!(s.body().is_some());
    }

    #[test]
    fn test_forget_only_matching_id() {
        let mut s = SelectionState::default();
        s.select_body(Some("a".into()));
        s.set_hover(Some(hover("b")));
        assert!(!s.forget("c").any());
        let delta = s.forget("a");
        assert!(delta.body && !delta.hover);
        assert!(s.hover().is_some());
    }

    #[test]
    fn test_plane_seed() {
        assert_eq!(plane("a").seed(), Some(0));
    }
}
