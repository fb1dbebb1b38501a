//! Live renderable scene: bodies built from document nodes plus helper objects.
//!
//! Objects live in a flat vector with explicit parent indices, so resolving
//! the top-level owner of a hit is a bounded index walk.

use glam::{EulerRot, Mat4, Quat, Vec3};
use shared::{NodeType, ObjectId, Transform};

use crate::viewport::mesh::{ground_quad, MeshData};

/// Non-pickable, non-document scene entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperKind {
    Grid,
    Axes,
    Gizmo,
    /// Selection outline (body silhouette or plane boundary)
    Outline,
}

impl HelperKind {
    pub fn id(&self) -> &'static str {
        match self {
            HelperKind::Grid => "__grid",
            HelperKind::Axes => "__axes",
            HelperKind::Gizmo => "__gizmo",
            HelperKind::Outline => "__outline",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LiveObject {
    pub id: ObjectId,
    pub node_type: NodeType,
    pub mesh: Option<MeshData>,
    /// Local transform relative to the parent
    pub transform: Transform,
    pub parent: Option<usize>,
    pub helper: Option<HelperKind>,
    pub visible: bool,
    pub locked: bool,
    /// Polyline for outline helpers (parent-local coordinates)
    pub outline: Vec<Vec3>,
}

impl LiveObject {
    pub fn body(id: impl Into<ObjectId>, node_type: NodeType, mesh: MeshData, transform: Transform) -> Self {
        Self {
            id: id.into(),
            node_type,
            mesh: Some(mesh),
            transform,
            parent: None,
            helper: None,
            visible: true,
            locked: false,
            outline: Vec::new(),
        }
    }

    pub fn helper(kind: HelperKind, mesh: Option<MeshData>) -> Self {
        Self {
            id: kind.id().to_string(),
            node_type: NodeType::Other,
            mesh,
            transform: Transform::new(),
            parent: None,
            helper: Some(kind),
            visible: true,
            locked: false,
            outline: Vec::new(),
        }
    }

    pub fn is_helper(&self) -> bool {
        self.helper.is_some()
    }
}

/// Local matrix of a TRS (rotation is intrinsic XYZ)
pub fn trs_matrix(t: &Transform) -> Mat4 {
    let [px, py, pz] = t.position;
    let [rx, ry, rz] = t.rotation;
    let [sx, sy, sz] = t.scale;
    Mat4::from_scale_rotation_translation(
        Vec3::new(sx as f32, sy as f32, sz as f32),
        Quat::from_euler(EulerRot::XYZ, rx as f32, ry as f32, rz as f32),
        Vec3::new(px as f32, py as f32, pz as f32),
    )
}

#[derive(Debug)]
pub struct LiveScene {
    objects: Vec<LiveObject>,
    /// Ids of bodies whose transform changed since the last `take_changes`
    changes: Vec<ObjectId>,
}

impl Default for LiveScene {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveScene {
    /// Scene with the standard helpers (ground grid, axes, gizmo)
    pub fn new() -> Self {
        Self {
            objects: vec![
                LiveObject::helper(HelperKind::Grid, Some(ground_quad(200.0, [0.3; 3]))),
                LiveObject::helper(HelperKind::Axes, None),
                LiveObject::helper(HelperKind::Gizmo, None),
            ],
            changes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn add(&mut self, object: LiveObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Add `object` under `parent`; None if the parent index is invalid.
    pub fn add_child(&mut self, parent: usize, mut object: LiveObject) -> Option<usize> {
        if parent >= self.objects.len() {
            return None;
        }
        object.parent = Some(parent);
        Some(self.add(object))
    }

    pub fn get(&self, index: usize) -> Option<&LiveObject> {
        self.objects.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut LiveObject> {
        self.objects.get_mut(index)
    }

    /// Top-level body with this id
    pub fn find(&self, id: &str) -> Option<usize> {
        self.objects
            .iter()
            .position(|o| o.helper.is_none() && o.parent.is_none() && o.id == id)
    }

    pub fn find_object(&self, id: &str) -> Option<&LiveObject> {
        self.find(id).and_then(|i| self.get(i))
    }

    /// Set a body's local transform and queue a change notification.
    pub fn set_transform(&mut self, index: usize, transform: Transform) -> bool {
        let Some(object) = self.objects.get_mut(index) else {
            return false;
        };
        object.transform = transform;
        if object.helper.is_none() {
            self.changes.push(object.id.clone());
        }
        true
    }

    /// Set a transform without a change notification (gizmo drag frames)
    pub fn preview_transform(&mut self, index: usize, transform: Transform) -> bool {
        match self.objects.get_mut(index) {
            Some(object) => {
                object.transform = transform;
                true
            }
            None => false,
        }
    }

    /// Drain queued change notifications
    pub fn take_changes(&mut self) -> Vec<ObjectId> {
        std::mem::take(&mut self.changes)
    }

    /// Remove every body (and everything parented under one), keeping helpers.
    pub fn remove_pickable(&mut self) {
        let mut removed = vec![false; self.objects.len()];
        for i in 0..self.objects.len() {
            removed[i] = self.objects[i].helper.is_none()
                || self.objects[i].parent.is_some_and(|p| p < i && removed[p]);
        }
        self.retain_indices(&removed);
    }

    /// Attach an outline helper under `parent`, replacing any existing outline.
    pub fn attach_outline(&mut self, parent: usize, outline: Vec<Vec3>) -> Option<usize> {
        self.detach_outline();
        let mut helper = LiveObject::helper(HelperKind::Outline, None);
        helper.outline = outline;
        self.add_child(parent, helper)
    }

    pub fn detach_outline(&mut self) {
        let removed: Vec<bool> = self
            .objects
            .iter()
            .map(|o| o.helper == Some(HelperKind::Outline))
            .collect();
        self.retain_indices(&removed);
    }

    pub fn outline(&self) -> Option<&LiveObject> {
        self.objects.iter().find(|o| o.helper == Some(HelperKind::Outline))
    }

    fn retain_indices(&mut self, removed: &[bool]) {
        let mut remap = vec![None; self.objects.len()];
        let mut next = 0;
        for (i, gone) in removed.iter().enumerate() {
            if !gone {
                remap[i] = Some(next);
                next += 1;
            }
        }
        let objects = std::mem::take(&mut self.objects);
        self.objects = objects
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !removed[*i])
            .map(|(_, mut o)| {
                o.parent = o.parent.and_then(|p| remap.get(p).copied().flatten());
                o
            })
            .collect();
    }

    /// Walk parent links up to the scene root.
    pub fn top_level(&self, index: usize) -> Option<usize> {
        let mut current = index;
        for _ in 0..self.objects.len() {
            match self.objects.get(current)?.parent {
                Some(p) => current = p,
                None => return Some(current),
            }
        }
        None
    }

    pub fn world_matrix(&self, index: usize) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        let mut current = Some(index);
        let mut steps = 0;
        while let Some(i) = current {
            let Some(o) = self.objects.get(i) else {
                break;
            };
            m = trs_matrix(&o.transform) * m;
            current = o.parent;
            steps += 1;
            if steps > self.objects.len() {
                break;
            }
        }
        m
    }

    /// Visible when the object and every ancestor are visible
    pub fn is_effectively_visible(&self, index: usize) -> bool {
        let mut current = Some(index);
        let mut steps = 0;
        while let Some(i) = current {
            match self.objects.get(i) {
                Some(o) if o.visible => current = o.parent,
                _ => return false,
            }
            steps += 1;
            if steps > self.objects.len() {
                return false;
            }
        }
        true
    }

    /// Indices that picking may hit: visible non-helper objects with a mesh.
    pub fn pickable(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.objects.len()).filter(move |&i| {
            let o = &self.objects[i];
            o.helper.is_none() && o.mesh.is_some() && self.is_effectively_visible(i)
        })
    }

    /// Top-level bodies in scene order
    pub fn roots(&self) -> impl Iterator<Item = (usize, &LiveObject)> + '_ {
        self.objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.helper.is_none() && o.parent.is_none())
    }

    pub fn children(&self, index: usize) -> impl Iterator<Item = (usize, &LiveObject)> + '_ {
        self.objects
            .iter()
            .enumerate()
            .filter(move |(_, o)| o.helper.is_none() && o.parent == Some(index))
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.roots().map(|(_, o)| o.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::mesh::cube;

    fn body(id: &str) -> LiveObject {
        LiveObject::body(id, NodeType::Cube, cube(1.0, 1.0, 1.0, [1.0; 3]), Transform::new())
    }

    #[test]
    fn test_new_scene_has_only_helpers() {
        let scene = LiveScene::new();
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.pickable().count(), 0);
        assert!(scene.ids().is_empty());
    }

    #[test]
    fn test_find_and_top_level() {
        let mut scene = LiveScene::new();
        let a = scene.add(body("a"));
        let child = scene.add_child(a, body("a-part")).unwrap();
        assert_eq!(scene.find("a"), Some(a));
        assert_eq!(scene.find("a-part"), None);
        assert_eq!(scene.top_level(child), Some(a));
        assert_eq!(scene.top_level(99), None);
    }

    #[test]
    fn test_remove_pickable_keeps_helpers_and_remaps() {
        let mut scene = LiveScene::new();
        let a = scene.add(body("a"));
        scene.add_child(a, body("a-part"));
        scene.attach_outline(a, vec![Vec3::ZERO]);
        scene.remove_pickable();
        assert_eq!(scene.len(), 3);
        assert!(scene.outline().is_none());

        let b = scene.add(body("b"));
        let c = scene.add_child(b, body("b-part")).unwrap();
        scene.add(body("z"));
        scene.detach_outline();
        assert_eq!(scene.top_level(c), Some(b));
    }

    #[test]
    fn test_set_transform_queues_change() {
        let mut scene = LiveScene::new();
        let a = scene.add(body("a"));
        assert!(scene.set_transform(a, Transform::from_position([1.0, 0.0, 0.0])));
        assert!(!scene.set_transform(42, Transform::new()));
        assert_eq!(scene.take_changes(), vec!["a".to_string()]);
        assert!(scene.take_changes().is_empty());
    }

    #[test]
    fn test_hidden_parent_hides_children() {
        let mut scene = LiveScene::new();
        let a = scene.add(body("a"));
        let child = scene.add_child(a, body("a-part")).unwrap();
        assert_eq!(scene.pickable().count(), 2);
        scene.get_mut(a).unwrap().visible = false;
        assert!(!scene.is_effectively_visible(child));
        assert_eq!(scene.pickable().count(), 0);
    }

    #[test]
    fn test_world_matrix_composes_parent() {
        let mut scene = LiveScene::new();
        let a = scene.add(body("a"));
        scene.set_transform(a, Transform::from_position([1.0, 0.0, 0.0]));
        let child = scene.add_child(a, body("a-part")).unwrap();
        scene.set_transform(child, Transform::from_position([0.0, 2.0, 0.0]));
        let p = scene.world_matrix(child).transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_rotation_order_xyz() {
        let mut t = Transform::new();
        t.rotation = [-std::f64::consts::FRAC_PI_2, 0.0, 0.0];
        let v = trs_matrix(&t).transform_vector3(Vec3::Z);
        assert!((v - Vec3::Y).length() < 1e-6);
    }
}
