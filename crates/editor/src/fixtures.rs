//! Factory functions for test data.
//!
//! Node and document builders plus small helpers for driving an `Editor`
//! from unit and integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use shared::*;

use crate::editor::Editor;
use crate::events::EditorEvent;
use crate::viewport::picking::Ray;

// ── Node factories ──────────────────────────────────────────────

pub fn cube_node(id: &str, size: f64) -> Node {
    Node::new(id, Primitive::Cube { size })
}

pub fn cube_node_at(id: &str, size: f64, pos: [f64; 3]) -> Node {
    cube_node(id, size).with_transform(Transform::from_position(pos))
}

pub fn sphere_node(id: &str, radius: f64) -> Node {
    Node::new(id, Primitive::Sphere { radius })
}

pub fn cylinder_node(id: &str, radius: f64, height: f64) -> Node {
    Node::new(
        id,
        Primitive::Cylinder {
            radius_top: radius,
            radius_bottom: radius,
            height,
        },
    )
}

pub fn extrude_node(id: &str, shape: ExtrudeShape, w: f64, h: f64, depth: f64) -> Node {
    Node::new(id, Primitive::Extrude { shape, w, h, depth })
}

// ── Documents ───────────────────────────────────────────────────

pub fn document_of(nodes: Vec<Node>) -> DocumentFile {
    DocumentFile { nodes }
}

/// Three size-2 cubes spaced 5 apart along X, resting on the ground
pub fn three_cube_document() -> DocumentFile {
    document_of(vec![
        cube_node_at("a", 2.0, [0.0, 1.0, 0.0]),
        cube_node_at("b", 2.0, [5.0, 1.0, 0.0]),
        cube_node_at("c", 2.0, [10.0, 1.0, 0.0]),
    ])
}

// ── Editor helpers ──────────────────────────────────────────────

/// Straight-down ray from high above (x, z)
pub fn ray_down_at(x: f32, z: f32) -> Ray {
    Ray::new(Vec3::new(x, 50.0, z), Vec3::NEG_Y)
}

/// Record every event the editor emits from now on
pub fn event_log(editor: &mut Editor) -> Rc<RefCell<Vec<EditorEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    editor.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    log
}

/// Event names in emission order
pub fn event_names(log: &Rc<RefCell<Vec<EditorEvent>>>) -> Vec<&'static str> {
    log.borrow().iter().map(|e| e.name()).collect()
}
