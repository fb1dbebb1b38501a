//! Primitive factory: document node parameters → renderable mesh plus default placement.

use std::f64::consts::FRAC_PI_2;

use glam::Vec2;
use shared::{ExtrudeShape, NodeType, Primitive, Transform};

use crate::viewport::mesh::{self, rgb, MeshData};

/// Mesh and the placement used when the node carries no transform
#[derive(Debug, Clone)]
pub struct Renderable {
    pub node_type: NodeType,
    pub mesh: MeshData,
    pub placement: Transform,
}

/// Builds renderable geometry from a primitive; pure in kind and parameters.
pub trait PrimitiveFactory {
    fn build(&self, primitive: &Primitive) -> Renderable;
}

/// Flat-shaded triangle meshes
#[derive(Debug, Clone)]
pub struct MeshFactory {
    /// Segments around curved surfaces
    pub segments: u32,
}

impl Default for MeshFactory {
    fn default() -> Self {
        Self { segments: 32 }
    }
}

pub fn color_for(node_type: NodeType) -> [f32; 3] {
    match node_type {
        NodeType::Cube => rgb(0x7c5cff),
        NodeType::Sphere => rgb(0x4fa3ff),
        NodeType::Cylinder => rgb(0xff8a5b),
        NodeType::Extrude => rgb(0x71d99e),
        NodeType::Other => rgb(0xaaaaaa),
    }
}

impl PrimitiveFactory for MeshFactory {
    fn build(&self, primitive: &Primitive) -> Renderable {
        let node_type = primitive.node_type();
        let color = color_for(node_type);

        let (mesh, placement) = match *primitive {
            Primitive::Cube { size } => {
                let s = size as f32;
                (
                    mesh::cube(s, s, s, color),
                    Transform::from_position([0.0, size / 2.0, 0.0]),
                )
            }
            Primitive::Sphere { radius } => (
                mesh::sphere(radius as f32, self.segments / 2, self.segments, color),
                Transform::from_position([0.0, radius, 0.0]),
            ),
            Primitive::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => (
                mesh::cylinder(
                    radius_top as f32,
                    radius_bottom as f32,
                    height as f32,
                    self.segments,
                    color,
                ),
                Transform::from_position([0.0, height / 2.0, 0.0]),
            ),
            Primitive::Extrude { shape, w, h, depth } => {
                let profile: Vec<Vec2> = match shape {
                    ExtrudeShape::Rect => mesh::rect_profile(w as f32, h as f32),
                    ExtrudeShape::Circle => mesh::circle_profile(w as f32 / 2.0, self.segments),
                };
                let mut placement = Transform::from_position([0.0, depth / 2.0, 0.0]);
                // Lay the profile flat: extrusion axis +Z becomes +Y
                placement.rotation = [-FRAC_PI_2, 0.0, 0.0];
                (mesh::extrude(&profile, depth as f32, color), placement)
            }
        };

        Renderable {
            node_type,
            mesh,
            placement,
        }
    }
}
