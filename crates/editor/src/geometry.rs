//! Triangle and plane math shared by picking and region detection.
//!
//! Stateless helpers: triangle normals, plane equations, quantized vertex
//! keys and undirected edge bookkeeping.

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Three corner positions of a triangle
pub type Triangle = [Vec3; 3];

/// World axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index into `[x, y, z]`
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Unit normal of a triangle (counter-clockwise winding), or `None` when degenerate.
pub fn triangle_normal(tri: &Triangle) -> Option<Vec3> {
    let n = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
    let len = n.length();
    if len <= f32::EPSILON {
        None
    } else {
        Some(n / len)
    }
}

/// Triangle area = |cross(v1-v0, v2-v0)| / 2
pub fn triangle_area(tri: &Triangle) -> f32 {
    (tri[1] - tri[0]).cross(tri[2] - tri[0]).length() * 0.5
}

/// Average of a set of points (zero for an empty set)
pub fn centroid(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::ZERO;
    }
    points.iter().copied().sum::<Vec3>() / points.len() as f32
}

/// Infinite plane `normal · p + offset = 0` with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f32,
}

impl Plane {
    pub fn from_triangle(tri: &Triangle) -> Option<Self> {
        let normal = triangle_normal(tri)?;
        Some(Self {
            normal,
            offset: -normal.dot(tri[0]),
        })
    }

    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.offset
    }

    /// Point-in-plane test
    pub fn contains(&self, p: Vec3, tolerance: f32) -> bool {
        self.signed_distance(p).abs() <= tolerance
    }

    /// Same orientation within `min_cos` and same offset within `max_offset`.
    pub fn matches(&self, other: &Plane, min_cos: f32, max_offset: f32) -> bool {
        self.normal.dot(other.normal) >= min_cos && (self.offset - other.offset).abs() <= max_offset
    }

    /// Orthonormal in-plane basis (u, v), both perpendicular to the normal.
    pub fn basis(&self) -> (Vec3, Vec3) {
        self.normal.any_orthonormal_pair()
    }

    /// Coordinates of `p` in the plane basis, relative to `origin`.
    pub fn project(&self, p: Vec3, origin: Vec3) -> Vec2 {
        let (u, v) = self.basis();
        let d = p - origin;
        Vec2::new(d.dot(u), d.dot(v))
    }
}

/// Position key quantized to 1e-5 model units, so vertices duplicated per face
/// (flat shading) still share edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexKey(i64, i64, i64);

impl VertexKey {
    const SCALE: f64 = 1e5;

    pub fn quantize(p: Vec3) -> Self {
        Self(
            (p.x as f64 * Self::SCALE).round() as i64,
            (p.y as f64 * Self::SCALE).round() as i64,
            (p.z as f64 * Self::SCALE).round() as i64,
        )
    }
}

/// Undirected edge between two quantized vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey(VertexKey, VertexKey);

impl EdgeKey {
    pub fn new(a: VertexKey, b: VertexKey) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
}

/// Counts how many accepted triangles use each undirected edge.
///
/// Edges used once lie on the boundary of the accepted set; interior edges
/// are shared by two triangles.
#[derive(Debug, Default)]
pub struct EdgeCounter {
    counts: HashMap<EdgeKey, u32>,
    /// First-seen order with the original endpoint positions
    order: Vec<(EdgeKey, Vec3, Vec3)>,
}

impl EdgeCounter {
    pub fn add_triangle(&mut self, tri: &Triangle) {
        for (a, b) in [(0, 1), (1, 2), (2, 0)] {
            let key = EdgeKey::new(VertexKey::quantize(tri[a]), VertexKey::quantize(tri[b]));
            let count = self.counts.entry(key).or_insert(0);
            if *count == 0 {
                self.order.push((key, tri[a], tri[b]));
            }
            *count += 1;
        }
    }

    pub fn count(&self, a: Vec3, b: Vec3) -> u32 {
        let key = EdgeKey::new(VertexKey::quantize(a), VertexKey::quantize(b));
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Edges with a count of exactly one, in first-seen order
    pub fn boundary_edges(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.order
            .iter()
            .filter(|(key, _, _)| self.counts.get(key) == Some(&1))
            .map(|(_, a, b)| (*a, *b))
    }
}
