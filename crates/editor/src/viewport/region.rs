//! Coplanar region detection.
//!
//! A single picked triangle is grown into the planar face it belongs to:
//! every triangle of the mesh lying on the seed's plane is accepted (global
//! plane match, no connectivity requirement), edges used once by the
//! accepted set form the boundary, and one closed loop is walked out of it.
//!
//! Two disjoint islands on the same infinite plane are merged into a single
//! region, and only one boundary loop is produced. Regions with holes or
//! several boundary components get whichever loop the walk reaches first.

use std::collections::{BTreeSet, HashMap};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::mesh::MeshData;
use crate::geometry::{centroid, EdgeCounter, Plane, VertexKey};

/// Tolerances for the global plane match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionTolerance {
    /// Maximum angle between normals, degrees
    pub angle_deg: f32,
    /// Maximum difference of plane offsets, model units
    pub distance: f32,
}

impl Default for RegionTolerance {
    fn default() -> Self {
        Self {
            angle_deg: 2.0,
            distance: 1e-4,
        }
    }
}

impl RegionTolerance {
    fn min_cos(&self) -> f32 {
        self.angle_deg.to_radians().cos()
    }
}

/// A merged planar face of a mesh, in mesh-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct CoplanarRegion {
    /// Accepted triangle indices (into mesh.indices / 3)
    pub triangle_ids: BTreeSet<usize>,
    /// Ordered outer boundary, one closed polygon (first point not repeated)
    pub boundary_loop: Vec<Vec3>,
    /// Unit normal of the seed triangle
    pub normal: Vec3,
    pub plane: Plane,
    /// Boundary projected onto the plane basis around `origin()`, for the fill surface
    pub outline: Vec<Vec2>,
}

impl CoplanarRegion {
    /// Center of the boundary loop; lies on the plane
    pub fn origin(&self) -> Vec3 {
        centroid(&self.boundary_loop)
    }

    /// Area enclosed by the outline (shoelace)
    pub fn area(&self) -> f32 {
        let n = self.outline.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f32 = (0..n)
            .map(|i| {
                let a = self.outline[i];
                let b = self.outline[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() * 0.5
    }
}

/// Grow `seed` into the coplanar region of `mesh`.
///
/// Returns `None` when the seed index is out of range, the seed triangle is
/// degenerate, or the accepted set has no boundary edge.
pub fn detect_region(mesh: &MeshData, seed: usize, tolerance: &RegionTolerance) -> Option<CoplanarRegion> {
    let seed_plane = Plane::from_triangle(&mesh.triangle(seed)?)?;
    let min_cos = tolerance.min_cos();

    let mut triangle_ids = BTreeSet::new();
    let mut edges = EdgeCounter::default();
    for (idx, tri) in mesh.triangles() {
        let Some(plane) = Plane::from_triangle(&tri) else {
            continue;
        };
        if seed_plane.matches(&plane, min_cos, tolerance.distance) {
            triangle_ids.insert(idx);
            edges.add_triangle(&tri);
        }
    }

    let boundary_loop = walk_boundary(edges.boundary_edges());
    if boundary_loop.is_empty() {
        return None;
    }

    let origin = centroid(&boundary_loop);
    let outline = boundary_loop
        .iter()
        .map(|p| seed_plane.project(*p, origin))
        .collect();

    Some(CoplanarRegion {
        triangle_ids,
        boundary_loop,
        normal: seed_plane.normal,
        plane: seed_plane,
        outline,
    })
}

/// Walk one closed polygon out of a set of boundary edges.
///
/// Starts at the first edge's first endpoint and steps to a neighbor other
/// than the one just left, until it returns to the start or runs out of
/// neighbors. The walk never takes more steps than there are vertices.
pub fn walk_boundary(edges: impl IntoIterator<Item = (Vec3, Vec3)>) -> Vec<Vec3> {
    let mut adjacency: HashMap<VertexKey, Vec<VertexKey>> = HashMap::new();
    let mut positions: HashMap<VertexKey, Vec3> = HashMap::new();
    let mut start = None;

    for (a, b) in edges {
        let ka = VertexKey::quantize(a);
        let kb = VertexKey::quantize(b);
        if ka == kb {
            continue;
        }
        positions.entry(ka).or_insert(a);
        positions.entry(kb).or_insert(b);
        adjacency.entry(ka).or_default().push(kb);
        adjacency.entry(kb).or_default().push(ka);
        start.get_or_insert(ka);
    }

    let Some(start) = start else {
        return Vec::new();
    };

    let mut path = Vec::new();
    let mut prev: Option<VertexKey> = None;
    let mut current = start;
    for _ in 0..positions.len() {
        if let Some(p) = positions.get(&current) {
            path.push(*p);
        }
        let next = adjacency
            .get(&current)
            .and_then(|n| n.iter().copied().find(|k| Some(*k) != prev));
        match next {
            Some(k) if k == start => break,
            Some(k) => {
                prev = Some(current);
                current = k;
            }
            None => break,
        }
    }
    path
}
