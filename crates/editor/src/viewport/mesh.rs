use glam::{Vec2, Vec3};

use crate::geometry::Triangle;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

const STRIDE: usize = 9;

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, vertex: usize) -> Option<Vec3> {
        let base = vertex.checked_mul(STRIDE)?;
        let p = self.vertices.get(base..base.checked_add(3)?)?;
        Some(Vec3::new(p[0], p[1], p[2]))
    }

    /// Corner positions of a triangle by index (into indices / 3)
    pub fn triangle(&self, tri_idx: usize) -> Option<Triangle> {
        let start = tri_idx.checked_mul(3)?;
        let idx = self.indices.get(start..start.checked_add(3)?)?;
        Some([
            self.position(idx[0] as usize)?,
            self.position(idx[1] as usize)?,
            self.position(idx[2] as usize)?,
        ])
    }

    /// All triangles in index order; malformed entries are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = (usize, Triangle)> + '_ {
        (0..self.triangle_count()).filter_map(|i| self.triangle(i).map(|t| (i, t)))
    }

    /// Append a flat polygon (convex, counter-clockwise around `normal`) as a triangle fan.
    pub fn push_polygon(&mut self, corners: &[Vec3], normal: Vec3, color: [f32; 3]) {
        if corners.len() < 3 {
            return;
        }
        let base = self.vertex_count() as u32;
        for c in corners {
            push_vert(&mut self.vertices, c.x, c.y, c.z, normal, color);
        }
        for i in 1..corners.len() as u32 - 1 {
            self.indices.extend_from_slice(&[base, base + i, base + i + 1]);
        }
    }

    /// Merge another mesh into this one (indices are rebased)
    pub fn append(&mut self, other: &MeshData) {
        let base = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Copy of the mesh with every position shifted by `offset`
    pub fn translated(&self, offset: Vec3) -> MeshData {
        let mut out = self.clone();
        for v in out.vertices.chunks_exact_mut(STRIDE) {
            v[0] += offset.x;
            v[1] += offset.y;
            v[2] += offset.z;
        }
        out
    }
}

/// 0xRRGGBB → linear-ish [r, g, b] in 0..1
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

// ── Primitive generation ──────────────────────────────────────

pub fn cube(w: f32, h: f32, d: f32, color: [f32; 3]) -> MeshData {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let hd = d * 0.5;

    let faces: [([Vec3; 4], Vec3); 6] = [
        // Front (+Z)
        ([Vec3::new(-hw, -hh, hd), Vec3::new(hw, -hh, hd), Vec3::new(hw, hh, hd), Vec3::new(-hw, hh, hd)], Vec3::Z),
        // Back (-Z)
        ([Vec3::new(hw, -hh, -hd), Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, hh, -hd), Vec3::new(hw, hh, -hd)], Vec3::NEG_Z),
        // Right (+X)
        ([Vec3::new(hw, -hh, hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, hh, -hd), Vec3::new(hw, hh, hd)], Vec3::X),
        // Left (-X)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, -hh, hd), Vec3::new(-hw, hh, hd), Vec3::new(-hw, hh, -hd)], Vec3::NEG_X),
        // Top (+Y)
        ([Vec3::new(-hw, hh, hd), Vec3::new(hw, hh, hd), Vec3::new(hw, hh, -hd), Vec3::new(-hw, hh, -hd)], Vec3::Y),
        // Bottom (-Y)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, -hh, hd), Vec3::new(-hw, -hh, hd)], Vec3::NEG_Y),
    ];

    let mut mesh = MeshData {
        vertices: Vec::with_capacity(24 * STRIDE),
        indices: Vec::with_capacity(36),
    };
    for (quad, normal) in &faces {
        mesh.push_polygon(quad, *normal, color);
    }
    mesh
}

/// Truncated cone along Y, centered at the origin. Caps are fans.
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32, color: [f32; 3]) -> MeshData {
    let hh = height * 0.5;
    let segments = segments.max(3);
    let mut mesh = MeshData::default();
    let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);

    let ring = |r: f32, y: f32, i: u32| {
        let a = i as f32 * std::f32::consts::TAU / segments as f32;
        Vec3::new(r * a.cos(), y, r * a.sin())
    };

    // Side faces, wound outward
    for i in 0..segments {
        let b0 = ring(radius_bottom, -hh, i);
        let b1 = ring(radius_bottom, -hh, i + 1);
        let t0 = ring(radius_top, hh, i);
        let t1 = ring(radius_top, hh, i + 1);
        let mid = (i as f32 + 0.5) * std::f32::consts::TAU / segments as f32;
        let n = Vec3::new(mid.cos(), slope, mid.sin()).normalize();

        let base = mesh.vertex_count() as u32;
        for p in [b0, b1, t1, t0] {
            push_vert(&mut mesh.vertices, p.x, p.y, p.z, n, color);
        }
        mesh.indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
    }

    // Top cap (counter-clockwise seen from +Y)
    if radius_top > 0.0 {
        let top: Vec<Vec3> = (0..segments).rev().map(|i| ring(radius_top, hh, i)).collect();
        mesh.push_polygon(&top, Vec3::Y, color);
    }
    // Bottom cap
    if radius_bottom > 0.0 {
        let bottom: Vec<Vec3> = (0..segments).map(|i| ring(radius_bottom, -hh, i)).collect();
        mesh.push_polygon(&bottom, Vec3::NEG_Y, color);
    }

    mesh
}

pub fn sphere(radius: f32, rings: u32, sectors: u32, color: [f32; 3]) -> MeshData {
    let rings = rings.max(2);
    let sectors = sectors.max(3);
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for r in 0..=rings {
        let phi = std::f32::consts::PI * r as f32 / rings as f32;
        let sp = phi.sin();
        let cp = phi.cos();

        for s in 0..=sectors {
            let theta = std::f32::consts::TAU * s as f32 / sectors as f32;
            let n = Vec3::new(sp * theta.cos(), cp, sp * theta.sin());
            push_vert(&mut vertices, radius * n.x, radius * n.y, radius * n.z, n, color);
        }
    }

    for r in 0..rings {
        for s in 0..sectors {
            let a = r * (sectors + 1) + s;
            let b = a + sectors + 1;
            // Pole rows collapse one triangle of each quad
            if r != 0 {
                indices.extend_from_slice(&[a, a + 1, b]);
            }
            if r != rings - 1 {
                indices.extend_from_slice(&[a + 1, b + 1, b]);
            }
        }
    }

    MeshData { vertices, indices }
}

/// Straight prism from a counter-clockwise 2D profile in XY, extruded from z = 0 to z = depth.
pub fn extrude(profile: &[Vec2], depth: f32, color: [f32; 3]) -> MeshData {
    let mut mesh = MeshData::default();
    if profile.len() < 3 {
        return mesh;
    }

    let back: Vec<Vec3> = profile.iter().rev().map(|p| Vec3::new(p.x, p.y, 0.0)).collect();
    let front: Vec<Vec3> = profile.iter().map(|p| Vec3::new(p.x, p.y, depth)).collect();
    mesh.push_polygon(&front, Vec3::Z, color);
    mesh.push_polygon(&back, Vec3::NEG_Z, color);

    for i in 0..profile.len() {
        let a = profile[i];
        let b = profile[(i + 1) % profile.len()];
        let edge = b - a;
        let n = Vec3::new(edge.y, -edge.x, 0.0).normalize_or_zero();
        let quad = [
            Vec3::new(a.x, a.y, 0.0),
            Vec3::new(b.x, b.y, 0.0),
            Vec3::new(b.x, b.y, depth),
            Vec3::new(a.x, a.y, depth),
        ];
        mesh.push_polygon(&quad, n, color);
    }

    mesh
}

pub fn rect_profile(w: f32, h: f32) -> Vec<Vec2> {
    let hw = w * 0.5;
    let hh = h * 0.5;
    vec![
        Vec2::new(-hw, -hh),
        Vec2::new(hw, -hh),
        Vec2::new(hw, hh),
        Vec2::new(-hw, hh),
    ]
}

pub fn circle_profile(radius: f32, segments: u32) -> Vec<Vec2> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            let a = i as f32 * std::f32::consts::TAU / segments as f32;
            Vec2::new(radius * a.cos(), radius * a.sin())
        })
        .collect()
}

/// Large flat quad on y = 0 (ground grid stand-in for picking tests).
pub fn ground_quad(size: f32, color: [f32; 3]) -> MeshData {
    let h = size * 0.5;
    let mut mesh = MeshData::default();
    mesh.push_polygon(
        &[
            Vec3::new(-h, 0.0, h),
            Vec3::new(h, 0.0, h),
            Vec3::new(h, 0.0, -h),
            Vec3::new(-h, 0.0, -h),
        ],
        Vec3::Y,
        color,
    );
    mesh
}

// ── Helpers ──────────────────────────────────────────────────

fn push_vert(v: &mut Vec<f32>, x: f32, y: f32, z: f32, n: Vec3, c: [f32; 3]) {
    v.extend_from_slice(&[x, y, z, n.x, n.y, n.z, c[0], c[1], c[2]]);
}
