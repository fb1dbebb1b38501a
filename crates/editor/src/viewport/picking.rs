use glam::{Mat4, Vec3};

use super::mesh::MeshData;
use crate::build::scene::LiveScene;
use crate::geometry::triangle_normal;
use shared::ObjectId;

/// A ray in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray expressed in the local space of `world` (direction is not renormalized,
    /// so local hit distances map back through the same matrix).
    pub fn to_local(&self, world: &Mat4) -> Ray {
        let inv = world.inverse();
        Ray {
            origin: inv.transform_point3(self.origin),
            direction: inv.transform_vector3(self.direction),
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_mesh(data: &MeshData) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for p in (0..data.vertex_count()).filter_map(|i| data.position(i)) {
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = ray.direction.recip();

    let t1 = (aabb.min - ray.origin) * inv_dir;
    let t2 = (aabb.max - ray.origin) * inv_dir;

    let tmin = t1.min(t2).max_element();
    let tmax = t1.max(t2).min_element();

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Möller-Trumbore ray-triangle intersection algorithm.
/// Returns the distance along the ray if hit, or None if no intersection.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Result of picking a triangle in a mesh (mesh-local space)
#[derive(Debug, Clone)]
pub struct TriangleHit {
    /// Index of the triangle (into mesh.indices / 3)
    pub triangle_index: usize,
    /// Ray parameter at the hit point
    pub distance: f32,
    /// Geometric normal of the hit triangle
    pub normal: Vec3,
}

/// Find the nearest triangle in a mesh intersected by the ray.
pub fn pick_triangle(ray: &Ray, mesh: &MeshData) -> Option<TriangleHit> {
    let mut best: Option<TriangleHit> = None;

    for (tri_idx, [v0, v1, v2]) in mesh.triangles() {
        let Some(dist) = ray_triangle_intersect(ray, v0, v1, v2) else {
            continue;
        };
        if best.as_ref().is_none_or(|b| dist < b.distance) {
            best = Some(TriangleHit {
                triangle_index: tri_idx,
                distance: dist,
                normal: triangle_normal(&[v0, v1, v2]).unwrap_or(Vec3::ZERO),
            });
        }
    }

    best
}

/// A pick against the live scene
#[derive(Debug, Clone)]
pub struct Hit {
    /// Index of the struck object in the live scene
    pub object: usize,
    pub object_id: ObjectId,
    pub triangle_index: usize,
    /// World-space hit point
    pub point: Vec3,
    /// World-space unit face normal
    pub normal: Vec3,
    /// World-space distance from the ray origin
    pub distance: f32,
}

/// Nearest hit among pickable scene objects.
///
/// Helper objects, objects without geometry and hidden objects (or objects
/// under a hidden parent) never produce a hit, whatever their depth.
pub fn pick_scene(scene: &LiveScene, ray: &Ray) -> Option<Hit> {
    let mut best: Option<Hit> = None;

    for index in scene.pickable() {
        let Some(mesh) = scene.get(index).and_then(|o| o.mesh.as_ref()) else {
            continue;
        };
        let world = scene.world_matrix(index);
        let local_ray = ray.to_local(&world);

        if ray_aabb(&local_ray, &Aabb::from_mesh(mesh)).is_none() {
            continue;
        }
        let Some(tri) = pick_triangle(&local_ray, mesh) else {
            continue;
        };

        let point = world.transform_point3(local_ray.at(tri.distance));
        let distance = (point - ray.origin).length();
        if best.as_ref().is_some_and(|b| b.distance <= distance) {
            continue;
        }

        let normal = world
            .inverse()
            .transpose()
            .transform_vector3(tri.normal)
            .normalize_or_zero();
        best = Some(Hit {
            object: index,
            object_id: scene.get(index).map(|o| o.id.clone()).unwrap_or_default(),
            triangle_index: tri.triangle_index,
            point,
            normal,
            distance,
        });
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::mesh::cube;

    #[test]
    fn test_ray_triangle_hit_and_miss() {
        let ray = Ray::new(Vec3::new(0.2, 0.2, 5.0), Vec3::NEG_Z);
        let (a, b, c) = (Vec3::ZERO, Vec3::X, Vec3::Y);
        assert!((ray_triangle_intersect(&ray, a, b, c).unwrap() - 5.0).abs() < 1e-5);

        let miss = Ray::new(Vec3::new(2.0, 2.0, 5.0), Vec3::NEG_Z);
        assert!(ray_triangle_intersect(&miss, a, b, c).is_none());
    }

    #[test]
    fn test_ray_behind_origin_misses() {
        let ray = Ray::new(Vec3::new(0.2, 0.2, -5.0), Vec3::NEG_Z);
        assert!(ray_triangle_intersect(&ray, Vec3::ZERO, Vec3::X, Vec3::Y).is_none());
    }

    #[test]
    fn test_ray_aabb() {
        let aabb = Aabb {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        };
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        assert!((ray_aabb(&ray, &aabb).unwrap() - 9.0).abs() < 1e-5);
        let miss = Ray::new(Vec3::new(5.0, 0.0, 10.0), Vec3::NEG_Z);
        assert!(ray_aabb(&miss, &aabb).is_none());
    }

    #[test]
    fn test_pick_triangle_front_face() {
        let mesh = cube(2.0, 2.0, 2.0, [1.0; 3]);
        let ray = Ray::new(Vec3::new(0.3, 0.1, 10.0), Vec3::NEG_Z);
        let hit = pick_triangle(&ray, &mesh).unwrap();
        assert!((hit.distance - 9.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
        // Front face is the first quad: triangles 0 and 1
        assert!(hit.triangle_index < 2);
    }

    #[test]
    fn test_local_ray_under_translation() {
        let world = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let ray = Ray::new(Vec3::new(5.0, 0.0, 10.0), Vec3::NEG_Z);
        let local = ray.to_local(&world);
        assert!((local.origin - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-5);
    }
}
