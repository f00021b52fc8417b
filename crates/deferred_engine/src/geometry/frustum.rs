//! View frustum and plane tests
//!
//! The frustum test is conservative: a volume straddling a plane counts as
//! visible, so the only possible error is drawing something that ends up off
//! screen.

use crate::foundation::math::{Mat4, Vec3, Vec4};
use super::bounds::{Aabb, BoundingVolume};

/// Plane defined by normal and distance from origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Normal vector (normalized, pointing into the kept half-space)
    pub normal: Vec3,
    /// Distance from origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a new plane from normal and distance
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal: normal.normalize(), distance }
    }

    /// Plane from the `(a, b, c, d)` coefficients of `ax + by + cz + d = 0`
    fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = Vec3::new(coefficients.x, coefficients.y, coefficients.z);
        let length = normal.norm();
        if length > f32::EPSILON {
            Self { normal: normal / length, distance: coefficients.w / length }
        } else {
            // Degenerate row, keep everything
            Self { normal: Vec3::zeros(), distance: 0.0 }
        }
    }

    /// Calculate signed distance from plane to point
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) + self.distance
    }
}

/// Frustum for visibility culling
#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    /// Six planes defining the frustum (left, right, bottom, top, near, far)
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Create a frustum from six planes
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extract frustum planes from a view-projection matrix
    ///
    /// Gribb-Hartmann extraction for clip space with `-w <= x, y <= w` and
    /// `0 <= z <= w`.
    pub fn from_view_projection(view_projection: &Mat4) -> Self {
        let row = |i: usize| {
            Vec4::new(
                view_projection[(i, 0)],
                view_projection[(i, 1)],
                view_projection[(i, 2)],
                view_projection[(i, 3)],
            )
        };
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));

        Self {
            planes: [
                Plane::from_coefficients(r3 + r0),
                Plane::from_coefficients(r3 - r0),
                Plane::from_coefficients(r3 + r1),
                Plane::from_coefficients(r3 - r1),
                Plane::from_coefficients(r2),
                Plane::from_coefficients(r3 - r2),
            ],
        }
    }

    /// Check if a bounding volume is inside or straddles the frustum
    pub fn contains(&self, volume: &BoundingVolume) -> bool {
        if volume.infinite {
            return true;
        }
        if !self.contains_point(volume.sphere.center, volume.sphere.radius) {
            return false;
        }
        self.intersects_aabb(&volume.aabb)
    }

    /// Check if a sphere of `radius` around `point` is inside or straddles the frustum
    pub fn contains_point(&self, point: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= -radius)
    }

    /// Check if an AABB is inside or intersects the frustum
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        for plane in &self.planes {
            // Corner furthest along the plane normal
            let mut p = aabb.min;
            if plane.normal.x >= 0.0 { p.x = aabb.max.x; }
            if plane.normal.y >= 0.0 { p.y = aabb.max.y; }
            if plane.normal.z >= 0.0 { p.z = aabb.max.z; }

            // If this point is outside the plane, the entire AABB is outside
            if plane.distance_to_point(p) < 0.0 {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{utils, Mat4Ext};

    fn camera_frustum() -> Frustum {
        // Camera at origin looking down -Z, 90 degree fov, near 1, far 100
        let projection = Mat4::perspective(utils::deg_to_rad(90.0), 1.0, 1.0, 100.0);
        let view = Mat4::look_at(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0), Vec3::y());
        Frustum::from_view_projection(&(projection * view))
    }

    #[test]
    fn test_extracted_planes_are_normalized() {
        for plane in &camera_frustum().planes {
            assert!((plane.normal.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_volume_fully_inside() {
        let frustum = camera_frustum();
        let volume = BoundingVolume::from_aabb(Aabb::from_center_extents(
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::new(1.0, 1.0, 1.0),
        ));
        assert!(frustum.contains(&volume));
    }

    #[test]
    fn test_volume_fully_outside() {
        let frustum = camera_frustum();
        let behind = BoundingVolume::from_aabb(Aabb::from_center_extents(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(1.0, 1.0, 1.0),
        ));
        let beyond_far = BoundingVolume::from_aabb(Aabb::from_center_extents(
            Vec3::new(0.0, 0.0, -150.0),
            Vec3::new(1.0, 1.0, 1.0),
        ));
        let off_left = BoundingVolume::from_aabb(Aabb::from_center_extents(
            Vec3::new(-50.0, 0.0, -10.0),
            Vec3::new(1.0, 1.0, 1.0),
        ));

        assert!(!frustum.contains(&behind));
        assert!(!frustum.contains(&beyond_far));
        assert!(!frustum.contains(&off_left));
    }

    #[test]
    fn test_volume_straddling_plane_is_visible() {
        let frustum = camera_frustum();
        // Crosses the left plane (x = z at 90 degrees fov)
        let straddling = BoundingVolume::from_aabb(Aabb::from_center_extents(
            Vec3::new(-10.0, 0.0, -10.0),
            Vec3::new(1.0, 1.0, 1.0),
        ));
        // Crosses the far plane
        let at_far = BoundingVolume::from_aabb(Aabb::from_center_extents(
            Vec3::new(0.0, 0.0, -100.0),
            Vec3::new(2.0, 2.0, 2.0),
        ));

        assert!(frustum.contains(&straddling));
        assert!(frustum.contains(&at_far));
    }

    #[test]
    fn test_contains_point_with_radius() {
        let frustum = camera_frustum();

        assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -5.0), 0.0));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 5.0), 1.0));
        // Just behind the near plane but radius reaches into the frustum
        assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -0.5), 1.0));
    }

    #[test]
    fn test_infinite_volume_always_visible() {
        let frustum = camera_frustum();
        assert!(frustum.contains(&BoundingVolume::infinite(Vec3::new(0.0, 0.0, 1000.0))));
    }
}
