//! Bounding volumes
//!
//! Axis-aligned boxes and bounding spheres used by the visibility queries.

use crate::foundation::math::{Mat4, Point3, Vec3};

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Unit cube centered at the origin
    pub fn unit() -> Self {
        Self::from_center_extents(Vec3::zeros(), Vec3::new(0.5, 0.5, 0.5))
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Smallest box enclosing both boxes
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Transform all eight corners and re-box them
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        let mut min = Vec3::repeat(f32::INFINITY);
        let mut max = Vec3::repeat(f32::NEG_INFINITY);

        for i in 0..8 {
            let corner = Point3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let world = matrix.transform_point(&corner).coords;
            min = min.inf(&world);
            max = max.sup(&world);
        }

        Aabb { min, max }
    }
}

/// Sphere enclosing a volume, used for cheap rejection and distance sorting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Sphere center
    pub center: Vec3,
    /// Sphere radius
    pub radius: f32,
}

impl BoundingSphere {
    /// Create a sphere from center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere circumscribing a box
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self {
            center: aabb.center(),
            radius: aabb.extents().norm(),
        }
    }
}

/// World-space bounds of a render object
///
/// Carries both the box and its circumscribed sphere. An infinite volume (a sun
/// light) is inside every frustum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    /// Axis-aligned box
    pub aabb: Aabb,
    /// Circumscribed sphere
    pub sphere: BoundingSphere,
    /// Volume covers all of space
    pub infinite: bool,
}

impl BoundingVolume {
    /// Bounds from a box
    pub fn from_aabb(aabb: Aabb) -> Self {
        Self {
            aabb,
            sphere: BoundingSphere::from_aabb(&aabb),
            infinite: false,
        }
    }

    /// Bounds from a sphere; the box is the sphere's enclosing cube
    pub fn from_sphere(center: Vec3, radius: f32) -> Self {
        Self {
            aabb: Aabb::from_center_extents(center, Vec3::repeat(radius)),
            sphere: BoundingSphere::new(center, radius),
            infinite: false,
        }
    }

    /// Unbounded volume anchored at `center` for distance sorting
    pub fn infinite(center: Vec3) -> Self {
        Self {
            aabb: Aabb::from_center_extents(center, Vec3::zeros()),
            sphere: BoundingSphere::new(center, 0.0),
            infinite: true,
        }
    }

    /// Transform local-space bounds into world space
    pub fn from_local(local: &Aabb, world: &Mat4) -> Self {
        Self::from_aabb(local.transformed(world))
    }
}

impl Default for BoundingVolume {
    fn default() -> Self {
        Self::from_aabb(Aabb::unit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_aabb_contains_point() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        assert!(aabb.contains_point(Vec3::zeros()));
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!aabb.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_intersects() {
        let aabb1 = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let aabb2 = Aabb::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0));
        let aabb3 = Aabb::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(7.0, 7.0, 7.0));

        assert!(aabb1.intersects(&aabb2));
        assert!(!aabb1.intersects(&aabb3));
        assert_eq!(aabb1.union(&aabb3), Aabb::new(Vec3::zeros(), Vec3::new(7.0, 7.0, 7.0)));
    }

    #[test]
    fn test_transformed_box_is_rebounded() {
        let rotation = Mat4::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_4);
        let translated = Mat4::new_translation(&Vec3::new(10.0, 0.0, 0.0)) * rotation;
        let world = Aabb::unit().transformed(&translated);

        let half_diagonal = 0.5 * std::f32::consts::SQRT_2;
        assert_relative_eq!(world.center(), Vec3::new(10.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(world.extents().x, half_diagonal, epsilon = 1e-5);
        assert_relative_eq!(world.extents().z, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_sphere_encloses_box() {
        let sphere = BoundingSphere::from_aabb(&Aabb::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0)));
        assert_relative_eq!(sphere.center, Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(sphere.radius, 3.0_f32.sqrt(), epsilon = 1e-6);
    }
}
