//! Math utilities and types
//!
//! Provides the vector and matrix aliases used by the visibility and lighting code.
//! Projection matrices map view-space depth to the `0..1` clip range and view space
//! is right-handed with the camera looking down `-Z`.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Create a transform at `position` whose forward axis (`-Z`) points along `direction`
    pub fn looking_along(position: Vec3, direction: Vec3) -> Self {
        let rotation = Quat::rotation_between(&-Vec3::z(), &direction)
            .unwrap_or_else(|| {
                // Opposite vectors: any half turn about an axis perpendicular to Z works
                Quat::from_axis_angle(&Vec3::y_axis(), constants::PI)
            });
        Self::from_position_rotation(position, rotation)
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a right-handed perspective projection with `0..1` depth
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed orthographic projection with `0..1` depth
    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Translation column of an affine matrix
    fn translation_part(&self) -> Vec3;

    /// Forward (`-Z`) axis of an affine matrix, normalized
    fn forward_axis(&self) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let f = 1.0 / (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = f / aspect;
        result[(1, 1)] = f;
        result[(2, 2)] = far / (near - far);
        result[(2, 3)] = (near * far) / (near - far);
        result[(3, 2)] = -1.0;
        result
    }

    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let mut result = Mat4::identity();
        result[(0, 0)] = 2.0 / (right - left);
        result[(1, 1)] = 2.0 / (top - bottom);
        result[(2, 2)] = 1.0 / (near - far);
        result[(0, 3)] = -(right + left) / (right - left);
        result[(1, 3)] = -(top + bottom) / (top - bottom);
        result[(2, 3)] = near / (near - far);
        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }

    fn translation_part(&self) -> Vec3 {
        Vec3::new(self[(0, 3)], self[(1, 3)], self[(2, 3)])
    }

    fn forward_axis(&self) -> Vec3 {
        let forward = -Vec3::new(self[(0, 2)], self[(1, 2)], self[(2, 2)]);
        let length = forward.norm();
        if length > f32::EPSILON {
            forward / length
        } else {
            -Vec3::z()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perspective_maps_near_and_far_to_unit_depth() {
        let proj = Mat4::perspective(utils::deg_to_rad(60.0), 1.0, 0.5, 100.0);

        let near = proj * Vec4::new(0.0, 0.0, -0.5, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -100.0, 1.0);

        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_orthographic_maps_near_and_far_to_unit_depth() {
        let proj = Mat4::orthographic(-1.0, 1.0, -1.0, 1.0, 1.0, 11.0);

        let near = proj * Vec4::new(0.0, 0.0, -1.0, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -11.0, 1.0);

        assert_relative_eq!(near.z, 0.0, epsilon = 1e-5);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_looking_along_sets_forward_axis() {
        let direction = Vec3::new(1.0, -1.0, 0.0).normalize();
        let transform = Transform::looking_along(Vec3::new(1.0, 2.0, 3.0), direction);
        let matrix = transform.to_matrix();

        assert_relative_eq!(matrix.forward_axis(), direction, epsilon = 1e-5);
        assert_relative_eq!(matrix.translation_part(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_looking_along_opposite_axis() {
        let matrix = Transform::looking_along(Vec3::zeros(), Vec3::z()).to_matrix();
        assert_relative_eq!(matrix.forward_axis(), Vec3::z(), epsilon = 1e-5);
    }
}
