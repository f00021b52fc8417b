//! Uniform blocks uploaded by the pipeline
//!
//! Plain `#[repr(C)]` structs of `f32` arrays, uploaded with `bytemuck::bytes_of`.
//! Matrices are column-major.

// derive(Pod) expands to `unsafe impl`
#![allow(unsafe_code)]

use bytemuck::{Pod, Zeroable};

use crate::config::ShadowConfig;
use crate::foundation::math::{Mat4, Vec3};
use crate::scene::{Camera, Light, ShadowResources};

/// Maps clip-space `xy` to shadow map texture coordinates (y down)
#[rustfmt::skip]
fn shadow_bias() -> Mat4 {
    Mat4::new(
        0.5, 0.0, 0.0, 0.5,
        0.0, -0.5, 0.0, 0.5,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

fn columns(matrix: &Mat4) -> [[f32; 4]; 4] {
    (*matrix).into()
}

fn vec4(v: Vec3, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

/// Per-camera matrices
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniforms {
    /// World to view
    pub view: [[f32; 4]; 4],
    /// View to clip
    pub projection: [[f32; 4]; 4],
    /// World to clip
    pub view_projection: [[f32; 4]; 4],
    /// Eye position, w = 1
    pub eye: [f32; 4],
    /// Viewport x, y, width, height in pixels
    pub viewport: [f32; 4],
}

impl CameraUniforms {
    /// Uniforms of a camera
    pub fn new(camera: &Camera) -> Self {
        let viewport = camera.viewport;
        Self {
            view: columns(&camera.view),
            projection: columns(&camera.projection),
            view_projection: columns(&camera.view_projection()),
            eye: vec4(camera.position, 1.0),
            viewport: [
                viewport.x as f32,
                viewport.y as f32,
                viewport.width as f32,
                viewport.height as f32,
            ],
        }
    }
}

/// Per-object matrices
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ObjectUniforms {
    /// Object to world
    pub world: [[f32; 4]; 4],
    /// World to object; its transpose transforms normals
    pub inverse_world: [[f32; 4]; 4],
}

impl ObjectUniforms {
    /// Uniforms of an object transform
    pub fn new(world: &Mat4, inverse_world: &Mat4) -> Self {
        Self {
            world: columns(world),
            inverse_world: columns(inverse_world),
        }
    }
}

/// Per-light parameters for the accumulation passes
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightUniforms {
    /// World to shadow map texture space, identity without a shadow
    pub shadow_matrix: [[f32; 4]; 4],
    /// xyz = position, w = range
    pub position_range: [f32; 4],
    /// xyz = direction, w = kind index
    pub direction_kind: [f32; 4],
    /// xyz = color, w = intensity
    pub color_intensity: [f32; 4],
    /// xyz = hemisphere ground color, w = 1 when subsurface scattering is on
    pub ground_subsurface: [f32; 4],
    /// Constant, linear, quadratic attenuation, w unused
    pub attenuation: [f32; 4],
    /// cos(inner), cos(outer), area width, area height
    pub cone_area: [f32; 4],
    /// x = 1 when a shadow map is bound, y = depth bias, z = strength, w = texel size
    pub shadow: [f32; 4],
}

impl LightUniforms {
    /// Uniforms of a light; `shadow` is the light's built shadow map, if any
    pub fn new(light: &Light, shadow_config: &ShadowConfig, shadow: Option<&ShadowResources>) -> Self {
        let [constant, linear, quadratic] = light.attenuation;
        let (shadow_matrix, shadow_params) = match shadow {
            Some(resources) => (
                shadow_bias() * resources.camera.view_projection(),
                [
                    1.0,
                    shadow_config.depth_bias,
                    shadow_config.strength,
                    1.0 / resources.resolution.max(1) as f32,
                ],
            ),
            None => (Mat4::identity(), [0.0; 4]),
        };

        Self {
            shadow_matrix: columns(&shadow_matrix),
            position_range: vec4(light.position(), light.range),
            direction_kind: vec4(light.direction(), light.kind.index() as f32),
            color_intensity: vec4(light.color, light.intensity),
            ground_subsurface: vec4(light.ground_color, if light.subsurface { 1.0 } else { 0.0 }),
            attenuation: [constant, linear, quadratic, 0.0],
            cone_area: [
                light.spot_inner.cos(),
                light.spot_outer.cos(),
                light.area_size[0],
                light.area_size[1],
            ],
            shadow: shadow_params,
        }
    }

    /// Light color
    pub fn color(&self) -> Vec3 {
        Vec3::new(self.color_intensity[0], self.color_intensity[1], self.color_intensity[2])
    }

    /// Whether a shadow map is sampled
    pub fn has_shadow(&self) -> bool {
        self.shadow[0] > 0.5
    }
}

/// Parameters of one separable blur pass
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FilterUniforms {
    /// Sampling direction in texels
    pub direction: [f32; 2],
    /// Size of one texel in texture coordinates
    pub texel_size: f32,
    /// Blur radius in texels
    pub radius: f32,
}

impl FilterUniforms {
    /// Horizontal pass over a `resolution`-sized map
    pub fn horizontal(resolution: u32, radius: f32) -> Self {
        Self {
            direction: [1.0, 0.0],
            texel_size: 1.0 / resolution.max(1) as f32,
            radius,
        }
    }

    /// Vertical pass over a `resolution`-sized map
    pub fn vertical(resolution: u32, radius: f32) -> Self {
        Self {
            direction: [0.0, 1.0],
            ..Self::horizontal(resolution, radius)
        }
    }
}
