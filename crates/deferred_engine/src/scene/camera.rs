//! Cameras as seen by the visibility and lighting code
//!
//! A camera supplies the view-projection used for frustum tests, the eye position
//! used for distance sorting, and where and how its image is cleared and written.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3, Vec4};
use crate::render::device::{ClearFlags, RenderTarget};
use crate::scene::SceneId;

/// What a camera renders for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraPurpose {
    /// Regular view rendered through the full pipeline
    Main,
    /// Light's point of view; only shadow casters are classified
    ShadowGeneration,
}

/// Pixel rectangle a camera renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Viewport covering `width` x `height` from the origin
    pub fn new(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }

    /// Width over height, 1.0 for empty viewports
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// A camera registered in a render scene or owned by a shadow-casting light
#[derive(Debug, Clone)]
pub struct Camera {
    /// Debug name
    pub name: String,
    /// Eye position in world space
    pub position: Vec3,
    /// World-to-view matrix
    pub view: Mat4,
    /// View-to-clip matrix
    pub projection: Mat4,
    /// Attachments cleared before drawing
    pub clear_flags: ClearFlags,
    /// Clear color
    pub clear_color: Vec4,
    /// Clear depth
    pub clear_depth: f32,
    /// Clear stencil
    pub clear_stencil: u32,
    /// Pixel viewport
    pub viewport: Viewport,
    /// Final destination of the composited image
    pub target: RenderTarget,
    /// Main view or shadow generation
    pub purpose: CameraPurpose,
    scene: Option<SceneId>,
}

impl Camera {
    /// Camera with identity matrices rendering to the backbuffer
    pub fn new(name: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            name: name.into(),
            position: Vec3::zeros(),
            view: Mat4::identity(),
            projection: Mat4::identity(),
            clear_flags: ClearFlags::all(),
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            clear_depth: 1.0,
            clear_stencil: 0,
            viewport,
            target: RenderTarget::Backbuffer,
            purpose: CameraPurpose::Main,
            scene: None,
        }
    }

    /// Perspective camera at `position` looking at `target`
    pub fn perspective(
        name: impl Into<String>,
        position: Vec3,
        target: Vec3,
        fov_degrees: f32,
        viewport: Viewport,
        near: f32,
        far: f32,
    ) -> Self {
        let mut camera = Self::new(name, viewport);
        camera.projection = Mat4::perspective(utils::deg_to_rad(fov_degrees), viewport.aspect(), near, far);
        camera.look_at(position, target, Vec3::y());
        camera
    }

    /// Orthographic camera covering `half_width` x `half_height` around its axis
    pub fn orthographic(
        name: impl Into<String>,
        half_width: f32,
        half_height: f32,
        near: f32,
        far: f32,
        viewport: Viewport,
    ) -> Self {
        let mut camera = Self::new(name, viewport);
        camera.projection = Mat4::orthographic(-half_width, half_width, -half_height, half_height, near, far);
        camera
    }

    /// Point the camera at `target`, falling back to another up axis when
    /// `up` is parallel to the view direction
    pub fn look_at(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        let direction = target - position;
        let up = if direction.cross(&up).norm_squared() < 1e-8 {
            Vec3::z()
        } else {
            up
        };
        self.position = position;
        self.view = Mat4::look_at(position, target, up);
    }

    /// Place the camera with a world transform (its `-Z` axis is the view direction)
    pub fn set_world_transform(&mut self, world: &Mat4) {
        let position = world.translation_part();
        let forward = world.forward_axis();
        self.look_at(position, position + forward, Vec3::y());
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Scene the camera belongs to
    pub fn scene(&self) -> Option<SceneId> {
        self.scene
    }

    pub(crate) fn set_scene(&mut self, scene: Option<SceneId>) {
        self.scene = scene;
    }

    /// Whether the camera renders a shadow map
    pub fn is_shadow_camera(&self) -> bool {
        self.purpose == CameraPurpose::ShadowGeneration
    }
}
