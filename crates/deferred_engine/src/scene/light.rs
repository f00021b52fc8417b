//! Light entity
//!
//! A light is a render object that emits instead of being drawn. Shadow-casting
//! lights own a shadow map, its framebuffer and a camera looking from the light,
//! built lazily the first time the pipeline needs them:
//!
//! ```text
//! NoShadow --set_shadow(true)--> Pending --ensure_shadow--> Ready
//!     ^                            ^                          |
//!     |                            +--set_shadow_size(n)------+
//!     +------------set_shadow(false), resources released------+
//! ```

use bitflags::bitflags;

use crate::config::RenderConfig;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3, Vec4};
use crate::geometry::BoundingVolume;
use crate::render::device::{
    ClearFlags, FramebufferDesc, FramebufferHandle, GraphicsDevice, RenderTarget, ResourceScope,
    TextureDesc, TextureFormat, TextureHandle,
};
use crate::render::RenderResult;
use crate::scene::camera::{Camera, CameraPurpose, Viewport};
use crate::scene::SceneId;

/// Shadow map edge length of a newly created light
pub const DEFAULT_SHADOW_RESOLUTION: u32 = 1024;

/// Near plane of perspective shadow cameras
const SHADOW_NEAR: f32 = 0.05;

/// Field of view of point, hemisphere and area shadow cameras, in degrees
const WIDE_SHADOW_FOV: f32 = 120.0;

/// Spot shadow field of view limits, in degrees
const SPOT_FOV_MIN: f32 = 1.0;
const SPOT_FOV_MAX: f32 = 170.0;

/// Kind of light, selecting the accumulation pass and the shadow projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LightKind {
    /// Directional light with parallel rays, affects the whole scene
    Sun,
    /// Omnidirectional light with a finite range
    Point,
    /// Cone-shaped light
    Spot,
    /// Sky/ground ambient gradient
    Hemisphere,
    /// Rectangular emitter
    Area,
}

impl LightKind {
    /// Every kind, in accumulation order
    pub const ALL: [LightKind; 5] = [
        LightKind::Sun,
        LightKind::Point,
        LightKind::Spot,
        LightKind::Hemisphere,
        LightKind::Area,
    ];

    /// Short lowercase name
    pub fn name(self) -> &'static str {
        match self {
            LightKind::Sun => "sun",
            LightKind::Point => "point",
            LightKind::Spot => "spot",
            LightKind::Hemisphere => "hemisphere",
            LightKind::Area => "area",
        }
    }

    /// Name of the lighting material pass that accumulates this kind
    pub fn pass_name(self) -> &'static str {
        match self {
            LightKind::Sun => "light_sun",
            LightKind::Point => "light_point",
            LightKind::Spot => "light_spot",
            LightKind::Hemisphere => "light_hemisphere",
            LightKind::Area => "light_area",
        }
    }

    /// Position in [`LightKind::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Single-kind flag
    pub fn flag(self) -> LightKinds {
        match self {
            LightKind::Sun => LightKinds::SUN,
            LightKind::Point => LightKinds::POINT,
            LightKind::Spot => LightKinds::SPOT,
            LightKind::Hemisphere => LightKinds::HEMISPHERE,
            LightKind::Area => LightKinds::AREA,
        }
    }
}

bitflags! {
    /// Set of light kinds, e.g. the kinds present among the visible lights
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LightKinds: u8 {
        /// Sun lights
        const SUN = 1 << 0;
        /// Point lights
        const POINT = 1 << 1;
        /// Spot lights
        const SPOT = 1 << 2;
        /// Hemisphere lights
        const HEMISPHERE = 1 << 3;
        /// Area lights
        const AREA = 1 << 4;
    }
}

/// Target the shadow map is blurred through for soft shadows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurTarget {
    /// Intermediate texture of the separable blur
    pub texture: TextureHandle,
    /// Framebuffer over `texture`
    pub framebuffer: FramebufferHandle,
}

/// GPU resources of a shadow-casting light
#[derive(Debug, Clone)]
pub struct ShadowResources {
    /// Distance from the light, sampled when shading
    pub texture: TextureHandle,
    /// Depth buffer used while rendering the shadow map
    pub depth: TextureHandle,
    /// Framebuffer over `texture` and `depth`
    pub framebuffer: FramebufferHandle,
    /// Blur intermediate, present when soft shadows are on
    pub blur: Option<BlurTarget>,
    /// Camera looking from the light
    pub camera: Camera,
    /// Edge length of the shadow map
    pub resolution: u32,
}

/// Shadow lifecycle of a light
#[derive(Debug, Clone, Default)]
pub enum ShadowState {
    /// Shadows disabled or zero resolution; no resources
    #[default]
    NoShadow,
    /// Shadows wanted, resources missing or stale
    Pending,
    /// Resources built and in sync with the light's settings
    Ready(ShadowResources),
}

impl ShadowState {
    /// Resources when ready
    pub fn resources(&self) -> Option<&ShadowResources> {
        match self {
            ShadowState::Ready(resources) => Some(resources),
            _ => None,
        }
    }

    /// Whether resources are built
    pub fn is_ready(&self) -> bool {
        matches!(self, ShadowState::Ready(_))
    }

    /// Whether resources await a rebuild
    pub fn is_pending(&self) -> bool {
        matches!(self, ShadowState::Pending)
    }
}

/// A light source
#[derive(Debug, Clone)]
pub struct Light {
    /// Kind of light
    pub kind: LightKind,
    /// Intensity multiplier
    pub intensity: f32,
    /// Linear RGB color
    pub color: Vec3,
    /// Ground color of hemisphere lights
    pub ground_color: Vec3,
    /// Constant, linear and quadratic attenuation
    pub attenuation: [f32; 3],
    /// Reach of the light; sizes its bounds and its shadow camera
    pub range: f32,
    /// Spot inner cone half-angle in radians (full intensity inside)
    pub spot_inner: f32,
    /// Spot outer cone half-angle in radians (no light outside)
    pub spot_outer: f32,
    /// Width and height of area lights
    pub area_size: [f32; 2],
    /// Light scatters under the surface of receiving materials
    pub subsurface: bool,
    shadow_enabled: bool,
    soft_shadow: bool,
    shadow_resolution: u32,
    shadow: ShadowState,
    world: Mat4,
    scene: Option<SceneId>,
}

impl Light {
    /// White light of `kind` with default parameters and no shadow
    pub fn new(kind: LightKind) -> Self {
        Self {
            kind,
            intensity: 1.0,
            color: Vec3::new(1.0, 1.0, 1.0),
            ground_color: Vec3::new(0.2, 0.2, 0.2),
            attenuation: [1.0, 0.09, 0.032],
            range: 10.0,
            spot_inner: utils::deg_to_rad(20.0),
            spot_outer: utils::deg_to_rad(30.0),
            area_size: [1.0, 1.0],
            subsurface: false,
            shadow_enabled: false,
            soft_shadow: false,
            shadow_resolution: DEFAULT_SHADOW_RESOLUTION,
            shadow: ShadowState::NoShadow,
            world: Mat4::identity(),
            scene: None,
        }
    }

    /// Directional light; `range` sizes the area its shadow covers
    pub fn sun(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            attenuation: [1.0, 0.0, 0.0],
            range: 50.0,
            ..Self::new(LightKind::Sun)
        }
    }

    /// Point light reaching `range`
    pub fn point(color: Vec3, intensity: f32, range: f32) -> Self {
        Self {
            color,
            intensity,
            range,
            ..Self::new(LightKind::Point)
        }
    }

    /// Spot light with cone half-angles in degrees
    pub fn spot(color: Vec3, intensity: f32, range: f32, inner_degrees: f32, outer_degrees: f32) -> Self {
        Self {
            color,
            intensity,
            range,
            spot_inner: utils::deg_to_rad(inner_degrees.min(outer_degrees)),
            spot_outer: utils::deg_to_rad(outer_degrees),
            ..Self::new(LightKind::Spot)
        }
    }

    /// Hemisphere light blending `sky` above and `ground` below
    pub fn hemisphere(sky: Vec3, ground: Vec3, intensity: f32) -> Self {
        Self {
            color: sky,
            ground_color: ground,
            intensity,
            ..Self::new(LightKind::Hemisphere)
        }
    }

    /// Rectangular light of `width` x `height`
    pub fn area(color: Vec3, intensity: f32, width: f32, height: f32) -> Self {
        Self {
            color,
            intensity,
            area_size: [width, height],
            ..Self::new(LightKind::Area)
        }
    }

    /// Builder: attenuation coefficients
    pub fn with_attenuation(mut self, constant: f32, linear: f32, quadratic: f32) -> Self {
        self.attenuation = [constant, linear, quadratic];
        self
    }

    /// Builder: range
    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    /// Builder: shadow map resolution requested before shadows are enabled
    pub fn with_shadow_resolution(mut self, resolution: u32) -> Self {
        self.shadow_resolution = resolution;
        self
    }

    /// Builder: soft shadow flag set before shadows are enabled
    pub fn with_soft_shadow(mut self, soft: bool) -> Self {
        self.soft_shadow = soft;
        self
    }

    /// Whether shadows are enabled
    pub fn shadow_enabled(&self) -> bool {
        self.shadow_enabled
    }

    /// Whether shadow maps are blurred
    pub fn soft_shadow(&self) -> bool {
        self.soft_shadow
    }

    /// Requested shadow map edge length
    pub fn shadow_resolution(&self) -> u32 {
        self.shadow_resolution
    }

    /// Current shadow lifecycle state
    pub fn shadow_state(&self) -> &ShadowState {
        &self.shadow
    }

    /// Light position in world space
    pub fn position(&self) -> Vec3 {
        self.world.translation_part()
    }

    /// Direction the light points to (its `-Z` axis)
    pub fn direction(&self) -> Vec3 {
        self.world.forward_axis()
    }

    /// World transform last seen by [`Light::on_move`]
    pub fn world_transform(&self) -> &Mat4 {
        &self.world
    }

    /// World-space bounds: infinite for suns, a sphere of `range` otherwise
    pub fn bounds(&self) -> BoundingVolume {
        match self.kind {
            LightKind::Sun => BoundingVolume::infinite(self.position()),
            _ => BoundingVolume::from_sphere(self.position(), self.range.max(0.0)),
        }
    }

    /// Enable or disable shadows
    ///
    /// Disabling releases every shadow resource before returning. Enabling marks the
    /// shadow pending; resources are built by the next [`Light::ensure_shadow`].
    pub fn set_shadow<D: GraphicsDevice + ?Sized>(&mut self, enabled: bool, device: &mut D) {
        if enabled == self.shadow_enabled {
            return;
        }
        self.shadow_enabled = enabled;
        self.destroy_resources(device);
        self.shadow = self.idle_state();
    }

    /// Change the shadow map resolution; zero disables the shadow map
    pub fn set_shadow_size<D: GraphicsDevice + ?Sized>(&mut self, resolution: u32, device: &mut D) {
        if resolution == self.shadow_resolution {
            return;
        }
        self.shadow_resolution = resolution;
        self.destroy_resources(device);
        self.shadow = self.idle_state();
    }

    /// Toggle shadow blurring; built resources are rebuilt to add or drop the blur target
    pub fn set_soft_shadow<D: GraphicsDevice + ?Sized>(&mut self, soft: bool, device: &mut D) {
        if soft == self.soft_shadow {
            return;
        }
        self.soft_shadow = soft;
        if self.shadow.is_ready() {
            self.destroy_resources(device);
            self.shadow = self.idle_state();
        }
    }

    /// Build shadow resources if they are pending
    ///
    /// Returns the resources when shadows are on. A failed build releases whatever it
    /// created and leaves the shadow pending, so the next frame retries.
    pub fn ensure_shadow<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        config: &RenderConfig,
    ) -> RenderResult<Option<&ShadowResources>> {
        if self.shadow.is_pending() {
            let mut created = ResourceScope::new();
            match self.build_resources(device, config, &mut created) {
                Ok(resources) => {
                    log::debug!(
                        "Built {}x{} shadow map for {} light",
                        resources.resolution,
                        resources.resolution,
                        self.kind.name()
                    );
                    self.shadow = ShadowState::Ready(resources);
                }
                Err(e) => {
                    created.release(device);
                    return Err(e);
                }
            }
        }
        Ok(self.shadow.resources())
    }

    /// Release shadow resources, keeping the shadow settings
    ///
    /// Safe to call any number of times. A shadow-enabled light goes back to pending
    /// and is rebuilt on next use.
    pub fn release_shadow<D: GraphicsDevice + ?Sized>(&mut self, device: &mut D) {
        self.destroy_resources(device);
        self.shadow = self.idle_state();
    }

    /// Record a new world transform and keep the shadow camera on it
    pub fn on_move(&mut self, world: &Mat4) {
        self.world = *world;
        let (eye, direction) = self.shadow_eye();
        if let ShadowState::Ready(resources) = &mut self.shadow {
            resources.camera.look_at(eye, eye + direction, Vec3::y());
        }
    }

    /// Scene the owning object is registered in
    pub fn scene(&self) -> Option<SceneId> {
        self.scene
    }

    pub(crate) fn set_scene(&mut self, scene: Option<SceneId>) {
        self.scene = scene;
        if let ShadowState::Ready(resources) = &mut self.shadow {
            resources.camera.set_scene(scene);
        }
    }

    fn idle_state(&self) -> ShadowState {
        if self.shadow_enabled && self.shadow_resolution > 0 {
            ShadowState::Pending
        } else {
            ShadowState::NoShadow
        }
    }

    fn destroy_resources<D: GraphicsDevice + ?Sized>(&mut self, device: &mut D) {
        if let ShadowState::Ready(resources) = std::mem::take(&mut self.shadow) {
            if let Some(blur) = resources.blur {
                device.destroy_framebuffer(blur.framebuffer);
                device.destroy_texture(blur.texture);
            }
            device.destroy_framebuffer(resources.framebuffer);
            device.destroy_texture(resources.depth);
            device.destroy_texture(resources.texture);
        }
    }

    fn build_resources<D: GraphicsDevice + ?Sized>(
        &self,
        device: &mut D,
        config: &RenderConfig,
        created: &mut ResourceScope,
    ) -> RenderResult<ShadowResources> {
        let size = self.shadow_resolution;
        let format = config.gbuffer.shadow_format;

        let texture = created.texture(device, &TextureDesc::new("shadow_map", size, size, format))?;
        let depth = created.texture(
            device,
            &TextureDesc::new("shadow_depth", size, size, TextureFormat::Depth32Float),
        )?;
        let framebuffer = created.framebuffer(
            device,
            &FramebufferDesc {
                label: "shadow_map".to_string(),
                color_attachments: vec![texture],
                depth_attachment: Some(depth),
                width: size,
                height: size,
            },
        )?;

        let blur = if self.soft_shadow {
            let blur_texture = created.texture(device, &TextureDesc::new("shadow_blur", size, size, format))?;
            let blur_framebuffer = created.framebuffer(
                device,
                &FramebufferDesc {
                    label: "shadow_blur".to_string(),
                    color_attachments: vec![blur_texture],
                    depth_attachment: None,
                    width: size,
                    height: size,
                },
            )?;
            Some(BlurTarget {
                texture: blur_texture,
                framebuffer: blur_framebuffer,
            })
        } else {
            None
        };

        let mut camera = self.shadow_camera(size);
        camera.target = RenderTarget::Framebuffer(framebuffer);

        Ok(ShadowResources {
            texture,
            depth,
            framebuffer,
            blur,
            camera,
            resolution: size,
        })
    }

    fn shadow_camera(&self, size: u32) -> Camera {
        let name = format!("{}_shadow", self.kind.name());
        let viewport = Viewport::new(size, size);
        let range = self.range.max(SHADOW_NEAR * 2.0);

        let mut camera = match self.kind {
            LightKind::Sun => Camera::orthographic(name, range, range, 0.0, 2.0 * range, viewport),
            LightKind::Spot => {
                let fov = (2.0 * self.spot_outer).clamp(
                    utils::deg_to_rad(SPOT_FOV_MIN),
                    utils::deg_to_rad(SPOT_FOV_MAX),
                );
                let mut camera = Camera::new(name, viewport);
                camera.projection = Mat4::perspective(fov, 1.0, SHADOW_NEAR, range);
                camera
            }
            LightKind::Point | LightKind::Hemisphere | LightKind::Area => {
                let mut camera = Camera::new(name, viewport);
                camera.projection =
                    Mat4::perspective(utils::deg_to_rad(WIDE_SHADOW_FOV), 1.0, SHADOW_NEAR, range);
                camera
            }
        };

        let (eye, direction) = self.shadow_eye();
        camera.look_at(eye, eye + direction, Vec3::y());
        camera.purpose = CameraPurpose::ShadowGeneration;
        camera.clear_flags = ClearFlags::COLOR | ClearFlags::DEPTH;
        camera.clear_color = Vec4::new(1.0, 1.0, 1.0, 1.0);
        camera.set_scene(self.scene);
        camera
    }

    /// Shadow camera eye and view direction; suns back off by `range` so the
    /// orthographic volume is centered on the light position
    fn shadow_eye(&self) -> (Vec3, Vec3) {
        let direction = self.direction();
        let position = self.position();
        match self.kind {
            LightKind::Sun => (position - direction * self.range, direction),
            _ => (position, direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use crate::render::device::RecordingDevice;
    use crate::render::RenderError;
    use approx::assert_relative_eq;

    fn ready(light: &Light) -> &ShadowResources {
        light.shadow_state().resources().expect("shadow should be ready")
    }

    #[test]
    fn test_enabling_shadow_builds_lazily() {
        let mut device = RecordingDevice::new();
        let config = RenderConfig::default();
        let mut light = Light::point(Vec3::new(1.0, 0.5, 0.2), 2.0, 8.0).with_shadow_resolution(256);

        light.set_shadow(true, &mut device);
        assert!(light.shadow_state().is_pending());
        assert_eq!(device.live_texture_count(), 0);

        light.ensure_shadow(&mut device, &config).unwrap();
        let resources = ready(&light);
        assert_eq!(resources.resolution, 256);
        assert!(resources.blur.is_none());
        assert!(resources.camera.is_shadow_camera());
        assert_eq!(resources.camera.target, RenderTarget::Framebuffer(resources.framebuffer));
        assert_eq!(device.live_texture_count(), 2);
        assert_eq!(device.live_framebuffer_count(), 1);
        assert_eq!(device.texture_desc(resources.texture).map(|d| d.width), Some(256));
    }

    #[test]
    fn test_disabling_shadow_releases_everything() {
        let mut device = RecordingDevice::new();
        let mut light = Light::spot(Vec3::new(1.0, 1.0, 1.0), 1.0, 12.0, 15.0, 25.0).with_soft_shadow(true);

        light.set_shadow(true, &mut device);
        light.ensure_shadow(&mut device, &RenderConfig::default()).unwrap();
        assert!(ready(&light).blur.is_some());
        assert_eq!(device.live_texture_count(), 3);

        light.set_shadow(false, &mut device);
        assert!(matches!(light.shadow_state(), ShadowState::NoShadow));
        assert_eq!(device.live_texture_count(), 0);
        assert_eq!(device.live_framebuffer_count(), 0);
    }

    #[test]
    fn test_toggling_shadow_recreates_fresh_resources() {
        let mut device = RecordingDevice::new();
        let config = RenderConfig::default();
        let mut light = Light::point(Vec3::new(1.0, 1.0, 1.0), 1.0, 5.0).with_shadow_resolution(512);

        light.set_shadow(true, &mut device);
        light.ensure_shadow(&mut device, &config).unwrap();
        let first = ready(&light).texture;

        light.set_shadow(false, &mut device);
        assert!(!device.is_texture_alive(first));

        light.set_shadow(true, &mut device);
        light.ensure_shadow(&mut device, &config).unwrap();
        let second = ready(&light);

        assert_ne!(second.texture, first);
        assert_eq!(second.resolution, 512);
        assert_eq!(device.texture_desc(second.texture).map(|d| d.width), Some(512));
    }

    #[test]
    fn test_resolution_change_marks_pending() {
        let mut device = RecordingDevice::new();
        let config = RenderConfig::default();
        let mut light = Light::sun(Vec3::new(1.0, 1.0, 0.9), 3.0);

        light.set_shadow(true, &mut device);
        light.ensure_shadow(&mut device, &config).unwrap();
        assert_eq!(ready(&light).resolution, DEFAULT_SHADOW_RESOLUTION);

        light.set_shadow_size(2048, &mut device);
        assert!(light.shadow_state().is_pending());
        assert_eq!(device.live_texture_count(), 0);

        light.ensure_shadow(&mut device, &config).unwrap();
        assert_eq!(ready(&light).resolution, 2048);

        light.set_shadow_size(0, &mut device);
        assert!(matches!(light.shadow_state(), ShadowState::NoShadow));
        assert!(light.ensure_shadow(&mut device, &config).unwrap().is_none());
    }

    #[test]
    fn test_failed_build_leaks_nothing_and_retries() {
        let mut device = RecordingDevice::new();
        let config = RenderConfig::default();
        let mut light = Light::point(Vec3::new(1.0, 1.0, 1.0), 1.0, 5.0).with_soft_shadow(true);
        device.fail_textures_labelled("shadow_blur");

        light.set_shadow(true, &mut device);
        let result = light.ensure_shadow(&mut device, &config);

        assert!(matches!(result, Err(RenderError::ResourceCreationFailed(_))));
        assert!(light.shadow_state().is_pending());
        assert_eq!(device.live_texture_count(), 0);
        assert_eq!(device.live_framebuffer_count(), 0);

        device.clear_failures();
        assert!(light.ensure_shadow(&mut device, &config).unwrap().is_some());
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut device = RecordingDevice::new();
        let mut light = Light::point(Vec3::new(1.0, 1.0, 1.0), 1.0, 5.0);

        light.release_shadow(&mut device);
        light.set_shadow(true, &mut device);
        light.ensure_shadow(&mut device, &RenderConfig::default()).unwrap();

        light.release_shadow(&mut device);
        light.release_shadow(&mut device);
        assert!(light.shadow_state().is_pending());
        assert_eq!(device.live_texture_count(), 0);
    }

    #[test]
    fn test_bounds_follow_kind() {
        let mut sun = Light::sun(Vec3::new(1.0, 1.0, 1.0), 1.0);
        sun.on_move(&Transform::from_position(Vec3::new(0.0, 100.0, 0.0)).to_matrix());
        assert!(sun.bounds().infinite);

        let mut point = Light::point(Vec3::new(1.0, 1.0, 1.0), 1.0, 4.0);
        point.on_move(&Transform::from_position(Vec3::new(1.0, 2.0, 3.0)).to_matrix());
        let bounds = point.bounds();
        assert!(!bounds.infinite);
        assert_relative_eq!(bounds.sphere.center, Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(bounds.sphere.radius, 4.0);
    }

    #[test]
    fn test_spot_shadow_camera_covers_outer_cone() {
        let mut device = RecordingDevice::new();
        let mut light = Light::spot(Vec3::new(1.0, 1.0, 1.0), 1.0, 20.0, 20.0, 30.0);

        light.set_shadow(true, &mut device);
        light.ensure_shadow(&mut device, &RenderConfig::default()).unwrap();

        let camera = &ready(&light).camera;
        let expected = 1.0 / utils::deg_to_rad(30.0).tan();
        assert_relative_eq!(camera.projection[(1, 1)], expected, epsilon = 1e-5);
    }

    #[test]
    fn test_move_syncs_shadow_camera() {
        let mut device = RecordingDevice::new();
        let mut light = Light::point(Vec3::new(1.0, 1.0, 1.0), 1.0, 6.0);
        light.set_shadow(true, &mut device);
        light.ensure_shadow(&mut device, &RenderConfig::default()).unwrap();

        let world = Transform::looking_along(Vec3::new(4.0, 3.0, 0.0), -Vec3::y()).to_matrix();
        light.on_move(&world);

        assert_relative_eq!(ready(&light).camera.position, Vec3::new(4.0, 3.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(light.direction(), -Vec3::y(), epsilon = 1e-5);
    }

    #[test]
    fn test_kind_flags() {
        let kinds = LightKind::Sun.flag() | LightKind::Spot.flag();
        assert!(kinds.contains(LightKinds::SUN));
        assert!(!kinds.contains(LightKinds::POINT));
        assert_eq!(LightKind::Area.index(), 4);
        assert_eq!(LightKind::Hemisphere.pass_name(), "light_hemisphere");
    }
}
