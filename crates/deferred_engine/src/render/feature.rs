//! Deferred render feature
//!
//! The top-level owner of everything the renderer needs between frames: the
//! graphics device, the scene registry, the object arena, the pipeline and the
//! configuration. Applications talk to this type; the lower layers are reachable
//! through its accessors for tools and tests.

use crate::config::RenderConfig;
use crate::foundation::math::Mat4;
use crate::render::device::GraphicsDevice;
use crate::render::material::PipelineMaterials;
use crate::render::pipeline::{DeferredPipeline, FrameReport};
use crate::render::{RenderError, RenderResult};
use crate::scene::light::DEFAULT_SHADOW_RESOLUTION;
use crate::scene::{
    Camera, CameraId, ObjectId, RenderObject, RenderObjects, RenderScene, SceneError, SceneId,
    SceneRegistry, SceneResult,
};

/// Renderer feature driving the deferred pipeline once per frame
pub struct DeferredRenderFeature<D: GraphicsDevice> {
    device: D,
    scenes: SceneRegistry,
    objects: RenderObjects,
    pipeline: DeferredPipeline,
    config: RenderConfig,
}

impl<D: GraphicsDevice> DeferredRenderFeature<D> {
    /// Inactive feature; call [`DeferredRenderFeature::on_activate`] before rendering
    ///
    /// Fails with [`RenderError::InitializationFailed`] if `config` does not validate.
    pub fn new(device: D, config: RenderConfig) -> RenderResult<Self> {
        Self::with_materials(device, config, PipelineMaterials::builtin())
    }

    /// Inactive feature using custom fullscreen pass materials
    pub fn with_materials(
        device: D,
        config: RenderConfig,
        materials: PipelineMaterials,
    ) -> RenderResult<Self> {
        // Objects can be spawned before activation, so the shadow defaults must already hold
        config
            .validate()
            .map_err(|e| RenderError::InitializationFailed(e.to_string()))?;
        Ok(Self {
            device,
            scenes: SceneRegistry::new(),
            objects: RenderObjects::new(),
            pipeline: DeferredPipeline::with_materials(materials),
            config,
        })
    }

    /// Create the pipeline's render targets
    ///
    /// A failure here is fatal: the feature stays inactive and must not be rendered.
    pub fn on_activate(&mut self, width: u32, height: u32) -> RenderResult<()> {
        match self.pipeline.on_activate(&mut self.device, width, height, &self.config) {
            Ok(()) => {
                log::info!(
                    "Deferred render feature activated ({} scenes, {} objects)",
                    self.scenes.len(),
                    self.objects.len()
                );
                Ok(())
            }
            Err(e) => {
                log::error!("Deferred render feature failed to activate: {}", e);
                Err(e)
            }
        }
    }

    /// Release the render targets and every light's shadow resources
    ///
    /// Shadow-enabled lights go back to pending and are rebuilt after the next
    /// activation.
    pub fn on_deactivate(&mut self) {
        self.pipeline.on_deactivate(&mut self.device);
        let device = &mut self.device;
        for (_, object) in self.objects.iter_mut() {
            object.modify_light(|light| light.release_shadow(device));
        }
        log::info!("Deferred render feature deactivated");
    }

    /// Whether the pipeline has render targets
    pub fn is_active(&self) -> bool {
        self.pipeline.is_active()
    }

    /// Recreate the render targets at a new size
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.pipeline.resize(&mut self.device, width, height, &self.config)
    }

    /// Render one frame
    ///
    /// Device frame errors are returned; per-camera failures are in the report.
    pub fn render_frame(&mut self) -> RenderResult<FrameReport> {
        if !self.pipeline.is_active() {
            return Err(RenderError::RenderingFailed(
                "render feature is not active".to_string(),
            ));
        }

        self.device.begin_frame()?;
        let report =
            self.pipeline
                .on_render_pipeline(&mut self.device, &self.scenes, &mut self.objects, &self.config);
        self.device.end_frame()?;

        if !report.all_completed() {
            log::debug!(
                "Frame {} finished with {} of {} cameras failed",
                report.frame,
                report.failed_count(),
                report.cameras.len()
            );
        }
        Ok(report)
    }

    /// Create an empty scene
    pub fn create_scene(&mut self, name: impl Into<String>) -> SceneId {
        self.scenes.create_scene(name)
    }

    /// Destroy a scene, releasing the shadow resources of its lights
    ///
    /// Its objects stay alive, unregistered.
    pub fn destroy_scene(&mut self, id: SceneId) -> SceneResult<RenderScene> {
        let members = self
            .scenes
            .get(id)
            .ok_or(SceneError::UnknownScene(id))?
            .objects()
            .to_vec();
        for member in members {
            self.release_light_shadow(member);
        }
        self.scenes.destroy_scene(id, &mut self.objects)
    }

    /// Add a camera to a scene
    pub fn add_camera(&mut self, scene: SceneId, camera: Camera) -> SceneResult<CameraId> {
        let scene = self.scenes.get_mut(scene).ok_or(SceneError::UnknownScene(scene))?;
        Ok(scene.add_camera(camera))
    }

    /// Take ownership of an object, unregistered
    ///
    /// Lights still at the built-in shadow resolution take the configured default.
    pub fn spawn_object(&mut self, mut object: RenderObject) -> ObjectId {
        let resolution = self.config.shadow.default_resolution;
        let device = &mut self.device;
        object.modify_light(|light| {
            if light.shadow_resolution() == DEFAULT_SHADOW_RESOLUTION {
                light.set_shadow_size(resolution, device);
            }
        });
        self.objects.insert(object)
    }

    /// Register an object in a scene
    pub fn attach(&mut self, scene: SceneId, object: ObjectId) -> SceneResult<()> {
        self.scenes
            .get_mut(scene)
            .ok_or(SceneError::UnknownScene(scene))?
            .add_render_object(&mut self.objects, object)
    }

    /// Deregister an object from its scene, releasing its shadow resources
    pub fn detach(&mut self, object: ObjectId) -> SceneResult<()> {
        let scene = self
            .objects
            .get(object)
            .ok_or(SceneError::UnknownObject(object))?
            .scene();
        let Some(scene) = scene else {
            return Ok(());
        };

        self.scenes
            .get_mut(scene)
            .ok_or(SceneError::UnknownScene(scene))?
            .remove_render_object(&mut self.objects, object)?;
        self.release_light_shadow(object);
        Ok(())
    }

    /// Detach and destroy an object
    pub fn despawn(&mut self, object: ObjectId) -> SceneResult<RenderObject> {
        self.detach(object)?;
        self.release_light_shadow(object);
        self.objects.remove(object)
    }

    /// Enable or disable a light's shadow
    ///
    /// Returns whether the object is a light; other objects are left untouched.
    pub fn set_shadow(&mut self, object: ObjectId, enabled: bool) -> SceneResult<bool> {
        let device = &mut self.device;
        let object = self
            .objects
            .get_mut(object)
            .ok_or(SceneError::UnknownObject(object))?;
        Ok(object
            .modify_light(|light| light.set_shadow(enabled, device))
            .is_some())
    }

    /// Move an object
    pub fn set_transform(&mut self, object: ObjectId, transform: Mat4) -> SceneResult<()> {
        self.objects
            .get_mut(object)
            .ok_or(SceneError::UnknownObject(object))?
            .set_transform(transform);
        Ok(())
    }

    fn release_light_shadow(&mut self, object: ObjectId) {
        let device = &mut self.device;
        if let Some(object) = self.objects.get_mut(object) {
            object.modify_light(|light| light.release_shadow(device));
        }
    }

    /// Graphics device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutable graphics device
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Every live scene
    pub fn scenes(&self) -> &SceneRegistry {
        &self.scenes
    }

    /// Scene by id
    pub fn scene(&self, id: SceneId) -> Option<&RenderScene> {
        self.scenes.get(id)
    }

    /// Mutable scene by id
    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut RenderScene> {
        self.scenes.get_mut(id)
    }

    /// Every live object
    pub fn objects(&self) -> &RenderObjects {
        &self.objects
    }

    /// Object by id
    pub fn object(&self, id: ObjectId) -> Option<&RenderObject> {
        self.objects.get(id)
    }

    /// Mutable object by id
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut RenderObject> {
        self.objects.get_mut(id)
    }

    /// The pipeline
    pub fn pipeline(&self) -> &DeferredPipeline {
        &self.pipeline
    }

    /// Active configuration
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
}
