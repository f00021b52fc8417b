//! # Deferred Lighting Pipeline
//!
//! Runs every main camera of every scene through a fixed sequence of phases:
//!
//! ```text
//! Idle -> ShadowPass -> OpaqueDepthPrepass -> OpaqueGBuffer -> LightAccumulation
//!      -> OpaqueShading -> TransparentDepthPrepass -> TransparentForward
//!      -> TransparentShading -> Idle
//! ```
//!
//! Each phase binds its target explicitly, clears it and issues the draws of one
//! or two classifier buckets (or a fullscreen pass). The transition table lives in
//! [`PipelinePhase::next`].
//!
//! ## Failure handling
//!
//! Setup (`on_activate`, `resize`) reports errors to the caller. During a frame a
//! failed target bind aborts the remaining phases of that camera only; the next
//! camera starts from `Idle` again. A shadow map that cannot be built or rendered
//! leaves its light unshadowed for the frame.

mod phase;
mod stats;
mod targets;
mod uniforms;

#[cfg(test)]
mod tests;

pub use phase::{FrameFacts, PipelinePhase};
pub use stats::FrameStats;
pub use targets::PipelineTargets;
pub use uniforms::{CameraUniforms, FilterUniforms, LightUniforms, ObjectUniforms};

use std::collections::HashSet;

use crate::config::RenderConfig;
use crate::foundation::math::Vec4;
use crate::render::classifier::RenderDataClassifier;
use crate::render::device::{
    BlendMode, ClearFlags, GraphicsDevice, RenderTarget, TextureSlot, UniformSlot,
};
use crate::render::material::{PassKey, PipelineMaterials, RenderQueue};
use crate::render::{RenderError, RenderResult};
use crate::scene::{
    Camera, CameraId, CameraPurpose, Light, ObjectId, RenderObject, RenderObjects, SceneId,
    SceneRegistry, ShadowResources, ShadowState,
};

/// Buckets holding drawn geometry, in the order the phases draw them
const GEOMETRY_KEYS: [(RenderQueue, PassKey); 8] = [
    (RenderQueue::Opaque, PassKey::Depth),
    (RenderQueue::Opaque, PassKey::Opaque),
    (RenderQueue::Opaque, PassKey::Specific),
    (RenderQueue::Opaque, PassKey::Transparent),
    (RenderQueue::Transparent, PassKey::Depth),
    (RenderQueue::Transparent, PassKey::Transparent),
    (RenderQueue::Transparent, PassKey::Specific),
    (RenderQueue::Transparent, PassKey::Opaque),
];

/// How one camera's pass through the pipeline ended
#[derive(Debug, Clone, PartialEq)]
pub enum CameraOutcome {
    /// Every phase ran
    Completed(FrameStats),
    /// `phase` failed and the remaining phases were skipped
    Failed {
        /// Phase that failed
        phase: PipelinePhase,
        /// Why it failed
        error: RenderError,
    },
}

impl CameraOutcome {
    /// Statistics of a completed camera
    pub fn stats(&self) -> Option<&FrameStats> {
        match self {
            CameraOutcome::Completed(stats) => Some(stats),
            CameraOutcome::Failed { .. } => None,
        }
    }

    /// Whether every phase ran
    pub fn is_completed(&self) -> bool {
        matches!(self, CameraOutcome::Completed(_))
    }

    /// Phase that failed, if any
    pub fn failed_phase(&self) -> Option<PipelinePhase> {
        match self {
            CameraOutcome::Completed(_) => None,
            CameraOutcome::Failed { phase, .. } => Some(*phase),
        }
    }
}

/// Outcome of one camera within a frame
#[derive(Debug, Clone, PartialEq)]
pub struct CameraReport {
    /// Scene the camera belongs to
    pub scene: SceneId,
    /// Camera id within the scene
    pub camera: CameraId,
    /// Camera name
    pub name: String,
    /// What happened
    pub outcome: CameraOutcome,
}

/// Per-camera outcomes of one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Frame counter, starting at 1
    pub frame: u64,
    /// One entry per main camera, in scene and camera order
    pub cameras: Vec<CameraReport>,
}

impl FrameReport {
    /// Cameras that ran every phase
    pub fn completed_count(&self) -> usize {
        self.cameras.iter().filter(|c| c.outcome.is_completed()).count()
    }

    /// Cameras aborted by a failure
    pub fn failed_count(&self) -> usize {
        self.cameras.len() - self.completed_count()
    }

    /// Whether no camera failed
    pub fn all_completed(&self) -> bool {
        self.failed_count() == 0
    }

    /// First camera with this name
    pub fn camera(&self, name: &str) -> Option<&CameraReport> {
        self.cameras.iter().find(|c| c.name == name)
    }

    /// Draws of every completed camera
    pub fn total_draws(&self) -> usize {
        self.cameras
            .iter()
            .filter_map(|c| c.outcome.stats())
            .map(FrameStats::total_draws)
            .sum()
    }
}

/// Everything a phase reads or writes while rendering one camera
struct Frame<'a, D: GraphicsDevice + ?Sized> {
    device: &'a mut D,
    scenes: &'a SceneRegistry,
    objects: &'a mut RenderObjects,
    config: &'a RenderConfig,
    camera: &'a Camera,
    camera_uniforms: CameraUniforms,
    targets: PipelineTargets,
    facts: FrameFacts,
    stats: FrameStats,
    // Lights whose shadow map failed to render this frame
    unshadowed: HashSet<ObjectId>,
}

/// The deferred lighting pipeline
///
/// Owns the intermediate render targets and the classifiers; scenes, objects and
/// the device are passed in per call.
#[derive(Debug)]
pub struct DeferredPipeline {
    materials: PipelineMaterials,
    classifier: RenderDataClassifier,
    shadow_classifier: RenderDataClassifier,
    targets: Option<PipelineTargets>,
    frame_index: u64,
}

impl Default for DeferredPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl DeferredPipeline {
    /// Inactive pipeline using the built-in fullscreen materials
    pub fn new() -> Self {
        Self::with_materials(PipelineMaterials::builtin())
    }

    /// Inactive pipeline using `materials` for its fullscreen passes
    pub fn with_materials(materials: PipelineMaterials) -> Self {
        Self {
            materials,
            classifier: RenderDataClassifier::new(),
            shadow_classifier: RenderDataClassifier::new(),
            targets: None,
            frame_index: 0,
        }
    }

    /// Whether render targets exist
    pub fn is_active(&self) -> bool {
        self.targets.is_some()
    }

    /// Current render targets
    pub fn targets(&self) -> Option<&PipelineTargets> {
        self.targets.as_ref()
    }

    /// Buckets of the last camera rendered
    pub fn classifier(&self) -> &RenderDataClassifier {
        &self.classifier
    }

    /// Fullscreen pass materials
    pub fn materials(&self) -> &PipelineMaterials {
        &self.materials
    }

    /// Frames rendered so far
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Validate the configuration and materials and create the render targets
    ///
    /// Any failure leaves the pipeline inactive.
    pub fn on_activate<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        width: u32,
        height: u32,
        config: &RenderConfig,
    ) -> RenderResult<()> {
        if let Some(old) = self.targets.take() {
            old.release(device);
        }
        config
            .validate()
            .map_err(|e| RenderError::InitializationFailed(e.to_string()))?;
        self.materials.validate()?;

        self.targets = Some(PipelineTargets::create(device, width, height, &config.gbuffer)?);
        log::info!("Deferred pipeline activated at {}x{}", width, height);
        Ok(())
    }

    /// Recreate the render targets at a new size
    ///
    /// The old targets stay in use if the new ones cannot be created.
    pub fn resize<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        width: u32,
        height: u32,
        config: &RenderConfig,
    ) -> RenderResult<()> {
        let Some(current) = &self.targets else {
            return Err(RenderError::RenderingFailed(
                "cannot resize an inactive pipeline".to_string(),
            ));
        };
        if current.width == width && current.height == height {
            return Ok(());
        }

        let resized = PipelineTargets::create(device, width, height, &config.gbuffer)?;
        if let Some(old) = self.targets.replace(resized) {
            old.release(device);
        }
        log::debug!("Deferred pipeline resized to {}x{}", width, height);
        Ok(())
    }

    /// Release the render targets
    pub fn on_deactivate<D: GraphicsDevice + ?Sized>(&mut self, device: &mut D) {
        if let Some(targets) = self.targets.take() {
            targets.release(device);
            log::info!("Deferred pipeline deactivated");
        }
        self.classifier.clear();
        self.shadow_classifier.clear();
    }

    /// Render every main camera of every scene
    ///
    /// Never fails as a whole; each camera's outcome is in the report.
    pub fn on_render_pipeline<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        scenes: &SceneRegistry,
        objects: &mut RenderObjects,
        config: &RenderConfig,
    ) -> FrameReport {
        self.frame_index += 1;
        let mut report = FrameReport {
            frame: self.frame_index,
            cameras: Vec::new(),
        };

        for (scene_id, scene) in scenes.iter() {
            for (camera_id, camera) in scene.cameras() {
                if camera.purpose != CameraPurpose::Main {
                    continue;
                }
                let outcome = self.render_camera(device, camera, scenes, objects, config);
                report.cameras.push(CameraReport {
                    scene: scene_id,
                    camera: camera_id,
                    name: camera.name.clone(),
                    outcome,
                });
            }
        }

        log::trace!(
            "Frame {}: {} cameras, {} failed, {} draws",
            report.frame,
            report.cameras.len(),
            report.failed_count(),
            report.total_draws()
        );
        report
    }

    /// Run one camera through every phase
    pub fn render_camera<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        camera: &Camera,
        scenes: &SceneRegistry,
        objects: &mut RenderObjects,
        config: &RenderConfig,
    ) -> CameraOutcome {
        let Some(targets) = self.targets.clone() else {
            return CameraOutcome::Failed {
                phase: PipelinePhase::Idle,
                error: RenderError::RenderingFailed("pipeline is not active".to_string()),
            };
        };

        self.classifier
            .set_sort_transparent_back_to_front(config.sort_transparent_back_to_front);
        self.classifier.assign_visible(camera, scenes, objects);
        let facts = frame_facts(self.classifier.visible_lights(), objects);

        let mut frame = Frame {
            device,
            scenes,
            objects,
            config,
            camera,
            camera_uniforms: CameraUniforms::new(camera),
            targets,
            facts,
            stats: FrameStats::default(),
            unshadowed: HashSet::new(),
        };

        let mut phase = PipelinePhase::Idle.next(&facts);
        let result = loop {
            if phase == PipelinePhase::Idle {
                break Ok(());
            }
            frame.stats.phases.push(phase);
            frame.device.push_debug_group(phase.name());
            let ran = self.run_phase(phase, &mut frame);
            frame.device.pop_debug_group();
            if let Err(error) = ran {
                break Err((phase, error));
            }
            phase = phase.next(&facts);
        };

        notify_render_end(&self.classifier, frame.objects, camera);

        match result {
            Ok(()) => CameraOutcome::Completed(frame.stats),
            Err((phase, error)) => {
                log::warn!(
                    "Camera '{}' aborted in phase {}: {}",
                    camera.name,
                    phase,
                    error
                );
                CameraOutcome::Failed { phase, error }
            }
        }
    }

    fn run_phase<D: GraphicsDevice + ?Sized>(
        &mut self,
        phase: PipelinePhase,
        frame: &mut Frame<'_, D>,
    ) -> RenderResult<()> {
        if phase != PipelinePhase::ShadowPass {
            frame
                .device
                .upload_uniforms(UniformSlot::Camera, bytemuck::bytes_of(&frame.camera_uniforms));
        }

        match phase {
            PipelinePhase::Idle => Ok(()),
            PipelinePhase::ShadowPass => self.shadow_pass(frame),
            PipelinePhase::OpaqueDepthPrepass => self.opaque_depth_prepass(frame),
            PipelinePhase::OpaqueGBuffer => self.opaque_gbuffer(frame),
            PipelinePhase::LightAccumulation => self.light_accumulation(frame),
            PipelinePhase::OpaqueShading => self.opaque_shading(frame),
            PipelinePhase::TransparentDepthPrepass => self.transparent_depth_prepass(frame),
            PipelinePhase::TransparentForward => self.transparent_forward(frame),
            PipelinePhase::TransparentShading => self.transparent_shading(frame),
        }
    }

    /// Render the shadow map of every visible shadow-casting light
    fn shadow_pass<D: GraphicsDevice + ?Sized>(&mut self, frame: &mut Frame<'_, D>) -> RenderResult<()> {
        let lights = self.classifier.visible_lights().to_vec();
        for id in lights {
            let Some(object) = frame.objects.get_mut(id) else {
                continue;
            };
            let prepared = object
                .modify_light(|light| prepare_shadow(light, &mut *frame.device, frame.config))
                .flatten();
            let resources = match prepared {
                None => continue,
                Some(Ok(resources)) => resources,
                Some(Err(e)) => {
                    log::warn!(
                        "Shadow map of light '{}' could not be built, rendering it unshadowed: {}",
                        object.name,
                        e
                    );
                    frame.stats.shadow_failures += 1;
                    continue;
                }
            };

            let shadow_camera = &resources.camera;
            self.shadow_classifier.assign_visible(shadow_camera, frame.scenes, frame.objects);
            let rendered = self.render_shadow_map(frame, &resources);
            notify_render_end(&self.shadow_classifier, frame.objects, shadow_camera);
            if let Err(e) = rendered {
                let name = frame.objects.get(id).map_or("?", |o| o.name.as_str());
                log::warn!("Shadow map of light '{}' failed to render, rendering it unshadowed: {}", name, e);
                frame.stats.shadow_failures += 1;
                frame.unshadowed.insert(id);
                continue;
            }
            frame.stats.shadow_maps += 1;
        }
        Ok(())
    }

    fn render_shadow_map<D: GraphicsDevice + ?Sized>(
        &self,
        frame: &mut Frame<'_, D>,
        resources: &ShadowResources,
    ) -> RenderResult<()> {
        let camera = &resources.camera;
        frame.device.set_render_target(camera.target)?;
        frame
            .device
            .clear(camera.clear_flags, camera.clear_color, camera.clear_depth, camera.clear_stencil);
        frame.device.set_blend(BlendMode::Replace);
        frame
            .device
            .upload_uniforms(UniformSlot::Camera, bytemuck::bytes_of(&CameraUniforms::new(camera)));
        draw_bucket(
            frame,
            self.shadow_classifier.render_data(RenderQueue::Opaque, PassKey::Depth),
            RenderQueue::Opaque,
            PassKey::Depth,
            PipelinePhase::ShadowPass,
        );

        let Some(blur) = resources.blur else {
            return Ok(());
        };
        let radius = frame.config.shadow.blur_radius;
        let steps = [
            (
                "blur_horizontal",
                blur.framebuffer,
                resources.texture,
                FilterUniforms::horizontal(resources.resolution, radius),
            ),
            (
                "blur_vertical",
                resources.framebuffer,
                blur.texture,
                FilterUniforms::vertical(resources.resolution, radius),
            ),
        ];
        for (name, target, source, filter) in steps {
            let pass = PipelineMaterials::pass(&self.materials.blur, name)?;
            frame.device.set_render_target(RenderTarget::Framebuffer(target))?;
            frame.device.begin_pass(&pass)?;
            frame.device.bind_texture(TextureSlot::FilterSource, source);
            frame.device.upload_uniforms(UniformSlot::Filter, bytemuck::bytes_of(&filter));
            frame.device.draw_fullscreen();
            frame.device.end_pass();
            frame.stats.count_draw(PipelinePhase::ShadowPass);
        }
        Ok(())
    }

    fn opaque_depth_prepass<D: GraphicsDevice + ?Sized>(&self, frame: &mut Frame<'_, D>) -> RenderResult<()> {
        let target = frame.targets.depth_prepass;
        frame.device.set_render_target(RenderTarget::Framebuffer(target))?;
        frame.device.clear(
            ClearFlags::DEPTH | ClearFlags::STENCIL,
            Vec4::zeros(),
            frame.camera.clear_depth,
            frame.camera.clear_stencil,
        );
        frame.device.set_blend(BlendMode::Replace);
        frame.device.set_color_write(false);
        self.draw_geometry(frame, RenderQueue::Opaque, &[PassKey::Depth], PipelinePhase::OpaqueDepthPrepass);
        frame.device.set_color_write(true);
        Ok(())
    }

    fn opaque_gbuffer<D: GraphicsDevice + ?Sized>(&self, frame: &mut Frame<'_, D>) -> RenderResult<()> {
        let target = frame.targets.gbuffer;
        frame.device.set_render_target(RenderTarget::Framebuffer(target))?;
        // Depth comes from the prepass
        frame.device.clear(ClearFlags::COLOR, Vec4::zeros(), 1.0, 0);
        self.draw_geometry(
            frame,
            RenderQueue::Opaque,
            &[PassKey::Opaque, PassKey::Specific],
            PipelinePhase::OpaqueGBuffer,
        );
        Ok(())
    }

    fn light_accumulation<D: GraphicsDevice + ?Sized>(&self, frame: &mut Frame<'_, D>) -> RenderResult<()> {
        let targets = frame.targets.clone();
        frame
            .device
            .set_render_target(RenderTarget::Framebuffer(targets.light_accumulation))?;
        frame.device.clear(ClearFlags::COLOR, Vec4::zeros(), 1.0, 0);
        frame.device.bind_texture(TextureSlot::Diffuse, targets.diffuse);
        frame.device.bind_texture(TextureSlot::Normal, targets.normal);
        frame.device.bind_texture(TextureSlot::LinearDepth, targets.linear_depth);
        frame.device.set_blend(BlendMode::Additive);

        let lights = self.classifier.visible_lights();
        let facts = frame.facts;
        for kind in facts.light_branches() {
            let pass = PipelineMaterials::pass(&self.materials.lighting, kind.pass_name())?;
            frame.device.begin_pass(&pass)?;
            for id in lights {
                let Some(light) = frame.objects.get(*id).and_then(RenderObject::as_light) else {
                    continue;
                };
                if light.kind != kind {
                    continue;
                }
                let shadow = if frame.unshadowed.contains(id) {
                    None
                } else {
                    light.shadow_state().resources()
                };
                if let Some(resources) = shadow {
                    frame.device.bind_texture(TextureSlot::ShadowMap, resources.texture);
                }
                let uniforms = LightUniforms::new(light, &frame.config.shadow, shadow);
                frame.device.upload_uniforms(UniformSlot::Light, bytemuck::bytes_of(&uniforms));
                frame.device.draw_fullscreen();
                frame.stats.count_draw(PipelinePhase::LightAccumulation);
                frame.stats.count_light(kind);
            }
            frame.device.end_pass();
        }

        frame.device.set_blend(BlendMode::Replace);
        Ok(())
    }

    fn opaque_shading<D: GraphicsDevice + ?Sized>(&self, frame: &mut Frame<'_, D>) -> RenderResult<()> {
        let targets = frame.targets.clone();
        frame.device.set_render_target(RenderTarget::Framebuffer(targets.opaque))?;
        frame
            .device
            .clear(ClearFlags::COLOR, Vec4::from(frame.config.clear_color), 1.0, 0);
        frame.device.bind_texture(TextureSlot::Diffuse, targets.diffuse);
        frame.device.bind_texture(TextureSlot::LightAccumulation, targets.light);
        self.fullscreen(frame, "shade_opaque", PipelinePhase::OpaqueShading)
    }

    fn transparent_depth_prepass<D: GraphicsDevice + ?Sized>(
        &self,
        frame: &mut Frame<'_, D>,
    ) -> RenderResult<()> {
        let target = frame.targets.transparent;
        frame.device.set_render_target(RenderTarget::Framebuffer(target))?;
        // Opaque depth is kept so transparent surfaces are hidden behind it
        frame.device.clear(ClearFlags::COLOR, Vec4::zeros(), 1.0, 0);
        frame.device.set_color_write(false);
        self.draw_geometry(
            frame,
            RenderQueue::Transparent,
            &[PassKey::Depth],
            PipelinePhase::TransparentDepthPrepass,
        );
        frame.device.set_color_write(true);
        Ok(())
    }

    fn transparent_forward<D: GraphicsDevice + ?Sized>(&self, frame: &mut Frame<'_, D>) -> RenderResult<()> {
        let targets = frame.targets.clone();
        frame.device.set_render_target(RenderTarget::Framebuffer(targets.transparent))?;
        frame.device.set_blend(BlendMode::AlphaOver);
        frame.device.bind_texture(TextureSlot::LightAccumulation, targets.light);
        self.draw_geometry(
            frame,
            RenderQueue::Transparent,
            &[PassKey::Transparent, PassKey::Specific],
            PipelinePhase::TransparentForward,
        );
        frame.device.set_blend(BlendMode::Replace);
        Ok(())
    }

    fn transparent_shading<D: GraphicsDevice + ?Sized>(&self, frame: &mut Frame<'_, D>) -> RenderResult<()> {
        let targets = frame.targets.clone();
        let camera = frame.camera;
        frame.device.set_render_target(camera.target)?;
        frame
            .device
            .clear(camera.clear_flags, camera.clear_color, camera.clear_depth, camera.clear_stencil);
        frame.device.bind_texture(TextureSlot::OpaqueColor, targets.opaque_color);
        frame.device.bind_texture(TextureSlot::TransparentColor, targets.transparent_color);
        self.fullscreen(frame, "shade_transparent", PipelinePhase::TransparentShading)
    }

    fn draw_geometry<D: GraphicsDevice + ?Sized>(
        &self,
        frame: &mut Frame<'_, D>,
        queue: RenderQueue,
        keys: &[PassKey],
        phase: PipelinePhase,
    ) {
        for key in keys {
            draw_bucket(frame, self.classifier.render_data(queue, *key), queue, *key, phase);
        }
    }

    fn fullscreen<D: GraphicsDevice + ?Sized>(
        &self,
        frame: &mut Frame<'_, D>,
        pass_name: &str,
        phase: PipelinePhase,
    ) -> RenderResult<()> {
        let pass = PipelineMaterials::pass(&self.materials.shading, pass_name)?;
        frame.device.begin_pass(&pass)?;
        frame.device.draw_fullscreen();
        frame.device.end_pass();
        frame.stats.count_draw(phase);
        Ok(())
    }
}

/// Kinds of the visible lights and how many of them want a shadow map
fn frame_facts(lights: &[ObjectId], objects: &RenderObjects) -> FrameFacts {
    lights
        .iter()
        .filter_map(|id| objects.get(*id).and_then(RenderObject::as_light))
        .fold(FrameFacts::default(), |mut facts, light| {
            facts.light_kinds |= light.kind.flag();
            if !matches!(light.shadow_state(), ShadowState::NoShadow) {
                facts.shadowed_lights += 1;
            }
            facts
        })
}

/// Build the light's shadow map if needed; `None` when it has none
fn prepare_shadow<D: GraphicsDevice + ?Sized>(
    light: &mut Light,
    device: &mut D,
    config: &RenderConfig,
) -> Option<RenderResult<ShadowResources>> {
    if !light.shadow_enabled() {
        return None;
    }
    light.ensure_shadow(device, config).map(|r| r.cloned()).transpose()
}

/// Draw every distinct object of a bucket with each of its passes matching `key`
///
/// Objects without a mesh or material are skipped, as are passes the device
/// refuses to set up.
fn draw_bucket<D: GraphicsDevice + ?Sized>(
    frame: &mut Frame<'_, D>,
    bucket: &[ObjectId],
    queue: RenderQueue,
    key: PassKey,
    phase: PipelinePhase,
) {
    let mut drawn = HashSet::with_capacity(bucket.len());
    for id in bucket {
        if !drawn.insert(*id) {
            continue;
        }
        let Some(object) = frame.objects.get(*id) else {
            continue;
        };
        let (Some(material), Some(mesh)) = (object.material(), object.mesh()) else {
            continue;
        };

        let uniforms = ObjectUniforms::new(object.transform(), object.inverse_transform());
        for pass in material.passes_with(queue, key) {
            if let Err(e) = frame.device.begin_pass(pass) {
                log::trace!("Skipping pass '{}' of '{}': {}", pass.name, object.name, e);
                continue;
            }
            frame.device.upload_uniforms(UniformSlot::Object, bytemuck::bytes_of(&uniforms));
            frame.device.draw(mesh);
            frame.device.end_pass();
            frame.stats.count_draw(phase);
        }
    }
}

/// Tell listeners of every drawn object that `camera` is done with them
fn notify_render_end(classifier: &RenderDataClassifier, objects: &RenderObjects, camera: &Camera) {
    for id in classifier.objects_in(&GEOMETRY_KEYS) {
        if let Some(listener) = objects.get(id).and_then(RenderObject::listener) {
            listener.on_render_end(id, camera);
        }
    }
}
