//! Frame-level scenarios run against the recording device

use std::cell::Cell;
use std::rc::Rc;

use approx::assert_relative_eq;

use super::*;
use crate::foundation::logging;
use crate::foundation::math::{Transform, Vec3};
use crate::geometry::Aabb;
use crate::render::device::{
    BufferHandle, DeviceCommand, FramebufferDesc, MeshRange, RecordingDevice, ShaderHandle,
    TextureDesc, TextureFormat,
};
use crate::render::material::{Material, MaterialPass, Technique};
use crate::scene::{LightKind, RenderListener, Viewport};

struct Rig {
    device: RecordingDevice,
    scenes: SceneRegistry,
    objects: RenderObjects,
    pipeline: DeferredPipeline,
    config: RenderConfig,
    scene: SceneId,
}

impl Rig {
    fn new() -> Self {
        logging::init_for_tests();
        let mut device = RecordingDevice::new();
        let config = RenderConfig::default();
        let mut pipeline = DeferredPipeline::new();
        pipeline.on_activate(&mut device, 320, 240, &config).unwrap();

        let mut scenes = SceneRegistry::new();
        let scene = scenes.create_scene("test");
        scenes.get_mut(scene).unwrap().add_camera(main_camera("main"));

        Self {
            device,
            scenes,
            objects: RenderObjects::new(),
            pipeline,
            config,
            scene,
        }
    }

    fn add(&mut self, object: RenderObject) -> ObjectId {
        let id = self.objects.insert(object);
        self.scenes
            .get_mut(self.scene)
            .unwrap()
            .add_render_object(&mut self.objects, id)
            .unwrap();
        id
    }

    fn frame(&mut self) -> FrameReport {
        self.device.clear_commands();
        self.pipeline
            .on_render_pipeline(&mut self.device, &self.scenes, &mut self.objects, &self.config)
    }

    fn stats(&mut self) -> FrameStats {
        let report = self.frame();
        match &report.cameras[0].outcome {
            CameraOutcome::Completed(stats) => stats.clone(),
            other => panic!("camera did not complete: {other:?}"),
        }
    }

    fn light(&self, id: ObjectId) -> &Light {
        self.objects.get(id).and_then(RenderObject::as_light).unwrap()
    }

    fn with_light<R>(&mut self, id: ObjectId, f: impl FnOnce(&mut Light, &mut RecordingDevice) -> R) -> R {
        let device = &mut self.device;
        self.objects
            .get_mut(id)
            .unwrap()
            .modify_light(|light| f(light, device))
            .unwrap()
    }

    fn begun_passes(&self) -> Vec<String> {
        self.device
            .commands()
            .iter()
            .filter_map(|c| match c {
                DeviceCommand::BeginPass(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    fn uploads<T: bytemuck::Pod>(&self, slot: UniformSlot) -> Vec<T> {
        self.device
            .commands()
            .iter()
            .filter_map(|c| match c {
                DeviceCommand::UploadUniforms(s, bytes) if *s == slot => Some(bytemuck::pod_read_unaligned(bytes)),
                _ => None,
            })
            .collect()
    }
}

fn main_camera(name: &str) -> Camera {
    Camera::perspective(
        name,
        Vec3::new(0.0, 0.0, 10.0),
        Vec3::zeros(),
        60.0,
        Viewport::new(320, 240),
        0.1,
        100.0,
    )
}

fn mesh() -> MeshRange {
    MeshRange::new(BufferHandle(1), BufferHandle(2), 36)
}

fn solid(name: &str, position: Vec3) -> RenderObject {
    RenderObject::geometry(name, Aabb::unit())
        .with_material(Rc::new(Material::opaque("stone", ShaderHandle(1))))
        .with_mesh(mesh())
        .with_transform(Transform::from_position(position).to_matrix())
}

fn pane(name: &str, position: Vec3) -> RenderObject {
    RenderObject::geometry(name, Aabb::unit())
        .with_material(Rc::new(Material::transparent("glass", ShaderHandle(2))))
        .with_mesh(mesh())
        .with_transform(Transform::from_position(position).to_matrix())
}

/// Spot light ten units above the origin, pointing down
fn overhead_spot(shadow: bool, soft: bool) -> RenderObject {
    let mut light = Light::spot(Vec3::new(1.0, 1.0, 1.0), 1.0, 20.0, 20.0, 30.0)
        .with_shadow_resolution(256)
        .with_soft_shadow(soft);
    light.set_shadow(shadow, &mut RecordingDevice::new());
    RenderObject::light("spot", light)
        .with_transform(Transform::looking_along(Vec3::new(0.0, 10.0, 0.0), -Vec3::y()).to_matrix())
}

#[test]
fn test_unshadowed_point_light_skips_shadow_pass() {
    let mut rig = Rig::new();
    rig.add(solid("cube", Vec3::zeros()));
    let lamp = rig.add(RenderObject::light(
        "lamp",
        Light::point(Vec3::new(1.0, 1.0, 1.0), 1.0, 5.0),
    ));

    let stats = rig.stats();

    assert_eq!(rig.pipeline.classifier().visible_lights(), &[lamp]);
    assert!(!stats.ran(PipelinePhase::ShadowPass));
    assert_eq!(stats.draws_in(PipelinePhase::ShadowPass), 0);
    assert_eq!(stats.shadow_maps, 0);
    assert_eq!(stats.lights_of(LightKind::Point), 1);
    assert!(!rig
        .device
        .commands()
        .iter()
        .any(|c| matches!(c, DeviceCommand::CreateTexture(_, desc) if desc.label == "shadow_map")));
}

#[test]
fn test_sun_and_point_each_accumulate_once_with_own_parameters() {
    let mut rig = Rig::new();
    rig.add(solid("cube", Vec3::zeros()));
    rig.add(RenderObject::light("sun", Light::sun(Vec3::new(1.0, 0.0, 0.0), 2.0)));
    rig.add(RenderObject::light(
        "lamp",
        Light::point(Vec3::new(0.0, 1.0, 0.0), 3.0, 5.0),
    ));

    let stats = rig.stats();

    assert_eq!(stats.lights_of(LightKind::Sun), 1);
    assert_eq!(stats.lights_of(LightKind::Point), 1);
    assert_eq!(stats.draws_in(PipelinePhase::LightAccumulation), 2);

    let passes = rig.begun_passes();
    assert_eq!(passes.iter().filter(|p| *p == "light_sun").count(), 1);
    assert_eq!(passes.iter().filter(|p| *p == "light_point").count(), 1);
    assert!(!passes.iter().any(|p| p == "light_spot"));

    let lights: Vec<LightUniforms> = rig.uploads(UniformSlot::Light);
    assert_eq!(lights.len(), 2);
    assert_relative_eq!(lights[0].color(), Vec3::new(1.0, 0.0, 0.0));
    assert_relative_eq!(lights[0].color_intensity[3], 2.0);
    assert_relative_eq!(lights[1].color(), Vec3::new(0.0, 1.0, 0.0));
    assert_relative_eq!(lights[1].color_intensity[3], 3.0);
    assert!(!lights[0].has_shadow() && !lights[1].has_shadow());
}

#[test]
fn test_shadowed_light_runs_every_phase_in_order() {
    let mut rig = Rig::new();
    rig.add(solid("caster", Vec3::zeros()));
    rig.add(solid("hidden", Vec3::new(1.5, 0.0, 0.0)).with_cast_shadows(false));
    let spot = rig.add(overhead_spot(true, false));

    let stats = rig.stats();

    assert_eq!(stats.phases, PipelinePhase::ALL[1..].to_vec());
    assert_eq!(stats.shadow_maps, 1);
    assert_eq!(stats.draws_in(PipelinePhase::ShadowPass), 1);
    assert_eq!(stats.draws_in(PipelinePhase::OpaqueDepthPrepass), 2);
    assert!(rig.light(spot).shadow_state().is_ready());

    let lights: Vec<LightUniforms> = rig.uploads(UniformSlot::Light);
    assert!(lights[0].has_shadow());
    let groups = rig
        .device
        .commands()
        .iter()
        .filter(|c| matches!(c, DeviceCommand::PushDebugGroup(label) if label == "shadow_pass"))
        .count();
    assert_eq!(groups, 1);
}

#[test]
fn test_toggled_shadow_is_recreated_fresh() {
    let mut rig = Rig::new();
    rig.add(solid("caster", Vec3::zeros()));
    let spot = rig.add(overhead_spot(true, false));
    rig.stats();
    let first = rig.light(spot).shadow_state().resources().unwrap().texture;
    let first_target = rig.light(spot).shadow_state().resources().unwrap().framebuffer;

    rig.with_light(spot, |light, device| light.set_shadow(false, device));
    assert!(!rig.device.is_texture_alive(first));
    assert!(!rig.device.is_framebuffer_alive(first_target));
    assert!(!rig.stats().ran(PipelinePhase::ShadowPass));

    rig.with_light(spot, |light, device| light.set_shadow(true, device));
    let stats = rig.stats();
    let second = rig.light(spot).shadow_state().resources().unwrap().texture;

    assert_eq!(stats.shadow_maps, 1);
    assert_ne!(first, second);
    assert_eq!(rig.device.texture_desc(second).map(|d| d.width), Some(256));
}

#[test]
fn test_soft_shadow_blurs_horizontally_then_vertically() {
    let mut rig = Rig::new();
    rig.add(solid("caster", Vec3::zeros()));
    rig.add(overhead_spot(true, true));

    let stats = rig.stats();

    assert_eq!(stats.draws_in(PipelinePhase::ShadowPass), 3);
    let passes = rig.begun_passes();
    let horizontal = passes.iter().position(|p| p == "blur_horizontal").unwrap();
    let vertical = passes.iter().position(|p| p == "blur_vertical").unwrap();
    assert!(horizontal < vertical);

    let filters: Vec<FilterUniforms> = rig.uploads(UniformSlot::Filter);
    assert_eq!(filters.len(), 2);
    assert_eq!(filters[0].direction, [1.0, 0.0]);
    assert_eq!(filters[1].direction, [0.0, 1.0]);
    assert_relative_eq!(filters[0].texel_size, 1.0 / 256.0);
}

#[test]
fn test_failed_shadow_build_degrades_to_unshadowed() {
    let mut rig = Rig::new();
    rig.add(solid("caster", Vec3::zeros()));
    let spot = rig.add(overhead_spot(true, false));
    rig.device.fail_textures_labelled("shadow_map");

    let stats = rig.stats();

    assert_eq!(stats.shadow_failures, 1);
    assert_eq!(stats.shadow_maps, 0);
    assert!(stats.ran(PipelinePhase::TransparentShading));
    assert!(rig.light(spot).shadow_state().is_pending());
    let lights: Vec<LightUniforms> = rig.uploads(UniformSlot::Light);
    assert!(!lights[0].has_shadow());

    rig.device.clear_failures();
    let stats = rig.stats();
    assert_eq!(stats.shadow_maps, 1);
    assert_eq!(stats.shadow_failures, 0);
}

#[test]
fn test_unbindable_shadow_target_degrades_to_unshadowed() {
    let mut rig = Rig::new();
    rig.add(solid("caster", Vec3::zeros()));
    let spot = rig.add(overhead_spot(true, false));
    assert_eq!(rig.stats().shadow_maps, 1);

    let target = rig.light(spot).shadow_state().resources().unwrap().framebuffer;
    rig.device.fail_render_target(target);
    let stats = rig.stats();

    assert_eq!(stats.shadow_failures, 1);
    assert_eq!(stats.shadow_maps, 0);
    assert!(stats.ran(PipelinePhase::TransparentShading));
    assert_eq!(stats.lights_of(LightKind::Spot), 1);
    assert_eq!(rig.device.draw_count(), stats.total_draws());
    assert!(!rig
        .device
        .commands()
        .iter()
        .any(|c| matches!(c, DeviceCommand::BindTexture(TextureSlot::ShadowMap, _))));
    let lights: Vec<LightUniforms> = rig.uploads(UniformSlot::Light);
    assert!(!lights[0].has_shadow());

    rig.device.clear_failures();
    let stats = rig.stats();
    assert_eq!(stats.shadow_maps, 1);
    assert_eq!(stats.shadow_failures, 0);
    let lights: Vec<LightUniforms> = rig.uploads(UniformSlot::Light);
    assert!(lights[0].has_shadow());
}

#[test]
fn test_queues_are_drawn_in_their_phases() {
    let mut rig = Rig::new();
    rig.add(solid("cube", Vec3::zeros()));
    rig.add(pane("glass", Vec3::new(0.0, 0.0, 2.0)));
    rig.add(
        RenderObject::geometry("meshless", Aabb::unit())
            .with_material(Rc::new(Material::opaque("stone", ShaderHandle(1)))),
    );
    rig.add(RenderObject::geometry("bare", Aabb::unit()).with_mesh(mesh()));

    let stats = rig.stats();

    assert_eq!(stats.draws_in(PipelinePhase::OpaqueDepthPrepass), 1);
    assert_eq!(stats.draws_in(PipelinePhase::OpaqueGBuffer), 1);
    assert_eq!(stats.draws_in(PipelinePhase::LightAccumulation), 0);
    assert_eq!(stats.draws_in(PipelinePhase::OpaqueShading), 1);
    assert_eq!(stats.draws_in(PipelinePhase::TransparentDepthPrepass), 1);
    assert_eq!(stats.draws_in(PipelinePhase::TransparentForward), 1);
    assert_eq!(stats.draws_in(PipelinePhase::TransparentShading), 1);

    let commands = rig.device.commands();
    assert!(commands.contains(&DeviceCommand::SetBlend(BlendMode::AlphaOver)));
    assert_eq!(commands.last(), Some(&DeviceCommand::PopDebugGroup));
}

#[test]
fn test_repeated_pass_key_draws_each_pass_once_per_object() {
    let mut rig = Rig::new();
    let layered = Material::new("layered").with_technique(
        Technique::new(RenderQueue::Opaque)
            .with_pass(MaterialPass::new("base", PassKey::Opaque, ShaderHandle(3)))
            .with_pass(MaterialPass::new("decal", PassKey::Opaque, ShaderHandle(4))),
    );
    rig.add(
        RenderObject::geometry("wall", Aabb::unit())
            .with_material(Rc::new(layered))
            .with_mesh(mesh()),
    );

    let stats = rig.stats();

    assert_eq!(rig.pipeline.classifier().render_data(RenderQueue::Opaque, PassKey::Opaque).len(), 2);
    assert_eq!(stats.draws_in(PipelinePhase::OpaqueGBuffer), 2);
    let passes = rig.begun_passes();
    assert!(passes.contains(&"base".to_string()) && passes.contains(&"decal".to_string()));
}

#[test]
fn test_gbuffer_bind_failure_aborts_the_camera() {
    let mut rig = Rig::new();
    rig.add(solid("cube", Vec3::zeros()));
    let gbuffer = rig.pipeline.targets().unwrap().gbuffer;
    rig.device.fail_render_target(gbuffer);

    let report = rig.frame();

    let outcome = &report.cameras[0].outcome;
    assert_eq!(outcome.failed_phase(), Some(PipelinePhase::OpaqueGBuffer));
    assert!(matches!(
        outcome,
        CameraOutcome::Failed { error: RenderError::TargetBindFailed(_), .. }
    ));
    let commands = rig.device.commands();
    assert!(!commands.contains(&DeviceCommand::DrawFullscreen));
    let pushes = commands.iter().filter(|c| matches!(c, DeviceCommand::PushDebugGroup(_))).count();
    let pops = commands.iter().filter(|c| matches!(c, DeviceCommand::PopDebugGroup)).count();
    assert_eq!(pushes, pops);

    rig.device.clear_failures();
    assert!(rig.frame().all_completed());
}

#[test]
fn test_failing_camera_target_leaves_other_cameras_unaffected() {
    let mut rig = Rig::new();
    rig.add(solid("cube", Vec3::zeros()));

    let color = rig
        .device
        .create_texture(&TextureDesc::new("mirror", 64, 64, TextureFormat::Rgba8Unorm))
        .unwrap();
    let framebuffer = rig
        .device
        .create_framebuffer(&FramebufferDesc {
            label: "mirror".to_string(),
            color_attachments: vec![color],
            depth_attachment: None,
            width: 64,
            height: 64,
        })
        .unwrap();
    rig.device.fail_render_target(framebuffer);

    let mut mirror = main_camera("mirror");
    mirror.target = RenderTarget::Framebuffer(framebuffer);
    let scene = rig.scenes.get_mut(rig.scene).unwrap();
    scene.add_camera(mirror);
    scene.add_camera(main_camera("second"));

    let report = rig.frame();

    assert_eq!(report.cameras.len(), 3);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(
        report.camera("mirror").unwrap().outcome.failed_phase(),
        Some(PipelinePhase::TransparentShading)
    );
    assert!(report.camera("main").unwrap().outcome.is_completed());
    assert!(report.camera("second").unwrap().outcome.is_completed());
}

#[test]
fn test_only_main_cameras_are_rendered() {
    let mut rig = Rig::new();
    let mut shadow_only = main_camera("shadow_only");
    shadow_only.purpose = CameraPurpose::ShadowGeneration;
    rig.scenes.get_mut(rig.scene).unwrap().add_camera(shadow_only);
    let other = rig.scenes.create_scene("other");
    rig.scenes.get_mut(other).unwrap().add_camera(main_camera("other_main"));

    let report = rig.frame();

    let names: Vec<_> = report.cameras.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"main") && names.contains(&"other_main"));
    assert_eq!(report.frame, 1);
    assert_eq!(rig.frame().frame, 2);
}

#[derive(Default)]
struct Counter {
    begins: Cell<usize>,
    ends: Cell<usize>,
}

impl RenderListener for Counter {
    fn on_render_begin(&self, _object: ObjectId, _camera: &Camera) {
        self.begins.set(self.begins.get() + 1);
    }

    fn on_render_end(&self, _object: ObjectId, _camera: &Camera) {
        self.ends.set(self.ends.get() + 1);
    }
}

#[test]
fn test_listener_hears_each_camera_once_after_drawing() {
    let mut rig = Rig::new();
    let counter = Rc::new(Counter::default());
    rig.add(solid("watched", Vec3::zeros()).with_listener(counter.clone()));

    rig.stats();
    assert_eq!(counter.begins.get(), 2);
    assert_eq!(counter.ends.get(), 1);

    rig.add(overhead_spot(true, false));
    rig.stats();
    // Main camera: depth and gbuffer passes, shadow camera: the same again
    assert_eq!(counter.begins.get(), 6);
    assert_eq!(counter.ends.get(), 3);
}

#[test]
fn test_inactive_pipeline_fails_every_camera() {
    let mut rig = Rig::new();
    rig.pipeline.on_deactivate(&mut rig.device);

    let report = rig.frame();

    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.cameras[0].outcome.failed_phase(), Some(PipelinePhase::Idle));
    assert_eq!(rig.device.live_texture_count(), 0);
    assert_eq!(rig.device.live_framebuffer_count(), 0);
}

#[test]
fn test_resize_replaces_targets() {
    let mut rig = Rig::new();
    let before = rig.pipeline.targets().unwrap().clone();

    rig.pipeline.resize(&mut rig.device, 320, 240, &rig.config).unwrap();
    assert_eq!(rig.pipeline.targets(), Some(&before));

    rig.pipeline.resize(&mut rig.device, 640, 480, &rig.config).unwrap();
    let after = rig.pipeline.targets().unwrap();
    assert_eq!((after.width, after.height), (640, 480));
    assert!(!rig.device.is_texture_alive(before.depth));
    assert_eq!(rig.device.live_texture_count(), 7);
}

#[test]
fn test_failed_resize_keeps_old_targets() {
    let mut rig = Rig::new();
    let before = rig.pipeline.targets().unwrap().clone();
    rig.device.set_fail_all_textures(true);

    assert!(rig.pipeline.resize(&mut rig.device, 640, 480, &rig.config).is_err());

    assert_eq!(rig.pipeline.targets(), Some(&before));
    assert!(rig.device.is_texture_alive(before.diffuse));
}

#[test]
fn test_missing_lighting_pass_fails_activation() {
    let mut materials = PipelineMaterials::builtin();
    materials.lighting = Rc::new(Material::new("no_lights"));
    let mut pipeline = DeferredPipeline::with_materials(materials);
    let mut device = RecordingDevice::new();

    let result = pipeline.on_activate(&mut device, 320, 240, &RenderConfig::default());

    assert!(matches!(result, Err(RenderError::MissingMaterialPass { .. })));
    assert!(!pipeline.is_active());
    assert_eq!(device.live_texture_count(), 0);
}
