//! Scene demo
//!
//! Builds a small lit scene, runs it through the deferred pipeline on the
//! recording device and logs what every frame did. Pass a `.toml` or `.ron`
//! render config as the first argument to override the defaults.

use std::rc::Rc;

use deferred_engine::config::{Config, ConfigError};
use deferred_engine::foundation::logging;
use deferred_engine::prelude::*;
use deferred_engine::scene::SceneError;

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;
const FRAMES: u32 = 8;

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Logs when the pillar is drawn
struct PillarWatcher;

impl RenderListener for PillarWatcher {
    fn on_render_begin(&self, _object: ObjectId, camera: &Camera) {
        log::trace!("Pillar queued for '{}'", camera.name);
    }

    fn on_render_end(&self, _object: ObjectId, camera: &Camera) {
        log::trace!("Pillar drawn by '{}'", camera.name);
    }
}

struct SceneDemo {
    feature: DeferredRenderFeature<RecordingDevice>,
    spot: ObjectId,
    orbiter: ObjectId,
}

impl SceneDemo {
    fn new(config: RenderConfig) -> Result<Self, DemoError> {
        log::info!("Creating scene demo...");
        let mut feature = DeferredRenderFeature::new(RecordingDevice::new(), config)?;
        feature.on_activate(WIDTH, HEIGHT)?;

        let scene = feature.create_scene("courtyard");
        let camera = Camera::perspective(
            "main",
            Vec3::new(0.0, 4.0, 14.0),
            Vec3::zeros(),
            60.0,
            Viewport::new(WIDTH, HEIGHT),
            0.1,
            100.0,
        );
        feature.add_camera(scene, camera)?;

        let stone = Rc::new(Material::opaque("stone", ShaderHandle(1)));
        let glass = Rc::new(Material::transparent("glass", ShaderHandle(2)));
        let cube = MeshRange::new(BufferHandle(1), BufferHandle(2), 36);

        let ground = RenderObject::geometry("ground", Aabb::new(Vec3::new(-10.0, -0.1, -10.0), Vec3::new(10.0, 0.0, 10.0)))
            .with_material(stone.clone())
            .with_mesh(cube);
        let pillar = RenderObject::geometry("pillar", Aabb::unit())
            .with_material(stone.clone())
            .with_mesh(cube)
            .with_cast_shadows(true)
            .with_listener(Rc::new(PillarWatcher))
            .with_transform(Transform::from_position(Vec3::new(0.0, 1.0, 0.0)).to_matrix());
        let orbiter = RenderObject::geometry("orbiter", Aabb::unit())
            .with_material(stone)
            .with_mesh(cube)
            .with_cast_shadows(true);
        let window = RenderObject::geometry("window", Aabb::unit())
            .with_material(glass)
            .with_mesh(cube)
            .with_transform(Transform::from_position(Vec3::new(2.0, 1.0, 3.0)).to_matrix());

        let sun = Light::sun(Vec3::new(1.0, 0.95, 0.9), 2.0).with_range(30.0);
        let spot = Light::spot(Vec3::new(0.2, 0.4, 1.0), 6.0, 20.0, 15.0, 25.0).with_soft_shadow(true);
        let fill = Light::point(Vec3::new(1.0, 0.5, 0.2), 3.0, 8.0).with_attenuation(1.0, 0.1, 0.02);
        let sky = Light::hemisphere(Vec3::new(0.4, 0.6, 1.0), Vec3::new(0.3, 0.25, 0.2), 0.5);

        let mut ids = Vec::new();
        for object in [ground, pillar, window] {
            ids.push(feature.spawn_object(object));
        }
        let orbiter = feature.spawn_object(orbiter);
        let sun = feature.spawn_object(
            RenderObject::light("sun", sun).with_transform(
                Transform::looking_along(Vec3::new(0.0, 10.0, 0.0), Vec3::new(-0.3, -1.0, -0.2)).to_matrix(),
            ),
        );
        let spot = feature.spawn_object(
            RenderObject::light("spot", spot).with_transform(
                Transform::looking_along(Vec3::new(0.0, 6.0, 4.0), Vec3::new(0.0, -1.0, -0.6)).to_matrix(),
            ),
        );
        let fill = feature.spawn_object(
            RenderObject::light("fill", fill)
                .with_transform(Transform::from_position(Vec3::new(-3.0, 2.0, 1.0)).to_matrix()),
        );
        let sky = feature.spawn_object(RenderObject::light("sky", sky));
        ids.extend([orbiter, sun, spot, fill, sky]);

        for id in ids {
            feature.attach(scene, id)?;
        }
        feature.set_shadow(sun, true)?;
        feature.set_shadow(spot, true)?;

        log::info!("Scene demo created with {} objects", feature.objects().len());
        Ok(Self {
            feature,
            spot,
            orbiter,
        })
    }

    fn update(&mut self, frame: u32) -> Result<(), DemoError> {
        let angle = frame as f32 * 0.4;
        let position = Vec3::new(4.0 * angle.cos(), 1.0, 4.0 * angle.sin());
        self.feature
            .set_transform(self.orbiter, Transform::from_position(position).to_matrix())?;

        // Halfway through, drop the spot shadow to show the pass being skipped for it
        if frame == FRAMES / 2 {
            log::info!("Disabling spot light shadow");
            self.feature.set_shadow(self.spot, false)?;
        }
        Ok(())
    }

    fn run(&mut self) -> Result<(), DemoError> {
        for frame in 0..FRAMES {
            self.update(frame)?;
            let report = self.feature.render_frame()?;

            for camera in &report.cameras {
                match &camera.outcome {
                    CameraOutcome::Completed(stats) => log::info!(
                        "Frame {} '{}': {} draws, {} shadow maps, {} lights, phases {:?}",
                        report.frame,
                        camera.name,
                        stats.total_draws(),
                        stats.shadow_maps,
                        stats.lights.iter().sum::<usize>(),
                        stats.phases
                    ),
                    CameraOutcome::Failed { phase, error } => {
                        log::warn!("Frame {} '{}' failed in {}: {}", report.frame, camera.name, phase, error);
                    }
                }
            }
            log::debug!(
                "{} device commands recorded",
                self.feature.device_mut().take_commands().len()
            );
        }
        Ok(())
    }

    fn shutdown(mut self) {
        self.feature.on_deactivate();
        log::info!(
            "Scene demo finished, {} textures still alive",
            self.feature.device().live_texture_count()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading render config from {}", path);
            RenderConfig::load_from_file(&path).map_err(DemoError::from)?
        }
        None => RenderConfig::default(),
    };

    let mut demo = SceneDemo::new(config)?;
    demo.run()?;
    demo.shutdown();
    Ok(())
}
