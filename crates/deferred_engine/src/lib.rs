//! # Deferred Engine
//!
//! The visibility and deferred lighting core of a real-time renderer.
//!
//! ## Features
//!
//! - **Scene Visibility**: per-scene registries answering frustum queries for objects and lights
//! - **Classification**: visible objects bucketed by render queue and material pass
//! - **Deferred Lighting**: a fixed phase pipeline with G-buffer, per-kind light accumulation and
//!   forward-shaded transparency
//! - **Shadows**: lazily built shadow maps per light, with optional separable blur
//! - **Headless Device**: a recording device for tools and tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deferred_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut feature = DeferredRenderFeature::new(RecordingDevice::new(), RenderConfig::default())?;
//!     feature.on_activate(1280, 720)?;
//!
//!     let scene = feature.create_scene("level");
//!     let camera = Camera::perspective(
//!         "main",
//!         Vec3::new(0.0, 2.0, 10.0),
//!         Vec3::zeros(),
//!         60.0,
//!         Viewport::new(1280, 720),
//!         0.1,
//!         100.0,
//!     );
//!     feature.add_camera(scene, camera)?;
//!
//!     let sun = feature.spawn_object(RenderObject::light("sun", Light::sun(Vec3::new(1.0, 1.0, 1.0), 2.0)));
//!     feature.attach(scene, sun)?;
//!
//!     let report = feature.render_frame()?;
//!     assert!(report.all_completed());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod foundation;
pub mod geometry;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, RenderConfig},
        foundation::math::{Mat4, Transform, Vec3, Vec4},
        geometry::{Aabb, BoundingVolume, Frustum},
        render::{
            device::{BufferHandle, MeshRange, ShaderHandle},
            CameraOutcome, DeferredPipeline, DeferredRenderFeature, FrameReport, FrameStats,
            GraphicsDevice, Material, PassKey, PipelinePhase, RecordingDevice, RenderError,
            RenderQueue, Technique,
        },
        scene::{
            Camera, Light, LightKind, ObjectId, RenderListener, RenderObject, SceneId, Viewport,
        },
    };
}
