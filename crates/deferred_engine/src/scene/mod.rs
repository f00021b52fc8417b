//! # Scene
//!
//! Render objects, lights and cameras, and the per-scene registries the
//! visibility queries run against.
//!
//! Objects live in a [`RenderObjects`] arena and are referenced by [`ObjectId`].
//! An object registered in a scene stores that scene's [`SceneId`]; ids are
//! generation-checked, so a destroyed scene or object never resolves again.

pub mod camera;
pub mod light;
pub mod registry;
pub mod render_object;
pub mod render_scene;


pub use camera::{Camera, CameraPurpose, Viewport};
pub use light::{Light, LightKind, LightKinds, ShadowResources, ShadowState};
pub use registry::SceneRegistry;
pub use render_object::{ObjectKind, RenderListener, RenderObject, RenderObjects};
pub use render_scene::RenderScene;

slotmap::new_key_type! {
    /// Handle to a render object
    pub struct ObjectId;

    /// Handle to a scene
    pub struct SceneId;

    /// Handle to a camera within its scene
    pub struct CameraId;
}

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Scene membership errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// No live scene has this id
    #[error("Unknown scene {0:?}")]
    UnknownScene(SceneId),

    /// No live object has this id
    #[error("Unknown render object {0:?}")]
    UnknownObject(ObjectId),

    /// No camera of the scene has this id
    #[error("Unknown camera {0:?}")]
    UnknownCamera(CameraId),

    /// The object is registered in another scene
    #[error("Render object {object:?} is already registered in scene {scene:?}")]
    AlreadyRegistered {
        /// Object
        object: ObjectId,
        /// Scene holding it
        scene: SceneId,
    },

    /// The object is not registered in the scene
    #[error("Render object {object:?} is not registered in scene {scene:?}")]
    NotRegistered {
        /// Object
        object: ObjectId,
        /// Scene asked to remove it
        scene: SceneId,
    },

    /// The object must leave its scene before it can be destroyed
    #[error("Render object {object:?} is still registered in scene {scene:?}")]
    StillRegistered {
        /// Object
        object: ObjectId,
        /// Scene holding it
        scene: SceneId,
    },
}
