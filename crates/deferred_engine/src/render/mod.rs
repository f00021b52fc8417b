//! # Rendering
//!
//! Turns the visible contents of the scenes into GPU work.
//!
//! ## Architecture
//!
//! - **Device**: the small interface of the graphics device layer the renderer calls into
//! - **Materials**: queue and pass keys declared by material techniques
//! - **Occlusion list**: per-query candidates ordered by distance to the eye
//! - **Classifier**: sorts visible objects into per `(queue, pass)` draw buckets
//! - **Pipeline**: the deferred lighting state machine run once per camera per frame
//! - **Feature**: owns all of the above and drives a frame

pub mod classifier;
pub mod device;
pub mod feature;
pub mod material;
pub mod occlusion;
pub mod pipeline;

pub use classifier::RenderDataClassifier;
pub use device::{GraphicsDevice, RecordingDevice};
pub use feature::DeferredRenderFeature;
pub use material::{Material, MaterialPass, PassKey, PipelineMaterials, RenderQueue, Technique};
pub use occlusion::{OcclusionCandidate, OcclusionList};
pub use pipeline::{
    CameraOutcome, CameraReport, DeferredPipeline, FrameReport, FrameStats, PipelinePhase,
};

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised by the renderer and the device layer
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Renderer setup failed
    ///
    /// Raised while activating the pipeline; the feature must not render afterwards.
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),

    /// A texture or framebuffer could not be created
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// A framebuffer could not be made the current render target
    #[error("Render target bind failed: {0}")]
    TargetBindFailed(String),

    /// A rendering operation failed during execution
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// Backend-specific error
    #[error("Backend error: {0}")]
    BackendError(String),

    /// A material lacks a pass the pipeline looks up by name
    #[error("Material '{material}' has no pass named '{pass}'")]
    MissingMaterialPass {
        /// Material name
        material: String,
        /// Missing pass name
        pass: String,
    },
}
