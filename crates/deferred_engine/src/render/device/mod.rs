//! Graphics device abstraction
//!
//! The small, stable slice of the low-level device layer that the visibility and
//! lighting code calls into. Buffer and texture creation primitives live behind
//! this trait; a concrete GPU backend implements it, and [`RecordingDevice`]
//! implements it headlessly for tools and tests.

mod recording;
mod scope;
mod types;

pub use recording::{DeviceCommand, RecordingDevice};
pub use scope::ResourceScope;
pub use types::{
    BlendMode, BufferHandle, ClearFlags, FramebufferDesc, FramebufferHandle, MeshRange,
    RenderTarget, ShaderHandle, TextureDesc, TextureFormat, TextureHandle, TextureSlot,
    UniformSlot,
};

use crate::foundation::math::Vec4;
use crate::render::material::MaterialPass;
use crate::render::RenderError;

/// Result type for device operations
pub type DeviceResult<T> = Result<T, RenderError>;

/// Device operations the renderer depends on
///
/// All calls happen on the rendering thread, in submission order.
pub trait GraphicsDevice {
    /// Start recording a new frame
    fn begin_frame(&mut self) -> DeviceResult<()>;

    /// Finish and submit the current frame
    fn end_frame(&mut self) -> DeviceResult<()>;

    /// Create a texture
    fn create_texture(&mut self, desc: &TextureDesc) -> DeviceResult<TextureHandle>;

    /// Destroy a texture; unknown handles are ignored
    fn destroy_texture(&mut self, texture: TextureHandle);

    /// Create a framebuffer over existing textures
    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> DeviceResult<FramebufferHandle>;

    /// Destroy a framebuffer; unknown handles are ignored
    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle);

    /// Make `target` the destination of subsequent clears and draws
    fn set_render_target(&mut self, target: RenderTarget) -> DeviceResult<()>;

    /// Clear the current target
    fn clear(&mut self, flags: ClearFlags, color: Vec4, depth: f32, stencil: u32);

    /// Set the output blend mode
    fn set_blend(&mut self, mode: BlendMode);

    /// Enable or disable color writes (depth-only passes disable them)
    fn set_color_write(&mut self, enabled: bool);

    /// Set up a material pass (shader and fixed-function state)
    fn begin_pass(&mut self, pass: &MaterialPass) -> DeviceResult<()>;

    /// Close the pass opened by [`GraphicsDevice::begin_pass`]
    fn end_pass(&mut self);

    /// Bind a texture as a shader input
    fn bind_texture(&mut self, slot: TextureSlot, texture: TextureHandle);

    /// Upload a uniform block
    fn upload_uniforms(&mut self, slot: UniformSlot, data: &[u8]);

    /// Draw an indexed mesh range
    fn draw(&mut self, mesh: &MeshRange);

    /// Draw a screen-covering triangle
    fn draw_fullscreen(&mut self);

    /// Open a named debug region
    fn push_debug_group(&mut self, _label: &str) {}

    /// Close the innermost debug region
    fn pop_debug_group(&mut self) {}
}
