//! Tracking of resources created by a multi-step setup

use super::{DeviceResult, FramebufferDesc, FramebufferHandle, GraphicsDevice, TextureDesc, TextureHandle};

/// Remembers what a setup step created so a later failure can undo it
///
/// Call [`ResourceScope::release`] when the setup fails; on success just drop
/// the scope and keep the handles.
#[derive(Debug, Default)]
pub struct ResourceScope {
    textures: Vec<TextureHandle>,
    framebuffers: Vec<FramebufferHandle>,
}

impl ResourceScope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a texture and remember it
    pub fn texture<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        desc: &TextureDesc,
    ) -> DeviceResult<TextureHandle> {
        let texture = device.create_texture(desc)?;
        self.textures.push(texture);
        Ok(texture)
    }

    /// Create a framebuffer and remember it
    pub fn framebuffer<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        desc: &FramebufferDesc,
    ) -> DeviceResult<FramebufferHandle> {
        let framebuffer = device.create_framebuffer(desc)?;
        self.framebuffers.push(framebuffer);
        Ok(framebuffer)
    }

    /// Destroy everything created through the scope, framebuffers first
    pub fn release<D: GraphicsDevice + ?Sized>(self, device: &mut D) {
        for framebuffer in self.framebuffers.into_iter().rev() {
            device.destroy_framebuffer(framebuffer);
        }
        for texture in self.textures.into_iter().rev() {
            device.destroy_texture(texture);
        }
    }
}
