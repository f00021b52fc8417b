//! Headless device that records every call
//!
//! Used by tools that need to run the pipeline without a GPU and by the tests.
//! Failures can be injected to exercise the error paths of the pipeline.

use std::collections::{HashMap, HashSet};

use super::{
    BlendMode, ClearFlags, DeviceResult, FramebufferDesc, FramebufferHandle, GraphicsDevice,
    MeshRange, RenderTarget, TextureDesc, TextureHandle, TextureSlot, UniformSlot,
};
use crate::foundation::math::Vec4;
use crate::render::material::MaterialPass;
use crate::render::RenderError;

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    /// Frame started
    BeginFrame,
    /// Frame submitted
    EndFrame,
    /// Texture created
    CreateTexture(TextureHandle, TextureDesc),
    /// Texture destroyed
    DestroyTexture(TextureHandle),
    /// Framebuffer created
    CreateFramebuffer(FramebufferHandle, FramebufferDesc),
    /// Framebuffer destroyed
    DestroyFramebuffer(FramebufferHandle),
    /// Render target bound
    SetRenderTarget(RenderTarget),
    /// Target cleared
    Clear {
        /// Cleared attachments
        flags: ClearFlags,
        /// Clear color
        color: Vec4,
        /// Clear depth
        depth: f32,
    },
    /// Blend mode changed
    SetBlend(BlendMode),
    /// Color writes toggled
    SetColorWrite(bool),
    /// Material pass opened
    BeginPass(String),
    /// Material pass closed
    EndPass,
    /// Texture bound to a slot
    BindTexture(TextureSlot, TextureHandle),
    /// Uniform block uploaded
    UploadUniforms(UniformSlot, Vec<u8>),
    /// Mesh drawn
    Draw(MeshRange),
    /// Fullscreen triangle drawn
    DrawFullscreen,
    /// Debug region opened
    PushDebugGroup(String),
    /// Debug region closed
    PopDebugGroup,
}

/// Device that keeps a log of commands instead of talking to a GPU
#[derive(Debug, Default)]
pub struct RecordingDevice {
    commands: Vec<DeviceCommand>,
    next_handle: u64,
    textures: HashMap<TextureHandle, TextureDesc>,
    framebuffers: HashMap<FramebufferHandle, FramebufferDesc>,
    failing_targets: HashSet<FramebufferHandle>,
    failing_texture_labels: HashSet<String>,
    fail_all_textures: bool,
}

impl RecordingDevice {
    /// Create an empty device
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command recorded so far
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Drain the command log
    pub fn take_commands(&mut self) -> Vec<DeviceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Forget recorded commands, keeping live resources
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Number of textures currently alive
    pub fn live_texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of framebuffers currently alive
    pub fn live_framebuffer_count(&self) -> usize {
        self.framebuffers.len()
    }

    /// Description of a live texture
    pub fn texture_desc(&self, texture: TextureHandle) -> Option<&TextureDesc> {
        self.textures.get(&texture)
    }

    /// Description of a live framebuffer
    pub fn framebuffer_desc(&self, framebuffer: FramebufferHandle) -> Option<&FramebufferDesc> {
        self.framebuffers.get(&framebuffer)
    }

    /// Whether a texture handle is alive
    pub fn is_texture_alive(&self, texture: TextureHandle) -> bool {
        self.textures.contains_key(&texture)
    }

    /// Whether a framebuffer handle is alive
    pub fn is_framebuffer_alive(&self, framebuffer: FramebufferHandle) -> bool {
        self.framebuffers.contains_key(&framebuffer)
    }

    /// Number of mesh and fullscreen draws recorded
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DeviceCommand::Draw(_) | DeviceCommand::DrawFullscreen))
            .count()
    }

    /// Make binds of `framebuffer` fail
    pub fn fail_render_target(&mut self, framebuffer: FramebufferHandle) {
        self.failing_targets.insert(framebuffer);
    }

    /// Make creation of textures with this label fail
    pub fn fail_textures_labelled(&mut self, label: impl Into<String>) {
        self.failing_texture_labels.insert(label.into());
    }

    /// Make every texture creation fail (or succeed again)
    pub fn set_fail_all_textures(&mut self, fail: bool) {
        self.fail_all_textures = fail;
    }

    /// Remove all injected failures
    pub fn clear_failures(&mut self) {
        self.failing_targets.clear();
        self.failing_texture_labels.clear();
        self.fail_all_textures = false;
    }

    fn allocate_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl GraphicsDevice for RecordingDevice {
    fn begin_frame(&mut self) -> DeviceResult<()> {
        self.commands.push(DeviceCommand::BeginFrame);
        Ok(())
    }

    fn end_frame(&mut self) -> DeviceResult<()> {
        self.commands.push(DeviceCommand::EndFrame);
        Ok(())
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> DeviceResult<TextureHandle> {
        if self.fail_all_textures || self.failing_texture_labels.contains(&desc.label) {
            return Err(RenderError::ResourceCreationFailed(format!(
                "texture '{}' ({}x{})",
                desc.label, desc.width, desc.height
            )));
        }
        if desc.width == 0 || desc.height == 0 {
            return Err(RenderError::ResourceCreationFailed(format!(
                "texture '{}' has zero size",
                desc.label
            )));
        }

        let handle = TextureHandle(self.allocate_handle());
        self.textures.insert(handle, desc.clone());
        self.commands.push(DeviceCommand::CreateTexture(handle, desc.clone()));
        Ok(handle)
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(&texture).is_some() {
            self.commands.push(DeviceCommand::DestroyTexture(texture));
        }
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> DeviceResult<FramebufferHandle> {
        let attachments = desc.color_attachments.iter().chain(desc.depth_attachment.iter());
        for texture in attachments {
            if !self.textures.contains_key(texture) {
                return Err(RenderError::ResourceCreationFailed(format!(
                    "framebuffer '{}' references unknown texture {:?}",
                    desc.label, texture
                )));
            }
        }

        let handle = FramebufferHandle(self.allocate_handle());
        self.framebuffers.insert(handle, desc.clone());
        self.commands.push(DeviceCommand::CreateFramebuffer(handle, desc.clone()));
        Ok(handle)
    }

    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        if self.framebuffers.remove(&framebuffer).is_some() {
            self.commands.push(DeviceCommand::DestroyFramebuffer(framebuffer));
        }
    }

    fn set_render_target(&mut self, target: RenderTarget) -> DeviceResult<()> {
        if let RenderTarget::Framebuffer(framebuffer) = target {
            if self.failing_targets.contains(&framebuffer) || !self.framebuffers.contains_key(&framebuffer) {
                return Err(RenderError::TargetBindFailed(format!("{framebuffer:?}")));
            }
        }
        self.commands.push(DeviceCommand::SetRenderTarget(target));
        Ok(())
    }

    fn clear(&mut self, flags: ClearFlags, color: Vec4, depth: f32, _stencil: u32) {
        self.commands.push(DeviceCommand::Clear { flags, color, depth });
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.commands.push(DeviceCommand::SetBlend(mode));
    }

    fn set_color_write(&mut self, enabled: bool) {
        self.commands.push(DeviceCommand::SetColorWrite(enabled));
    }

    fn begin_pass(&mut self, pass: &MaterialPass) -> DeviceResult<()> {
        self.commands.push(DeviceCommand::BeginPass(pass.name.clone()));
        Ok(())
    }

    fn end_pass(&mut self) {
        self.commands.push(DeviceCommand::EndPass);
    }

    fn bind_texture(&mut self, slot: TextureSlot, texture: TextureHandle) {
        self.commands.push(DeviceCommand::BindTexture(slot, texture));
    }

    fn upload_uniforms(&mut self, slot: UniformSlot, data: &[u8]) {
        self.commands.push(DeviceCommand::UploadUniforms(slot, data.to_vec()));
    }

    fn draw(&mut self, mesh: &MeshRange) {
        self.commands.push(DeviceCommand::Draw(*mesh));
    }

    fn draw_fullscreen(&mut self) {
        self.commands.push(DeviceCommand::DrawFullscreen);
    }

    fn push_debug_group(&mut self, label: &str) {
        self.commands.push(DeviceCommand::PushDebugGroup(label.to_string()));
    }

    fn pop_debug_group(&mut self) {
        self.commands.push(DeviceCommand::PopDebugGroup);
    }
}
