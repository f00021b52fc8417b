//! Intermediate render targets owned by the pipeline

use crate::config::GBufferConfig;
use crate::render::device::{
    FramebufferDesc, FramebufferHandle, GraphicsDevice, ResourceScope, TextureDesc, TextureHandle,
};
use crate::render::{RenderError, RenderResult};

/// Every texture and framebuffer the phases render into
///
/// The depth-stencil texture is shared by the depth prepasses, the G-buffer and
/// the transparent forward target so transparent surfaces test against opaque depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineTargets {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Shared depth-stencil
    pub depth: TextureHandle,
    /// Albedo
    pub diffuse: TextureHandle,
    /// View-space normals
    pub normal: TextureHandle,
    /// Linear view depth
    pub linear_depth: TextureHandle,
    /// Accumulated lighting
    pub light: TextureHandle,
    /// Shaded opaque color
    pub opaque_color: TextureHandle,
    /// Forward-shaded transparent color
    pub transparent_color: TextureHandle,
    /// Depth-only target of the opaque prepass
    pub depth_prepass: FramebufferHandle,
    /// Diffuse, normal and linear depth over the shared depth
    pub gbuffer: FramebufferHandle,
    /// Light accumulation
    pub light_accumulation: FramebufferHandle,
    /// Opaque shading output
    pub opaque: FramebufferHandle,
    /// Transparent color over the shared depth
    pub transparent: FramebufferHandle,
}

impl PipelineTargets {
    /// Create every target at `width` x `height`
    ///
    /// Fails if any texture or framebuffer cannot be created; whatever was created
    /// before the failure is destroyed again.
    pub fn create<D: GraphicsDevice + ?Sized>(
        device: &mut D,
        width: u32,
        height: u32,
        formats: &GBufferConfig,
    ) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::ResourceCreationFailed(format!(
                "render targets need a non-zero size, got {width}x{height}"
            )));
        }

        let mut scope = ResourceScope::new();
        match Self::build(device, width, height, formats, &mut scope) {
            Ok(targets) => {
                log::debug!("Created deferred render targets at {}x{}", width, height);
                Ok(targets)
            }
            Err(e) => {
                scope.release(device);
                Err(e)
            }
        }
    }

    fn build<D: GraphicsDevice + ?Sized>(
        device: &mut D,
        width: u32,
        height: u32,
        formats: &GBufferConfig,
        scope: &mut ResourceScope,
    ) -> RenderResult<Self> {
        let mut texture = |device: &mut D, label: &str, format| {
            scope.texture(device, &TextureDesc::new(label, width, height, format))
        };
        let depth = texture(device, "depth", formats.depth_format)?;
        let diffuse = texture(device, "gbuffer_diffuse", formats.diffuse_format)?;
        let normal = texture(device, "gbuffer_normal", formats.normal_format)?;
        let linear_depth = texture(device, "gbuffer_linear_depth", formats.linear_depth_format)?;
        let light = texture(device, "light_accumulation", formats.light_format)?;
        let opaque_color = texture(device, "opaque_color", formats.color_format)?;
        let transparent_color = texture(device, "transparent_color", formats.color_format)?;

        let mut framebuffer = |device: &mut D, label: &str, color: Vec<TextureHandle>, with_depth: bool| {
            scope.framebuffer(
                device,
                &FramebufferDesc {
                    label: label.to_string(),
                    color_attachments: color,
                    depth_attachment: with_depth.then_some(depth),
                    width,
                    height,
                },
            )
        };
        let depth_prepass = framebuffer(device, "depth_prepass", Vec::new(), true)?;
        let gbuffer = framebuffer(device, "gbuffer", vec![diffuse, normal, linear_depth], true)?;
        let light_accumulation = framebuffer(device, "light_accumulation", vec![light], false)?;
        let opaque = framebuffer(device, "opaque", vec![opaque_color], false)?;
        let transparent = framebuffer(device, "transparent", vec![transparent_color], true)?;

        Ok(Self {
            width,
            height,
            depth,
            diffuse,
            normal,
            linear_depth,
            light,
            opaque_color,
            transparent_color,
            depth_prepass,
            gbuffer,
            light_accumulation,
            opaque,
            transparent,
        })
    }

    /// Destroy every target
    pub fn release<D: GraphicsDevice + ?Sized>(self, device: &mut D) {
        for framebuffer in [
            self.transparent,
            self.opaque,
            self.light_accumulation,
            self.gbuffer,
            self.depth_prepass,
        ] {
            device.destroy_framebuffer(framebuffer);
        }
        for texture in [
            self.transparent_color,
            self.opaque_color,
            self.light,
            self.linear_depth,
            self.normal,
            self.diffuse,
            self.depth,
        ] {
            device.destroy_texture(texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::device::RecordingDevice;

    #[test]
    fn test_create_and_release() {
        let mut device = RecordingDevice::new();
        let targets = PipelineTargets::create(&mut device, 320, 200, &GBufferConfig::default()).unwrap();

        assert_eq!(device.live_texture_count(), 7);
        assert_eq!(device.live_framebuffer_count(), 5);
        let gbuffer = device.framebuffer_desc(targets.gbuffer).unwrap();
        assert_eq!(gbuffer.color_attachments, vec![targets.diffuse, targets.normal, targets.linear_depth]);
        assert_eq!(gbuffer.depth_attachment, Some(targets.depth));

        targets.release(&mut device);
        assert_eq!(device.live_texture_count(), 0);
        assert_eq!(device.live_framebuffer_count(), 0);
    }

    #[test]
    fn test_failed_creation_cleans_up() {
        let mut device = RecordingDevice::new();
        device.fail_textures_labelled("transparent_color");

        let result = PipelineTargets::create(&mut device, 320, 200, &GBufferConfig::default());

        assert!(matches!(result, Err(RenderError::ResourceCreationFailed(_))));
        assert_eq!(device.live_texture_count(), 0);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let mut device = RecordingDevice::new();
        assert!(PipelineTargets::create(&mut device, 0, 200, &GBufferConfig::default()).is_err());
    }
}
