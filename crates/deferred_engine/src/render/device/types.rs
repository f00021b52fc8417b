//! Handle and descriptor types shared between the pipeline and the device layer

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Handle to a texture owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Handle to a framebuffer owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferHandle(pub u64);

/// Handle to a vertex or index buffer owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Handle to a compiled shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u64);

/// Texel formats the pipeline asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureFormat {
    /// 8-bit normalized RGBA
    Rgba8Unorm,
    /// 16-bit float RGBA
    Rgba16Float,
    /// 32-bit float single channel
    R32Float,
    /// 32-bit float depth
    Depth32Float,
    /// 24-bit depth with 8-bit stencil
    Depth24Stencil8,
}

impl TextureFormat {
    /// Whether the format is a depth(-stencil) format
    pub fn is_depth(self) -> bool {
        matches!(self, Self::Depth32Float | Self::Depth24Stencil8)
    }
}

/// Texture creation parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDesc {
    /// Debug label
    pub label: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Texel format
    pub format: TextureFormat,
}

impl TextureDesc {
    /// Create a texture description
    pub fn new(label: impl Into<String>, width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            label: label.into(),
            width,
            height,
            format,
        }
    }
}

/// Framebuffer creation parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramebufferDesc {
    /// Debug label
    pub label: String,
    /// Color attachments in shader output order
    pub color_attachments: Vec<TextureHandle>,
    /// Optional depth(-stencil) attachment
    pub depth_attachment: Option<TextureHandle>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Where draws land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTarget {
    /// The presentation surface
    Backbuffer,
    /// An offscreen framebuffer
    Framebuffer(FramebufferHandle),
}

bitflags! {
    /// Which attachments a clear touches
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u8 {
        /// Clear color attachments
        const COLOR = 0b001;
        /// Clear depth
        const DEPTH = 0b010;
        /// Clear stencil
        const STENCIL = 0b100;
    }
}

/// Uniform blocks the pipeline uploads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformSlot {
    /// Per-camera matrices
    Camera,
    /// Per-object matrices
    Object,
    /// Per-light parameters
    Light,
    /// Post-process parameters (blur direction, texel size)
    Filter,
}

/// Texture inputs the pipeline binds for fullscreen passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// G-buffer albedo
    Diffuse,
    /// G-buffer normals
    Normal,
    /// G-buffer linear depth
    LinearDepth,
    /// Accumulated lighting
    LightAccumulation,
    /// Shadow map of the light being shaded
    ShadowMap,
    /// Opaque color result
    OpaqueColor,
    /// Transparent accumulation
    TransparentColor,
    /// Source image of a filter pass
    FilterSource,
}

/// Output blending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Overwrite the destination
    Replace,
    /// Add to the destination (light accumulation)
    Additive,
    /// Source-over alpha blending (transparent compositing)
    AlphaOver,
}

/// An indexed range of a vertex/index buffer pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshRange {
    /// Vertex buffer
    pub vertex_buffer: BufferHandle,
    /// Index buffer
    pub index_buffer: BufferHandle,
    /// First index to draw
    pub first_index: u32,
    /// Number of indices to draw
    pub index_count: u32,
    /// Offset added to every index
    pub base_vertex: i32,
}

impl MeshRange {
    /// Whole-buffer range starting at index zero
    pub fn new(vertex_buffer: BufferHandle, index_buffer: BufferHandle, index_count: u32) -> Self {
        Self {
            vertex_buffer,
            index_buffer,
            first_index: 0,
            index_count,
            base_vertex: 0,
        }
    }
}
