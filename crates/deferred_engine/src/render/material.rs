//! Material techniques, passes and the queue/pass keys they declare
//!
//! Materials are authored and compiled elsewhere; this module only carries what
//! the classifier and pipeline read from them.

use std::rc::Rc;

use crate::render::device::ShaderHandle;
use crate::render::RenderError;

/// Coarse classification deciding in which pipeline phase an object is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderQueue {
    /// Solid surfaces, deferred shaded
    Opaque,
    /// Blended surfaces, forward shaded on top of the opaque result
    Transparent,
    /// Light volumes
    Lighting,
}

/// Which shader pass of a technique draws the object within a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PassKey {
    /// Depth-only pass (depth prepass and shadow casting)
    Depth,
    /// Main opaque pass writing the G-buffer
    Opaque,
    /// Material-specific extra pass drawn alongside the main pass of its queue
    Specific,
    /// Main transparent forward pass
    Transparent,
    /// Light pass
    Lights,
}

/// A single shader pass of a technique
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialPass {
    /// Pass name, unique within its material
    pub name: String,
    /// Bucket key the pass contributes to
    pub key: PassKey,
    /// Shader program
    pub shader: ShaderHandle,
}

impl MaterialPass {
    /// Create a pass
    pub fn new(name: impl Into<String>, key: PassKey, shader: ShaderHandle) -> Self {
        Self {
            name: name.into(),
            key,
            shader,
        }
    }
}

/// A group of passes sharing a render queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Technique {
    /// Queue the technique belongs to
    pub queue: RenderQueue,
    /// Passes in declaration order
    pub passes: Vec<MaterialPass>,
}

impl Technique {
    /// Create a technique without passes
    pub fn new(queue: RenderQueue) -> Self {
        Self {
            queue,
            passes: Vec::new(),
        }
    }

    /// Builder: append a pass
    pub fn with_pass(mut self, pass: MaterialPass) -> Self {
        self.passes.push(pass);
        self
    }
}

/// A material as seen by the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    /// Material name
    pub name: String,
    /// Techniques in declaration order
    pub techniques: Vec<Technique>,
}

impl Material {
    /// Create a material without techniques
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            techniques: Vec::new(),
        }
    }

    /// Builder: append a technique
    pub fn with_technique(mut self, technique: Technique) -> Self {
        self.techniques.push(technique);
        self
    }

    /// Standard opaque surface: depth prepass plus G-buffer pass
    pub fn opaque(name: impl Into<String>, shader: ShaderHandle) -> Self {
        Self::new(name).with_technique(
            Technique::new(RenderQueue::Opaque)
                .with_pass(MaterialPass::new("depth", PassKey::Depth, shader))
                .with_pass(MaterialPass::new("gbuffer", PassKey::Opaque, shader)),
        )
    }

    /// Standard transparent surface: depth prepass plus forward pass
    pub fn transparent(name: impl Into<String>, shader: ShaderHandle) -> Self {
        Self::new(name).with_technique(
            Technique::new(RenderQueue::Transparent)
                .with_pass(MaterialPass::new("depth", PassKey::Depth, shader))
                .with_pass(MaterialPass::new("forward", PassKey::Transparent, shader)),
        )
    }

    /// First pass with `key` in a technique of `queue`
    pub fn find_pass(&self, queue: RenderQueue, key: PassKey) -> Option<&MaterialPass> {
        self.techniques
            .iter()
            .filter(|t| t.queue == queue)
            .flat_map(|t| t.passes.iter())
            .find(|p| p.key == key)
    }

    /// Pass by name in any technique
    pub fn pass_named(&self, name: &str) -> Option<&MaterialPass> {
        self.techniques
            .iter()
            .flat_map(|t| t.passes.iter())
            .find(|p| p.name == name)
    }

    /// Every pass with `key` in a technique of `queue`, in declaration order
    pub fn passes_with(&self, queue: RenderQueue, key: PassKey) -> impl Iterator<Item = &MaterialPass> {
        self.passes()
            .filter(move |(q, p)| *q == queue && p.key == key)
            .map(|(_, p)| p)
    }

    /// Every `(queue, pass)` pair in declaration order
    pub fn passes(&self) -> impl Iterator<Item = (RenderQueue, &MaterialPass)> {
        self.techniques
            .iter()
            .flat_map(|t| t.passes.iter().map(move |p| (t.queue, p)))
    }
}

/// Pass names the lighting material must provide
pub const LIGHTING_PASSES: [&str; 5] = [
    "light_sun",
    "light_point",
    "light_spot",
    "light_hemisphere",
    "light_area",
];

/// Pass names the shading material must provide
pub const SHADING_PASSES: [&str; 2] = ["shade_opaque", "shade_transparent"];

/// Pass names the blur material must provide
pub const BLUR_PASSES: [&str; 2] = ["blur_horizontal", "blur_vertical"];

/// Materials used by the fullscreen phases of the deferred pipeline
#[derive(Debug, Clone)]
pub struct PipelineMaterials {
    /// Per-light-kind accumulation passes
    pub lighting: Rc<Material>,
    /// Opaque and transparent shading passes
    pub shading: Rc<Material>,
    /// Separable shadow blur passes
    pub blur: Rc<Material>,
}

impl PipelineMaterials {
    /// Built-in materials with one shader handle per pass
    pub fn builtin() -> Self {
        let mut next_shader = 1000;
        let mut technique = |queue: RenderQueue, key: PassKey, names: &[&str]| {
            names.iter().fold(Technique::new(queue), |built, name| {
                next_shader += 1;
                built.with_pass(MaterialPass::new(*name, key, ShaderHandle(next_shader)))
            })
        };

        let lighting = Material::new("deferred_lighting")
            .with_technique(technique(RenderQueue::Lighting, PassKey::Lights, &LIGHTING_PASSES[..]));
        let shading = Material::new("deferred_shading")
            .with_technique(technique(RenderQueue::Opaque, PassKey::Specific, &SHADING_PASSES[..]));
        let blur = Material::new("shadow_blur")
            .with_technique(technique(RenderQueue::Lighting, PassKey::Specific, &BLUR_PASSES[..]));

        Self {
            lighting: Rc::new(lighting),
            shading: Rc::new(shading),
            blur: Rc::new(blur),
        }
    }

    /// Check every pass the pipeline looks up by name is present
    pub fn validate(&self) -> Result<(), RenderError> {
        let required = [
            (&self.lighting, &LIGHTING_PASSES[..]),
            (&self.shading, &SHADING_PASSES[..]),
            (&self.blur, &BLUR_PASSES[..]),
        ];
        for (material, names) in required {
            for name in names {
                if material.pass_named(name).is_none() {
                    return Err(RenderError::MissingMaterialPass {
                        material: material.name.clone(),
                        pass: (*name).to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Look up a required pass
    pub fn pass(material: &Material, name: &str) -> Result<MaterialPass, RenderError> {
        material
            .pass_named(name)
            .cloned()
            .ok_or_else(|| RenderError::MissingMaterialPass {
                material: material.name.clone(),
                pass: name.to_string(),
            })
    }
}
