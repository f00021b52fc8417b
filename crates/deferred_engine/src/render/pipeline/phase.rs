//! Pipeline phases and their transition table

use crate::scene::{LightKind, LightKinds};

/// What the transition table needs to know about a camera's frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameFacts {
    /// Visible lights with shadows enabled
    pub shadowed_lights: usize,
    /// Kinds present among the visible lights
    pub light_kinds: LightKinds,
}

impl FrameFacts {
    /// Light kinds whose accumulation branch runs, in accumulation order
    pub fn light_branches(&self) -> impl Iterator<Item = LightKind> + '_ {
        LightKind::ALL
            .into_iter()
            .filter(move |kind| self.light_kinds.contains(kind.flag()))
    }
}

/// A phase of the deferred pipeline
///
/// ```text
/// Idle -> [ShadowPass] -> OpaqueDepthPrepass -> OpaqueGBuffer -> LightAccumulation
///      -> OpaqueShading -> TransparentDepthPrepass -> TransparentForward
///      -> TransparentShading -> Idle
/// ```
///
/// `ShadowPass` is skipped when no visible light casts shadows. Every other phase
/// always runs, and no transition goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PipelinePhase {
    /// Between cameras
    Idle,
    /// Shadow maps of the visible shadow-casting lights
    ShadowPass,
    /// Depth of the opaque queue
    OpaqueDepthPrepass,
    /// Diffuse, normal and linear depth of the opaque queue
    OpaqueGBuffer,
    /// Additive per-light accumulation over the G-buffer
    LightAccumulation,
    /// G-buffer combined with the accumulated light
    OpaqueShading,
    /// Depth of the transparent queue
    TransparentDepthPrepass,
    /// Forward-shaded transparent surfaces
    TransparentForward,
    /// Transparent result composited over the opaque one into the camera target
    TransparentShading,
}

impl PipelinePhase {
    /// Number of phases
    pub const COUNT: usize = 9;

    /// Every phase in declaration order
    pub const ALL: [PipelinePhase; Self::COUNT] = [
        PipelinePhase::Idle,
        PipelinePhase::ShadowPass,
        PipelinePhase::OpaqueDepthPrepass,
        PipelinePhase::OpaqueGBuffer,
        PipelinePhase::LightAccumulation,
        PipelinePhase::OpaqueShading,
        PipelinePhase::TransparentDepthPrepass,
        PipelinePhase::TransparentForward,
        PipelinePhase::TransparentShading,
    ];

    /// Phase following `self`
    pub fn next(self, facts: &FrameFacts) -> PipelinePhase {
        match self {
            PipelinePhase::Idle if facts.shadowed_lights > 0 => PipelinePhase::ShadowPass,
            PipelinePhase::Idle => PipelinePhase::OpaqueDepthPrepass,
            PipelinePhase::ShadowPass => PipelinePhase::OpaqueDepthPrepass,
            PipelinePhase::OpaqueDepthPrepass => PipelinePhase::OpaqueGBuffer,
            PipelinePhase::OpaqueGBuffer => PipelinePhase::LightAccumulation,
            PipelinePhase::LightAccumulation => PipelinePhase::OpaqueShading,
            PipelinePhase::OpaqueShading => PipelinePhase::TransparentDepthPrepass,
            PipelinePhase::TransparentDepthPrepass => PipelinePhase::TransparentForward,
            PipelinePhase::TransparentForward => PipelinePhase::TransparentShading,
            PipelinePhase::TransparentShading => PipelinePhase::Idle,
        }
    }

    /// Phases a camera goes through, from leaving `Idle` until returning to it
    pub fn sequence(facts: &FrameFacts) -> Vec<PipelinePhase> {
        let mut phases = Vec::with_capacity(Self::COUNT - 1);
        let mut phase = PipelinePhase::Idle.next(facts);
        while phase != PipelinePhase::Idle {
            phases.push(phase);
            phase = phase.next(facts);
        }
        phases
    }

    /// Position in [`PipelinePhase::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Debug label
    pub fn name(self) -> &'static str {
        match self {
            PipelinePhase::Idle => "idle",
            PipelinePhase::ShadowPass => "shadow_pass",
            PipelinePhase::OpaqueDepthPrepass => "opaque_depth_prepass",
            PipelinePhase::OpaqueGBuffer => "opaque_gbuffer",
            PipelinePhase::LightAccumulation => "light_accumulation",
            PipelinePhase::OpaqueShading => "opaque_shading",
            PipelinePhase::TransparentDepthPrepass => "transparent_depth_prepass",
            PipelinePhase::TransparentForward => "transparent_forward",
            PipelinePhase::TransparentShading => "transparent_shading",
        }
    }
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
