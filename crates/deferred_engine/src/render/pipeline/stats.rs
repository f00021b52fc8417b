//! Per-camera frame statistics

use super::phase::PipelinePhase;
use crate::scene::LightKind;

/// What one camera's pass through the pipeline did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Draw calls (mesh and fullscreen) issued per phase, indexed by [`PipelinePhase::index`]
    pub draws: [usize; PipelinePhase::COUNT],
    /// Lights accumulated per kind, indexed by [`LightKind::index`]
    pub lights: [usize; 5],
    /// Shadow maps rendered
    pub shadow_maps: usize,
    /// Shadow maps that could not be rebuilt and were skipped
    pub shadow_failures: usize,
    /// Phases run, in order
    pub phases: Vec<PipelinePhase>,
}

impl FrameStats {
    /// Draws issued in `phase`
    pub fn draws_in(&self, phase: PipelinePhase) -> usize {
        self.draws[phase.index()]
    }

    /// Lights of `kind` accumulated
    pub fn lights_of(&self, kind: LightKind) -> usize {
        self.lights[kind.index()]
    }

    /// Draws across every phase
    pub fn total_draws(&self) -> usize {
        self.draws.iter().sum()
    }

    /// Whether `phase` ran
    pub fn ran(&self, phase: PipelinePhase) -> bool {
        self.phases.contains(&phase)
    }

    pub(crate) fn count_draw(&mut self, phase: PipelinePhase) {
        self.draws[phase.index()] += 1;
    }

    pub(crate) fn count_light(&mut self, kind: LightKind) {
        self.lights[kind.index()] += 1;
    }
}
