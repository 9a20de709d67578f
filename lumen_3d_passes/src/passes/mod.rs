//! Render passes
//!
//! `ScreenQuad` resolves an off-screen color/depth pair onto the current
//! target. `PassOrchestrator` owns the pass targets and drives the direct,
//! filtered and shadow-mapped passes.

mod screen_quad;
mod pass_orchestrator;

pub use screen_quad::{FilterMode, ScreenQuad, COLOR_UNIT, DEPTH_UNIT};
pub use pass_orchestrator::{
    PassKind, PassOrchestrator, PassOutput, ShadowMatrices, TargetSlot,
    SHADOW_UNIT_DIRECTIONAL, SHADOW_UNIT_POINT,
};
