/// Pipeline settings consumed by the pass orchestrator.

/// Fixed constants uploaded by the screen quad on every resolve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadSettings {
    pub depth_scaling: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for QuadSettings {
    fn default() -> Self {
        Self {
            depth_scaling: 0.2,
            near: 0.01,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Edge length of both square shadow targets
    pub shadow_map_size: u32,
    /// Clear color of every pass
    pub clear_color: [f32; 4],
    pub quad: QuadSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            shadow_map_size: 1024,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            quad: QuadSettings::default(),
        }
    }
}
