#[derive(Debug, Clone)]
pub struct PlayConfig {
    pub input_interval_ms: f64,
    pub frame_interval_ms: f64,
    pub animation_frame_count: usize,
    /// Minimum drag length, in pointer units, before a drag becomes a move.
    pub swipe_threshold: f32,
    pub max_action_depth: usize,
    pub shuffle_seed: Option<u64>,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            input_interval_ms: 200.0,
            frame_interval_ms: 400.0,
            animation_frame_count: 12,
            swipe_threshold: 20.0,
            max_action_depth: 256,
            shuffle_seed: None,
        }
    }
}
