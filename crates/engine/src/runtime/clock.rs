use super::config::PlayConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockTicks {
    pub frame_advanced: bool,
    pub input_due: bool,
}

/// Splits the host's periodic callback into the animation cadence and the input
/// evaluation cadence. Both start expired so the first tick does everything.
#[derive(Debug, Clone)]
pub struct TickClock {
    frame_interval_ms: f64,
    input_interval_ms: f64,
    frame_count: usize,
    time_to_next_frame: f64,
    time_to_next_input: f64,
    frame_index: usize,
}

impl TickClock {
    pub fn new(config: &PlayConfig) -> Self {
        Self {
            frame_interval_ms: config.frame_interval_ms,
            input_interval_ms: config.input_interval_ms,
            frame_count: config.animation_frame_count.max(1),
            time_to_next_frame: 0.0,
            time_to_next_input: 0.0,
            frame_index: 0,
        }
    }

    pub fn advance(&mut self, dt_ms: f64) -> ClockTicks {
        let mut ticks = ClockTicks::default();

        self.time_to_next_frame -= dt_ms;
        if self.time_to_next_frame <= 0.0 {
            self.frame_index = (self.frame_index + 1) % self.frame_count;
            self.time_to_next_frame = self.frame_interval_ms;
            ticks.frame_advanced = true;
        }

        self.time_to_next_input -= dt_ms;
        if self.time_to_next_input <= 0.0 {
            self.time_to_next_input = self.input_interval_ms;
            ticks.input_due = true;
        }
        ticks
    }

    /// A fresh input is evaluated on the very next tick.
    pub fn reset_input(&mut self) {
        self.time_to_next_input = 0.0;
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }
}
