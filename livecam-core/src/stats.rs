//! Display frame-rate accounting
//!
//! Counts converted frames shown to the host and recomputes the display rate
//! once per one-second window.

use std::time::{Duration, Instant};

/// Length of one measurement window
const WINDOW: Duration = Duration::from_secs(1);

/// Rolling display frame-rate counter
#[derive(Debug, Clone, Default)]
pub struct DisplayFps {
    /// Frames counted in the current window
    window_frames: u32,
    /// Frames counted since the last reset
    frames_total: u64,
    /// Rate computed at the end of the last full window
    fps: f32,
    /// Start of the current window; unset until the first frame after a reset
    window_start: Option<Instant>,
}

impl DisplayFps {
    /// Create an empty counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all counts
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Count one displayed frame at `now`
    pub fn record_frame(&mut self, now: Instant) {
        self.frames_total += 1;

        // The opening frame only marks the window start
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            return;
        };
        self.window_frames += 1;

        let elapsed = now.saturating_duration_since(start);
        if elapsed >= WINDOW {
            self.fps = self.window_frames as f32 / elapsed.as_secs_f32();
            self.window_frames = 0;
            self.window_start = Some(now);
        }
    }

    /// Display rate over the last full window
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Frames displayed since the last reset
    pub fn frames_total(&self) -> u64 {
        self.frames_total
    }
}
