//! Frame timing

use std::time::Instant;

/// Wall-clock timer ticked once per rendered frame
#[derive(Debug)]
pub struct FrameTimer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance the timer (call once per frame) and return the new delta
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_time
    }

    /// Seconds elapsed between the last two ticks
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Seconds accumulated over all ticks
    pub const fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of ticks so far
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_accumulates() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.frame_count(), 0);
        let dt = timer.tick();
        timer.tick();
        assert_eq!(timer.frame_count(), 2);
        assert!(dt >= 0.0);
        assert!(timer.total_time() >= timer.delta_time());
    }
}
