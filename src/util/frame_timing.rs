//! Smoothed frame-time measurement for debug logging.

use web_time::{Duration, Instant};

/// How often smoothed timings are written to the debug log.
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Smoothed frame-rate and frame-time diagnostics.
pub struct FrameTiming {
    /// Last frame timestamp
    last_frame: Instant,
    /// Last time the timings were logged
    last_report: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothed frame duration in milliseconds
    smoothed_ms: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    /// Frames recorded since construction
    frames: u64,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTiming {
    /// Start timing from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            last_report: now,
            smoothed_fps: 60.0,
            smoothed_ms: 1000.0 / 60.0,
            smoothing: 0.05,
            frames: 0,
        }
    }

    /// Record the end of a frame.
    pub fn end_frame(&mut self) {
        self.end_frame_at(Instant::now());
    }

    fn end_frame_at(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frames += 1;

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let k = self.smoothing;
            self.smoothed_fps = self.smoothed_fps * (1.0 - k) + k / frame_time;
            self.smoothed_ms =
                self.smoothed_ms * (1.0 - k) + k * frame_time * 1000.0;
        }

        if now.saturating_duration_since(self.last_report) >= REPORT_INTERVAL {
            self.last_report = now;
            log::debug!(
                "frame {}: {:.1} fps, {:.2} ms",
                self.frames,
                self.smoothed_fps,
                self.smoothed_ms
            );
        }
    }

    /// Smoothed frames per second.
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Smoothed frame duration in milliseconds.
    pub fn frame_ms(&self) -> f32 {
        self.smoothed_ms
    }

    /// Frames recorded so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_towards_steady_rate() {
        let mut timing = FrameTiming::new();
        let mut now = timing.last_frame;
        for _ in 0..500 {
            now += Duration::from_millis(10);
            timing.end_frame_at(now);
        }
        assert!((timing.fps() - 100.0).abs() < 1.0, "{}", timing.fps());
        assert!((timing.frame_ms() - 10.0).abs() < 0.1, "{}", timing.frame_ms());
        assert_eq!(timing.frames(), 500);
    }

    #[test]
    fn zero_length_frames_are_ignored() {
        let mut timing = FrameTiming::new();
        let now = timing.last_frame;
        timing.end_frame_at(now);
        assert_eq!(timing.fps(), 60.0);
    }
}
