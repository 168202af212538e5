//! Render-loop control: stop token and scene clock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use web_time::Instant;

/// Shared flag that ends a render loop.
///
/// Clones share the same flag; any clone may stop the loop and every host
/// checks [`is_stopped`](Self::is_stopped) before scheduling another frame.
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    stopped: Arc<AtomicBool>,
}

impl StopToken {
    /// A token that has not been triggered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to stop. Idempotent.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Whether [`stop`](Self::stop) has been called on any clone.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Elapsed/delta time source for shader time uniforms.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

/// One clock reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock started.
    pub elapsed: f32,
    /// Seconds since the previous tick.
    pub delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Start the clock now.
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    /// Advance to the current instant.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advance to `now`. Instants earlier than the previous tick yield a
    /// zero delta.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let delta = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = self.last.max(now);
        FrameTime {
            elapsed: self.last.duration_since(self.start).as_secs_f32(),
            delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = StopToken::new();
        let other = token.clone();
        assert!(!token.is_stopped());
        other.stop();
        assert!(token.is_stopped());
        token.stop();
        assert!(other.is_stopped());
    }

    #[test]
    fn clock_reports_elapsed_and_delta() {
        let mut clock = FrameClock::new();
        let start = clock.start;
        let t = clock.tick_at(start + Duration::from_millis(500));
        assert!((t.elapsed - 0.5).abs() < 1e-6);
        assert!((t.delta - 0.5).abs() < 1e-6);

        let t = clock.tick_at(start + Duration::from_millis(750));
        assert!((t.elapsed - 0.75).abs() < 1e-6);
        assert!((t.delta - 0.25).abs() < 1e-6);
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut clock = FrameClock::new();
        let start = clock.start;
        let _ = clock.tick_at(start + Duration::from_secs(1));
        let t = clock.tick_at(start);
        assert_eq!(t.delta, 0.0);
        assert!((t.elapsed - 1.0).abs() < 1e-6);
    }
}
