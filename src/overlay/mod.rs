//! Full-screen loading overlay driven by asset-load notifications.

use crate::assets::LoadEvent;
use crate::util::easing::EasingFunction;

/// Overlay lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayState {
    /// Opaque while assets load.
    Loading,
    /// Fading out after every asset finished.
    FadingOut {
        /// Seconds since the fade started.
        elapsed: f32,
    },
    /// Fully transparent.
    Hidden,
    /// An asset failed; stays opaque in the error tint.
    Failed,
}

/// Loading overlay state machine.
#[derive(Debug, Clone)]
pub struct LoadingOverlay {
    state: OverlayState,
    fade_seconds: f32,
    easing: EasingFunction,
    percent: u32,
}

impl LoadingOverlay {
    /// New overlay in [`OverlayState::Loading`].
    ///
    /// Non-positive or non-finite durations hide the overlay as soon as
    /// loading completes.
    pub fn new(fade_seconds: f32, easing: EasingFunction) -> Self {
        Self {
            state: OverlayState::Loading,
            fade_seconds: if fade_seconds.is_finite() {
                fade_seconds.max(0.0)
            } else {
                0.0
            },
            easing,
            percent: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Last reported load percentage.
    pub fn percent(&self) -> u32 {
        self.percent
    }

    /// Feed a tracker notification.
    pub fn on_event(&mut self, event: &LoadEvent) {
        match event {
            LoadEvent::Progress { loaded, total, .. } => {
                if *total > 0 {
                    self.percent = (u64::from(*loaded) * 100 / u64::from(*total)) as u32;
                }
                log::debug!("loading progress {}%", self.percent);
            }
            LoadEvent::Completed { .. } => {
                self.percent = 100;
                self.complete();
            }
            LoadEvent::Failed { url, message } => self.fail(url, message),
        }
    }

    /// Start fading out. Only the first call while loading has an effect.
    pub fn complete(&mut self) {
        if self.state == OverlayState::Loading {
            log::info!("loading complete, fading overlay over {}s", self.fade_seconds);
            self.state = if self.fade_seconds > 0.0 {
                OverlayState::FadingOut { elapsed: 0.0 }
            } else {
                OverlayState::Hidden
            };
        }
    }

    /// Switch to the error tint. Ignored once the fade has started.
    pub fn fail(&mut self, url: &str, message: &str) {
        if self.state == OverlayState::Loading {
            log::error!("overlay showing load failure for {url}: {message}");
            self.state = OverlayState::Failed;
        }
    }

    /// Advance the fade by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if let OverlayState::FadingOut { elapsed } = self.state {
            let elapsed = elapsed + dt.max(0.0);
            self.state = if elapsed >= self.fade_seconds {
                log::debug!("overlay hidden");
                OverlayState::Hidden
            } else {
                OverlayState::FadingOut { elapsed }
            };
        }
    }

    /// Current opacity in `[0, 1]`.
    pub fn opacity(&self) -> f32 {
        match self.state {
            OverlayState::Loading | OverlayState::Failed => 1.0,
            OverlayState::FadingOut { elapsed } => {
                1.0 - self.easing.evaluate(elapsed / self.fade_seconds)
            }
            OverlayState::Hidden => 0.0,
        }
    }

    /// Whether the overlay draws in its error tint.
    pub fn is_failed(&self) -> bool {
        self.state == OverlayState::Failed
    }

    /// Whether nothing remains to draw.
    pub fn is_hidden(&self) -> bool {
        self.state == OverlayState::Hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed() -> LoadEvent {
        LoadEvent::Completed { total: 1 }
    }

    #[test]
    fn opaque_until_completion() {
        let mut overlay = LoadingOverlay::new(6.0, EasingFunction::QuadraticOut);
        overlay.advance(10.0);
        assert_eq!(overlay.opacity(), 1.0);
        assert_eq!(overlay.state(), OverlayState::Loading);
    }

    #[test]
    fn fade_is_strictly_decreasing_to_zero() {
        let mut overlay = LoadingOverlay::new(6.0, EasingFunction::QuadraticOut);
        overlay.on_event(&completed());

        let mut prev = overlay.opacity();
        assert_eq!(prev, 1.0);
        for _ in 0..59 {
            overlay.advance(0.1);
            let now = overlay.opacity();
            assert!(now < prev, "{now} >= {prev}");
            prev = now;
        }
        overlay.advance(0.2);
        assert_eq!(overlay.opacity(), 0.0);
        assert!(overlay.is_hidden());
    }

    #[test]
    fn completion_fires_once() {
        let mut overlay = LoadingOverlay::new(6.0, EasingFunction::Linear);
        overlay.on_event(&completed());
        overlay.advance(3.0);
        let midway = overlay.opacity();
        assert!((midway - 0.5).abs() < 1e-6);

        // a repeated completion does not restart the fade
        overlay.on_event(&completed());
        assert_eq!(overlay.opacity(), midway);
    }

    #[test]
    fn failure_stays_opaque() {
        let mut overlay = LoadingOverlay::new(6.0, EasingFunction::QuadraticOut);
        overlay.on_event(&LoadEvent::Failed {
            url: "scene.glb".into(),
            message: "boom".into(),
        });
        assert!(overlay.is_failed());
        overlay.advance(100.0);
        overlay.complete();
        assert_eq!(overlay.opacity(), 1.0);
        assert!(overlay.is_failed());
    }

    #[test]
    fn progress_updates_percentage() {
        let mut overlay = LoadingOverlay::new(6.0, EasingFunction::QuadraticOut);
        overlay.on_event(&LoadEvent::Progress {
            url: "a".into(),
            loaded: 1,
            total: 3,
        });
        assert_eq!(overlay.percent(), 33);
        assert_eq!(overlay.opacity(), 1.0);
    }

    #[test]
    fn zero_duration_hides_immediately() {
        let mut overlay = LoadingOverlay::new(0.0, EasingFunction::QuadraticOut);
        overlay.complete();
        assert!(overlay.is_hidden());
        assert_eq!(overlay.opacity(), 0.0);
    }
}
