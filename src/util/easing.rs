//! Easing curves for timed fades.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Easing curve applied to normalized progress.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-in (slow start, fast end).
    QuadraticIn,
    /// Quadratic ease-out (fast start, slow end).
    #[default]
    QuadraticOut,
    /// Quadratic ease-in-out (slow at both ends).
    QuadraticInOut,
}

impl EasingFunction {
    /// Evaluate the curve at `t`.
    ///
    /// `t` is clamped to `[0, 1]`; every curve maps 0 to 0, 1 to 1 and is
    /// non-decreasing in between.
    #[inline]
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadraticIn => t * t,
            Self::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Self::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingFunction; 4] = [
        EasingFunction::Linear,
        EasingFunction::QuadraticIn,
        EasingFunction::QuadraticOut,
        EasingFunction::QuadraticInOut,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for f in ALL {
            assert_eq!(f.evaluate(0.0), 0.0, "{f:?}");
            assert!((f.evaluate(1.0) - 1.0).abs() < 1e-6, "{f:?}");
        }
    }

    #[test]
    fn input_is_clamped() {
        for f in ALL {
            assert_eq!(f.evaluate(-0.5), 0.0);
            assert!((f.evaluate(1.5) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn quadratic_out_shape() {
        let quad_out = EasingFunction::QuadraticOut;
        assert_eq!(quad_out.evaluate(0.5), 0.75);
        assert!(quad_out.evaluate(0.25) > 0.25);
    }

    #[test]
    fn curves_are_monotonic() {
        for f in ALL {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = f.evaluate(i as f32 / 100.0);
                assert!(v >= prev, "{f:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn default_is_quadratic_out() {
        assert_eq!(EasingFunction::default(), EasingFunction::QuadraticOut);
    }
}
