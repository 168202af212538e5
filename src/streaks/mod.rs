//! Procedural light-streak field.
//!
//! Each draw produces two mirrored records, one on each side of the road
//! (`+W` then `-W`), sharing radius, length, vertical offset and depth.
//! Records are stored as flat `f32` buffers ready for instanced upload:
//! three floats of offset and two floats of metrics per record.

pub mod geometry;

use std::fmt;

use rand::Rng;

/// Floats per offset record: lateral, vertical, depth.
pub const OFFSET_STRIDE: usize = 3;
/// Floats per metrics record: radius, length.
pub const METRICS_STRIDE: usize = 2;

/// Shortest streak, as a fraction of the travel length.
const MIN_LENGTH_FRACTION: f32 = 0.02;
/// Exclusive upper bound on streak length, as a fraction of the travel
/// length.
const MAX_LENGTH_FRACTION: f32 = 0.10;
/// Most negative radius. Radii are drawn from `[MIN_RADIUS, 0)`.
const MIN_RADIUS: f32 = -0.5;

/// Inputs of [`generate_streak_field`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreakParams {
    /// Number of draws; the field holds twice as many records.
    pub count: u32,
    /// Length of the scrolling corridor (`L`).
    pub travel_length: f32,
    /// Half distance between the two streak rows (`W`).
    pub road_width: f32,
    /// Multiplier from radius to vertical offset.
    pub vertical_scale: f32,
}

impl Default for StreakParams {
    fn default() -> Self {
        Self {
            count: 250,
            travel_length: 200.0,
            road_width: 10.0,
            vertical_scale: 15.0,
        }
    }
}

/// Invalid generator input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreakFieldError {
    /// Travel length must be finite and strictly positive.
    TravelLength(f32),
    /// Road width must be finite and non-negative.
    RoadWidth(f32),
    /// Vertical scale must be finite.
    VerticalScale(f32),
}

impl fmt::Display for StreakFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TravelLength(v) => {
                write!(f, "travel length must be finite and > 0, got {v}")
            }
            Self::RoadWidth(v) => {
                write!(f, "road width must be finite and >= 0, got {v}")
            }
            Self::VerticalScale(v) => {
                write!(f, "vertical scale must be finite, got {v}")
            }
        }
    }
}

impl std::error::Error for StreakFieldError {}

impl StreakParams {
    /// Check the parameters without generating anything.
    ///
    /// # Errors
    ///
    /// Returns the first offending parameter.
    pub fn validate(&self) -> Result<(), StreakFieldError> {
        if !self.travel_length.is_finite() || self.travel_length <= 0.0 {
            return Err(StreakFieldError::TravelLength(self.travel_length));
        }
        if !self.road_width.is_finite() || self.road_width < 0.0 {
            return Err(StreakFieldError::RoadWidth(self.road_width));
        }
        if !self.vertical_scale.is_finite() {
            return Err(StreakFieldError::VerticalScale(self.vertical_scale));
        }
        Ok(())
    }
}

/// Generated per-instance attributes. Immutable once built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreakField {
    offsets: Vec<f32>,
    metrics: Vec<f32>,
}

impl StreakField {
    /// Offset records, [`OFFSET_STRIDE`] floats each.
    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    /// Metrics records, [`METRICS_STRIDE`] floats each.
    pub fn metrics(&self) -> &[f32] {
        &self.metrics
    }

    /// Number of instance records (twice the draw count).
    pub fn instance_count(&self) -> u32 {
        (self.offsets.len() / OFFSET_STRIDE) as u32
    }
}

/// Draw from `[lo, hi)`, rejecting the rare float rounding onto `hi`.
fn sample_half_open(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    loop {
        let v = lo + rng.random::<f32>() * (hi - lo);
        if v < hi {
            return v.max(lo);
        }
    }
}

/// Generate the mirrored streak records for `params`.
///
/// A pure function of its inputs and `rng`; nothing is returned when the
/// parameters are invalid.
///
/// # Errors
///
/// Returns [`StreakFieldError`] if `params` fails validation.
pub fn generate_streak_field(
    params: &StreakParams,
    rng: &mut impl Rng,
) -> Result<StreakField, StreakFieldError> {
    params.validate()?;

    let n = params.count as usize;
    let len = params.travel_length;
    let width = params.road_width;
    let mut offsets = Vec::with_capacity(n * 2 * OFFSET_STRIDE);
    let mut metrics = Vec::with_capacity(n * 2 * METRICS_STRIDE);

    for _ in 0..n {
        let radius = sample_half_open(rng, MIN_RADIUS, 0.0);
        let length = sample_half_open(
            rng,
            len * MIN_LENGTH_FRACTION,
            len * MAX_LENGTH_FRACTION,
        );
        let vertical = radius * params.vertical_scale;
        let depth = sample_half_open(rng, 0.0, len);

        for lateral in [width, -width] {
            offsets.extend_from_slice(&[lateral, vertical, depth]);
            metrics.extend_from_slice(&[radius, length]);
        }
    }

    log::debug!(
        "generated {} streak records (L = {len}, W = {width})",
        offsets.len() / OFFSET_STRIDE
    );
    Ok(StreakField { offsets, metrics })
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn field(count: u32, travel_length: f32, road_width: f32) -> StreakField {
        let params = StreakParams {
            count,
            travel_length,
            road_width,
            ..StreakParams::default()
        };
        generate_streak_field(&params, &mut StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn buffer_lengths_follow_count() {
        for n in [0, 1, 2, 17, 250] {
            let f = field(n, 200.0, 10.0);
            assert_eq!(f.offsets().len(), 6 * n as usize);
            assert_eq!(f.metrics().len(), 4 * n as usize);
            assert_eq!(f.instance_count(), 2 * n);
        }
    }

    #[test]
    fn default_scene_example() {
        let f = field(250, 200.0, 10.0);
        assert_eq!(f.offsets().len(), 1500);
        assert_eq!(f.metrics().len(), 1000);
        for m in f.metrics().chunks_exact(METRICS_STRIDE) {
            assert!(m[1] >= 4.0 && m[1] < 20.0, "length {}", m[1]);
        }
    }

    #[test]
    fn metrics_stay_in_range() {
        let l = 37.5;
        let f = field(500, l, 3.0);
        for m in f.metrics().chunks_exact(METRICS_STRIDE) {
            let (radius, length) = (m[0], m[1]);
            assert!((-0.5..0.0).contains(&radius), "radius {radius}");
            assert!(length >= 0.02 * l && length < 0.10 * l, "length {length}");
        }
    }

    #[test]
    fn records_come_in_mirrored_pairs() {
        let w = 10.0;
        let l = 200.0;
        let f = field(100, l, w);
        let offsets: Vec<&[f32]> = f.offsets().chunks_exact(OFFSET_STRIDE).collect();
        let metrics: Vec<&[f32]> = f.metrics().chunks_exact(METRICS_STRIDE).collect();
        for (pair, m) in offsets.chunks_exact(2).zip(metrics.chunks_exact(2)) {
            let (right, left) = (pair[0], pair[1]);
            assert_eq!(right[0], w);
            assert_eq!(left[0], -w);
            assert_eq!(right[1], left[1]);
            assert_eq!(right[2], left[2]);
            assert!(right[2] >= 0.0 && right[2] < l);
            assert_eq!(m[0], m[1]);
            // vertical offset follows the radius
            assert_eq!(right[1], m[0][0] * 15.0);
        }
    }

    #[test]
    fn same_seed_same_field() {
        let params = StreakParams::default();
        let a = generate_streak_field(&params, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate_streak_field(&params, &mut StdRng::seed_from_u64(42)).unwrap();
        let c = generate_streak_field(&params, &mut StdRng::seed_from_u64(43)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn zero_width_collapses_rows() {
        let f = field(10, 200.0, 0.0);
        assert!(f.offsets().chunks_exact(OFFSET_STRIDE).all(|o| o[0] == 0.0));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let bad = [
            (StreakParams { travel_length: 0.0, ..Default::default() }, StreakFieldError::TravelLength(0.0)),
            (StreakParams { travel_length: -5.0, ..Default::default() }, StreakFieldError::TravelLength(-5.0)),
            (StreakParams { road_width: -1.0, ..Default::default() }, StreakFieldError::RoadWidth(-1.0)),
        ];
        for (params, expected) in bad {
            assert_eq!(generate_streak_field(&params, &mut rng), Err(expected));
        }
        let nan = StreakParams { travel_length: f32::NAN, ..Default::default() };
        assert!(matches!(
            generate_streak_field(&nan, &mut rng),
            Err(StreakFieldError::TravelLength(_))
        ));
        let inf = StreakParams { road_width: f32::INFINITY, ..Default::default() };
        assert!(generate_streak_field(&inf, &mut rng).is_err());
    }
}
