//! Immutable viewport description, recomputed on every resize.

/// Upper bound applied to the device pixel ratio.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Logical size plus clamped device pixel ratio of the drawing surface.
///
/// A `Viewport` is never mutated: the host builds a fresh one on every
/// resize and hands it to [`SceneEngine::resize`](crate::SceneEngine::resize).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    pixel_ratio: f64,
}

impl Viewport {
    /// Build a viewport from a logical size and the device pixel ratio.
    ///
    /// Returns `None` for zero-sized dimensions. Non-finite or
    /// non-positive ratios fall back to 1; ratios above
    /// [`MAX_PIXEL_RATIO`] are clamped.
    #[must_use]
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let pixel_ratio =
            if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
                device_pixel_ratio.min(MAX_PIXEL_RATIO)
            } else {
                1.0
            };
        Some(Self {
            width,
            height,
            pixel_ratio,
        })
    }

    /// Build a viewport from a physical (already scaled) size, as reported
    /// by native windowing.
    #[must_use]
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        let logical = |px: u32| ((f64::from(px) / scale).round() as u32).max(1);
        Self::new(logical(width), logical(height), scale)
    }

    /// Logical width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Logical height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Logical `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Clamped device pixel ratio.
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Camera aspect ratio, exactly `width / height`.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Back-buffer size in physical pixels (logical size scaled by the
    /// clamped pixel ratio, never zero).
    pub fn physical_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((f64::from(v) * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_is_width_over_height() {
        let vp = Viewport::new(1920, 1080, 1.0).unwrap();
        assert_eq!(vp.aspect(), 1920.0 / 1080.0);
        assert_eq!(vp.size(), (1920, 1080));
    }

    #[test]
    fn pixel_ratio_is_clamped() {
        let vp = Viewport::new(800, 600, 3.0).unwrap();
        assert_eq!(vp.pixel_ratio(), 2.0);
        assert_eq!(vp.physical_size(), (1600, 1200));

        let vp = Viewport::new(800, 600, 1.5).unwrap();
        assert_eq!(vp.pixel_ratio(), 1.5);
        assert_eq!(vp.physical_size(), (1200, 900));
    }

    #[test]
    fn invalid_pixel_ratio_falls_back_to_one() {
        assert_eq!(Viewport::new(10, 10, f64::NAN).unwrap().pixel_ratio(), 1.0);
        assert_eq!(Viewport::new(10, 10, 0.0).unwrap().pixel_ratio(), 1.0);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(Viewport::new(0, 600, 1.0).is_none());
        assert!(Viewport::new(800, 0, 1.0).is_none());
        assert!(Viewport::from_physical(0, 0, 2.0).is_none());
    }

    #[test]
    fn physical_sizes_convert_back_to_logical() {
        let vp = Viewport::from_physical(2560, 1440, 2.0).unwrap();
        assert_eq!(vp.size(), (1280, 720));
        assert_eq!(vp.physical_size(), (2560, 1440));
    }

    #[test]
    fn high_dpi_physical_sizes_are_clamped() {
        let vp = Viewport::from_physical(3000, 1500, 3.0).unwrap();
        assert_eq!(vp.size(), (1000, 500));
        assert_eq!(vp.pixel_ratio(), 2.0);
        assert_eq!(vp.physical_size(), (2000, 1000));
    }
}
