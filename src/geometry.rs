//! Layout arithmetic shared by dragging and rendering.

/// Measured bounding box in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The configured range re-expressed in step-units:
/// `[lower, lower + (upper - lower) / step]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveRange {
    pub lower: f64,
    pub upper: f64,
    span: f64,
}

impl EffectiveRange {
    pub fn new(lower: f64, upper: f64, step: f64) -> Self {
        let span = (upper - lower) / step;
        Self {
            lower,
            upper: lower + span,
            span,
        }
    }

    /// Width in step-units, `(upper - lower) / step` of the configured range.
    pub fn span(&self) -> f64 {
        self.span
    }
}

/// Share of the control height covered by the track.
pub const TRACK_HEIGHT_RATIO: f64 = 0.75;

/// Per-layout constants derived from the measured box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderGeometry {
    pub size: Size,
    pub thumb_size: f64,
    pub corner_radius: f64,
    /// Horizontal pixels the thumb can travel.
    pub max_travel: f64,
    /// Pixels per step-unit. Zero when there is nowhere to travel.
    pub scale_factor: f64,
}

impl SliderGeometry {
    pub fn measure(size: Size, range: EffectiveRange) -> Self {
        let thumb_size = size.height.max(0.0);
        let max_travel = (size.width - thumb_size).max(0.0);
        let span = range.span();
        let scale_factor = if span > 0.0 && max_travel > 0.0 {
            max_travel / span
        } else {
            0.0
        };
        Self {
            size,
            thumb_size,
            corner_radius: thumb_size / 2.0,
            max_travel,
            scale_factor,
        }
    }

    /// Pixel offset of the thumb's leading edge for a step-unit position.
    pub fn thumb_offset(&self, internal_position: f64, range: EffectiveRange) -> f64 {
        ((internal_position - range.lower) * self.scale_factor).max(0.0)
    }

    pub fn track_height(&self) -> f64 {
        self.size.height * TRACK_HEIGHT_RATIO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn effective_range_is_in_step_units() {
        let range = EffectiveRange::new(1.0, 100.0, 10.0);
        assert_relative_eq!(range.lower, 1.0);
        assert_relative_eq!(range.upper, 10.9, epsilon = 1e-12);
    }

    #[test]
    fn measures_a_300_by_44_box() {
        let geometry = SliderGeometry::measure(
            Size::new(300.0, 44.0),
            EffectiveRange::new(1.0, 100.0, 10.0),
        );
        assert_relative_eq!(geometry.thumb_size, 44.0);
        assert_relative_eq!(geometry.corner_radius, 22.0);
        assert_relative_eq!(geometry.max_travel, 256.0);
        assert_relative_eq!(geometry.scale_factor, 256.0 / 9.9, epsilon = 1e-9);
        assert_relative_eq!(geometry.track_height(), 33.0);
    }

    #[test]
    fn offset_never_goes_negative() {
        let range = EffectiveRange::new(1.0, 100.0, 10.0);
        let geometry = SliderGeometry::measure(Size::new(300.0, 44.0), range);
        // An initial value of 1 maps to 0.1 step-units, left of the range.
        assert_eq!(geometry.thumb_offset(0.1, range), 0.0);
        assert_relative_eq!(geometry.thumb_offset(5.1, range), 4.1 * 256.0 / 9.9, epsilon = 1e-9);
    }

    #[test]
    fn narrow_box_has_no_travel() {
        let range = EffectiveRange::new(0.0, 10.0, 1.0);
        let geometry = SliderGeometry::measure(Size::new(20.0, 44.0), range);
        assert_eq!(geometry.max_travel, 0.0);
        assert_eq!(geometry.scale_factor, 0.0);
        assert_eq!(geometry.thumb_offset(7.0, range), 0.0);
    }

    #[test]
    fn zero_span_has_no_scale() {
        let range = EffectiveRange::new(3.0, 3.0, 1.0);
        let geometry = SliderGeometry::measure(Size::new(300.0, 44.0), range);
        assert_eq!(geometry.scale_factor, 0.0);
    }
}
