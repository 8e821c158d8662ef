//! Drag gesture to value mapping.
//!
//! Everything here is pure arithmetic over the measured [`SliderGeometry`];
//! the control feeds it gesture events and applies the resulting
//! [`DragUpdate`].

use crate::geometry::{EffectiveRange, SliderGeometry};

/// Translations smaller than this count as "the gesture just began".
pub const ANCHOR_RESET_THRESHOLD: f64 = 0.1;

/// When the drag anchor is latched to the thumb's current offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorPolicy {
    /// Latch whenever `|delta_x| < 0.1`. Also re-latches if a drag passes
    /// back through zero translation mid-gesture.
    #[default]
    TranslationHeuristic,
    /// Latch once on the drag start event only.
    ExplicitStart,
}

/// Result of one `dragChanged` event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    /// Thumb offset after clamping to the track, in pixels.
    pub candidate_offset: f64,
    /// Continuous position in step-units relative to the range start.
    pub step_units: f64,
    /// Quantized value reported to the caller.
    pub value: f64,
    /// Unquantized position used to place the thumb.
    pub internal_position: f64,
}

/// Clamp `anchor + delta_x` to `[0, max_travel]`.
///
/// The anchor can sit past `max_travel` when the caller wrote a value beyond
/// the range, so both directions clamp on both sides.
pub fn candidate_offset(anchor: f64, delta_x: f64, max_travel: f64) -> f64 {
    let max_travel = max_travel.max(0.0);
    if delta_x > 0.0 {
        max_travel.min(anchor + delta_x).max(0.0)
    } else {
        (anchor + delta_x).max(0.0).min(max_travel)
    }
}

/// Truncate to the step boundary at or below `step_units`.
pub fn quantize(step_units: f64, step: f64, lower: f64) -> f64 {
    step_units.floor() * step + lower
}

pub fn map_drag(
    anchor: f64,
    delta_x: f64,
    geometry: &SliderGeometry,
    range: EffectiveRange,
    step: f64,
) -> DragUpdate {
    let candidate = candidate_offset(anchor, delta_x, geometry.max_travel);
    let step_units = if geometry.scale_factor > 0.0 {
        (candidate / geometry.scale_factor).clamp(0.0, range.span())
    } else {
        0.0
    };
    DragUpdate {
        candidate_offset: candidate,
        step_units,
        value: quantize(step_units, step, range.lower),
        internal_position: step_units + range.lower,
    }
}

/// Anchor and dragging flag for the gesture in flight.
#[derive(Debug, Clone, Default)]
pub struct DragState {
    policy: AnchorPolicy,
    anchor: f64,
    is_dragging: bool,
    moved: bool,
}

impl DragState {
    pub fn new(policy: AnchorPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> AnchorPolicy {
        self.policy
    }

    pub fn anchor(&self) -> f64 {
        self.anchor
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn start(&mut self, thumb_offset: f64) {
        self.is_dragging = true;
        self.moved = false;
        if self.policy == AnchorPolicy::ExplicitStart {
            self.anchor = thumb_offset;
        }
    }

    /// `delta_x` is the cumulative translation since the gesture started.
    ///
    /// Returns `None` until the pointer has actually moved in this gesture,
    /// so a press that never travels leaves the value alone.
    pub fn change(
        &mut self,
        delta_x: f64,
        thumb_offset: f64,
        geometry: &SliderGeometry,
        range: EffectiveRange,
        step: f64,
    ) -> Option<DragUpdate> {
        let at_origin = delta_x.abs() < ANCHOR_RESET_THRESHOLD;
        if self.policy == AnchorPolicy::TranslationHeuristic && at_origin {
            self.anchor = thumb_offset;
        }
        self.is_dragging = true;
        self.moved |= !at_origin;
        if !self.moved {
            return None;
        }
        Some(map_drag(self.anchor, delta_x, geometry, range, step))
    }

    /// Ends or cancels the gesture. Values already emitted stay.
    pub fn end(&mut self) {
        self.is_dragging = false;
        self.moved = false;
    }
}
