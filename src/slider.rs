//! The image slider control.
//!
//! `ImageSlider` owns the runtime state of one slider: where the thumb sits
//! in step-units, the drag anchor, and whether a drag is in flight. The value
//! it reports lives in a shared [`Binding`]; the control writes it on every
//! drag update and picks up writes made by the caller on the next layout or
//! gesture.

use std::rc::Rc;
use std::time::Instant;

use crossterm::event::MouseEvent;
use image::RgbaImage;
use ratatui::layout::{Position, Rect};

use crate::binding::Binding;
use crate::config::SliderConfiguration;
use crate::drag::{AnchorPolicy, DragState, DragUpdate};
use crate::frame::{self, SliderFrame};
use crate::geometry::{EffectiveRange, SliderGeometry, Size};
use crate::gesture::{GestureEvent, GestureRecognizer};
use crate::haptics::{DRAG_INTENSITY, Haptics, SilentHaptics};
use crate::thumb::{DRAG_SCALE, REST_SCALE, ScaleAnimation};

pub struct ImageSlider {
    configuration: SliderConfiguration,
    value: Binding<f64>,
    seen_version: u64,
    range: EffectiveRange,
    internal_position: f64,
    drag: DragState,
    haptics: Box<dyn Haptics>,
    scale: ScaleAnimation,
    gestures: GestureRecognizer,
    geometry: Option<SliderGeometry>,
    pub(crate) area: Option<Rect>,
    thumb_cache: Option<(u32, Rc<RgbaImage>)>,
}

impl ImageSlider {
    pub fn new(value: Binding<f64>, configuration: SliderConfiguration) -> Self {
        let range = EffectiveRange::new(
            configuration.lower(),
            configuration.upper(),
            configuration.step(),
        );
        let internal_position = value.get() / configuration.step();
        tracing::debug!(
            lower = range.lower,
            upper = range.upper,
            internal_position,
            "created image slider"
        );
        Self {
            seen_version: value.version(),
            configuration,
            value,
            range,
            internal_position,
            drag: DragState::default(),
            haptics: Box::new(SilentHaptics),
            scale: ScaleAnimation::default(),
            gestures: GestureRecognizer::default(),
            geometry: None,
            area: None,
            thumb_cache: None,
        }
    }

    pub fn haptics(mut self, haptics: Box<dyn Haptics>) -> Self {
        self.haptics = haptics;
        self
    }

    pub fn anchor_policy(mut self, policy: AnchorPolicy) -> Self {
        self.drag = DragState::new(policy);
        self
    }

    pub fn configuration(&self) -> &SliderConfiguration {
        &self.configuration
    }

    pub fn binding(&self) -> &Binding<f64> {
        &self.value
    }

    pub fn value(&self) -> f64 {
        self.value.get()
    }

    pub fn effective_range(&self) -> EffectiveRange {
        self.range
    }

    /// Thumb position in step-units as of the last layout or gesture.
    pub fn internal_position(&self) -> f64 {
        self.internal_position
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn drag_anchor(&self) -> f64 {
        self.drag.anchor()
    }

    pub fn geometry(&self) -> Option<SliderGeometry> {
        self.geometry
    }

    /// True while the press animation still has frames to show.
    pub fn is_animating(&self, now: Instant) -> bool {
        !self.scale.is_settled(now)
    }

    /// Re-derive the thumb position if the caller wrote the binding.
    pub fn sync_external(&mut self) -> bool {
        let version = self.value.version();
        if version == self.seen_version {
            return false;
        }
        self.seen_version = version;
        self.internal_position = self.value.get() / self.configuration.step();
        tracing::debug!(
            value = self.value.get(),
            internal_position = self.internal_position,
            "picked up external value"
        );
        true
    }

    /// Measure against a new bounding box.
    pub fn layout(&mut self, size: Size) -> SliderGeometry {
        self.sync_external();
        let geometry = SliderGeometry::measure(size, self.range);
        self.geometry = Some(geometry);
        geometry
    }

    /// Current thumb pixel offset, zero before the first layout.
    pub fn thumb_offset(&self) -> f64 {
        self.geometry
            .map(|geometry| geometry.thumb_offset(self.internal_position, self.range))
            .unwrap_or(0.0)
    }

    /// Lay out for `size` and describe what to draw at `now`.
    pub fn frame(&mut self, size: Size, now: Instant) -> SliderFrame<'_> {
        let geometry = self.layout(size);
        frame::describe(
            &geometry,
            self.thumb_offset(),
            self.scale.value(now),
            self.configuration.colors(),
        )
    }

    pub fn drag_started(&mut self, now: Instant) {
        self.sync_external();
        self.drag.start(self.thumb_offset());
        self.scale.retarget(DRAG_SCALE, now);
        self.haptics.impact(DRAG_INTENSITY);
        tracing::debug!(value = self.value.get(), "drag started");
    }

    /// Apply a cumulative translation. `None` when nothing was emitted: before
    /// the first layout, or while the pointer has not moved yet.
    pub fn drag_changed(&mut self, delta_x: f64, now: Instant) -> Option<DragUpdate> {
        self.sync_external();
        self.scale.retarget(DRAG_SCALE, now);
        let Some(geometry) = self.geometry else {
            tracing::debug!(delta_x, "drag before first layout ignored");
            return None;
        };
        let update = self.drag.change(
            delta_x,
            self.thumb_offset(),
            &geometry,
            self.range,
            self.configuration.step(),
        );
        self.haptics.impact(DRAG_INTENSITY);
        let update = update?;
        self.internal_position = update.internal_position;
        self.seen_version = self.value.set(update.value);
        tracing::trace!(
            delta_x,
            offset = update.candidate_offset,
            value = update.value,
            "drag changed"
        );
        Some(update)
    }

    pub fn drag_ended(&mut self, now: Instant) {
        self.drag.end();
        self.scale.retarget(REST_SCALE, now);
        tracing::debug!(value = self.value.get(), "drag ended");
    }

    /// Interrupted gestures end like normal ones; emitted values stay.
    pub fn drag_cancelled(&mut self, now: Instant) {
        self.drag.end();
        self.scale.retarget(REST_SCALE, now);
        tracing::debug!(value = self.value.get(), "drag cancelled");
    }

    pub fn apply(&mut self, event: GestureEvent, now: Instant) {
        match event {
            GestureEvent::Started => self.drag_started(now),
            GestureEvent::Changed { delta_x } => {
                self.drag_changed(delta_x, now);
            }
            GestureEvent::Ended => self.drag_ended(now),
            GestureEvent::Cancelled => self.drag_cancelled(now),
        }
    }

    /// Terminal cells covered by the unscaled thumb at the last render.
    pub fn thumb_area(&self) -> Option<Rect> {
        let area = self.area?;
        let geometry = self.geometry?;
        let offset = self.thumb_offset();
        let x = area.x.saturating_add(offset.floor() as u16);
        let right = area
            .x
            .saturating_add((offset + geometry.thumb_size).ceil() as u16);
        let thumb = Rect::new(x, area.y, right.saturating_sub(x), area.height);
        Some(thumb.intersection(area))
    }

    /// Feed a mouse report through the drag recognizer. Returns whether the
    /// slider consumed it.
    pub fn handle_mouse(&mut self, event: &MouseEvent, now: Instant) -> bool {
        let on_thumb = self
            .thumb_area()
            .is_some_and(|thumb| thumb.contains(Position::new(event.column, event.row)));
        let events = self.gestures.handle(event, on_thumb);
        let consumed = !events.is_empty();
        for event in events {
            self.apply(event, now);
        }
        consumed
    }

    /// Abort a drag in flight, e.g. when the terminal loses focus.
    pub fn cancel_gesture(&mut self, now: Instant) {
        if let Some(event) = self.gestures.cancel() {
            self.apply(event, now);
        }
    }

    /// The thumb image resized to `side` pixels, cached between frames.
    pub(crate) fn scaled_thumb(&mut self, side: u32) -> Rc<RgbaImage> {
        match &self.thumb_cache {
            Some((cached, pixels)) if *cached == side => Rc::clone(pixels),
            _ => {
                let pixels = Rc::new(self.configuration.image().scaled_to_fill(side));
                self.thumb_cache = Some((side, Rc::clone(&pixels)));
                pixels
            }
        }
    }
}

impl std::fmt::Debug for ImageSlider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSlider")
            .field("value", &self.value.get())
            .field("range", &self.range)
            .field("internal_position", &self.internal_position)
            .field("drag", &self.drag)
            .field("geometry", &self.geometry)
            .finish_non_exhaustive()
    }
}
