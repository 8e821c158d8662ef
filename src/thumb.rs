//! The thumb image and its press animation.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::imageops::FilterType;
use image::{DynamicImage, Rgba as Pixel, RgbaImage};

use crate::error::{Result, SliderError};

/// Scale of the thumb while it is held.
pub const DRAG_SCALE: f64 = 1.2;
pub const REST_SCALE: f64 = 1.0;
pub const SCALE_ANIMATION: Duration = Duration::from_millis(350);

/// Opaque RGBA raster drawn as the drag handle.
#[derive(Debug, Clone)]
pub struct ThumbImage {
    pixels: Arc<RgbaImage>,
}

impl ThumbImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| SliderError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "loaded thumb image"
        );
        Ok(Self::new(decoded.to_rgba8()))
    }

    /// A filled clock face, used when no image is supplied.
    pub fn clock_face(side: u32) -> Self {
        let center = side as f64 / 2.0;
        let radius = center - 0.5;
        let face = Pixel([235, 235, 240, 255]);
        let hand = Pixel([30, 30, 40, 255]);
        let pixels = RgbaImage::from_fn(side, side, |x, y| {
            let dx = x as f64 + 0.5 - center;
            let dy = y as f64 + 0.5 - center;
            if dx * dx + dy * dy > radius * radius {
                return Pixel([0, 0, 0, 0]);
            }
            let hand_width = (side as f64 / 14.0).max(0.75);
            // Minute hand points up, hour hand points right.
            let on_minute = dx.abs() <= hand_width && dy <= 0.0 && -dy <= radius * 0.8;
            let on_hour = dy.abs() <= hand_width && dx >= 0.0 && dx <= radius * 0.55;
            if on_minute || on_hour { hand } else { face }
        });
        Self::new(pixels)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Resize to a `side × side` square, cropping to fill.
    pub fn scaled_to_fill(&self, side: u32) -> RgbaImage {
        if side == 0 || self.width() == 0 || self.height() == 0 {
            return RgbaImage::new(side, side);
        }
        DynamicImage::ImageRgba8(RgbaImage::clone(&self.pixels))
            .resize_to_fill(side, side, FilterType::Triangle)
            .to_rgba8()
    }
}

/// Ease-in-out interpolation of the thumb scale between rest and drag.
#[derive(Debug, Clone)]
pub struct ScaleAnimation {
    from: f64,
    to: f64,
    started: Option<Instant>,
    duration: Duration,
}

impl Default for ScaleAnimation {
    fn default() -> Self {
        Self::new(SCALE_ANIMATION)
    }
}

impl ScaleAnimation {
    pub fn new(duration: Duration) -> Self {
        Self {
            from: REST_SCALE,
            to: REST_SCALE,
            started: None,
            duration,
        }
    }

    /// Start animating toward `target` from wherever the scale is at `now`.
    pub fn retarget(&mut self, target: f64, now: Instant) {
        if self.to == target {
            return;
        }
        self.from = self.value(now);
        self.to = target;
        self.started = Some(now);
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn value(&self, now: Instant) -> f64 {
        let progress = self.progress(now);
        let eased = progress * progress * (3.0 - 2.0 * progress);
        self.from + (self.to - self.from) * eased
    }

    pub fn is_settled(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    fn progress(&self, now: Instant) -> f64 {
        match self.started {
            None => 1.0,
            Some(_) if self.duration.is_zero() => 1.0,
            Some(started) => {
                let elapsed = now.saturating_duration_since(started);
                (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
            }
        }
    }
}
