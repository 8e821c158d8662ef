//! Pure description of what one slider render draws.

use crate::geometry::SliderGeometry;
use crate::gradient::Rgba;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Same center, both sides multiplied by `scale`.
    pub fn scaled_about_center(&self, scale: f64) -> PixelRect {
        let width = self.width * scale;
        let height = self.height * scale;
        PixelRect {
            x: self.x + (self.width - width) / 2.0,
            y: self.y + (self.height - height) / 2.0,
            width,
            height,
        }
    }
}

/// Rounded bar behind the thumb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackShape {
    pub rect: PixelRect,
    pub corner_radius: f64,
}

impl TrackShape {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        if !self.rect.contains(x, y) {
            return false;
        }
        let radius = self
            .corner_radius
            .min(self.rect.width / 2.0)
            .min(self.rect.height / 2.0)
            .max(0.0);
        // Distance from the inner rectangle the corners are swept around.
        let nearest_x = x.clamp(self.rect.x + radius, self.rect.right() - radius);
        let nearest_y = y.clamp(self.rect.y + radius, self.rect.bottom() - radius);
        let (dx, dy) = (x - nearest_x, y - nearest_y);
        dx * dx + dy * dy <= radius * radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbShape {
    /// Unscaled leading-edge offset along the track.
    pub offset_x: f64,
    pub scale: f64,
    /// Where the image lands after scaling about its center.
    pub rect: PixelRect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliderFrame<'a> {
    pub track: TrackShape,
    pub colors: &'a [Rgba],
    pub thumb: ThumbShape,
}

impl SliderFrame<'_> {
    /// Gradient position of a horizontal pixel coordinate, `0.0..=1.0`.
    pub fn gradient_position(&self, x: f64) -> f64 {
        let track = self.track.rect;
        if track.width <= 0.0 {
            return 0.0;
        }
        ((x - track.x) / track.width).clamp(0.0, 1.0)
    }
}

pub fn describe<'a>(
    geometry: &SliderGeometry,
    thumb_offset: f64,
    scale: f64,
    colors: &'a [Rgba],
) -> SliderFrame<'a> {
    let size = geometry.size;
    let track_height = geometry.track_height();
    let track = TrackShape {
        rect: PixelRect::new(0.0, (size.height - track_height) / 2.0, size.width, track_height),
        corner_radius: geometry.corner_radius,
    };
    let unscaled = PixelRect::new(thumb_offset, 0.0, geometry.thumb_size, geometry.thumb_size);
    SliderFrame {
        track,
        colors,
        thumb: ThumbShape {
            offset_x: thumb_offset,
            scale,
            rect: unscaled.scaled_about_center(scale),
        },
    }
}
