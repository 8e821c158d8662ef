//! Paints an [`ImageSlider`] into a ratatui buffer.
//!
//! Each terminal cell holds two vertically stacked pixels drawn with an upper
//! half block: the foreground is the top pixel and the background the bottom
//! one. A `w × h` cell area is therefore measured as `w × 2h` pixels.

use std::time::Instant;

use image::RgbaImage;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use crate::frame::SliderFrame;
use crate::geometry::Size;
use crate::gradient::{self, Rgba};
use crate::slider::ImageSlider;

const HALF_BLOCK: &str = "▀";

impl Widget for &mut ImageSlider {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_at(area, buf, Instant::now());
    }
}

impl ImageSlider {
    /// Pixel size of a cell area.
    pub fn measure_area(area: Rect) -> Size {
        Size::new(area.width as f64, area.height as f64 * 2.0)
    }

    /// Render as of `now`; the widget impl passes the current instant.
    pub fn render_at(&mut self, area: Rect, buf: &mut Buffer, now: Instant) {
        self.area = Some(area);
        if area.is_empty() {
            return;
        }
        let (track, thumb) = {
            let frame = self.frame(Self::measure_area(area), now);
            (frame.track, frame.thumb)
        };
        let side = thumb.rect.width.round().max(0.0) as u32;
        let raster = self.scaled_thumb(side);
        let frame = SliderFrame {
            track,
            colors: self.configuration().colors(),
            thumb,
        };
        paint(&frame, &raster, area, buf);
    }
}

fn paint(frame: &SliderFrame<'_>, thumb: &RgbaImage, area: Rect, buf: &mut Buffer) {
    for row in 0..area.height {
        for column in 0..area.width {
            let x = column as f64 + 0.5;
            let top = pixel_at(frame, thumb, x, row as f64 * 2.0 + 0.5);
            let bottom = pixel_at(frame, thumb, x, row as f64 * 2.0 + 1.5);
            if top.is_none() && bottom.is_none() {
                continue;
            }
            let Some(cell) = buf.cell_mut((area.x + column, area.y + row)) else {
                continue;
            };
            let background = Rgba::from_color(cell.bg);
            let top = top.map_or(background, |color| color.over(background));
            let bottom = bottom.map_or(background, |color| color.over(background));
            cell.set_symbol(HALF_BLOCK)
                .set_fg(top.to_color())
                .set_bg(bottom.to_color());
        }
    }
}

/// Track gradient with the thumb composited on top, `None` where neither is.
fn pixel_at(frame: &SliderFrame<'_>, thumb: &RgbaImage, x: f64, y: f64) -> Option<Rgba> {
    let track = frame
        .track
        .contains(x, y)
        .then(|| gradient::sample(frame.colors, frame.gradient_position(x)));
    match (thumb_pixel(frame, thumb, x, y), track) {
        (Some(pixel), Some(track)) => Some(pixel.over(track)),
        (Some(pixel), None) => Some(pixel),
        (None, track) => track,
    }
}

fn thumb_pixel(frame: &SliderFrame<'_>, thumb: &RgbaImage, x: f64, y: f64) -> Option<Rgba> {
    let rect = frame.thumb.rect;
    let (width, height) = thumb.dimensions();
    if width == 0 || height == 0 || rect.width <= 0.0 || !rect.contains(x, y) {
        return None;
    }
    let ix = (((x - rect.x) / rect.width) * width as f64).floor() as u32;
    let iy = (((y - rect.y) / rect.height) * height as f64).floor() as u32;
    Some(Rgba::from(*thumb.get_pixel(ix.min(width - 1), iy.min(height - 1))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Binding;
    use crate::config::SliderConfiguration;
    use crate::thumb::{SCALE_ANIMATION, ThumbImage};
    use ratatui::style::Color;

    const RED: Color = Color::Rgb(255, 0, 0);
    const BLUE: Color = Color::Rgb(0, 0, 255);

    fn slider(value: f64) -> ImageSlider {
        let thumb = ThumbImage::new(RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 255, 255])));
        let configuration =
            SliderConfiguration::new(1.0..=100.0, 10.0, thumb, vec![Rgba::rgb(255, 0, 0)])
                .unwrap();
        ImageSlider::new(Binding::new(value), configuration)
    }

    fn colors(buf: &Buffer, x: u16, y: u16) -> (Color, Color) {
        let cell = &buf[(x, y)];
        (cell.fg, cell.bg)
    }

    #[test]
    fn paints_thumb_at_the_start_and_track_elsewhere() {
        let area = Rect::new(0, 0, 40, 2);
        let mut buf = Buffer::empty(area);
        let mut slider = slider(1.0);
        slider.render_at(area, &mut buf, Instant::now());

        for column in 0..4 {
            assert_eq!(colors(&buf, column, 0), (BLUE, BLUE));
            assert_eq!(colors(&buf, column, 1), (BLUE, BLUE));
        }
        assert_eq!(colors(&buf, 20, 0), (RED, RED));
        // The bottom pixel row lies below the 75% track.
        assert_eq!(colors(&buf, 20, 1), (RED, Color::Rgb(0, 0, 0)));
        assert_eq!(buf[(20, 0)].symbol(), HALF_BLOCK);
    }

    #[test]
    fn render_records_area_for_hit_testing() {
        let area = Rect::new(2, 3, 40, 2);
        let mut buf = Buffer::empty(Rect::new(0, 0, 50, 10));
        let mut slider = slider(1.0);
        slider.render_at(area, &mut buf, Instant::now());
        assert_eq!(slider.thumb_area(), Some(Rect::new(2, 3, 4, 2)));
    }

    #[test]
    fn external_write_moves_thumb_on_next_render() {
        let area = Rect::new(0, 0, 40, 2);
        let mut slider = slider(1.0);
        slider.render_at(area, &mut Buffer::empty(area), Instant::now());

        slider.binding().set(51.0);
        let mut buf = Buffer::empty(area);
        slider.render_at(area, &mut buf, Instant::now());
        assert!((slider.internal_position() - 5.1).abs() < 1e-12);
        // 4.1 step-units at 36/9.9 columns each puts the thumb at ~14.9.
        assert_eq!(colors(&buf, 14, 0).0, RED);
        for column in 15..19 {
            assert_eq!(colors(&buf, column, 0).0, BLUE);
        }
        assert_eq!(colors(&buf, 19, 0).0, RED);
    }

    #[test]
    fn dragged_thumb_lands_at_the_right_edge() {
        let area = Rect::new(0, 0, 40, 2);
        let start = Instant::now();
        let mut slider = slider(1.0);
        slider.render_at(area, &mut Buffer::empty(area), start);
        slider.drag_started(start);
        slider.drag_changed(0.0, start);
        slider.drag_changed(100.0, start);
        slider.drag_ended(start);
        assert_eq!(slider.value(), 91.0);

        let mut buf = Buffer::empty(area);
        slider.render_at(area, &mut buf, start + SCALE_ANIMATION);
        for column in 36..40 {
            assert_eq!(colors(&buf, column, 0).0, BLUE);
        }
        assert_eq!(colors(&buf, 35, 0).0, RED);
    }

    #[test]
    fn held_thumb_renders_larger() {
        let area = Rect::new(0, 0, 40, 5);
        let start = Instant::now();
        let mut slider = slider(1.0);
        slider.render_at(area, &mut Buffer::empty(area), start);
        slider.drag_started(start);

        let mut buf = Buffer::empty(area);
        slider.render_at(area, &mut buf, start + SCALE_ANIMATION);
        // 10 pixels scaled by 1.2 spill one column past the unscaled thumb.
        assert_eq!(colors(&buf, 10, 2).0, BLUE);
        assert_eq!(colors(&buf, 11, 2).0, RED);
    }

    #[test]
    fn empty_area_is_a_no_op() {
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 4));
        let mut slider = slider(1.0);
        slider.render_at(area, &mut buf, Instant::now());
        assert_eq!(buf, Buffer::empty(Rect::new(0, 0, 4, 4)));
    }
}
