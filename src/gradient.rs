//! Colors and the left-to-right linear gradient used by the track.

use std::str::FromStr;

use ratatui::style::Color;
use serde::Deserialize;

use crate::error::SliderError;

/// An 8-bit RGBA color. Alpha is straight (not premultiplied).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with alpha set from a 0.0..=1.0 opacity.
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: (opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Composite `self` over `background` (source-over).
    pub fn over(self, background: Rgba) -> Rgba {
        let src_a = self.a as f64 / 255.0;
        let dst_a = background.a as f64 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return Rgba::TRANSPARENT;
        }
        let channel = |s: u8, d: u8| {
            ((s as f64 * src_a + d as f64 * dst_a * (1.0 - src_a)) / out_a).round() as u8
        };
        Rgba {
            r: channel(self.r, background.r),
            g: channel(self.g, background.g),
            b: channel(self.b, background.b),
            a: (out_a * 255.0).round() as u8,
        }
    }

    pub fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }

    /// Best-effort RGB for a terminal color already in the buffer.
    ///
    /// Palette colors depend on the terminal theme, so anything that is not an
    /// explicit RGB value is treated as black except white.
    pub fn from_color(color: Color) -> Rgba {
        match color {
            Color::Rgb(r, g, b) => Rgba::rgb(r, g, b),
            Color::White => Rgba::WHITE,
            _ => Rgba::BLACK,
        }
    }
}

impl From<image::Rgba<u8>> for Rgba {
    fn from(pixel: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = pixel.0;
        Rgba::new(r, g, b, a)
    }
}

impl FromStr for Rgba {
    type Err = SliderError;

    /// Parses `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SliderError::InvalidColor(s.to_string());
        let hex = s.trim().trim_start_matches('#');
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Rgba::new(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

impl TryFrom<String> for Rgba {
    type Error = SliderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Color of an evenly spaced multi-stop gradient at `t` in `0.0..=1.0`.
///
/// An empty stop list yields transparent; configurations reject that case
/// before it reaches rendering.
pub fn sample(stops: &[Rgba], t: f64) -> Rgba {
    match stops {
        [] => Rgba::TRANSPARENT,
        [only] => *only,
        _ => {
            let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
            let segments = (stops.len() - 1) as f64;
            let position = t * segments;
            let index = (position.floor() as usize).min(stops.len() - 2);
            stops[index].lerp(stops[index + 1], position - index as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!("#ff8000".parse::<Rgba>().unwrap(), Rgba::rgb(255, 128, 0));
        assert_eq!("00ff0099".parse::<Rgba>().unwrap(), Rgba::new(0, 255, 0, 0x99));
        assert!("#ff80".parse::<Rgba>().is_err());
        assert!("#gg0000".parse::<Rgba>().is_err());
    }

    #[test]
    fn gradient_endpoints_match_first_and_last_stop() {
        let stops = [Rgba::rgb(0, 0, 0), Rgba::rgb(100, 0, 0), Rgba::rgb(200, 0, 0)];
        assert_eq!(sample(&stops, 0.0), stops[0]);
        assert_eq!(sample(&stops, 1.0), stops[2]);
        assert_eq!(sample(&stops, 0.5), stops[1]);
        assert_eq!(sample(&stops, 0.25), Rgba::rgb(50, 0, 0));
    }

    #[test]
    fn single_stop_is_flat() {
        let stops = [Rgba::rgb(1, 2, 3)];
        assert_eq!(sample(&stops, 0.7), stops[0]);
    }

    #[test]
    fn opaque_source_replaces_background() {
        let red = Rgba::rgb(255, 0, 0);
        assert_eq!(red.over(Rgba::WHITE), red);
        assert_eq!(Rgba::TRANSPARENT.over(Rgba::WHITE), Rgba::WHITE);
    }

    #[test]
    fn half_transparent_blends() {
        let half_white = Rgba::WHITE.with_opacity(0.5);
        let blended = half_white.over(Rgba::BLACK);
        assert_eq!(blended.a, 255);
        assert!((127..=128).contains(&blended.r));
    }
}
