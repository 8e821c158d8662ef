//! Slider configuration and its on-disk TOML form.

use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{InvalidConfiguration, Result, SliderError};
use crate::gradient::Rgba;
use crate::thumb::ThumbImage;

/// Side length of the built-in thumb raster.
pub const DEFAULT_THUMB_SIDE: u32 = 64;

/// Range, step, thumb image and track colors for one slider.
///
/// Immutable once built; `new` rejects anything that would make the drag
/// arithmetic divide by zero or invert.
#[derive(Debug, Clone)]
pub struct SliderConfiguration {
    range: RangeInclusive<f64>,
    step: f64,
    image: ThumbImage,
    colors: Vec<Rgba>,
}

impl SliderConfiguration {
    pub fn new(
        range: RangeInclusive<f64>,
        step: f64,
        image: ThumbImage,
        colors: Vec<Rgba>,
    ) -> std::result::Result<Self, InvalidConfiguration> {
        let (lower, upper) = (*range.start(), *range.end());
        if !(step.is_finite() && step > 0.0) {
            return Err(InvalidConfiguration::NonPositiveStep(step));
        }
        if !(lower.is_finite() && upper.is_finite()) {
            return Err(InvalidConfiguration::NonFiniteBound);
        }
        if upper < lower {
            return Err(InvalidConfiguration::InvertedRange { lower, upper });
        }
        if colors.is_empty() {
            return Err(InvalidConfiguration::EmptyColors);
        }
        Ok(Self {
            range,
            step,
            image,
            colors,
        })
    }

    pub fn range(&self) -> &RangeInclusive<f64> {
        &self.range
    }

    pub fn lower(&self) -> f64 {
        *self.range.start()
    }

    pub fn upper(&self) -> f64 {
        *self.range.end()
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn image(&self) -> &ThumbImage {
        &self.image
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }
}

/// A slider described in TOML:
///
/// ```toml
/// range = [1.0, 100.0]
/// step = 10.0
/// value = 1.0
/// image = "thumb.png"
/// colors = ["#34c75999", "#ff3b30cc"]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SliderSpec {
    pub range: [f64; 2],
    pub step: f64,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub image: Option<PathBuf>,
    pub colors: Vec<Rgba>,
}

impl Default for SliderSpec {
    /// Green-to-red track over `1..=100` in steps of 10.
    fn default() -> Self {
        Self {
            range: [1.0, 100.0],
            step: 10.0,
            value: None,
            image: None,
            colors: vec![
                Rgba::rgb(52, 199, 89).with_opacity(0.6),
                Rgba::rgb(255, 59, 48).with_opacity(0.8),
            ],
        }
    }
}

impl FromStr for SliderSpec {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

impl SliderSpec {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SliderError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let spec = text.parse().map_err(|source| SliderError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "loaded slider config");
        Ok(spec)
    }

    /// Initial bound value; the range's lower bound when unset.
    pub fn initial_value(&self) -> f64 {
        self.value.unwrap_or(self.range[0])
    }

    pub fn into_configuration(self) -> Result<SliderConfiguration> {
        let image = match &self.image {
            Some(path) => ThumbImage::open(path)?,
            None => ThumbImage::clock_face(DEFAULT_THUMB_SIDE),
        };
        let [lower, upper] = self.range;
        Ok(SliderConfiguration::new(
            lower..=upper,
            self.step,
            image,
            self.colors,
        )?)
    }
}
