use std::path::PathBuf;
use thiserror::Error;

/// A slider configuration that would produce undefined geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidConfiguration {
    #[error("step must be a positive finite number, got {0}")]
    NonPositiveStep(f64),

    #[error("range bounds must be finite")]
    NonFiniteBound,

    #[error("range upper bound {upper} is below lower bound {lower}")]
    InvertedRange { lower: f64, upper: f64 },

    #[error("gradient needs at least one color")]
    EmptyColors,
}

#[derive(Debug, Error)]
pub enum SliderError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] InvalidConfiguration),

    #[error("invalid color {0:?}, expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error("failed to load thumb image: {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read slider config: {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse slider config: {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, SliderError>;
