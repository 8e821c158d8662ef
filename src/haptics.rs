//! Impact feedback fired while the thumb is dragged.
//!
//! Terminals have no vibration motor, so the audible variant plays a very
//! short decaying sine blip through the default audio output. Feedback is
//! best effort: a missing device or a failed play is logged and ignored.

use std::sync::Arc;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamHandle, Source};

/// Pulse strength used for drag updates.
pub const DRAG_INTENSITY: f32 = 0.5;

pub trait Haptics {
    /// Fire-and-forget pulse, `intensity` in `0.0..=1.0`.
    fn impact(&mut self, intensity: f32);
}

/// Feedback that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentHaptics;

impl Haptics for SilentHaptics {
    fn impact(&mut self, _intensity: f32) {}
}

const SAMPLE_RATE: u32 = 44100;
const WAVE_TABLE_SIZE: usize = 64;
const CLICK_FREQUENCY: f32 = 1760.0;
const CLICK_DURATION: Duration = Duration::from_millis(12);
const CLICK_GAIN: f32 = 0.35;

/// One decaying blip read from a shared sine table.
struct Click {
    wave_table: Arc<Vec<f32>>,
    index: f32,
    index_increment: f32,
    remaining: usize,
    total: usize,
    amplitude: f32,
}

impl Click {
    fn new(wave_table: Arc<Vec<f32>>, intensity: f32) -> Self {
        let total = (SAMPLE_RATE as f32 * CLICK_DURATION.as_secs_f32()) as usize;
        let index_increment = CLICK_FREQUENCY * wave_table.len() as f32 / SAMPLE_RATE as f32;
        Self {
            wave_table,
            index: 0.0,
            index_increment,
            remaining: total,
            total,
            amplitude: intensity.clamp(0.0, 1.0) * CLICK_GAIN,
        }
    }

    fn lerp(&self) -> f32 {
        let truncated_index = self.index as usize;
        let next_index = (truncated_index + 1) % self.wave_table.len();
        let next_weight = self.index - truncated_index as f32;
        (1.0 - next_weight) * self.wave_table[truncated_index]
            + next_weight * self.wave_table[next_index]
    }
}

impl Iterator for Click {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.wave_table.is_empty() {
            return None;
        }
        let progress = 1.0 - self.remaining as f32 / self.total as f32;
        let envelope = (-6.0 * progress).exp();
        let sample = self.lerp() * envelope * self.amplitude;
        self.index = (self.index + self.index_increment) % self.wave_table.len() as f32;
        self.remaining -= 1;
        Some(sample)
    }
}

impl Source for Click {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.remaining)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(CLICK_DURATION)
    }
}

fn sine_table(size: usize) -> Vec<f32> {
    (0..size)
        .map(|n| (2.0 * std::f32::consts::PI * n as f32 / size as f32).sin())
        .collect()
}

/// Audible feedback on the default output device.
pub struct ClickHaptics {
    // Dropping the stream silences the handle.
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    wave_table: Arc<Vec<f32>>,
}

impl ClickHaptics {
    /// Open the default output device, or `None` when there is none.
    pub fn try_default() -> Option<Self> {
        match OutputStream::try_default() {
            Ok((stream, stream_handle)) => Some(Self {
                _stream: stream,
                stream_handle,
                wave_table: Arc::new(sine_table(WAVE_TABLE_SIZE)),
            }),
            Err(err) => {
                tracing::warn!(%err, "no audio output, haptic clicks disabled");
                None
            }
        }
    }
}

impl Haptics for ClickHaptics {
    fn impact(&mut self, intensity: f32) {
        let click = Click::new(Arc::clone(&self.wave_table), intensity);
        if let Err(err) = self.stream_handle.play_raw(click.convert_samples()) {
            tracing::debug!(%err, "dropped haptic click");
        }
    }
}

/// Audible clicks when an output device exists, silence otherwise.
pub fn default_haptics() -> Box<dyn Haptics> {
    match ClickHaptics::try_default() {
        Some(clicks) => Box::new(clicks),
        None => Box::new(SilentHaptics),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_is_short_and_decays() {
        let table = Arc::new(sine_table(WAVE_TABLE_SIZE));
        let samples: Vec<f32> = Click::new(table, 1.0).collect();
        assert_eq!(
            samples.len(),
            (SAMPLE_RATE as f32 * CLICK_DURATION.as_secs_f32()) as usize
        );
        assert!(samples.iter().all(|s| s.abs() <= CLICK_GAIN));

        let peak = |chunk: &[f32]| chunk.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let quarter = samples.len() / 4;
        assert!(peak(&samples[..quarter]) > peak(&samples[samples.len() - quarter..]));
    }

    #[test]
    fn zero_intensity_is_silent() {
        let table = Arc::new(sine_table(WAVE_TABLE_SIZE));
        assert!(Click::new(table, 0.0).all(|s| s == 0.0));
    }

    #[test]
    fn click_reports_mono_frame_length() {
        let table = Arc::new(sine_table(WAVE_TABLE_SIZE));
        let click = Click::new(table, 0.5);
        assert_eq!(click.channels(), 1);
        assert_eq!(click.current_frame_len(), Some(click.total));
    }
}
