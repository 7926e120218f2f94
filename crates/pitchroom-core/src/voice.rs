//! Voice value types: synthesis configuration, recording telemetry, and the
//! assembled audio a finished recording yields.

use crate::error::{ConfigError, CoreResult};
use serde::{Deserialize, Serialize};

/// Voice synthesis configuration. Validated at the boundary: out-of-range
/// values are an input error, never silently clamped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Provider name as registered with the orchestrator.
    pub provider: String,
    pub voice_id: String,
    /// Playback speed multiplier, [0.5, 2.0].
    pub speed: f32,
    /// Pitch multiplier, [0.5, 2.0]. Validated here even though the current
    /// speech backend ignores pitch (see the adapter docs).
    pub pitch: f32,
    /// Playback volume, [0.0, 1.0].
    pub volume: f32,
    pub language: String,
}

impl VoiceConfig {
    pub fn new(provider: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            voice_id: voice_id.into(),
            speed: 1.0,
            pitch: 1.0,
            volume: 1.0,
            language: "en".to_string(),
        }
    }

    /// Boundary validation for all numeric fields.
    pub fn validate(&self) -> CoreResult<()> {
        range_check("speed", self.speed, 0.5, 2.0)?;
        range_check("pitch", self.pitch, 0.5, 2.0)?;
        range_check("volume", self.volume, 0.0, 1.0)?;
        Ok(())
    }
}

fn range_check(field: &'static str, value: f32, min: f32, max: f32) -> CoreResult<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// Snapshot of the recorder's telemetry. Observers always receive a copy of
/// this struct, never a reference into the live state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingSnapshot {
    pub is_recording: bool,
    pub is_paused: bool,
    /// Whole seconds of active (non-paused) capture. Monotonic across pauses.
    pub duration_seconds: u64,
    /// Normalized RMS level of the most recent audio frame, [0, 1].
    pub volume: f32,
    pub error: Option<String>,
}

/// The assembled audio object a stopped recording yields.
#[derive(Debug, Clone)]
pub struct RecordedAudio {
    /// WAV container bytes (16-bit PCM).
    pub data: Vec<u8>,
    pub sample_rate: u32,
    /// Whole seconds of captured audio.
    pub duration_seconds: u64,
}

impl RecordedAudio {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Result of a voice synthesis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisResult {
    /// URL-addressable audio resource (`file://` or `http(s)://`).
    pub audio_url: String,
    pub duration_seconds: u64,
}

/// Result of a speech recognition call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub text: String,
    /// [0, 1]. A fixed documented constant when the backend reports none.
    pub confidence: f32,
}

/// An input or output audio device as reported by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioDeviceInfo {
    /// Opaque identifier usable for device selection.
    pub device_id: String,
    pub label: String,
    pub is_default: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_passes() {
        let config = VoiceConfig::new("openrouter", "alloy");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn out_of_range_speed_is_an_error_not_a_clamp() {
        let mut config = VoiceConfig::new("openrouter", "alloy");
        config.speed = 2.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("speed"));
        // The value must be untouched: validation never clamps.
        assert!((config.speed - 2.5).abs() < f32::EPSILON);
    }

    #[test]
    fn nan_volume_is_rejected() {
        let mut config = VoiceConfig::new("openrouter", "alloy");
        config.volume = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn boundary_values_are_accepted() {
        let mut config = VoiceConfig::new("openrouter", "alloy");
        config.speed = 0.5;
        config.pitch = 2.0;
        config.volume = 0.0;
        assert!(config.validate().is_ok());
    }
}
