//! Error types for the voice engine.

use thiserror::Error;

/// Result type alias for voice operations.
pub type VoiceResult<T> = Result<T, VoiceError>;

/// Errors that can occur in the capture and playback pipeline.
///
/// `AlreadyRecording` and `NoActiveRecording` are state-machine misuse:
/// caller bugs, reported rather than retried, and they never alter the
/// recorder's state. `PermissionDenied` is terminal for the current attempt
/// until the user retries a fresh `request_permission`/`start` cycle.
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("microphone permission denied: {0}")]
    PermissionDenied(String),

    #[error("recording already in progress")]
    AlreadyRecording,

    #[error("no active recording")]
    NoActiveRecording,

    #[error("audio device error: {0}")]
    AudioDevice(String),

    #[error("audio stream error: {0}")]
    AudioStream(String),

    #[error("playback failed: {0}")]
    PlaybackFailed(String),
}

impl VoiceError {
    /// Stable machine-readable kind for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            VoiceError::PermissionDenied(_) => "permission_denied",
            VoiceError::AlreadyRecording => "already_recording",
            VoiceError::NoActiveRecording => "no_active_recording",
            VoiceError::AudioDevice(_) => "audio_device",
            VoiceError::AudioStream(_) => "audio_stream",
            VoiceError::PlaybackFailed(_) => "playback_failed",
        }
    }
}

impl From<cpal::DevicesError> for VoiceError {
    fn from(err: cpal::DevicesError) -> Self {
        VoiceError::AudioDevice(err.to_string())
    }
}

impl From<cpal::SupportedStreamConfigsError> for VoiceError {
    fn from(err: cpal::SupportedStreamConfigsError) -> Self {
        VoiceError::AudioDevice(err.to_string())
    }
}

impl From<cpal::BuildStreamError> for VoiceError {
    fn from(err: cpal::BuildStreamError) -> Self {
        VoiceError::AudioStream(err.to_string())
    }
}

impl From<cpal::PlayStreamError> for VoiceError {
    fn from(err: cpal::PlayStreamError) -> Self {
        VoiceError::AudioStream(err.to_string())
    }
}

impl From<cpal::PauseStreamError> for VoiceError {
    fn from(err: cpal::PauseStreamError) -> Self {
        VoiceError::AudioStream(err.to_string())
    }
}
