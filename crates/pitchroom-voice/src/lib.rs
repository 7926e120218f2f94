//! # Pitchroom Voice: microphone capture and playback
//!
//! Owns the microphone lifecycle for a training session: permission, device
//! selection, the recording state machine with live duration/volume
//! metering, WAV assembly, and playback of synthesized speech.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      VoiceRecorder                         │
//! │  ┌────────────┐   ┌──────────────┐   ┌─────────────────┐  │
//! │  │  Mic In    │ → │ Frame buffer │ → │  WAV assembly   │  │
//! │  │  (cpal)    │   │ + RMS meter  │   │  (stop/finish)  │  │
//! │  └────────────┘   └──────────────┘   └─────────────────┘  │
//! │        ↑                  ↓                                │
//! │  state machine     RecordingSnapshot                       │
//! │  Idle → Recording → Paused → Stopping → Idle               │
//! └────────────────────────────────────────────────────────────┘
//!          playback: AudioPlayer (rodio) ← file:// / http(s)://
//! ```
//!
//! The recorder owns the device handle and telemetry exclusively; observers
//! only ever see `RecordingSnapshot` copies.

pub mod device;
pub mod error;
pub mod playback;
pub mod recorder;
pub mod wav;

pub use device::list_input_devices;
pub use error::{VoiceError, VoiceResult};
pub use playback::AudioPlayer;
pub use recorder::{RecorderState, VoiceRecorder};
pub use wav::pcm_f32_to_wav;
