//! The recording state machine.
//!
//! States: `Idle` (optionally holding a permitted device), `Requesting`,
//! `Recording`, `Paused`, `Stopping`, `Error`. Telemetry (duration, volume)
//! lives behind a mutex shared with the capture callback and the metering
//! task; everything else is owned by `VoiceRecorder` exclusively and the
//! host audio thread never touches the state machine itself.
//!
//! Pause and resume are tolerant: outside their applicable states they are
//! logged no-ops, not errors, matching the media-control contract the rest
//! of the system expects. `start` on an active recording and `stop` without
//! one are caller bugs and fail with named errors, leaving state untouched.

use crate::device::{negotiate_input, select_input_device};
use crate::error::{VoiceError, VoiceResult};
use crate::wav;
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use pitchroom_core::{RecordedAudio, RecordingSnapshot};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Frame length for metering. 30ms frames give ~33 volume updates per
/// second at 16 kHz, well above the 10 Hz floor.
const FRAME_MS: u32 = 30;

/// Metering task period. Duration must refresh at 1 Hz or better.
const METER_TICK: Duration = Duration::from_millis(250);

/// Lifecycle states of the recorder.
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderState {
    /// No capture in progress. `permitted` is true once a device has been
    /// acquired by `request_permission`.
    Idle { permitted: bool },
    /// Acquiring the input device.
    Requesting,
    Recording,
    Paused,
    /// Finalizing buffers on the way back to `Idle`.
    Stopping,
    /// Terminal until a fresh `request_permission`/`start` cycle; never
    /// auto-reset.
    Error(String),
}

impl RecorderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecorderState::Idle { .. } => "idle",
            RecorderState::Requesting => "requesting",
            RecorderState::Recording => "recording",
            RecorderState::Paused => "paused",
            RecorderState::Stopping => "stopping",
            RecorderState::Error(_) => "error",
        }
    }
}

/// Wall-clock accounting that excludes paused stretches, so duration is
/// monotonically non-decreasing across pause/resume.
#[derive(Debug, Clone, Default)]
pub(crate) struct ActiveClock {
    accumulated: Duration,
    active_since: Option<Instant>,
}

impl ActiveClock {
    pub(crate) fn start(&mut self) {
        self.accumulated = Duration::ZERO;
        self.active_since = Some(Instant::now());
    }

    pub(crate) fn pause(&mut self) {
        if let Some(since) = self.active_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    pub(crate) fn resume(&mut self) {
        if self.active_since.is_none() {
            self.active_since = Some(Instant::now());
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.accumulated
            + self
                .active_since
                .map(|since| since.elapsed())
                .unwrap_or_default()
    }
}

/// Telemetry shared with the capture callback and the metering task.
#[derive(Debug, Default)]
struct Telemetry {
    is_recording: bool,
    is_paused: bool,
    duration_seconds: u64,
    volume: f32,
    error: Option<String>,
    clock: ActiveClock,
}

/// Normalized RMS level of one audio frame, in [0, 1].
pub(crate) fn frame_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt().clamp(0.0, 1.0)
}

/// Microphone capture engine. Owns the device handle and the live telemetry
/// exclusively; not `Send` because the underlying stream is pinned to the
/// thread that created it.
pub struct VoiceRecorder {
    state: RecorderState,
    shared: Arc<Mutex<Telemetry>>,
    buffer: Arc<Mutex<Vec<f32>>>,
    device: Option<Device>,
    stream_config: Option<StreamConfig>,
    sample_format: Option<SampleFormat>,
    stream: Option<Stream>,
    meter_task: Option<JoinHandle<()>>,
}

impl VoiceRecorder {
    pub fn new() -> Self {
        Self {
            state: RecorderState::Idle { permitted: false },
            shared: Arc::new(Mutex::new(Telemetry::default())),
            buffer: Arc::new(Mutex::new(Vec::new())),
            device: None,
            stream_config: None,
            sample_format: None,
            stream: None,
            meter_task: None,
        }
    }

    pub fn state(&self) -> &RecorderState {
        &self.state
    }

    /// Immutable copy of the live telemetry. Never a reference into it.
    pub fn snapshot(&self) -> RecordingSnapshot {
        match self.shared.lock() {
            Ok(guard) => RecordingSnapshot {
                is_recording: guard.is_recording,
                is_paused: guard.is_paused,
                duration_seconds: guard.duration_seconds,
                volume: guard.volume,
                error: guard.error.clone(),
            },
            Err(_) => RecordingSnapshot::default(),
        }
    }

    /// Acquire the input device (`None` selects the host default) and
    /// negotiate a capture format. In this engine "permission" is the
    /// ability to open the device. Also the recovery path out of `Error`.
    pub fn request_permission(&mut self, device_id: Option<&str>) -> VoiceResult<()> {
        self.state = RecorderState::Requesting;
        let device = match select_input_device(device_id) {
            Ok(d) => d,
            Err(e) => {
                self.state = RecorderState::Error(e.to_string());
                return Err(VoiceError::PermissionDenied(e.to_string()));
            }
        };
        let (config, format) = match negotiate_input(&device) {
            Ok(pair) => pair,
            Err(e) => {
                self.state = RecorderState::Error(e.to_string());
                return Err(VoiceError::PermissionDenied(e.to_string()));
            }
        };
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());
        info!(device = %device_name, "Microphone acquired");
        self.device = Some(device);
        self.stream_config = Some(config);
        self.sample_format = Some(format);
        self.state = RecorderState::Idle { permitted: true };
        Ok(())
    }

    /// Begin capturing. Fails with `AlreadyRecording` while a recording is
    /// active (state untouched). Acquires the default device first when
    /// permission was never requested.
    pub fn start(&mut self) -> VoiceResult<()> {
        match self.state {
            RecorderState::Recording | RecorderState::Paused => {
                return Err(VoiceError::AlreadyRecording)
            }
            _ => {}
        }
        if self.device.is_none() {
            self.request_permission(None)?;
        }

        let device = self.device.as_ref().expect("device acquired above");
        let config = self.stream_config.clone().expect("config negotiated");
        let format = self.sample_format.expect("format negotiated");
        let frame_len = (config.sample_rate.0 * FRAME_MS / 1000) as usize;

        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
        if let Ok(mut guard) = self.shared.lock() {
            *guard = Telemetry::default();
            guard.is_recording = true;
            guard.clock.start();
        }

        let shared = Arc::clone(&self.shared);
        let buffer = Arc::clone(&self.buffer);
        let stream = match format {
            SampleFormat::F32 => {
                build_capture_stream::<f32>(device, &config, shared, buffer, frame_len, |s| s)
            }
            SampleFormat::I16 => {
                build_capture_stream::<i16>(device, &config, shared, buffer, frame_len, |s| {
                    f32::from(s) / i16::MAX as f32
                })
            }
            SampleFormat::U16 => {
                build_capture_stream::<u16>(device, &config, shared, buffer, frame_len, |s| {
                    (f32::from(s) - 32768.0) / 32768.0
                })
            }
            other => Err(VoiceError::AudioStream(format!(
                "unsupported sample format: {other:?}"
            ))),
        };
        let stream = match stream {
            Ok(s) => s,
            Err(e) => {
                self.reset_telemetry();
                self.state = RecorderState::Error(e.to_string());
                return Err(e);
            }
        };
        if let Err(e) = stream.play() {
            self.reset_telemetry();
            self.state = RecorderState::Error(e.to_string());
            return Err(e.into());
        }

        self.stream = Some(stream);
        self.spawn_meter_task();
        self.state = RecorderState::Recording;
        info!("Recording started");
        Ok(())
    }

    /// Pause capture. A tolerant no-op unless currently `Recording`.
    pub fn pause(&mut self) -> VoiceResult<()> {
        if self.state != RecorderState::Recording {
            debug!(state = self.state.as_str(), "pause ignored");
            return Ok(());
        }
        if let Some(ref stream) = self.stream {
            stream.pause()?;
        }
        if let Ok(mut guard) = self.shared.lock() {
            guard.is_paused = true;
            guard.clock.pause();
        }
        self.state = RecorderState::Paused;
        info!("Recording paused");
        Ok(())
    }

    /// Resume capture. A tolerant no-op unless currently `Paused`.
    pub fn resume(&mut self) -> VoiceResult<()> {
        if self.state != RecorderState::Paused {
            debug!(state = self.state.as_str(), "resume ignored");
            return Ok(());
        }
        if let Some(ref stream) = self.stream {
            stream.play()?;
        }
        if let Ok(mut guard) = self.shared.lock() {
            guard.is_paused = false;
            guard.clock.resume();
        }
        self.state = RecorderState::Recording;
        info!("Recording resumed");
        Ok(())
    }

    /// Finalize the recording and yield the assembled audio. Whatever was
    /// buffered is returned, even when stopping mid-capture. Fails with
    /// `NoActiveRecording` (state untouched) when nothing is recording.
    pub fn stop(&mut self) -> VoiceResult<RecordedAudio> {
        match self.state {
            RecorderState::Recording | RecorderState::Paused => {}
            _ => return Err(VoiceError::NoActiveRecording),
        }
        self.state = RecorderState::Stopping;

        self.stop_meter_task();
        self.stream = None; // dropping the stream releases the callback

        let sample_rate = self
            .stream_config
            .as_ref()
            .map(|c| c.sample_rate.0)
            .unwrap_or(crate::device::PREFERRED_SAMPLE_RATE);
        let samples = self
            .buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default();

        if let Ok(mut guard) = self.shared.lock() {
            guard.is_recording = false;
            guard.is_paused = false;
            guard.clock.pause();
            guard.duration_seconds = guard.clock.elapsed().as_secs();
            guard.volume = 0.0;
        }

        let audio = RecordedAudio {
            data: wav::pcm_f32_to_wav(&samples, sample_rate),
            sample_rate,
            duration_seconds: wav::duration_seconds(samples.len(), sample_rate),
        };
        self.state = RecorderState::Idle { permitted: true };
        info!(
            seconds = audio.duration_seconds,
            samples = samples.len(),
            "Recording stopped"
        );
        Ok(audio)
    }

    /// Release the device, stream, and metering task. Safe from any state,
    /// including `Idle`.
    pub fn cleanup(&mut self) {
        self.stop_meter_task();
        self.stream = None;
        self.device = None;
        self.stream_config = None;
        self.sample_format = None;
        self.reset_telemetry();
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
        self.state = RecorderState::Idle { permitted: false };
        debug!("Recorder cleaned up");
    }

    fn reset_telemetry(&self) {
        if let Ok(mut guard) = self.shared.lock() {
            *guard = Telemetry::default();
        }
    }

    /// Periodic duration refresh, alive only while `Recording`/`Paused`.
    /// The task watches the shared flag and stops itself when the state
    /// machine leaves recording; exit transitions also abort it so no tick
    /// outlives the state machine. Without an ambient tokio runtime the
    /// capture callback alone keeps duration fresh.
    fn spawn_meter_task(&mut self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("no async runtime; duration updates ride the capture callback");
            return;
        };
        let shared = Arc::clone(&self.shared);
        self.meter_task = Some(handle.spawn(async move {
            let mut tick = tokio::time::interval(METER_TICK);
            loop {
                tick.tick().await;
                let Ok(mut guard) = shared.lock() else { break };
                if !guard.is_recording {
                    break;
                }
                if !guard.is_paused {
                    guard.duration_seconds = guard.clock.elapsed().as_secs();
                }
            }
            debug!("Meter task stopped");
        }));
    }

    fn stop_meter_task(&mut self) {
        if let Some(task) = self.meter_task.take() {
            task.abort();
        }
    }
}

impl Default for VoiceRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for VoiceRecorder {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn build_capture_stream<T>(
    device: &Device,
    config: &StreamConfig,
    shared: Arc<Mutex<Telemetry>>,
    buffer: Arc<Mutex<Vec<f32>>>,
    frame_len: usize,
    convert: fn(T) -> f32,
) -> VoiceResult<Stream>
where
    T: cpal::SizedSample + Send + 'static,
{
    let err_shared = Arc::clone(&shared);
    let mut frame: Vec<f32> = Vec::with_capacity(frame_len.max(1));
    let frame_len = frame_len.max(1);

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            for &sample in data {
                frame.push(convert(sample));
                if frame.len() >= frame_len {
                    let level = frame_rms(&frame);
                    if let Ok(mut buf) = buffer.lock() {
                        buf.extend_from_slice(&frame);
                    }
                    if let Ok(mut guard) = shared.lock() {
                        if guard.is_recording && !guard.is_paused {
                            guard.volume = level;
                            guard.duration_seconds = guard.clock.elapsed().as_secs();
                        }
                    }
                    frame.clear();
                }
            }
        },
        move |err| {
            warn!("Audio stream error: {err}");
            if let Ok(mut guard) = err_shared.lock() {
                guard.error = Some(err.to_string());
            }
        },
        None,
    )?;
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_without_recording_fails_and_preserves_state() {
        let mut recorder = VoiceRecorder::new();
        let before = recorder.snapshot();
        let err = recorder.stop().unwrap_err();
        assert_eq!(err.kind(), "no_active_recording");
        assert_eq!(recorder.state().as_str(), "idle");

        let after = recorder.snapshot();
        assert_eq!(before.is_recording, after.is_recording);
        assert_eq!(before.duration_seconds, after.duration_seconds);
    }

    #[test]
    fn pause_outside_recording_is_noop() {
        let mut recorder = VoiceRecorder::new();
        recorder.pause().unwrap();
        assert_eq!(recorder.state().as_str(), "idle");
    }

    #[test]
    fn resume_without_pause_is_noop() {
        let mut recorder = VoiceRecorder::new();
        recorder.resume().unwrap();
        assert_eq!(recorder.state().as_str(), "idle");
    }

    #[test]
    fn cleanup_is_safe_from_idle() {
        let mut recorder = VoiceRecorder::new();
        recorder.cleanup();
        recorder.cleanup();
        assert_eq!(recorder.state(), &RecorderState::Idle { permitted: false });
    }

    #[test]
    fn snapshot_is_a_copy() {
        let recorder = VoiceRecorder::new();
        let mut snap = recorder.snapshot();
        snap.duration_seconds = 999;
        assert_eq!(recorder.snapshot().duration_seconds, 0);
    }

    #[test]
    fn active_clock_is_monotonic_across_pause() {
        let mut clock = ActiveClock::default();
        clock.start();
        std::thread::sleep(Duration::from_millis(15));
        let before_pause = clock.elapsed();
        clock.pause();
        let frozen = clock.elapsed();
        assert!(frozen >= before_pause);
        std::thread::sleep(Duration::from_millis(15));
        // Paused time does not accrue.
        assert_eq!(clock.elapsed(), frozen);
        clock.resume();
        std::thread::sleep(Duration::from_millis(15));
        assert!(clock.elapsed() > frozen);
    }

    #[test]
    fn frame_rms_bounds() {
        assert_eq!(frame_rms(&[]), 0.0);
        assert_eq!(frame_rms(&[0.0; 480]), 0.0);
        let full = frame_rms(&[1.0; 480]);
        assert!((full - 1.0).abs() < 1e-6);
        let loud = frame_rms(&[2.0; 480]); // clipped input still normalizes
        assert!(loud <= 1.0);
        let half = frame_rms(&[0.5; 480]);
        assert!(half > 0.0 && half < full);
    }

    #[test]
    fn error_state_reports_permission_denied_for_bogus_device() {
        let mut recorder = VoiceRecorder::new();
        match recorder.request_permission(Some("pitchroom-no-such-device")) {
            Err(e) => {
                assert_eq!(e.kind(), "permission_denied");
                assert_eq!(recorder.state().as_str(), "error");
                // Error is sticky until a fresh request cycle.
                recorder.pause().unwrap();
                assert_eq!(recorder.state().as_str(), "error");
            }
            // A host without device enumeration may legitimately succeed here.
            Ok(()) => {}
        }
    }
}
