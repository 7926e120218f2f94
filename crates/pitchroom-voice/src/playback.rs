//! Playback of URL-addressable audio at a given volume.
//!
//! Synthesized replies come back as `file://` URLs from the adapter (or
//! remote `http(s)://` resources); this module fetches the bytes and plays
//! them on the default output device through a rodio sink.

use crate::error::{VoiceError, VoiceResult};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::sync::Arc;
use tracing::info;

/// Output-side counterpart of the recorder. Keep it alive for as long as
/// audio should keep playing; `stop()` clears the queue immediately.
pub struct AudioPlayer {
    _stream: OutputStream,
    _stream_handle: OutputStreamHandle,
    sink: Arc<Sink>,
}

impl AudioPlayer {
    /// Open the default output device.
    pub fn new() -> VoiceResult<Self> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| VoiceError::PlaybackFailed(e.to_string()))?;
        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| VoiceError::PlaybackFailed(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            _stream_handle: stream_handle,
            sink: Arc::new(sink),
        })
    }

    /// Play decoded container bytes (WAV/MP3). Volume is clamped to [0, 1]:
    /// the sink accepts any gain, so out-of-range input is clamped here
    /// rather than rejected.
    pub fn play_bytes(&self, bytes: &[u8], volume: f32) -> VoiceResult<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let cursor = Cursor::new(bytes.to_vec());
        let source = Decoder::new(cursor)
            .map_err(|e| VoiceError::PlaybackFailed(format!("decode failed: {e}")))?;
        self.sink.set_volume(volume.clamp(0.0, 1.0));
        self.sink.append(source.convert_samples::<f32>());
        Ok(())
    }

    /// Resolve a URL (`file://...`, a plain path, or `http(s)://...`) and
    /// play it at `volume`.
    pub async fn play_url(&self, url: &str, volume: f32) -> VoiceResult<()> {
        let bytes = fetch_audio(url).await?;
        info!(url, bytes = bytes.len(), "Playing audio");
        self.play_bytes(&bytes, volume)
    }

    /// Stop playback immediately and clear the queue.
    pub fn stop(&self) {
        self.sink.stop();
    }

    /// Whether the sink currently has queued samples.
    pub fn is_playing(&self) -> bool {
        !self.sink.empty()
    }

    /// Block until all queued audio has finished. Intended for demos/tests.
    pub fn sleep_until_end(&self) {
        self.sink.sleep_until_end();
    }
}

async fn fetch_audio(url: &str) -> VoiceResult<Vec<u8>> {
    if let Some(path) = url.strip_prefix("file://") {
        return std::fs::read(path)
            .map_err(|e| VoiceError::PlaybackFailed(format!("read {path}: {e}")));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        let res = reqwest::get(url)
            .await
            .map_err(|e| VoiceError::PlaybackFailed(e.to_string()))?;
        if !res.status().is_success() {
            return Err(VoiceError::PlaybackFailed(format!(
                "fetch {url}: status {}",
                res.status()
            )));
        }
        let bytes = res
            .bytes()
            .await
            .map_err(|e| VoiceError::PlaybackFailed(e.to_string()))?;
        return Ok(bytes.to_vec());
    }
    // Plain filesystem path.
    std::fs::read(url).map_err(|e| VoiceError::PlaybackFailed(format!("read {url}: {e}")))
}
