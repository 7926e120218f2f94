//! Input device selection and capture format negotiation.

use crate::error::{VoiceError, VoiceResult};
use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, SampleFormat, SampleRate, StreamConfig};
use pitchroom_core::AudioDeviceInfo;
use tracing::info;

/// Preferred capture sample rate. Matches what transcription backends expect.
pub const PREFERRED_SAMPLE_RATE: u32 = 16_000;

/// Capture sample formats in preference order; the first one the device
/// supports wins. Everything is converted to f32 internally, and the
/// assembled container is always 16-bit WAV.
const FORMAT_PREFERENCE: [SampleFormat; 3] =
    [SampleFormat::F32, SampleFormat::I16, SampleFormat::U16];

/// List the host's input devices. The device name doubles as the opaque
/// selection identifier.
pub fn list_input_devices() -> VoiceResult<Vec<AudioDeviceInfo>> {
    let host = cpal::default_host();
    let default_name = host
        .default_input_device()
        .and_then(|d| d.name().ok())
        .unwrap_or_default();

    let mut devices = Vec::new();
    for device in host.input_devices()? {
        if let Ok(name) = device.name() {
            devices.push(AudioDeviceInfo {
                device_id: name.clone(),
                is_default: name == default_name,
                label: name,
            });
        }
    }
    Ok(devices)
}

/// Resolve a device by opaque identifier, or the host default when `None`.
pub fn select_input_device(device_id: Option<&str>) -> VoiceResult<Device> {
    let host = cpal::default_host();
    match device_id {
        None => host
            .default_input_device()
            .ok_or_else(|| VoiceError::PermissionDenied("no input device available".to_string())),
        Some(id) => host
            .input_devices()?
            .find(|d| d.name().map(|n| n == id).unwrap_or(false))
            .ok_or_else(|| VoiceError::AudioDevice(format!("input device not found: {id}"))),
    }
}

/// Negotiate a capture configuration: mono, preferred sample rate when the
/// device allows it, sample format by `FORMAT_PREFERENCE`.
pub fn negotiate_input(device: &Device) -> VoiceResult<(StreamConfig, SampleFormat)> {
    let supported: Vec<_> = device.supported_input_configs()?.collect();
    if supported.is_empty() {
        return Err(VoiceError::AudioDevice(
            "device reports no input configurations".to_string(),
        ));
    }

    let range = FORMAT_PREFERENCE
        .iter()
        .find_map(|format| {
            supported
                .iter()
                .find(|r| r.sample_format() == *format && r.channels() >= 1)
        })
        .ok_or_else(|| {
            VoiceError::AudioDevice(format!(
                "no supported capture format among {FORMAT_PREFERENCE:?}"
            ))
        })?;

    let desired = SampleRate(PREFERRED_SAMPLE_RATE);
    let sample_rate = if range.min_sample_rate() <= desired && desired <= range.max_sample_rate() {
        desired
    } else {
        range.min_sample_rate()
    };

    let config = StreamConfig {
        channels: 1,
        sample_rate,
        buffer_size: cpal::BufferSize::Default,
    };
    info!(
        format = ?range.sample_format(),
        rate = sample_rate.0,
        "Negotiated capture config"
    );
    Ok((config, range.sample_format()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Device-touching tests tolerate machines without audio hardware.
    #[test]
    fn list_devices_does_not_panic() {
        if let Ok(devices) = list_input_devices() {
            assert!(devices.iter().filter(|d| d.is_default).count() <= 1);
        }
    }

    #[test]
    fn unknown_device_id_is_an_error() {
        match select_input_device(Some("pitchroom-no-such-device")) {
            Err(VoiceError::AudioDevice(msg)) => assert!(msg.contains("no-such-device")),
            Err(_) => {} // no device enumeration on this host
            Ok(_) => panic!("bogus device id resolved"),
        }
    }
}
