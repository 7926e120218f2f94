//! WAV container assembly for captured PCM.
//!
//! The recorder always delivers audio as 16-bit PCM WAV, the one container
//! every transcription backend and platform decoder accepts, and the final
//! fallback of the capture format preference order.

/// Encode f32 PCM (mono) to 16-bit WAV bytes.
pub fn pcm_f32_to_wav(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let data_len = (samples.len() * 2) as u32; // 16-bit = 2 bytes per sample
    let file_len = 44 + data_len;

    let mut buf = Vec::with_capacity(file_len as usize);
    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(file_len - 8).to_le_bytes());
    buf.extend_from_slice(b"WAVE");
    // fmt subchunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&1u16.to_le_bytes()); // mono
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&(sample_rate * 2).to_le_bytes()); // byte rate
    buf.extend_from_slice(&2u16.to_le_bytes()); // block align
    buf.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    // data subchunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_len.to_le_bytes());
    for &s in samples {
        let clamped = s.clamp(-1.0, 1.0);
        buf.extend_from_slice(&((clamped * 32767.0).round() as i16).to_le_bytes());
    }
    buf
}

/// Whole seconds of audio represented by `samples` at `sample_rate`.
pub fn duration_seconds(samples: usize, sample_rate: u32) -> u64 {
    if sample_rate == 0 {
        return 0;
    }
    (samples as u64) / (sample_rate as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_length_are_consistent() {
        let wav = pcm_f32_to_wav(&[0.0; 1600], 16000);
        assert_eq!(&wav[..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + 1600 * 2);
        // data subchunk length
        let data_len = u32::from_le_bytes(wav[40..44].try_into().unwrap());
        assert_eq!(data_len, 3200);
    }

    #[test]
    fn samples_are_clamped() {
        let wav = pcm_f32_to_wav(&[2.0, -2.0], 16000);
        let first = i16::from_le_bytes(wav[44..46].try_into().unwrap());
        let second = i16::from_le_bytes(wav[46..48].try_into().unwrap());
        assert_eq!(first, 32767);
        assert_eq!(second, -32767);
    }

    #[test]
    fn duration_rounds_down_to_whole_seconds() {
        assert_eq!(duration_seconds(16000, 16000), 1);
        assert_eq!(duration_seconds(23999, 16000), 1);
        assert_eq!(duration_seconds(0, 16000), 0);
        assert_eq!(duration_seconds(100, 0), 0);
    }
}
