//! PCM frame encoding for the realtime wire.
//!
//! Outbound mic audio is mono f32 at 16 kHz; the wire wants 16-bit
//! little-endian PCM, base64-encoded, with an explicit mime tag. Inbound
//! model audio is the same encoding at 24 kHz.

use crate::error::{VoiceError, VoiceResult};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Fixed sample-rate and framing parameters for a session.
#[derive(Debug, Clone, Copy)]
pub struct FrameConfig {
    /// Mic capture rate in Hz.
    pub capture_rate: u32,
    /// Model playback rate in Hz.
    pub playback_rate: u32,
    /// Samples per outbound frame.
    pub frame_samples: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            capture_rate: 16_000,
            playback_rate: 24_000,
            frame_samples: 4096,
        }
    }
}

impl FrameConfig {
    /// Wall-clock duration of one outbound frame, in seconds.
    pub fn frame_duration(&self) -> f64 {
        self.frame_samples as f64 / self.capture_rate as f64
    }

    pub fn capture_mime(&self) -> String {
        format!("audio/pcm;rate={}", self.capture_rate)
    }
}

/// One encoded outbound audio frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeFrame {
    /// Base64 of 16-bit little-endian PCM.
    pub data: String,
    pub mime_type: String,
}

/// Encode mono f32 samples into a wire frame. Samples are clamped to
/// [-1.0, 1.0] before conversion, so out-of-range input degrades to
/// full-scale rather than wrapping.
pub fn encode_frame(samples: &[f32], config: &FrameConfig) -> RealtimeFrame {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &s in samples {
        let v = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    RealtimeFrame {
        data: BASE64.encode(&bytes),
        mime_type: config.capture_mime(),
    }
}

/// Decode a base64 PCM payload from the model into f32 samples.
pub fn decode_payload(data: &str) -> VoiceResult<Vec<f32>> {
    let bytes = BASE64
        .decode(data)
        .map_err(|e| VoiceError::Decode(format!("bad base64: {}", e)))?;
    if bytes.len() % 2 != 0 {
        return Err(VoiceError::Decode(format!(
            "odd PCM byte length: {}",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_config_defaults() {
        let config = FrameConfig::default();
        assert_eq!(config.capture_rate, 16_000);
        assert_eq!(config.playback_rate, 24_000);
        assert_eq!(config.frame_samples, 4096);
        assert_eq!(config.capture_mime(), "audio/pcm;rate=16000");
        assert!((config.frame_duration() - 0.256).abs() < 1e-9);
    }

    #[test]
    fn encode_clamps_out_of_range_samples() {
        let config = FrameConfig::default();
        let frame = encode_frame(&[2.0, -3.0], &config);
        let bytes = BASE64.decode(&frame.data).unwrap();
        let first = i16::from_le_bytes([bytes[0], bytes[1]]);
        let second = i16::from_le_bytes([bytes[2], bytes[3]]);
        assert_eq!(first, 32767);
        assert_eq!(second, -32767);
    }

    #[test]
    fn decode_rejects_odd_length() {
        let data = BASE64.encode([0u8, 1, 2]);
        assert!(matches!(decode_payload(&data), Err(VoiceError::Decode(_))));
    }

    #[test]
    fn decoded_samples_stay_in_unit_range() {
        let config = FrameConfig::default();
        let frame = encode_frame(&[0.0, 0.5, -0.5, 1.0, -1.0], &config);
        let samples = decode_payload(&frame.data).unwrap();
        assert_eq!(samples.len(), 5);
        for s in samples {
            assert!((-1.0..=1.0).contains(&s));
        }
    }
}
