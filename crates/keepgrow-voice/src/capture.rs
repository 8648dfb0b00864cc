//! Microphone capture using CPAL.
//!
//! Captures mono f32 at the session's capture rate and accumulates fixed
//! frames onto an unbounded channel. Delivery is best-effort: when the
//! consumer is gone, frames are dropped, never buffered.

use crate::error::{VoiceError, VoiceResult};
use crate::pcm::FrameConfig;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Microphone capture system.
pub struct MicCapture {
    config: FrameConfig,
    device: Device,
    stream_config: StreamConfig,
}

impl MicCapture {
    /// Open the default input device. Fails when no microphone is available;
    /// a session must not connect without one.
    pub fn new(config: FrameConfig) -> VoiceResult<Self> {
        info!("🎤 Initializing mic capture ({}Hz mono)", config.capture_rate);

        let device = cpal::default_host()
            .default_input_device()
            .ok_or_else(|| VoiceError::AudioDevice("No input device available".to_string()))?;

        info!(
            "📱 Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        // Validated here so setup failures surface before connecting.
        device.default_input_config()?;

        let stream_config = StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(config.capture_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        Ok(Self { config, device, stream_config })
    }

    /// Start capturing. Full frames of `frame_samples` mono samples are sent
    /// to `frame_tx`; the returned stream must be kept alive for capture to
    /// continue.
    pub fn start(self, frame_tx: mpsc::UnboundedSender<Vec<f32>>) -> VoiceResult<Stream> {
        info!("▶️ Starting mic capture stream");

        let frame_samples = self.config.frame_samples;
        let mut frame = Vec::with_capacity(frame_samples);

        let stream = self.device.build_input_stream(
            &self.stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                for &sample in data {
                    frame.push(sample);
                    if frame.len() >= frame_samples {
                        // Best-effort: a closed session just drops frames.
                        let _ = frame_tx.send(std::mem::replace(
                            &mut frame,
                            Vec::with_capacity(frame_samples),
                        ));
                    }
                }
            },
            move |err| {
                warn!("Mic stream error: {}", err);
            },
            None,
        )?;

        stream.play()?;
        info!("✅ Mic capture started");
        Ok(stream)
    }

    /// List available input devices.
    pub fn list_input_devices() -> VoiceResult<Vec<String>> {
        let host = cpal::default_host();
        let devices = host.input_devices()?;

        let mut names = Vec::new();
        for device in devices {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // requires a microphone
    fn open_default_device() {
        let capture = MicCapture::new(FrameConfig::default());
        assert!(capture.is_ok());
    }

    #[test]
    fn list_devices_does_not_panic() {
        // Might be empty in CI environments without audio devices.
        if let Ok(devices) = MicCapture::list_input_devices() {
            println!("Available input devices: {:?}", devices);
        }
    }
}
