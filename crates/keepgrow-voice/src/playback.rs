//! Speaker output using Rodio.
//!
//! Model audio segments are appended to one sink in arrival order; the sink
//! plays them back-to-back, which realizes the gapless schedule the timeline
//! computes. `stop` is the interruption kill switch.

use crate::error::{VoiceError, VoiceResult};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::info;

/// Speaker playback for streamed model audio.
pub struct SpeechDeck {
    // Dropping the stream kills the output; keep it alive with the sink.
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
    sample_rate: u32,
}

impl SpeechDeck {
    pub fn new(sample_rate: u32) -> VoiceResult<Self> {
        info!("🔊 Initializing speech playback ({}Hz)", sample_rate);

        let (stream, handle) =
            OutputStream::try_default().map_err(|e| VoiceError::Playback(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| VoiceError::Playback(e.to_string()))?;

        Ok(Self { _stream: stream, _handle: handle, sink, sample_rate })
    }

    /// Append one decoded mono PCM segment. Segments play in append order
    /// with no gap between them.
    pub fn append_pcm(&self, samples: Vec<f32>) {
        self.sink
            .append(SamplesBuffer::new(1, self.sample_rate, samples));
    }

    pub fn is_playing(&self) -> bool {
        !self.sink.empty()
    }

    /// Stop immediately and drop everything queued (interruption).
    pub fn stop(&self) {
        self.sink.stop();
        info!("⏹️ Speech playback stopped");
    }
}
