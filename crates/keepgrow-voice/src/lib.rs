//! # keepgrow-voice - Realtime Voice Companion
//!
//! This crate implements the live voice call: microphone capture, PCM wire
//! framing, the realtime provider session, and gapless playback of streamed
//! model audio with barge-in interruption.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Voice Session                           │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐      │
//! │  │   Mic In     │→ │ PCM Framing  │→ │   Realtime   │      │
//! │  │   (cpal)     │  │ (16k → b64)  │  │  Connector   │      │
//! │  └──────────────┘  └──────────────┘  └──────┬───────┘      │
//! │         ↑                                    ↓              │
//! │  ┌──────────────┐                   ┌──────────────┐       │
//! │  │  Speaker Out │←──────────────────│   Playback   │       │
//! │  │   (rodio)    │   Interruption    │   Timeline   │       │
//! │  └──────────────┘   Kill Signal     └──────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod capture;
pub mod error;
pub mod pcm;
pub mod playback;
pub mod provider;
pub mod session;
pub mod timeline;

pub use capture::MicCapture;
pub use error::{VoiceError, VoiceResult};
pub use pcm::{decode_payload, encode_frame, FrameConfig, RealtimeFrame};
pub use playback::SpeechDeck;
pub use provider::{
    ClientFrame, GeminiLiveConnector, LiveConfig, RealtimeChannel, RealtimeConnector, ServerEvent,
};
pub use session::{compose_instruction, SessionPhase, VoiceSession};
pub use timeline::PlaybackTimeline;
