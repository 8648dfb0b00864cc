//! Live voice session lifecycle.
//!
//! One session is one call: open the microphone, connect the realtime
//! transport, then pump mic frames out and model audio in until either side
//! hangs up. The mic is opened before the transport so a missing device
//! never produces a half-open call.

use crate::capture::MicCapture;
use crate::error::{VoiceError, VoiceResult};
use crate::pcm::{decode_payload, encode_frame, FrameConfig};
use crate::playback::SpeechDeck;
use crate::provider::{ClientFrame, LiveConfig, RealtimeConnector, ServerEvent};
use keepgrow_core::{Persona, ProviderConfig};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Call lifecycle. `Failed` is absorbing; a failed session never reopens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Connecting,
    Open,
    Closed,
    Failed,
}

/// Full instruction text for a live call: the persona's instruction with the
/// wellness-context block appended verbatim when one exists.
pub fn compose_instruction(persona: &Persona, context: Option<&str>) -> String {
    match context {
        Some(ctx) => format!("{}\n\n{}", persona.system_instruction, ctx),
        None => persona.system_instruction.clone(),
    }
}

/// One realtime voice call.
pub struct VoiceSession {
    phase: SessionPhase,
    frame_config: FrameConfig,
    timeline: crate::timeline::PlaybackTimeline,
    /// Absent in headless tests; playback then exists only on the timeline.
    deck: Option<SpeechDeck>,
    outbound: Option<mpsc::UnboundedSender<ClientFrame>>,
    events: mpsc::UnboundedReceiver<ServerEvent>,
    mic_rx: mpsc::UnboundedReceiver<Vec<f32>>,
    // Capture stops when this drops; released on teardown.
    mic_stream: Option<cpal::Stream>,
    started: Instant,
    torn_down: bool,
    failure: Option<String>,
}

impl VoiceSession {
    /// Open the mic, then connect. Returns a session in `Connecting`; the
    /// call goes live when the transport acknowledges setup.
    pub async fn start(
        connector: &dyn RealtimeConnector,
        provider: ProviderConfig,
        persona: &Persona,
        context: Option<&str>,
    ) -> VoiceResult<Self> {
        let frame_config = FrameConfig::default();

        // Mic first. No call is attempted without working capture.
        let (mic_tx, mic_rx) = mpsc::unbounded_channel();
        let mic_stream = MicCapture::new(frame_config)?.start(mic_tx)?;

        let deck = SpeechDeck::new(frame_config.playback_rate)?;

        info!("📞 Starting voice call with {}", persona.name);
        let channel = connector
            .connect(LiveConfig {
                provider,
                system_instruction: compose_instruction(persona, context),
                voice_name: persona.voice_name.clone(),
            })
            .await?;

        Ok(Self {
            phase: SessionPhase::Connecting,
            frame_config,
            timeline: crate::timeline::PlaybackTimeline::new(),
            deck: Some(deck),
            outbound: Some(channel.outbound),
            events: channel.events,
            mic_rx,
            mic_stream: Some(mic_stream),
            started: Instant::now(),
            torn_down: false,
            failure: None,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Human-readable reason the call failed, once in `Failed`.
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Whether model audio is currently pending or playing.
    pub fn is_speaking(&self) -> bool {
        self.timeline.is_speaking(self.now())
    }

    /// Pump the call until it closes or fails.
    pub async fn run(&mut self) -> VoiceResult<()> {
        loop {
            tokio::select! {
                maybe_frame = self.mic_rx.recv() => {
                    match maybe_frame {
                        Some(samples) => self.forward_frame(&samples),
                        None => {
                            warn!("Mic channel closed; ending call");
                            self.fail("microphone capture stopped".to_string());
                            break;
                        }
                    }
                }
                maybe_event = self.events.recv() => {
                    match maybe_event {
                        Some(event) => {
                            let now = self.now();
                            if self.handle_event_at(now, event) {
                                break;
                            }
                        }
                        None => {
                            self.fail("transport closed unexpectedly".to_string());
                            break;
                        }
                    }
                }
            }
        }

        match self.phase {
            SessionPhase::Failed => Err(VoiceError::Protocol(
                self.failure.clone().unwrap_or_else(|| "call failed".to_string()),
            )),
            _ => Ok(()),
        }
    }

    /// Hang up. Safe to call at any time, any number of times.
    pub fn close(&mut self) {
        if self.torn_down {
            return;
        }
        if let Some(outbound) = &self.outbound {
            let _ = outbound.send(ClientFrame::Close);
        }
        if self.phase != SessionPhase::Failed {
            self.phase = SessionPhase::Closed;
        }
        self.teardown();
    }

    /// Forward one mic frame. Frames are only sent while the call is open;
    /// anything captured earlier or later is dropped, never buffered.
    fn forward_frame(&mut self, samples: &[f32]) {
        if self.phase != SessionPhase::Open {
            return;
        }
        if let Some(outbound) = &self.outbound {
            let frame = encode_frame(samples, &self.frame_config);
            // Best-effort; a dead transport is reported via the event side.
            let _ = outbound.send(ClientFrame::Audio(frame));
        }
    }

    /// Apply one server event at an explicit time. Returns true when the
    /// session is over.
    fn handle_event_at(&mut self, now: f64, event: ServerEvent) -> bool {
        match event {
            ServerEvent::Opened => {
                if self.phase == SessionPhase::Connecting {
                    info!("✅ Voice call open");
                    self.phase = SessionPhase::Open;
                }
                false
            }
            ServerEvent::Audio { data } => {
                if self.phase != SessionPhase::Open {
                    debug!("Dropping audio segment outside open call");
                    return false;
                }
                match decode_payload(&data) {
                    Ok(samples) => {
                        let duration =
                            samples.len() as f64 / self.frame_config.playback_rate as f64;
                        let start = self.timeline.schedule(now, duration);
                        debug!(start, duration, "scheduled model audio");
                        if let Some(deck) = &self.deck {
                            deck.append_pcm(samples);
                        }
                    }
                    Err(e) => warn!("Dropping undecodable audio segment: {}", e),
                }
                false
            }
            ServerEvent::Interrupted => {
                info!("✋ Model interrupted by user speech");
                self.timeline.interrupt(now);
                if let Some(deck) = &self.deck {
                    deck.stop();
                }
                false
            }
            ServerEvent::Closed => {
                if self.phase != SessionPhase::Failed {
                    self.phase = SessionPhase::Closed;
                }
                self.teardown();
                true
            }
            ServerEvent::Error(msg) => {
                warn!("Voice call error: {}", msg);
                self.fail(msg);
                true
            }
        }
    }

    fn fail(&mut self, reason: String) {
        self.phase = SessionPhase::Failed;
        self.failure.get_or_insert(reason);
        self.teardown();
    }

    /// Release the mic, the transport, and playback. Idempotent.
    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.outbound = None;
        self.mic_stream = None;
        if let Some(deck) = &self.deck {
            deck.stop();
        }
        info!("📴 Voice call torn down ({:?})", self.phase);
    }

    fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::encode_frame;

    struct Harness {
        session: VoiceSession,
        outbound_rx: mpsc::UnboundedReceiver<ClientFrame>,
        _event_tx: mpsc::UnboundedSender<ServerEvent>,
        _mic_tx: mpsc::UnboundedSender<Vec<f32>>,
    }

    /// Headless session: real state machine, no audio hardware.
    fn harness() -> Harness {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (event_tx, events) = mpsc::unbounded_channel();
        let (mic_tx, mic_rx) = mpsc::unbounded_channel();
        let session = VoiceSession {
            phase: SessionPhase::Connecting,
            frame_config: FrameConfig::default(),
            timeline: crate::timeline::PlaybackTimeline::new(),
            deck: None,
            outbound: Some(outbound_tx),
            events,
            mic_rx,
            mic_stream: None,
            started: Instant::now(),
            torn_down: false,
            failure: None,
        };
        Harness { session, outbound_rx, _event_tx: event_tx, _mic_tx: mic_tx }
    }

    fn audio_event(samples: &[f32]) -> ServerEvent {
        let frame = encode_frame(samples, &FrameConfig::default());
        ServerEvent::Audio { data: frame.data }
    }

    #[test]
    fn opened_transitions_connecting_to_open() {
        let mut h = harness();
        assert_eq!(h.session.phase(), SessionPhase::Connecting);
        h.session.handle_event_at(0.0, ServerEvent::Opened);
        assert_eq!(h.session.phase(), SessionPhase::Open);
    }

    #[test]
    fn mic_frames_before_open_are_dropped() {
        let mut h = harness();
        h.session.forward_frame(&[0.1; 4096]);
        assert!(h.outbound_rx.try_recv().is_err());

        h.session.handle_event_at(0.0, ServerEvent::Opened);
        h.session.forward_frame(&[0.1; 4096]);
        assert!(matches!(h.outbound_rx.try_recv(), Ok(ClientFrame::Audio(_))));
    }

    #[test]
    fn audio_before_open_is_dropped() {
        let mut h = harness();
        h.session.handle_event_at(0.0, audio_event(&[0.1; 2400]));
        assert!(!h.session.timeline.is_speaking(0.0));
    }

    #[test]
    fn open_session_schedules_model_audio() {
        let mut h = harness();
        h.session.handle_event_at(0.0, ServerEvent::Opened);
        // 2400 samples at 24kHz is 100ms.
        h.session.handle_event_at(1.0, audio_event(&[0.1; 2400]));
        assert!(h.session.timeline.is_speaking(1.05));
        // The speaking sub-state clears on its own once the segment's
        // playback window passes; no interruption is required.
        assert!(!h.session.timeline.is_speaking(2.0));
        assert!(!h.session.timeline.is_speaking(60.0));
    }

    #[test]
    fn interruption_silences_queued_audio() {
        let mut h = harness();
        h.session.handle_event_at(0.0, ServerEvent::Opened);
        h.session.handle_event_at(1.0, audio_event(&[0.1; 24000]));
        assert!(h.session.timeline.is_speaking(1.5));

        h.session.handle_event_at(1.5, ServerEvent::Interrupted);
        assert!(!h.session.timeline.is_speaking(1.5));
        assert_eq!(h.session.phase(), SessionPhase::Open); // call stays up
    }

    #[test]
    fn error_is_absorbing() {
        let mut h = harness();
        let over = h.session.handle_event_at(0.0, ServerEvent::Error("boom".to_string()));
        assert!(over);
        assert_eq!(h.session.phase(), SessionPhase::Failed);
        assert_eq!(h.session.failure_reason(), Some("boom"));

        // A late Opened must not resurrect the call.
        h.session.handle_event_at(1.0, ServerEvent::Opened);
        assert_eq!(h.session.phase(), SessionPhase::Failed);
    }

    #[test]
    fn peer_close_ends_the_call() {
        let mut h = harness();
        h.session.handle_event_at(0.0, ServerEvent::Opened);
        let over = h.session.handle_event_at(5.0, ServerEvent::Closed);
        assert!(over);
        assert_eq!(h.session.phase(), SessionPhase::Closed);
    }

    #[test]
    fn close_is_idempotent() {
        let mut h = harness();
        h.session.handle_event_at(0.0, ServerEvent::Opened);
        h.session.close();
        assert_eq!(h.session.phase(), SessionPhase::Closed);
        assert!(matches!(h.outbound_rx.try_recv(), Ok(ClientFrame::Close)));

        // Second close: no second Close frame, no phase change.
        h.session.close();
        assert!(h.outbound_rx.try_recv().is_err());
        assert_eq!(h.session.phase(), SessionPhase::Closed);
    }

    #[test]
    fn close_after_failure_stays_failed() {
        let mut h = harness();
        h.session.handle_event_at(0.0, ServerEvent::Error("boom".to_string()));
        h.session.close();
        assert_eq!(h.session.phase(), SessionPhase::Failed);
    }

    #[test]
    fn instruction_appends_context_verbatim() {
        let persona = keepgrow_core::persona_by_id("therapist").unwrap();
        let ctx = "[CONTEXT: Overall status: Healthy (Score: 0).]";

        let with = compose_instruction(persona, Some(ctx));
        assert!(with.starts_with(&persona.system_instruction));
        assert!(with.ends_with(ctx));

        let without = compose_instruction(persona, None);
        assert_eq!(without, persona.system_instruction);
    }
}
