//! Integration tests for the voice session
//!
//! Note: every test here goes through `VoiceSession::start`, which opens the
//! real microphone and speaker devices, so all are ignored by default; the
//! live-call test additionally needs a provider API key. The hardware-free
//! session state machine is unit-tested in `session.rs`.

use async_trait::async_trait;
use keepgrow_core::{persona_by_id, ProviderConfig};
use keepgrow_voice::{
    GeminiLiveConnector, LiveConfig, RealtimeChannel, RealtimeConnector, ServerEvent,
    SessionPhase, VoiceError, VoiceResult, VoiceSession,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Connector that never reaches a transport: used to prove the mic is the
/// first thing a session opens.
struct RefusingConnector;

#[async_trait]
impl RealtimeConnector for RefusingConnector {
    async fn connect(&self, _config: LiveConfig) -> VoiceResult<RealtimeChannel> {
        Err(VoiceError::Connect("refused by test".to_string()))
    }
}

/// Connector that plays a short scripted call: open, one audio segment,
/// close.
struct ScriptedConnector;

#[async_trait]
impl RealtimeConnector for ScriptedConnector {
    async fn connect(&self, config: LiveConfig) -> VoiceResult<RealtimeChannel> {
        assert!(!config.system_instruction.is_empty());

        let (outbound, _outbound_rx) = mpsc::unbounded_channel();
        let (event_tx, events) = mpsc::unbounded_channel();

        let frame = keepgrow_voice::encode_frame(
            &[0.25_f32; 2400],
            &keepgrow_voice::FrameConfig::default(),
        );
        event_tx.send(ServerEvent::Opened).unwrap();
        event_tx.send(ServerEvent::Audio { data: frame.data }).unwrap();
        event_tx.send(ServerEvent::Closed).unwrap();

        Ok(RealtimeChannel { outbound, events })
    }
}

#[tokio::test]
#[ignore] // Requires a microphone and speakers
async fn scripted_call_runs_to_completion() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let persona = persona_by_id("therapist").unwrap();
    let mut session = VoiceSession::start(
        &ScriptedConnector,
        ProviderConfig::default(),
        persona,
        Some("[CONTEXT: test]"),
    )
    .await
    .expect("Failed to start session");

    assert_eq!(session.phase(), SessionPhase::Connecting);

    timeout(Duration::from_secs(5), session.run())
        .await
        .expect("call did not finish")
        .expect("call failed");

    assert_eq!(session.phase(), SessionPhase::Closed);
}

#[tokio::test]
#[ignore] // Requires a microphone; proves no connect happens without one
async fn connect_refusal_fails_session_start() {
    let persona = persona_by_id("therapist").unwrap();
    let result =
        VoiceSession::start(&RefusingConnector, ProviderConfig::default(), persona, None).await;
    assert!(matches!(result, Err(VoiceError::Connect(_))));
}

#[tokio::test]
#[ignore] // Requires audio hardware AND a real API key; speaks to the provider
async fn live_call_opens_and_closes() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let _ = dotenvy::dotenv();

    let provider = ProviderConfig::from_env();
    if provider.api_key().is_none() {
        eprintln!("Skipping: no KEEPGROW_API_KEY / GEMINI_API_KEY set");
        return;
    }

    let persona = persona_by_id("therapist").unwrap();
    let mut session = VoiceSession::start(&GeminiLiveConnector, provider, persona, None)
        .await
        .expect("Failed to start live session");

    // Give the call a few seconds to open, then hang up.
    let _ = timeout(Duration::from_secs(5), session.run()).await;
    session.close();
}
