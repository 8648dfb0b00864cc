//! Voice Call Demo — live conversation with a companion persona.
//!
//! Requires a microphone, speakers, and `KEEPGROW_API_KEY` (or
//! `GEMINI_API_KEY`) in the environment or `.env`.
//!
//! Pass a persona id as the first argument (default: `therapist`).

use keepgrow_core::{persona_by_id, ProviderConfig};
use keepgrow_voice::{GeminiLiveConnector, VoiceSession};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let persona_id = std::env::args().nth(1).unwrap_or_else(|| "therapist".to_string());
    let persona = persona_by_id(&persona_id)
        .ok_or_else(|| format!("unknown persona: {}", persona_id))?;

    info!("Voice Call Demo — talking to {} ({})", persona.name, persona.role);
    info!("Press Ctrl+C to hang up.\n");

    let connector = GeminiLiveConnector;
    let mut session =
        VoiceSession::start(&connector, ProviderConfig::from_env(), persona, None).await?;

    tokio::select! {
        result = session.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Hanging up."),
    }
    session.close();
    Ok(())
}
