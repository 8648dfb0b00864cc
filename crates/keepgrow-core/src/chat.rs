//! Turn-based text chat with one persona.
//!
//! A session owns the ordered transcript. Sending a user turn opens a
//! streaming reply seeded with the full prior transcript and the persona's
//! instruction text; fragments are applied to a single placeholder companion
//! turn in arrival order until the stream ends. At most one exchange may be
//! in flight per session.

use crate::config::ProviderConfig;
use crate::error::{CoreError, CoreResult};
use crate::persona::Persona;
use crate::profile::AssessmentResult;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Sender of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Companion,
}

/// One transcript entry. Identity is fixed at creation; only the content of
/// the trailing companion message grows while a reply streams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn companion(content: impl Into<String>) -> Self {
        Self::new(Role::Companion, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Shown as the entire reply when the streaming capability fails.
pub const APOLOGY_FRAGMENT: &str =
    "I'm having a little trouble connecting to my thoughts right now. Please try again in a moment.";

/// Streaming text capability: one producer task pushes fragments, the
/// session applies them in arrival order. Implementations must yield the
/// apology fragment instead of raising on provider failure.
pub trait ChatBackend: Send + Sync {
    fn open_stream(
        &self,
        instruction: &str,
        history: &[Message],
        user_text: &str,
    ) -> mpsc::UnboundedReceiver<String>;
}

/// Real streaming backend: SSE over the provider's streamGenerateContent.
pub struct GeminiChatBackend {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl GeminiChatBackend {
    pub fn from_env() -> Self {
        Self::new(ProviderConfig::from_env())
    }

    pub fn new(config: ProviderConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }

    async fn stream_reply(
        config: ProviderConfig,
        client: reqwest::Client,
        body: serde_json::Value,
        tx: mpsc::UnboundedSender<String>,
    ) -> Result<(), String> {
        let api_key = config.api_key().ok_or("No API key configured")?;
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            config.base_url, config.chat_model, api_key
        );

        let response = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("chat request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("chat API error: {}", response.status()));
        }

        // Parse the SSE stream: "data: {...}" lines, one JSON chunk each.
        let mut stream = response.bytes_stream();
        let mut pending = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| format!("stream error: {}", e))?;
            pending.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(pos) = pending.find('\n') {
                let line = pending[..pos].trim().to_string();
                pending.drain(..=pos);
                let Some(json_str) = line.strip_prefix("data: ") else { continue };
                if json_str == "[DONE]" {
                    return Ok(());
                }
                if let Ok(json) = serde_json::from_str::<serde_json::Value>(json_str) {
                    if let Some(text) =
                        json["candidates"][0]["content"]["parts"][0]["text"].as_str()
                    {
                        if tx.send(text.to_string()).is_err() {
                            // Consumer gone; remaining output is ignored.
                            return Ok(());
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl ChatBackend for GeminiChatBackend {
    fn open_stream(
        &self,
        instruction: &str,
        history: &[Message],
        user_text: &str,
    ) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut contents: Vec<serde_json::Value> = history
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": match msg.role { Role::User => "user", Role::Companion => "model" },
                    "parts": [{ "text": msg.content }],
                })
            })
            .collect();
        contents.push(serde_json::json!({
            "role": "user",
            "parts": [{ "text": user_text }],
        }));

        let body = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": instruction }] },
            "contents": contents,
            "generationConfig": { "temperature": 0.7 },
        });

        let config = self.config.clone();
        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(e) = Self::stream_reply(config, client, body, tx.clone()).await {
                warn!("Chat stream failed: {}", e);
                let _ = tx.send(APOLOGY_FRAGMENT.to_string());
            }
        });

        rx
    }
}

/// A turn-based conversation with one persona.
pub struct ChatSession {
    persona: Persona,
    messages: Vec<Message>,
    in_flight: bool,
}

impl ChatSession {
    /// Start from saved messages, or seed the persona's greeting when empty.
    pub fn new(persona: Persona, saved: Vec<Message>) -> Self {
        let messages = if saved.is_empty() {
            vec![Message::companion(persona.greeting())]
        } else {
            saved
        };
        Self { persona, messages, in_flight: false }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether a reply is currently streaming. Callers must not begin a
    /// second exchange while this is true.
    pub fn is_streaming(&self) -> bool {
        self.in_flight
    }

    /// Append the user turn and the placeholder companion turn. Rejects when
    /// an exchange is already in flight; no queuing.
    pub fn begin_exchange(&mut self, user_text: &str) -> CoreResult<()> {
        if self.in_flight {
            return Err(CoreError::ExchangeInFlight);
        }
        self.messages.push(Message::user(user_text));
        self.messages.push(Message::companion(""));
        self.in_flight = true;
        Ok(())
    }

    /// Apply one streamed fragment to the placeholder companion turn.
    pub fn apply_fragment(&mut self, fragment: &str) {
        if let Some(last) = self.messages.last_mut() {
            if last.role == Role::Companion {
                last.content.push_str(fragment);
            }
        }
    }

    /// Mark the in-flight exchange finished.
    pub fn finish_exchange(&mut self) -> CoreResult<()> {
        if !self.in_flight {
            return Err(CoreError::NoExchange);
        }
        self.in_flight = false;
        Ok(())
    }

    /// Drive one full exchange: open the stream seeded with the prior
    /// transcript, apply fragments in arrival order, finish.
    pub async fn run_exchange(
        &mut self,
        backend: &dyn ChatBackend,
        user_text: &str,
    ) -> CoreResult<()> {
        // Prior transcript, captured before this turn is appended.
        let history = self.messages.clone();
        self.begin_exchange(user_text)?;

        let instruction = self.persona.system_instruction.clone();
        let mut rx = backend.open_stream(&instruction, &history, user_text);
        while let Some(fragment) = rx.recv().await {
            debug!(len = fragment.len(), "chat fragment");
            self.apply_fragment(&fragment);
        }

        self.finish_exchange()
    }

    /// Reset the transcript to the persona's greeting.
    pub fn clear(&mut self) {
        self.messages = vec![Message::companion(self.persona.greeting())];
        self.in_flight = false;
    }
}

/// The share-into-chat text block for the latest assessment result.
pub fn share_results_message(result: &AssessmentResult) -> String {
    format!(
        "I'd like to share my latest DASS-21 assessment results with you for review.\n\n\
         📅 Date: {}\n\
         📊 Status: {} (Score: {})\n\n\
         Breakdown:\n\
         • Depression: {} ({})\n\
         • Anxiety: {} ({})\n\
         • Stress: {} ({})\n\n\
         AI Summary: {}\n\n\
         Can you please provide some advice based on these results?",
        result.date,
        result.label,
        result.score,
        result.breakdown.depression.score,
        result.breakdown.depression.level,
        result.breakdown.anxiety.score,
        result.breakdown.anxiety.level,
        result.breakdown.stress.score,
        result.breakdown.stress.level,
        result.analysis.overall_summary,
    )
}
