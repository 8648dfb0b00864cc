//! Realtime transport: the connector seam and its Gemini Live websocket
//! implementation.
//!
//! The session layer talks only to [`RealtimeConnector`]; tests plug in a
//! scripted connector, production uses [`GeminiLiveConnector`] speaking the
//! BidiGenerateContent protocol over tokio-tungstenite.

use crate::error::{VoiceError, VoiceResult};
use crate::pcm::RealtimeFrame;
use futures::{SinkExt, StreamExt};
use keepgrow_core::ProviderConfig;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};

/// What a session needs to open one live call.
#[derive(Debug, Clone)]
pub struct LiveConfig {
    pub provider: ProviderConfig,
    /// Full instruction text (persona instruction plus optional wellness
    /// context, already composed by the session).
    pub system_instruction: String,
    /// Prebuilt provider voice id.
    pub voice_name: String,
}

/// Frames the session sends to the transport.
#[derive(Debug, Clone)]
pub enum ClientFrame {
    Audio(RealtimeFrame),
    Close,
}

/// Events the transport delivers to the session, in arrival order.
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// Setup acknowledged; the call is live.
    Opened,
    /// One base64 PCM audio segment from the model.
    Audio { data: String },
    /// The model was interrupted by user speech; drop queued playback.
    Interrupted,
    /// The peer closed the call normally.
    Closed,
    /// Transport or protocol failure; the session transitions to failed.
    Error(String),
}

/// Both directions of one established call.
pub struct RealtimeChannel {
    pub outbound: mpsc::UnboundedSender<ClientFrame>,
    pub events: mpsc::UnboundedReceiver<ServerEvent>,
}

/// Opens realtime calls. The connector owns transport concerns; the session
/// owns lifecycle and audio scheduling.
#[async_trait::async_trait]
pub trait RealtimeConnector: Send + Sync {
    async fn connect(&self, config: LiveConfig) -> VoiceResult<RealtimeChannel>;
}

/// Gemini Live connector over a websocket.
pub struct GeminiLiveConnector;

#[async_trait::async_trait]
impl RealtimeConnector for GeminiLiveConnector {
    async fn connect(&self, config: LiveConfig) -> VoiceResult<RealtimeChannel> {
        let api_key = config
            .provider
            .api_key()
            .ok_or_else(|| VoiceError::Config("No API key configured".to_string()))?;
        let url = format!("{}?key={}", config.provider.live_url, api_key);

        info!("📡 Connecting live call ({})", config.provider.live_model);
        let (ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .map_err(|e| VoiceError::Connect(e.to_string()))?;
        let (mut ws_tx, mut ws_rx) = ws.split();

        let setup = json!({
            "setup": {
                "model": format!("models/{}", config.provider.live_model),
                "generationConfig": {
                    "responseModalities": ["AUDIO"],
                    "speechConfig": {
                        "voiceConfig": {
                            "prebuiltVoiceConfig": { "voiceName": config.voice_name }
                        }
                    }
                },
                "systemInstruction": {
                    "parts": [{ "text": config.system_instruction }]
                }
            }
        });
        ws_tx
            .send(WsMessage::Text(setup.to_string()))
            .await
            .map_err(|e| VoiceError::Connect(format!("setup send failed: {}", e)))?;

        let (event_tx, events) = mpsc::unbounded_channel();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<ClientFrame>();

        // Writer task: client frames -> websocket.
        tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                match frame {
                    ClientFrame::Audio(frame) => {
                        let msg = json!({
                            "realtimeInput": {
                                "mediaChunks": [{
                                    "mimeType": frame.mime_type,
                                    "data": frame.data,
                                }]
                            }
                        });
                        if ws_tx.send(WsMessage::Text(msg.to_string())).await.is_err() {
                            warn!("Live call writer closed mid-stream");
                            break;
                        }
                    }
                    ClientFrame::Close => {
                        let _ = ws_tx.send(WsMessage::Close(None)).await;
                        break;
                    }
                }
            }
        });

        // Reader task: websocket -> server events.
        tokio::spawn(async move {
            while let Some(msg) = ws_rx.next().await {
                let payload = match msg {
                    Ok(WsMessage::Text(text)) => text.into_bytes(),
                    Ok(WsMessage::Binary(bytes)) => bytes,
                    Ok(WsMessage::Close(_)) => {
                        let _ = event_tx.send(ServerEvent::Closed);
                        break;
                    }
                    Ok(_) => continue,
                    Err(e) => {
                        let _ = event_tx.send(ServerEvent::Error(e.to_string()));
                        break;
                    }
                };

                let json: serde_json::Value = match serde_json::from_slice(&payload) {
                    Ok(v) => v,
                    Err(e) => {
                        debug!("Unparseable live message: {}", e);
                        continue;
                    }
                };

                if json.get("setupComplete").is_some() {
                    if event_tx.send(ServerEvent::Opened).is_err() {
                        break;
                    }
                    continue;
                }

                let content = &json["serverContent"];
                if content["interrupted"].as_bool() == Some(true) {
                    if event_tx.send(ServerEvent::Interrupted).is_err() {
                        break;
                    }
                    continue;
                }
                if let Some(parts) = content["modelTurn"]["parts"].as_array() {
                    for part in parts {
                        if let Some(data) = part["inlineData"]["data"].as_str() {
                            if event_tx
                                .send(ServerEvent::Audio { data: data.to_string() })
                                .is_err()
                            {
                                return;
                            }
                        }
                    }
                }
            }
            let _ = event_tx.send(ServerEvent::Closed);
        });

        Ok(RealtimeChannel { outbound, events })
    }
}
