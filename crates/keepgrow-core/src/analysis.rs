//! Structured analysis of a finished assessment.
//!
//! One JSON-mode provider call turns the three category scores into gentle
//! guidance text. The call is raced against a 5-second timeout; timeout,
//! transport error, and malformed body all fall back to deterministic local
//! content built from the scores — the caller never sees an error.

use crate::config::ProviderConfig;
use crate::scoring::ScoreReport;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Guidance fields returned by the analysis capability. The shapes and key
/// names are part of the provider contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    pub overall_summary: String,
    pub what_this_means: String,
    pub suggestions: Vec<String>,
    pub support_note: String,
}

impl AiAnalysis {
    /// Deterministic local fallback, populated from the report's levels.
    pub fn fallback(report: &ScoreReport) -> Self {
        Self {
            overall_summary: format!(
                "Your results indicate {} stress, {} anxiety, and {} depression levels.",
                report.stress.level.label().to_lowercase(),
                report.anxiety.level.label().to_lowercase(),
                report.depression.level.label().to_lowercase(),
            ),
            what_this_means: "These scores reflect your emotional state over the past week. \
                It is completely valid to feel this way."
                .to_string(),
            suggestions: vec![
                "Prioritize rest today.".to_string(),
                "Connect with a loved one.".to_string(),
                "Try a 5-minute meditation.".to_string(),
            ],
            support_note: "This is a screening tool, not a diagnosis. If you feel overwhelmed, \
                please see a professional."
                .to_string(),
        }
    }
}

// Provider request/response shapes (generateContent, JSON mode).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

/// Bridge to the structured-analysis capability.
pub struct AnalysisBridge {
    config: ProviderConfig,
    client: reqwest::Client,
}

/// Hard deadline for the analysis call; past it the fallback is used.
const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(5);

impl AnalysisBridge {
    /// Create a bridge from environment config. Returns `None` when no API
    /// key is available (callers then use `AiAnalysis::fallback` directly).
    pub fn from_env() -> Option<Self> {
        let config = ProviderConfig::from_env();
        config.api_key()?;
        Some(Self::new(config))
    }

    pub fn new(config: ProviderConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client }
    }

    /// Analyze a score report. Infallible: every failure path substitutes
    /// the local fallback, so the resulting assessment always has guidance
    /// text and the numeric scores pass through unchanged.
    pub async fn analyze(&self, report: &ScoreReport) -> AiAnalysis {
        match tokio::time::timeout(ANALYSIS_TIMEOUT, self.request_analysis(report)).await {
            Ok(Ok(analysis)) => analysis,
            Ok(Err(e)) => {
                warn!("Analysis call failed, using fallback: {}", e);
                AiAnalysis::fallback(report)
            }
            Err(_) => {
                warn!("Analysis call timed out after {:?}, using fallback", ANALYSIS_TIMEOUT);
                AiAnalysis::fallback(report)
            }
        }
    }

    async fn request_analysis(&self, report: &ScoreReport) -> Result<AiAnalysis, String> {
        let api_key = self.config.api_key().ok_or("No API key configured")?;

        let prompt = analysis_prompt(report);
        let body = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt }] }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.chat_model, api_key
        );

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("analysis request failed: {}", e))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("analysis API error {}: {}", status, body));
        }

        let parsed: GenerateResponse = res
            .json()
            .await
            .map_err(|e| format!("analysis response parse failed: {}", e))?;

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or("empty analysis response")?;

        debug!("Analysis payload: {}", text);
        serde_json::from_str::<AiAnalysis>(text)
            .map_err(|e| format!("malformed analysis JSON: {}", e))
    }
}

fn analysis_prompt(report: &ScoreReport) -> String {
    format!(
        "The user completed the DASS-21 assessment.\n\
         Scores:\n\
         - Depression: {} ({})\n\
         - Anxiety: {} ({})\n\
         - Stress: {} ({})\n\n\
         Please provide a supportive, non-clinical, and simple analysis in JSON format. \
         Language must be gentle, safe, and easy to understand. Avoid scary medical jargon.\n\n\
         The response must follow this schema:\n\
         {{\n\
           \"overallSummary\": \"Briefly explain which area is highest and what that feels like emotionally.\",\n\
           \"whatThisMeans\": \"Explain in easy words how these scores relate to daily life (mood, sleep, focus).\",\n\
           \"suggestions\": [\"Suggestion 1\", \"Suggestion 2\", \"Suggestion 3\", \"Suggestion 4\", \"Suggestion 5\"],\n\
           \"supportNote\": \"A clear statement that this is not a diagnosis and professional help is recommended if scores are high.\"\n\
         }}",
        report.depression.score,
        report.depression.level,
        report.anxiety.score,
        report.anxiety.level,
        report.stress.score,
        report.stress.level,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::AnswerSet;
    use crate::scoring::score_answers;

    #[test]
    fn fallback_populates_all_four_fields() {
        let report = score_answers(&AnswerSet::new());
        let analysis = AiAnalysis::fallback(&report);
        assert!(analysis.overall_summary.contains("normal stress"));
        assert!(!analysis.what_this_means.is_empty());
        assert_eq!(analysis.suggestions.len(), 3);
        assert!(analysis.support_note.contains("not a diagnosis"));
    }

    #[test]
    fn analysis_json_uses_provider_field_names() {
        let json = r#"{
            "overallSummary": "Stress is your highest area.",
            "whatThisMeans": "You may feel tense.",
            "suggestions": ["Rest", "Walk"],
            "supportNote": "Not a diagnosis."
        }"#;
        let parsed: AiAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.overall_summary, "Stress is your highest area.");
        assert_eq!(parsed.suggestions.len(), 2);

        let round = serde_json::to_value(&parsed).unwrap();
        assert!(round.get("overallSummary").is_some());
        assert!(round.get("supportNote").is_some());
    }

    #[tokio::test]
    async fn analyze_without_key_falls_back() {
        let bridge = AnalysisBridge::new(ProviderConfig::default());
        let report = score_answers(&AnswerSet::new());
        let analysis = bridge.analyze(&report).await;
        assert_eq!(analysis.suggestions.len(), 3);
    }
}
