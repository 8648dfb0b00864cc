//! User profile, assessment history, and the application state container.
//!
//! All state an app instance needs lives in one `AppState` value owned by
//! the caller. Nothing here is global; two instances never share data.

use crate::analysis::AiAnalysis;
use crate::chat::Message;
use crate::scoring::{ScoreReport, Severity};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// One subscale outcome as stored in history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryOutcome {
    pub score: u16,
    pub level: Severity,
    pub explanation: String,
}

impl CategoryOutcome {
    fn from_part(part: &crate::scoring::CategoryScore) -> Self {
        Self {
            score: part.score,
            level: part.level,
            explanation: part.level.explanation().to_string(),
        }
    }
}

/// Per-category breakdown of one finished assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breakdown {
    pub depression: CategoryOutcome,
    pub anxiety: CategoryOutcome,
    pub stress: CategoryOutcome,
}

/// A finished assessment as it appears in the user's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Completion date, "Jan 2, 2026" style.
    pub date: String,
    /// Combined doubled score across all three subscales.
    pub score: u16,
    /// Overall status label ("Healthy", "Moderate", "Severe", ...).
    pub label: String,
    /// One-line summary (the analysis overall summary).
    pub summary: String,
    pub breakdown: Breakdown,
    pub analysis: AiAnalysis,
}

impl AssessmentResult {
    /// Assemble a history entry from a score report and its guidance text.
    /// Numeric scores pass through from the report unchanged.
    pub fn from_report(report: &ScoreReport, analysis: AiAnalysis) -> Self {
        Self {
            date: Utc::now().format("%b %-d, %Y").to_string(),
            score: report.total,
            label: report.overall_label(),
            summary: analysis.overall_summary.clone(),
            breakdown: Breakdown {
                depression: CategoryOutcome::from_part(&report.depression),
                anxiety: CategoryOutcome::from_part(&report.anxiety),
                stress: CategoryOutcome::from_part(&report.stress),
            },
            analysis,
        }
    }
}

/// Identity and assessment history for the active user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub member_since: String,
    /// Most recent first.
    pub history: Vec<AssessmentResult>,
}

impl UserProfile {
    /// The anonymous profile used before login and after logout.
    pub fn guest() -> Self {
        Self {
            name: "Guest User".to_string(),
            email: "guest@keepgrow.ai".to_string(),
            member_since: "Oct 2023".to_string(),
            history: Vec::new(),
        }
    }
}

/// Everything one app instance holds: profile, preferences, and saved chat
/// transcripts keyed by persona id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    pub profile: UserProfile,
    pub logged_in: bool,
    pub dark_mode: bool,
    transcripts: HashMap<String, Vec<Message>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            profile: UserProfile::guest(),
            logged_in: false,
            dark_mode: false,
            transcripts: HashMap::new(),
        }
    }

    /// Start a session for `name`. The derived email is the lowercased name
    /// with whitespace collapsed to dots; history starts empty.
    pub fn login(&mut self, name: &str) {
        let handle = name
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(".");
        self.profile = UserProfile {
            name: name.trim().to_string(),
            email: format!("{}@keepgrow.ai", handle),
            member_since: Utc::now().format("%b %Y").to_string(),
            history: Vec::new(),
        };
        self.logged_in = true;
        info!("👤 Logged in as {}", self.profile.name);
    }

    /// End the session. Resets to the guest profile and discards every
    /// saved transcript; no conversation survives logout.
    pub fn logout(&mut self) {
        self.profile = UserProfile::guest();
        self.logged_in = false;
        self.transcripts.clear();
        info!("👤 Logged out; transcripts cleared");
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    /// File a finished assessment at the front of the history.
    pub fn record_assessment(&mut self, result: AssessmentResult) {
        info!("📊 Recorded assessment: {} ({})", result.label, result.score);
        self.profile.history.insert(0, result);
    }

    /// Most recent assessment, if any.
    pub fn latest_result(&self) -> Option<&AssessmentResult> {
        self.profile.history.first()
    }

    /// Save a chat transcript for later resumption.
    pub fn save_transcript(&mut self, persona_id: &str, messages: Vec<Message>) {
        self.transcripts.insert(persona_id.to_string(), messages);
    }

    /// Saved transcript for a persona, empty when none exists.
    pub fn transcript(&self, persona_id: &str) -> Vec<Message> {
        self.transcripts.get(persona_id).cloned().unwrap_or_default()
    }

    /// Drop one persona's saved transcript.
    pub fn clear_transcript(&mut self, persona_id: &str) {
        self.transcripts.remove(persona_id);
    }

    /// Wellness-context block injected into a voice session's instruction
    /// text, built from the latest history entry. `None` when the history
    /// is empty, in which case no context is injected at all.
    pub fn voice_context(&self) -> Option<String> {
        let latest = self.latest_result()?;
        Some(format!(
            "[CONTEXT: The user recently completed a wellness assessment on {}. \
             Overall status: {} (Score: {}). \
             Depression: {}, Anxiety: {}, Stress: {}. \
             AI Summary: {}. \
             Keep this in mind and be supportive, but do not bring it up unless relevant.]",
            latest.date,
            latest.label,
            latest.score,
            latest.breakdown.depression.level,
            latest.breakdown.anxiety.level,
            latest.breakdown.stress.level,
            latest.analysis.overall_summary,
        ))
    }
}
