//! keepgrow-core: mental-wellness companion core (personas, DASS-21
//! assessment, streaming chat, structured analysis, profile state).
//!
//! Everything here is UI-agnostic. A frontend owns one [`AppState`], builds
//! sessions from the persona registry, and talks to the provider through the
//! chat and analysis bridges. The realtime voice pipeline lives in the
//! companion crate `keepgrow-voice`, which consumes these types.

mod analysis;
mod assessment;
mod chat;
mod config;
mod error;
mod persona;
mod profile;
mod scoring;

// Errors
pub use error::{CoreError, CoreResult};

// Provider configuration (chat + analysis + live endpoints)
pub use config::ProviderConfig;

// Persona registry
pub use persona::{persona_by_id, personas, FriendVariant, Persona};

// DASS-21 questionnaire + scoring
pub use assessment::{AnswerSet, Category, Question, ANSWER_OPTIONS, QUESTIONS};
pub use scoring::{score_answers, severity_for, CategoryScore, ScoreReport, Severity};

// Structured analysis with local fallback
pub use analysis::{AiAnalysis, AnalysisBridge};

// Streaming chat
pub use chat::{
    share_results_message, ChatBackend, ChatSession, GeminiChatBackend, Message, Role,
    APOLOGY_FRAGMENT,
};

// Profile, history, and the per-instance state container
pub use profile::{AppState, AssessmentResult, Breakdown, CategoryOutcome, UserProfile};
