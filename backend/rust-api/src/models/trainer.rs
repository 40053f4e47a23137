use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Category, Difficulty, QuestionType};
use crate::services::reveal_engine::{RevealPhase, TossupOutcome};

#[derive(Debug, Deserialize, Validate)]
pub struct NewQuestionRequest {
    pub question_type: QuestionType,
    #[validate(length(min = 1, message = "select at least one difficulty"))]
    pub difficulties: Vec<Difficulty>,
    #[validate(length(min = 1, message = "select at least one category"))]
    pub categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: String,
}

/// Snapshot of the practice session the UI renders from.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrainerStateResponse {
    pub question: Option<QuestionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tossup: Option<TossupView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus: Option<BonusView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionSummary {
    pub question_type: QuestionType,
    pub set_name: Option<String>,
    pub category: String,
    pub difficulty: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TossupView {
    pub phase: RevealPhase,
    pub revealed_text: String,
    pub word_index: i64,
    pub word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace_remaining_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<TossupOutcome>,
    /// Canonical answer, exposed once the tossup is over.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BonusView {
    pub leadin: String,
    pub parts: Vec<String>,
    /// Index of the next part open for answering, equal to `parts.len()`
    /// once the bonus is complete.
    pub current_part: usize,
    pub results: Vec<BonusPartView>,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BonusPartView {
    pub answer: String,
    pub correct: bool,
    /// Canonical answer, shown for parts answered incorrectly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

/// Review payload offered once a tossup is over or a bonus is complete:
/// canonical answers plus ready-made prompts for the explanation endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReviewResponse {
    Tossup {
        answer: String,
        summary_prompt: String,
        clues: Vec<ReviewClue>,
    },
    Bonus {
        leadin: String,
        summary_prompt: String,
        parts: Vec<ReviewPart>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewClue {
    pub text: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewPart {
    pub part: String,
    pub answer: String,
    pub prompt: String,
}
