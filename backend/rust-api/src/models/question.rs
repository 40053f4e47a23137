use serde::{Deserialize, Serialize};

use crate::utils::text::strip_html;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetInfo {
    #[serde(default)]
    pub name: String,
}

/// A single-answer question read word by word until someone buzzes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tossup {
    pub question: String,
    #[serde(default)]
    pub question_sanitized: String,
    pub answer: String,
    #[serde(default)]
    pub answer_sanitized: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub set: Option<SetInfo>,
}

impl Tossup {
    /// Fills the sanitized fields for payloads that only carry raw markup.
    pub fn normalize(&mut self) {
        if self.question_sanitized.is_empty() {
            self.question_sanitized = strip_html(&self.question);
        }
        if self.answer_sanitized.is_empty() {
            self.answer_sanitized = strip_html(&self.answer);
        }
    }

    pub fn set_name(&self) -> Option<String> {
        self.set.as_ref().map(|s| s.name.clone())
    }
}

/// A multi-part question: a shared leadin followed by parts answered in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bonus {
    #[serde(default)]
    pub leadin: String,
    #[serde(default)]
    pub leadin_sanitized: String,
    pub parts: Vec<String>,
    #[serde(default)]
    pub parts_sanitized: Vec<String>,
    pub answers: Vec<String>,
    #[serde(default)]
    pub answers_sanitized: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub set: Option<SetInfo>,
}

impl Bonus {
    pub fn normalize(&mut self) {
        if self.leadin_sanitized.is_empty() {
            self.leadin_sanitized = strip_html(&self.leadin);
        }
        if self.parts_sanitized.len() != self.parts.len() {
            self.parts_sanitized = self.parts.iter().map(|p| strip_html(p)).collect();
        }
        if self.answers_sanitized.len() != self.answers.len() {
            self.answers_sanitized = self.answers.iter().map(|a| strip_html(a)).collect();
        }
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn set_name(&self) -> Option<String> {
        self.set.as_ref().map(|s| s.name.clone())
    }
}

/// Verdict returned by the bank's judging endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Judgement {
    pub directive: String,
    #[serde(default, alias = "directedPrompt")]
    pub directed_prompt: Option<String>,
}

impl Judgement {
    pub fn correct(&self) -> bool {
        self.directive == "accept"
    }
}

/// Judged answers for a bonus, appended strictly in part order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BonusProgress {
    entries: Vec<BonusPartResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusPartResult {
    pub answer: String,
    pub correct: bool,
}

impl BonusProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[BonusPartResult] {
        &self.entries
    }

    /// Index of the next unanswered part.
    pub fn next_part(&self) -> usize {
        self.entries.len()
    }

    pub fn is_complete(&self, part_count: usize) -> bool {
        self.entries.len() >= part_count
    }

    /// Appends the judged answer for the next unanswered part and returns
    /// its index, or `None` when every part has already been answered.
    pub fn record(&mut self, part_count: usize, answer: String, correct: bool) -> Option<usize> {
        if self.entries.len() >= part_count {
            return None;
        }
        self.entries.push(BonusPartResult { answer, correct });
        Some(self.entries.len() - 1)
    }
}
