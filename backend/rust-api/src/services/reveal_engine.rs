use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Cadence of the word-by-word reveal, approximating a human reading pace.
pub const WORD_INTERVAL_MS: i64 = 150;

/// Window after the last word during which a buzz still counts, so a reader
/// who buzzes right as the question ends is not penalized by latency.
pub const GRACE_PERIOD_MS: i64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealPhase {
    Waiting,
    Reading,
    GracePeriod,
    Buzzed,
    Over,
}

impl RevealPhase {
    pub fn name(self) -> &'static str {
        match self {
            RevealPhase::Waiting => "waiting",
            RevealPhase::Reading => "reading",
            RevealPhase::GracePeriod => "grace_period",
            RevealPhase::Buzzed => "buzzed",
            RevealPhase::Over => "over",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RevealEvent {
    StartReading,
    Tick,
    Buzz,
    Judged { answer: String, correct: bool },
}

/// How a tossup ended. A grace-period expiry is its own outcome, distinct
/// from an incorrect answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum TossupOutcome {
    Correct { answer: String },
    Incorrect { answer: String },
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {event} while the tossup is in the {phase} phase")]
pub struct TransitionError {
    pub event: &'static str,
    pub phase: &'static str,
}

/// Reveal machine for one tossup. Transitions are deterministic in
/// (current state, wall-clock instant, event); nothing here owns a timer,
/// callers feed `Tick` events on whatever cadence they poll at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealState {
    phase: RevealPhase,
    word_count: usize,
    word_index: i64,
    next_word_at: Option<DateTime<Utc>>,
    grace_deadline: Option<DateTime<Utc>>,
    outcome: Option<TossupOutcome>,
}

impl RevealState {
    pub fn new(word_count: usize) -> Self {
        Self {
            phase: RevealPhase::Waiting,
            word_count,
            word_index: -1,
            next_word_at: None,
            grace_deadline: None,
            outcome: None,
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn word_index(&self) -> i64 {
        self.word_index
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Number of words currently visible.
    pub fn revealed_words(&self) -> usize {
        (self.word_index + 1).max(0) as usize
    }

    pub fn outcome(&self) -> Option<&TossupOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.phase == RevealPhase::Over
    }

    /// Milliseconds left to buzz, only meaningful during the grace period.
    pub fn grace_remaining_ms(&self, now: DateTime<Utc>) -> Option<i64> {
        if self.phase != RevealPhase::GracePeriod {
            return None;
        }
        self.grace_deadline
            .map(|deadline| (deadline - now).num_milliseconds().max(0))
    }

    pub fn apply(
        &mut self,
        now: DateTime<Utc>,
        event: RevealEvent,
    ) -> Result<(), TransitionError> {
        match event {
            RevealEvent::Tick => {
                self.tick(now);
                Ok(())
            }
            RevealEvent::StartReading => self.start(now),
            RevealEvent::Buzz => self.buzz(now),
            RevealEvent::Judged { answer, correct } => self.judged(answer, correct),
        }
    }

    fn start(&mut self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        if self.phase != RevealPhase::Waiting {
            return Err(self.rejected("start reading"));
        }
        if self.word_count == 0 {
            // nothing to read, go straight to the buzz window
            self.enter_grace(now);
            return Ok(());
        }
        self.word_index = 0;
        if self.word_count == 1 {
            self.enter_grace(now);
        } else {
            self.phase = RevealPhase::Reading;
            self.next_word_at = Some(now + Duration::milliseconds(WORD_INTERVAL_MS));
        }
        Ok(())
    }

    fn tick(&mut self, now: DateTime<Utc>) {
        if self.phase == RevealPhase::Reading {
            // Catch up on every word whose scheduled time has passed; a late
            // tick reveals several at once but never runs past the last word.
            while let Some(due) = self.next_word_at {
                if now < due {
                    break;
                }
                self.word_index += 1;
                if (self.word_index as usize) + 1 >= self.word_count {
                    // grace is measured from the moment the last word showed
                    self.enter_grace(due);
                } else {
                    self.next_word_at = Some(due + Duration::milliseconds(WORD_INTERVAL_MS));
                }
            }
        }
        if self.phase == RevealPhase::GracePeriod {
            self.expire_grace(now);
        }
    }

    fn buzz(&mut self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        // a buzz that arrives after the grace deadline loses the race
        self.tick(now);
        match self.phase {
            RevealPhase::Reading | RevealPhase::GracePeriod => {
                self.phase = RevealPhase::Buzzed;
                self.next_word_at = None;
                self.grace_deadline = None;
                Ok(())
            }
            _ => Err(self.rejected("buzz")),
        }
    }

    fn judged(&mut self, answer: String, correct: bool) -> Result<(), TransitionError> {
        if self.phase != RevealPhase::Buzzed {
            return Err(self.rejected("submit an answer"));
        }
        self.phase = RevealPhase::Over;
        self.outcome = Some(if correct {
            TossupOutcome::Correct { answer }
        } else {
            TossupOutcome::Incorrect { answer }
        });
        Ok(())
    }

    fn enter_grace(&mut self, revealed_at: DateTime<Utc>) {
        self.phase = RevealPhase::GracePeriod;
        self.next_word_at = None;
        self.grace_deadline = Some(revealed_at + Duration::milliseconds(GRACE_PERIOD_MS));
    }

    fn expire_grace(&mut self, now: DateTime<Utc>) {
        if let Some(deadline) = self.grace_deadline {
            if now >= deadline {
                self.phase = RevealPhase::Over;
                self.grace_deadline = None;
                self.outcome = Some(TossupOutcome::TimedOut);
            }
        }
    }

    fn rejected(&self, event: &'static str) -> TransitionError {
        TransitionError {
            event,
            phase: self.phase.name(),
        }
    }
}
