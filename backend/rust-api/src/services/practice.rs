use chrono::{DateTime, Utc};
use validator::Validate;

use crate::metrics::{
    ANSWERS_SUBMITTED_TOTAL, BUZZES_TOTAL, QUESTIONS_FETCHED_TOTAL, TOSSUPS_TIMED_OUT_TOTAL,
};
use crate::models::packet::{LoadPacketRequest, PacketResponse, PacketSession};
use crate::models::search::{PageDirection, SearchRequest, SearchResponse, SearchSession};
use crate::models::trainer::{
    BonusPartView, BonusView, NewQuestionRequest, QuestionSummary, ReviewClue, ReviewPart,
    ReviewResponse, TossupView, TrainerStateResponse,
};
use crate::models::{Bonus, BonusProgress, QuestionType, Tossup};
use crate::services::explanation::{
    answer_summary_prompt, bonus_leadin_prompt, bonus_part_prompt, clue_prompt,
};
use crate::services::question_bank::QuestionBankClient;
use crate::services::reveal_engine::{RevealEvent, RevealPhase, RevealState, TossupOutcome};
use crate::services::ServiceError;
use crate::utils::text::split_sentences;

/// Everything one practice session owns: the active question with its
/// reveal or bonus progress, the last search, and the loaded packet.
/// Created empty at startup; question state is replaced wholesale on every
/// successful fetch, never partially reused.
#[derive(Default)]
pub struct PracticeSession {
    pub question: Option<ActiveQuestion>,
    pub search: Option<SearchSession>,
    pub packet: Option<PacketSession>,
}

pub enum ActiveQuestion {
    Tossup {
        tossup: Tossup,
        words: Vec<String>,
        reveal: RevealState,
    },
    Bonus {
        bonus: Bonus,
        progress: BonusProgress,
    },
}

/// Session/query controller. Owns no state itself; callers pass the locked
/// session into each operation.
pub struct PracticeService<'a> {
    bank: &'a QuestionBankClient,
}

impl<'a> PracticeService<'a> {
    pub fn new(bank: &'a QuestionBankClient) -> Self {
        Self { bank }
    }

    /// Fetches a fresh question. Validation failures leave the previous
    /// question in place; fetch failures clear it.
    pub async fn request_new_question(
        &self,
        session: &mut PracticeSession,
        req: NewQuestionRequest,
    ) -> Result<TrainerStateResponse, ServiceError> {
        req.validate()?;

        match req.question_type {
            QuestionType::Tossup => {
                let tossup = match self
                    .bank
                    .random_tossup(&req.difficulties, &req.categories)
                    .await
                {
                    Ok(tossup) => tossup,
                    Err(e) => {
                        session.question = None;
                        return Err(e);
                    }
                };
                let words: Vec<String> = tossup
                    .question_sanitized
                    .split_whitespace()
                    .map(str::to_string)
                    .collect();
                let reveal = RevealState::new(words.len());
                session.question = Some(ActiveQuestion::Tossup {
                    tossup,
                    words,
                    reveal,
                });
                QUESTIONS_FETCHED_TOTAL.with_label_values(&["tossup"]).inc();
            }
            QuestionType::Bonus => {
                let bonus = match self
                    .bank
                    .random_bonus(&req.difficulties, &req.categories, true)
                    .await
                {
                    Ok(bonus) => bonus,
                    Err(e) => {
                        session.question = None;
                        return Err(e);
                    }
                };
                session.question = Some(ActiveQuestion::Bonus {
                    bonus,
                    progress: BonusProgress::new(),
                });
                QUESTIONS_FETCHED_TOTAL.with_label_values(&["bonus"]).inc();
            }
        }

        Ok(snapshot(session, Utc::now()))
    }

    /// Advances wall-clock transitions and returns the current snapshot.
    pub fn tick(&self, session: &mut PracticeSession, now: DateTime<Utc>) -> TrainerStateResponse {
        if let Some(ActiveQuestion::Tossup { tossup, reveal, .. }) = &mut session.question {
            let was_over = reveal.is_over();
            let _ = reveal.apply(now, RevealEvent::Tick);
            if !was_over
                && reveal.is_over()
                && matches!(reveal.outcome(), Some(TossupOutcome::TimedOut))
            {
                TOSSUPS_TIMED_OUT_TOTAL
                    .with_label_values(&[tossup.category.as_str()])
                    .inc();
            }
        }
        snapshot(session, now)
    }

    pub fn start_reading(
        &self,
        session: &mut PracticeSession,
        now: DateTime<Utc>,
    ) -> Result<TrainerStateResponse, ServiceError> {
        let (_, reveal) = tossup_state(session)?;
        let _ = reveal.apply(now, RevealEvent::Tick);
        reveal
            .apply(now, RevealEvent::StartReading)
            .map_err(|e| ServiceError::Validation(e.to_string()))?;
        Ok(snapshot(session, now))
    }

    pub fn buzz(
        &self,
        session: &mut PracticeSession,
        now: DateTime<Utc>,
    ) -> Result<TrainerStateResponse, ServiceError> {
        let (_, reveal) = tossup_state(session)?;
        // deadlines are honored at the moment of the buzz
        let _ = reveal.apply(now, RevealEvent::Tick);
        let interrupted = reveal.phase();
        reveal
            .apply(now, RevealEvent::Buzz)
            .map_err(|e| ServiceError::Validation(e.to_string()))?;
        BUZZES_TOTAL.with_label_values(&[interrupted.name()]).inc();
        Ok(snapshot(session, now))
    }

    /// Judges the buzzed answer against the canonical answer line. A
    /// judging failure leaves the machine in Buzzed so the submit can be
    /// retried.
    pub async fn submit_answer(
        &self,
        session: &mut PracticeSession,
        now: DateTime<Utc>,
        answer: String,
    ) -> Result<TrainerStateResponse, ServiceError> {
        let expected = {
            let (tossup, reveal) = tossup_state(session)?;
            let _ = reveal.apply(now, RevealEvent::Tick);
            if reveal.phase() != RevealPhase::Buzzed {
                return Err(ServiceError::Validation(format!(
                    "cannot submit an answer while the tossup is in the {} phase",
                    reveal.phase().name()
                )));
            }
            tossup.answer.clone()
        };

        let judgement = self.bank.check_answer(&expected, &answer).await?;
        let correct = judgement.correct();

        let (_, reveal) = tossup_state(session)?;
        reveal
            .apply(now, RevealEvent::Judged { answer, correct })
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let correct_label = if correct { "true" } else { "false" };
        ANSWERS_SUBMITTED_TOTAL
            .with_label_values(&["tossup", correct_label])
            .inc();

        Ok(snapshot(session, now))
    }

    /// Judges the next unanswered bonus part. Parts are strictly ordered;
    /// a complete bonus rejects further submissions.
    pub async fn submit_bonus_answer(
        &self,
        session: &mut PracticeSession,
        answer: String,
    ) -> Result<TrainerStateResponse, ServiceError> {
        let expected = match &session.question {
            Some(ActiveQuestion::Bonus { bonus, progress }) => {
                let part = progress.next_part();
                if part >= bonus.part_count() {
                    return Err(ServiceError::Validation(
                        "the bonus is already complete".to_string(),
                    ));
                }
                bonus.answers.get(part).cloned().ok_or_else(|| {
                    ServiceError::Validation(format!("bonus has no answer for part {}", part + 1))
                })?
            }
            Some(ActiveQuestion::Tossup { .. }) => {
                return Err(ServiceError::Validation(
                    "the active question is a tossup, not a bonus".to_string(),
                ))
            }
            None => {
                return Err(ServiceError::Validation(
                    "no active question, fetch one first".to_string(),
                ))
            }
        };

        let judgement = self.bank.check_answer(&expected, &answer).await?;
        let correct = judgement.correct();

        if let Some(ActiveQuestion::Bonus { bonus, progress }) = &mut session.question {
            progress.record(bonus.part_count(), answer, correct);
            let correct_label = if correct { "true" } else { "false" };
            ANSWERS_SUBMITTED_TOTAL
                .with_label_values(&["bonus", correct_label])
                .inc();
        }

        Ok(snapshot(session, Utc::now()))
    }

    /// Review payload for a finished question: canonical answers plus the
    /// prompts the client feeds to the explanation endpoint.
    pub fn review(&self, session: &PracticeSession) -> Result<ReviewResponse, ServiceError> {
        match &session.question {
            Some(ActiveQuestion::Tossup { tossup, reveal, .. }) => {
                if !reveal.is_over() {
                    return Err(ServiceError::Validation(
                        "the tossup is still in play".to_string(),
                    ));
                }
                let answer = tossup.answer_sanitized.clone();
                let clues = split_sentences(&tossup.question_sanitized)
                    .into_iter()
                    .map(|text| {
                        let prompt = clue_prompt(&answer, &text);
                        ReviewClue { text, prompt }
                    })
                    .collect();
                Ok(ReviewResponse::Tossup {
                    summary_prompt: answer_summary_prompt(&answer),
                    answer,
                    clues,
                })
            }
            Some(ActiveQuestion::Bonus { bonus, progress }) => {
                if !progress.is_complete(bonus.part_count()) {
                    return Err(ServiceError::Validation(
                        "the bonus still has unanswered parts".to_string(),
                    ));
                }
                let parts = bonus
                    .parts_sanitized
                    .iter()
                    .zip(bonus.answers_sanitized.iter())
                    .map(|(part, answer)| ReviewPart {
                        part: part.clone(),
                        answer: answer.clone(),
                        prompt: bonus_part_prompt(part, answer),
                    })
                    .collect();
                Ok(ReviewResponse::Bonus {
                    leadin: bonus.leadin_sanitized.clone(),
                    summary_prompt: bonus_leadin_prompt(&bonus.leadin_sanitized),
                    parts,
                })
            }
            None => Err(ServiceError::Validation(
                "no active question to review".to_string(),
            )),
        }
    }

    /// Fresh search submission, always starting at page 1. Failures leave
    /// any previous results untouched.
    pub async fn submit_search(
        &self,
        session: &mut PracticeSession,
        req: SearchRequest,
    ) -> Result<SearchResponse, ServiceError> {
        let results = self.bank.query(&req, 1).await?;
        let search = SearchSession {
            request: req,
            page: 1,
            results,
        };
        let response = SearchResponse::from_session(&search);
        session.search = Some(search);
        Ok(response)
    }

    /// Re-issues the stored query one page forward or back, clamped to the
    /// valid range. Turns past the boundary serve the cached page.
    pub async fn turn_search_page(
        &self,
        session: &mut PracticeSession,
        direction: PageDirection,
    ) -> Result<SearchResponse, ServiceError> {
        let search = session.search.as_mut().ok_or_else(|| {
            ServiceError::Validation("no search has been submitted yet".to_string())
        })?;
        let total = search.total_pages();
        let target = match direction {
            PageDirection::Next => search.page.saturating_add(1).min(total),
            PageDirection::Previous => search.page.saturating_sub(1).max(1),
        };
        if target == search.page {
            return Ok(SearchResponse::from_session(search));
        }
        let results = self.bank.query(&search.request, target).await?;
        search.page = target;
        search.results = results;
        Ok(SearchResponse::from_session(search))
    }

    pub async fn list_sets(&self) -> Result<Vec<String>, ServiceError> {
        self.bank.set_list().await
    }

    pub async fn packet_count(&self, set_name: &str) -> Result<u32, ServiceError> {
        self.bank.num_packets(set_name).await
    }

    /// Loads one packet of a set, validating the packet number against the
    /// set's packet count first. Failures leave the previous packet.
    pub async fn load_packet(
        &self,
        session: &mut PracticeSession,
        req: LoadPacketRequest,
    ) -> Result<PacketResponse, ServiceError> {
        req.validate()?;

        let num_packets = self.bank.num_packets(&req.set_name).await?;
        if num_packets == 0 {
            return Err(ServiceError::NotFound(format!(
                "set \"{}\" has no packets",
                req.set_name
            )));
        }
        if req.packet_number < 1 || req.packet_number > num_packets {
            return Err(ServiceError::Validation(format!(
                "packet number must be between 1 and {}",
                num_packets
            )));
        }

        let packet = self.bank.packet(&req.set_name, req.packet_number).await?;
        let packet_session = PacketSession {
            set_name: req.set_name,
            packet_number: req.packet_number,
            packet,
        };
        let response = PacketResponse::from_session(&packet_session);
        session.packet = Some(packet_session);
        Ok(response)
    }
}

fn tossup_state(
    session: &mut PracticeSession,
) -> Result<(&Tossup, &mut RevealState), ServiceError> {
    match &mut session.question {
        Some(ActiveQuestion::Tossup { tossup, reveal, .. }) => Ok((&*tossup, reveal)),
        Some(ActiveQuestion::Bonus { .. }) => Err(ServiceError::Validation(
            "the active question is a bonus, not a tossup".to_string(),
        )),
        None => Err(ServiceError::Validation(
            "no active question, fetch one first".to_string(),
        )),
    }
}

/// Renders the session into the response the UI draws from. The full text
/// is shown from the grace period on; Over always carries the canonical
/// answer, whatever the verdict.
pub fn snapshot(session: &PracticeSession, now: DateTime<Utc>) -> TrainerStateResponse {
    match &session.question {
        None => TrainerStateResponse::default(),
        Some(ActiveQuestion::Tossup {
            tossup,
            words,
            reveal,
        }) => {
            let revealed_text = match reveal.phase() {
                RevealPhase::GracePeriod | RevealPhase::Over => words.join(" "),
                _ => words[..reveal.revealed_words()].join(" "),
            };
            TrainerStateResponse {
                question: Some(QuestionSummary {
                    question_type: QuestionType::Tossup,
                    set_name: tossup.set_name(),
                    category: tossup.category.clone(),
                    difficulty: tossup.difficulty,
                }),
                tossup: Some(TossupView {
                    phase: reveal.phase(),
                    revealed_text,
                    word_index: reveal.word_index(),
                    word_count: reveal.word_count(),
                    grace_remaining_ms: reveal.grace_remaining_ms(now),
                    outcome: reveal.outcome().cloned(),
                    answer: reveal
                        .is_over()
                        .then(|| tossup.answer_sanitized.clone()),
                }),
                bonus: None,
            }
        }
        Some(ActiveQuestion::Bonus { bonus, progress }) => {
            let results = progress
                .entries()
                .iter()
                .enumerate()
                .map(|(i, entry)| BonusPartView {
                    answer: entry.answer.clone(),
                    correct: entry.correct,
                    expected: (!entry.correct)
                        .then(|| bonus.answers_sanitized.get(i).cloned().unwrap_or_default()),
                })
                .collect();
            TrainerStateResponse {
                question: Some(QuestionSummary {
                    question_type: QuestionType::Bonus,
                    set_name: bonus.set_name(),
                    category: bonus.category.clone(),
                    difficulty: bonus.difficulty,
                }),
                tossup: None,
                bonus: Some(BonusView {
                    leadin: bonus.leadin_sanitized.clone(),
                    parts: bonus.parts_sanitized.clone(),
                    current_part: progress.next_part(),
                    results,
                    complete: progress.is_complete(bonus.part_count()),
                }),
            }
        }
    }
}
