use axum::http::StatusCode;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::services::explanation::ExplanationService;
use crate::services::practice::PracticeSession;
use crate::services::question_bank::QuestionBankClient;

pub struct AppState {
    pub config: Config,
    pub question_bank: QuestionBankClient,
    pub explainer: ExplanationService,
    /// The one practice session this process serves. Handlers lock it,
    /// apply events and release; there is no other mutation path.
    pub session: Mutex<PracticeSession>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let question_bank = QuestionBankClient::new(config.question_bank_url.clone());
        let explainer = ExplanationService::new(
            config.generative_api_url.clone(),
            config.generative_model.clone(),
            config.gemini_api_key.clone(),
        );
        Self {
            config,
            question_bank,
            explainer,
            session: Mutex::new(PracticeSession::default()),
        }
    }
}

/// Error taxonomy surfaced inline by every handler. Nothing here is fatal
/// to the process; the session stays usable after any of these.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("{0}")]
    Validation(String),
    #[error("upstream error: {0}")]
    Network(String),
    #[error("{0}")]
    NotFound(String),
    #[error("no questions matched the selected filters, broaden the selection")]
    NoQuestions,
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Network(_) => StatusCode::BAD_GATEWAY,
            ServiceError::NotFound(_) | ServiceError::NoQuestions => StatusCode::NOT_FOUND,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Network(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

pub mod explanation;
pub mod practice;
pub mod question_bank;
pub mod reveal_engine;
