use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::metrics::record_explanation;
use crate::models::explanation::Explanation;
use crate::services::ServiceError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the generative explanation endpoint. Explanations are a pure
/// function of the prompt, so responses are memoized by prompt text.
pub struct ExplanationService {
    http: reqwest::Client,
    api_url: String,
    model: String,
    api_key: Option<String>,
    cache: Mutex<HashMap<String, Explanation>>,
}

impl ExplanationService {
    pub fn new(api_url: String, model: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            model,
            api_key,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn explain(&self, prompt: &str) -> Result<Explanation, ServiceError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ServiceError::Configuration(
                "GEMINI_API_KEY is not configured, explanations are disabled".to_string(),
            )
        })?;

        if let Some(hit) = self.cache.lock().unwrap().get(prompt).cloned() {
            record_explanation("cache");
            return Ok(hit);
        }

        let url = format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        );

        let result = async {
            let response = self
                .http
                .post(&url)
                .query(&[("key", api_key)])
                .json(&request_body(prompt))
                .timeout(REQUEST_TIMEOUT)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(ServiceError::Network(format!(
                    "generative endpoint returned {}",
                    response.status()
                )));
            }

            let payload: serde_json::Value = response
                .json()
                .await
                .map_err(|e| ServiceError::Network(format!("unreadable generative payload: {}", e)))?;

            parse_generate_response(&payload)
        }
        .await;

        match result {
            Ok(explanation) => {
                self.cache
                    .lock()
                    .unwrap()
                    .insert(prompt.to_string(), explanation.clone());
                record_explanation("api");
                Ok(explanation)
            }
            Err(e) => {
                record_explanation("error");
                Err(e)
            }
        }
    }
}

/// Single user-role message plus the constrained response schema.
fn request_body(prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "explanation": {
                        "type": "STRING",
                        "description": "The detailed explanation of the topic."
                    },
                    "image_search_query": {
                        "type": "STRING",
                        "description": "A concise, 2-3 word search term for the subject."
                    },
                    "recommended_reading": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "title": { "type": "STRING" },
                                "url": { "type": "STRING" }
                            },
                            "required": ["title", "url"]
                        }
                    }
                },
                "required": ["explanation", "image_search_query", "recommended_reading"]
            }
        }
    })
}

/// Digs the schema-constrained JSON text out of the candidate envelope.
pub fn parse_generate_response(value: &serde_json::Value) -> Result<Explanation, ServiceError> {
    let text = value
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| {
            ServiceError::Validation("generative endpoint returned no candidates".to_string())
        })?;

    serde_json::from_str::<Explanation>(text).map_err(|e| {
        ServiceError::Validation(format!("generative endpoint returned malformed JSON: {}", e))
    })
}

pub fn answer_summary_prompt(answer: &str) -> String {
    format!(
        "Act as a subject matter expert. Provide a detailed, in-depth encyclopedic summary \
         of \"{answer}\". Use Markdown bolding to highlight key terms. Also provide a concise, \
         2-3 word search term for a relevant image and 2-3 links for further reading. \
         Prioritize links from Wikipedia and Encyclopedia Britannica."
    )
}

pub fn clue_prompt(answer: &str, clue: &str) -> String {
    format!(
        "The overall answer to a quizbowl question is \"{answer}\". Your role is a \
         subject-matter expert. Provide a detailed, in-depth explanation of the specific \
         names, places, or concepts within this single clue: \"{clue}\". Explain how they \
         connect to the main answer. Use Markdown bolding (**text**) to highlight the most \
         important key terms. Do NOT repeat general information about the main answer. \
         Provide a search query and reading links specific to this clue's content. \
         Prioritize links from Wikipedia and Encyclopedia Britannica."
    )
}

pub fn bonus_leadin_prompt(leadin: &str) -> String {
    format!(
        "Act as a subject matter expert. The lead-in to a quizbowl bonus is: \"{leadin}\". \
         Provide a detailed, in-depth summary of the likely overall topic. Use Markdown \
         bolding to highlight key terms. Also provide a concise, 2-3 word search term for a \
         relevant image and reading links. Prioritize links from Wikipedia and Encyclopedia \
         Britannica."
    )
}

pub fn bonus_part_prompt(part: &str, answer: &str) -> String {
    format!(
        "Act as a subject matter expert. A quizbowl question asks: \"{part}\". The correct \
         answer is \"{answer}\". Provide a very detailed, in-depth, encyclopedic explanation \
         of the answer in the context of the question. Use Markdown bolding to highlight key \
         terms. Do not repeat the question itself in your explanation. Also provide a search \
         query and reading links for \"{answer}\". Prioritize links from Wikipedia and \
         Encyclopedia Britannica."
    )
}
