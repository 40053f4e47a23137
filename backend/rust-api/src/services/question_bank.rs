use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::metrics::track_bank_request;
use crate::models::packet::Packet;
use crate::models::search::{SearchRequest, SearchResults, PAGE_SIZE};
use crate::models::{Bonus, Category, Difficulty, Judgement, Tossup};
use crate::services::ServiceError;
use crate::utils::retry::{retry_async, RetryConfig};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Typed client for the remote question bank. Set list and packet counts
/// never change within a process lifetime, so both lookups are memoized.
pub struct QuestionBankClient {
    http: reqwest::Client,
    base_url: String,
    set_list: Mutex<Option<Vec<String>>>,
    packet_counts: Mutex<HashMap<String, u32>>,
}

#[derive(Debug, Deserialize)]
struct TossupEnvelope {
    #[serde(default)]
    tossups: Vec<Tossup>,
}

#[derive(Debug, Deserialize)]
struct BonusEnvelope {
    #[serde(default)]
    bonuses: Vec<Bonus>,
}

#[derive(Debug, Deserialize)]
struct SetListEnvelope {
    #[serde(default, rename = "setList")]
    set_list: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NumPacketsEnvelope {
    #[serde(default, rename = "numPackets")]
    num_packets: u32,
}

impl QuestionBankClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            set_list: Mutex::new(None),
            packet_counts: Mutex::new(HashMap::new()),
        }
    }

    pub async fn random_tossup(
        &self,
        difficulties: &[Difficulty],
        categories: &[Category],
    ) -> Result<Tossup, ServiceError> {
        let params = [
            ("difficulties", join_difficulties(difficulties)),
            ("categories", join_categories(categories)),
            ("number", "1".to_string()),
        ];
        let envelope: TossupEnvelope = self.get("random-tossup", &params).await?;
        let mut tossup = envelope
            .tossups
            .into_iter()
            .next()
            .ok_or(ServiceError::NoQuestions)?;
        tossup.normalize();
        Ok(tossup)
    }

    pub async fn random_bonus(
        &self,
        difficulties: &[Difficulty],
        categories: &[Category],
        three_part: bool,
    ) -> Result<Bonus, ServiceError> {
        let params = [
            ("difficulties", join_difficulties(difficulties)),
            ("categories", join_categories(categories)),
            ("number", "1".to_string()),
            ("threePartBonuses", three_part.to_string()),
        ];
        let envelope: BonusEnvelope = self.get("random-bonus", &params).await?;
        let mut bonus = envelope
            .bonuses
            .into_iter()
            .next()
            .ok_or(ServiceError::NoQuestions)?;
        bonus.normalize();
        Ok(bonus)
    }

    /// Judges a submitted answer against the canonical answer line.
    pub async fn check_answer(
        &self,
        expected: &str,
        submitted: &str,
    ) -> Result<Judgement, ServiceError> {
        let params = [
            ("answerline", expected.to_string()),
            ("givenAnswer", submitted.to_string()),
        ];
        self.get("check-answer", &params).await
    }

    pub async fn set_list(&self) -> Result<Vec<String>, ServiceError> {
        if let Some(cached) = self.set_list.lock().unwrap().clone() {
            return Ok(cached);
        }
        let envelope: SetListEnvelope = self.get("set-list", &[]).await?;
        *self.set_list.lock().unwrap() = Some(envelope.set_list.clone());
        Ok(envelope.set_list)
    }

    pub async fn num_packets(&self, set_name: &str) -> Result<u32, ServiceError> {
        if let Some(count) = self.packet_counts.lock().unwrap().get(set_name).copied() {
            return Ok(count);
        }
        let envelope: NumPacketsEnvelope = self
            .get("num-packets", &[("setName", set_name.to_string())])
            .await?;
        self.packet_counts
            .lock()
            .unwrap()
            .insert(set_name.to_string(), envelope.num_packets);
        Ok(envelope.num_packets)
    }

    pub async fn packet(&self, set_name: &str, packet_number: u32) -> Result<Packet, ServiceError> {
        let params = [
            ("setName", set_name.to_string()),
            ("packetNumber", packet_number.to_string()),
        ];
        let mut packet: Packet = self.get("packet", &params).await?;
        for tossup in &mut packet.tossups {
            tossup.normalize();
        }
        for bonus in &mut packet.bonuses {
            bonus.normalize();
        }
        Ok(packet)
    }

    pub async fn query(
        &self,
        request: &SearchRequest,
        page: u32,
    ) -> Result<SearchResults, ServiceError> {
        let params = [
            ("queryString", request.query.clone()),
            ("searchType", request.scope.as_query_param().to_string()),
            ("difficulties", join_difficulties(&request.difficulties)),
            ("categories", join_categories(&request.categories)),
            (
                "questionType",
                request.question_type.as_query_param().to_string(),
            ),
            ("maxReturnLength", PAGE_SIZE.to_string()),
            ("tossupPagination", page.to_string()),
            ("bonusPagination", page.to_string()),
        ];
        let mut results: SearchResults = self.get("query", &params).await?;
        for tossup in &mut results.tossups.question_array {
            tossup.normalize();
        }
        for bonus in &mut results.bonuses.question_array {
            bonus.normalize();
        }
        Ok(results)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ServiceError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);
        track_bank_request(
            endpoint,
            retry_async(RetryConfig::default(), || async {
                let response = self
                    .http
                    .get(&url)
                    .query(params)
                    .timeout(REQUEST_TIMEOUT)
                    .send()
                    .await?;
                if !response.status().is_success() {
                    return Err(ServiceError::Network(format!(
                        "question bank returned {} for {}",
                        response.status(),
                        endpoint
                    )));
                }
                response.json::<T>().await.map_err(|e| {
                    ServiceError::Network(format!("malformed {} payload: {}", endpoint, e))
                })
            }),
        )
        .await
    }
}

fn join_difficulties(difficulties: &[Difficulty]) -> String {
    difficulties
        .iter()
        .map(|d| d.level().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn join_categories(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_difficulties_uses_numeric_levels() {
        assert_eq!(
            join_difficulties(&[Difficulty::MiddleSchool, Difficulty::HsRegular]),
            "1,3"
        );
        assert_eq!(join_difficulties(&[]), "");
    }

    #[test]
    fn test_join_categories_uses_wire_labels() {
        assert_eq!(
            join_categories(&[Category::Literature, Category::FineArts]),
            "Literature,Fine Arts"
        );
    }
}
