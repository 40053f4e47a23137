use serde::{Deserialize, Serialize};
use validator::Validate;

/// Structured study explanation parsed from the generative endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub explanation: String,
    pub image_search_query: String,
    #[serde(default)]
    pub recommended_reading: Vec<ReadingLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingLink {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ExplainRequest {
    #[validate(length(min = 1, message = "prompt must not be empty"))]
    pub prompt: String,
}

#[derive(Debug, Default, Serialize)]
pub struct ExplainResponse {
    pub explanation: String,
    pub image_search_query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_search_url: Option<String>,
    pub recommended_reading: Vec<ReadingLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ExplainResponse {
    pub fn from_explanation(explanation: Explanation) -> Self {
        let image_search_url = image_search_url(&explanation.image_search_query);
        Self {
            explanation: explanation.explanation,
            image_search_query: explanation.image_search_query,
            image_search_url,
            recommended_reading: explanation.recommended_reading,
            warning: None,
        }
    }

    /// Empty result carrying an inline warning instead of an error status.
    pub fn from_warning(message: String) -> Self {
        Self {
            warning: Some(message),
            ..Self::default()
        }
    }
}

/// Image-search link for the query the model suggested.
pub fn image_search_url(query: &str) -> Option<String> {
    if query.trim().is_empty() {
        return None;
    }
    url::Url::parse_with_params(
        "https://www.google.com/search",
        &[("tbm", "isch"), ("q", query)],
    )
    .ok()
    .map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_search_url_encodes_query() {
        let url = image_search_url("William Shakespeare").unwrap();
        assert!(url.starts_with("https://www.google.com/search?"));
        assert!(url.contains("tbm=isch"));
        assert!(url.contains("q=William+Shakespeare") || url.contains("q=William%20Shakespeare"));
    }

    #[test]
    fn test_image_search_url_empty_query() {
        assert!(image_search_url("").is_none());
        assert!(image_search_url("   ").is_none());
    }

    #[test]
    fn test_warning_response_is_empty() {
        let resp = ExplainResponse::from_warning("upstream unavailable".to_string());
        assert!(resp.explanation.is_empty());
        assert!(resp.recommended_reading.is_empty());
        assert_eq!(resp.warning.as_deref(), Some("upstream unavailable"));
    }
}
