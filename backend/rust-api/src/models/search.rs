use serde::{Deserialize, Serialize};

use crate::models::{Bonus, Category, Difficulty, Tossup};

/// Fixed page size of the bank's query endpoint.
pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    Question,
    Answer,
    Both,
}

impl SearchScope {
    pub fn as_query_param(self) -> &'static str {
        match self {
            SearchScope::Question => "question",
            SearchScope::Answer => "answer",
            // the bank spells "both" as "all"
            SearchScope::Both => "all",
        }
    }
}

impl Default for SearchScope {
    fn default() -> Self {
        SearchScope::Question
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeFilter {
    Tossup,
    Bonus,
    All,
}

impl TypeFilter {
    pub fn as_query_param(self) -> &'static str {
        match self {
            TypeFilter::Tossup => "tossup",
            TypeFilter::Bonus => "bonus",
            TypeFilter::All => "all",
        }
    }
}

impl Default for TypeFilter {
    fn default() -> Self {
        TypeFilter::All
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub scope: SearchScope,
    #[serde(default)]
    pub question_type: TypeFilter,
    #[serde(default)]
    pub difficulties: Vec<Difficulty>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageDirection {
    Next,
    Previous,
}

#[derive(Debug, Deserialize)]
pub struct PageTurnRequest {
    pub direction: PageDirection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultPage<T> {
    #[serde(default)]
    pub count: u32,
    #[serde(default, rename = "questionArray")]
    pub question_array: Vec<T>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub tossups: ResultPage<Tossup>,
    #[serde(default)]
    pub bonuses: ResultPage<Bonus>,
}

/// The last submitted search plus the page it is currently showing.
#[derive(Debug, Clone)]
pub struct SearchSession {
    pub request: SearchRequest,
    pub page: u32,
    pub results: SearchResults,
}

impl SearchSession {
    pub fn total_pages(&self) -> u32 {
        total_pages(self.results.tossups.count.max(self.results.bonuses.count))
    }
}

/// Number of result pages for the larger of the two match counts. An empty
/// result set still has one (empty) page.
pub fn total_pages(max_count: u32) -> u32 {
    max_count.div_ceil(PAGE_SIZE).max(1)
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub page: u32,
    pub total_pages: u32,
    pub tossups: ResultPage<Tossup>,
    pub bonuses: ResultPage<Bonus>,
}

impl SearchResponse {
    pub fn from_session(session: &SearchSession) -> Self {
        Self {
            query: session.request.query.clone(),
            page: session.page,
            total_pages: session.total_pages(),
            tossups: session.results.tossups.clone(),
            bonuses: session.results.bonuses.clone(),
        }
    }
}
