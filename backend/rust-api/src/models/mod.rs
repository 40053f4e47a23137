use serde::{Deserialize, Serialize};

pub mod explanation;
pub mod packet;
pub mod question;
pub mod search;
pub mod trainer;

pub use question::{Bonus, BonusProgress, Judgement, Tossup};

/// Difficulty ladder of the question bank. The numeric wire value runs from
/// middle school (1) up to the hardest college level (9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    MiddleSchool,
    HsEasy,
    HsRegular,
    HsHard,
    HsNationals,
    CollegeEasy,
    CollegeMedium,
    CollegeHard,
    CollegeHardest,
}

impl Difficulty {
    pub fn level(self) -> u8 {
        match self {
            Difficulty::MiddleSchool => 1,
            Difficulty::HsEasy => 2,
            Difficulty::HsRegular => 3,
            Difficulty::HsHard => 4,
            Difficulty::HsNationals => 5,
            Difficulty::CollegeEasy => 6,
            Difficulty::CollegeMedium => 7,
            Difficulty::CollegeHard => 8,
            Difficulty::CollegeHardest => 9,
        }
    }
}

/// Canonical subject labels understood by the question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Literature,
    History,
    Science,
    FineArts,
    Religion,
    Mythology,
    Philosophy,
    SocialScience,
    Geography,
    OtherAcademic,
    Trash,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Literature => "Literature",
            Category::History => "History",
            Category::Science => "Science",
            Category::FineArts => "Fine Arts",
            Category::Religion => "Religion",
            Category::Mythology => "Mythology",
            Category::Philosophy => "Philosophy",
            Category::SocialScience => "Social Science",
            Category::Geography => "Geography",
            Category::OtherAcademic => "Other Academic",
            Category::Trash => "Trash",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Tossup,
    Bonus,
}
