use serde::{Deserialize, Serialize};

use crate::models::lenient;

pub const DEFAULT_HIRING_MANAGER: &str = "Hiring Manager";

/// Everything the cover-letter template needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverLetterRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub links: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub hiring_manager: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub job_title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub opening: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub skills_fit: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub conclusion: String,
}

impl CoverLetterRecord {
    pub fn hiring_manager_or_default(&self) -> &str {
        if self.hiring_manager.trim().is_empty() {
            DEFAULT_HIRING_MANAGER
        } else {
            &self.hiring_manager
        }
    }

    pub fn with_paragraphs(mut self, paragraphs: CoverLetterParagraphs) -> Self {
        self.opening = paragraphs.opening;
        self.skills_fit = paragraphs.skills_fit;
        self.conclusion = paragraphs.conclusion;
        self
    }
}

/// The three narrative segments of a letter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverLetterParagraphs {
    #[serde(default, deserialize_with = "lenient::string")]
    pub opening: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub skills_fit: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub conclusion: String,
}

/// Free-form letter body as produced for the two-column flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverLetterDraft {
    #[serde(default, deserialize_with = "lenient::record")]
    pub recipient: Recipient,
    #[serde(default, deserialize_with = "lenient::positional_list")]
    pub body: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub signoff: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(default, deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: String,
}

impl CoverLetterDraft {
    /// Maps body paragraphs onto the three template segments.
    /// A fourth paragraph (the closing sentence) is appended to the conclusion.
    pub fn to_paragraphs(&self) -> CoverLetterParagraphs {
        let part = |i: usize| self.body.get(i).cloned().unwrap_or_default();
        let conclusion = match self.body.get(3) {
            Some(closing) => format!("{} {}", part(2), closing),
            None => part(2),
        };
        CoverLetterParagraphs {
            opening: part(0),
            skills_fit: part(1),
            conclusion,
        }
    }
}
