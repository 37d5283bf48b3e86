//! Keyword relevance scorer: the "ATS score" shown before and after tailoring.
//!
//! Pure-Rust, deterministic, no LLM call.
//!
//! Algorithm:
//! 1. Extract every whole word of 3+ ASCII letters from both texts, lower-cased.
//! 2. Drop the fixed stop-word set from both sets.
//! 3. matching = jd ∩ resume, missing = jd − resume
//! 4. score = |matching| / |jd| × 100 (0 when the JD has no keywords)

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// At most this many keywords are reported in each list.
pub const MAX_REPORTED_KEYWORDS: usize = 20;

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "day", "get", "has", "him", "his", "how", "its", "may", "new", "old", "see",
    "two", "who", "did", "man", "way", "she", "use", "your", "said", "each", "which", "their",
    "time", "will", "about", "would", "there", "could", "other", "after", "first", "well",
    "water", "been", "call", "oil", "sit", "find", "long", "down", "come", "made", "part",
];

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b[a-zA-Z]{3,}\b").expect("static keyword pattern"))
}

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// Result of a single resume-vs-JD comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsReport {
    /// Percentage 0–100, rounded to two decimals.
    pub score: f64,
    pub matching_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub total_jd_keywords: usize,
    pub matched_count: usize,
}

/// Lower-cased keyword set of `text` with stop words removed.
pub fn keywords(text: &str) -> HashSet<String> {
    let stop = stop_words();
    word_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_ascii_lowercase())
        .filter(|w| !stop.contains(w.as_str()))
        .collect()
}

pub fn score(resume_text: &str, job_description: &str) -> AtsReport {
    let jd_keywords = keywords(job_description);
    let resume_keywords = keywords(resume_text);

    let matching: Vec<&String> = jd_keywords.intersection(&resume_keywords).collect();
    let missing: Vec<&String> = jd_keywords.difference(&resume_keywords).collect();

    let score = if jd_keywords.is_empty() {
        0.0
    } else {
        round2(matching.len() as f64 / jd_keywords.len() as f64 * 100.0)
    };

    AtsReport {
        score,
        matched_count: matching.len(),
        total_jd_keywords: jd_keywords.len(),
        matching_keywords: report_list(matching),
        missing_keywords: report_list(missing),
    }
}

/// Sorted so the reported subset is stable across runs.
fn report_list(words: Vec<&String>) -> Vec<String> {
    let mut words: Vec<String> = words.into_iter().cloned().collect();
    words.sort();
    words.truncate(MAX_REPORTED_KEYWORDS);
    words
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
