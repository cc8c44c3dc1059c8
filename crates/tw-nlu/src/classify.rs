//! Topic relevance classifier — keeps inquiries inside the dining domain.
//!
//! Cheap keyword/pattern heuristics run before any generative call so that
//! off-topic questions are deflected without model cost or topic drift.
//!
//! Tokens are the lowercased text split on whitespace. A keyword counts only
//! on an exact token match, so trailing punctuation (`hours?`) hides it.
//!
//! Scoring:
//! - Short queries (≤ 3 tokens): `0.6 + 0.15 × keywords`.
//! - Longer queries: `0.4 + 0.15 × keywords − 0.3 × off_domain`, plus `0.1`
//!   when the first token is a question opener.
//! - Single-word queries get a flat `+0.2`.
//!
//! The result is clamped into `[0, 1]`; relevant means `≥ 0.45`.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tw_protocol::chat::TopicScore;

use crate::vocabulary::{DOMAIN_KEYWORDS, OFF_DOMAIN_PATTERNS, QUESTION_OPENERS};

/// Minimum confidence for an inquiry to reach the generative layer.
pub const RELEVANCE_THRESHOLD: f64 = 0.45;

const BASE_CONFIDENCE: f64 = 0.4;
const SHORT_QUERY_BASE: f64 = 0.6;
const SHORT_QUERY_MAX_TOKENS: usize = 3;
const KEYWORD_WEIGHT: f64 = 0.15;
const OFF_DOMAIN_PENALTY: f64 = 0.3;
const QUESTION_BONUS: f64 = 0.1;
const SINGLE_WORD_BONUS: f64 = 0.2;

static OFF_DOMAIN: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    OFF_DOMAIN_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

/// Scores whether free text is about the restaurant.
pub struct TopicClassifier {
    keywords: HashSet<&'static str>,
    openers: HashSet<&'static str>,
}

impl TopicClassifier {
    pub fn new() -> Self {
        Self {
            keywords: DOMAIN_KEYWORDS.iter().copied().collect(),
            openers: QUESTION_OPENERS.iter().copied().collect(),
        }
    }

    pub fn classify(&self, text: &str) -> TopicScore {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = lower.split_whitespace().collect();

        let keyword_matches = tokens.iter().filter(|t| self.keywords.contains(*t)).count();
        let off_domain_matches = OFF_DOMAIN.iter().filter(|re| re.is_match(&lower)).count();

        let mut confidence = if tokens.len() <= SHORT_QUERY_MAX_TOKENS {
            SHORT_QUERY_BASE + KEYWORD_WEIGHT * keyword_matches as f64
        } else {
            let mut c = BASE_CONFIDENCE + KEYWORD_WEIGHT * keyword_matches as f64
                - OFF_DOMAIN_PENALTY * off_domain_matches as f64;
            if tokens.first().is_some_and(|t| self.openers.contains(t)) {
                c += QUESTION_BONUS;
            }
            c
        };

        if tokens.len() == 1 {
            confidence += SINGLE_WORD_BONUS;
        }

        let confidence = confidence.clamp(0.0, 1.0);
        let is_relevant = confidence >= RELEVANCE_THRESHOLD;

        tracing::debug!(
            tokens = tokens.len(),
            keyword_matches,
            off_domain_matches,
            confidence,
            is_relevant,
            "classified inquiry"
        );

        TopicScore {
            confidence,
            is_relevant,
        }
    }
}

impl Default for TopicClassifier {
    fn default() -> Self {
        Self::new()
    }
}
