// Sentence-level strength/weakness extraction.
//
// A fixed vocabulary matcher, not a sentiment model: a sentence is a strength
// mention when its tokens hit the strength lexicon and it carries enough
// distinct content words to be worth quoting. Weakness mentions are the mirror
// image. Sentences are split on raw punctuation, so abbreviations like "e.g."
// over-split; those fragments are usually too short to survive the length gate.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::text::tokenizer::tokenize;

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid sentence pattern"));

pub static STRENGTH_TERMS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "correct", "accurate", "perfect", "excellent", "good", "well", "better", "successful",
        "solved", "works", "impressive", "strong", "complete", "thorough", "detailed", "clear",
        "coherent", "logical", "valid", "right", "success", "achieved", "outperform", "superior",
    ]
    .into_iter()
    .collect()
});

pub static WEAKNESS_TERMS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "wrong", "incorrect", "error", "fail", "failed", "failure", "poor", "bad", "worse",
        "struggle", "struggled", "difficulty", "problem", "issue", "bug", "hallucination",
        "hallucinate", "confused", "unclear", "incomplete", "missing", "unable", "cannot",
        "limitation", "weak", "inaccurate", "inconsistent", "flawed",
    ]
    .into_iter()
    .collect()
});

/// Hedging that makes a sentence useless as evidence, whatever else it says.
pub const VAGUE_PHRASES: &[&str] = &[
    "pretty good",
    "pretty well",
    "did well",
    "good job",
    "not bad",
    "it was good",
    "it was fine",
    "it was okay",
    "worked fine",
    "works fine",
    "in general",
    "generally speaking",
    "for the most part",
    "more or less",
    "kind of",
    "sort of",
    "i guess",
    "it seems like",
    "as expected",
];

/// Commentary about the write-up rather than the model. Only kept when the
/// sentence is long enough to also carry specifics.
pub const META_PHRASES: &[&str] = &[
    "i thought",
    "i found",
    "i think",
    "i felt",
    "i noticed",
    "it showed",
    "it shows",
    "it demonstrates",
    "it demonstrated",
    "this shows",
];

/// Strength and weakness sentences pulled from a block of text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentenceExtraction {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Thresholds for the sentence filters.
pub struct LexiconClassifier {
    /// Trimmed sentences shorter than this are dropped
    pub min_chars: usize,
    /// Trimmed sentences longer than this are dropped
    pub max_chars: usize,
    /// Meta-commentary sentences must be at least this long to be kept
    pub meta_min_chars: usize,
    /// Distinct filtered tokens a sentence needs to count as substantial
    pub min_distinct_tokens: usize,
    /// Kept sentences are cut to this many characters
    pub truncate_chars: usize,
    pub max_strengths: usize,
    pub max_weaknesses: usize,
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self {
            min_chars: 30,
            max_chars: 250,
            meta_min_chars: 60,
            min_distinct_tokens: 8,
            truncate_chars: 200,
            max_strengths: 5,
            max_weaknesses: 5,
        }
    }
}

impl LexiconClassifier {
    /// Scan `text` sentence by sentence, keeping qualifying strength and
    /// weakness mentions in their original order.
    pub fn extract(&self, text: &str) -> SentenceExtraction {
        let mut result = SentenceExtraction::default();
        if text.trim().is_empty() {
            return result;
        }

        for raw in SENTENCE_END.split(text) {
            if result.strengths.len() >= self.max_strengths
                && result.weaknesses.len() >= self.max_weaknesses
            {
                break;
            }

            let sentence = raw.trim();
            if !self.passes_filters(sentence) {
                continue;
            }

            let tokens = tokenize(sentence);
            let distinct: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            if distinct.len() < self.min_distinct_tokens {
                continue;
            }

            let clipped = || sentence.chars().take(self.truncate_chars).collect::<String>();

            if result.strengths.len() < self.max_strengths
                && distinct.iter().any(|t| STRENGTH_TERMS.contains(t))
            {
                result.strengths.push(clipped());
            }
            if result.weaknesses.len() < self.max_weaknesses
                && distinct.iter().any(|t| WEAKNESS_TERMS.contains(t))
            {
                result.weaknesses.push(clipped());
            }
        }

        result
    }

    /// Length, vagueness, and meta-commentary gates on a trimmed sentence.
    fn passes_filters(&self, sentence: &str) -> bool {
        let len = sentence.chars().count();
        if len < self.min_chars || len > self.max_chars {
            return false;
        }

        let lower = sentence.to_lowercase();
        if VAGUE_PHRASES.iter().any(|p| lower.contains(p)) {
            return false;
        }
        if len < self.meta_min_chars && META_PHRASES.iter().any(|p| lower.contains(p)) {
            return false;
        }
        true
    }
}
