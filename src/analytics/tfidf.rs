// TF-IDF scoring over tokenized posts.
//
// Term frequency is count / document length. Inverse document frequency uses
// the unsmoothed variant `ln(M / (1 + df))`: a term present in every document
// scores slightly below zero rather than exactly zero, and downstream ranking
// (group top terms, representative posts) is calibrated against that curve.
//
// Every score map remembers the order terms were first seen, so ranking ties
// always resolve the same way for the same input.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::text::tokenizer::tokenize;

/// Term → score map that preserves first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermScores {
    order: Vec<String>,
    scores: HashMap<String, f64>,
}

impl TermScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a term's score. Re-inserting keeps the term's original position.
    pub fn insert(&mut self, term: &str, score: f64) {
        match self.scores.get_mut(term) {
            Some(existing) => *existing = score,
            None => {
                self.order.push(term.to_string());
                self.scores.insert(term.to_string(), score);
            }
        }
    }

    /// Add to a term's score, starting from zero for unseen terms.
    pub fn add(&mut self, term: &str, delta: f64) {
        match self.scores.get_mut(term) {
            Some(existing) => *existing += delta,
            None => {
                self.order.push(term.to_string());
                self.scores.insert(term.to_string(), delta);
            }
        }
    }

    pub fn get(&self, term: &str) -> Option<f64> {
        self.scores.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Terms and scores in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.order
            .iter()
            .map(|term| (term.as_str(), self.scores[term.as_str()]))
    }

    pub fn sum(&self) -> f64 {
        self.scores.values().sum()
    }

    /// Mean score across terms, 0.0 for an empty map.
    pub fn mean(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.sum() / self.len() as f64
        }
    }

    /// The `n` highest-scoring terms. The sort is stable, so equal scores
    /// keep their first-insertion order.
    pub fn top_n(&self, n: usize) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .iter()
            .map(|(term, score)| (term.to_string(), score))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked.truncate(n);
        ranked
    }
}

impl Serialize for TermScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (term, score) in self.iter() {
            map.serialize_entry(term, &score)?;
        }
        map.end()
    }
}

/// Fraction of the token list taken up by each distinct term.
pub fn term_frequency(tokens: &[String]) -> TermScores {
    let mut counts = TermScores::new();
    for token in tokens {
        counts.add(token, 1.0);
    }

    let total = tokens.len() as f64;
    let mut tf = TermScores::new();
    for (term, count) in counts.iter() {
        tf.insert(term, count / total);
    }
    tf
}

/// `ln(M / (1 + df))` for every term that occurs in at least one of the
/// `M` documents. An empty corpus gives an empty map.
pub fn inverse_document_frequency(corpus: &[Vec<String>]) -> TermScores {
    let mut doc_freq = TermScores::new();
    if corpus.is_empty() {
        return doc_freq;
    }

    for doc in corpus {
        let mut seen: HashSet<&str> = HashSet::new();
        for term in doc {
            if seen.insert(term.as_str()) {
                doc_freq.add(term, 1.0);
            }
        }
    }

    let doc_count = corpus.len() as f64;
    let mut idf = TermScores::new();
    for (term, df) in doc_freq.iter() {
        idf.insert(term, (doc_count / (1.0 + df)).ln());
    }
    idf
}

/// Tokenize each document and weight its term frequencies by one IDF map
/// shared across the whole set. Keys are the stringified document positions.
pub fn tfidf<S: AsRef<str>>(documents: &[S]) -> BTreeMap<String, TermScores> {
    let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();
    let idf = inverse_document_frequency(&tokenized);

    tokenized
        .iter()
        .enumerate()
        .map(|(i, tokens)| {
            let tf = term_frequency(tokens);
            let mut weighted = TermScores::new();
            for (term, freq) in tf.iter() {
                weighted.insert(term, freq * idf.get(term).unwrap_or(0.0));
            }
            (i.to_string(), weighted)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_term_frequency_counts() {
        let tf = term_frequency(&toks(&["loss", "loss", "gradient", "loss"]));
        assert!((tf.get("loss").unwrap() - 0.75).abs() < 1e-12);
        assert!((tf.get("gradient").unwrap() - 0.25).abs() < 1e-12);
        assert!((tf.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_term_frequency_empty() {
        assert!(term_frequency(&[]).is_empty());
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut scores = TermScores::new();
        scores.insert("a", 1.0);
        scores.insert("b", 2.0);
        scores.insert("a", 3.0);
        let terms: Vec<&str> = scores.iter().map(|(t, _)| t).collect();
        assert_eq!(terms, vec!["a", "b"]);
        assert_eq!(scores.get("a"), Some(3.0));
    }

    #[test]
    fn test_top_n_ties_keep_insertion_order() {
        let tf = term_frequency(&toks(&["zeta", "alpha", "mu", "alpha"]));
        let top = tf.top_n(3);
        assert_eq!(top[0].0, "alpha");
        assert_eq!(top[1].0, "zeta");
        assert_eq!(top[2].0, "mu");
    }

    #[test]
    fn test_serializes_in_insertion_order() {
        let mut scores = TermScores::new();
        scores.insert("zeta", 0.5);
        scores.insert("alpha", 0.25);
        let json = serde_json::to_string(&scores).unwrap();
        assert_eq!(json, r#"{"zeta":0.5,"alpha":0.25}"#);
    }
}
