// Report types: the JSON shape consumed by the dashboard and by the
// insights pass.
//
// Everything deserializes with defaults so a report written by an older
// version (or trimmed by hand) can still be loaded for `show` and `insights`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level analytics report for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub generated_at: String,
    /// homework → model → analysis
    #[serde(default)]
    pub hw_model_analysis: BTreeMap<String, BTreeMap<String, GroupAnalysis>>,
    #[serde(default)]
    pub heatmap: Heatmap,
    #[serde(default)]
    pub timeline: Timeline,
    #[serde(default)]
    pub statistics: Statistics,
}

/// Analysis of every post sharing one (homework, model) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupAnalysis {
    pub post_count: usize,
    /// Highest raw term frequencies within the group
    pub top_terms: Vec<TermScore>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub representative_posts: Vec<RepresentativePost>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermScore {
    pub term: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermFrequency {
    pub term: String,
    pub frequency: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepresentativePost {
    pub title: String,
    pub author: String,
    pub url: String,
    pub snippet: String,
}

/// Complete homework × model post-count matrix, zeros included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heatmap {
    pub homeworks: Vec<String>,
    pub models: Vec<String>,
    pub matrix: BTreeMap<String, BTreeMap<String, usize>>,
}

impl Heatmap {
    /// Post count for a pair, 0 when either label wasn't observed.
    pub fn count(&self, homework: &str, model: &str) -> usize {
        self.matrix
            .get(homework)
            .and_then(|row| row.get(model))
            .copied()
            .unwrap_or(0)
    }
}

/// Posts per homework per calendar date. Every series is aligned with `dates`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeline {
    pub dates: Vec<String>,
    pub series: BTreeMap<String, Vec<usize>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub total_posts: usize,
    pub total_homeworks: usize,
    pub total_models: usize,
    /// Number of (homework, model) pairs with at least one post
    pub total_combinations: usize,
    pub global_top_terms: Vec<TermFrequency>,
}

/// Round to four decimal places for stable, readable JSON.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
