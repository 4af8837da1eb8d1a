// Insights: a secondary summary built from the raw posts and, when
// available, the analytics report.
//
// Pure aggregation: per-model and per-homework counts, contributor rankings,
// and per-model strengths/weaknesses/coverage collected from the report's
// homework × model groups. Posts labelled "Unknown" are counted but never
// named as the top model or assignment.

use std::collections::{BTreeMap, HashSet};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::report::Report;
use crate::models::{Post, UNKNOWN};

const TOP_CONTRIBUTORS: usize = 10;
const SENTENCES_PER_MODEL: usize = 5;
const TERMS_PER_HOMEWORK: usize = 5;
const DISTINCTIVE_TERMS: usize = 10;

/// Label → count pairs, most common first. Serializes as a JSON object that
/// keeps this order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedCounts(pub Vec<(String, usize)>);

impl RankedCounts {
    /// Count labels and rank them by count, ties in first-seen order.
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut index: BTreeMap<&'a str, usize> = BTreeMap::new();
        for label in labels {
            match index.get(label) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(label, counts.len());
                    counts.push((label.to_string(), 1));
                }
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        Self(counts)
    }

    /// Ranked entries other than "Unknown".
    pub fn known(&self) -> Vec<&(String, usize)> {
        self.0.iter().filter(|(label, _)| label != UNKNOWN).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for RankedCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contributor {
    pub author: String,
    pub posts: usize,
}

/// Corpus statistics computed straight from the posts.
#[derive(Debug, Clone, Serialize)]
pub struct PostStatistics {
    pub total_posts: usize,
    pub total_authors: usize,
    pub models: RankedCounts,
    pub homeworks: RankedCounts,
    /// Posts per calendar date; posts without a timestamp are left out
    pub timeline: BTreeMap<String, usize>,
    pub top_contributors: Vec<Contributor>,
    /// model → homework → posts
    pub model_homework_matrix: BTreeMap<String, BTreeMap<String, usize>>,
}

/// What the report says about one model across every homework it was tried on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInsight {
    pub homeworks_tested: Vec<String>,
    pub total_homeworks: usize,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub distinctive_terms: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Insights {
    pub key_findings: Vec<String>,
    pub model_comparison: BTreeMap<String, ModelInsight>,
    pub coverage_summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightsReport {
    pub generated_at: String,
    pub statistics: PostStatistics,
    pub insights: Insights,
}

/// Build the full insights report.
pub fn build_insights_report(posts: &[Post], report: Option<&Report>) -> InsightsReport {
    let statistics = calculate_statistics(posts);
    let insights = generate_insights(&statistics, report);
    InsightsReport {
        generated_at: chrono::Local::now().to_rfc3339(),
        statistics,
        insights,
    }
}

pub fn calculate_statistics(posts: &[Post]) -> PostStatistics {
    let authors: HashSet<&str> = posts.iter().map(|p| p.author.as_str()).collect();

    let mut timeline: BTreeMap<String, usize> = BTreeMap::new();
    for post in posts.iter().filter(|p| !p.created_at.is_empty()) {
        *timeline.entry(post.date_bucket()).or_insert(0) += 1;
    }

    let top_contributors = RankedCounts::from_labels(posts.iter().map(|p| p.author.as_str()))
        .0
        .into_iter()
        .take(TOP_CONTRIBUTORS)
        .map(|(author, posts)| Contributor { author, posts })
        .collect();

    let mut model_homework_matrix: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for post in posts {
        let row = model_homework_matrix
            .entry(post.model.clone())
            .or_insert_with(BTreeMap::new);
        *row.entry(post.homework.clone()).or_insert(0) += 1;
    }

    PostStatistics {
        total_posts: posts.len(),
        total_authors: authors.len(),
        models: RankedCounts::from_labels(posts.iter().map(|p| p.model.as_str())),
        homeworks: RankedCounts::from_labels(posts.iter().map(|p| p.homework.as_str())),
        timeline,
        top_contributors,
        model_homework_matrix,
    }
}

/// Collect each model's strengths, weaknesses, terms, and homework coverage
/// from the report's groups. The "Unknown" model is skipped.
pub fn generate_model_insights(report: &Report) -> BTreeMap<String, ModelInsight> {
    #[derive(Default)]
    struct Collected {
        homeworks: Vec<String>,
        strengths: Vec<String>,
        weaknesses: Vec<String>,
        terms: Vec<String>,
    }

    let mut per_model: BTreeMap<String, Collected> = BTreeMap::new();
    for (homework, models) in &report.hw_model_analysis {
        for (model, analysis) in models {
            if model == UNKNOWN {
                continue;
            }
            let collected = per_model.entry(model.clone()).or_default();
            collected.homeworks.push(homework.clone());
            collected.strengths.extend(analysis.strengths.iter().cloned());
            collected.weaknesses.extend(analysis.weaknesses.iter().cloned());
            collected.terms.extend(
                analysis
                    .top_terms
                    .iter()
                    .take(TERMS_PER_HOMEWORK)
                    .map(|t| t.term.clone()),
            );
        }
    }

    per_model
        .into_iter()
        .map(|(model, mut c)| {
            c.homeworks.sort();
            let strengths: Vec<String> =
                c.strengths.into_iter().take(SENTENCES_PER_MODEL).collect();
            let weaknesses: Vec<String> =
                c.weaknesses.into_iter().take(SENTENCES_PER_MODEL).collect();

            let mut seen = HashSet::new();
            let distinctive_terms: Vec<String> = c
                .terms
                .into_iter()
                .filter(|t| seen.insert(t.clone()))
                .take(DISTINCTIVE_TERMS)
                .collect();

            let mut parts = Vec::new();
            if !c.homeworks.is_empty() {
                parts.push(format!("Tested on {} homework(s)", c.homeworks.len()));
            }
            if !strengths.is_empty() {
                parts.push(format!("Strengths noted in {} instances", strengths.len()));
            }
            if !weaknesses.is_empty() {
                parts.push(format!("Weaknesses noted in {} instances", weaknesses.len()));
            }
            let summary = if parts.is_empty() {
                "Limited data".to_string()
            } else {
                parts.join("; ")
            };

            let insight = ModelInsight {
                total_homeworks: c.homeworks.len(),
                homeworks_tested: c.homeworks,
                strengths,
                weaknesses,
                distinctive_terms,
                summary,
            };
            (model, insight)
        })
        .collect()
}

/// Headline findings plus, when a report is supplied, the per-model comparison.
pub fn generate_insights(stats: &PostStatistics, report: Option<&Report>) -> Insights {
    let mut insights = Insights::default();
    insights.key_findings.push(format!(
        "Total of {} posts from {} unique contributors",
        stats.total_posts, stats.total_authors
    ));

    let known_models = stats.models.known();
    if let Some((model, count)) = known_models.first() {
        insights
            .key_findings
            .push(format!("Most tested model: {model} ({count} posts)"));
        let top_three = known_models
            .iter()
            .take(3)
            .map(|(m, n)| format!("{m} ({n})"))
            .collect::<Vec<_>>()
            .join(", ");
        insights
            .key_findings
            .push(format!("Top 3 models by testing frequency: {top_three}"));
    }

    let known_homeworks = stats.homeworks.known();
    if let Some((homework, count)) = known_homeworks.first() {
        insights
            .key_findings
            .push(format!("Most covered assignment: {homework} ({count} posts)"));

        if let Some(report) = report {
            let combinations = report.statistics.total_combinations;
            let possible = known_models.len() * known_homeworks.len();
            let coverage = if possible > 0 {
                combinations as f64 / possible as f64 * 100.0
            } else {
                0.0
            };
            insights.key_findings.push(format!(
                "Coverage diversity: {combinations} unique HW×Model combinations \
                 ({coverage:.1}% of possible combinations)"
            ));
        }
    }

    if let Some(report) = report {
        insights.model_comparison = generate_model_insights(report);
        insights.coverage_summary = format!(
            "{} models tested across {} homework assignments",
            known_models.len(),
            known_homeworks.len()
        );
    }

    insights
}
