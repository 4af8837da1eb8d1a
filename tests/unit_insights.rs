// Unit tests for the insights summary.
//
// Statistics come straight from posts; the per-model comparison needs an
// analytics report, so a few tests build one by hand.

use std::collections::BTreeMap;

use edlens::analytics::insights::{
    build_insights_report, calculate_statistics, generate_insights, generate_model_insights,
};
use edlens::analytics::report::{GroupAnalysis, Report, Statistics, TermScore};
use edlens::models::{Post, UNKNOWN};

fn post(author: &str, model: &str, homework: &str, created_at: &str) -> Post {
    Post {
        author: author.to_string(),
        model: model.to_string(),
        homework: homework.to_string(),
        created_at: created_at.to_string(),
        ..Post::default()
    }
}

fn sample_posts() -> Vec<Post> {
    vec![
        post("ada", "Claude", "HW1", "2024-02-01T10:00:00Z"),
        post("ada", "GPT-4o", "HW1", "2024-02-01T12:00:00Z"),
        post("bob", "GPT-4o", "HW2", "2024-02-03T09:00:00Z"),
        post("cy", UNKNOWN, "HW2", ""),
        post("cy", UNKNOWN, UNKNOWN, "2024-02-03T11:00:00Z"),
        post("cy", UNKNOWN, "HW3", "2024-02-04T08:00:00Z"),
    ]
}

fn terms(words: &[&str]) -> Vec<TermScore> {
    words
        .iter()
        .map(|w| TermScore {
            term: w.to_string(),
            score: 0.1,
        })
        .collect()
}

fn group(strengths: &[&str], weaknesses: &[&str], top: &[&str]) -> GroupAnalysis {
    GroupAnalysis {
        post_count: 1,
        top_terms: terms(top),
        strengths: strengths.iter().map(|s| s.to_string()).collect(),
        weaknesses: weaknesses.iter().map(|s| s.to_string()).collect(),
        representative_posts: Vec::new(),
    }
}

fn sample_report() -> Report {
    let mut hw1 = BTreeMap::new();
    hw1.insert("GPT-4o".to_string(), group(&["s1"], &[], &["matrix", "rank"]));
    hw1.insert(UNKNOWN.to_string(), group(&["ignored"], &[], &["noise"]));
    let mut hw2 = BTreeMap::new();
    hw2.insert("GPT-4o".to_string(), group(&[], &["w1"], &["rank", "svd"]));
    hw2.insert("Claude".to_string(), group(&[], &[], &[]));

    let mut analysis = BTreeMap::new();
    analysis.insert("HW2".to_string(), hw2);
    analysis.insert("HW1".to_string(), hw1);

    Report {
        hw_model_analysis: analysis,
        statistics: Statistics {
            total_combinations: 3,
            ..Statistics::default()
        },
        ..Report::default()
    }
}

#[test]
fn statistics_counts_and_ranks() {
    let stats = calculate_statistics(&sample_posts());
    assert_eq!(stats.total_posts, 6);
    assert_eq!(stats.total_authors, 3);
    assert_eq!(stats.models.0[0], (UNKNOWN.to_string(), 3));
    assert_eq!(stats.models.0[1], ("GPT-4o".to_string(), 2));
    assert_eq!(stats.top_contributors[0].author, "cy");
    assert_eq!(stats.top_contributors[0].posts, 3);
}

#[test]
fn statistics_timeline_skips_missing_dates() {
    let stats = calculate_statistics(&sample_posts());
    let dates: Vec<&str> = stats.timeline.keys().map(String::as_str).collect();
    assert_eq!(dates, vec!["2024-02-01", "2024-02-03", "2024-02-04"]);
    assert_eq!(stats.timeline["2024-02-01"], 2);
    assert_eq!(stats.timeline.values().sum::<usize>(), 5);
}

#[test]
fn statistics_matrix_by_model_then_homework() {
    let stats = calculate_statistics(&sample_posts());
    assert_eq!(stats.model_homework_matrix["GPT-4o"]["HW1"], 1);
    assert_eq!(stats.model_homework_matrix["GPT-4o"]["HW2"], 1);
    assert_eq!(stats.model_homework_matrix[UNKNOWN].len(), 3);
}

#[test]
fn key_findings_skip_unknown_labels() {
    let stats = calculate_statistics(&sample_posts());
    let insights = generate_insights(&stats, None);
    assert_eq!(
        insights.key_findings[0],
        "Total of 6 posts from 3 unique contributors"
    );
    assert_eq!(insights.key_findings[1], "Most tested model: GPT-4o (2 posts)");
    assert_eq!(
        insights.key_findings[2],
        "Top 3 models by testing frequency: GPT-4o (2), Claude (1)"
    );
    assert_eq!(insights.key_findings[3], "Most covered assignment: HW1 (2 posts)");
    assert_eq!(insights.key_findings.len(), 4);
    assert!(insights.model_comparison.is_empty());
    assert!(insights.coverage_summary.is_empty());
}

#[test]
fn coverage_diversity_needs_report() {
    let stats = calculate_statistics(&sample_posts());
    let report = sample_report();
    let insights = generate_insights(&stats, Some(&report));
    // 3 combinations over 2 known models x 3 known homeworks
    assert_eq!(
        insights.key_findings[4],
        "Coverage diversity: 3 unique HW×Model combinations (50.0% of possible combinations)"
    );
    assert_eq!(
        insights.coverage_summary,
        "2 models tested across 3 homework assignments"
    );
}

#[test]
fn model_insights_merge_homeworks() {
    let insights = generate_model_insights(&sample_report());
    assert!(!insights.contains_key(UNKNOWN));

    let gpt = &insights["GPT-4o"];
    assert_eq!(gpt.homeworks_tested, vec!["HW1", "HW2"]);
    assert_eq!(gpt.total_homeworks, 2);
    assert_eq!(gpt.strengths, vec!["s1"]);
    assert_eq!(gpt.weaknesses, vec!["w1"]);
    assert_eq!(gpt.distinctive_terms, vec!["matrix", "rank", "svd"]);
    assert_eq!(
        gpt.summary,
        "Tested on 2 homework(s); Strengths noted in 1 instances; Weaknesses noted in 1 instances"
    );

    let claude = &insights["Claude"];
    assert_eq!(claude.summary, "Tested on 1 homework(s)");
    assert!(claude.distinctive_terms.is_empty());
}

#[test]
fn insights_report_serializes() {
    let report = build_insights_report(&sample_posts(), None);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["statistics"]["models"]["GPT-4o"], 2);
    assert_eq!(json["statistics"]["top_contributors"][0]["author"], "cy");
    assert!(json["insights"]["model_comparison"].as_object().unwrap().is_empty());
    assert!(!report.generated_at.is_empty());
}
