// Aggregation pipeline: posts in, report out.
//
// One pass, purely in memory:
//   1. group posts by (homework, model)
//   2. per group: top terms by raw TF, strength/weakness sentences,
//      representative posts
//   3. heatmap over every observed homework × model pair
//   4. per-homework timeline aligned on observed dates
//   5. corpus-wide totals and top terms
//
// Malformed posts never fail the pass: missing labels were already mapped to
// "Unknown" when the post was loaded, and empty text just yields empty lists.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, info};

use super::lexicon::LexiconClassifier;
use super::report::{
    round4, GroupAnalysis, Heatmap, RepresentativePost, Report, Statistics, TermFrequency,
    TermScore, Timeline,
};
use super::representative::select_representatives;
use super::tfidf::term_frequency;
use crate::models::Post;
use crate::output::truncate_chars;
use crate::text::html::clean_text;
use crate::text::tokenizer::tokenize;

/// Posts bucketed homework → model. Both levels are ordered so report output
/// is stable across runs.
pub type GroupedPosts<'a> = BTreeMap<String, BTreeMap<String, Vec<&'a Post>>>;

/// Tunables for one analytics run.
pub struct AnalyticsConfig {
    /// Terms listed per (homework, model) group
    pub group_top_terms: usize,
    /// Terms listed in the corpus-wide statistics (20 for the report, 30 for deep dives)
    pub global_top_terms: usize,
    pub representatives_per_group: usize,
    pub snippet_chars: usize,
    pub classifier: LexiconClassifier,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            group_top_terms: 15,
            global_top_terms: 20,
            representatives_per_group: 3,
            snippet_chars: 200,
            classifier: LexiconClassifier::default(),
        }
    }
}

/// Run the whole pipeline over a set of posts.
pub fn analyze_posts(posts: &[Post], config: &AnalyticsConfig) -> Report {
    let groups = group_posts(posts);
    info!(
        posts = posts.len(),
        homeworks = groups.len(),
        "Running deterministic analytics"
    );

    let mut analysis: BTreeMap<String, BTreeMap<String, GroupAnalysis>> = BTreeMap::new();
    for (homework, models) in &groups {
        let mut per_model = BTreeMap::new();
        for (model, members) in models {
            debug!(
                homework = %homework,
                model = %model,
                posts = members.len(),
                "Analyzing group"
            );
            per_model.insert(model.clone(), analyze_group(members, config));
        }
        analysis.insert(homework.clone(), per_model);
    }

    let heatmap = build_heatmap(&groups);
    let timeline = build_timeline(posts, &heatmap.homeworks);
    let statistics = build_statistics(posts, &groups, config.global_top_terms);

    info!(
        combinations = statistics.total_combinations,
        models = statistics.total_models,
        "Analytics complete"
    );

    Report {
        generated_at: chrono::Local::now().to_rfc3339(),
        hw_model_analysis: analysis,
        heatmap,
        timeline,
        statistics,
    }
}

/// Partition posts by homework, then by model.
pub fn group_posts(posts: &[Post]) -> GroupedPosts<'_> {
    let mut groups: GroupedPosts<'_> = BTreeMap::new();
    for post in posts {
        let models = groups
            .entry(post.homework.clone())
            .or_insert_with(BTreeMap::new);
        models
            .entry(post.model.clone())
            .or_insert_with(Vec::new)
            .push(post);
    }
    groups
}

/// Text a post contributes to term counts and sentence extraction: its
/// cleaned content, or the title when the body is empty.
pub fn post_text(post: &Post) -> String {
    let content = clean_text(&post.content);
    if content.trim().is_empty() {
        post.title.clone()
    } else {
        content.into_owned()
    }
}

fn joined_text<'a>(posts: impl IntoIterator<Item = &'a Post>) -> String {
    posts
        .into_iter()
        .map(post_text)
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Analyze one (homework, model) group.
///
/// Term ranking uses raw term frequency: a single group has no meaningful
/// cross-document frequency to weight against.
pub fn analyze_group(posts: &[&Post], config: &AnalyticsConfig) -> GroupAnalysis {
    let text = joined_text(posts.iter().copied());
    let tf = term_frequency(&tokenize(&text));

    let top_terms = tf
        .top_n(config.group_top_terms)
        .into_iter()
        .map(|(term, score)| TermScore {
            term,
            score: round4(score),
        })
        .collect();

    let sentences = config.classifier.extract(&text);

    let representative_posts = select_representatives(posts, config.representatives_per_group)
        .into_iter()
        .map(|p| RepresentativePost {
            title: p.title.clone(),
            author: p.author.clone(),
            url: p.url.clone(),
            snippet: truncate_chars(&clean_text(&p.content), config.snippet_chars),
        })
        .collect();

    GroupAnalysis {
        post_count: posts.len(),
        top_terms,
        strengths: sentences.strengths,
        weaknesses: sentences.weaknesses,
        representative_posts,
    }
}

/// Cross-tabulate post counts over all observed homeworks and models.
pub fn build_heatmap(groups: &GroupedPosts<'_>) -> Heatmap {
    let homeworks: Vec<String> = groups.keys().cloned().collect();
    let models: Vec<String> = groups
        .values()
        .flat_map(|m| m.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut matrix = BTreeMap::new();
    for homework in &homeworks {
        let row: BTreeMap<String, usize> = models
            .iter()
            .map(|model| {
                let count = groups
                    .get(homework)
                    .and_then(|m| m.get(model))
                    .map_or(0, Vec::len);
                (model.clone(), count)
            })
            .collect();
        matrix.insert(homework.clone(), row);
    }

    Heatmap {
        homeworks,
        models,
        matrix,
    }
}

/// Count posts per date per homework, zero-filled over the sorted dates.
pub fn build_timeline(posts: &[Post], homeworks: &[String]) -> Timeline {
    let mut by_date: BTreeMap<String, HashMap<&str, usize>> = BTreeMap::new();
    for post in posts {
        *by_date
            .entry(post.date_bucket())
            .or_insert_with(HashMap::new)
            .entry(post.homework.as_str())
            .or_insert(0) += 1;
    }

    let dates: Vec<String> = by_date.keys().cloned().collect();
    let series = homeworks
        .iter()
        .map(|homework| {
            let counts = by_date
                .values()
                .map(|per_hw| per_hw.get(homework.as_str()).copied().unwrap_or(0))
                .collect();
            (homework.clone(), counts)
        })
        .collect();

    Timeline { dates, series }
}

/// Corpus-wide totals plus the top terms by raw frequency.
pub fn build_statistics(posts: &[Post], groups: &GroupedPosts<'_>, top_n: usize) -> Statistics {
    let models: BTreeSet<&str> = groups
        .values()
        .flat_map(|m| m.keys().map(String::as_str))
        .collect();
    let total_combinations = groups.values().map(BTreeMap::len).sum();

    let tf = term_frequency(&tokenize(&joined_text(posts)));
    let global_top_terms = tf
        .top_n(top_n)
        .into_iter()
        .map(|(term, frequency)| TermFrequency {
            term,
            frequency: round4(frequency),
        })
        .collect();

    Statistics {
        total_posts: posts.len(),
        total_homeworks: groups.len(),
        total_models: models.len(),
        total_combinations,
        global_top_terms,
    }
}
