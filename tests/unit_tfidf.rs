// Unit tests for TF-IDF scoring and representative-post selection.
//
// The IDF curve is the unsmoothed ln(M / (1 + df)); these tests pin it down
// exactly, including the slightly negative weight of a term that appears in
// every document.

use edlens::analytics::representative::{post_document, select_representatives};
use edlens::analytics::tfidf::{inverse_document_frequency, term_frequency, tfidf, TermScores};
use edlens::models::Post;

fn toks(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

// ============================================================
// term_frequency
// ============================================================

#[test]
fn tf_sums_to_one() {
    let tf = term_frequency(&toks("kernel trick kernel margin svm margin kernel"));
    assert!((tf.sum() - 1.0).abs() < 1e-9);
    assert!((tf.get("kernel").unwrap() - 3.0 / 7.0).abs() < 1e-9);
}

#[test]
fn tf_keeps_first_occurrence_order() {
    let tf = term_frequency(&toks("zeta alpha zeta beta"));
    let terms: Vec<&str> = tf.iter().map(|(t, _)| t).collect();
    assert_eq!(terms, vec!["zeta", "alpha", "beta"]);
}

// ============================================================
// inverse_document_frequency
// ============================================================

#[test]
fn idf_term_in_one_document() {
    let corpus = vec![
        toks("dropout shared"),
        toks("batchnorm shared"),
        toks("residual shared"),
        toks("attention shared"),
    ];
    let idf = inverse_document_frequency(&corpus);
    assert!((idf.get("dropout").unwrap() - (4.0f64 / 2.0).ln()).abs() < 1e-12);
}

#[test]
fn idf_term_in_every_document_is_negative() {
    let corpus = vec![toks("shared a"), toks("shared b"), toks("shared c")];
    let idf = inverse_document_frequency(&corpus);
    let shared = idf.get("shared").unwrap();
    assert!((shared - (3.0f64 / 4.0).ln()).abs() < 1e-12);
    assert!(shared < 0.0);
}

#[test]
fn idf_counts_documents_not_occurrences() {
    let corpus = vec![toks("loss loss loss"), toks("other")];
    let idf = inverse_document_frequency(&corpus);
    assert!((idf.get("loss").unwrap() - (2.0f64 / 2.0).ln()).abs() < 1e-12);
}

#[test]
fn idf_empty_corpus() {
    assert!(inverse_document_frequency(&[]).is_empty());
}

// ============================================================
// tfidf
// ============================================================

#[test]
fn tfidf_empty_input() {
    let docs: [&str; 0] = [];
    assert!(tfidf(&docs).is_empty());
}

#[test]
fn tfidf_keys_are_positions_and_share_idf() {
    let docs = ["gradient descent", "gradient boosting", "random forest"];
    let scores = tfidf(&docs);
    assert_eq!(scores.len(), 3);

    let first = &scores["0"];
    // gradient: tf 0.5, df 2 of 3 docs
    let expected = 0.5 * (3.0f64 / 3.0).ln();
    assert!((first.get("gradient").unwrap() - expected).abs() < 1e-12);
    // descent: tf 0.5, df 1
    let expected = 0.5 * (3.0f64 / 2.0).ln();
    assert!((first.get("descent").unwrap() - expected).abs() < 1e-12);
    assert!(first.get("forest").is_none());
}

#[test]
fn tfidf_document_with_no_terms_is_empty() {
    let scores = tfidf(&["the and of", "momentum optimizer"]);
    assert!(scores["0"].is_empty());
    assert_eq!(scores["0"].mean(), 0.0);
}

// ============================================================
// TermScores::top_n
// ============================================================

#[test]
fn top_n_descending_with_stable_ties() {
    let mut scores = TermScores::new();
    scores.insert("late", 0.2);
    scores.insert("high", 0.9);
    scores.insert("early", 0.2);
    scores.insert("mid", 0.5);

    let top = scores.top_n(3);
    let terms: Vec<&str> = top.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(terms, vec!["high", "mid", "late"]);
}

#[test]
fn top_n_larger_than_map() {
    let mut scores = TermScores::new();
    scores.insert("only", 1.0);
    assert_eq!(scores.top_n(10).len(), 1);
}

// ============================================================
// select_representatives
// ============================================================

fn post(title: &str, content: &str) -> Post {
    Post {
        title: title.to_string(),
        content: content.to_string(),
        ..Post::default()
    }
}

#[test]
fn selection_identity_when_under_cap() {
    let posts = [post("b", "second"), post("a", "first")];
    let refs: Vec<&Post> = posts.iter().collect();
    let picked = select_representatives(&refs, 5);
    assert_eq!(picked.len(), 2);
    assert!(std::ptr::eq(picked[0], &posts[0]));
    assert!(std::ptr::eq(picked[1], &posts[1]));
}

#[test]
fn selection_prefers_distinctive_posts() {
    let posts = [
        post("shared shared", ""),
        post("shared shared", ""),
        post("eigenvector intuition", ""),
        post("shared shared", ""),
    ];
    let refs: Vec<&Post> = posts.iter().collect();
    let picked = select_representatives(&refs, 1);
    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].title, "eigenvector intuition");
}

#[test]
fn selection_uses_cleaned_content() {
    let p = post("Title words", "<paragraph>Body text</paragraph>");
    assert_eq!(post_document(&p), "Body text Title words");
}

#[test]
fn selection_ties_keep_input_order_over_cap() {
    // Same document repeated: every post has the same mean score
    let posts: Vec<Post> = (0..6).map(|i| post(&format!("p{i}"), "matrix rank")).collect();
    let refs: Vec<&Post> = posts.iter().collect();
    let picked = select_representatives(&refs, 3);
    let titles: Vec<&str> = picked.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["p0", "p1", "p2"]);
}
