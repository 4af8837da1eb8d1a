// Representative-post selection.
//
// Not clustering in the statistical sense: each post becomes one document,
// the set is scored with TF-IDF, and the posts with the highest mean term
// weight (the most distinctive wording) are kept. Deterministic for a given
// input order.

use std::cmp::Ordering;

use tracing::debug;

use super::tfidf::tfidf;
use crate::models::Post;
use crate::text::html::clean_text;

/// The scored document for one post: cleaned content followed by the title.
pub fn post_document(post: &Post) -> String {
    format!("{} {}", clean_text(&post.content), post.title)
}

/// Pick up to `max_posts` posts with the most distinctive wording.
///
/// Groups no larger than the cap come back exactly as given. Otherwise posts
/// are ranked by the mean of their TF-IDF weights (0.0 for posts with no
/// terms); the sort is stable, so ties keep input order.
pub fn select_representatives<'a>(posts: &[&'a Post], max_posts: usize) -> Vec<&'a Post> {
    if posts.len() <= max_posts {
        return posts.to_vec();
    }

    let documents: Vec<String> = posts.iter().map(|p| post_document(p)).collect();
    let scores = tfidf(&documents);

    let mut ranked: Vec<(usize, f64)> = (0..posts.len())
        .map(|i| {
            let mean = scores.get(&i.to_string()).map_or(0.0, |s| s.mean());
            (i, mean)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    debug!(
        candidates = posts.len(),
        kept = max_posts,
        top_score = ranked.first().map_or(0.0, |r| r.1),
        "Selected representative posts"
    );

    ranked
        .into_iter()
        .take(max_posts)
        .map(|(i, _)| posts[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, content: &str) -> Post {
        Post {
            title: title.to_string(),
            content: content.to_string(),
            ..Post::default()
        }
    }

    #[test]
    fn test_small_group_is_identity() {
        let a = post("a", "first");
        let b = post("b", "second");
        let input = vec![&b, &a];
        let out = select_representatives(&input, 3);
        assert_eq!(out.len(), 2);
        assert!(std::ptr::eq(out[0], &b));
        assert!(std::ptr::eq(out[1], &a));
    }

    #[test]
    fn test_posts_without_terms_rank_last() {
        let empty = post("", "");
        let shared = post("", "transformer attention");
        let distinct = post("", "kernel regression bandwidth");
        let input = vec![&empty, &shared, &shared, &distinct];
        let out = select_representatives(&input, 1);
        // "transformer"/"attention" appear in 2 of 4 docs: ln(4/3) > 0,
        // distinct terms appear in 1 of 4: ln(4/2), the largest mean.
        assert!(std::ptr::eq(out[0], &distinct));
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        // Every post has the same single distinct term, so every mean is equal
        let posts: Vec<Post> = ["alpha", "bravo", "delta", "kilo", "lima"]
            .iter()
            .map(|w| post("", w))
            .collect();
        let input: Vec<&Post> = posts.iter().collect();
        let out = select_representatives(&input, 3);
        assert_eq!(out.len(), 3);
        for (picked, expected) in out.iter().zip(&posts) {
            assert!(std::ptr::eq(*picked, expected));
        }
    }

    #[test]
    fn test_markup_is_cleaned_before_scoring() {
        let doc = post_document(&post(
            "HW3 notes",
            "<document><paragraph>Loss curves</paragraph></document>",
        ));
        assert_eq!(doc, "Loss curves HW3 notes");
    }
}
