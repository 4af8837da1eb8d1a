// Thread processing: turn raw Ed threads into participation posts.
//
// Only "Special Participation A" write-ups are kept. Threads that merely
// discuss the course's extra-credit website (the red/blue team projects)
// mention the same phrase and are dropped.

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use super::client::EdThread;
use super::metadata::extract_metadata;
use crate::models::{Post, UNKNOWN};

static PARTICIPATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)special\s+participation\s+a").expect("valid participation pattern")
});

static META_POSTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)extra\s+credit\s+website",
        r"(?i)blue\s+team.*website",
        r"(?i)red\s+team.*website",
        r"(?i)website.*blue\s+team",
        r"(?i)website.*red\s+team",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid meta-post pattern"))
    .collect()
});

/// Public discussion URL for a thread.
pub fn thread_url(course_id: u64, thread_id: Option<u64>) -> String {
    let id = thread_id.map(|id| id.to_string()).unwrap_or_default();
    format!("https://edstem.org/us/courses/{course_id}/discussion/{id}")
}

/// Whether a title belongs to a participation write-up (and not a meta post).
pub fn is_participation_title(title: &str) -> bool {
    PARTICIPATION.is_match(title) && !META_POSTS.iter().any(|re| re.is_match(title))
}

/// Filter threads to participation posts and attach title metadata.
pub fn process_threads(threads: &[EdThread], course_id: u64) -> Vec<Post> {
    let posts: Vec<Post> = threads
        .iter()
        .filter(|t| is_participation_title(&t.title))
        .map(|t| thread_to_post(t, course_id))
        .collect();

    debug!(
        threads = threads.len(),
        kept = posts.len(),
        "Filtered participation threads"
    );
    posts
}

fn thread_to_post(thread: &EdThread, course_id: u64) -> Post {
    let meta = extract_metadata(&thread.title);
    let author = thread
        .user
        .as_ref()
        .map(|u| u.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string());

    Post {
        id: thread.id,
        title: thread.title.trim().to_string(),
        author,
        content: thread.document.clone(),
        model: meta.model,
        homework: meta.homework,
        created_at: thread.created_at.clone(),
        updated_at: thread.updated_at.clone(),
        url: thread_url(course_id, thread.id),
        likes: thread.votes.max(0) as u64,
        comments: thread.comment_count.max(0) as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ed::client::EdUser;

    fn thread(id: u64, title: &str) -> EdThread {
        EdThread {
            id: Some(id),
            title: title.to_string(),
            user: Some(EdUser {
                name: "Ada".to_string(),
            }),
            votes: 3,
            comment_count: -1,
            ..EdThread::default()
        }
    }

    #[test]
    fn test_meta_posts_excluded() {
        assert!(is_participation_title("Special Participation A: HW1 Claude"));
        assert!(!is_participation_title(
            "Special Participation A - Blue Team extra credit website"
        ));
        assert!(!is_participation_title("Special Participation B: HW1"));
    }

    #[test]
    fn test_process_threads_builds_posts() {
        let threads = vec![
            thread(11, "  Special Participation A: HW02 GPT-4o  "),
            thread(12, "Lecture 4 question"),
        ];
        let posts = process_threads(&threads, 84647);
        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.id, Some(11));
        assert_eq!(post.title, "Special Participation A: HW02 GPT-4o");
        assert_eq!(post.model, "GPT-4o");
        assert_eq!(post.homework, "HW2");
        assert_eq!(post.author, "Ada");
        assert_eq!(post.likes, 3);
        assert_eq!(post.comments, 0);
        assert_eq!(post.url, "https://edstem.org/us/courses/84647/discussion/11");
    }
}
