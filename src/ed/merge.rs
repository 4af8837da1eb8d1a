// Merge hand-settled labels with fetched thread bodies.
//
// The listing endpoint's titles are noisy, so model/homework labels get
// corrected by hand in a "settled" CSV. That sheet has no post bodies; this
// module fetches each thread's detail payload, digs out the body text, and
// produces posts that carry both the settled labels and real content.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::client::EdClient;
use super::threads::thread_url;
use crate::models::{Post, UNKNOWN};
use crate::text::html::html_to_text;

/// Pause between detail requests.
const REQUEST_SPACING: Duration = Duration::from_millis(150);

/// Strings found by the fallback scan must be at least this long.
const MIN_SCANNED_CONTENT: usize = 50;

/// Where post bodies usually live in a detail payload, by API shape.
const CONTENT_PATHS: &[&str] = &[
    "thread.document",
    "thread.content",
    "thread.body",
    "thread.post.document",
    "thread.post.content",
    "post.document",
    "post.content",
    "document",
    "content",
    "body",
];

const TITLE_PATHS: &[&str] = &["thread.title", "title"];
const AUTHOR_PATHS: &[&str] = &["thread.user.name", "thread.user.full_name", "user.name"];

/// One row of the settled CSV. Only `id` is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettledRow {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub homework: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub likes: String,
    #[serde(default)]
    pub comments: String,
}

/// Posts produced by a merge run plus the number of threads that failed.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub posts: Vec<Post>,
    pub failures: usize,
}

/// Load the settled CSV keyed by thread id, in file order.
///
/// Rows whose id isn't an integer are skipped. A repeated id keeps its first
/// position but takes the later row's values.
pub fn load_settled_csv(path: &Path) -> Result<Vec<(u64, SettledRow)>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open settled CSV {}", path.display()))?;

    let mut rows: Vec<(u64, SettledRow)> = Vec::new();
    let mut positions: HashMap<u64, usize> = HashMap::new();

    for (line, record) in reader.deserialize::<SettledRow>().enumerate() {
        let row = match record {
            Ok(row) => row,
            Err(e) => {
                warn!(line = line + 2, error = %e, "Skipping unreadable settled row");
                continue;
            }
        };
        let Ok(id) = row.id.trim().parse::<u64>() else {
            continue;
        };
        match positions.get(&id) {
            Some(&i) => rows[i].1 = row,
            None => {
                positions.insert(id, rows.len());
                rows.push((id, row));
            }
        }
    }

    info!(rows = rows.len(), path = %path.display(), "Loaded settled rows");
    Ok(rows)
}

/// Walk a dotted path ("thread.user.name") through nested JSON objects.
pub fn deep_get<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.as_object()?.get(key))
}

fn first_non_blank(value: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| {
        deep_get(value, path)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Pick the most likely post body from a detail payload.
///
/// Prefers the longest non-blank string among the known body locations,
/// measured in characters; on a tie the earlier location wins. If none
/// exist, falls back to the longest string of meaningful length found
/// anywhere in the payload.
pub fn pick_best_content(payload: &Value) -> String {
    let known = CONTENT_PATHS
        .iter()
        .filter_map(|path| deep_get(payload, path).and_then(Value::as_str))
        .filter(|s| !s.trim().is_empty())
        .rev()
        .max_by_key(|s| s.chars().count());
    if let Some(content) = known {
        return content.to_string();
    }

    let mut scanned = Vec::new();
    collect_strings(payload, &mut scanned);
    scanned
        .into_iter()
        .rev()
        .max_by_key(|s| s.chars().count())
        .map(str::to_string)
        .unwrap_or_default()
}

fn collect_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.chars().count() >= MIN_SCANNED_CONTENT {
                out.push(trimmed);
            }
        }
        _ => {}
    }
}

fn label_or_unknown(label: &str) -> String {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        UNKNOWN.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Combine one settled row with its fetched detail payload.
pub fn merge_thread(id: u64, row: &SettledRow, detail: &Value, course_id: u64) -> Post {
    let title = first_non_blank(detail, TITLE_PATHS).unwrap_or_else(|| row.title.clone());
    let author = first_non_blank(detail, AUTHOR_PATHS).unwrap_or_else(|| row.author.clone());
    let content = html_to_text(&pick_best_content(detail));

    let url = if row.url.trim().is_empty() {
        thread_url(course_id, Some(id))
    } else {
        row.url.clone()
    };

    Post {
        id: Some(id),
        title,
        author,
        content,
        model: label_or_unknown(&row.model),
        homework: label_or_unknown(&row.homework),
        created_at: row.created_at.clone(),
        updated_at: row
            .updated_at
            .clone()
            .unwrap_or_else(|| row.created_at.clone()),
        url,
        likes: row.likes.trim().parse().unwrap_or(0),
        comments: row.comments.trim().parse().unwrap_or(0),
    }
}

/// Fetch detail for every settled row and merge. Individual failures are
/// logged and counted, never fatal.
pub async fn merge_settled(client: &EdClient, rows: &[(u64, SettledRow)]) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    let pb = ProgressBar::new(rows.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Merging [{bar:30}] {pos}/{len} ({eta})")
            .expect("valid template"),
    );

    for (id, row) in rows {
        match client.thread_detail(*id).await {
            Ok(detail) => {
                outcome
                    .posts
                    .push(merge_thread(*id, row, &detail, client.course_id()));
            }
            Err(e) => {
                outcome.failures += 1;
                warn!(thread = id, error = %e, "Thread merge failed, skipping");
            }
        }
        pb.inc(1);
        tokio::time::sleep(REQUEST_SPACING).await;
    }
    pb.finish_and_clear();

    let with_content = outcome
        .posts
        .iter()
        .filter(|p| !p.content.trim().is_empty())
        .count();
    info!(
        merged = outcome.posts.len(),
        failures = outcome.failures,
        with_content,
        "Merge complete"
    );
    if !outcome.posts.is_empty() && with_content == 0 {
        warn!("No merged post has content; the detail endpoint may not expose bodies for this token");
    }

    outcome
}
