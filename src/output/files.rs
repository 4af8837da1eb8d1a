// Reading and writing the JSON/CSV files the commands hand to each other.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::analytics::report::Report;
use crate::models::Post;

/// Column order for post CSV exports.
pub const CSV_COLUMNS: [&str; 9] = [
    "id",
    "title",
    "author",
    "model",
    "homework",
    "created_at",
    "url",
    "likes",
    "comments",
];

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load a JSON array of posts. Elements that are not post objects are
/// skipped with a warning; the file itself must still be an array.
pub fn read_posts(path: &Path) -> Result<Vec<Post>> {
    let raw: Vec<Value> = read_json(path)?;
    let total = raw.len();

    let posts: Vec<Post> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            if !value.is_object() {
                warn!(index, "Skipping non-object entry in posts file");
                return None;
            }
            match serde_json::from_value(value) {
                Ok(post) => Some(post),
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed post");
                    None
                }
            }
        })
        .collect();

    info!(
        posts = posts.len(),
        skipped = total - posts.len(),
        path = %path.display(),
        "Loaded posts"
    );
    Ok(posts)
}

/// Load a previously written analytics report.
pub fn read_report(path: &Path) -> Result<Report> {
    read_json(path)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Write any serializable value as pretty-printed JSON, creating parent
/// directories as needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote JSON");
    Ok(())
}

/// Write posts as CSV with the fixed column set. Post bodies are left out;
/// the JSON file carries them.
pub fn write_posts_csv(path: &Path, posts: &[Post]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(CSV_COLUMNS)?;
    for post in posts {
        let id = post.id.map(|id| id.to_string()).unwrap_or_default();
        let likes = post.likes.to_string();
        let comments = post.comments.to_string();
        writer.write_record([
            id.as_str(),
            post.title.as_str(),
            post.author.as_str(),
            post.model.as_str(),
            post.homework.as_str(),
            post.created_at.as_str(),
            post.url.as_str(),
            likes.as_str(),
            comments.as_str(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    info!(rows = posts.len(), path = %path.display(), "Wrote CSV");
    Ok(())
}

/// Write posts to `<stem>.json` and `<stem>.csv` inside `dir`.
pub fn write_posts(dir: &Path, stem: &str, posts: &[Post]) -> Result<()> {
    write_json(&dir.join(format!("{stem}.json")), posts)?;
    write_posts_csv(&dir.join(format!("{stem}.csv")), posts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_header_and_escaping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/posts.csv");
        let post = Post {
            id: Some(5),
            title: "HW1, with \"quotes\"".to_string(),
            likes: 2,
            ..Post::default()
        };
        write_posts_csv(&path, &[post]).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("id,title,author,model,homework,created_at,url,likes,comments")
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("5,\"HW1, with \"\"quotes\"\"\","));
        assert!(row.ends_with(",2,0"));
    }

    #[test]
    fn test_posts_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let post = Post {
            id: Some(1),
            title: "t".to_string(),
            content: "body".to_string(),
            ..Post::default()
        };
        write_posts(dir.path(), "out", std::slice::from_ref(&post)).unwrap();
        let back = read_posts(&dir.path().join("out.json")).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].content, "body");
        assert!(dir.path().join("out.csv").exists());
    }

    #[test]
    fn test_read_posts_skips_non_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        fs::write(&path, r#"[{"id": 3, "model": "Claude"}, null, "junk", 7]"#).unwrap();

        let posts = read_posts(&path).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, Some(3));
        assert_eq!(posts[0].model, "Claude");
    }

    #[test]
    fn test_read_posts_requires_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        fs::write(&path, r#"{"id": 3}"#).unwrap();
        let err = read_posts(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_read_posts_missing_file_errors() {
        let err = read_posts(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
