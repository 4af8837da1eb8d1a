// Data models: the post record that flows from the scraper/merger into
// the analytics core.
//
// Posts arrive as loosely-typed JSON produced by other tools (or by hand
// edits), so every field deserializes leniently: missing or null values fall
// back to empty strings, zero counts, or "Unknown" labels instead of failing
// the whole file.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Label used for posts whose model or homework couldn't be determined.
pub const UNKNOWN: &str = "Unknown";

/// A single discussion post with its extracted metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: String,
    /// Plain text body (may still carry markup when fed straight from the scraper)
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,
    #[serde(default = "unknown_label", deserialize_with = "lenient_label")]
    pub model: String,
    #[serde(default = "unknown_label", deserialize_with = "lenient_label")]
    pub homework: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub likes: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub comments: u64,
}

impl Default for Post {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            author: String::new(),
            content: String::new(),
            model: UNKNOWN.to_string(),
            homework: UNKNOWN.to_string(),
            created_at: String::new(),
            updated_at: String::new(),
            url: String::new(),
            likes: 0,
            comments: 0,
        }
    }
}

impl Post {
    /// Calendar date bucket for timelines: the first 10 characters of
    /// `created_at`, or "Unknown" when the timestamp is missing.
    pub fn date_bucket(&self) -> String {
        if self.created_at.is_empty() {
            UNKNOWN.to_string()
        } else {
            self.created_at.chars().take(10).collect()
        }
    }
}

fn unknown_label() -> String {
    UNKNOWN.to_string()
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Blank or null labels become "Unknown" so they still form a valid bucket.
fn lenient_label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let label = lenient_string(deserializer)?;
    let trimmed = label.trim();
    if trimmed.is_empty() {
        Ok(unknown_label())
    } else {
        Ok(trimmed.to_string())
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let post: Post = serde_json::from_str(r#"{"content": "hello"}"#).unwrap();
        assert_eq!(post.content, "hello");
        assert_eq!(post.model, UNKNOWN);
        assert_eq!(post.homework, UNKNOWN);
        assert_eq!(post.id, None);
        assert_eq!(post.likes, 0);
        assert!(post.title.is_empty());
    }

    #[test]
    fn test_nulls_and_strings_are_tolerated() {
        let post: Post = serde_json::from_str(
            r#"{"id": "42", "title": null, "model": "  ", "homework": "HW3", "likes": "7", "comments": null}"#,
        )
        .unwrap();
        assert_eq!(post.id, Some(42));
        assert!(post.title.is_empty());
        assert_eq!(post.model, UNKNOWN);
        assert_eq!(post.homework, "HW3");
        assert_eq!(post.likes, 7);
        assert_eq!(post.comments, 0);
    }

    #[test]
    fn test_date_bucket() {
        let mut post = Post {
            created_at: "2024-01-05T10:11:12.000+11:00".to_string(),
            ..Post::default()
        };
        assert_eq!(post.date_bucket(), "2024-01-05");
        post.created_at.clear();
        assert_eq!(post.date_bucket(), UNKNOWN);
    }
}
