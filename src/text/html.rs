// Markup-to-text conversion for post bodies.
//
// Ed stores post bodies as an XML-ish document format (`<document>`,
// `<paragraph>`, ...) and sometimes as plain HTML. The primary path is a small
// tolerant scanner that emits every non-blank text node on its own line with
// entities decoded. Input the scanner can't make sense of (unterminated tags,
// unclosed comments) goes through a regex that simply deletes anything
// tag-shaped, so conversion itself never fails.

use std::borrow::Cow;
use std::sync::LazyLock;

use anyhow::{anyhow, bail, Result};
use regex_lite::Regex;
use tracing::debug;

static TAG_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("valid tag pattern"));

static FALLBACK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*(>|$)").expect("valid fallback pattern"));

/// Elements whose contents are never visible text.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style"];

/// Whether the text appears to carry markup at all.
pub fn looks_like_markup(text: &str) -> bool {
    TAG_LIKE.is_match(text)
}

/// Strip markup only when the text has some; plain text is borrowed as-is.
pub fn clean_text(text: &str) -> Cow<'_, str> {
    if looks_like_markup(text) {
        Cow::Owned(html_to_text(text))
    } else {
        Cow::Borrowed(text)
    }
}

/// Convert markup into newline-separated plain text.
pub fn html_to_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    match parse_markup(html) {
        Ok(text) => text,
        Err(e) => {
            debug!(error = %e, "Markup scan failed, falling back to tag regex");
            strip_tags(html)
        }
    }
}

/// Regex fallback: delete tag-shaped spans, decode entities, tidy whitespace.
pub fn strip_tags(html: &str) -> String {
    let stripped = FALLBACK_TAG.replace_all(html, "\n");
    let decoded = decode_entities(&stripped);
    decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Walk the markup, collecting text nodes. Errors on structure the scanner
/// can't close: a tag without `>`, a comment without `-->`, or a script/style
/// element that never ends.
fn parse_markup(html: &str) -> Result<String> {
    let mut pieces: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut skipping: Option<String> = None;
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        let after = &rest[start..];

        // A '<' not followed by a tag start is literal text ("a < b").
        let next = after[1..].chars().next();
        if !matches!(next, Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!') {
            text.push('<');
            rest = &after[1..];
            continue;
        }

        if after.starts_with("<!--") {
            let end = after
                .find("-->")
                .ok_or_else(|| anyhow!("unterminated comment"))?;
            rest = &after[end + 3..];
            continue;
        }

        let close = after
            .find('>')
            .ok_or_else(|| anyhow!("unterminated tag near byte {}", html.len() - after.len()))?;
        let tag = &after[1..close];
        rest = &after[close + 1..];

        if skipping.is_none() {
            flush_text(&mut text, &mut pieces);
        } else {
            text.clear();
        }

        let closing = tag.starts_with('/');
        let name = tag_name(tag);
        match &skipping {
            Some(open) => {
                if closing && name == *open {
                    skipping = None;
                }
            }
            None => {
                if !closing && !tag.ends_with('/') && SKIPPED_ELEMENTS.contains(&name.as_str()) {
                    skipping = Some(name);
                }
            }
        }
    }

    if let Some(open) = skipping {
        bail!("unclosed <{open}> element");
    }
    text.push_str(rest);
    flush_text(&mut text, &mut pieces);

    Ok(pieces.join("\n"))
}

fn flush_text(text: &mut String, pieces: &mut Vec<String>) {
    let decoded = decode_entities(text);
    let trimmed = decoded.trim();
    if !trimmed.is_empty() {
        pieces.push(trimmed.to_string());
    }
    text.clear();
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches(['/', '!'])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == ':')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Decode named and numeric character references. Unknown references are
/// left untouched.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        let decoded = candidate
            .char_indices()
            .take(12)
            .find(|(_, c)| *c == ';')
            .and_then(|(semi, _)| decode_entity(&candidate[1..semi]).map(|ch| (ch, semi)));
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &candidate[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
