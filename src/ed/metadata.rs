// Title heuristics: which model and which homework a post is about.
//
// Students title their posts freely ("HW02 w/ gpt-4o mini", "Homework 5 -
// Claude 3.5 Sonnet"), so matching is case-insensitive and tolerant of
// optional separators. Model patterns are ordered most specific first and the
// first hit wins; "gpt-4o-mini" must not be reported as plain "GPT-4".

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::models::UNKNOWN;

/// (pattern, canonical name) in match-priority order.
const MODEL_PATTERNS: &[(&str, &str)] = &[
    (r"gpt[-\s]?5[-\s]?\(?\s*thinking\s*\)?", "GPT-5-Thinking"),
    (r"gpt[-\s]?5\.?1[-\s]?thinking", "GPT-5.1-Thinking"),
    (r"gpt[-\s]?5\.?1", "GPT-5.1"),
    (r"gpt[-\s]?5", "GPT-5"),
    (r"gpt[-\s]?4o[-\s]?mini", "GPT-4o-mini"),
    (r"gpt[-\s]?4o", "GPT-4o"),
    (r"gpt[-\s]?4[-\s]?turbo", "GPT-4-Turbo"),
    (r"gpt[-\s]?4", "GPT-4"),
    (r"gpt[-\s]?3\.?5[-\s]?turbo", "GPT-3.5-Turbo"),
    (r"gpt[-\s]?3\.?5", "GPT-3.5"),
    (r"chatgpt[-\s]?5", "ChatGPT-5"),
    (r"chatgpt", "ChatGPT"),
    (r"o1[-\s]?preview", "o1-preview"),
    (r"o1[-\s]?mini", "o1-mini"),
    (r"\bo1\b", "o1"),
    (r"claude[-\s]?3\.?5[-\s]?sonnet", "Claude-3.5-Sonnet"),
    (r"claude[-\s]?3[-\s]?opus", "Claude-3-Opus"),
    (r"claude[-\s]?3[-\s]?sonnet", "Claude-3-Sonnet"),
    (r"claude[-\s]?sonnet", "Claude-Sonnet"),
    (r"claude[-\s]?opus", "Claude-Opus"),
    (r"claude", "Claude"),
    (r"gemini[-\s]?1\.?5[-\s]?pro", "Gemini-1.5-Pro"),
    (r"gemini[-\s]?1\.?5[-\s]?flash", "Gemini-1.5-Flash"),
    (r"gemini[-\s]?pro", "Gemini-Pro"),
    (r"gemini[-\s]?flash", "Gemini-Flash"),
    (r"gemma", "Gemma"),
    (r"gemini", "Gemini"),
    (r"deepseek[-\s]?v?3\.?2", "DeepSeek-v3.2"),
    (r"deepseek[-\s]?v?3", "DeepSeek-v3"),
    (r"deepseek", "DeepSeek"),
    (r"llama[-\s]?3\.?1", "Llama-3.1"),
    (r"llama[-\s]?3", "Llama-3"),
    (r"llama[-\s]?2", "Llama-2"),
    (r"llama", "Llama"),
    (r"grok", "Grok"),
    (r"kimi[-\s]?k2", "Kimi-K2"),
    (r"kimi", "Kimi"),
    (r"perplexity[-\s]?sonar", "Perplexity-Sonar"),
    (r"perplexity", "Perplexity"),
    (r"gpt[-\s]?oss", "GPT-OSS"),
    (r"qwen[-\s]?2\.?5", "Qwen-2.5"),
    (r"qwen[-\s]?2", "Qwen-2"),
    (r"qwen", "Qwen"),
    (r"mistral", "Mistral"),
    (r"mixtral", "Mixtral"),
    (r"phi[-\s]?3", "Phi-3"),
    (r"phi", "Phi"),
];

/// Homework number patterns; "hwk" covers a common typo.
const HOMEWORK_PATTERNS: &[&str] = &[
    r"hwk[- ]?(\d+)",
    r"hw[- ]?(\d+)",
    r"homework[- ]?(\d+)",
    r"h(\d+)",
    r"assignment[- ]?(\d+)",
];

static MODEL_REGEXES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    MODEL_PATTERNS
        .iter()
        .map(|(pattern, name)| {
            let re = Regex::new(&format!("(?i){pattern}")).expect("valid model pattern");
            (re, *name)
        })
        .collect()
});

static HOMEWORK_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    HOMEWORK_PATTERNS
        .iter()
        .map(|pattern| Regex::new(&format!("(?i){pattern}")).expect("valid homework pattern"))
        .collect()
});

/// Model and homework labels pulled from a post title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMetadata {
    pub model: String,
    pub homework: String,
}

/// Extract both labels, defaulting each to "Unknown".
pub fn extract_metadata(title: &str) -> TitleMetadata {
    TitleMetadata {
        model: detect_model(title).unwrap_or(UNKNOWN).to_string(),
        homework: detect_homework(title).unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

/// Canonical model name for the first matching pattern.
pub fn detect_model(title: &str) -> Option<&'static str> {
    MODEL_REGEXES
        .iter()
        .find(|(re, _)| re.is_match(title))
        .map(|(_, name)| *name)
}

/// Normalized homework label ("HW02" → "HW2", "hw 00" → "HW0").
pub fn detect_homework(title: &str) -> Option<String> {
    HOMEWORK_REGEXES.iter().find_map(|re| {
        let digits = re.captures(title)?.get(1)?.as_str();
        let trimmed = digits.trim_start_matches('0');
        let number = if trimmed.is_empty() { "0" } else { trimmed };
        Some(format!("HW{number}"))
    })
}
