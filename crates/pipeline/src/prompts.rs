//! Prompt templates and response cleanup for the remote model.

use once_cell::sync::Lazy;
use regex::Regex;
use thoughts_common::text::{ELLIPSIS, char_len, take_chars, truncate_chars};
use thoughts_common::{CATEGORY_TABLE, Category, MAX_SUMMARY_CHARS};

/// Leading labels models like to prepend to a summary.
static SUMMARY_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(summary|streszczenie|podsumowanie)\s*[:\-–]\s*")
        .expect("summary label pattern is valid")
});

pub fn summary_prompt(text: &str) -> String {
    format!(
        "Summarize the following note in at most 12 words. \
         Reply with the summary only.\n\nNote: {text}\n\nSummary:"
    )
}

pub fn category_prompt(text: &str) -> String {
    let labels: Vec<&str> = CATEGORY_TABLE.iter().map(|info| info.label).collect();
    format!(
        "Classify the following note into exactly one category: {}. \
         Reply with the category name only.\n\nNote: {text}\n\nCategory:",
        labels.join(", ")
    )
}

/// Drop an echoed copy of the prompt from the front of a response.
fn strip_prompt_echo<'a>(response: &'a str, prompt: &str) -> &'a str {
    let trimmed = response.trim_start();
    trimmed.strip_prefix(prompt.trim()).unwrap_or(trimmed)
}

/// Whole-word patterns for every category except the `Other` fallback,
/// matching the English label or the Polish alias.
static CATEGORY_NAMES: Lazy<Vec<(Category, Regex)>> = Lazy::new(|| {
    CATEGORY_TABLE
        .iter()
        .filter(|info| info.category != Category::Other)
        .map(|info| {
            let pattern = format!(
                r"(?i)\b(?:{}|{})\b",
                regex::escape(info.label),
                regex::escape(info.alias)
            );
            let regex = Regex::new(&pattern).expect("category name pattern is valid");
            (info.category, regex)
        })
        .collect()
});

/// Pick the category whose name occurs earliest in the response as a whole
/// word. [`Category::Other`] is only the fallback when none is mentioned.
pub fn parse_category(response: &str, prompt: &str) -> Category {
    let body = strip_prompt_echo(response, prompt);
    CATEGORY_NAMES
        .iter()
        .filter_map(|(category, pattern)| pattern.find(body).map(|m| (m.start(), *category)))
        .min()
        .map(|(_, category)| category)
        .unwrap_or(Category::Other)
}

/// Turn raw model output into a summary, or `None` when nothing usable is
/// left after removing the scaffold.
pub fn clean_summary(response: &str, prompt: &str) -> Option<String> {
    let body = strip_prompt_echo(response, prompt);
    let first_line = body.lines().map(str::trim).find(|line| !line.is_empty())?;
    let unlabeled = SUMMARY_LABEL.replace(first_line, "");
    let cleaned = unlabeled.trim().trim_matches(|c: char| c == '"' || c == '\'').trim();

    if cleaned.is_empty() || cleaned == prompt.trim() {
        return None;
    }
    Some(truncate_chars(cleaned, MAX_SUMMARY_CHARS))
}

/// Local summary: the first `max_chars` characters plus an ellipsis, or the
/// text itself when it already fits.
pub fn local_summary(text: &str, max_chars: usize) -> String {
    let summary = if char_len(text) <= max_chars {
        text.to_string()
    } else {
        format!("{}{}", take_chars(text, max_chars), ELLIPSIS)
    };
    truncate_chars(&summary, MAX_SUMMARY_CHARS)
}
