//! User-facing message rendering.
//!
//! Emoji and labels come from the shared category table, so what the
//! classifier decides and what the user sees cannot drift apart.

use std::fmt::Write;

use thoughts_common::text::{char_len, take_chars};
use thoughts_common::{Category, CategoryStats, Note};

/// Characters of the summary shown per list line.
pub const LIST_PREVIEW_CHARS: usize = 50;

pub const TOO_SHORT: &str = "⚠️ The note is too short, write a bit more.";
pub const PROCESSING_FAILED: &str = "processing failed, retry";
pub const TRANSCRIPTION_EMPTY: &str = "❌ Could not recognize any speech.";
pub const NO_NOTES: &str = "📭 You have no notes yet.";
pub const NO_STATS: &str = "📊 No data for statistics yet.";

pub fn saved(note: &Note) -> String {
    format!(
        "✅ Note #{} saved!\n\n{} Category: {}\n📝 Summary: {}\n🕒 Time: {}",
        note.id,
        note.category.emoji(),
        note.category,
        note.summary,
        note.created_at.format("%H:%M"),
    )
}

fn preview(summary: &str) -> String {
    if char_len(summary) > LIST_PREVIEW_CHARS {
        format!("{}...", take_chars(summary, LIST_PREVIEW_CHARS))
    } else {
        summary.to_string()
    }
}

pub fn note_list(notes: &[Note], category: Option<Category>) -> String {
    if notes.is_empty() {
        return NO_NOTES.to_string();
    }

    let mut out = match category {
        Some(category) => format!("📚 Your {} notes:\n", category),
        None => "📚 Your notes:\n".to_string(),
    };
    for note in notes {
        let _ = writeln!(
            out,
            "{}. {} [{}] {} ({})",
            note.id,
            note.category.emoji(),
            note.category,
            preview(&note.summary),
            note.created_at.format("%Y-%m-%d %H:%M"),
        );
    }
    out
}

pub fn stats(stats: &CategoryStats) -> String {
    if stats.is_empty() {
        return NO_STATS.to_string();
    }

    let mut out = "📊 Your category statistics:\n".to_string();
    for (category, count) in &stats.counts {
        let _ = writeln!(out, "{} {}: {}", category.emoji(), category, count);
    }
    let _ = write!(out, "\n📝 Total: {} notes.", stats.total);
    out
}

pub fn help() -> String {
    let categories: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!("{} {}", c.emoji(), c.label()))
        .collect();

    format!(
        "🤖 Send a note (or a voice recording) and it is saved, summarized and categorized.\n\
         \n\
         POST /api/v1/notes          {{\"user_id\", \"text\"}}\n\
         POST /api/v1/notes/voice    {{\"user_id\", \"audio_url\"}}\n\
         GET  /api/v1/notes?user_id=&category=&limit=\n\
         GET  /api/v1/stats?user_id=\n\
         \n\
         Categories: {}\n\
         Example: GET /api/v1/notes?user_id=me&category=technology",
        categories.join(", ")
    )
}
