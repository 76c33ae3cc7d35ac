//! Note model and the closed category set.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ThoughtsError;

/// Upper bound on the length of a derived summary, in characters.
pub const MAX_SUMMARY_CHARS: usize = 100;

/// Minimum number of visible characters a note needs after trimming.
pub const MIN_NOTE_CHARS: usize = 3;

/// Topic label attached to every note.
///
/// Variant order is the classifier priority order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[serde(alias = "projekt")]
    Project,
    #[serde(alias = "nauka")]
    Learning,
    #[serde(alias = "osobiste")]
    Personal,
    #[serde(alias = "praca")]
    Work,
    #[serde(alias = "technologia")]
    Technology,
    #[serde(alias = "inspiracja")]
    Inspiration,
    #[default]
    #[serde(alias = "inne")]
    Other,
}

/// One row of the category table shared by the classifier and the
/// presentation layer.
#[derive(Debug, Clone, Copy)]
pub struct CategoryInfo {
    pub category: Category,
    /// Canonical lowercase label, used for storage and serialization.
    pub label: &'static str,
    /// Localized display alias, also accepted when parsing.
    pub alias: &'static str,
    pub emoji: &'static str,
    /// Lowercase substrings that select this category.
    pub keywords: &'static [&'static str],
}

/// Categories in classifier priority order. `Other` is the sentinel and has
/// no keywords.
pub const CATEGORY_TABLE: &[CategoryInfo] = &[
    CategoryInfo {
        category: Category::Project,
        label: "project",
        alias: "projekt",
        emoji: "🚀",
        keywords: &["pomysł", "idea", "startup", "projekt"],
    },
    CategoryInfo {
        category: Category::Learning,
        label: "learning",
        alias: "nauka",
        emoji: "📖",
        keywords: &["artykuł", "kurs", "nauka", "wiedza", "ai"],
    },
    CategoryInfo {
        category: Category::Personal,
        label: "personal",
        alias: "osobiste",
        emoji: "👤",
        keywords: &["kupić", "rodzina", "zdrowie", "osobiste"],
    },
    CategoryInfo {
        category: Category::Work,
        label: "work",
        alias: "praca",
        emoji: "💼",
        keywords: &["spotkanie", "klient", "deadline", "praca"],
    },
    CategoryInfo {
        category: Category::Technology,
        label: "technology",
        alias: "technologia",
        emoji: "💻",
        keywords: &["kod", "github", "framework", "technologia"],
    },
    CategoryInfo {
        category: Category::Inspiration,
        label: "inspiration",
        alias: "inspiracja",
        emoji: "✨",
        keywords: &["cytat", "motywacja", "cel"],
    },
    CategoryInfo {
        category: Category::Other,
        label: "other",
        alias: "inne",
        emoji: "📄",
        keywords: &[],
    },
];

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Project,
        Category::Learning,
        Category::Personal,
        Category::Work,
        Category::Technology,
        Category::Inspiration,
        Category::Other,
    ];

    pub fn info(self) -> &'static CategoryInfo {
        // Table rows follow variant order.
        &CATEGORY_TABLE[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    pub fn alias(self) -> &'static str {
        self.info().alias
    }

    pub fn emoji(self) -> &'static str {
        self.info().emoji
    }

    pub fn keywords(self) -> &'static [&'static str] {
        self.info().keywords
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ThoughtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CATEGORY_TABLE
            .iter()
            .find(|info| info.label == wanted || info.alias == wanted)
            .map(|info| info.category)
            .ok_or_else(|| ThoughtsError::Validation(format!("unknown category '{}'", s.trim())))
    }
}

/// Output of the note processor. Has no identity until it is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedNote {
    /// Original input text
    pub text: String,

    /// Derived summary, at most [`MAX_SUMMARY_CHARS`] characters
    pub summary: String,

    pub category: Category,
}

/// A persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Store-assigned identifier, increasing per store
    pub id: i64,

    pub text: String,

    pub summary: String,

    pub category: Category,

    /// Assigned by the store at insert time
    pub created_at: DateTime<Utc>,

    /// Opaque partition key of the submitting user
    pub user_id: String,
}

/// Per-category note counts for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub counts: BTreeMap<Category, u64>,
    pub total: u64,
}

impl CategoryStats {
    /// Build stats whose total is the sum of the counts.
    pub fn from_counts(counts: BTreeMap<Category, u64>) -> Self {
        let total = counts.values().sum();
        Self { counts, total }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
