//! Keyword-based category guesser.

use thoughts_common::{CATEGORY_TABLE, Category, CategoryInfo};

/// Deterministic substring classifier over the static category table.
///
/// Categories are tried in priority order and the first one with a keyword
/// contained in the lower-cased text wins. Pure and cheap; safe to share.
#[derive(Debug, Clone, Copy)]
pub struct KeywordClassifier {
    table: &'static [CategoryInfo],
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self {
            table: CATEGORY_TABLE,
        }
    }

    pub fn classify(&self, text: &str) -> Category {
        let lower = text.to_lowercase();
        self.table
            .iter()
            .find(|info| info.keywords.iter().any(|kw| lower.contains(kw)))
            .map(|info| info.category)
            .unwrap_or(Category::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_project_keywords() {
        let classifier = KeywordClassifier::new();
        assert_eq!(classifier.classify("Mam pomysł na nowy startup"), Category::Project);
    }

    #[test]
    fn every_keyword_selects_its_category() {
        let classifier = KeywordClassifier::new();
        for info in CATEGORY_TABLE {
            for keyword in info.keywords {
                let text = format!("xyz {keyword} xyz");
                let got = classifier.classify(&text);
                // An earlier category may claim a keyword through a shorter
                // substring; otherwise the owning category must win.
                let earlier = CATEGORY_TABLE
                    .iter()
                    .take_while(|i| i.category != info.category)
                    .any(|i| i.keywords.iter().any(|k| text.contains(k)));
                if !earlier {
                    assert_eq!(got, info.category, "keyword {keyword}");
                }
            }
        }
    }

    #[test]
    fn is_case_insensitive() {
        let classifier = KeywordClassifier::new();
        assert_eq!(classifier.classify("Nowy KOD na GitHub"), Category::Technology);
        assert_eq!(classifier.classify("SPOTKANIE jutro"), Category::Work);
    }

    #[test]
    fn priority_order_breaks_ties() {
        let classifier = KeywordClassifier::new();
        // "startup" (project) outranks "klient" (work)
        assert_eq!(classifier.classify("klient dla startup"), Category::Project);
    }

    #[test]
    fn no_keyword_is_other() {
        let classifier = KeywordClassifier::new();
        assert_eq!(classifier.classify("zwykły dzień bez niczego"), Category::Other);
        assert_eq!(classifier.classify(""), Category::Other);
    }

    #[test]
    fn classification_is_pure() {
        let classifier = KeywordClassifier::new();
        let text = "Przeczytać artykuł o motywacja";
        let first = classifier.classify(text);
        for _ in 0..10 {
            assert_eq!(classifier.classify(text), first);
        }
    }
}
