//! Title normalization for sorting and searching
//!
//! Raw titles sort badly: case, accents, quotes, and leading articles all
//! get in the way of the order a reader expects. The store keeps a
//! precomputed sort key per movie so fetches order by `sortable_title`
//! output rather than raw codepoints, and search matches through
//! `contains_normalized` so "amelie" finds "Amélie".

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Ordering applied to titles in a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleSort {
    /// Alphabetical by normalized title
    Ascending,
    /// Reverse alphabetical by normalized title
    Descending,
}

/// Articles dropped from the front of a sort key
const LEADING_ARTICLES: &[&str] = &["a", "an", "the", "el", "la", "las", "los", "le", "les"];

/// Fold a string for comparison: decompose, strip combining marks, lowercase
pub fn search_key(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Compute the normalized sort key for a title
///
/// Folds case and diacritics, strips leading punctuation, and drops one
/// leading article so "The Score" sorts under "s".
pub fn sortable_title(title: &str) -> String {
    let folded = search_key(title);
    let stripped = folded.trim_start_matches(|c: char| !c.is_alphanumeric());
    for article in LEADING_ARTICLES {
        if let Some(rest) = stripped.strip_prefix(article) {
            if let Some(rest) = rest.strip_prefix(' ') {
                return rest.trim().to_string();
            }
        }
    }
    stripped.trim_end().to_string()
}

/// Case- and diacritic-insensitive substring containment
///
/// An empty needle matches everything, so an empty search string applies
/// no filter.
pub fn contains_normalized(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    search_key(haystack).contains(&search_key(needle))
}
