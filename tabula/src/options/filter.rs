//! Option filtering.
//!
//! The default is case-insensitive substring matching over label, keywords
//! and group name. Fuzzy ranking via nucleo-matcher is available for
//! surfaces that opt into it.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde::{Deserialize, Serialize};

use super::OptionItem;

/// How a search term is matched against options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Lower-cased substring, source order preserved
    #[default]
    Substring,
    /// Fuzzy subsequence, best score first
    Fuzzy,
}

/// Result of a fuzzy filter operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterMatch {
    /// Index of the matched item in the original list.
    pub index: usize,
    /// Match score (higher is better).
    pub score: u32,
}

/// Normalise a raw search term: trimmed and lower-cased.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Whether an option matches an already normalised needle.
///
/// An empty needle matches everything.
pub fn option_matches<T>(option: &OptionItem<T>, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    option.label.to_lowercase().contains(needle)
        || option
            .keywords
            .iter()
            .any(|keyword| keyword.to_lowercase().contains(needle))
        || option
            .group
            .as_deref()
            .is_some_and(|group| group.to_lowercase().contains(needle))
}

/// Filter options by substring, preserving source order.
///
/// ```
/// use tabula::options::{OptionItem, filter};
///
/// let options = vec![OptionItem::new("a", "Apple"), OptionItem::new("b", "Banana")];
/// let filtered = filter(&options, "  AN ");
/// assert_eq!(filtered.len(), 1);
/// assert_eq!(filtered[0].label, "Banana");
/// ```
pub fn filter<'a, T>(options: &'a [OptionItem<T>], term: &str) -> Vec<&'a OptionItem<T>> {
    let needle = normalize_term(term);
    options
        .iter()
        .filter(|option| option_matches(option, &needle))
        .collect()
}

/// Indices of the options matching `term` under the given mode.
pub fn filter_indices<T>(options: &[OptionItem<T>], term: &str, mode: MatchMode) -> Vec<usize> {
    match mode {
        MatchMode::Substring => {
            let needle = normalize_term(term);
            options
                .iter()
                .enumerate()
                .filter(|(_, option)| option_matches(option, &needle))
                .map(|(index, _)| index)
                .collect()
        }
        MatchMode::Fuzzy => {
            let haystacks: Vec<String> = options.iter().map(search_text).collect();
            fuzzy_filter(term.trim(), &haystacks)
                .into_iter()
                .map(|m| m.index)
                .collect()
        }
    }
}

/// Everything an option can be found by, joined for fuzzy matching.
fn search_text<T>(option: &OptionItem<T>) -> String {
    let mut text = option.label.clone();
    for keyword in &option.keywords {
        text.push(' ');
        text.push_str(keyword);
    }
    if let Some(group) = &option.group {
        text.push(' ');
        text.push_str(group);
    }
    text
}

/// Fuzzy filter using nucleo-matcher.
///
/// Returns matches sorted by score (highest first, ties in source order).
/// Empty query returns all items with score 0.
pub fn fuzzy_filter(query: &str, items: &[String]) -> Vec<FilterMatch> {
    if query.is_empty() {
        return items
            .iter()
            .enumerate()
            .map(|(index, _)| FilterMatch { index, score: 0 })
            .collect();
    }

    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    );

    let mut buf = Vec::new();
    let mut matches: Vec<FilterMatch> = items
        .iter()
        .enumerate()
        .filter_map(|(index, label)| {
            let haystack = Utf32Str::new(label, &mut buf);
            pattern
                .score(haystack, &mut matcher)
                .map(|score| FilterMatch { index, score })
        })
        .collect();

    // Stable sort keeps source order among equal scores
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}
