//! Fuzzy language lookup.
//!
//! Resolves what the user typed ("python", "c++", ".rs", "ts") to a catalog
//! entry. Exact matches on id, name or extension win; otherwise candidates
//! are ranked by skim fuzzy score over id, name and extension.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use runpad_models::language;
use runpad_models::{LanguageOption, LANGUAGES};

/// Score given to exact matches so they always rank first.
const EXACT_SCORE: i64 = i64::MAX;

/// A ranked language candidate.
#[derive(Debug, Clone, Copy)]
pub struct LanguageMatch {
    /// The matched catalog entry.
    pub language: &'static LanguageOption,
    /// Relevance score (higher is better).
    pub score: i64,
}

/// Ranks catalog entries against a query, best first.
///
/// An empty query returns the whole catalog in presentation order.
pub fn search(query: &str) -> Vec<LanguageMatch> {
    let query = query.trim();
    if query.is_empty() {
        return LANGUAGES
            .iter()
            .map(|language| LanguageMatch { language, score: 0 })
            .collect();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut matches: Vec<LanguageMatch> = LANGUAGES
        .iter()
        .filter_map(|language| {
            score(&matcher, language, query).map(|score| LanguageMatch { language, score })
        })
        .collect();

    // Stable sort keeps catalog order among equal scores.
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}

/// Resolves a query to the single best catalog entry.
pub fn resolve(query: &str) -> Option<&'static LanguageOption> {
    if let Some(exact) = language::find(query.trim()) {
        return Some(exact);
    }
    search(query).first().map(|m| m.language)
}

fn score(matcher: &SkimMatcherV2, language: &LanguageOption, query: &str) -> Option<i64> {
    if language.id.eq_ignore_ascii_case(query)
        || language.name.eq_ignore_ascii_case(query)
        || language.extension.eq_ignore_ascii_case(query)
        || language.extension[1..].eq_ignore_ascii_case(query)
    {
        return Some(EXACT_SCORE);
    }

    [language.id, language.name, language.extension]
        .iter()
        .filter_map(|candidate| matcher.fuzzy_match(candidate, query))
        .max()
}
