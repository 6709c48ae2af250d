//! Spelling-correction selection from backend suggestion candidates, and
//! the blocklist deciding when offering a correction is appropriate.

use std::collections::HashSet;

use serde_json::Value;
use strsim::osa_distance;
use tracing::debug;

use trawl_core::config::SpellingConfig;
use trawl_core::error::Result;
use trawl_registry::EntityRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionMode {
    /// Minimum edit distance to the original query, ties by backend
    /// score, then first seen.
    Best,
    /// Highest backend score, first seen on ties.
    Naive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpellingCandidate {
    pub text: String,
    pub score: f64,
}

/// Picks the correction to offer, or `None` without candidates. A single
/// candidate is returned directly, whatever the mode.
pub fn suggest(
    original: &str,
    candidates: &[SpellingCandidate],
    mode: SuggestionMode,
) -> Option<String> {
    match candidates {
        [] => None,
        [only] => Some(only.text.clone()),
        _ => match mode {
            SuggestionMode::Best => closest_candidate(original, candidates),
            SuggestionMode::Naive => highest_scoring(candidates),
        },
    }
}

// Insertions, deletions, substitutions and adjacent transpositions each
// cost one; comparison is case-sensitive, exactly as the backend supplied
// the text.
fn closest_candidate(original: &str, candidates: &[SpellingCandidate]) -> Option<String> {
    let mut best: Option<(&SpellingCandidate, usize)> = None;
    for candidate in candidates {
        let distance = osa_distance(original, &candidate.text);
        let better = match best {
            None => true,
            Some((current, current_distance)) => {
                distance < current_distance
                    || (distance == current_distance && candidate.score > current.score)
            }
        };
        if better {
            best = Some((candidate, distance));
        }
    }
    best.map(|(candidate, _)| candidate.text.clone())
}

fn highest_scoring(candidates: &[SpellingCandidate]) -> Option<String> {
    let mut best: Option<&SpellingCandidate> = None;
    for candidate in candidates {
        let better = match best {
            None => true,
            Some(current) => candidate.score > current.score,
        };
        if better {
            best = Some(candidate);
        }
    }
    best.map(|candidate| candidate.text.clone())
}

/// Queries that must never be "corrected": anything with a digit, any
/// configured ignore word, and organisation names or acronyms, which are
/// deliberate even when they look misspelt.
pub struct CorrectionBlocklist {
    ignore: HashSet<String>,
}

impl CorrectionBlocklist {
    pub fn build(config: &SpellingConfig, organisations: &EntityRegistry) -> Result<Self> {
        let mut ignore: HashSet<String> =
            config.ignore.iter().map(|word| word.to_lowercase()).collect();
        for document in organisations.all()? {
            if let Some(acronym) = document.str_field("acronym") {
                ignore.insert(acronym.to_lowercase());
            }
            if let Some(title) = document.str_field("title") {
                for word in title.split_whitespace() {
                    ignore.insert(word.to_lowercase());
                }
            }
        }
        debug!(words = ignore.len(), "correction blocklist built");
        Ok(CorrectionBlocklist { ignore })
    }

    pub fn should_correct(&self, query: &str) -> bool {
        if query.chars().any(|c| c.is_ascii_digit()) {
            return false;
        }
        !query
            .split_whitespace()
            .any(|word| self.ignore.contains(&word.to_lowercase()))
    }
}

/// Extracts the backend's first suggestion group and picks the correction
/// to present, at most one.
pub struct SpellCheckPresenter;

impl SpellCheckPresenter {
    pub fn suggested_queries(response: &Value, original: &str, mode: SuggestionMode) -> Vec<String> {
        let candidates = parse_candidates(response);
        suggest(original, &candidates, mode).into_iter().collect()
    }
}

fn parse_candidates(response: &Value) -> Vec<SpellingCandidate> {
    response["suggest"]["spelling_suggestions"][0]["options"]
        .as_array()
        .map(|options| {
            options
                .iter()
                .filter_map(|option| {
                    let text = option["text"].as_str()?;
                    Some(SpellingCandidate {
                        text: text.to_string(),
                        score: option["score"].as_f64().unwrap_or(0.0),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
