use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use trawl_core::config::SpellingConfig;
use trawl_core::document::Document;
use trawl_core::error::Result;
use trawl_core::traits::DocumentSource;
use trawl_presenters::{
    suggest, CorrectionBlocklist, SpellCheckPresenter, SpellingCandidate, SuggestionMode,
};
use trawl_registry::EntityRegistry;

fn candidate(text: &str, score: f64) -> SpellingCandidate {
    SpellingCandidate {
        text: text.to_string(),
        score,
    }
}

#[test]
fn best_mode_prefers_the_closest_candidate_over_the_backend_favourite() {
    let candidates = vec![candidate("mitten", 0.5), candidate("sitting", 0.9)];
    assert_eq!(
        suggest("kitten", &candidates, SuggestionMode::Best),
        Some("mitten".to_string())
    );
    assert_eq!(
        suggest("kitten", &candidates, SuggestionMode::Naive),
        Some("sitting".to_string())
    );
}

#[test]
fn a_single_candidate_wins_whatever_the_mode() {
    let candidates = vec![candidate("zzzzzz", 0.01)];
    assert_eq!(
        suggest("kitten", &candidates, SuggestionMode::Best),
        Some("zzzzzz".to_string())
    );
    assert_eq!(
        suggest("kitten", &candidates, SuggestionMode::Naive),
        Some("zzzzzz".to_string())
    );
}

#[test]
fn no_candidates_means_no_suggestion() {
    assert_eq!(suggest("kitten", &[], SuggestionMode::Best), None);
    assert_eq!(suggest("kitten", &[], SuggestionMode::Naive), None);
}

#[test]
fn equal_distances_fall_back_to_score_then_first_seen() {
    // "bitten" and "mitten" are both one substitution away
    let by_score = vec![candidate("bitten", 0.2), candidate("mitten", 0.7)];
    assert_eq!(
        suggest("kitten", &by_score, SuggestionMode::Best),
        Some("mitten".to_string())
    );

    let dead_heat = vec![candidate("bitten", 0.5), candidate("mitten", 0.5)];
    assert_eq!(
        suggest("kitten", &dead_heat, SuggestionMode::Best),
        Some("bitten".to_string())
    );
}

#[test]
fn an_adjacent_transposition_counts_as_one_edit() {
    // "abcd" is a single swapped pair away from "abdc"; the two appended
    // characters on the other candidate cost two, so score cannot save it
    let candidates = vec![candidate("abdcxy", 0.9), candidate("abcd", 0.1)];
    assert_eq!(
        suggest("abdc", &candidates, SuggestionMode::Best),
        Some("abcd".to_string())
    );
}

#[test]
fn presenter_reads_the_first_suggestion_group() {
    let response = json!({
        "suggest": {
            "spelling_suggestions": [{
                "text": "chickin",
                "options": [
                    { "text": "chicken", "score": 0.6 },
                    { "text": "checking", "score": 0.8 },
                ],
            }],
        },
    });

    assert_eq!(
        SpellCheckPresenter::suggested_queries(&response, "chickin", SuggestionMode::Best),
        vec!["chicken".to_string()]
    );
    assert_eq!(
        SpellCheckPresenter::suggested_queries(&response, "chickin", SuggestionMode::Naive),
        vec!["checking".to_string()]
    );
}

#[test]
fn a_response_without_suggestions_yields_nothing() {
    let response = json!({ "hits": { "total": 0, "hits": [] } });
    assert!(
        SpellCheckPresenter::suggested_queries(&response, "chickin", SuggestionMode::Best)
            .is_empty()
    );
}

struct OrganisationSource {
    documents: Vec<Document>,
}

impl DocumentSource for OrganisationSource {
    fn documents_by_format(&self, format: &str, _fields: &[String]) -> Result<Vec<Document>> {
        assert_eq!(format, "organisation");
        Ok(self.documents.clone())
    }
}

fn organisations() -> EntityRegistry {
    let documents = vec![serde_json::from_value(json!({
        "slug": "hm-revenue-customs",
        "content_id": "6667cce2-e809-4e21-ae09-cb0bdc1ddda3",
        "title": "HM Revenue & Customs",
        "acronym": "HMRC",
    }))
    .expect("document")];
    let source: Arc<dyn DocumentSource> = Arc::new(OrganisationSource { documents });
    EntityRegistry::new(source, "organisation", &["acronym"], Duration::from_secs(60))
}

#[test]
fn blocklist_refuses_digits_ignore_words_and_organisation_names() {
    let config = SpellingConfig {
        ignore: vec!["nhs".to_string()],
    };
    let blocklist =
        CorrectionBlocklist::build(&config, &organisations()).expect("blocklist");

    assert!(blocklist.should_correct("tax form"));
    assert!(!blocklist.should_correct("form 1040"), "digits");
    assert!(!blocklist.should_correct("NHS discharge"), "ignore word");
    assert!(!blocklist.should_correct("hmrc login"), "acronym");
    assert!(!blocklist.should_correct("revenue reports"), "title word");
}
