use std::sync::Arc;

use serde_json::json;

use trawl_core::config::SearchConfig;
use trawl_core::document::Document;
use trawl_core::error::Result;
use trawl_core::traits::DocumentSource;
use trawl_presenters::ResultPresenter;
use trawl_registry::Registries;

struct ScriptedSource;

impl DocumentSource for ScriptedSource {
    fn documents_by_format(&self, format: &str, _fields: &[String]) -> Result<Vec<Document>> {
        if format == "organisation" {
            let document = serde_json::from_value(json!({
                "slug": "hm-revenue-customs",
                "content_id": "6667cce2-e809-4e21-ae09-cb0bdc1ddda3",
                "title": "HM Revenue & Customs",
                "acronym": "HMRC",
            }))
            .expect("document");
            Ok(vec![document])
        } else {
            Ok(Vec::new())
        }
    }
}

fn registries() -> Registries {
    let source: Arc<dyn DocumentSource> = Arc::new(ScriptedSource);
    Registries::build(&source, &SearchConfig::default())
}

#[test]
fn reference_fields_expand_and_unknown_slugs_keep_their_shape() {
    let response = json!({
        "hits": {
            "total": 1,
            "hits": [{
                "_id": "/vat-rates",
                "fields": {
                    "title": "VAT rates",
                    "format": "guide",
                    "organisations": ["hm-revenue-customs", "typo-org"],
                },
            }],
        },
    });

    let results = ResultPresenter::present(&response, &registries()).expect("results");
    assert_eq!(results.len(), 1);
    let document = &results[0];

    assert_eq!(document.get("title"), Some(&json!("VAT rates")));
    assert_eq!(document.get("format"), Some(&json!("guide")));

    let organisations = document
        .get("organisations")
        .and_then(|v| v.as_array())
        .expect("organisations array");
    assert_eq!(organisations.len(), 2);
    assert_eq!(organisations[0]["title"], "HM Revenue & Customs");
    assert_eq!(organisations[0]["acronym"], "HMRC");
    assert_eq!(organisations[1], json!({ "slug": "typo-org" }));
}

#[test]
fn a_scalar_reference_field_expands_to_a_single_object() {
    let response = json!({
        "hits": {
            "hits": [{
                "fields": { "organisations": "hm-revenue-customs" },
            }],
        },
    });

    let results = ResultPresenter::present(&response, &registries()).expect("results");
    let expanded = results[0].get("organisations").expect("organisations");
    assert_eq!(expanded["slug"], "hm-revenue-customs");
    assert_eq!(expanded["title"], "HM Revenue & Customs");
}

#[test]
fn explanations_ride_along_only_when_present() {
    let response = json!({
        "hits": {
            "hits": [
                {
                    "fields": { "title": "With explain" },
                    "_explanation": { "value": 1.5, "description": "weight(title:tax)" },
                },
                {
                    "fields": { "title": "Without" },
                },
            ],
        },
    });

    let results = ResultPresenter::present(&response, &registries()).expect("results");
    assert_eq!(
        results[0].get("_explanation"),
        Some(&json!({ "value": 1.5, "description": "weight(title:tax)" }))
    );
    assert_eq!(results[1].get("_explanation"), None);
}

#[test]
fn a_response_without_hits_presents_nothing() {
    let empty = ResultPresenter::present(&json!({}), &registries()).expect("results");
    assert!(empty.is_empty());
}
