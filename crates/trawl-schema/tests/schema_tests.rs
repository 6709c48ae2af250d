use trawl_core::error::Error;
use trawl_schema::{CollectionSchema, CombinedSchema, ExpansionEntry, FieldDefinition, FieldType};

fn content_schema() -> CollectionSchema {
    CollectionSchema::new(
        "content",
        vec![
            FieldDefinition::new("title", FieldType::SearchableSortableText),
            FieldDefinition::new("description", FieldType::SearchableText),
            FieldDefinition::new("format", FieldType::Identifier).filterable(),
            FieldDefinition::new("organisations", FieldType::Identifier)
                .filterable()
                .with_expansion(vec![
                    ExpansionEntry::new("hmrc", "HM Revenue & Customs"),
                    ExpansionEntry::new("dfe", "Department for Education"),
                ]),
        ],
    )
}

fn government_schema() -> CollectionSchema {
    CollectionSchema::new(
        "government",
        vec![
            FieldDefinition::new("title", FieldType::SearchableSortableText),
            FieldDefinition::new("public_timestamp", FieldType::Date).filterable(),
            FieldDefinition::new("organisations", FieldType::Identifier).with_expansion(vec![
                ExpansionEntry::new("mod", "Ministry of Defence"),
                ExpansionEntry::new("dfe", "Department for Education (DfE)"),
            ]),
        ],
    )
}

#[test]
fn build_merges_field_definitions_across_collections() {
    let schema = CombinedSchema::build(&[content_schema(), government_schema()]).expect("build");

    let names: Vec<&String> = schema.field_definitions().keys().collect();
    assert_eq!(
        names,
        vec![
            "description",
            "format",
            "organisations",
            "public_timestamp",
            "title"
        ]
    );
    assert_eq!(
        schema.field("title").expect("title").field_type,
        FieldType::SearchableSortableText
    );
}

#[test]
fn expansion_union_keeps_first_seen_value_order() {
    let schema = CombinedSchema::build(&[content_schema(), government_schema()]).expect("build");

    let values: Vec<&str> = schema
        .field("organisations")
        .expect("organisations")
        .expansion
        .iter()
        .map(|e| e.value.as_str())
        .collect();
    assert_eq!(values, vec!["hmrc", "dfe", "mod"]);
}

#[test]
fn duplicate_expansion_value_takes_the_last_merged_label() {
    // Label conflicts resolve by merge order: the collection merged last
    // wins. Load order is therefore part of the observable behavior.
    let schema = CombinedSchema::build(&[content_schema(), government_schema()]).expect("build");

    let dfe = schema
        .field("organisations")
        .expect("organisations")
        .expansion
        .iter()
        .find(|e| e.value == "dfe")
        .expect("dfe entry");
    assert_eq!(dfe.label, "Department for Education (DfE)");

    let reversed =
        CombinedSchema::build(&[government_schema(), content_schema()]).expect("build");
    let dfe = reversed
        .field("organisations")
        .expect("organisations")
        .expansion
        .iter()
        .find(|e| e.value == "dfe")
        .expect("dfe entry");
    assert_eq!(dfe.label, "Department for Education");
}

#[test]
fn conflicting_field_types_fail_the_build() {
    let conflicting = CollectionSchema::new(
        "news",
        vec![FieldDefinition::new("format", FieldType::Date)],
    );

    let err = CombinedSchema::build(&[content_schema(), conflicting]).unwrap_err();
    match err {
        Error::InvalidConfig(message) => {
            assert!(message.contains("format"), "names the field: {message}");
            assert!(message.contains("identifier"), "names the first type: {message}");
            assert!(message.contains("date"), "names the second type: {message}");
            assert!(message.contains("news"), "names the collection: {message}");
        }
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn filterable_is_or_merged_and_drives_allowed_filter_fields() {
    let schema = CombinedSchema::build(&[content_schema(), government_schema()]).expect("build");

    // organisations is filterable in content but not in government
    assert!(schema.is_filterable("organisations"));
    assert!(schema.is_filterable("format"));
    assert!(schema.is_filterable("public_timestamp"));
    assert!(!schema.is_filterable("title"));

    let allowed: Vec<&String> = schema.allowed_filter_fields().iter().collect();
    assert_eq!(allowed, vec!["format", "organisations", "public_timestamp"]);
}
