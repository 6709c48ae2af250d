//! Collection schemas and the combined, query-facing merge of them.

pub mod combined;
pub mod fields;

pub use combined::CombinedSchema;
pub use fields::{CollectionSchema, ExpansionEntry, FieldDefinition, FieldType};
