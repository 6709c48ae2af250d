//! TTL-cached registries of entity documents, indexed by slug and content
//! id, used to expand reference fields at presentation time.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use trawl_core::config::SearchConfig;
use trawl_core::document::Document;
use trawl_core::error::Result;
use trawl_core::traits::DocumentSource;

pub mod timed_cache;

pub use timed_cache::TimedCache;

/// Fields every registry projects; individual registries add extras.
const BASE_PROJECTION: [&str; 4] = ["slug", "link", "title", "content_id"];

struct RegistryData {
    by_slug: HashMap<String, Document>,
    by_content_id: HashMap<String, Document>,
}

/// One kind of entity, lazily loaded and cached wholesale.
pub struct EntityRegistry {
    kind: String,
    projection: Vec<String>,
    source: Arc<dyn DocumentSource>,
    cache: TimedCache<RegistryData>,
}

impl EntityRegistry {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        kind: &str,
        extra_fields: &[&str],
        ttl: Duration,
    ) -> Self {
        let mut projection: Vec<String> =
            BASE_PROJECTION.iter().map(|f| (*f).to_string()).collect();
        projection.extend(extra_fields.iter().map(|f| (*f).to_string()));
        EntityRegistry {
            kind: kind.to_string(),
            projection,
            source,
            cache: TimedCache::new(ttl),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The entity document for a slug, projected to the registry's field
    /// set. `None` for slugs the backend does not know.
    pub fn get(&self, slug: &str) -> Result<Option<Document>> {
        Ok(self.data()?.by_slug.get(slug).cloned())
    }

    pub fn by_content_id(&self, content_id: &str) -> Result<Option<Document>> {
        Ok(self.data()?.by_content_id.get(content_id).cloned())
    }

    pub fn all(&self) -> Result<Vec<Document>> {
        Ok(self.data()?.by_slug.values().cloned().collect())
    }

    fn data(&self) -> Result<Arc<RegistryData>> {
        self.cache.get(|| self.fetch())
    }

    // One fetch materialises the set; both indexes come from that pass.
    fn fetch(&self) -> Result<RegistryData> {
        debug!(kind = self.kind.as_str(), "populating registry");
        let documents = self
            .source
            .documents_by_format(&self.kind, &self.projection)?;
        let mut by_slug = HashMap::with_capacity(documents.len());
        let mut by_content_id = HashMap::new();
        for document in documents {
            if let Some(content_id) = document.content_id() {
                by_content_id.insert(content_id.to_string(), document.clone());
            }
            if let Some(slug) = document.slug() {
                by_slug.insert(slug.to_string(), document);
            }
        }
        info!(
            kind = self.kind.as_str(),
            entries = by_slug.len(),
            "registry populated"
        );
        Ok(RegistryData {
            by_slug,
            by_content_id,
        })
    }
}

/// The serving set of registries, keyed by the result field they expand.
pub struct Registries {
    organisations: Arc<EntityRegistry>,
    entries: BTreeMap<String, Arc<EntityRegistry>>,
}

impl Registries {
    pub fn build(source: &Arc<dyn DocumentSource>, config: &SearchConfig) -> Self {
        let ttl = Duration::from_secs(config.registry_cache_ttl_seconds);
        let organisations = Arc::new(EntityRegistry::new(
            Arc::clone(source),
            "organisation",
            &["acronym", "organisation_type", "organisation_state"],
            ttl,
        ));

        let mut entries: BTreeMap<String, Arc<EntityRegistry>> = BTreeMap::new();
        entries.insert("organisations".to_string(), Arc::clone(&organisations));
        let mut add = |field: &str, kind: &str| {
            entries.insert(
                field.to_string(),
                Arc::new(EntityRegistry::new(Arc::clone(source), kind, &[], ttl)),
            );
        };
        add("topics", "topic");
        // Policy areas still live in the backend under the topic format.
        add("policy_areas", "topic");
        add("document_series", "document_series");
        add("document_collections", "document_collection");
        add("world_locations", "world_location");
        add("people", "person");

        Registries {
            organisations,
            entries,
        }
    }

    /// The registry expanding values of the given result field, if any.
    pub fn for_field(&self, field: &str) -> Option<&EntityRegistry> {
        self.entries.get(field).map(Arc::as_ref)
    }

    pub fn organisations(&self) -> &EntityRegistry {
        &self.organisations
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityRegistry)> {
        self.entries
            .iter()
            .map(|(field, registry)| (field.as_str(), registry.as_ref()))
    }
}
