//! Cluster schema registry
//!
//! Holds the CRDs and OpenAPI documents that resources are matched against.
//! The registry is a plain value: whoever owns it decides how it is stored
//! and must serialize loads against in-flight matching.
//!
//! Load semantics:
//! - [`SchemaRegistry::load_crds`] replaces the whole CRD list (no merge)
//! - [`SchemaRegistry::load_openapis`] upserts by `(cluster, version)`: every
//!   prior entry for the pair is removed, then the new documents are appended
//!
//! The serialized form is the collaborator shape
//! `{ crds: [...], openapis: [{ spec, meta }] }` with raw documents inside.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::source::{CrdDefinition, OpenApiDefinition};

/// Provenance of a loaded OpenAPI document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApiMeta {
    /// Cluster the document was taken from
    #[serde(default)]
    pub cluster: String,
    /// Cluster version label
    #[serde(default)]
    pub version: String,
    /// Where the document came from (file name, URL, "paste")
    #[serde(default)]
    pub source: String,
    /// Load time in epoch milliseconds
    #[serde(default)]
    pub loaded_at: i64,
}

impl OpenApiMeta {
    /// Metadata stamped with the current time
    pub fn new(
        cluster: impl Into<String>,
        version: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            cluster: cluster.into(),
            version: version.into(),
            source: source.into(),
            loaded_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Whether two entries describe the same `(cluster, version)` pair
    pub fn same_key(&self, other: &Self) -> bool {
        self.cluster == other.cluster && self.version == other.version
    }

    /// Load time as a UTC timestamp
    pub fn loaded_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_millis(self.loaded_at)
    }
}

/// A loaded OpenAPI document and its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiEntry {
    pub spec: OpenApiDefinition,
    #[serde(default)]
    pub meta: OpenApiMeta,
}

/// All schema sources known for validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaRegistry {
    #[serde(default)]
    crds: Vec<CrdDefinition>,
    #[serde(default)]
    openapis: Vec<OpenApiEntry>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire CRD collection
    pub fn load_crds<I>(&mut self, crds: I)
    where
        I: IntoIterator<Item = Value>,
    {
        self.crds = crds.into_iter().map(CrdDefinition::from_value).collect();
        for crd in self.crds.iter().filter(|c| c.kind.is_empty()) {
            tracing::warn!(name = %crd.display_name(), "CRD has no spec.names.kind and will never match");
        }
        tracing::debug!(count = self.crds.len(), "loaded CRD set");
    }

    /// Add an OpenAPI document, replacing any entry for the same `(cluster, version)`
    pub fn load_openapi(&mut self, spec: Value, meta: OpenApiMeta) {
        self.load_openapis([spec], meta);
    }

    /// Add a batch of OpenAPI documents sharing one `(cluster, version)`
    ///
    /// Entries already stored for that pair are replaced by the whole batch.
    pub fn load_openapis<I>(&mut self, specs: I, meta: OpenApiMeta)
    where
        I: IntoIterator<Item = Value>,
    {
        let before = self.openapis.len();
        self.openapis.retain(|entry| !entry.meta.same_key(&meta));
        if self.openapis.len() != before {
            tracing::debug!(
                cluster = %meta.cluster,
                version = %meta.version,
                replaced = before - self.openapis.len(),
                "replacing existing OpenAPI entries"
            );
        }
        self.openapis.extend(specs.into_iter().map(|spec| OpenApiEntry {
            spec: OpenApiDefinition::from_value(spec),
            meta: meta.clone(),
        }));
    }

    /// Loaded CRDs in load order
    pub fn crds(&self) -> &[CrdDefinition] {
        &self.crds
    }

    /// Loaded OpenAPI entries in load order
    pub fn openapis(&self) -> &[OpenApiEntry] {
        &self.openapis
    }

    /// Remove a CRD by position
    pub fn remove_crd(&mut self, index: usize) -> Option<CrdDefinition> {
        (index < self.crds.len()).then(|| self.crds.remove(index))
    }

    /// Remove an OpenAPI entry by position
    pub fn remove_openapi(&mut self, index: usize) -> Option<OpenApiEntry> {
        (index < self.openapis.len()).then(|| self.openapis.remove(index))
    }

    /// Whether nothing has been loaded
    pub fn is_empty(&self) -> bool {
        self.crds.is_empty() && self.openapis.is_empty()
    }
}
