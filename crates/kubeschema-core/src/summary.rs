//! Summaries of parsed schema text and registry contents

use serde::Serialize;

use crate::classify::ParsedSchemaText;
use crate::registry::{OpenApiEntry, SchemaRegistry};
use crate::source::CrdDefinition;

/// Short description of parsed schema text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSummary {
    #[serde(rename = "hasOpenAPI")]
    pub has_openapi: bool,
    /// `openapi`/`swagger` field of the kept OpenAPI document, or "unknown"
    pub openapi_version: Option<String>,
    pub crd_count: usize,
}

/// Summarize parse/classification output
pub fn summarize(parsed: &ParsedSchemaText) -> SchemaSummary {
    let openapi_version = parsed.openapi().map(|doc| {
        ["openapi", "swagger"]
            .iter()
            .find_map(|key| doc.get(*key).and_then(|v| v.as_str()))
            .unwrap_or("unknown")
            .to_string()
    });

    SchemaSummary {
        has_openapi: openapi_version.is_some(),
        openapi_version,
        crd_count: parsed.crds.len(),
    }
}

/// One row of a CRD listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrdRow {
    pub name: String,
    pub group: String,
    pub kind: String,
    pub scope: String,
    pub plural: String,
    pub singular: String,
    pub versions: Vec<String>,
}

impl From<&CrdDefinition> for CrdRow {
    fn from(crd: &CrdDefinition) -> Self {
        let or_dash = |s: Option<&String>| s.cloned().unwrap_or_else(|| "-".to_string());
        Self {
            name: or_dash(crd.name.as_ref()),
            group: if crd.group.is_empty() { "-".to_string() } else { crd.group.clone() },
            kind: crd.kind.clone(),
            scope: crd.scope.to_string(),
            plural: or_dash(crd.plural.as_ref()),
            singular: or_dash(crd.singular.as_ref()),
            versions: crd.versions.iter().map(|v| v.name.clone()).collect(),
        }
    }
}

/// One row of an OpenAPI listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApiRow {
    pub title: String,
    pub cluster: String,
    pub version: String,
    /// `info.version` of the document
    pub api_version: String,
    /// `openapi` or `swagger` field
    pub openapi_version: String,
    pub paths: usize,
    pub components: usize,
    pub schemas: usize,
    pub source: String,
    /// RFC 3339 load time
    pub loaded_at: String,
}

impl From<&OpenApiEntry> for OpenApiRow {
    fn from(entry: &OpenApiEntry) -> Self {
        let or_unknown = |s: Option<&str>| s.unwrap_or("(unknown)").to_string();
        let or_none = |s: &str| if s.is_empty() { "(none)".to_string() } else { s.to_string() };
        let spec = &entry.spec;
        let meta = &entry.meta;

        Self {
            title: spec.title().unwrap_or("OpenAPI Spec").to_string(),
            cluster: or_none(&meta.cluster),
            version: or_none(&meta.version),
            api_version: or_unknown(spec.info_version()),
            openapi_version: or_unknown(spec.spec_version.as_deref()),
            paths: spec.path_count(),
            components: spec.component_count(),
            schemas: spec.schemas.len(),
            source: if meta.source.is_empty() { "(unknown)".to_string() } else { meta.source.clone() },
            loaded_at: meta
                .loaded_at_utc()
                .filter(|_| meta.loaded_at > 0)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "(unknown)".to_string()),
        }
    }
}

/// Counts over a registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySummary {
    pub crd_count: usize,
    pub openapi_count: usize,
    /// Total versions across all CRDs
    pub crd_versions: usize,
    /// Total named schemas across all OpenAPI documents
    pub openapi_schemas: usize,
}

impl From<&SchemaRegistry> for RegistrySummary {
    fn from(registry: &SchemaRegistry) -> Self {
        Self {
            crd_count: registry.crds().len(),
            openapi_count: registry.openapis().len(),
            crd_versions: registry.crds().iter().map(|c| c.versions.len()).sum(),
            openapi_schemas: registry.openapis().iter().map(|e| e.spec.schemas.len()).sum(),
        }
    }
}
