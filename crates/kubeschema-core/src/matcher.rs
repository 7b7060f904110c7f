//! Resource to schema matching
//!
//! Given a resource and the registry, find the one schema fragment to
//! validate it against. CRDs are consulted first, then OpenAPI documents.
//! The first satisfying candidate wins; there is no ranking.
//!
//! OpenAPI schema names follow no guaranteed convention, so an OpenAPI
//! document is searched with a ladder of heuristics:
//!
//! 1. dictionary key equal to the kind (direct lookup)
//! 2. key equal to the kind, or ending in `.<kind>` (this includes keys
//!    ending in `.<apiVersion>.<kind>`)
//! 3. schema `title` equal to the kind
//! 4. an `x-kubernetes-group-version-kind` entry for the resource's GVK
//!
//! Rules 2-4 are tried together for each entry, in dictionary order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::{OpenApiEntry, SchemaRegistry};
use crate::resolver::{LocalRefResolver, RefContext, RefResolver};
use crate::resource::ResourceDocument;
use crate::source::CrdDefinition;

/// Extension carrying the GVKs an OpenAPI schema describes
pub const GVK_EXTENSION: &str = "x-kubernetes-group-version-kind";

/// Which kind of source produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedBy {
    Crd,
    #[serde(rename = "openapi")]
    OpenApi,
    None,
}

impl std::fmt::Display for MatchedBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Crd => write!(f, "crd"),
            Self::OpenApi => write!(f, "openapi"),
            Self::None => write!(f, "none"),
        }
    }
}

/// The OpenAPI heuristic that selected a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenApiRule {
    /// Dictionary key equals the kind
    DirectKey,
    /// Key equals the kind or ends with `.<kind>`
    ///
    /// Covers keys ending in `.<apiVersion>.<kind>` as well.
    NameSuffix,
    /// Schema title equals the kind
    Title,
    /// `x-kubernetes-group-version-kind` lists the resource's GVK
    GroupVersionKind,
}

impl std::fmt::Display for OpenApiRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectKey => write!(f, "direct key"),
            Self::NameSuffix => write!(f, "name suffix"),
            Self::Title => write!(f, "title"),
            Self::GroupVersionKind => write!(f, "{}", GVK_EXTENSION),
        }
    }
}

/// A schema selected for a resource
#[derive(Debug, Clone, Copy)]
pub enum SchemaMatch<'r> {
    Crd {
        crd: &'r CrdDefinition,
        version: &'r str,
        schema: &'r Value,
    },
    OpenApi {
        entry: &'r OpenApiEntry,
        name: &'r str,
        rule: OpenApiRule,
        schema: &'r Value,
    },
}

impl<'r> SchemaMatch<'r> {
    /// The structural schema to validate against
    pub fn schema(&self) -> &'r Value {
        match *self {
            Self::Crd { schema, .. } | Self::OpenApi { schema, .. } => schema,
        }
    }

    pub fn matched_by(&self) -> MatchedBy {
        match self {
            Self::Crd { .. } => MatchedBy::Crd,
            Self::OpenApi { .. } => MatchedBy::OpenApi,
        }
    }

    /// Human-readable name of the matched schema
    pub fn describe(&self) -> String {
        match self {
            Self::Crd { crd, version, .. } => format!("{} ({})", crd.display_name(), version),
            Self::OpenApi { name, rule, .. } => format!("{} (by {})", name, rule),
        }
    }
}

/// Find the CRD schema for a resource
///
/// Kind and group must be equal and a version entry must carry the
/// resource's version name. Versions without a schema, and CRDs without a
/// kind, are skipped.
pub fn match_crd<'r>(
    resource: &ResourceDocument<'_>,
    crds: &'r [CrdDefinition],
) -> Option<SchemaMatch<'r>> {
    crds.iter()
        .filter(|crd| !crd.kind.is_empty())
        .filter(|crd| crd.kind == resource.kind && crd.group == resource.group)
        .find_map(|crd| {
            crd.versions
                .iter()
                .filter(|v| !v.name.is_empty() && v.name == resource.version)
                .find_map(|v| {
                    v.schema.as_ref().map(|schema| SchemaMatch::Crd {
                        crd,
                        version: &v.name,
                        schema,
                    })
                })
        })
}

/// Find an OpenAPI schema for a resource
pub fn match_openapi<'r>(
    resource: &ResourceDocument<'_>,
    entries: &'r [OpenApiEntry],
    resolver: &'r dyn RefResolver,
) -> Option<SchemaMatch<'r>> {
    entries
        .iter()
        .find_map(|entry| match_openapi_entry(resource, entry, resolver))
}

/// Run the heuristic ladder against one OpenAPI document
fn match_openapi_entry<'r>(
    resource: &ResourceDocument<'_>,
    entry: &'r OpenApiEntry,
    resolver: &'r dyn RefResolver,
) -> Option<SchemaMatch<'r>> {
    let refs = RefContext::new(resolver, entry.spec.raw());
    let kind = resource.kind;
    let found = |name: &'r String, rule: OpenApiRule, schema: &'r Value| {
        tracing::trace!(name = %name, rule = %rule, "OpenAPI schema matched");
        SchemaMatch::OpenApi {
            entry,
            name,
            rule,
            schema,
        }
    };

    if let Some((name, schema)) = entry.spec.schemas.get_key_value(kind) {
        return Some(found(name, OpenApiRule::DirectKey, refs.resolve(schema)));
    }

    let dotted_kind = format!(".{}", kind);

    entry.spec.schemas.iter().find_map(|(name, raw)| {
        let schema = refs.resolve(raw);

        let rule = if name == kind || name.ends_with(&dotted_kind) {
            OpenApiRule::NameSuffix
        } else if schema.get("title").and_then(Value::as_str) == Some(kind) {
            OpenApiRule::Title
        } else if gvk_matches(schema, resource) {
            OpenApiRule::GroupVersionKind
        } else {
            return None;
        };

        Some(found(name, rule, schema))
    })
}

/// Check the `x-kubernetes-group-version-kind` extension
///
/// The extension may be a single object or a list. Entries without a kind
/// are ignored; an empty group or version acts as a wildcard.
fn gvk_matches(schema: &Value, resource: &ResourceDocument<'_>) -> bool {
    let Some(extension) = schema.get(GVK_EXTENSION) else {
        return false;
    };
    let entries = match extension {
        Value::Array(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };

    entries.iter().any(|gvk| {
        let field = |key: &str| gvk.get(key).and_then(Value::as_str).unwrap_or_default();
        let (kind, group, version) = (field("kind"), field("group"), field("version"));

        !kind.is_empty()
            && kind == resource.kind
            && (group.is_empty() || group == resource.group)
            && (version.is_empty() || version == resource.version)
    })
}

/// Matches resources against a registry
///
/// Borrowing the registry ties every match to it; the matcher never mutates it.
pub struct ResourceMatcher<'r> {
    registry: &'r SchemaRegistry,
    resolver: &'r dyn RefResolver,
}

impl<'r> ResourceMatcher<'r> {
    /// Matcher using local `$ref` resolution
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            resolver: &LocalRefResolver,
        }
    }

    /// Matcher with a custom `$ref` resolver
    pub fn with_resolver(registry: &'r SchemaRegistry, resolver: &'r dyn RefResolver) -> Self {
        Self { registry, resolver }
    }

    /// Find the schema for a resource, CRDs first
    pub fn find(&self, resource: &ResourceDocument<'_>) -> Option<SchemaMatch<'r>> {
        let found = match_crd(resource, self.registry.crds())
            .or_else(|| match_openapi(resource, self.registry.openapis(), self.resolver));

        match &found {
            Some(m) => tracing::debug!(
                kind = resource.kind,
                api_version = resource.api_version,
                schema = %m.describe(),
                "matched resource"
            ),
            None => tracing::debug!(
                kind = resource.kind,
                api_version = resource.api_version,
                "no schema matched"
            ),
        }
        found
    }

    /// `$ref` context for validating a match
    pub fn refs_for(&self, found: &SchemaMatch<'r>) -> RefContext<'r> {
        match *found {
            SchemaMatch::Crd { .. } => RefContext::none(),
            SchemaMatch::OpenApi { entry, .. } => RefContext::new(self.resolver, entry.spec.raw()),
        }
    }
}
