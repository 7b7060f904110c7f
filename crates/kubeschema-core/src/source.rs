//! Canonical schema source shapes
//!
//! CRDs and OpenAPI documents arrive in several dialects: multi-version
//! CRDs (`spec.versions[]`), legacy single-version CRDs (`spec.version` +
//! `spec.validation.openAPIV3Schema`), OpenAPI v3 (`components.schemas`) and
//! Swagger/OpenAPI v2 (`definitions`). Everything is normalized here once, at
//! ingestion, so matching never has to branch on the dialect.
//!
//! Normalization never fails. Missing or malformed pieces become empty
//! strings or absent schemas, and such sources simply never match.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// CRD scope - whether resources are namespaced or cluster-wide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CrdScope {
    #[default]
    Namespaced,
    Cluster,
}

impl std::fmt::Display for CrdScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Namespaced => write!(f, "Namespaced"),
            Self::Cluster => write!(f, "Cluster"),
        }
    }
}

/// A single served version of a CRD and its structural schema
#[derive(Debug, Clone, PartialEq)]
pub struct CrdVersion {
    /// Version name (e.g., "v1", "v1beta1")
    pub name: String,
    /// OpenAPI v3 structural schema, if the version declares one
    pub schema: Option<Value>,
}

/// A CustomResourceDefinition reduced to what matching needs
///
/// The raw manifest is kept so the registry can be written back out in the
/// shape it was loaded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct CrdDefinition {
    /// Full CRD name from `metadata.name` (e.g., "certificates.cert-manager.io")
    pub name: Option<String>,
    /// API group (e.g., "cert-manager.io")
    pub group: String,
    /// Kind from `spec.names.kind`
    pub kind: String,
    /// Resource scope
    pub scope: CrdScope,
    /// Plural resource name
    pub plural: Option<String>,
    /// Singular resource name
    pub singular: Option<String>,
    /// Versions in declaration order
    pub versions: Vec<CrdVersion>,
    raw: Value,
}

impl CrdDefinition {
    /// Normalize a raw CRD manifest
    pub fn from_value(value: Value) -> Self {
        let spec = value.get("spec");
        let spec_str = |key: &str| spec.and_then(|s| s.get(key)).and_then(Value::as_str);
        let names = spec.and_then(|s| s.get("names"));
        let name_str = |key: &str| {
            names
                .and_then(|n| n.get(key))
                .and_then(Value::as_str)
                .map(String::from)
        };

        let scope = match spec_str("scope") {
            Some("Cluster") => CrdScope::Cluster,
            _ => CrdScope::Namespaced,
        };

        Self {
            name: value
                .get("metadata")
                .and_then(|m| m.get("name"))
                .and_then(Value::as_str)
                .map(String::from),
            group: spec_str("group").unwrap_or_default().to_string(),
            kind: name_str("kind").unwrap_or_default(),
            scope,
            plural: name_str("plural"),
            singular: name_str("singular"),
            versions: spec.map(Self::parse_versions).unwrap_or_default(),
            raw: value,
        }
    }

    /// Collect versions from either the multi-version or the legacy layout
    fn parse_versions(spec: &Value) -> Vec<CrdVersion> {
        let legacy_schema = spec
            .get("validation")
            .and_then(|v| v.get("openAPIV3Schema"))
            .cloned();

        if let Some(versions) = spec.get("versions").and_then(Value::as_array) {
            return versions
                .iter()
                .map(|v| Self::parse_version(v, legacy_schema.as_ref()))
                .collect();
        }

        match spec.get("version").and_then(Value::as_str) {
            Some(name) => vec![CrdVersion {
                name: name.to_string(),
                schema: legacy_schema,
            }],
            None => Vec::new(),
        }
    }

    /// Parse one `spec.versions[]` entry
    ///
    /// The schema is read from `schema.openAPIV3Schema`; a `schema` object
    /// without that key is taken as the schema itself; a version with no
    /// `schema` at all falls back to the top-level `spec.validation` schema.
    fn parse_version(version: &Value, legacy_schema: Option<&Value>) -> CrdVersion {
        let name = version
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let schema = match version.get("schema").filter(|s| s.is_object()) {
            Some(schema) => Some(schema.get("openAPIV3Schema").unwrap_or(schema).clone()),
            None => legacy_schema.cloned(),
        };

        CrdVersion { name, schema }
    }

    /// The manifest this definition was normalized from
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Display name, falling back to `<plural>.<group>`
    pub fn display_name(&self) -> String {
        match (&self.name, &self.plural) {
            (Some(name), _) => name.clone(),
            (None, Some(plural)) => format!("{}.{}", plural, self.group),
            (None, None) => self.kind.clone(),
        }
    }
}

impl From<Value> for CrdDefinition {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl From<CrdDefinition> for Value {
    fn from(crd: CrdDefinition) -> Self {
        crd.raw
    }
}

/// OpenAPI dialect of a source document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenApiDialect {
    /// OpenAPI 3.x with `components.schemas`
    V3,
    /// Swagger / OpenAPI 2.0 with `definitions`
    V2,
    /// Neither version field present
    Unknown,
}

/// An OpenAPI or Swagger document with its schema dictionary extracted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct OpenApiDefinition {
    pub dialect: OpenApiDialect,
    /// Value of the `openapi` or `swagger` field
    pub spec_version: Option<String>,
    /// Schema name to schema fragment, in document order
    pub schemas: Map<String, Value>,
    raw: Value,
}

impl OpenApiDefinition {
    /// Normalize a raw OpenAPI document
    pub fn from_value(value: Value) -> Self {
        let field = |key: &str| value.get(key).and_then(Value::as_str).map(String::from);
        let (dialect, spec_version) = match (field("openapi"), field("swagger")) {
            (Some(v), _) => (OpenApiDialect::V3, Some(v)),
            (None, Some(v)) => (OpenApiDialect::V2, Some(v)),
            (None, None) => (OpenApiDialect::Unknown, None),
        };

        Self {
            dialect,
            spec_version,
            schemas: Self::schema_dictionary(&value),
            raw: value,
        }
    }

    /// Build the name -> schema dictionary
    ///
    /// `components` wins over `definitions`. Inside the chosen container a
    /// `schemas` (or nested `definitions`) map is preferred; otherwise the
    /// container itself is the dictionary, which is the Swagger layout.
    fn schema_dictionary(value: &Value) -> Map<String, Value> {
        let container = value
            .get("components")
            .filter(|c| is_truthy(c))
            .or_else(|| value.get("definitions").filter(|d| is_truthy(d)));

        let Some(container) = container else {
            return Map::new();
        };

        let dictionary = ["schemas", "definitions"]
            .iter()
            .find_map(|key| container.get(*key).filter(|d| is_truthy(d)))
            .unwrap_or(container);

        dictionary.as_object().cloned().unwrap_or_default()
    }

    /// The document this definition was normalized from
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// `info.title` of the document
    pub fn title(&self) -> Option<&str> {
        self.raw
            .get("info")
            .and_then(|i| i.get("title"))
            .and_then(Value::as_str)
    }

    /// `info.version` of the document
    pub fn info_version(&self) -> Option<&str> {
        self.raw
            .get("info")
            .and_then(|i| i.get("version"))
            .and_then(Value::as_str)
    }

    /// Number of entries under `paths`
    pub fn path_count(&self) -> usize {
        self.raw
            .get("paths")
            .and_then(Value::as_object)
            .map_or(0, Map::len)
    }

    /// Number of entries under `components`
    pub fn component_count(&self) -> usize {
        self.raw
            .get("components")
            .and_then(Value::as_object)
            .map_or(0, Map::len)
    }
}

impl From<Value> for OpenApiDefinition {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl From<OpenApiDefinition> for Value {
    fn from(spec: OpenApiDefinition) -> Self {
        spec.raw
    }
}

/// Loose truthiness: present, not null, not false, not an empty string
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
