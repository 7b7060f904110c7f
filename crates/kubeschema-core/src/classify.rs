//! Schema source classification
//!
//! Labels parsed documents as CustomResourceDefinitions, OpenAPI
//! specifications, or neither. CRD checks run first so a CRD whose `spec`
//! happens to carry `paths`/`components`/`definitions` keys is never filed as
//! an OpenAPI source.

use serde_json::Value;

use crate::document::{parse_documents, RawDocument};
use crate::error::Result;

/// Kind marker matched case-insensitively against `kind`
const CRD_KIND_MARKER: &str = "customresourcedefinition";

/// API group marker matched case-insensitively against `apiVersion`
const CRD_GROUP_MARKER: &str = "apiextensions.k8s.io";

/// Markers searched in the serialized document by the textual fallback
const CRD_TEXT_MARKERS: [&str; 2] = ["\"kind\":\"customresourcedefinition\"", CRD_GROUP_MARKER];

/// Top-level keys that identify an OpenAPI document structurally
const OPENAPI_STRUCTURAL_KEYS: [&str; 3] = ["paths", "components", "definitions"];

/// What kind of schema source a document is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Crd,
    OpenApi,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Crd => write!(f, "crd"),
            Self::OpenApi => write!(f, "openapi"),
        }
    }
}

/// Classify a single document
pub fn classify(doc: &Value) -> Option<SourceKind> {
    let obj = doc.as_object()?;

    let lower = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .map(str::to_lowercase)
            .unwrap_or_default()
    };

    if lower("kind").contains(CRD_KIND_MARKER) {
        return Some(SourceKind::Crd);
    }
    if lower("apiVersion").contains(CRD_GROUP_MARKER) {
        return Some(SourceKind::Crd);
    }

    let has_version_field = ["openapi", "swagger"].iter().any(|key| {
        obj.get(*key)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.trim().is_empty())
    });
    if has_version_field {
        return Some(SourceKind::OpenApi);
    }

    if OPENAPI_STRUCTURAL_KEYS.iter().any(|key| obj.contains_key(*key)) {
        return Some(SourceKind::OpenApi);
    }

    None
}

/// Textual CRD detection for irregularly shaped manifests
fn looks_like_crd_text(doc: &Value) -> bool {
    let Ok(text) = serde_json::to_string(doc) else {
        return false;
    };
    let text = text.to_lowercase();
    CRD_TEXT_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Documents sorted by source kind, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    pub crds: Vec<RawDocument>,
    pub openapis: Vec<RawDocument>,
    /// Documents matching neither heuristic
    pub unclassified: usize,
}

/// Classify a batch of documents
///
/// When no document classifies as a CRD, every unclassified document is
/// additionally searched textually for CRD markers.
pub fn classify_all(docs: &[RawDocument]) -> Classified {
    let mut out = Classified::default();
    let mut leftovers = Vec::new();

    for doc in docs {
        match classify(doc) {
            Some(SourceKind::Crd) => out.crds.push(doc.clone()),
            Some(SourceKind::OpenApi) => out.openapis.push(doc.clone()),
            None => leftovers.push(doc),
        }
    }

    if out.crds.is_empty() {
        for doc in leftovers.iter().copied() {
            if looks_like_crd_text(doc) {
                tracing::debug!("recovered CRD through textual markers");
                out.crds.push(doc.clone());
            }
        }
    }

    out.unclassified = docs.len() - out.crds.len() - out.openapis.len();
    out
}

/// Parsed and classified schema text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSchemaText {
    /// Every parsed document
    pub docs: Vec<RawDocument>,
    /// Documents classified as CRDs
    pub crds: Vec<RawDocument>,
    /// Documents classified as OpenAPI specifications
    pub openapis: Vec<RawDocument>,
}

impl ParsedSchemaText {
    /// The last OpenAPI document, which is the one a single-spec loader keeps
    pub fn openapi(&self) -> Option<&RawDocument> {
        self.openapis.last()
    }
}

/// Parse raw text and classify every document in it
pub fn parse_schema_text(text: &str) -> Result<ParsedSchemaText> {
    let docs = parse_documents(text)?;
    let Classified {
        crds,
        openapis,
        unclassified,
    } = classify_all(&docs);

    tracing::debug!(
        crds = crds.len(),
        openapis = openapis.len(),
        unclassified,
        "classified schema text"
    );

    Ok(ParsedSchemaText {
        docs,
        crds,
        openapis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_crd_by_kind() {
        let doc = json!({"kind": "CustomResourceDefinition", "spec": {}});
        assert_eq!(classify(&doc), Some(SourceKind::Crd));
    }

    #[test]
    fn test_classify_crd_by_api_version() {
        let doc = json!({"apiVersion": "apiextensions.k8s.io/v1beta1", "kind": "Whatever"});
        assert_eq!(classify(&doc), Some(SourceKind::Crd));
    }

    #[test]
    fn test_crd_wins_over_openapi_keys() {
        let doc = json!({
            "kind": "CustomResourceDefinition",
            "paths": {},
            "components": {"schemas": {}},
        });
        assert_eq!(classify(&doc), Some(SourceKind::Crd));
    }

    #[test]
    fn test_classify_openapi() {
        assert_eq!(classify(&json!({"openapi": "3.0.0"})), Some(SourceKind::OpenApi));
        assert_eq!(classify(&json!({"swagger": "2.0"})), Some(SourceKind::OpenApi));
        assert_eq!(classify(&json!({"definitions": {}})), Some(SourceKind::OpenApi));
        assert_eq!(classify(&json!({"paths": {}})), Some(SourceKind::OpenApi));
    }

    #[test]
    fn test_blank_openapi_field_is_not_enough() {
        assert_eq!(classify(&json!({"openapi": "  "})), None);
    }

    #[test]
    fn test_classify_neither() {
        assert_eq!(classify(&json!({"apiVersion": "v1", "kind": "ConfigMap"})), None);
        assert_eq!(classify(&json!("scalar")), None);
        assert_eq!(classify(&json!([1, 2])), None);
    }

    #[test]
    fn test_textual_fallback_recovers_crd() {
        // kind is nested, so the structural checks miss it
        let doc = json!({"manifest": {"apiVersion": "apiextensions.k8s.io/v1"}});
        let classified = classify_all(&[doc.clone()]);
        assert_eq!(classified.crds, vec![doc]);
        assert_eq!(classified.unclassified, 0);
    }

    #[test]
    fn test_textual_fallback_skipped_when_crds_found() {
        let crd = json!({"kind": "CustomResourceDefinition"});
        let odd = json!({"wrapped": {"kind": "CustomResourceDefinition"}});
        let classified = classify_all(&[crd, odd]);
        assert_eq!(classified.crds.len(), 1);
        assert_eq!(classified.unclassified, 1);
    }

    #[test]
    fn test_textual_fallback_ignores_openapi_documents() {
        let spec = json!({
            "swagger": "2.0",
            "definitions": {
                "io.k8s.apiextensions-apiserver.pkg.apis.apiextensions.v1.CustomResourceDefinition": {
                    "x-kubernetes-group-version-kind": [{"group": "apiextensions.k8s.io"}]
                }
            }
        });
        let classified = classify_all(&[spec]);
        assert!(classified.crds.is_empty());
        assert_eq!(classified.openapis.len(), 1);
    }

    #[test]
    fn test_parse_schema_text() {
        let text = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
---
apiVersion: v1
kind: ConfigMap
"#;
        let parsed = parse_schema_text(text).unwrap();
        assert_eq!(parsed.docs.len(), 2);
        assert_eq!(parsed.crds.len(), 1);
        assert!(parsed.openapi().is_none());
    }
}
