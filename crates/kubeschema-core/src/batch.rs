//! Resource and stream validation
//!
//! Drives parsing, matching and structural validation. Two entry points:
//!
//! - [`validate_resource`]: one resource; a resource with no matching schema
//!   is reported as `no matching schema found`
//! - [`validate_stream`]: a multi-document YAML stream; documents that are
//!   not resources, and resources with no matching schema, produce nothing
//!
//! Every document in a stream is validated independently.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{parse_single, parse_yaml_stream};
use crate::error::CoreError;
use crate::matcher::{MatchedBy, ResourceMatcher};
use crate::registry::SchemaRegistry;
use crate::resource::ResourceDocument;
use crate::validator::{SchemaValidator, ValidationIssue};

/// Message reported when no schema matches a single resource
pub const NO_MATCH_MESSAGE: &str = "no matching schema found";

/// Outcome of validating one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceValidation {
    pub ok: bool,
    pub matched_by: MatchedBy,
    /// Name of the matched schema, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub errors: Vec<ValidationIssue>,
}

impl ResourceValidation {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            matched_by: MatchedBy::None,
            schema: None,
            errors: vec![ValidationIssue::new("", message)],
        }
    }
}

/// Validate one resource against the registry
///
/// CRDs are tried first, then OpenAPI documents.
pub fn validate_resource(resource: &Value, registry: &SchemaRegistry) -> ResourceValidation {
    let Some(resource) = ResourceDocument::from_value(resource) else {
        return ResourceValidation::failed(NO_MATCH_MESSAGE);
    };
    let matcher = ResourceMatcher::new(registry);

    let Some(found) = matcher.find(&resource) else {
        return ResourceValidation::failed(NO_MATCH_MESSAGE);
    };

    let errors = SchemaValidator::with_refs(matcher.refs_for(&found))
        .validate(found.schema(), resource.body);

    ResourceValidation {
        ok: errors.is_empty(),
        matched_by: found.matched_by(),
        schema: Some(found.describe()),
        errors,
    }
}

/// Validate a resource given as JSON or YAML text
///
/// Only the first document of a YAML stream is considered.
pub fn validate_resource_text(text: &str, registry: &SchemaRegistry) -> ResourceValidation {
    match parse_single(text) {
        Ok(Some(doc)) => validate_resource(&doc, registry),
        Ok(None) => ResourceValidation::failed("could not parse resource"),
        Err(CoreError::EmptyInput) => ResourceValidation::failed("empty resource"),
        Err(e) => {
            tracing::debug!("resource text did not parse: {}", e);
            ResourceValidation::failed("parse error")
        }
    }
}

/// Rule identifier attached to stream issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    SchemaCrd,
    SchemaOpenapi,
    SchemaValidation,
    ParseError,
}

impl RuleId {
    fn for_match(matched_by: MatchedBy) -> Self {
        match matched_by {
            MatchedBy::Crd => Self::SchemaCrd,
            MatchedBy::OpenApi => Self::SchemaOpenapi,
            MatchedBy::None => Self::SchemaValidation,
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SchemaCrd => write!(f, "schema-crd"),
            Self::SchemaOpenapi => write!(f, "schema-openapi"),
            Self::SchemaValidation => write!(f, "schema-validation"),
            Self::ParseError => write!(f, "parse-error"),
        }
    }
}

/// Issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
}

/// A validation issue located in a document stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamIssue {
    pub rule_id: RuleId,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub path: String,
    /// Position of the document in the stream; absent for stream-level failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_index: Option<usize>,
}

/// Validate every resource in a YAML stream
///
/// A stream that fails to parse yields a single `parse-error` issue.
pub fn validate_stream(text: &str, registry: &SchemaRegistry) -> Vec<StreamIssue> {
    let docs = match parse_yaml_stream(text) {
        Ok(docs) => docs,
        Err(e) => {
            tracing::debug!("stream did not parse: {}", e);
            return vec![StreamIssue {
                rule_id: RuleId::ParseError,
                severity: Severity::Error,
                message: format!("Invalid YAML: {}", e.detail()),
                path: String::new(),
                doc_index: None,
            }];
        }
    };

    let mut issues = Vec::new();
    for (doc_index, doc) in docs.iter().enumerate() {
        let Some(doc) = doc else {
            continue;
        };
        if ResourceDocument::from_value(doc).is_none() {
            continue;
        }

        let result = validate_resource(doc, registry);
        if result.matched_by == MatchedBy::None {
            tracing::trace!(doc_index, "no schema for document, skipping");
            continue;
        }

        let rule_id = RuleId::for_match(result.matched_by);
        issues.extend(result.errors.into_iter().map(|issue| StreamIssue {
            rule_id,
            severity: Severity::Error,
            message: issue.message,
            path: issue.path,
            doc_index: Some(doc_index),
        }));
    }

    tracing::debug!(documents = docs.len(), issues = issues.len(), "validated stream");
    issues
}
