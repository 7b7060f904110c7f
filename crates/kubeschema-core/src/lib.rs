//! Kubeschema Core - schema-aware validation of Kubernetes manifests
//!
//! This crate validates resources against schemas taken from a cluster:
//! - `document`: JSON/YAML parsing into raw documents
//! - `classify`: CRD vs OpenAPI classification of schema text
//! - `source`: canonical CRD and OpenAPI shapes, normalized at ingestion
//! - `registry`: the set of loaded schema sources
//! - `matcher`: resource to schema lookup (CRDs first, then OpenAPI)
//! - `validator`: permissive structural validation
//! - `batch`: single-resource and multi-document stream validation

pub mod batch;
pub mod classify;
pub mod document;
pub mod error;
pub mod matcher;
pub mod registry;
pub mod resolver;
pub mod resource;
pub mod source;
pub mod summary;
pub mod validator;

pub use batch::{
    NO_MATCH_MESSAGE, ResourceValidation, RuleId, Severity, StreamIssue, validate_resource,
    validate_resource_text, validate_stream,
};
pub use classify::{Classified, ParsedSchemaText, SourceKind, classify, classify_all, parse_schema_text};
pub use document::{RawDocument, parse_documents, parse_single, parse_yaml_stream};
pub use error::{CoreError, Result};
pub use matcher::{MatchedBy, OpenApiRule, ResourceMatcher, SchemaMatch};
pub use registry::{OpenApiEntry, OpenApiMeta, SchemaRegistry};
pub use resolver::{LocalRefResolver, NoRefs, RefContext, RefResolver};
pub use resource::{ResourceDocument, is_resource};
pub use source::{CrdDefinition, CrdScope, CrdVersion, OpenApiDefinition, OpenApiDialect};
pub use summary::{CrdRow, OpenApiRow, RegistrySummary, SchemaSummary, summarize};
pub use validator::{SchemaType, SchemaValidator, ValidationIssue};
