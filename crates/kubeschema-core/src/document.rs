//! Raw text to document parsing
//!
//! Input is either a single JSON value or a (possibly multi-document) YAML
//! stream. JSON is tried first; YAML is the fallback. Documents come back as
//! `serde_json::Value` trees in source order.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CoreError, Result};

/// An untyped document tree produced by parsing one JSON value or one YAML document
pub type RawDocument = Value;

/// Parse raw text into an ordered list of documents
///
/// Empty and null documents are dropped. Whitespace-only input is rejected
/// with [`CoreError::EmptyInput`] without attempting a parse.
pub fn parse_documents(text: &str) -> Result<Vec<RawDocument>> {
    if text.trim().is_empty() {
        return Err(CoreError::EmptyInput);
    }

    let json_err = match serde_json::from_str::<Value>(text) {
        Ok(value) => return Ok(if value.is_null() { vec![] } else { vec![value] }),
        Err(e) => e,
    };

    match parse_yaml_stream(text) {
        Ok(docs) => Ok(docs.into_iter().flatten().collect()),
        Err(yaml_err) => {
            tracing::debug!("input is neither JSON nor YAML: {}", yaml_err);
            Err(CoreError::Parse {
                json: json_err.to_string(),
                yaml: yaml_err.detail(),
            })
        }
    }
}

/// Parse a YAML stream, keeping one slot per document
///
/// Empty documents are `None`, so positions line up with the source stream.
/// A malformed document anywhere fails the whole stream.
/// YAML 1.1 merge keys (`<<: *anchor`) are applied before conversion.
pub fn parse_yaml_stream(text: &str) -> Result<Vec<Option<RawDocument>>> {
    let mut docs = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let mut yaml = serde_yaml::Value::deserialize(document)?;
        yaml.apply_merge()?;
        let value = serde_json::to_value(&yaml)?;
        docs.push(if value.is_null() { None } else { Some(value) });
    }
    Ok(docs)
}

/// Parse text that should hold a single resource
///
/// JSON is tried first, then the first non-empty YAML document.
pub fn parse_single(text: &str) -> Result<Option<RawDocument>> {
    Ok(parse_documents(text)?.into_iter().next())
}
