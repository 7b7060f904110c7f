//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// Input was empty or whitespace only
    #[error("empty")]
    EmptyInput,

    /// Input was neither valid JSON nor valid YAML
    #[error("failed to parse input as JSON ({json}) or YAML ({yaml})")]
    Parse { json: String, yaml: String },

    /// A YAML document failed to parse or its merge keys could not be applied
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// A YAML document has no JSON representation (e.g., non-string keys)
    #[error("Failed to convert YAML to JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl CoreError {
    /// One-line messages suitable for an `errors` list
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Parse { json, yaml } => vec![json.clone(), yaml.clone()],
            other => vec![other.to_string()],
        }
    }

    /// The underlying parser message, without the variant prefix
    pub fn detail(&self) -> String {
        match self {
            Self::YamlParse(e) => e.to_string(),
            Self::JsonParse(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
