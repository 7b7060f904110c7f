//! Resource identity
//!
//! Any document carrying both `apiVersion` and `kind` is a resource and a
//! candidate for schema matching. Everything else is ignored.

use serde_json::Value;

/// A resource document together with its parsed group/version/kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceDocument<'a> {
    /// Raw `apiVersion` (e.g., "apps/v1")
    pub api_version: &'a str,
    /// API group; empty for the core group
    pub group: &'a str,
    /// API version (e.g., "v1")
    pub version: &'a str,
    pub kind: &'a str,
    /// The whole document
    pub body: &'a Value,
}

impl<'a> ResourceDocument<'a> {
    /// View a document as a resource
    ///
    /// Returns `None` when `apiVersion` or `kind` is missing, empty, or not a string.
    pub fn from_value(body: &'a Value) -> Option<Self> {
        let field = |key: &str| {
            body.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        };
        let api_version = field("apiVersion")?;
        let kind = field("kind")?;
        let (group, version) = split_api_version(api_version);

        Some(Self {
            api_version,
            group,
            version,
            kind,
            body,
        })
    }
}

/// Check whether a document is a resource
pub fn is_resource(doc: &Value) -> bool {
    ResourceDocument::from_value(doc).is_some()
}

/// Split an `apiVersion` into `(group, version)` on the last `/`
///
/// Without a slash the group is empty (the core API group).
pub fn split_api_version(api_version: &str) -> (&str, &str) {
    match api_version.rsplit_once('/') {
        Some((group, version)) => (group, version),
        None => ("", api_version),
    }
}
