//! `$ref` resolution for schema fragments
//!
//! Resolution is pluggable: the validator and matcher only see the
//! [`RefResolver`] trait, so new reference schemes can be added without
//! touching them. References that a resolver cannot handle pass through
//! unresolved.

use serde_json::Value;

/// Resolves a reference string against the document it appears in
pub trait RefResolver: Send + Sync {
    /// Look up `reference` inside `root`
    fn resolve<'a>(&self, reference: &str, root: &'a Value) -> Option<&'a Value>;
}

/// Resolver for in-document OpenAPI references
///
/// Handles `#/components/schemas/NAME` and `#/definitions/NAME`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalRefResolver;

impl LocalRefResolver {
    const PREFIXES: [(&'static str, &'static [&'static str]); 2] = [
        ("#/components/schemas/", &["components", "schemas"]),
        ("#/definitions/", &["definitions"]),
    ];
}

impl RefResolver for LocalRefResolver {
    fn resolve<'a>(&self, reference: &str, root: &'a Value) -> Option<&'a Value> {
        Self::PREFIXES.iter().find_map(|(prefix, container)| {
            let name = reference.strip_prefix(prefix)?;
            let dictionary = container.iter().try_fold(root, |node, key| node.get(*key))?;
            dictionary.get(name)
        })
    }
}

/// Resolver that never resolves anything
///
/// CRD structural schemas are self-contained, so they are validated with this.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRefs;

impl RefResolver for NoRefs {
    fn resolve<'a>(&self, _reference: &str, _root: &'a Value) -> Option<&'a Value> {
        None
    }
}

static NULL_ROOT: Value = Value::Null;

/// A resolver bound to the document its references point into
#[derive(Clone, Copy)]
pub struct RefContext<'a> {
    resolver: &'a dyn RefResolver,
    root: &'a Value,
}

impl<'a> RefContext<'a> {
    pub fn new(resolver: &'a dyn RefResolver, root: &'a Value) -> Self {
        Self { resolver, root }
    }

    /// A context that leaves every schema untouched
    pub fn none() -> Self {
        Self {
            resolver: &NoRefs,
            root: &NULL_ROOT,
        }
    }

    /// Replace a `{"$ref": ...}` schema with its target
    ///
    /// Resolution is a single step. Anything that is not a `$ref` object, or
    /// whose target cannot be found, is returned as given.
    pub fn resolve(&self, schema: &'a Value) -> &'a Value {
        schema
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|reference| self.resolver.resolve(reference, self.root))
            .unwrap_or(schema)
    }
}

impl std::fmt::Debug for RefContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefContext").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_components_ref() {
        let root = json!({"components": {"schemas": {"Pod": {"title": "Pod"}}}});
        let resolved = LocalRefResolver.resolve("#/components/schemas/Pod", &root);
        assert_eq!(resolved, Some(&json!({"title": "Pod"})));
    }

    #[test]
    fn test_resolve_definitions_ref() {
        let root = json!({"definitions": {"io.k8s.api.core.v1.Pod": {"title": "Pod"}}});
        let resolved = LocalRefResolver.resolve("#/definitions/io.k8s.api.core.v1.Pod", &root);
        assert_eq!(resolved, Some(&json!({"title": "Pod"})));
    }

    #[test]
    fn test_remote_and_unknown_refs_do_not_resolve() {
        let root = json!({"definitions": {"Pod": {}}});
        assert!(LocalRefResolver.resolve("https://example.com/schema#/Pod", &root).is_none());
        assert!(LocalRefResolver.resolve("#/definitions/Missing", &root).is_none());
        assert!(LocalRefResolver.resolve("#/components/schemas/Pod", &root).is_none());
    }

    #[test]
    fn test_context_passes_unresolvable_through() {
        let root = json!({"definitions": {}});
        let ctx = RefContext::new(&LocalRefResolver, &root);
        let schema = json!({"$ref": "#/definitions/Nope"});
        assert_eq!(ctx.resolve(&schema), &schema);

        let plain = json!({"type": "string"});
        assert_eq!(ctx.resolve(&plain), &plain);
    }

    #[test]
    fn test_context_resolves_single_step() {
        let root = json!({"definitions": {
            "A": {"$ref": "#/definitions/B"},
            "B": {"type": "string"}
        }});
        let ctx = RefContext::new(&LocalRefResolver, &root);
        let schema = json!({"$ref": "#/definitions/A"});
        assert_eq!(ctx.resolve(&schema), &json!({"$ref": "#/definitions/B"}));
    }

    #[test]
    fn test_none_context_is_identity() {
        let schema = json!({"$ref": "#/definitions/A"});
        assert_eq!(RefContext::none().resolve(&schema), &schema);
    }
}
