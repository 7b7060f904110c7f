//! Registry storage
//!
//! Stores the schema registry in `~/.config/kubeschema/registry.json`

use kubeschema_core::SchemaRegistry;
use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

/// Environment variable overriding the registry location
pub const REGISTRY_ENV: &str = "KUBESCHEMA_REGISTRY";

/// Location of the persisted registry
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    /// Use an explicit path, or fall back to the default location
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        tracing::debug!(path = %path.display(), "using registry file");
        Ok(Self { path })
    }

    /// Get default registry path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            CliError::registry(
                "Could not determine config directory",
                format!("Pass --registry or set {}", REGISTRY_ENV),
            )
        })?;
        Ok(config_dir.join("kubeschema").join("registry.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the registry; a missing file is an empty registry
    pub fn load(&self) -> Result<SchemaRegistry> {
        if !self.path.exists() {
            return Ok(SchemaRegistry::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| CliError::io_at(&self.path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            CliError::registry(
                format!("{} is not a valid registry: {}", self.path.display(), e),
                "Fix or delete the file, then load schemas again",
            )
        })
    }

    /// Save the registry, creating parent directories
    pub fn save(&self, registry: &SchemaRegistry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CliError::io_at(parent, e))?;
        }
        let content = serde_json::to_string_pretty(registry).map_err(|e| {
            CliError::registry(format!("Failed to serialize registry: {}", e), "This is a bug")
        })?;
        std::fs::write(&self.path, content).map_err(|e| CliError::io_at(&self.path, e))?;
        tracing::debug!(
            crds = registry.crds().len(),
            openapis = registry.openapis().len(),
            "saved registry"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_file_is_empty_registry() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistryStore::open(Some(dir.path().join("nope.json"))).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_parents_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistryStore::open(Some(dir.path().join("a/b/registry.json"))).unwrap();

        let mut registry = SchemaRegistry::new();
        registry.load_crds(vec![json!({
            "kind": "CustomResourceDefinition",
            "spec": {"group": "example.com", "names": {"kind": "Foo"}}
        })]);
        store.save(&registry).unwrap();

        assert_eq!(store.load().unwrap(), registry);
    }

    #[test]
    fn test_corrupt_file_is_registry_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        std::fs::write(&path, "not json").unwrap();

        let err = RegistryStore::open(Some(path)).unwrap().load().unwrap_err();
        assert!(matches!(err, CliError::Registry { .. }));
    }
}
