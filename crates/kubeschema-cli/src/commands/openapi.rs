//! OpenAPI commands - load, preview, list and remove cluster OpenAPI documents

use console::style;
use kubeschema_core::{OpenApiDefinition, OpenApiMeta, OpenApiRow, parse_schema_text, summarize};
use std::path::Path;

use crate::commands::{print_json, read_input};
use crate::config::RegistryStore;
use crate::display;
use crate::error::{CliError, Result};

/// Store every OpenAPI document of a file under `(cluster, version)`
///
/// Entries already stored for the same pair are replaced by the file's documents.
pub fn load(store: &RegistryStore, file: &Path, cluster: &str, version: &str) -> Result<()> {
    let cluster = cluster.trim();
    let version = version.trim();
    if cluster.is_empty() || version.is_empty() {
        return Err(CliError::usage("Both --cluster and --version must be non-empty"));
    }

    let input = read_input(file)?;
    let parsed = parse_schema_text(&input.text)?;
    if parsed.openapis.is_empty() {
        return Err(CliError::validation_with_help(
            format!("No OpenAPI document found in {}", input.name),
            "Expected a document with an `openapi` or `swagger` field, or `paths`/`components`/`definitions`",
        ));
    }

    let specs: Vec<OpenApiDefinition> = parsed
        .openapis
        .iter()
        .cloned()
        .map(OpenApiDefinition::from_value)
        .collect();
    let mut registry = store.load()?;
    registry.load_openapis(parsed.openapis, OpenApiMeta::new(cluster, version, input.name.as_str()));
    store.save(&registry)?;

    for spec in &specs {
        println!(
            "{} Loaded {} ({} schemas) for {} {}",
            style("✓").green(),
            spec.title().unwrap_or("OpenAPI spec"),
            spec.schemas.len(),
            cluster,
            version
        );
    }
    Ok(())
}

/// Describe the OpenAPI document in a file without touching the registry
pub fn preview(file: &Path, json: bool) -> Result<()> {
    let input = read_input(file)?;
    let parsed = parse_schema_text(&input.text)?;
    let summary = summarize(&parsed);

    if json {
        return print_json(&summary);
    }

    match &summary.openapi_version {
        Some(version) => println!(
            "{} OpenAPI document (version {}), {} CRD(s)",
            style("→").blue(),
            version,
            summary.crd_count
        ),
        None => println!(
            "{} No OpenAPI document in {}, {} CRD(s)",
            style("⚠").yellow(),
            input.name,
            summary.crd_count
        ),
    }
    Ok(())
}

pub fn list(store: &RegistryStore, json: bool) -> Result<()> {
    let registry = store.load()?;
    let rows: Vec<OpenApiRow> = registry.openapis().iter().map(OpenApiRow::from).collect();

    if json {
        return print_json(&rows);
    }
    display::print_openapis(&rows);
    Ok(())
}

/// Remove an OpenAPI entry by its position in `openapi list`
pub fn remove(store: &RegistryStore, index: usize) -> Result<()> {
    let mut registry = store.load()?;
    let removed = registry.remove_openapi(index).ok_or_else(|| {
        CliError::usage(format!(
            "No OpenAPI document at index {} ({} loaded)",
            index,
            registry.openapis().len()
        ))
    })?;
    store.save(&registry)?;

    println!(
        "{} Removed OpenAPI document for {} {}",
        style("✓").green(),
        removed.meta.cluster,
        removed.meta.version
    );
    Ok(())
}
