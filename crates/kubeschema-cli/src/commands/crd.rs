//! CRD commands - load, preview, list and remove CRD schemas

use console::style;
use kubeschema_core::{CrdDefinition, CrdRow, parse_schema_text};
use std::path::Path;

use crate::commands::{print_json, read_input};
use crate::config::RegistryStore;
use crate::display;
use crate::error::{CliError, Result};

/// Replace the stored CRD set with the CRDs found in a file
pub fn load(store: &RegistryStore, file: &Path) -> Result<()> {
    let input = read_input(file)?;
    let parsed = parse_schema_text(&input.text)?;

    if parsed.crds.is_empty() {
        return Err(CliError::validation_with_help(
            format!("No CRDs found in {}", input.name),
            "Is this a valid CRD YAML?",
        ));
    }

    let mut registry = store.load()?;
    let count = parsed.crds.len();
    registry.load_crds(parsed.crds);
    store.save(&registry)?;

    println!(
        "{} Loaded {} CRD(s) from {}",
        style("✓").green(),
        count,
        input.name
    );
    Ok(())
}

/// Count the CRDs in a file without touching the registry
pub fn preview(file: &Path) -> Result<()> {
    let input = read_input(file)?;
    let parsed = parse_schema_text(&input.text)?;

    if parsed.crds.is_empty() {
        println!("{} No CRDs found in {}", style("⚠").yellow(), input.name);
        return Ok(());
    }

    println!("{} Found {} CRD(s)", style("→").blue(), parsed.crds.len());
    for doc in parsed.crds {
        let crd = CrdDefinition::from_value(doc);
        let versions: Vec<&str> = crd.versions.iter().map(|v| v.name.as_str()).collect();
        println!("  {} {} [{}]", style("•").dim(), crd.display_name(), versions.join(", "));
    }
    Ok(())
}

pub fn list(store: &RegistryStore, json: bool) -> Result<()> {
    let registry = store.load()?;
    let rows: Vec<CrdRow> = registry.crds().iter().map(CrdRow::from).collect();

    if json {
        return print_json(&rows);
    }
    display::print_crds(&rows);
    Ok(())
}

/// Remove a CRD by its position in `crd list`
pub fn remove(store: &RegistryStore, index: usize) -> Result<()> {
    let mut registry = store.load()?;
    let removed = registry.remove_crd(index).ok_or_else(|| {
        CliError::usage(format!(
            "No CRD at index {} ({} loaded)",
            index,
            registry.crds().len()
        ))
    })?;
    store.save(&registry)?;

    println!("{} Removed CRD {}", style("✓").green(), removed.display_name());
    Ok(())
}
