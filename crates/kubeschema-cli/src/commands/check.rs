//! Check command - validate one resource and report which schema matched

use kubeschema_core::validate_resource_text;
use std::path::Path;

use crate::commands::{print_json, read_input};
use crate::config::RegistryStore;
use crate::display;
use crate::error::{CliError, Result};

pub fn run(store: &RegistryStore, file: &Path, json_output: bool) -> Result<()> {
    let registry = store.load()?;
    let input = read_input(file)?;

    let result = validate_resource_text(&input.text, &registry);
    tracing::debug!(matched_by = %result.matched_by, ok = result.ok, "checked resource");

    if json_output {
        print_json(&result)?;
    } else {
        print!("{}", display::render_check(&result));
    }

    if result.ok {
        Ok(())
    } else {
        Err(CliError::issues_found(result.errors.len(), input.name))
    }
}
