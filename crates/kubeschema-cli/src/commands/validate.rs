//! Validate command - validate a manifest stream against the registry

use console::style;
use kubeschema_core::{StreamIssue, validate_stream};
use serde::Serialize;
use std::path::Path;

use crate::commands::{print_json, read_input};
use crate::config::RegistryStore;
use crate::display::IssueReport;
use crate::error::{CliError, Result};

#[derive(Serialize)]
struct StreamReport<'a> {
    valid: bool,
    source: &'a str,
    issues: &'a [StreamIssue],
}

pub fn run(store: &RegistryStore, file: &Path, json_output: bool) -> Result<()> {
    let registry = store.load()?;
    let input = read_input(file)?;

    if registry.is_empty() && !json_output {
        println!(
            "{} Registry is empty; load CRDs or an OpenAPI document first",
            style("⚠").yellow()
        );
    }

    let issues = validate_stream(&input.text, &registry);

    if json_output {
        print_json(&StreamReport {
            valid: issues.is_empty(),
            source: &input.name,
            issues: &issues,
        })?;
    } else {
        println!("{} Validating {}", style("→").blue(), input.name);
        let report = IssueReport::new(&input.name, &issues);
        if !issues.is_empty() {
            println!();
            report.display();
            println!();
        }
        report.print_summary();
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(CliError::issues_found(issues.len(), input.name))
    }
}
