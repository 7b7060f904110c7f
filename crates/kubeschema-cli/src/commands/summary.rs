//! Summary command - registry counts

use console::style;
use kubeschema_core::RegistrySummary;

use crate::commands::print_json;
use crate::config::RegistryStore;
use crate::error::Result;

pub fn run(store: &RegistryStore, json_output: bool) -> Result<()> {
    let registry = store.load()?;
    let summary = RegistrySummary::from(&registry);

    if json_output {
        return print_json(&summary);
    }

    println!("{} {}", style("Registry:").bold(), store.path().display());
    println!(
        "  CRDs:     {} ({} version(s))",
        summary.crd_count, summary.crd_versions
    );
    println!(
        "  OpenAPI:  {} document(s) ({} schemas)",
        summary.openapi_count, summary.openapi_schemas
    );
    Ok(())
}
