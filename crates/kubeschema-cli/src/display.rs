//! Display formatting for CLI output
//!
//! Provides structured display for:
//! - Stream validation issues grouped by document
//! - Single-resource check results
//! - CRD and OpenAPI listings

use console::style;
use kubeschema_core::{CrdRow, OpenApiRow, ResourceValidation, StreamIssue};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Stream issues grouped by document for display
#[derive(Debug)]
pub struct IssueReport<'a> {
    source_name: &'a str,
    issues: &'a [StreamIssue],
}

impl<'a> IssueReport<'a> {
    pub fn new(source_name: &'a str, issues: &'a [StreamIssue]) -> Self {
        Self { source_name, issues }
    }

    /// Render issues grouped by document index
    ///
    /// Stream-level issues (no document index) come first.
    pub fn render(&self) -> String {
        let mut by_doc: BTreeMap<Option<usize>, Vec<&StreamIssue>> = BTreeMap::new();
        for issue in self.issues {
            by_doc.entry(issue.doc_index).or_default().push(issue);
        }

        let mut out = String::new();
        for (doc_index, issues) in by_doc {
            let header = match doc_index {
                Some(i) => format!("{} (document {})", self.source_name, i),
                None => self.source_name.to_string(),
            };
            let _ = writeln!(out, "{}", style(header).cyan().bold());

            for issue in issues {
                let path_display = if issue.path.is_empty() {
                    String::new()
                } else {
                    format!(" at {}", style(&issue.path).dim())
                };
                let _ = writeln!(
                    out,
                    "  {} {}{} {}",
                    style("✗").red(),
                    issue.message,
                    path_display,
                    style(format!("[{}]", issue.rule_id)).dim()
                );
            }
        }
        out
    }

    pub fn display(&self) {
        print!("{}", self.render());
    }

    /// Print summary line
    pub fn print_summary(&self) {
        let documents = self
            .issues
            .iter()
            .filter_map(|i| i.doc_index)
            .collect::<std::collections::BTreeSet<_>>()
            .len();

        if self.issues.is_empty() {
            println!("{} No issues found", style("✓").green().bold());
        } else {
            println!(
                "{} {} issue(s) in {} document(s)",
                style("✗").red().bold(),
                self.issues.len(),
                documents
            );
        }
    }
}

/// Render a single-resource check result
pub fn render_check(result: &ResourceValidation) -> String {
    let mut out = String::new();
    match &result.schema {
        Some(schema) => {
            let _ = writeln!(
                out,
                "{} Matched {} schema {}",
                style("→").blue(),
                result.matched_by,
                style(schema).cyan()
            );
        }
        None => {
            let _ = writeln!(out, "{} No schema matched", style("→").blue());
        }
    }

    if result.ok {
        let _ = writeln!(out, "{} Resource is valid", style("✓").green().bold());
        return out;
    }

    for issue in &result.errors {
        if issue.path.is_empty() {
            let _ = writeln!(out, "  {} {}", style("✗").red(), issue.message);
        } else {
            let _ = writeln!(
                out,
                "  {} {} at {}",
                style("✗").red(),
                issue.message,
                style(&issue.path).dim()
            );
        }
    }
    out
}

/// Print the CRD listing
pub fn print_crds(rows: &[CrdRow]) {
    if rows.is_empty() {
        println!("No CRDs loaded");
        return;
    }

    println!(
        "{:<4} {:<40} {:<24} {:<12} {}",
        style("#").bold(),
        style("NAME").bold(),
        style("KIND").bold(),
        style("SCOPE").bold(),
        style("VERSIONS").bold()
    );
    for (i, row) in rows.iter().enumerate() {
        println!(
            "{:<4} {:<40} {:<24} {:<12} {}",
            i,
            row.name,
            row.kind,
            row.scope,
            row.versions.join(",")
        );
    }
}

/// Print the OpenAPI listing
pub fn print_openapis(rows: &[OpenApiRow]) {
    if rows.is_empty() {
        println!("No OpenAPI documents loaded");
        return;
    }

    for (i, row) in rows.iter().enumerate() {
        println!("{} {}", style(format!("[{}]", i)).dim(), style(&row.title).cyan().bold());
        println!("    Cluster:   {} ({})", row.cluster, row.version);
        println!("    Version:   {} (OpenAPI {})", row.api_version, row.openapi_version);
        println!(
            "    Contents:  {} paths, {} components, {} schemas",
            row.paths, row.components, row.schemas
        );
        println!("    Source:    {}", row.source);
        println!("    Loaded:    {}", row.loaded_at);
    }
}
