//! CLI commands

pub mod check;
pub mod crd;
pub mod openapi;
pub mod summary;
pub mod validate;

use miette::{IntoDiagnostic, WrapErr};
use std::io::Read;
use std::path::Path;

use crate::error::{CliError, Result};

/// Text of an input file, with the name to show for it
pub struct Input {
    pub name: String,
    pub text: String,
}

/// Read a file, or stdin when the path is `-`
pub fn read_input(path: &Path) -> Result<Input> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| CliError::io_at(path, e))?;
        return Ok(Input {
            name: "stdin".to_string(),
            text,
        });
    }

    let text = std::fs::read_to_string(path).map_err(|e| CliError::io_at(path, e))?;
    Ok(Input {
        name: path.display().to_string(),
        text,
    })
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value)
        .into_diagnostic()
        .wrap_err("Failed to serialize output")?;
    println!("{}", output);
    Ok(())
}
