//! The single generation pass: resolve, expand, report.

use anyhow::{Context, Result};

use formgen_core::config::InvocationParams;
use formgen_core::expander;

use crate::output;

/// Resolve `params` and expand the selected form into the test file.
///
/// Prints a short summary unless `quiet` is set. Any failure is returned unchanged in
/// the error chain; nothing is retried.
pub fn run(params: &InvocationParams, quiet: bool) -> Result<()> {
    let config = params.resolve()?;

    let report = expander::expand_file(&config)
        .with_context(|| format!("failed to generate tests for '{}'", params.class_name))?;

    if !quiet {
        output::print_report(&params.class_name, &params.namespace, &report);
    }

    Ok(())
}
