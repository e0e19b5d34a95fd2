//! Terminal summary printed after a generation run.
//!
//! Colors come from the [`console`] crate and are dropped when stdout is not a terminal.

use console::style;
use formgen_core::expander::ExpansionReport;

/// Labels are padded to this width so the values line up.
const LABEL_WIDTH: usize = 10;

/// Print the run summary: which form produced which test file, and how much changed.
pub fn print_report(class_name: &str, namespace: &str, report: &ExpansionReport) {
    let title = if namespace.is_empty() {
        format!("formgen: {class_name}")
    } else {
        format!("formgen: {namespace}::{class_name}")
    };
    println!("{}", style(&title).bold().cyan());

    print_field("form", &report.template_path.display().to_string());
    print_field("test file", &report.output_path.display().to_string());
    println!(
        "{} Wrote {} lines ({} substitutions)",
        style("[OK]").green().bold(),
        report.lines,
        report.substitutions
    );
}

fn print_field(label: &str, value: &str) {
    println!("  {} {}", style(format!("{label:<width$}", width = LABEL_WIDTH)).dim(), value);
}
