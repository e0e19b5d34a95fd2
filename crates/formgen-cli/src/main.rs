//! formgen CLI: generate interface test sources from forms.
//!
//! Reads a form line by line, replaces `%class_name%` and `%namespace_name%` with the
//! values given on the command line and writes the result to the test file. With
//! `--sbo` the `sbo_` variant of the form is used instead.

mod generate;
mod output;

use std::path::PathBuf;

use clap::Parser;
use formgen_core::config::{InvocationParams, DEFAULT_OUTPUT, DEFAULT_TEMPLATE};

#[derive(Parser)]
#[command(
    name = "formgen",
    about = "Generates test cases for a type-erased interface from a form",
    version
)]
struct Cli {
    /// Namespace containing the interface
    #[arg(long, num_args = 0..=1, default_value = "", default_missing_value = "")]
    namespace_name: String,

    /// Name of the interface
    #[arg(long)]
    class_name: String,

    /// Form containing templates for the test cases
    #[arg(
        long,
        num_args = 0..=1,
        default_value = DEFAULT_TEMPLATE,
        default_missing_value = DEFAULT_TEMPLATE
    )]
    form: PathBuf,

    /// Source file receiving the generated unit tests
    #[arg(
        long,
        num_args = 0..=1,
        default_value = DEFAULT_OUTPUT,
        default_missing_value = DEFAULT_OUTPUT
    )]
    test_file: PathBuf,

    /// Generate tests for small and large objects (uses the sbo_ form)
    #[arg(long)]
    sbo: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Do not print a summary after generating
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn invocation_params(&self) -> InvocationParams {
        InvocationParams {
            namespace: self.namespace_name.clone(),
            class_name: self.class_name.clone(),
            template_path: self.form.clone(),
            output_path: self.test_file.clone(),
            sbo: self.sbo,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    generate::run(&cli.invocation_params(), cli.quiet)
}
