//! Unified error types for formgen.

use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur while resolving a configuration or expanding a form.
#[derive(Error, Debug)]
pub enum FormgenError {
    // --- Usage ---

    /// `--class-name` was given an empty value.
    #[error("class name must not be empty")]
    MissingClassName,

    /// `--sbo` was requested for a template path that has no file name to prefix.
    #[error("template path '{}' has no file name to prefix with 'sbo_'", path.display())]
    NoTemplateFileName { path: PathBuf },

    // --- Template ---

    /// The template could not be opened for reading.
    #[error("template not found: {}", path.display())]
    TemplateNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the template failed after it was opened.
    #[error("failed to read template {}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // --- Output ---

    /// The output file could not be created or truncated.
    #[error("output not writable: {}", path.display())]
    OutputNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the output failed after it was opened.
    #[error("failed to write output {}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FormgenError {
    /// Whether the error stems from the invocation itself rather than the filesystem.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::MissingClassName | Self::NoTemplateFileName { .. }
        )
    }
}

/// Alias for `Result<T, FormgenError>`.
pub type Result<T> = std::result::Result<T, FormgenError>;
