//! Invocation parameters and their resolution into a [`GenerationConfig`].
//!
//! Resolution is pure: it validates the class name, applies the SBO template rule and
//! builds the [`SubstitutionMap`]. Nothing here touches the filesystem.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{FormgenError, Result};
use crate::substitution::SubstitutionMap;

/// Template used when `--form` is not given.
pub const DEFAULT_TEMPLATE: &str = "interface_test.form";

/// Output used when `--test-file` is not given.
pub const DEFAULT_OUTPUT: &str = "interface_test.cpp";

/// Prefix applied to the template file name in SBO mode.
pub const SBO_PREFIX: &str = "sbo_";

/// Parameters of a single invocation, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationParams {
    pub namespace: String,
    pub class_name: String,
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    /// Select the small-buffer-optimization variant of the template.
    pub sbo: bool,
}

impl InvocationParams {
    /// Parameters with every optional field at its default.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            namespace: String::new(),
            class_name: class_name.into(),
            template_path: PathBuf::from(DEFAULT_TEMPLATE),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            sbo: false,
        }
    }

    /// Validate the parameters and derive the paths and substitutions to use.
    pub fn resolve(&self) -> Result<GenerationConfig> {
        if self.class_name.is_empty() {
            return Err(FormgenError::MissingClassName);
        }

        let template_path = if self.sbo {
            sbo_template_path(&self.template_path)?
        } else {
            self.template_path.clone()
        };

        tracing::debug!(
            "resolved template {} -> output {} (sbo: {})",
            template_path.display(),
            self.output_path.display(),
            self.sbo
        );

        Ok(GenerationConfig {
            template_path,
            output_path: self.output_path.clone(),
            substitutions: SubstitutionMap::new(&self.class_name, &self.namespace),
        })
    }
}

/// Fully resolved inputs for one expansion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub substitutions: SubstitutionMap,
}

/// Prefix the file name of `path` with `sbo_`, leaving the directory part untouched.
///
/// `dir/interface_test.form` becomes `dir/sbo_interface_test.form`. Paths without a file
/// name component (`""`, `".."`, `"/"`, `"forms/"`, `"forms/."`) are rejected.
pub fn sbo_template_path(path: &Path) -> Result<PathBuf> {
    let no_file_name = || FormgenError::NoTemplateFileName {
        path: path.to_path_buf(),
    };

    // `Path::file_name` skips a trailing separator or `.`, which would prefix the directory.
    if names_directory(path) {
        return Err(no_file_name());
    }
    let file_name = path.file_name().ok_or_else(no_file_name)?;

    let mut prefixed = OsString::from(SBO_PREFIX);
    prefixed.push(file_name);
    Ok(path.with_file_name(prefixed))
}

fn names_directory(path: &Path) -> bool {
    let is_sep = |b: u8| std::path::is_separator(b as char);
    match path.as_os_str().as_encoded_bytes() {
        [.., last] if is_sep(*last) => true,
        [.., sep, b'.'] if is_sep(*sep) => true,
        _ => false,
    }
}
