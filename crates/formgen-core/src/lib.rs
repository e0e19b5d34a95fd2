//! Core library for formgen.
//!
//! Generates a source file from a form by literal placeholder substitution:
//! - [`config`] turns invocation parameters into a resolved [`config::GenerationConfig`],
//!   selecting the `sbo_` form variant when asked to
//! - [`substitution`] holds the ordered token map applied to each line
//! - [`expander`] streams the form into the output file line by line
//!
//! The binary crate `formgen` wraps this with a command-line interface.

pub mod config;
pub mod error;
pub mod expander;
pub mod substitution;
