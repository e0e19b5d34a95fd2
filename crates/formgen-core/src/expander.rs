//! Line-by-line expansion of a form into the generated source file.
//!
//! [`expand_stream`] is the I/O-agnostic core. [`expand_file`] opens the template, then
//! the output, and maps every failure onto a [`FormgenError`]. If streaming fails after
//! the output was created, the partial file is removed before the error is returned.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::GenerationConfig;
use crate::error::{FormgenError, Result};
use crate::substitution::SubstitutionMap;

/// Summary of a completed expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionReport {
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    /// Lines read from the template (equal to lines written).
    pub lines: usize,
    /// Placeholder occurrences replaced across all lines.
    pub substitutions: usize,
}

/// Counts produced by [`expand_stream`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub lines: usize,
    pub substitutions: usize,
}

/// Where a streaming failure happened.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("failed to read template line")]
    Read(#[source] io::Error),

    #[error("failed to write output line")]
    Write(#[source] io::Error),
}

/// Copy `reader` to `writer` line by line, substituting tokens on each line.
///
/// Line terminators are kept exactly as read; a final line without `\n` is written
/// without one. The writer is flushed before returning.
pub fn expand_stream<R, W>(
    mut reader: R,
    mut writer: W,
    map: &SubstitutionMap,
) -> std::result::Result<StreamStats, StreamError>
where
    R: BufRead,
    W: Write,
{
    let mut stats = StreamStats::default();
    let mut line = Vec::new();
    let mut out = Vec::new();

    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(StreamError::Read)?;
        if read == 0 {
            break;
        }

        out.clear();
        stats.substitutions += map.apply_into(&line, &mut out);
        writer.write_all(&out).map_err(StreamError::Write)?;
        stats.lines += 1;
    }

    writer.flush().map_err(StreamError::Write)?;
    Ok(stats)
}

/// Expand the template named by `config` into its output path.
///
/// The template must be a regular file; anything else is reported as not found before
/// the output is created, so an existing output is left untouched.
pub fn expand_file(config: &GenerationConfig) -> Result<ExpansionReport> {
    let template_path = &config.template_path;
    let output_path = &config.output_path;

    let template = open_template(template_path)?;

    let output = File::create(output_path).map_err(|e| FormgenError::OutputNotWritable {
        path: output_path.clone(),
        source: e,
    })?;

    tracing::info!(
        "expanding {} into {}",
        template_path.display(),
        output_path.display()
    );

    expand_opened(config, BufReader::new(template), BufWriter::new(output))
}

fn open_template(path: &Path) -> Result<File> {
    let not_found = |source| FormgenError::TemplateNotFound {
        path: path.to_path_buf(),
        source,
    };

    let template = File::open(path).map_err(not_found)?;
    let metadata = template.metadata().map_err(not_found)?;
    if !metadata.is_file() {
        return Err(not_found(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    Ok(template)
}

/// Stream an already opened template into the already created output.
///
/// On failure the output file is removed before the error is returned.
fn expand_opened<R, W>(config: &GenerationConfig, reader: R, writer: W) -> Result<ExpansionReport>
where
    R: BufRead,
    W: Write,
{
    let template_path = &config.template_path;
    let output_path = &config.output_path;

    // The writer must be closed before the output can be discarded.
    let result = expand_stream(reader, writer, &config.substitutions);

    match result {
        Ok(stats) => {
            tracing::info!(
                "wrote {} lines ({} substitutions)",
                stats.lines,
                stats.substitutions
            );
            Ok(ExpansionReport {
                template_path: template_path.clone(),
                output_path: output_path.clone(),
                lines: stats.lines,
                substitutions: stats.substitutions,
            })
        }
        Err(err) => {
            discard_partial_output(output_path);
            Err(match err {
                StreamError::Read(source) => FormgenError::ReadFailed {
                    path: template_path.clone(),
                    source,
                },
                StreamError::Write(source) => FormgenError::WriteFailed {
                    path: output_path.clone(),
                    source,
                },
            })
        }
    }
}

fn discard_partial_output(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::warn!(
            "could not remove partial output {}: {e}",
            path.display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InvocationParams;

    fn expand_str(template: &str, map: &SubstitutionMap) -> (String, StreamStats) {
        let mut out = Vec::new();
        let stats = expand_stream(template.as_bytes(), &mut out, map).unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingReader;

    impl io::Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device lost"))
        }
    }

    /// Config pointing at a real template and an output that already exists on disk.
    fn config_with_existing_output(dir: &Path) -> GenerationConfig {
        let template = dir.join("t.form");
        let output = dir.join("t.cpp");
        std::fs::write(&template, "%class_name%\n").unwrap();
        std::fs::write(&output, "half written").unwrap();

        let mut params = InvocationParams::new("W");
        params.template_path = template;
        params.output_path = output;
        params.resolve().unwrap()
    }

    #[test]
    fn test_stream_scenario() {
        let map = SubstitutionMap::new("Widget", "app");
        let (out, stats) = expand_str("class %class_name% {}; // %namespace_name%\n", &map);
        assert_eq!(out, "class Widget {}; // app\n");
        assert_eq!(stats.lines, 1);
        assert_eq!(stats.substitutions, 2);
    }

    #[test]
    fn test_stream_empty_template() {
        let map = SubstitutionMap::new("Widget", "app");
        let (out, stats) = expand_str("", &map);
        assert_eq!(out, "");
        assert_eq!(stats, StreamStats::default());
    }

    #[test]
    fn test_stream_preserves_terminators() {
        let map = SubstitutionMap::new("Widget", "app");
        let (out, stats) = expand_str("a %class_name%\r\n\nlast %namespace_name%", &map);
        assert_eq!(out, "a Widget\r\n\nlast app");
        assert_eq!(stats.lines, 3);
    }

    #[test]
    fn test_stream_line_count_matches_template() {
        let map = SubstitutionMap::new("Fooable", "Basic");
        let template = "namespace\n{\n    using %namespace_name%::%class_name%;\n}\n";
        let (out, stats) = expand_str(template, &map);
        assert_eq!(stats.lines, template.lines().count());
        assert_eq!(out.lines().count(), template.lines().count());
    }

    #[test]
    fn test_stream_without_tokens_copies_through() {
        let map = SubstitutionMap::new("Widget", "app");
        let template = "#include <gtest/gtest.h>\n\nint main() {}\n";
        let (out, stats) = expand_str(template, &map);
        assert_eq!(out, template);
        assert_eq!(stats.substitutions, 0);
    }

    #[test]
    fn test_stream_reports_write_failure() {
        let map = SubstitutionMap::new("Widget", "app");
        let err = expand_stream(&b"line\n"[..], FailingWriter, &map).unwrap_err();
        assert!(matches!(err, StreamError::Write(_)));
    }

    #[test]
    fn test_expand_file_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("interface_test.form");
        std::fs::write(&template, "using %namespace_name%::%class_name%;\n").unwrap();

        let mut params = InvocationParams::new("Fooable");
        params.namespace = "Basic".into();
        params.template_path = template.clone();
        params.output_path = dir.path().join("interface_test.cpp");

        let report = expand_file(&params.resolve().unwrap()).unwrap();
        assert_eq!(report.lines, 1);
        assert_eq!(report.substitutions, 2);
        assert_eq!(report.template_path, template);

        let written = std::fs::read_to_string(&report.output_path).unwrap();
        assert_eq!(written, "using Basic::Fooable;\n");
    }

    #[test]
    fn test_expand_file_truncates_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("t.form");
        let output = dir.path().join("t.cpp");
        std::fs::write(&template, "%class_name%\n").unwrap();
        std::fs::write(&output, "stale content that is longer\n").unwrap();

        let mut params = InvocationParams::new("W");
        params.template_path = template;
        params.output_path = output.clone();
        expand_file(&params.resolve().unwrap()).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "W\n");
    }

    #[test]
    fn test_expand_file_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("t.form");
        std::fs::write(&template, "a %class_name%\nb %namespace_name%\n").unwrap();

        let mut params = InvocationParams::new("Fooable");
        params.template_path = template;
        params.output_path = dir.path().join("t.cpp");
        let config = params.resolve().unwrap();

        expand_file(&config).unwrap();
        let first = std::fs::read(&config.output_path).unwrap();
        expand_file(&config).unwrap();
        let second = std::fs::read(&config.output_path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_expand_file_missing_template_leaves_output_alone() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("t.cpp");

        let mut params = InvocationParams::new("W");
        params.template_path = dir.path().join("t.form");
        params.output_path = output.clone();
        params.sbo = true;

        let err = expand_file(&params.resolve().unwrap()).unwrap_err();
        match err {
            FormgenError::TemplateNotFound { path, .. } => {
                assert_eq!(path, dir.path().join("sbo_t.form"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!output.exists());
    }

    #[test]
    fn test_expand_file_unwritable_output() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("t.form");
        std::fs::write(&template, "%class_name%\n").unwrap();

        let mut params = InvocationParams::new("W");
        params.template_path = template;
        params.output_path = dir.path().join("missing_dir").join("t.cpp");

        let err = expand_file(&params.resolve().unwrap()).unwrap_err();
        assert!(matches!(err, FormgenError::OutputNotWritable { .. }));
    }

    #[test]
    fn test_expand_file_directory_template_keeps_output() {
        let dir = tempfile::tempdir().unwrap();
        let form_dir = dir.path().join("form_dir");
        std::fs::create_dir(&form_dir).unwrap();
        let output = dir.path().join("t.cpp");
        std::fs::write(&output, "existing content\n").unwrap();

        let mut params = InvocationParams::new("W");
        params.template_path = form_dir.clone();
        params.output_path = output.clone();

        let err = expand_file(&params.resolve().unwrap()).unwrap_err();
        match err {
            FormgenError::TemplateNotFound { path, .. } => assert_eq!(path, form_dir),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "existing content\n"
        );
    }

    #[test]
    fn test_read_failure_discards_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_existing_output(dir.path());

        let err = expand_opened(&config, BufReader::new(FailingReader), Vec::new()).unwrap_err();
        match err {
            FormgenError::ReadFailed { path, .. } => assert_eq!(path, config.template_path),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!config.output_path.exists());
    }

    #[test]
    fn test_write_failure_discards_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_existing_output(dir.path());

        let err = expand_opened(&config, &b"a\nb\n"[..], FailingWriter).unwrap_err();
        match err {
            FormgenError::WriteFailed { path, .. } => assert_eq!(path, config.output_path),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!config.output_path.exists());
    }

    #[test]
    fn test_stream_error_messages() {
        let err = StreamError::Write(io::Error::other("disk full"));
        assert_eq!(err.to_string(), "failed to write output line");
        assert!(std::error::Error::source(&err).is_some());
    }
}
