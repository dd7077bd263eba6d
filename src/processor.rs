use crate::error::LiterateResult;
use crate::models::diagnostic::Diagnostic;
use crate::models::options::ConvertOptions;
use crate::output::emitter::Emitter;
use crate::scanner::Scanner;
use crate::segmenter::Segmenter;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Result of converting one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub document: String,
    /// Blocks written to the document
    pub blocks: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Convert `source` and write the document to `writer`.
///
/// Returns the number of blocks written and any warnings.
pub fn convert_to_writer<W: Write>(
    source: &str,
    options: &ConvertOptions,
    writer: W,
) -> LiterateResult<(usize, Vec<Diagnostic>)> {
    let mut scanner = Scanner::new(source);
    let emitter = Emitter::new(writer, options.fence_lang.as_str());
    let mut segmenter = Segmenter::new(emitter, options.unterminated);
    segmenter.run(&mut scanner)?;

    let (emitter, diagnostics) = segmenter.into_parts();
    let blocks = emitter.blocks_written();
    emitter.into_inner().flush()?;
    Ok((blocks, diagnostics))
}

/// Convert `source` into an in-memory document.
pub fn convert(source: &str, options: &ConvertOptions) -> LiterateResult<Conversion> {
    let mut buffer = Vec::new();
    let (blocks, diagnostics) = convert_to_writer(source, options, &mut buffer)?;
    Ok(Conversion {
        // Every fragment is a slice of `source`, so the output is valid UTF-8.
        document: String::from_utf8_lossy(&buffer).into_owned(),
        blocks,
        diagnostics,
    })
}

pub struct Processor {
    options: ConvertOptions,
}

impl Default for Processor {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

impl Processor {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert in-memory source text
    pub fn process_source(&self, source: &str) -> Result<Conversion> {
        Ok(convert(source, &self.options)?)
    }

    /// Process a single file
    pub fn process_file(&self, path: &Path) -> Result<ProcessedFile> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let conversion = convert(&source, &self.options)
            .with_context(|| format!("Failed to convert file: {}", path.display()))?;

        Ok(ProcessedFile {
            path: path.to_path_buf(),
            document: conversion.document,
            blocks: conversion.blocks,
            diagnostics: conversion.diagnostics,
        })
    }

    /// Process files in parallel; results keep the order of `paths`.
    ///
    /// `threads == 0` uses one thread per CPU.
    pub fn process_files(
        &self,
        paths: &[PathBuf],
        threads: usize,
    ) -> Result<Vec<(PathBuf, Result<ProcessedFile>)>> {
        let threads = if threads == 0 {
            num_cpus::get()
        } else {
            threads
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to build thread pool")?;

        Ok(pool.install(|| {
            paths
                .par_iter()
                .map(|path| (path.clone(), self.process_file(path)))
                .collect()
        }))
    }
}

#[derive(Debug)]
pub struct ProcessedFile {
    pub path: PathBuf,
    pub document: String,
    pub blocks: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Sends converted documents to stdout or to an output directory.
pub struct OutputWriter {
    out_dir: Option<PathBuf>,
    /// Base that input paths are made relative to under `out_dir`
    base_dir: PathBuf,
    verbose: bool,
    documents_written: usize,
}

impl OutputWriter {
    pub fn new(out_dir: Option<PathBuf>, base_dir: PathBuf, verbose: bool) -> Self {
        Self {
            out_dir,
            base_dir,
            verbose,
            documents_written: 0,
        }
    }

    /// Where `out_dir` mode writes the document for `source_path`: the path
    /// relative to the base directory, with an `.md` extension.
    pub fn output_path(&self, out_dir: &Path, source_path: &Path) -> PathBuf {
        let relative = if source_path.is_relative() {
            Some(source_path)
        } else {
            source_path.strip_prefix(&self.base_dir).ok()
        };
        let relative = relative
            .map(|relative| {
                relative
                    .components()
                    .filter(|component| matches!(component, Component::Normal(_)))
                    .collect::<PathBuf>()
            })
            .filter(|relative| !relative.as_os_str().is_empty())
            .unwrap_or_else(|| {
                source_path
                    .file_name()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("document"))
            });
        out_dir.join(relative).with_extension("md")
    }

    pub fn write_file(&mut self, processed_file: &ProcessedFile, stdout: &mut impl Write) -> Result<()> {
        match &self.out_dir {
            Some(out_dir) => {
                let target = self.output_path(out_dir, &processed_file.path);
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create directory: {}", parent.display())
                    })?;
                }
                std::fs::write(&target, &processed_file.document)
                    .with_context(|| format!("Failed to write file: {}", target.display()))?;

                if self.verbose {
                    eprintln!(
                        "✓ {} -> {} ({} block(s))",
                        processed_file.path.display(),
                        target.display(),
                        processed_file.blocks
                    );
                }
            }
            None => {
                if self.documents_written > 0 {
                    writeln!(stdout).context("Failed to write to stdout")?;
                }
                stdout
                    .write_all(processed_file.document.as_bytes())
                    .context("Failed to write to stdout")?;

                if self.verbose {
                    eprintln!(
                        "✓ {} ({} block(s))",
                        processed_file.path.display(),
                        processed_file.blocks
                    );
                }
            }
        }

        self.documents_written += 1;
        Ok(())
    }

    pub fn print_summary(&self, total_files: usize, failed_files: usize) {
        if !self.verbose {
            return;
        }
        eprintln!(
            "\nSummary: {} files processed, {} converted, {} failed",
            total_files, self.documents_written, failed_files
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LiterateError;
    use crate::models::options::UnterminatedPolicy;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_convert_scenario() {
        let conversion = convert("/* Hello world */\nconst x = 1;", &ConvertOptions::default()).unwrap();
        assert_eq!(
            conversion.document,
            "Hello world\n\n```typescript\nconst x = 1;\n```\n"
        );
        assert_eq!(conversion.blocks, 2);
        assert!(conversion.diagnostics.is_empty());
    }

    #[test]
    fn test_convert_reports_unterminated_template() {
        let error = convert("`${", &ConvertOptions::default()).unwrap_err();
        assert!(matches!(error, LiterateError::UnterminatedTemplate { line: 1, column: 1, .. }));
    }

    #[test]
    fn test_truncate_policy_keeps_output() {
        let options = ConvertOptions {
            unterminated: UnterminatedPolicy::Truncate,
            ..Default::default()
        };
        let conversion = convert("/* a */\n`${x", &options).unwrap();
        assert_eq!(conversion.document, "a\n\n```typescript\n`${x\n```\n");
        assert_eq!(conversion.diagnostics.len(), 1);
    }

    #[test]
    fn test_process_source_fails_without_partial_document() {
        let processor = Processor::default();
        let error = processor
            .process_source("/* Intro */\nlet a = 1;\nconst s = `${x")
            .unwrap_err();
        assert!(error.to_string().contains("line 3, column 11"));

        let conversion = processor.process_source("/* Intro */").unwrap();
        assert_eq!(conversion.document, "Intro\n");
    }

    #[test]
    fn test_process_files_keeps_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut paths = Vec::new();
        for i in 0..8 {
            let path = temp_dir.path().join(format!("f{i}.ts"));
            fs::write(&path, format!("/* file {i} */\nlet v{i};")).unwrap();
            paths.push(path);
        }
        paths.push(temp_dir.path().join("missing.ts"));

        let processor = Processor::default();
        let results = processor.process_files(&paths, 4).unwrap();
        assert_eq!(results.len(), 9);
        for (i, (path, result)) in results.iter().take(8).enumerate() {
            assert_eq!(path, &paths[i]);
            let file = result.as_ref().unwrap();
            assert!(file.document.starts_with(&format!("file {i}\n")));
        }
        let error = results[8].1.as_ref().unwrap_err();
        assert!(error.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_output_path_mirrors_relative_layout() {
        let writer = OutputWriter::new(None, PathBuf::from("/project"), false);
        assert_eq!(
            writer.output_path(Path::new("out"), Path::new("/project/src/main.ts")),
            PathBuf::from("out/src/main.md")
        );
        assert_eq!(
            writer.output_path(Path::new("out"), Path::new("/elsewhere/lib.js")),
            PathBuf::from("out/lib.md")
        );
        assert_eq!(
            writer.output_path(Path::new("out"), Path::new("./src/util.ts")),
            PathBuf::from("out/src/util.md")
        );
    }

    #[test]
    fn test_write_to_stdout_separates_documents() {
        let mut writer = OutputWriter::new(None, PathBuf::from("."), false);
        let mut stdout = Vec::new();
        for name in ["a.ts", "b.ts"] {
            let file = ProcessedFile {
                path: PathBuf::from(name),
                document: format!("{name}\n"),
                blocks: 1,
                diagnostics: Vec::new(),
            };
            writer.write_file(&file, &mut stdout).unwrap();
        }
        assert_eq!(String::from_utf8(stdout).unwrap(), "a.ts\n\nb.ts\n");
    }

    #[test]
    fn test_write_to_out_dir() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("docs");
        let mut writer = OutputWriter::new(Some(out_dir.clone()), temp_dir.path().to_path_buf(), false);
        let file = ProcessedFile {
            path: temp_dir.path().join("src").join("app.ts"),
            document: "body\n".to_string(),
            blocks: 1,
            diagnostics: Vec::new(),
        };
        writer.write_file(&file, &mut Vec::<u8>::new()).unwrap();
        let written = fs::read_to_string(out_dir.join("src").join("app.md")).unwrap();
        assert_eq!(written, "body\n");
    }
}
