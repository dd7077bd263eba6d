use anyhow::{Context, Result};
use literate::cli::{Cli, parse_args};
use literate::config::ConfigLoader;
use literate::processor::{OutputWriter, Processor};
use literate::utils::path::{PathFilter, expand_paths};
use literate::Diagnostic;
use std::io::{self, Read, Write};
use std::path::Path;

fn main() {
    let cli = parse_args();
    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when some inputs failed but the rest were written.
fn run(cli: &Cli) -> Result<bool> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let config = ConfigLoader::new()
        .load(&cwd, cli.config.as_deref())?
        .merge_with(&cli.config_overrides())
        .resolve();
    let processor = Processor::new(config.convert_options());

    if cli.reads_stdin() {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read stdin")?;
        let source = String::from_utf8_lossy(&bytes);

        let conversion = processor.process_source(&source)?;
        report_diagnostics(Path::new("<stdin>"), &conversion.diagnostics);

        let mut stdout = io::stdout().lock();
        stdout
            .write_all(conversion.document.as_bytes())
            .context("Failed to write to stdout")?;
        stdout.flush().context("Failed to write to stdout")?;
        return Ok(true);
    }

    let filter = PathFilter {
        extensions: config.extensions.clone(),
        respect_gitignore: config.respect_gitignore,
    };
    let files = expand_paths(&cli.paths, &filter);
    if files.is_empty() {
        eprintln!("No files found matching the provided patterns.");
        return Ok(true);
    }

    if cli.verbose {
        eprintln!("Converting {} file(s)...", files.len());
    }

    let results = processor.process_files(&files, cli.threads)?;

    let mut writer = OutputWriter::new(cli.out_dir.clone(), cwd, cli.verbose);
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    let mut failed = 0;

    for (path, result) in &results {
        match result {
            Ok(processed_file) => {
                report_diagnostics(path, &processed_file.diagnostics);
                writer.write_file(processed_file, &mut stdout)?;
            }
            Err(err) => {
                eprintln!("Error processing {}: {:#}", path.display(), err);
                failed += 1;
            }
        }
    }
    stdout.flush().context("Failed to write to stdout")?;

    writer.print_summary(results.len(), failed);
    Ok(failed == 0)
}

fn report_diagnostics(path: &Path, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("Warning: {}:{}", path.display(), diagnostic);
    }
}
