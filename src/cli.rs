use crate::config::Config;
use crate::models::options::UnterminatedPolicy;
use clap::Parser;
use std::path::PathBuf;

/// Command-line interface for the literate tool
#[derive(Parser, Debug)]
#[command(
    name = "literate",
    version,
    about = "Turn TypeScript and JavaScript sources into literate Markdown.",
    long_about = "Turn TypeScript and JavaScript sources into literate Markdown.\n\n\
                  Block comments become prose paragraphs and the code between them \
                  becomes fenced code blocks. With no paths (or `-`) the source is \
                  read from stdin and the document is written to stdout."
)]
pub struct Cli {
    /// Files, directories or glob patterns to convert
    pub paths: Vec<String>,

    /// Write each document to DIR, mirroring the input layout, instead of stdout
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Info string written after each opening code fence
    #[arg(long, value_name = "LANG")]
    pub fence_lang: Option<String>,

    /// Keep an unterminated template literal as code and warn instead of failing
    #[arg(long, default_value_t = false)]
    pub lenient: bool,

    /// Configuration file applied on top of discovered ones
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable .gitignore file processing
    #[arg(long = "no-gitignore", default_value_t = false)]
    pub no_gitignore: bool,

    /// Number of worker threads (0 = one per CPU)
    #[arg(short = 'j', long, default_value_t = 0)]
    pub threads: usize,

    /// Report progress on stderr
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    /// Whether the source comes from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.paths.is_empty() || (self.paths.len() == 1 && self.paths[0] == "-")
    }

    /// Settings given on the command line, as the topmost config layer.
    pub fn config_overrides(&self) -> Config {
        Config {
            fence_lang: self.fence_lang.clone(),
            unterminated: self.lenient.then_some(UnterminatedPolicy::Truncate),
            extensions: None,
            respect_gitignore: self.no_gitignore.then_some(false),
        }
    }
}

/// Parse CLI arguments and return configuration
pub fn parse_args() -> Cli {
    Cli::parse()
}
