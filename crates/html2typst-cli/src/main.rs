//! html2typst CLI - convert HTML files to Typst.

mod error;

use clap::Parser;
use html2typst::{ConvertOptions, FidelityWarning, Severity};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "html2typst")]
#[command(author, version, about = "Convert HTML to Typst markup", long_about = None)]
struct Cli {
    /// Input HTML file (omit or use - for stdin)
    input: Option<PathBuf>,

    /// Output file (omit or use - for stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not announce semantic sections with `// HEADER` style comments
    #[arg(long)]
    no_section_comments: bool,

    /// Do not emit `// Video: src` style comments for media
    #[arg(long)]
    no_media_comments: bool,

    /// Do not emit a `#set document(...)` preamble from the HTML head
    #[arg(long)]
    no_metadata: bool,

    /// Log every conversion warning
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            section_comments: !self.no_section_comments,
            media_comments: !self.no_media_comments,
            document_metadata: !self.no_metadata,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let html = read_input(cli.input.as_deref())?;
    let result = html2typst::convert_with_options(&html, &cli.options());

    for warning in &result.warnings {
        log_warning(warning);
    }

    let mut typst = result.value;
    if !typst.is_empty() {
        typst.push('\n');
    }
    write_output(cli.output.as_deref(), &typst)
}

fn is_stdio(path: Option<&Path>) -> bool {
    path.is_none_or(|p| p.as_os_str() == "-")
}

fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if !is_stdio(Some(path)) => {
            fs::read_to_string(path).map_err(|source| CliError::ReadInput {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(CliError::ReadStdin)?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, typst: &str) -> Result<(), CliError> {
    match path {
        Some(path) if !is_stdio(Some(path)) => {
            fs::write(path, typst).map_err(|source| CliError::WriteOutput {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(typst.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(CliError::WriteStdout)
        }
    }
}

fn log_warning(warning: &FidelityWarning) {
    match warning.severity {
        Severity::Info => tracing::debug!(kind = ?warning.kind, "{}", warning.message),
        Severity::Minor | Severity::Major => {
            tracing::warn!(kind = ?warning.kind, "{}", warning.message)
        }
    }
}
