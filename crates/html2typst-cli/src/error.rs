use std::io;
use std::path::PathBuf;

/// Failures of the command-line front end. Conversion itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    ReadInput { path: PathBuf, source: io::Error },
    #[error("cannot read standard input: {0}")]
    ReadStdin(#[source] io::Error),
    #[error("cannot write {}: {source}", path.display())]
    WriteOutput { path: PathBuf, source: io::Error },
    #[error("cannot write standard output: {0}")]
    WriteStdout(#[source] io::Error),
}
