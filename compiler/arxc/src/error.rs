//! Driver errors: everything that can go wrong outside the compiler proper.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("could not read `{}`: {source}", path.display())]
    ReadFile { path: PathBuf, source: io::Error },

    #[error("could not read standard input: {0}")]
    ReadStdin(#[source] io::Error),

    #[error("could not write output: {0}")]
    Write(#[from] io::Error),

    #[error("unknown option `{0}`")]
    UnknownOption(String),

    #[error("invalid color mode `{0}` (expected auto, always or never)")]
    InvalidColor(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("more than one input given (`{first}` and `{second}`)")]
    ExtraInput { first: String, second: String },

    #[error("no input file given")]
    MissingInput,

    #[error("unknown error code `{0}`")]
    UnknownCode(String),
}
