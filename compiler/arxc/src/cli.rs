//! Command-line parsing.
//!
//! ```text
//! arxc [options] <file.arx | ->
//! arxc --explain <CODE>
//! ```

use std::io::Read;
use std::path::PathBuf;

use arx_diagnostic::emitter::ColorMode;
use arx_diagnostic::ErrorCode;

use crate::{CompileOptions, DriverError};

/// What the binary was asked to do.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Compile {
        input: Input,
        options: CompileOptions,
    },
    Explain(ErrorCode),
    Help,
    Version,
}

/// Where source text comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    File(PathBuf),
    Stdin,
}

impl Input {
    /// Name shown in diagnostic locations.
    pub fn display_name(&self) -> String {
        match self {
            Input::File(path) => path.display().to_string(),
            Input::Stdin => "<stdin>".to_owned(),
        }
    }

    pub fn read(&self) -> Result<String, DriverError> {
        match self {
            Input::File(path) => {
                std::fs::read_to_string(path).map_err(|source| DriverError::ReadFile {
                    path: path.clone(),
                    source,
                })
            }
            Input::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .map_err(DriverError::ReadStdin)?;
                Ok(text)
            }
        }
    }
}

/// Parse arguments, excluding the program name.
pub fn parse_args<I>(args: I) -> Result<Command, DriverError>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut options = CompileOptions::default();
    let mut input: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "--explain" => {
                let code = args.next().ok_or(DriverError::MissingArgument("--explain"))?;
                return explain(&code);
            }
            "--show-tokens" => options.show_tokens = true,
            "--show-ast" => options.show_ast = true,
            "--show-ir" => options.show_ir = true,
            "--check" => options.check_only = true,
            "-" => set_input(&mut input, arg)?,
            _ => {
                if let Some(code) = arg.strip_prefix("--explain=") {
                    return explain(code);
                }
                if let Some(mode) = arg.strip_prefix("--color=") {
                    options.color = ColorMode::from_flag(mode)
                        .ok_or_else(|| DriverError::InvalidColor(mode.to_owned()))?;
                } else if arg.starts_with('-') {
                    return Err(DriverError::UnknownOption(arg));
                } else {
                    set_input(&mut input, arg)?;
                }
            }
        }
    }

    let input = match input.as_deref() {
        None => return Err(DriverError::MissingInput),
        Some("-") => Input::Stdin,
        Some(path) => Input::File(PathBuf::from(path)),
    };
    Ok(Command::Compile { input, options })
}

fn set_input(slot: &mut Option<String>, arg: String) -> Result<(), DriverError> {
    match slot {
        Some(first) => Err(DriverError::ExtraInput {
            first: first.clone(),
            second: arg,
        }),
        None => {
            *slot = Some(arg);
            Ok(())
        }
    }
}

fn explain(code: &str) -> Result<Command, DriverError> {
    ErrorCode::from_code_str(code)
        .map(Command::Explain)
        .ok_or_else(|| DriverError::UnknownCode(code.to_owned()))
}

pub const USAGE: &str = "\
Arx compiler

Usage: arxc [options] <file.arx | ->
       arxc --explain <CODE>

Options:
  --show-tokens             Print the token stream
  --show-ast                Print the checked AST
  --show-ir                 Print the lowered IR
  --check                   Stop after semantic analysis
  --color=<auto|always|never>
                            Color diagnostics (default: auto)
  --explain <CODE>          Describe an error code (e.g. E2004)
  -h, --help                Show this help message
  -V, --version             Show version information

Environment:
  ARX_LOG                   Log filter, e.g. `arx_lower=trace` (falls back to RUST_LOG)
  ARX_LOG_TREE=1            Print logs as an indented span tree
";
