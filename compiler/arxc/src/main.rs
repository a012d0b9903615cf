//! Arx Compiler CLI

use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use arxc::cli::{parse_args, Command, Input, USAGE};
use arxc::{CompileOptions, DriverError, Session};

fn main() -> ExitCode {
    arxc::tracing_setup::init();

    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!();
            eprint!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match command {
        Command::Help => {
            print!("{USAGE}");
            ExitCode::SUCCESS
        }
        Command::Version => {
            println!("arxc {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Command::Explain(code) => {
            println!("{code} ({} error): {}", code.category(), code.description());
            ExitCode::SUCCESS
        }
        Command::Compile { input, options } => match compile(&input, options) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(error) => {
                eprintln!("error: {error}");
                ExitCode::FAILURE
            }
        },
    }
}

/// Compile one input. `Ok(false)` means the program had errors, which have
/// already been reported.
fn compile(input: &Input, options: CompileOptions) -> Result<bool, DriverError> {
    let source = input.read()?;
    let session = Session::new(options);
    let output = session.compile(&source);

    let mut stdout = io::stdout().lock();
    session.write_artifacts(&output, &mut stdout)?;
    stdout.flush()?;

    if output.has_errors() {
        let stderr = io::stderr();
        let is_tty = stderr.is_terminal();
        session.report(&output, &source, &input.display_name(), stderr.lock(), is_tty);
        return Ok(false);
    }
    Ok(true)
}
