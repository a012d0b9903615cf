//! Compilation sessions.

use std::io::Write;

use arx_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use arx_diagnostic::Diagnostic;
use arx_ir::{Module, Token};
use arx_lower::ir;
use tracing::debug;

use crate::DriverError;

/// What to print and how far to go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub show_tokens: bool,
    pub show_ast: bool,
    pub show_ir: bool,
    /// Stop after semantic analysis.
    pub check_only: bool,
    pub color: ColorMode,
}

/// Pipeline stages, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Parse,
    Check,
    Lower,
}

/// Everything one compilation produced.
///
/// Artifacts from stages that ran are kept even when a later stage failed.
#[derive(Debug, Default)]
pub struct CompileOutput {
    /// Filled only when `show_tokens` is set.
    pub tokens: Option<Vec<Token>>,
    /// The annotated module once analysis ran, otherwise the parsed one.
    pub ast: Option<Module>,
    pub ir: Option<ir::Module>,
    /// In the order the stages reported them.
    pub diagnostics: Vec<Diagnostic>,
    /// The stage that stopped the pipeline.
    pub failed: Option<Stage>,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }
}

/// Driver-owned compilation state.
///
/// Each [`compile`](Self::compile) call is an independent unit; nothing is
/// shared between calls except the options.
#[derive(Clone, Debug, Default)]
pub struct Session {
    options: CompileOptions,
}

impl Session {
    pub fn new(options: CompileOptions) -> Self {
        Session { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Run the pipeline, stopping at the first stage that reports errors.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
    pub fn compile(&self, source: &str) -> CompileOutput {
        let mut output = CompileOutput::default();

        let tokens = arx_lexer::lex(source);
        debug!(tokens = tokens.len(), "lexed");
        let parsed = arx_parse::parse(&tokens);
        if self.options.show_tokens {
            output.tokens = Some(tokens);
        }
        if parsed.has_errors() {
            output.diagnostics = parsed.diagnostics();
            output.ast = Some(parsed.module);
            output.failed = Some(Stage::Parse);
            return output;
        }

        let checked = arx_types::check_module(&parsed.module);
        if checked.has_errors() {
            output.diagnostics = checked.diagnostics();
            output.ast = Some(checked.module);
            output.failed = Some(Stage::Check);
            return output;
        }
        if self.options.check_only {
            output.ast = Some(checked.module);
            return output;
        }

        match arx_lower::lower_module(&checked.module) {
            Ok(module) => output.ir = Some(module),
            Err(error) => {
                output.diagnostics.push(error.to_diagnostic());
                output.failed = Some(Stage::Lower);
            }
        }
        output.ast = Some(checked.module);
        output
    }

    /// Print the requested artifacts: tokens, then AST, then IR.
    pub fn write_artifacts(
        &self,
        output: &CompileOutput,
        out: &mut impl Write,
    ) -> Result<(), DriverError> {
        if let (true, Some(tokens)) = (self.options.show_tokens, &output.tokens) {
            for token in tokens {
                writeln!(out, "{}\t{:?}\t{}", token.pos, token.tag(), token.kind)?;
            }
        }
        if let (true, Some(ast)) = (self.options.show_ast, &output.ast) {
            write!(out, "{ast}")?;
        }
        if let (true, Some(module)) = (self.options.show_ir, &output.ir) {
            write!(out, "{module}")?;
        }
        Ok(())
    }

    /// Render diagnostics with `path:line:col` locations and a summary line.
    pub fn report(
        &self,
        output: &CompileOutput,
        source: &str,
        path: &str,
        out: impl Write,
        is_tty: bool,
    ) {
        let mut emitter = TerminalEmitter::with_color_mode(out, self.options.color, is_tty)
            .with_source(source)
            .with_file_path(path);
        emitter.emit_all(&output.diagnostics);
        let errors = output.error_count();
        emitter.emit_summary(errors, output.diagnostics.len() - errors);
        emitter.flush();
    }
}
