//! Module checking.
//!
//! Two passes over the parsed module:
//! 1. **Declarations**: every `def` and `extern` signature is resolved and
//!    bound in the root scope, so bodies may call functions declared later.
//! 2. **Bodies**: each function body is checked against its signature,
//!    producing a new tree in which every expression has a type and every
//!    implicit conversion is an explicit `Convert` node.
//!
//! Errors never stop the walk. A failing expression gets `Type::Error`,
//! which every later rule accepts silently.

mod expr;
mod item;

use arx_diagnostic::Diagnostic;
use arx_ir::{Module, ParsedType, Type};
use tracing::debug;

use crate::env::Scope;
use crate::suggest::closest;
use crate::SemanticError;

/// Result of checking a module.
#[derive(Clone, Debug)]
pub struct TypeCheckOutput {
    /// The annotated module. When `errors` is non-empty it still has every
    /// slot filled, using `Type::Error` where checking failed.
    pub module: Module,
    /// In the order found.
    pub errors: Vec<SemanticError>,
}

impl TypeCheckOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors.iter().map(SemanticError::to_diagnostic).collect()
    }
}

/// Checker state for one module.
pub(crate) struct Checker {
    /// Every function and extern, by name.
    globals: Scope,
    errors: Vec<SemanticError>,
    /// Declared return type of the function being checked; `None` for a
    /// top-level expression.
    ret: Option<Type>,
    /// Whether the expression about to be checked is the function's
    /// result. Consumed by every `check_expr`.
    in_tail: bool,
}

impl Checker {
    fn new() -> Self {
        Checker {
            globals: Scope::new(),
            errors: Vec::new(),
            ret: None,
            in_tail: false,
        }
    }

    #[inline]
    pub(crate) fn report(&mut self, error: SemanticError) {
        debug!(code = %error.code, span = ?error.span, "{}", error.message);
        self.errors.push(error);
    }

    /// Resolve an annotation, defaulting to `f64` when absent.
    pub(crate) fn resolve_or_default(&mut self, ty: Option<&ParsedType>) -> Type {
        ty.map_or(Type::DEFAULT_SCALAR, |ty| self.resolve_type(ty))
    }

    /// Resolve a written type name, reporting `E2008` if unknown.
    pub(crate) fn resolve_type(&mut self, ty: &ParsedType) -> Type {
        if let Some(resolved) = Type::from_name(ty.name.as_str()) {
            return resolved;
        }
        let similar = closest(ty.name.as_str(), Type::NAMES);
        self.report(SemanticError::unknown_type(ty.span, ty.name.as_str(), similar));
        Type::Error
    }
}

/// Check a parsed module.
#[tracing::instrument(level = "debug", skip_all, fields(items = module.items.len()))]
pub fn check_module(module: &Module) -> TypeCheckOutput {
    let mut checker = Checker::new();
    let signatures = checker.declare_items(module);
    let module = checker.check_items(module, signatures);
    debug!(errors = checker.errors.len(), "type check complete");
    TypeCheckOutput {
        module,
        errors: checker.errors,
    }
}
