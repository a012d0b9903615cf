//! Lexical scopes.
//!
//! A [`Scope`] maps names to [`Symbol`]s and chains to its parent. The root
//! scope holds every function and extern of the module; each function body
//! gets a child for its parameters, and `for`/`var` add children of their
//! own. Inner bindings shadow outer ones.

use std::rc::Rc;

use arx_ir::{Name, Span, Type};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::suggest::{edit_distance, similarity_threshold};

/// What a name refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    /// A `def` or `extern`. The symbol's type is the return type.
    Function { params: Rc<[Type]> },
    Param,
    /// The variable of a `for` loop.
    Induction,
    /// A name introduced by `var`.
    Binding,
}

impl SymbolKind {
    pub fn is_function(&self) -> bool {
        matches!(self, SymbolKind::Function { .. })
    }

    pub fn describe(&self) -> &'static str {
        match self {
            SymbolKind::Function { .. } => "function",
            SymbolKind::Param => "parameter",
            SymbolKind::Induction => "loop variable",
            SymbolKind::Binding => "variable",
        }
    }
}

/// A declared name: what it is, its type, and where it was declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub ty: Type,
    pub span: Span,
}

#[derive(Clone, Default)]
struct ScopeInner {
    bindings: FxHashMap<Name, Symbol>,
    parent: Option<Scope>,
}

/// Scope chain.
///
/// Uses `Rc` so creating a child never copies the parent chain.
#[derive(Clone, Default)]
pub struct Scope(Rc<ScopeInner>);

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    /// Create a child scope.
    #[must_use]
    pub fn child(&self) -> Self {
        Scope(Rc::new(ScopeInner {
            bindings: FxHashMap::default(),
            parent: Some(self.clone()),
        }))
    }

    /// Bind a name in this scope, replacing any binding of it here.
    pub fn bind(&mut self, name: Name, symbol: Symbol) {
        Rc::make_mut(&mut self.0).bindings.insert(name, symbol);
    }

    /// Look up a name, searching parent scopes.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.0
            .bindings
            .get(name)
            .or_else(|| self.0.parent.as_ref().and_then(|p| p.lookup(name)))
    }

    /// The binding of `name` in this scope only.
    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.0.bindings.get(name)
    }

    /// Names visible from this scope that satisfy `filter` and are spelled
    /// close to `target`, best match first.
    pub fn find_similar(
        &self,
        target: &str,
        max_results: usize,
        filter: impl Fn(&Symbol) -> bool,
    ) -> Vec<Name> {
        if target.is_empty() || max_results == 0 {
            return Vec::new();
        }
        let threshold = similarity_threshold(target.chars().count());

        let mut seen = FxHashSet::default();
        let mut matches = Vec::new();
        let mut scope = Some(self);
        while let Some(current) = scope {
            for (name, symbol) in &current.0.bindings {
                // Shadowed names were already seen in an inner scope.
                if !seen.insert(name.clone()) || name.as_str() == target || !filter(symbol) {
                    continue;
                }
                if target.len().abs_diff(name.as_str().len()) > threshold {
                    continue;
                }
                let distance = edit_distance(target, name.as_str());
                if distance <= threshold {
                    matches.push((name.clone(), distance));
                }
            }
            scope = current.0.parent.as_ref();
        }

        // Sort by distance, then by name for determinism
        matches.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        matches
            .into_iter()
            .take(max_results)
            .map(|(name, _)| name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn local(ty: Type) -> Symbol {
        Symbol {
            kind: SymbolKind::Binding,
            ty,
            span: Span::DUMMY,
        }
    }

    #[test]
    fn test_child_shadows_parent() {
        let mut root = Scope::new();
        root.bind(Name::new("x"), local(Type::I32));

        let mut inner = root.child();
        assert_eq!(inner.lookup("x").map(|s| s.ty), Some(Type::I32));
        inner.bind(Name::new("x"), local(Type::Bool));
        assert_eq!(inner.lookup("x").map(|s| s.ty), Some(Type::Bool));
        assert_eq!(root.lookup("x").map(|s| s.ty), Some(Type::I32));
        assert!(root.child().lookup_local("x").is_none());
    }

    #[test]
    fn test_lookup_missing() {
        assert!(Scope::new().child().lookup("nope").is_none());
    }

    #[test]
    fn test_find_similar_prefers_closest() {
        let mut root = Scope::new();
        for name in ["count", "counter", "amount", "zzz"] {
            root.bind(Name::new(name), local(Type::F64));
        }
        let inner = root.child();
        let similar = inner.find_similar("coutn", 2, |_| true);
        assert_eq!(similar, vec![Name::new("count")]);
        assert!(inner.find_similar("qqqqqqqq", 3, |_| true).is_empty());
    }

    #[test]
    fn test_find_similar_respects_filter() {
        let mut root = Scope::new();
        root.bind(
            Name::new("add"),
            Symbol {
                kind: SymbolKind::Function {
                    params: Rc::from(vec![Type::F64]),
                },
                ty: Type::F64,
                span: Span::DUMMY,
            },
        );
        root.bind(Name::new("adc"), local(Type::F64));
        let found = root.find_similar("ad", 3, |symbol| symbol.kind.is_function());
        assert_eq!(found, vec![Name::new("add")]);
    }
}
