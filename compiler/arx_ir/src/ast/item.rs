//! Top-level items: function definitions and extern declarations.

use crate::{Name, Span, Type};

use super::Expr;

/// A type annotation as written: the checker resolves the name.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ParsedType {
    pub name: Name,
    pub span: Span,
}

/// Function parameter.
#[derive(Clone, PartialEq, Debug)]
pub struct Param {
    pub name: Name,
    pub span: Span,
    pub ty: Option<ParsedType>,
    /// Filled by the checker.
    pub resolved: Option<Type>,
}

/// Function signature: `name(a: i32, b) -> f64`.
#[derive(Clone, PartialEq, Debug)]
pub struct Prototype {
    pub name: Name,
    pub span: Span,
    pub params: Vec<Param>,
    pub ret: Option<ParsedType>,
    /// Filled by the checker.
    pub resolved_ret: Option<Type>,
}

impl Prototype {
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// `def proto body` or a top-level expression wrapped as an anonymous
/// function.
#[derive(Clone, PartialEq, Debug)]
pub struct Function {
    pub proto: Prototype,
    pub body: Expr,
    /// `true` for top-level expressions; their return type is the body's.
    pub anonymous: bool,
    pub span: Span,
}

#[derive(Clone, PartialEq, Debug)]
pub enum Item {
    Function(Function),
    Extern(Prototype),
}

impl Item {
    pub fn proto(&self) -> &Prototype {
        match self {
            Item::Function(func) => &func.proto,
            Item::Extern(proto) => proto,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Item::Function(func) => func.span,
            Item::Extern(proto) => proto.span,
        }
    }
}

/// A parsed compilation unit, items in source order.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Module {
    pub items: Vec<Item>,
}

impl Module {
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(func) => Some(func),
            Item::Extern(_) => None,
        })
    }

    pub fn externs(&self) -> impl Iterator<Item = &Prototype> {
        self.items.iter().filter_map(|item| match item {
            Item::Extern(proto) => Some(proto),
            Item::Function(_) => None,
        })
    }
}
