//! Declaration pass and function bodies.

use std::rc::Rc;

use arx_ir::{Function, Item, Module, Prototype, Type};
use rustc_hash::FxHashMap;

use super::expr::{coerce, ty_of};
use super::Checker;
use crate::env::{Symbol, SymbolKind};
use crate::widen::can_widen;
use crate::SemanticError;

/// Resolved signature of one item.
pub(crate) struct Signature {
    params: Vec<Type>,
    /// `None` for top-level expressions, whose type comes from the body.
    ret: Option<Type>,
}

impl Checker {
    /// First pass: resolve every signature and bind named functions and
    /// externs in the root scope.
    pub(crate) fn declare_items(&mut self, module: &Module) -> Vec<Signature> {
        let mut signatures = Vec::with_capacity(module.items.len());
        for item in &module.items {
            let proto = item.proto();
            let anonymous = matches!(item, Item::Function(func) if func.anonymous);
            let params = self.resolve_params(proto);

            let ret = if anonymous {
                None
            } else {
                let ret = self.resolve_or_default(proto.ret.as_ref());
                self.declare_function(proto, &params, ret);
                Some(ret)
            };
            signatures.push(Signature { params, ret });
        }
        signatures
    }

    /// Parameter types, reporting names repeated within the prototype.
    fn resolve_params(&mut self, proto: &Prototype) -> Vec<Type> {
        let mut seen = FxHashMap::default();
        proto
            .params
            .iter()
            .map(|param| {
                if let Some(first) = seen.insert(param.name.as_str(), param.span) {
                    self.report(SemanticError::duplicate(
                        param.span,
                        &param.name,
                        "parameter",
                        first,
                    ));
                }
                self.resolve_or_default(param.ty.as_ref())
            })
            .collect()
    }

    /// Bind a function in the root scope. The first declaration of a name
    /// wins; later ones are reported.
    fn declare_function(&mut self, proto: &Prototype, params: &[Type], ret: Type) {
        if let Some(first) = self.globals.lookup_local(proto.name.as_str()) {
            let first = first.span;
            self.report(SemanticError::duplicate(
                proto.span,
                &proto.name,
                "function",
                first,
            ));
            return;
        }
        self.globals.bind(
            proto.name.clone(),
            Symbol {
                kind: SymbolKind::Function {
                    params: Rc::from(params),
                },
                ty: ret,
                span: proto.span,
            },
        );
    }

    /// Second pass: check every body against its signature.
    pub(crate) fn check_items(&mut self, module: &Module, signatures: Vec<Signature>) -> Module {
        let items = module
            .items
            .iter()
            .zip(signatures)
            .map(|(item, signature)| match item {
                Item::Function(func) => Item::Function(self.check_function(func, &signature)),
                Item::Extern(proto) => Item::Extern(annotate(
                    proto,
                    &signature.params,
                    signature.ret.unwrap_or(Type::DEFAULT_SCALAR),
                )),
            })
            .collect();
        Module { items }
    }

    fn check_function(&mut self, func: &Function, signature: &Signature) -> Function {
        let mut scope = self.globals.child();
        for (param, ty) in func.proto.params.iter().zip(&signature.params) {
            scope.bind(
                param.name.clone(),
                Symbol {
                    kind: SymbolKind::Param,
                    ty: *ty,
                    span: param.span,
                },
            );
        }

        self.ret = signature.ret;
        self.in_tail = true;
        let body = self.check_expr(&func.body, &scope);
        let found = ty_of(&body);
        let (body, ret) = match signature.ret {
            None => (body, found),
            Some(ret) if can_widen(found, ret) => (coerce(body, ret), ret),
            Some(ret) => {
                self.report(SemanticError::return_mismatch(
                    body.span,
                    &func.proto.name,
                    ret,
                    found,
                ));
                (body, ret)
            }
        };
        tracing::trace!(name = %func.proto.name, %ret, "checked function");

        Function {
            proto: annotate(&func.proto, &signature.params, ret),
            body,
            anonymous: func.anonymous,
            span: func.span,
        }
    }
}

/// Copy of `proto` with resolved parameter and return types filled in.
fn annotate(proto: &Prototype, params: &[Type], ret: Type) -> Prototype {
    let mut proto = proto.clone();
    for (param, ty) in proto.params.iter_mut().zip(params) {
        param.resolved = Some(*ty);
    }
    proto.resolved_ret = Some(ret);
    proto
}
