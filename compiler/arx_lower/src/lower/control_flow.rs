//! Control flow lowering: `if`, `for`, `var` and assignment.
//!
//! These are the forms that create blocks or rebind names. Merge points take
//! block parameters for the produced value and for every local whose value
//! differs between the incoming edges.
//!
//! Merge and exit blocks are allocated after the code that jumps to them, so
//! block order is also definition order: every value is defined in an
//! earlier block than, or earlier in the same block as, each of its uses.

use arx_ir::{BinaryOp, Expr, ExprKind, ForExpr, IfExpr, Name, Span, Type, ValueForm, VarExpr};
use arx_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;

use super::expr::{binary_opcode, resolved, Lowerer};
use crate::error::LowerError;
use crate::ir::ValueId;

impl Lowerer {
    // If / Else

    /// Lower `if cond then a else b`.
    ///
    /// Produces 4 blocks: entry (cond), then, else, merge. In value form the
    /// merge block's first parameter is the result.
    pub(crate) fn lower_if(&mut self, if_expr: &IfExpr, ty: Type) -> Result<ValueId, LowerError> {
        let cond = self.lower_expr(&if_expr.cond)?;

        let then_block = self.builder.new_block();
        let else_block = self.builder.new_block();
        self.builder.terminate_branch(cond, then_block, else_block);

        let pre_scope = self.scope.clone();

        // Lowering a branch may leave us in a later block than the one it
        // started in; the jump to the merge goes from wherever it ended.
        self.builder.position_at(then_block);
        let then_val = self.lower_expr(&if_expr.then_branch)?;
        let then_exit = self.builder.current_block();
        let then_scope = std::mem::replace(&mut self.scope, pre_scope.clone());

        self.builder.position_at(else_block);
        let else_val = self.lower_expr(&if_expr.else_branch)?;
        let else_exit = self.builder.current_block();
        let else_scope = std::mem::replace(&mut self.scope, pre_scope.clone());

        let merge_block = self.builder.new_block();
        let produces = if_expr.form == ValueForm::Value;
        let result = produces.then(|| self.builder.add_block_param(merge_block, ty));
        let changed = pre_scope.changed_in(&[&then_scope, &else_scope]);
        let merged: Vec<(Name, ValueId)> = changed
            .into_iter()
            .map(|(name, old)| {
                let param = self
                    .builder
                    .add_block_param(merge_block, self.builder.value_type(old));
                (name, param)
            })
            .collect();

        for (exit, value, scope) in [
            (then_exit, then_val, &then_scope),
            (else_exit, else_val, &else_scope),
        ] {
            self.builder.position_at(exit);
            let mut args = Vec::with_capacity(merged.len() + 1);
            if produces {
                args.push(value);
            }
            for (name, _) in &merged {
                args.push(scope.lookup(name.as_str()).unwrap_or(value));
            }
            self.builder.terminate_jump(merge_block, args);
        }

        self.builder.position_at(merge_block);
        for (name, param) in merged {
            self.scope.bind(name, param);
        }
        Ok(match result {
            Some(result) => result,
            None => self.emit_unit(),
        })
    }

    // For

    /// Lower `for i = start, end, step in body`.
    ///
    /// Produces entry, loop header, continue and exit blocks. The header's
    /// parameters are the induction variable followed by every outer local
    /// the loop assigns. The body runs once before `end` is first tested;
    /// `end` sees the stepped induction variable.
    pub(crate) fn lower_for(&mut self, for_expr: &ForExpr, span: Span) -> Result<ValueId, LowerError> {
        let start = self.lower_expr(&for_expr.start)?;
        let var_ty = resolved(&for_expr.start, "loop start")?;
        let step_expr = for_expr.step.as_ref().ok_or(LowerError::MissingType {
            what: "loop step",
            span,
        })?;

        let assigned = assigned_names([&for_expr.end, step_expr, &for_expr.body]);
        let carried = self
            .scope
            .select(|name| assigned.contains(name) && *name != for_expr.var);

        let header = self.builder.new_block();
        let mut entry_args = vec![start];
        entry_args.extend(carried.iter().map(|(_, value)| *value));
        self.builder.terminate_jump(header, entry_args);

        self.builder.position_at(header);
        let induction = self.builder.add_block_param(header, var_ty);
        for (name, outer) in &carried {
            let param = self
                .builder
                .add_block_param(header, self.builder.value_type(*outer));
            self.scope.bind(name.clone(), param);
        }
        let shadowed = self.scope.shadow(for_expr.var.clone(), induction);

        let body = self.lower_expr(&for_expr.body)?;
        let step = self.lower_expr(step_expr)?;
        let current = self.local(&for_expr.var, for_expr.var_span)?;
        let add = binary_opcode(BinaryOp::Add, var_ty).ok_or(LowerError::Mistyped {
            what: "loop variable",
            ty: var_ty,
            span: for_expr.var_span,
        })?;
        let next = self.builder.emit_binary(add, var_ty, current, step);
        self.scope.bind(for_expr.var.clone(), next);
        let again = self.lower_expr(&for_expr.end)?;

        let continue_block = self.builder.new_block();
        let exit_block = self.builder.new_block();
        self.builder.terminate_branch(again, continue_block, exit_block);

        self.builder.position_at(continue_block);
        let mut back_args = vec![next];
        for (name, _) in &carried {
            back_args.push(self.local(name, span)?);
        }
        self.builder.terminate_jump(header, back_args);

        self.builder.position_at(exit_block);
        self.scope.unshadow(vec![shadowed]);
        Ok(match for_expr.form {
            ValueForm::Value => body,
            ValueForm::Statement => self.emit_unit(),
        })
    }

    // Var

    /// Lower `var a = x, b in body`. Bindings are visible to later
    /// initializers and to the body, then go out of scope.
    pub(crate) fn lower_var(&mut self, var_expr: &VarExpr) -> Result<ValueId, LowerError> {
        let mut shadowed = Vec::with_capacity(var_expr.bindings.len());
        for binding in &var_expr.bindings {
            // The checker gives every binding of a non-unit type an
            // initializer, so only `unit` bindings arrive without one.
            let value = match &binding.init {
                Some(init) => self.lower_expr(init)?,
                None => self.emit_unit(),
            };
            shadowed.push(self.scope.shadow(binding.name.clone(), value));
        }
        let body = self.lower_expr(&var_expr.body)?;
        self.scope.unshadow(shadowed);
        Ok(match var_expr.form {
            ValueForm::Value => body,
            ValueForm::Statement => self.emit_unit(),
        })
    }

    // Assign

    /// Lower `x = value`: rebind `x` to the new value, which is also the
    /// result.
    pub(crate) fn lower_assign(
        &mut self,
        target: &Name,
        value: &Expr,
        span: Span,
    ) -> Result<ValueId, LowerError> {
        let value = self.lower_expr(value)?;
        self.local(target, span)?;
        self.scope.bind(target.clone(), value);
        Ok(value)
    }
}

/// Every name assigned anywhere in `exprs`.
fn assigned_names<'e>(exprs: impl IntoIterator<Item = &'e Expr>) -> FxHashSet<Name> {
    let mut names = FxHashSet::default();
    for expr in exprs {
        collect_assigned(expr, &mut names);
    }
    names
}

fn collect_assigned(expr: &Expr, names: &mut FxHashSet<Name>) {
    ensure_sufficient_stack(|| match &expr.kind {
        ExprKind::Int(_) | ExprKind::Float(_) | ExprKind::Bool(_) | ExprKind::Ident(_) => {}
        ExprKind::Binary { left, right, .. } => {
            collect_assigned(left, names);
            collect_assigned(right, names);
        }
        ExprKind::Unary { operand, .. }
        | ExprKind::Convert(operand)
        | ExprKind::Return(operand) => {
            collect_assigned(operand, names);
        }
        ExprKind::Call { args, .. } => {
            for arg in args {
                collect_assigned(arg, names);
            }
        }
        ExprKind::If(if_expr) => {
            collect_assigned(&if_expr.cond, names);
            collect_assigned(&if_expr.then_branch, names);
            collect_assigned(&if_expr.else_branch, names);
        }
        ExprKind::For(for_expr) => {
            collect_assigned(&for_expr.start, names);
            collect_assigned(&for_expr.end, names);
            if let Some(step) = &for_expr.step {
                collect_assigned(step, names);
            }
            collect_assigned(&for_expr.body, names);
        }
        ExprKind::Var(var_expr) => {
            for init in var_expr.bindings.iter().filter_map(|b| b.init.as_ref()) {
                collect_assigned(init, names);
            }
            collect_assigned(&var_expr.body, names);
        }
        ExprKind::Assign { target, value, .. } => {
            names.insert(target.clone());
            collect_assigned(value, names);
        }
    });
}
