//! Structural checks on lowered functions.
//!
//! Walks blocks in order and rejects:
//! - a block whose `id` does not match its position
//! - a value defined twice, or a value id with no recorded type
//! - an operand not defined earlier in block order
//! - a jump whose arguments differ in number or type from its target's
//!   parameters
//! - a branch or jump to a block that does not exist
//! - a non-`bool` branch condition, or a return whose type is not the
//!   function's return type
//!
//! Failures are `E9002` internal errors.

use crate::error::LowerError;
use crate::ir::{Function, Terminator, ValueId};
use arx_ir::Type;

/// Verify one function.
pub fn verify_function(func: &Function) -> Result<(), LowerError> {
    Verifier::new(func).run()
}

struct Verifier<'f> {
    func: &'f Function,
    defined: Vec<bool>,
}

impl<'f> Verifier<'f> {
    fn new(func: &'f Function) -> Self {
        Verifier {
            func,
            defined: vec![false; func.value_types.len()],
        }
    }

    fn fail(&self, detail: impl Into<String>) -> LowerError {
        LowerError::malformed(&self.func.name, detail)
    }

    fn define(&mut self, value: ValueId, ty: Type) -> Result<(), LowerError> {
        match self.defined.get(value.index()) {
            None => return Err(self.fail(format!("%{} has no recorded type", value.raw()))),
            Some(true) => {
                return Err(self.fail(format!("%{} is defined more than once", value.raw())))
            }
            Some(false) => self.defined[value.index()] = true,
        }
        if self.func.value_type(value) != Some(ty) {
            return Err(self.fail(format!(
                "%{} is defined as `{ty}` but recorded differently",
                value.raw()
            )));
        }
        Ok(())
    }

    fn use_value(&self, value: ValueId, at: &str) -> Result<(), LowerError> {
        if self.defined.get(value.index()).copied().unwrap_or(false) {
            Ok(())
        } else {
            Err(self.fail(format!(
                "%{} is used in {at} before it is defined",
                value.raw()
            )))
        }
    }

    fn run(mut self) -> Result<(), LowerError> {
        let func = self.func;
        if func.blocks.is_empty() {
            return Err(self.fail("function has no blocks"));
        }
        if !func.entry().params.is_empty() {
            return Err(self.fail("entry block takes parameters"));
        }
        for param in &func.params {
            self.define(param.value, param.ty)?;
        }

        for (index, block) in func.blocks.iter().enumerate() {
            if block.id.index() != index {
                return Err(self.fail(format!(
                    "block at position {index} is labelled bb{}",
                    block.id.raw()
                )));
            }
            let label = format!("bb{}", block.id.raw());
            for (value, ty) in &block.params {
                self.define(*value, *ty)?;
            }
            for instr in &block.instrs {
                for operand in instr.operands() {
                    self.use_value(operand, &label)?;
                }
                self.define(instr.dst(), instr.result_type())?;
            }
            for operand in block.terminator.operands() {
                self.use_value(operand, &label)?;
            }
            self.check_terminator(&block.terminator, &label)?;
        }
        Ok(())
    }

    fn check_terminator(&self, terminator: &Terminator, label: &str) -> Result<(), LowerError> {
        for target in terminator.successors() {
            if self.func.block(target).is_none() {
                return Err(self.fail(format!(
                    "{label} targets missing block bb{}",
                    target.raw()
                )));
            }
        }
        match terminator {
            Terminator::Return { value } => {
                let ty = self.func.value_type(*value);
                if ty != Some(self.func.ret) {
                    return Err(self.fail(format!(
                        "{label} returns a value that is not `{}`",
                        self.func.ret
                    )));
                }
            }
            Terminator::Jump { target, args } => {
                let params = self.func.block(*target).map_or(&[][..], |b| &b.params[..]);
                if params.len() != args.len() {
                    return Err(self.fail(format!(
                        "{label} passes {} arguments to bb{}, which takes {}",
                        args.len(),
                        target.raw(),
                        params.len()
                    )));
                }
                for (i, (arg, (_, ty))) in args.iter().zip(params).enumerate() {
                    if self.func.value_type(*arg) != Some(*ty) {
                        return Err(self.fail(format!(
                            "{label} passes a non-`{ty}` value as argument {i} of bb{}",
                            target.raw()
                        )));
                    }
                }
            }
            Terminator::Branch {
                cond,
                then_block,
                else_block,
            } => {
                if self.func.value_type(*cond) != Some(Type::Bool) {
                    return Err(self.fail(format!("{label} branches on a non-bool value")));
                }
                for target in [then_block, else_block] {
                    let takes_params = self
                        .func
                        .block(*target)
                        .is_some_and(|b| !b.params.is_empty());
                    if takes_params {
                        return Err(self.fail(format!(
                            "{label} branches to bb{}, which takes parameters",
                            target.raw()
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
