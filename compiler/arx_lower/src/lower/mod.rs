//! Annotated AST to IR lowering.
//!
//! Converts the checked expression tree (implicit control flow) into
//! basic-block IR (explicit control flow).
//!
//! # Entry Points
//!
//! [`lower_module`] lowers every item of a checked module and verifies each
//! function. [`lower_function`] lowers a single definition.
//!
//! # Architecture
//!
//! - [`FunctionBuilder`]: owns the in-progress function, allocates blocks
//!   and values, emits instructions.
//! - [`Lowerer`] (in `expr.rs`): walks the expression tree and calls builder
//!   methods.
//! - [`LowerScope`] (in `scope.rs`): name to value bindings, snapshotted at
//!   control-flow splits for SSA merge.

mod control_flow;
mod expr;
mod scope;

use arx_ir::{ast, Name, Type};
use tracing::{debug, trace, warn};

use crate::error::LowerError;
use crate::ir::{
    BinOp, Block, BlockId, ConvOp, Constant, Extern, Function, Instr, Module, Param, Terminator,
    UnOp, ValueId,
};
use crate::verify::verify_function;

use self::expr::Lowerer;

// BlockBuilder

/// In-progress basic block.
struct BlockBuilder {
    id: BlockId,
    params: Vec<(ValueId, Type)>,
    instrs: Vec<Instr>,
    terminator: Option<Terminator>,
}

impl BlockBuilder {
    fn new(id: BlockId) -> Self {
        Self {
            id,
            params: Vec::new(),
            instrs: Vec::new(),
            terminator: None,
        }
    }
}

// FunctionBuilder

/// Builder for one function.
///
/// Position at a block, emit instructions, terminate. Values are numbered
/// in allocation order, so lowering the same tree twice yields the same
/// function.
pub(crate) struct FunctionBuilder {
    blocks: Vec<BlockBuilder>,
    current: BlockId,
    next_value: u32,
    value_types: Vec<Type>,
}

impl FunctionBuilder {
    /// Create a builder with the entry block allocated and current.
    pub(crate) fn new() -> Self {
        Self {
            blocks: vec![BlockBuilder::new(BlockId::ENTRY)],
            current: BlockId::ENTRY,
            next_value: 0,
            value_types: Vec::new(),
        }
    }

    // Blocks

    #[expect(
        clippy::cast_possible_truncation,
        reason = "block indices never exceed u32"
    )]
    pub(crate) fn new_block(&mut self) -> BlockId {
        let id = BlockId::new(self.blocks.len() as u32);
        self.blocks.push(BlockBuilder::new(id));
        id
    }

    pub(crate) fn position_at(&mut self, block: BlockId) {
        debug_assert!(
            block.index() < self.blocks.len(),
            "{block:?} out of bounds (have {} blocks)",
            self.blocks.len(),
        );
        self.current = block;
    }

    #[inline]
    pub(crate) fn current_block(&self) -> BlockId {
        self.current
    }

    // Values

    pub(crate) fn fresh_value(&mut self, ty: Type) -> ValueId {
        let id = ValueId::new(self.next_value);
        self.next_value += 1;
        self.value_types.push(ty);
        id
    }

    pub(crate) fn add_block_param(&mut self, block: BlockId, ty: Type) -> ValueId {
        let value = self.fresh_value(ty);
        self.blocks[block.index()].params.push((value, ty));
        value
    }

    /// Type of an allocated value.
    pub(crate) fn value_type(&self, value: ValueId) -> Type {
        self.value_types
            .get(value.index())
            .copied()
            .unwrap_or(Type::Error)
    }

    // Instructions

    fn push(&mut self, instr: Instr) {
        let block = &mut self.blocks[self.current.index()];
        debug_assert!(
            block.terminator.is_none(),
            "emitting into terminated block {:?}",
            block.id
        );
        block.instrs.push(instr);
    }

    pub(crate) fn emit_const(&mut self, value: Constant) -> ValueId {
        let dst = self.fresh_value(value.ty());
        self.push(Instr::Const { dst, value });
        dst
    }

    pub(crate) fn emit_binary(&mut self, op: BinOp, ty: Type, lhs: ValueId, rhs: ValueId) -> ValueId {
        let dst = self.fresh_value(op.result_type(ty));
        self.push(Instr::Binary {
            dst,
            op,
            ty,
            lhs,
            rhs,
        });
        dst
    }

    pub(crate) fn emit_unary(&mut self, op: UnOp, ty: Type, operand: ValueId) -> ValueId {
        let dst = self.fresh_value(ty);
        self.push(Instr::Unary {
            dst,
            op,
            ty,
            operand,
        });
        dst
    }

    pub(crate) fn emit_convert(
        &mut self,
        op: ConvOp,
        from: Type,
        to: Type,
        operand: ValueId,
    ) -> ValueId {
        let dst = self.fresh_value(to);
        self.push(Instr::Convert {
            dst,
            op,
            from,
            to,
            operand,
        });
        dst
    }

    pub(crate) fn emit_call(&mut self, ret: Type, callee: Name, args: Vec<ValueId>) -> ValueId {
        let dst = self.fresh_value(ret);
        self.push(Instr::Call {
            dst,
            ret,
            callee,
            args,
        });
        dst
    }

    // Terminators

    fn terminate(&mut self, terminator: Terminator) {
        let block = &mut self.blocks[self.current.index()];
        debug_assert!(
            block.terminator.is_none(),
            "block {:?} already terminated",
            block.id
        );
        block.terminator = Some(terminator);
    }

    pub(crate) fn terminate_return(&mut self, value: ValueId) {
        self.terminate(Terminator::Return { value });
    }

    pub(crate) fn terminate_jump(&mut self, target: BlockId, args: Vec<ValueId>) {
        self.terminate(Terminator::Jump { target, args });
    }

    pub(crate) fn terminate_branch(&mut self, cond: ValueId, then_block: BlockId, else_block: BlockId) {
        self.terminate(Terminator::Branch {
            cond,
            then_block,
            else_block,
        });
    }

    // Finalization

    /// Consume the builder and produce the finished function. Every block
    /// must be terminated.
    pub(crate) fn finish(
        self,
        name: Name,
        params: Vec<Param>,
        ret: Type,
    ) -> Result<Function, LowerError> {
        let mut blocks = Vec::with_capacity(self.blocks.len());
        for block in self.blocks {
            let Some(terminator) = block.terminator else {
                warn!(block = block.id.raw(), function = %name, "unterminated block");
                return Err(LowerError::malformed(
                    &name,
                    format!("bb{} has no terminator", block.id.raw()),
                ));
            };
            blocks.push(Block {
                id: block.id,
                params: block.params,
                instrs: block.instrs,
                terminator,
            });
        }
        Ok(Function {
            name,
            params,
            ret,
            blocks,
            value_types: self.value_types,
        })
    }
}

// Public entry points

/// Lower a checked module.
///
/// The module must have passed `arx_types::check_module` with no errors;
/// any gap in its annotations is an internal error. Functions are verified
/// as they are lowered.
#[tracing::instrument(level = "debug", skip_all, fields(items = module.items.len()))]
pub fn lower_module(module: &ast::Module) -> Result<Module, LowerError> {
    let mut lowered = Module::default();
    for item in &module.items {
        match item {
            ast::Item::Extern(proto) => {
                let (params, ret) = signature(proto)?;
                lowered.externs.push(Extern {
                    name: proto.name.clone(),
                    params,
                    ret,
                });
            }
            ast::Item::Function(func) => {
                let function = lower_function(func)?;
                verify_function(&function)?;
                trace!(
                    name = %function.name,
                    blocks = function.blocks.len(),
                    values = function.value_types.len(),
                    "lowered function"
                );
                lowered.functions.push(function);
            }
        }
    }
    debug!(
        externs = lowered.externs.len(),
        functions = lowered.functions.len(),
        "lowering complete"
    );
    Ok(lowered)
}

/// Lower one checked function definition.
pub fn lower_function(func: &ast::Function) -> Result<Function, LowerError> {
    let (param_types, ret) = signature(&func.proto)?;
    let mut lowerer = Lowerer::new();

    let params = func
        .proto
        .params
        .iter()
        .zip(param_types)
        .map(|(param, ty)| {
            let value = lowerer.builder.fresh_value(ty);
            lowerer.scope.bind(param.name.clone(), value);
            Param { value, ty }
        })
        .collect();

    let result = lowerer.lower_expr(&func.body)?;
    lowerer.builder.terminate_return(result);
    lowerer.builder.finish(func.proto.name.clone(), params, ret)
}

/// Resolved parameter and return types of a prototype.
fn signature(proto: &ast::Prototype) -> Result<(Vec<Type>, Type), LowerError> {
    let params = proto
        .params
        .iter()
        .map(|param| match param.resolved {
            Some(ty) if !ty.is_error() => Ok(ty),
            _ => Err(LowerError::MissingType {
                what: "parameter",
                span: param.span,
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    let ret = match proto.resolved_ret {
        Some(ty) if !ty.is_error() => ty,
        _ => {
            return Err(LowerError::MissingType {
                what: "return type",
                span: proto.span,
            })
        }
    };
    Ok((params, ret))
}

#[cfg(test)]
mod tests;
