//! Basic-block intermediate representation.
//!
//! # Architecture
//!
//! - [`Module`]: extern declarations plus lowered functions, in source order
//! - [`Function`]: parameters, blocks, and the type of every value
//! - [`Block`]: parameters, straight-line instructions, one terminator
//! - [`Instr`]: a single instruction defining exactly one value
//! - [`Terminator`]: block exit (return, jump, branch)
//!
//! Values are SSA: each [`ValueId`] is defined once. Merge points receive
//! values through block parameters rather than phi nodes. Every instruction
//! names its operand type, so nothing downstream infers a type.

use arx_ir::{Name, Type};

// ID newtypes

/// Value identifier within one [`Function`], printed `%N`.
///
/// Allocated sequentially from 0: parameters first, then block parameters
/// and instruction results in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ValueId(u32);

impl ValueId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Block identifier within one [`Function`], printed `bbN`. The entry block
/// is always `bb0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct BlockId(u32);

impl BlockId {
    pub const ENTRY: BlockId = BlockId(0);

    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// Constants

/// Typed constant. Floats are stored as bits so constants are `Eq`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Constant {
    I32(i32),
    I64(i64),
    F32(u32),
    F64(u64),
    Bool(bool),
    Unit,
}

impl Constant {
    pub fn ty(self) -> Type {
        match self {
            Constant::I32(_) => Type::I32,
            Constant::I64(_) => Type::I64,
            Constant::F32(_) => Type::F32,
            Constant::F64(_) => Type::F64,
            Constant::Bool(_) => Type::Bool,
            Constant::Unit => Type::Unit,
        }
    }
}

// Operations

/// Comparison predicate. Integer comparisons are signed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Predicate {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

/// Binary instruction opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    IAdd,
    ISub,
    IMul,
    SDiv,
    FAdd,
    FSub,
    FMul,
    FDiv,
    /// Integer or boolean comparison.
    ICmp(Predicate),
    FCmp(Predicate),
}

impl BinOp {
    /// Whether the result is `bool` rather than the operand type.
    pub fn is_comparison(self) -> bool {
        matches!(self, BinOp::ICmp(_) | BinOp::FCmp(_))
    }

    pub fn result_type(self, operand: Type) -> Type {
        if self.is_comparison() {
            Type::Bool
        } else {
            operand
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnOp {
    INeg,
    FNeg,
    Not,
}

/// Conversion opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConvOp {
    /// `i32` to `i64`.
    SExt,
    /// Signed integer to float.
    SIToFP,
    /// `f32` to `f64`.
    FPExt,
    /// Integer to `bool`: not equal to zero.
    ITest,
    /// Float to `bool`: not equal to zero.
    FTest,
}

impl ConvOp {
    /// Opcode converting `from` to `to`, if the pair is a widening or a
    /// truth test.
    pub fn between(from: Type, to: Type) -> Option<ConvOp> {
        match (from, to) {
            (Type::I32, Type::I64) => Some(ConvOp::SExt),
            (Type::I32 | Type::I64, Type::F32 | Type::F64) => Some(ConvOp::SIToFP),
            (Type::F32, Type::F64) => Some(ConvOp::FPExt),
            (Type::I32 | Type::I64, Type::Bool) => Some(ConvOp::ITest),
            (Type::F32 | Type::F64, Type::Bool) => Some(ConvOp::FTest),
            _ => None,
        }
    }
}

// Instructions

/// A single instruction. Each defines exactly one value, `dst`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Instr {
    /// `dst = const value`
    Const { dst: ValueId, value: Constant },
    /// `dst = op ty lhs, rhs` where `ty` is the operand type.
    Binary {
        dst: ValueId,
        op: BinOp,
        ty: Type,
        lhs: ValueId,
        rhs: ValueId,
    },
    /// `dst = op ty operand`
    Unary {
        dst: ValueId,
        op: UnOp,
        ty: Type,
        operand: ValueId,
    },
    /// `dst = op from operand to to`
    Convert {
        dst: ValueId,
        op: ConvOp,
        from: Type,
        to: Type,
        operand: ValueId,
    },
    /// `dst = call ret @callee(args...)`
    Call {
        dst: ValueId,
        ret: Type,
        callee: Name,
        args: Vec<ValueId>,
    },
}

impl Instr {
    /// The value this instruction defines.
    pub fn dst(&self) -> ValueId {
        match self {
            Instr::Const { dst, .. }
            | Instr::Binary { dst, .. }
            | Instr::Unary { dst, .. }
            | Instr::Convert { dst, .. }
            | Instr::Call { dst, .. } => *dst,
        }
    }

    /// Type of the defined value.
    pub fn result_type(&self) -> Type {
        match self {
            Instr::Const { value, .. } => value.ty(),
            Instr::Binary { op, ty, .. } => op.result_type(*ty),
            Instr::Unary { ty, .. } => *ty,
            Instr::Convert { to, .. } => *to,
            Instr::Call { ret, .. } => *ret,
        }
    }

    /// Values read by this instruction, in operand order.
    pub fn operands(&self) -> Vec<ValueId> {
        match self {
            Instr::Const { .. } => vec![],
            Instr::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
            Instr::Unary { operand, .. } | Instr::Convert { operand, .. } => vec![*operand],
            Instr::Call { args, .. } => args.clone(),
        }
    }
}

// Terminators

/// How control leaves a block.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Terminator {
    Return { value: ValueId },
    /// Unconditional jump, passing one argument per target block parameter.
    Jump { target: BlockId, args: Vec<ValueId> },
    /// Conditional branch on a `bool`. Targets take no parameters.
    Branch {
        cond: ValueId,
        then_block: BlockId,
        else_block: BlockId,
    },
}

impl Terminator {
    pub fn operands(&self) -> Vec<ValueId> {
        match self {
            Terminator::Return { value } => vec![*value],
            Terminator::Jump { args, .. } => args.clone(),
            Terminator::Branch { cond, .. } => vec![*cond],
        }
    }

    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            Terminator::Return { .. } => vec![],
            Terminator::Jump { target, .. } => vec![*target],
            Terminator::Branch {
                then_block,
                else_block,
                ..
            } => vec![*then_block, *else_block],
        }
    }
}

// Blocks and functions

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    pub id: BlockId,
    /// Values passed in by `Jump` arguments.
    pub params: Vec<(ValueId, Type)>,
    pub instrs: Vec<Instr>,
    pub terminator: Terminator,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    pub value: ValueId,
    pub ty: Type,
}

/// A lowered function. `blocks[0]` is the entry block and `blocks[i].id`
/// is `bbi`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Function {
    pub name: Name,
    pub params: Vec<Param>,
    pub ret: Type,
    pub blocks: Vec<Block>,
    /// Type of every value, indexed by [`ValueId::index`].
    pub value_types: Vec<Type>,
}

impl Function {
    #[inline]
    pub fn entry(&self) -> &Block {
        &self.blocks[BlockId::ENTRY.index()]
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    pub fn value_type(&self, value: ValueId) -> Option<Type> {
        self.value_types.get(value.index()).copied()
    }

    /// Instructions across all blocks.
    pub fn instrs(&self) -> impl Iterator<Item = &Instr> {
        self.blocks.iter().flat_map(|block| block.instrs.iter())
    }
}

/// An external function: a signature with no body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Extern {
    pub name: Name,
    pub params: Vec<Type>,
    pub ret: Type,
}

/// A lowered compilation unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Module {
    pub externs: Vec<Extern>,
    pub functions: Vec<Function>,
}

impl Module {
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name.as_str() == name)
    }
}
