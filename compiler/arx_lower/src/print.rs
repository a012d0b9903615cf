//! Textual IR.
//!
//! ```text
//! declare f64 @sin(f64)
//!
//! define f64 @add(f64 %0, f64 %1) {
//! bb0:
//!   %2 = fadd f64 %0, %1
//!   ret %2
//! }
//! ```
//!
//! Output depends only on the IR value, so two lowerings of the same module
//! print identically.

use std::fmt;

use crate::ir::{
    BinOp, Block, BlockId, ConvOp, Constant, Extern, Function, Instr, Module, Predicate,
    Terminator, UnOp, ValueId,
};

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.raw())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.raw())
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::I32(v) => write!(f, "i32 {v}"),
            Constant::I64(v) => write!(f, "i64 {v}"),
            Constant::F32(bits) => {
                f.write_str("f32 ")?;
                write_float(f, &f32::from_bits(*bits).to_string())
            }
            Constant::F64(bits) => {
                f.write_str("f64 ")?;
                write_float(f, &f64::from_bits(*bits).to_string())
            }
            Constant::Bool(v) => write!(f, "bool {v}"),
            Constant::Unit => f.write_str("unit"),
        }
    }
}

/// Finite floats always carry a decimal point.
fn write_float(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    let needs_point = !text.contains(['.', 'N', 'i']);
    f.write_str(text)?;
    if needs_point {
        f.write_str(".0")?;
    }
    Ok(())
}

impl Predicate {
    fn int_name(self) -> &'static str {
        match self {
            Predicate::Eq => "eq",
            Predicate::Ne => "ne",
            Predicate::Lt => "slt",
            Predicate::Gt => "sgt",
            Predicate::Le => "sle",
            Predicate::Ge => "sge",
        }
    }

    fn float_name(self) -> &'static str {
        match self {
            Predicate::Eq => "oeq",
            Predicate::Ne => "one",
            Predicate::Lt => "olt",
            Predicate::Gt => "ogt",
            Predicate::Le => "ole",
            Predicate::Ge => "oge",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinOp::IAdd => f.write_str("iadd"),
            BinOp::ISub => f.write_str("isub"),
            BinOp::IMul => f.write_str("imul"),
            BinOp::SDiv => f.write_str("sdiv"),
            BinOp::FAdd => f.write_str("fadd"),
            BinOp::FSub => f.write_str("fsub"),
            BinOp::FMul => f.write_str("fmul"),
            BinOp::FDiv => f.write_str("fdiv"),
            BinOp::ICmp(pred) => write!(f, "icmp {}", pred.int_name()),
            BinOp::FCmp(pred) => write!(f, "fcmp {}", pred.float_name()),
        }
    }
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnOp::INeg => "ineg",
            UnOp::FNeg => "fneg",
            UnOp::Not => "not",
        })
    }
}

impl fmt::Display for ConvOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConvOp::SExt => "sext",
            ConvOp::SIToFP => "sitofp",
            ConvOp::FPExt => "fpext",
            ConvOp::ITest => "itest",
            ConvOp::FTest => "ftest",
        })
    }
}

fn write_values(f: &mut fmt::Formatter<'_>, values: &[ValueId]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Const { dst, value } => write!(f, "{dst} = const {value}"),
            Instr::Binary {
                dst,
                op,
                ty,
                lhs,
                rhs,
            } => write!(f, "{dst} = {op} {ty} {lhs}, {rhs}"),
            Instr::Unary {
                dst,
                op,
                ty,
                operand,
            } => write!(f, "{dst} = {op} {ty} {operand}"),
            Instr::Convert {
                dst,
                op,
                from,
                to,
                operand,
            } => write!(f, "{dst} = {op} {from} {operand} to {to}"),
            Instr::Call {
                dst,
                ret,
                callee,
                args,
            } => {
                write!(f, "{dst} = call {ret} @{callee}(")?;
                write_values(f, args)?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminator::Return { value } => write!(f, "ret {value}"),
            Terminator::Jump { target, args } => {
                write!(f, "jump {target}")?;
                if !args.is_empty() {
                    f.write_str("(")?;
                    write_values(f, args)?;
                    f.write_str(")")?;
                }
                Ok(())
            }
            Terminator::Branch {
                cond,
                then_block,
                else_block,
            } => write!(f, "br {cond}, {then_block}, {else_block}"),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if !self.params.is_empty() {
            f.write_str("(")?;
            for (i, (value, ty)) in self.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{value}: {ty}")?;
            }
            f.write_str(")")?;
        }
        f.write_str(":\n")?;
        for instr in &self.instrs {
            writeln!(f, "  {instr}")?;
        }
        writeln!(f, "  {}", self.terminator)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "define {} @{}(", self.ret, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", param.ty, param.value)?;
        }
        f.write_str(") {\n")?;
        for block in &self.blocks {
            write!(f, "{block}")?;
        }
        f.write_str("}\n")
    }
}

impl fmt::Display for Extern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "declare {} @{}(", self.ret, self.name)?;
        for (i, ty) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for decl in &self.externs {
            writeln!(f, "{decl}")?;
        }
        for (i, func) in self.functions.iter().enumerate() {
            if i > 0 || !self.externs.is_empty() {
                f.write_str("\n")?;
            }
            write!(f, "{func}")?;
        }
        Ok(())
    }
}
