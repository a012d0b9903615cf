//! Binary and Unary Operators
//!
//! # Precedence Table
//!
//! Higher binds tighter. Every binary operator is left-associative; unary
//! operators bind tighter than any binary operator.
//!
//! | precedence | operators                     |
//! |-----------:|-------------------------------|
//! | 2          | `=`                           |
//! | 10         | `<` `>` `<=` `>=` `==` `!=`   |
//! | 20         | `+` `-`                       |
//! | 40         | `*` `/`                       |

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparison
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,

    /// `=`; only valid with a plain identifier on the left. The parser turns
    /// it into `ExprKind::Assign`, so it never appears in `ExprKind::Binary`.
    Assign,
}

impl BinaryOp {
    /// Lowest precedence of any binary operator.
    pub const MIN_PRECEDENCE: u8 = 2;

    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Assign => "=",
        }
    }

    /// Binding strength, see the module-level table.
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Assign => 2,
            Self::Lt | Self::Gt | Self::LtEq | Self::GtEq | Self::Eq | Self::NotEq => 10,
            Self::Add | Self::Sub => 20,
            Self::Mul | Self::Div => 40,
        }
    }

    pub const fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div)
    }

    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Lt | Self::Gt | Self::LtEq | Self::GtEq | Self::Eq | Self::NotEq
        )
    }

    /// `==` and `!=` also accept two booleans.
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::NotEq)
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// Arithmetic negation `-x`.
    Neg,
    /// Logical not `!x`.
    Not,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplicative_binds_tighter_than_additive() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::Lt.precedence());
        assert!(BinaryOp::Lt.precedence() > BinaryOp::Assign.precedence());
        assert_eq!(BinaryOp::Assign.precedence(), BinaryOp::MIN_PRECEDENCE);
    }

    #[test]
    fn test_categories_are_disjoint() {
        for op in [BinaryOp::Add, BinaryOp::Div, BinaryOp::Lt, BinaryOp::NotEq] {
            assert_ne!(op.is_arithmetic(), op.is_comparison(), "{op:?}");
        }
        assert!(!BinaryOp::Assign.is_arithmetic());
        assert!(!BinaryOp::Assign.is_comparison());
    }
}
