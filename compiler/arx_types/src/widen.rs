//! The widening table.
//!
//! Numeric types form a total order, `i32 < i64 < f32 < f64`, and a value
//! may move up that order implicitly but never down. `bool` and `unit` only
//! match themselves. `Type::Error` matches everything so a single mistake is
//! reported once.
//!
//! New scalar types join by getting a rank here.

use arx_ir::Type;

/// Position of a numeric type in the widening order.
pub const fn rank(ty: Type) -> Option<u8> {
    match ty {
        Type::I32 => Some(0),
        Type::I64 => Some(1),
        Type::F32 => Some(2),
        Type::F64 => Some(3),
        Type::Bool | Type::Unit | Type::Error => None,
    }
}

/// Whether a value of type `from` may be used where `to` is required.
pub fn can_widen(from: Type, to: Type) -> bool {
    if from == to || from.is_error() || to.is_error() {
        return true;
    }
    match (rank(from), rank(to)) {
        (Some(from), Some(to)) => from <= to,
        _ => false,
    }
}

/// The type both operands widen to, if any.
pub fn common_type(a: Type, b: Type) -> Option<Type> {
    if a.is_error() || b.is_error() {
        return Some(Type::Error);
    }
    if a == b {
        return Some(a);
    }
    match (rank(a), rank(b)) {
        (Some(ra), Some(rb)) => Some(if ra >= rb { a } else { b }),
        _ => None,
    }
}
