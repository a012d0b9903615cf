//! Resolved value types.
//!
//! `Type` is the extension seam for new value categories: adding a scalar
//! means adding a variant here, a spelling in [`Type::from_name`], and a row
//! in the checker's widening table. The lexer and parser never see types;
//! annotations reach the checker as plain identifiers.

use std::fmt;

/// A resolved type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    I32,
    I64,
    F32,
    F64,
    Bool,
    /// Type of statement-form control flow; carries no value.
    Unit,
    /// Placeholder for an expression that failed to type check.
    ///
    /// Compatible with everything so one mistake is reported once. Never
    /// present in a module that checked without errors.
    Error,
}

impl Type {
    /// Type given to unannotated parameters, bindings, and return slots.
    pub const DEFAULT_SCALAR: Type = Type::F64;

    /// Resolve a source-level type name.
    pub fn from_name(name: &str) -> Option<Type> {
        let ty = match name {
            "i32" => Type::I32,
            "i64" => Type::I64,
            "f32" => Type::F32,
            "f64" => Type::F64,
            "bool" => Type::Bool,
            "unit" => Type::Unit,
            _ => return None,
        };
        Some(ty)
    }

    /// All source-level type names, for "did you mean" suggestions.
    pub const NAMES: [&'static str; 6] = ["i32", "i64", "f32", "f64", "bool", "unit"];

    pub const fn name(self) -> &'static str {
        match self {
            Type::I32 => "i32",
            Type::I64 => "i64",
            Type::F32 => "f32",
            Type::F64 => "f64",
            Type::Bool => "bool",
            Type::Unit => "unit",
            Type::Error => "{error}",
        }
    }

    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self, Type::I32 | Type::I64)
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Type::F32 | Type::F64)
    }

    #[inline]
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        matches!(self, Type::Error)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for name in Type::NAMES {
            let ty = Type::from_name(name);
            assert_eq!(ty.map(Type::name), Some(name));
        }
        assert_eq!(Type::from_name("float"), None);
    }

    #[test]
    fn test_categories() {
        assert!(Type::I64.is_integer());
        assert!(Type::F32.is_float());
        assert!(!Type::Bool.is_numeric());
        assert!(!Type::Unit.is_numeric());
        assert_eq!(Type::DEFAULT_SCALAR, Type::F64);
    }
}
