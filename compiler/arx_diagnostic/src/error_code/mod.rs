//! Error codes for all compiler diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E1001`) with the first digit
//! indicating the compiler phase that reports it.

use std::fmt;

/// Pipeline category of a diagnostic.
///
/// Internal errors are kept apart from everything else: they signal a bug in
/// the compiler, never a problem with the input program.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Category {
    Lexical,
    Parse,
    Semantic,
    Internal,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Lexical => "lexical",
            Category::Parse => "parse",
            Category::Semantic => "semantic",
            Category::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Semantic (name resolution and type) errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unrecognized character in source
    E0001,
    /// Numeric literal with more than one decimal point
    E0002,
    /// Numeric literal out of range
    E0003,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Invalid token (a lexical error reached the parser)
    E1005,
    /// Invalid assignment target
    E1006,

    // Semantic Errors (E2xxx)
    /// Type mismatch
    E2001,
    /// Operator not applicable to operand type
    E2002,
    /// Unknown identifier
    E2003,
    /// Wrong number of arguments
    E2004,
    /// Return type mismatch
    E2005,
    /// Duplicate declaration in the same scope
    E2006,
    /// Statement-form expression used where a value is expected
    E2007,
    /// Unknown type name
    E2008,
    /// Assignment to something that is not a local variable
    E2009,
    /// Call of something that is not a function
    E2010,
    /// `return` whose value is not the function's result
    E2011,

    // Internal Errors (E9xxx)
    /// Type slot left empty after analysis
    E9001,
    /// IR well-formedness violated during lowering
    E9002,
}

impl ErrorCode {
    /// All error code variants, for iteration and exhaustive testing.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    /// Get the error code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Short description, as shown by `arxc --explain`.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "unrecognized character",
            ErrorCode::E0002 => "malformed numeric literal",
            ErrorCode::E0003 => "numeric literal out of range",
            ErrorCode::E1001 => "unexpected token",
            ErrorCode::E1002 => "expected expression",
            ErrorCode::E1003 => "unclosed delimiter",
            ErrorCode::E1004 => "expected identifier",
            ErrorCode::E1005 => "invalid token",
            ErrorCode::E1006 => "invalid assignment target",
            ErrorCode::E2001 => "type mismatch",
            ErrorCode::E2002 => "operator not applicable to type",
            ErrorCode::E2003 => "unknown identifier",
            ErrorCode::E2004 => "wrong number of arguments",
            ErrorCode::E2005 => "return type mismatch",
            ErrorCode::E2006 => "duplicate declaration",
            ErrorCode::E2007 => "statement used as a value",
            ErrorCode::E2008 => "unknown type",
            ErrorCode::E2009 => "invalid assignment",
            ErrorCode::E2010 => "not a function",
            ErrorCode::E2011 => "`return` outside tail position",
            ErrorCode::E9001 => "missing type annotation after analysis",
            ErrorCode::E9002 => "malformed IR",
        }
    }

    /// Phase category, from the leading digit.
    pub fn category(&self) -> Category {
        if self.is_lexer_error() {
            Category::Lexical
        } else if self.is_parser_error() {
            Category::Parse
        } else if self.is_semantic_error() {
            Category::Semantic
        } else {
            Category::Internal
        }
    }

    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    pub fn is_semantic_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    pub fn is_internal_error(&self) -> bool {
        self.as_str().starts_with("E9")
    }

    /// Parse a code string such as `"E2004"` (case-insensitive).
    pub fn from_code_str(code: &str) -> Option<ErrorCode> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
