use crate::String;
use crate::values::ValueKind;

/// Broad class of an evaluation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed literal or premature end of input.
    Lexical,
    /// A token that cannot appear where it was found.
    Structural,
    /// Well-formed template that refers to something invalid.
    Semantic,
    /// Nesting and range size limits.
    ResourceExceeded,
    /// A broken evaluator invariant.
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("The string literal is not closed by '\"'")]
    UnterminatedString,

    #[error("Unexpected end of input, expecting '}}' to close the body")]
    UnterminatedBody,

    #[error("Unexpected end of input, expecting '`' to end the code segment")]
    UnterminatedSegment,

    #[error("Number literal '{0}' is out of range")]
    NumberOutOfRange(String),

    #[error("Unexpected {found}, expected {expected}")]
    UnexpectedToken {
        found: &'static str,
        expected: &'static str,
    },

    #[error("Empty list")]
    EmptyList,

    #[error("Section is not closed before the end of input")]
    UnclosedSection,

    #[error("Unexpected '>' outside of a section")]
    StraySectionClose,

    #[error("Variable '{name}' in section '{scope}' does not exist")]
    UnknownVariable { name: String, scope: String },

    #[error("The range operation must come with two number operands, found {found}")]
    RangeOperandNotNumber { found: ValueKind },

    #[error(
        "The left operand of a range must be less than the right operand, found {from}-{to}"
    )]
    InvalidRange { from: i64, to: i64 },

    #[error("Template nesting exceeds maximum depth of {0}")]
    DepthExceeded(usize),

    #[error("Range of {len} elements exceeds the maximum length of {max}")]
    RangeTooLong { len: u64, max: usize },

    #[error("Internal error: {0}")]
    Internal(&'static str),
}

impl EvalErrorKind {
    pub fn category(&self) -> ErrorCategory {
        use EvalErrorKind::*;
        match self {
            UnterminatedString | UnterminatedBody | UnterminatedSegment | NumberOutOfRange(_) => {
                ErrorCategory::Lexical
            }
            UnexpectedToken { .. } | EmptyList | UnclosedSection | StraySectionClose => {
                ErrorCategory::Structural
            }
            UnknownVariable { .. } | RangeOperandNotNumber { .. } | InvalidRange { .. } => {
                ErrorCategory::Semantic
            }
            DepthExceeded(_) | RangeTooLong { .. } => ErrorCategory::ResourceExceeded,
            Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Stable identifier for documentation lookup.
    pub fn code(&self) -> &'static str {
        use EvalErrorKind::*;
        match self {
            UnterminatedString => "K001",
            UnterminatedBody => "K002",
            UnterminatedSegment => "K003",
            NumberOutOfRange(_) => "K004",
            UnexpectedToken { .. } => "K101",
            EmptyList => "K102",
            UnclosedSection => "K103",
            StraySectionClose => "K104",
            UnknownVariable { .. } => "K201",
            RangeOperandNotNumber { .. } => "K202",
            InvalidRange { .. } => "K203",
            DepthExceeded(_) => "K301",
            RangeTooLong { .. } => "K302",
            Internal(_) => "K901",
        }
    }

    pub fn help(&self) -> Option<&'static str> {
        use EvalErrorKind::*;
        match self {
            UnknownVariable { .. } => {
                Some("Bind the variable before cooking, or check that its section is enabled")
            }
            EmptyList => Some("A list needs at least one element"),
            RangeTooLong { .. } => Some("Bind the list as a value, or raise the range limit"),
            StraySectionClose => Some("Sections are opened with <\"name\">"),
            UnterminatedBody => Some("Use \\$ to write a literal '$' inside a body"),
            _ => None,
        }
    }
}

/// An evaluation failure at a byte offset of the template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub offset: usize,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}
