//! Public error types for the Kettle API.
//!
//! Evaluation failures are converted to these types at the engine boundary,
//! where the byte offset of the failure is resolved to a line and column.

use core::ops::Range;

use crate::evaluator::{ErrorCategory, EvalError};
use crate::lexer;
use crate::{String, ToString};

#[cfg(feature = "std")]
use std::fmt;

#[cfg(not(feature = "std"))]
use core::fmt;

/// Public error type for all Kettle operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The template is malformed or refers to something that does not exist.
    Template {
        diagnostic: Diagnostic,
        source: String,
        filename: Option<String>,
    },

    /// The template nests deeper than the engine allows.
    ResourceExceeded {
        diagnostic: Diagnostic,
        source: String,
        filename: Option<String>,
    },

    /// The evaluator reached a state it should never be in.
    Internal {
        diagnostic: Diagnostic,
        source: String,
        filename: Option<String>,
    },
}

impl Error {
    /// Build the public error for `err` raised while cooking `source`.
    pub fn from_eval(err: EvalError, source: &str) -> Self {
        let diagnostic = Diagnostic::from_eval(&err, source);
        let source = source.to_string();
        let filename = None;
        match err.kind.category() {
            ErrorCategory::ResourceExceeded => Error::ResourceExceeded {
                diagnostic,
                source,
                filename,
            },
            ErrorCategory::Internal => Error::Internal {
                diagnostic,
                source,
                filename,
            },
            ErrorCategory::Lexical | ErrorCategory::Structural | ErrorCategory::Semantic => {
                Error::Template {
                    diagnostic,
                    source,
                    filename,
                }
            }
        }
    }

    /// The diagnostic describing this error.
    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            Error::Template { diagnostic, .. }
            | Error::ResourceExceeded { diagnostic, .. }
            | Error::Internal { diagnostic, .. } => diagnostic,
        }
    }

    /// The template text that failed to cook.
    pub fn template(&self) -> &str {
        match self {
            Error::Template { source, .. }
            | Error::ResourceExceeded { source, .. }
            | Error::Internal { source, .. } => source,
        }
    }

    /// Error message without location.
    pub fn message(&self) -> &str {
        &self.diagnostic().message
    }

    /// Set the filename for this error.
    ///
    /// The engine only sees template text, so callers that loaded the
    /// template from a file attach the name afterwards.
    pub fn with_filename(mut self, name: impl Into<String>) -> Self {
        match &mut self {
            Error::Template { filename, .. }
            | Error::ResourceExceeded { filename, .. }
            | Error::Internal { filename, .. } => *filename = Some(name.into()),
        }
        self
    }

    /// Get the filename associated with this error, if any.
    pub fn filename(&self) -> Option<&str> {
        match self {
            Error::Template { filename, .. }
            | Error::ResourceExceeded { filename, .. }
            | Error::Internal { filename, .. } => filename.as_deref(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let diagnostic = self.diagnostic();
        write!(
            f,
            "[Error({},{})]: {}",
            diagnostic.line, diagnostic.column, diagnostic.message
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// An error message anchored to a location in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Primary diagnostic message.
    pub message: String,

    /// Byte range of the offending text.
    pub span: Range<usize>,

    /// 1-based line of `span.start`.
    pub line: usize,

    /// 1-based column of `span.start`, counted in characters.
    pub column: usize,

    /// Error code (e.g., "K201") for documentation lookup.
    pub code: &'static str,

    /// Suggestion on how to fix the issue.
    pub help: Option<String>,
}

impl Diagnostic {
    fn from_eval(err: &EvalError, source: &str) -> Self {
        let start = err.offset.min(source.len());
        let end = source[start..]
            .chars()
            .next()
            .map_or(start, |c| start + c.len_utf8());
        let (line, column) = lexer::location(source, start);
        Diagnostic {
            message: err.kind.to_string(),
            span: start..end,
            line,
            column,
            code: err.kind.code(),
            help: err.kind.help().map(ToString::to_string),
        }
    }
}
