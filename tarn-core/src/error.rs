// tarn-core - Error types for the tarn evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Error types for tarn evaluation.
//!
//! Three kinds of failure travel through the same channel: reader errors
//! (textual parse failures, never catchable because they never reach
//! evaluation), runtime errors (host-origin failures in the evaluator or a
//! builtin, catchable by `try*` as a message string) and user errors (values
//! raised by `throw`, catchable by `try*` as the raw payload). Every error
//! carries an optional source cursor and formats as
//! `module(Lrow,col): message`, degrading as cursor fields go missing.

use std::fmt;

use tarn_parser::{ParseError, Position, TarnVal, pr_str};

/// Result type for tarn evaluation.
pub type Result<T> = std::result::Result<T, Error>;

/// An evaluation failure: an error kind plus the cursor of the offending
/// form, when one is known.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    cursor: Option<Position>,
}

/// The kinds of failure the evaluator and builtins can produce.
#[derive(Debug, Clone)]
pub enum ErrorKind {
    /// Textual parse failure from the reader
    Reader(ParseError),
    /// Unresolved symbol lookup
    UndefinedSymbol(String),
    /// Wrong number of arguments to a function
    Arity {
        expected: AritySpec,
        got: usize,
        name: Option<String>,
    },
    /// Wrong type for an operation
    Type {
        expected: &'static str,
        got: &'static str,
        context: Option<String>,
    },
    /// Attempted to call something that isn't callable
    NotCallable,
    /// Division by zero
    DivisionByZero,
    /// Integer overflow
    IntegerOverflow { operation: &'static str },
    /// Invalid special form syntax
    Syntax { form: &'static str, message: String },
    /// General evaluation error
    Eval(String),
    /// I/O error (file operations)
    Io {
        operation: &'static str,
        path: String,
        message: String,
    },
    /// Value thrown by the language-level `throw`
    Thrown(TarnVal),
    /// Cooperative cancellation unwind
    Cancelled,
}

/// Specification for expected arity.
#[derive(Debug, Clone)]
pub enum AritySpec {
    Exact(usize),
    AtLeast(usize),
}

impl fmt::Display for AritySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AritySpec::Exact(n) => write!(f, "{}", n),
            AritySpec::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Reader(e) => write!(f, "{}", e.message),
            ErrorKind::UndefinedSymbol(name) => write!(f, "'{}' not found", name),
            ErrorKind::Arity {
                expected,
                got,
                name,
            } => {
                if let Some(name) = name {
                    write!(
                        f,
                        "wrong number of arguments to '{}': expected {}, got {}",
                        name, expected, got
                    )
                } else {
                    write!(
                        f,
                        "wrong number of arguments: expected {}, got {}",
                        expected, got
                    )
                }
            }
            ErrorKind::Type {
                expected,
                got,
                context,
            } => {
                if let Some(ctx) = context {
                    write!(f, "{}: expected {}, got {}", ctx, expected, got)
                } else {
                    write!(f, "type error: expected {}, got {}", expected, got)
                }
            }
            ErrorKind::NotCallable => write!(f, "attempt to call non-function"),
            ErrorKind::DivisionByZero => write!(f, "division by zero"),
            ErrorKind::IntegerOverflow { operation } => {
                write!(f, "integer overflow in '{}'", operation)
            }
            ErrorKind::Syntax { form, message } => write!(f, "{}: {}", form, message),
            ErrorKind::Eval(message) => write!(f, "{}", message),
            ErrorKind::Io {
                operation,
                path,
                message,
            } => write!(f, "{} '{}': {}", operation, path, message),
            ErrorKind::Thrown(val) => write!(f, "{}", pr_str(val, true)),
            ErrorKind::Cancelled => write!(f, "timeout while evaluating expression"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cursor {
            Some(cursor) if !cursor.is_unknown() => write!(f, "{}: {}", cursor, self.kind),
            _ => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for Error {}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        let cursor = if e.cursor.is_unknown() {
            None
        } else {
            Some(e.cursor.clone())
        };
        Error {
            kind: ErrorKind::Reader(e),
            cursor,
        }
    }
}

impl Error {
    /// Wrap an error kind with no cursor.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Error { kind, cursor: None }
    }

    /// Attach `cursor` when this error does not already carry one; the
    /// innermost cursor wins.
    #[must_use]
    pub fn with_cursor(mut self, cursor: Option<&Position>) -> Self {
        if self.cursor.is_none() {
            self.cursor = cursor.cloned();
        }
        self
    }

    /// The error kind.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The cursor of the offending form, if known.
    #[must_use]
    pub fn cursor(&self) -> Option<&Position> {
        self.cursor.as_ref()
    }

    /// Whether `try*` may intercept this error. Reader errors never reach
    /// evaluation and cancellation stays non-catchable to preserve timeout
    /// semantics.
    #[must_use]
    pub fn is_catchable(&self) -> bool {
        !matches!(self.kind, ErrorKind::Reader(_) | ErrorKind::Cancelled)
    }

    /// The value `catch*` binds: the raw payload for a thrown user error,
    /// the message string for everything else.
    #[must_use]
    pub fn catch_value(&self) -> TarnVal {
        match &self.kind {
            ErrorKind::Thrown(val) => val.clone(),
            other => TarnVal::string(other.to_string()),
        }
    }

    /// True when the underlying reader error means "input was cut short";
    /// the interactive shell keeps reading lines on this.
    #[must_use]
    pub fn is_incomplete_input(&self) -> bool {
        matches!(&self.kind, ErrorKind::Reader(e) if e.is_incomplete_input())
    }

    /// True for the `<empty line>` reader error, which shells ignore.
    #[must_use]
    pub fn is_empty_input(&self) -> bool {
        matches!(&self.kind, ErrorKind::Reader(e) if e.message == "<empty line>")
    }

    // ------------------------------------------------------------------------
    // Constructor helpers
    // ------------------------------------------------------------------------

    /// Create an undefined symbol error: `'<name>' not found`.
    pub fn undefined(name: impl Into<String>) -> Self {
        Error::new(ErrorKind::UndefinedSymbol(name.into()))
    }

    /// Create an arity error for exact arity with function name.
    pub fn arity_named(name: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::new(ErrorKind::Arity {
            expected: AritySpec::Exact(expected),
            got,
            name: Some(name.into()),
        })
    }

    /// Create an arity error for minimum arity with function name.
    pub fn arity_at_least(name: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::new(ErrorKind::Arity {
            expected: AritySpec::AtLeast(expected),
            got,
            name: Some(name.into()),
        })
    }

    /// Create a type error.
    pub fn type_error(expected: &'static str, got: &'static str) -> Self {
        Error::new(ErrorKind::Type {
            expected,
            got,
            context: None,
        })
    }

    /// Create a type error with context.
    pub fn type_error_in(
        context: impl Into<String>,
        expected: &'static str,
        got: &'static str,
    ) -> Self {
        Error::new(ErrorKind::Type {
            expected,
            got,
            context: Some(context.into()),
        })
    }

    /// Create an invalid syntax error.
    pub fn syntax(form: &'static str, message: impl Into<String>) -> Self {
        Error::new(ErrorKind::Syntax {
            form,
            message: message.into(),
        })
    }

    /// Create a general evaluation error.
    pub fn eval(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::Eval(message.into()))
    }

    /// Create an I/O error from a `std::io::Error`.
    pub fn io(operation: &'static str, path: impl Into<String>, error: std::io::Error) -> Self {
        Error::new(ErrorKind::Io {
            operation,
            path: path.into(),
            message: error.to_string(),
        })
    }

    /// Create a user error carrying `payload`.
    pub fn thrown(payload: TarnVal) -> Self {
        Error::new(ErrorKind::Thrown(payload))
    }

    /// Create a not-callable error.
    pub fn not_callable() -> Self {
        Error::new(ErrorKind::NotCallable)
    }

    /// Create a cancellation error.
    pub fn cancelled() -> Self {
        Error::new(ErrorKind::Cancelled)
    }

    /// Create an integer overflow error.
    pub fn overflow(operation: &'static str) -> Self {
        Error::new(ErrorKind::IntegerOverflow { operation })
    }

    /// Create a division by zero error.
    pub fn division_by_zero() -> Self {
        Error::new(ErrorKind::DivisionByZero)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_symbol_message() {
        assert_eq!(Error::undefined("x").to_string(), "'x' not found");
    }

    #[test]
    fn test_cursor_prefix() {
        let err = Error::undefined("x").with_cursor(Some(&Position {
            module: Some(std::rc::Rc::from("lib.tarn")),
            row: 3,
            col: 9,
        }));
        assert_eq!(err.to_string(), "lib.tarn(L3,9): 'x' not found");
    }

    #[test]
    fn test_unknown_row_suppresses_cursor() {
        let err = Error::undefined("x").with_cursor(Some(&Position::new(0, 0)));
        assert_eq!(err.to_string(), "'x' not found");
    }

    #[test]
    fn test_missing_column_degrades() {
        let err = Error::undefined("x").with_cursor(Some(&Position::new(7, 0)));
        assert_eq!(err.to_string(), "(L7): 'x' not found");
    }

    #[test]
    fn test_innermost_cursor_wins() {
        let err = Error::undefined("x")
            .with_cursor(Some(&Position::new(1, 1)))
            .with_cursor(Some(&Position::new(9, 9)));
        assert_eq!(err.cursor(), Some(&Position::new(1, 1)));
    }

    #[test]
    fn test_thrown_catch_value_is_payload() {
        let payload = TarnVal::map(vec![("code".to_string(), TarnVal::Int(42))]);
        let err = Error::thrown(payload.clone());
        assert_eq!(err.catch_value(), payload);
    }

    #[test]
    fn test_runtime_catch_value_is_message_string() {
        let err = Error::undefined("boom").with_cursor(Some(&Position::new(1, 1)));
        // The bound value is the bare message, without the cursor prefix.
        assert_eq!(err.catch_value(), TarnVal::string("'boom' not found"));
    }

    #[test]
    fn test_cancelled_is_not_catchable() {
        let err = Error::cancelled();
        assert!(!err.is_catchable());
        assert_eq!(err.to_string(), "timeout while evaluating expression");
    }

    #[test]
    fn test_arity_message() {
        assert_eq!(
            Error::arity_named("nth", 2, 1).to_string(),
            "wrong number of arguments to 'nth': expected 2, got 1"
        );
    }
}
