//! Errors raised while parsing an argument vector.
//!
//! Every user-facing failure carries a numeric code. [`ParseError::report`]
//! renders the `error #<code>: <message>` line written by the terminate
//! path.

use thiserror::Error;

use crate::types::ValueCount;
use crate::validate::DeclarationError;

/// A caller-reported error (see [`Parser::on_error`](crate::Parser::on_error)).
pub const E_USER: i32 = 100;
/// A required option was not given.
pub const E_MISSING: i32 = 101;
/// A value was rejected, or an option ended with the wrong number of values.
pub const E_INVALID_VALUE: i32 = 102;
/// An option name not known to the active registry.
pub const E_UNRECOGNIZED_OPTION: i32 = 106;
/// A value nothing was willing to take.
pub const E_UNEXPECTED_VALUE: i32 = 107;
/// The positional count policy was violated.
pub const E_WRONG_POSITIONAL_COUNT: i32 = 108;

/// Errors that end a parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Raised by the caller after parsing.
    #[error("{0}")]
    User(String),

    /// A required option was never given.
    #[error("{0}")]
    Missing(String),

    /// The option's validator rejected a value.
    #[error("invalid value for {option}: {reason}")]
    InvalidValue { option: String, reason: String },

    /// An option ended the parse with too few or too many values.
    #[error("{0}")]
    WrongValueCount(String),

    /// `--name` or `-c` not declared in the active registry.
    #[error("unrecognized option {0}")]
    UnrecognizedOption(String),

    /// A value that no option would take and that could not be a positional.
    #[error("unexpected value {0}")]
    UnexpectedValue(String),

    /// The positional count does not satisfy the policy.
    #[error("expected {expected} positional arguments, got {got}")]
    WrongPositionalCount { expected: ValueCount, got: usize },

    /// The parser was configured inconsistently.
    #[error(transparent)]
    Declaration(#[from] DeclarationError),
}

impl ParseError {
    pub const fn code(&self) -> i32 {
        match self {
            Self::User(_) => E_USER,
            Self::Missing(_) => E_MISSING,
            Self::InvalidValue { .. } | Self::WrongValueCount(_) => E_INVALID_VALUE,
            Self::UnrecognizedOption(_) => E_UNRECOGNIZED_OPTION,
            Self::UnexpectedValue(_) => E_UNEXPECTED_VALUE,
            Self::WrongPositionalCount { .. } => E_WRONG_POSITIONAL_COUNT,
            Self::Declaration(err) => err.code(),
        }
    }

    /// The line written to stderr when the parser terminates on this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_core::ParseError;
    ///
    /// let err = ParseError::UnrecognizedOption("--colour".to_string());
    /// assert_eq!(err.report(), "error #106: unrecognized option --colour");
    /// ```
    pub fn report(&self) -> String {
        format!("error #{}: {self}", self.code())
    }
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;
