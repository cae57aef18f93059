//! GsUnit error handling.
//!
//! Every failure mode of the library is a [`GsError`]. Assertion mismatches,
//! misuse of the assertion API, malformed scope configurations, and errors
//! raised by user code inside a scoped body are distinct variants so callers
//! (and `assert_throws`) can tell them apart.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Convenient alias used across the crate.
pub type GsResult<T> = Result<T, GsError>;

/// Type-safe error classification, the `instanceof` side of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// The base type; every error is an instance of it.
    Error,
    TypeError,
    RangeError,
    ReferenceError,
    SyntaxError,
    /// Raised by a failed assertion or `fail()`.
    AssertionFailure,
    /// Raised when an assertion is called with the wrong arguments.
    ArgumentError,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Error => "Error",
            ErrorType::TypeError => "TypeError",
            ErrorType::RangeError => "RangeError",
            ErrorType::ReferenceError => "ReferenceError",
            ErrorType::SyntaxError => "SyntaxError",
            ErrorType::AssertionFailure => "AssertionFailure",
            ErrorType::ArgumentError => "ArgumentError",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What was wrong with a scope configuration or invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// A value of the wrong shape, e.g. `params` that is not an array.
    TypeMismatch,
    /// The context manager was called with the wrong number of arguments.
    ArityMismatch,
}

/// Unified error type for GsUnit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GsError {
    #[error("Configuration error: {message}")]
    Configuration {
        kind: ConfigErrorKind,
        message: String,
    },
    #[error("{}", render_failure(.comment.as_deref(), .message))]
    AssertionFailure {
        comment: Option<String>,
        message: String,
    },
    #[error("Argument error: {description}")]
    Argument { description: String },
    #[error("{error_type}: {message}")]
    Body {
        error_type: ErrorType,
        message: String,
    },
}

fn render_failure(comment: Option<&str>, message: &str) -> String {
    match comment {
        Some(comment) => format!("Comment: {comment}  -- Failure: {message}"),
        None => format!("  -- Failure: {message}"),
    }
}

impl GsError {
    /// A plain `Error` raised by user code.
    pub fn error(message: impl Into<String>) -> Self {
        Self::body(ErrorType::Error, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::body(ErrorType::TypeError, message)
    }

    pub fn range_error(message: impl Into<String>) -> Self {
        Self::body(ErrorType::RangeError, message)
    }

    pub fn reference_error(message: impl Into<String>) -> Self {
        Self::body(ErrorType::ReferenceError, message)
    }

    pub fn syntax_error(message: impl Into<String>) -> Self {
        Self::body(ErrorType::SyntaxError, message)
    }

    fn body(error_type: ErrorType, message: impl Into<String>) -> Self {
        GsError::Body {
            error_type,
            message: message.into(),
        }
    }

    pub fn failure(comment: Option<&str>, message: impl Into<String>) -> Self {
        GsError::AssertionFailure {
            comment: comment.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn argument(description: impl Into<String>) -> Self {
        GsError::Argument {
            description: description.into(),
        }
    }

    pub fn config_type_mismatch(message: impl Into<String>) -> Self {
        GsError::Configuration {
            kind: ConfigErrorKind::TypeMismatch,
            message: message.into(),
        }
    }

    pub fn config_arity(message: impl Into<String>) -> Self {
        GsError::Configuration {
            kind: ConfigErrorKind::ArityMismatch,
            message: message.into(),
        }
    }

    /// Returns the classification used by `instanceof`-style checks.
    pub fn error_type(&self) -> ErrorType {
        match self {
            GsError::Configuration {
                kind: ConfigErrorKind::TypeMismatch,
                ..
            } => ErrorType::TypeError,
            GsError::Configuration { .. } => ErrorType::Error,
            GsError::AssertionFailure { .. } => ErrorType::AssertionFailure,
            GsError::Argument { .. } => ErrorType::ArgumentError,
            GsError::Body { error_type, .. } => *error_type,
        }
    }

    /// `Error` matches everything; any other type matches only itself.
    pub fn is_instance_of(&self, expected: ErrorType) -> bool {
        expected == ErrorType::Error || self.error_type() == expected
    }

    /// The bare message, without the variant prefix added by `Display`.
    pub fn message(&self) -> &str {
        match self {
            GsError::Configuration { message, .. }
            | GsError::AssertionFailure { message, .. }
            | GsError::Body { message, .. } => message,
            GsError::Argument { description } => description,
        }
    }

    /// Re-signals the same kind of error with `" --> origin"` appended to its message.
    pub fn with_provenance(mut self, origin: &str) -> Self {
        let message = match &mut self {
            GsError::Configuration { message, .. }
            | GsError::AssertionFailure { message, .. }
            | GsError::Body { message, .. } => message,
            GsError::Argument { description } => description,
        };
        message.push_str(" --> ");
        message.push_str(origin);
        self
    }
}

impl Diagnostic for GsError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self {
            GsError::Configuration { .. } => "gsunit::configuration",
            GsError::AssertionFailure { .. } => "gsunit::assertion",
            GsError::Argument { .. } => "gsunit::argument",
            GsError::Body { .. } => "gsunit::body",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self {
            GsError::Configuration {
                kind: ConfigErrorKind::TypeMismatch,
                ..
            } => "pass `params` as an array of values",
            GsError::Configuration {
                kind: ConfigErrorKind::ArityMismatch,
                ..
            } => "call with a config alone, or with a body followed by a config",
            GsError::Argument { .. } => {
                "assertions take an optional leading comment followed by their value arguments"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }
}

/// Prints a GsError with full miette diagnostics.
pub fn print_error(error: GsError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}
