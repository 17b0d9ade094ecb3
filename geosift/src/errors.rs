use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::{atomic, Atomic};

/// Error kinds for geosift operations.
///
/// Each error kind describes a specific category of failure, enabling precise
/// error handling. The query pipeline raises `SyntaxError` for malformed
/// predicate strings, `ValidationError` for bad classification configuration,
/// and `DataError` when a classification field yields no usable numbers.
///
/// # Examples
///
/// ```rust,ignore
/// use geosift::errors::{GeosiftError, ErrorKind, GeosiftResult};
///
/// fn example() -> GeosiftResult<()> {
///     Err(GeosiftError::new("unbalanced parentheses", ErrorKind::SyntaxError))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Predicate Errors - raised by the expression compiler
    /// Malformed predicate string (unbalanced parentheses, unknown operator,
    /// unterminated literal, trailing tokens)
    SyntaxError,

    // Configuration Errors - raised while normalizing an options document
    /// Unknown classification type/method/normalization token, field count
    /// outside the permitted range, or an unknown grouping field
    ValidationError,

    // Data Errors - raised after scanning the filtered record set
    /// Classification field yields an empty numeric set after coercion
    /// and normalization
    DataError,

    // Field Errors - actively used in attribute validation
    /// Invalid or empty field name
    InvalidFieldName,
    /// Invalid data type for operation
    InvalidDataType,

    // Boundary Errors - raised while deserializing an options document
    /// Options document could not be decoded
    EncodingError,

    // Generic/Internal Errors - used as fallback
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::SyntaxError => write!(f, "Syntax error"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::DataError => write!(f, "Data error"),
            ErrorKind::InvalidFieldName => write!(f, "Invalid field name"),
            ErrorKind::InvalidDataType => write!(f, "Invalid data type"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom geosift error type.
///
/// `GeosiftError` encapsulates error information including the error message,
/// kind, and optional cause. It supports error chaining and backtraces for
/// debugging.
///
/// # Examples
///
/// ```rust,ignore
/// use geosift::errors::{GeosiftError, ErrorKind};
///
/// // Create a simple error
/// let err = GeosiftError::new("unknown classification method", ErrorKind::ValidationError);
///
/// // Create an error with a cause
/// let cause = GeosiftError::new("unterminated string literal", ErrorKind::SyntaxError);
/// let err = GeosiftError::new_with_cause("cannot compile predicate", ErrorKind::SyntaxError, cause);
/// ```
///
/// # Type alias
///
/// The `GeosiftResult<T>` type alias is equivalent to `Result<T, GeosiftError>`
/// and is used throughout the codebase for operations that can fail.
#[derive(Clone)]
pub struct GeosiftError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<GeosiftError>>,
    backtrace: Atomic<Backtrace>,
}

impl GeosiftError {
    /// Creates a new `GeosiftError` with the specified message and error kind.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_kind` - The category of error
    ///
    /// # Returns
    ///
    /// A new `GeosiftError` instance.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        GeosiftError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `GeosiftError` with a cause error.
    ///
    /// This creates an error chain where the cause error is preserved for
    /// debugging.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_kind` - The category of error
    /// * `cause` - The underlying error that caused this error
    ///
    /// # Returns
    ///
    /// A new `GeosiftError` instance with the cause error attached.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: GeosiftError) -> Self {
        GeosiftError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&Box<GeosiftError>> {
        self.cause.as_ref()
    }
}

impl Display for GeosiftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for GeosiftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for GeosiftError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for geosift operations.
///
/// `GeosiftResult<T>` is shorthand for `Result<T, GeosiftError>`.
/// All fallible geosift operations return this type.
pub type GeosiftResult<T> = Result<T, GeosiftError>;

// From trait implementations for automatic error conversion
impl From<std::num::ParseFloatError> for GeosiftError {
    fn from(err: std::num::ParseFloatError) -> Self {
        GeosiftError::new(
            &format!("Float parsing error: {}", err),
            ErrorKind::InvalidDataType,
        )
    }
}

impl From<std::num::ParseIntError> for GeosiftError {
    fn from(err: std::num::ParseIntError) -> Self {
        GeosiftError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::InvalidDataType,
        )
    }
}

impl From<serde_json::Error> for GeosiftError {
    fn from(err: serde_json::Error) -> Self {
        GeosiftError::new(
            &format!("Options decoding error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<String> for GeosiftError {
    fn from(msg: String) -> Self {
        GeosiftError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for GeosiftError {
    fn from(msg: &str) -> Self {
        GeosiftError::new(msg, ErrorKind::InternalError)
    }
}
