//! Error types for sparsemat

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Result type alias using [`SparseError`]
pub type Result<T> = std::result::Result<T, SparseError>;

/// Errors that can occur while loading, saving or operating on sparse matrices
#[derive(Error, Debug)]
pub enum SparseError {
    /// Malformed matrix description
    #[error("Input file has wrong format at line {line}: {reason}")]
    Format {
        /// 1-based line number of the offending line
        line: usize,
        /// What was wrong with it
        reason: FormatReason,
    },

    /// Element access outside the matrix shape
    #[error("Matrix index ({row}, {col}) out of bounds for {n_rows}x{n_cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        n_rows: usize,
        n_cols: usize,
    },

    /// Operands of an element-wise operation have different shapes
    #[error("Matrix dimensions must match for {op}: {lhs:?} vs {rhs:?}")]
    DimensionMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    /// Inner dimensions of a product do not agree
    #[error("Matrix dimensions incompatible for multiplication: {lhs:?} x {rhs:?}")]
    IncompatibleDimensions {
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    /// A matrix must have at least one row and one column
    #[error("Matrix dimensions must be positive, got {n_rows}x{n_cols}")]
    InvalidDimensions { n_rows: usize, n_cols: usize },

    /// Value range that cannot produce a non-zero value
    #[error("Value range {min}..={max} contains no non-zero value")]
    InvalidValueRange { min: crate::Value, max: crate::Value },

    /// Arithmetic result does not fit in a [`crate::Value`]
    #[error("Integer overflow computing element ({row}, {col})")]
    Overflow { row: usize, col: usize },

    /// File could not be read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failure reading from a caller-supplied stream
    #[error("I/O error: {0}")]
    Stream(#[from] io::Error),
}

impl SparseError {
    pub(crate) fn format(line: usize, reason: FormatReason) -> Self {
        Self::Format { line, reason }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Reasons a line of a matrix description is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatReason {
    /// Header line absent (file too short)
    MissingHeader(&'static str),
    /// Header line without the expected `rows=` / `cols=` prefix
    BadHeader(&'static str),
    /// Header dimension is zero or negative
    NonPositiveDimension(&'static str),
    /// Entry line not wrapped in parentheses
    NotParenthesized,
    /// Entry line does not split into exactly three fields
    FieldCount(usize),
    /// A field is not a strict integer
    NotAnInteger,
    /// A field contains a decimal point
    FloatingPoint,
    /// A field is a well-formed integer that does not fit the value type
    OutOfRange,
    /// Line is not valid UTF-8
    InvalidUtf8,
}

impl fmt::Display for FormatReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader(key) => write!(f, "missing `{}=` header", key),
            Self::BadHeader(key) => write!(f, "expected line to start with `{}=`", key),
            Self::NonPositiveDimension(key) => write!(f, "`{}` must be a positive integer", key),
            Self::NotParenthesized => write!(f, "entry must be wrapped in parentheses"),
            Self::FieldCount(n) => write!(f, "expected 3 comma-separated fields, found {}", n),
            Self::NotAnInteger => write!(f, "invalid integer format"),
            Self::FloatingPoint => write!(f, "floating point values not allowed"),
            Self::OutOfRange => write!(f, "integer out of range"),
            Self::InvalidUtf8 => write!(f, "line is not valid UTF-8"),
        }
    }
}
