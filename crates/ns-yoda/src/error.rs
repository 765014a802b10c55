//! Error types for ns-yoda.

use thiserror::Error;

/// YODA codec error type.
#[derive(Error, Debug)]
pub enum YodaError {
    /// Mean requested for a histogram with zero in-range content.
    #[error("degenerate mean for '{path}': total in-range content is zero")]
    DegenerateMean {
        /// Histogram path.
        path: String,
    },

    /// `BEGIN` marker without a matching `END` before the end of input.
    #[error("unterminated block '{path}' opened at line {line}")]
    UnterminatedBlock {
        /// Path declared on the BEGIN line.
        path: String,
        /// 1-based line number of the BEGIN line.
        line: usize,
    },

    /// `BEGIN` line missing its type or path token.
    #[error("malformed BEGIN header at line {line}: {text:?}")]
    MalformedHeader {
        /// 1-based line number.
        line: usize,
        /// Offending line.
        text: String,
    },

    /// Histogram violates a structural invariant (edges, dimensions).
    #[error("invalid histogram: {0}")]
    InvalidHistogram(String),

    /// Path cannot be written as a single BEGIN-line token.
    #[error("invalid YODA path {path:?}: {reason}")]
    InvalidPath {
        /// Offending path.
        path: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Axis is not uniformly binned while uniform binning is required.
    #[error("non-uniform {axis} axis in '{path}'")]
    NonUniformAxis {
        /// Histogram path.
        path: String,
        /// Axis label (`x` or `y`).
        axis: &'static str,
    },

    /// Data row inside a block could not be decoded.
    #[error("malformed row at block line {line}: {reason}")]
    MalformedRow {
        /// 1-based line number within the block body.
        line: usize,
        /// What went wrong.
        reason: String,
    },

    /// Block class is neither Histo1D nor Histo2D.
    #[error("unsupported YODA class: {0}")]
    UnsupportedClass(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, YodaError>;
