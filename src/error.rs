//! Error types for deskviz operations.
//!
//! One crate-wide error enum covers configuration loading, scale
//! construction, the weather boundary, and per-widget failures. Widget
//! failures never cross the widget boundary; the dashboard converts them
//! into error scenes (see [`crate::dashboard`]).

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in deskviz operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (config file operations, demo output).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Invalid configuration value.
    #[error("invalid configuration value for '{key}': {message}")]
    ConfigInvalid {
        /// The configuration key with the invalid value.
        key: String,
        /// Why the value is invalid.
        message: String,
    },

    /// Scale domain error (e.g., equal domain endpoints).
    #[error("scale domain error: {0}")]
    ScaleDomain(String),

    /// Color parsing error.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Weather provider failure.
    #[error("weather provider error: {0}")]
    Weather(String),

    /// A widget failed to produce its scene.
    #[error("widget '{id}' failed: {message}")]
    Widget {
        /// The failing widget's id.
        id: String,
        /// Error message describing the failure.
        message: String,
    },
}
