//! Error types for the docweave library.

use std::io;
use thiserror::Error;

/// Result type alias for docweave operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while recovering document structure.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The detection input could not be deserialized.
    #[error("Input parsing error: {0}")]
    InputParse(#[from] serde_json::Error),

    /// A heading rule declares a level below 1.
    #[error("Invalid heading rule: level must be >= 1, got {0}")]
    InvalidRuleLevel(i64),

    /// A heading rule carries an unparsable font-name pattern.
    #[error("Invalid font-name pattern {pattern:?}: {message}")]
    InvalidRulePattern {
        /// The offending pattern source.
        pattern: String,
        /// The regex engine's diagnostic.
        message: String,
    },

    /// A recipe was supplied but contains no rules.
    #[error("Recipe contains no heading rules")]
    EmptyRecipe,

    /// The detection input has no pages.
    #[error("Detection input contains no pages")]
    EmptyInput,

    /// Error during rendering (Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidRulePattern {
            pattern: String::new(),
            message: err.to_string(),
        }
    }
}
