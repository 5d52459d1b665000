//! Error types for the csvb command-line tool

use thiserror::Error;

/// Invalid command-line configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Delimiter must be one ASCII character
    #[error("Invalid delimiter '{0}': expected a single ASCII character")]
    InvalidDelimiter(String),

    /// Delimiter collides with the quote or comment character
    #[error("Invalid delimiter '{0}': reserved for quoting or comments")]
    ReservedDelimiter(char),
}

/// Errors raised while locating the input
#[derive(Debug, Error)]
pub enum InputError {
    /// `-` was given but stdin is a terminal
    #[error("stdin provided no input")]
    NoStdin,

    /// The input path exists but is not a regular file
    #[error("Not a file: '{0}'")]
    NotAFile(String),

    /// The input path could not be inspected or opened
    #[error("Cannot open '{path}': {source}")]
    Open {
        /// Path as given on the command line
        path: String,
        /// Underlying OS error
        source: std::io::Error,
    },
}
