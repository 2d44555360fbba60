//! Global error handling for files-to-prompt
//!
//! Only fatal conditions are represented here. Per-file problems (bad
//! encoding, malformed JSON, minifier failures) are handled where they occur
//! and never abort a run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::tokenizer::TokenizerError;

/// Global error type for files-to-prompt operations
#[derive(Error, Debug)]
pub enum FtpError {
    /// An input path given on the command line does not exist
    #[error("Path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    /// The output file exists and overwriting was not requested
    #[error("The file '{}' already exists. Use --force to overwrite.", .0.display())]
    OutputExists(PathBuf),

    /// The output file could not be opened for writing
    #[error("Unable to open output file '{}'. {source}", .path.display())]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Tokenizer-related errors
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Specialized Result type for files-to-prompt operations
pub type Result<T> = std::result::Result<T, FtpError>;

/// Returns an error result built from a variant and its payload
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $payload:expr) => {
        return Err($crate::error::FtpError::$error_type($payload.into()))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $payload:expr) => {
        if !($cond) {
            $crate::bail!($error_type, $payload)
        }
    };
}
