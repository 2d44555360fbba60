//! Error types for the tokenizer module

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for tokenizer operations
pub type TokenizerResult<T> = Result<T, TokenizerError>;

/// Errors that can occur during tokenization
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// The file to count does not exist
    #[error("File not found - {}", .0.display())]
    FileNotFound(PathBuf),

    /// The encoding could not be loaded
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Tokens could not be decoded back into text
    #[error("Decode error: {0}")]
    Decode(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}
