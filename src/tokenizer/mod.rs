//! Token counting for a single file
//!
//! Counts use the `cl100k_base` encoding from tiktoken. The count is a
//! budget estimate for prompting, not a guarantee for any particular model.

mod error;

pub use error::{TokenizerError, TokenizerResult};

use std::fs;
use std::io;
use std::path::Path;

use tiktoken_rs::CoreBPE;

/// Result of token counting operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenCount {
    /// Number of tokens in the text
    pub tokens: usize,
    /// Length in characters of the text decoded back from those tokens
    pub chars: usize,
}

/// Trait defining the interface for tokenizers
pub trait Tokenizer {
    /// Count tokens in the given text
    fn count_tokens(&self, text: &str) -> TokenizerResult<TokenCount>;
}

/// Tokenizer backed by the `cl100k_base` BPE encoding
pub struct Cl100kTokenizer {
    encoding: CoreBPE,
}

impl Cl100kTokenizer {
    /// Load the encoding
    pub fn new() -> TokenizerResult<Self> {
        let encoding =
            tiktoken_rs::cl100k_base().map_err(|e| TokenizerError::Encoding(e.to_string()))?;
        Ok(Self { encoding })
    }
}

impl Tokenizer for Cl100kTokenizer {
    fn count_tokens(&self, text: &str) -> TokenizerResult<TokenCount> {
        let tokens = self.encoding.encode_ordinary(text);
        let count = tokens.len();
        let decoded = self
            .encoding
            .decode(tokens)
            .map_err(|e| TokenizerError::Decode(e.to_string()))?;

        Ok(TokenCount {
            tokens: count,
            chars: decoded.chars().count(),
        })
    }
}

/// Read `path` as text and count its tokens
pub fn count_file_tokens(path: &Path, tokenizer: &dyn Tokenizer) -> TokenizerResult<TokenCount> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TokenizerError::FileNotFound(path.to_path_buf()),
        _ => TokenizerError::IoError(e),
    })?;
    tokenizer.count_tokens(&content)
}
