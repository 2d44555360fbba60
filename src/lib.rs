/*!
 * files-to-prompt - Concatenate files into a single prompt for LLM context
 *
 * This library walks files and directories, filters them through hidden-file,
 * ignore-rule and glob checks, lightly compacts scripts and JSON, and renders
 * each file as a plain or XML-tagged document block.
 */

pub mod config;
pub mod error;
pub mod minify;
pub mod rules;
pub mod runner;
pub mod tokenizer;
pub mod transform;
pub mod walker;
pub mod writer;


// Re-export main components for easier access
pub use config::{Args, Config};
pub use error::{FtpError, Result};
pub use rules::IgnoreRuleSet;
pub use runner::render_paths;
pub use tokenizer::{count_file_tokens, Cl100kTokenizer, TokenCount, Tokenizer};
pub use transform::transform_content;
pub use walker::{WalkStatistics, Walker};
pub use writer::{DocumentWriter, OutputFormat, OutputSink};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
