/*!
 * Configuration handling for files-to-prompt
 */

use std::path::PathBuf;

use clap::Parser;

use crate::writer::OutputFormat;

/// Command-line arguments for files-to-prompt
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "files-to-prompt",
    version = crate::VERSION,
    about = "Concatenate a directory full of files into a single prompt for use with LLMs",
    long_about = "Takes one or more paths to files or directories and outputs every file, \
                  recursively, each one preceded with its filename.\n\n\
                  If the `--xml` flag is provided, the output is structured as XML document \
                  blocks suitable for a long context window."
)]
pub struct Args {
    /// Files or directories to process
    #[clap(value_parser = existing_path)]
    pub paths: Vec<PathBuf>,

    /// Include files and folders starting with .
    #[clap(long)]
    pub include_hidden: bool,

    /// Ignore .gitignore files and include all files
    #[clap(long)]
    pub ignore_gitignore: bool,

    /// Pattern to ignore (can be repeated)
    #[clap(long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Output file to write the results to
    #[clap(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it already exists
    #[clap(long)]
    pub force: bool,

    /// Count the number of tokens in the specified file
    #[clap(long = "count-tokens", value_name = "PATH", value_parser = existing_path)]
    pub count_tokens: Option<PathBuf>,

    /// Output in XML format suitable for a long context window
    #[clap(long)]
    pub xml: bool,

    /// Enable verbose logging
    #[clap(short, long)]
    pub verbose: bool,
}

/// Clap value parser accepting only paths that exist
fn existing_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("Path '{}' does not exist.", value))
    }
}

/// Application configuration
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Input files and directories, in command-line order
    pub paths: Vec<PathBuf>,

    /// Whether to include entries whose name starts with `.`
    pub include_hidden: bool,

    /// Whether to skip reading `.gitignore` files
    pub ignore_gitignore: bool,

    /// Extra name globs to exclude
    pub ignore_patterns: Vec<String>,

    /// Output file path; `None` writes to stdout
    pub output_file: Option<PathBuf>,

    /// Whether an existing output file may be overwritten
    pub force: bool,

    /// File to count tokens for instead of rendering
    pub count_tokens: Option<PathBuf>,

    /// Render format
    pub format: OutputFormat,

    /// Verbose logging
    pub verbose: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            paths: args.paths,
            include_hidden: args.include_hidden,
            ignore_gitignore: args.ignore_gitignore,
            ignore_patterns: args.ignore_patterns,
            output_file: args.output,
            force: args.force,
            count_tokens: args.count_tokens,
            format: if args.xml {
                OutputFormat::Xml
            } else {
                OutputFormat::Plain
            },
            verbose: args.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_to_config() {
        let args = Args::try_parse_from([
            "files-to-prompt",
            ".",
            "--ignore",
            "*.log",
            "--ignore",
            "dist/",
            "--xml",
            "--include-hidden",
        ])
        .unwrap();
        let config = Config::from_args(args);

        assert_eq!(config.paths, vec![PathBuf::from(".")]);
        assert_eq!(config.ignore_patterns, vec!["*.log", "dist/"]);
        assert_eq!(config.format, OutputFormat::Xml);
        assert!(config.include_hidden);
        assert!(!config.ignore_gitignore);
        assert!(config.output_file.is_none());
    }

    #[test]
    fn test_missing_path_is_usage_error() {
        let err = Args::try_parse_from(["files-to-prompt", "definitely/not/here"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
