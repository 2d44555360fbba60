/*!
 * Command-line interface for files-to-prompt
 */

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use files_to_prompt::config::{Args, Config};
use files_to_prompt::error::Result;
use files_to_prompt::rules::IgnoreRuleSet;
use files_to_prompt::runner::render_paths;
use files_to_prompt::tokenizer::{count_file_tokens, Cl100kTokenizer, TokenizerError};
use files_to_prompt::writer::OutputSink;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    // Create configuration
    let config = Config::from_args(args);

    init_logging(config.verbose);

    if let Some(path) = &config.count_tokens {
        return run_count_tokens(path);
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; RUST_LOG directives take precedence over the default level
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn run(config: &Config) -> Result<()> {
    // Loaded once and shared read-only by every input path
    let bundled = IgnoreRuleSet::bundled();

    let sink = OutputSink::open(config)?;
    let (mut sink, statistics) = render_paths(config, &bundled, sink)?;
    sink.flush()?;

    tracing::info!(
        "Done: {} files rendered, {} skipped",
        statistics.files_rendered,
        statistics.files_skipped
    );
    Ok(())
}

fn run_count_tokens(path: &Path) -> ExitCode {
    let result = Cl100kTokenizer::new().and_then(|tokenizer| count_file_tokens(path, &tokenizer));

    match result {
        Ok(count) => {
            println!("Token count for {}: {}", path.display(), count.chars);
            ExitCode::SUCCESS
        }
        Err(e @ TokenizerError::FileNotFound(_)) => {
            eprintln!("{}", format!("Error: {}", e).red());
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!(
                "{}",
                format!("Error: Error processing file {}: {}", path.display(), e).red()
            );
            ExitCode::FAILURE
        }
    }
}
