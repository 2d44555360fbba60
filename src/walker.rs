/*!
 * Recursive traversal of input paths
 *
 * Each directory level is filtered in a fixed order: hidden entries, then
 * ignore rules (bundled plus accumulated `.gitignore` files), then the
 * user's `--ignore` patterns. Surviving files are rendered in name order
 * before the surviving subdirectories are visited, also in name order.
 *
 * `.gitignore` rules are appended to one list for the whole walk and are
 * never dropped when the walk leaves the directory they came from. This
 * deliberately differs from git's scoping.
 */

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;
use walkdir::WalkDir;

use crate::config::Config;
use crate::rules::{matches_name, IgnoreRuleSet};
use crate::transform::transform_content;
use crate::writer::DocumentWriter;

/// Walk statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStatistics {
    /// Files written to the output
    pub files_rendered: usize,
    /// Files skipped because they could not be read as text
    pub files_skipped: usize,
    /// Directories traversed, including input directories
    pub directories_visited: usize,
}

/// Outcome of reading one file as text
enum ReadOutcome {
    Text(String),
    Skipped,
}

/// Walks input paths and renders every surviving file
pub struct Walker<'a> {
    /// Walker configuration
    config: &'a Config,
    /// Walker statistics
    statistics: WalkStatistics,
}

impl<'a> Walker<'a> {
    /// Create a new walker
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            statistics: WalkStatistics::default(),
        }
    }

    /// Get walker statistics
    pub fn statistics(&self) -> WalkStatistics {
        self.statistics
    }

    /// Render `path`: a file directly, a directory recursively.
    ///
    /// `rules` grows as `.gitignore` files are found and keeps those rules
    /// afterwards. Only write failures on the output are returned as errors.
    pub fn walk_path<W: Write>(
        &mut self,
        path: &Path,
        rules: &mut IgnoreRuleSet,
        writer: &mut DocumentWriter<W>,
    ) -> io::Result<()> {
        if path.is_dir() {
            self.walk_directory(path, rules, writer)
        } else {
            self.render_file(path, writer)
        }
    }

    fn walk_directory<W: Write>(
        &mut self,
        dir: &Path,
        rules: &mut IgnoreRuleSet,
        writer: &mut DocumentWriter<W>,
    ) -> io::Result<()> {
        self.statistics.directories_visited += 1;

        let (mut dirs, mut files) = list_directory(dir);

        if !self.config.include_hidden {
            dirs.retain(|(name, _)| !is_hidden(name));
            files.retain(|(name, _)| !is_hidden(name));
        }

        if !self.config.ignore_gitignore {
            rules.extend(IgnoreRuleSet::load_gitignore(dir));
        }
        dirs.retain(|(name, _)| !rules.is_ignored(name, true));
        files.retain(|(name, _)| !rules.is_ignored(name, false));

        let patterns = &self.config.ignore_patterns;
        dirs.retain(|(name, _)| !matches_name(name, patterns));
        files.retain(|(name, _)| !matches_name(name, patterns));

        for (_, path) in &files {
            self.render_file(path, writer)?;
        }
        for (_, path) in &dirs {
            self.walk_directory(path, rules, writer)?;
        }
        Ok(())
    }

    fn render_file<W: Write>(&mut self, path: &Path, writer: &mut DocumentWriter<W>) -> io::Result<()> {
        match read_text(path) {
            ReadOutcome::Text(content) => {
                let content = transform_content(path, content);
                writer.write_document(path, &content)?;
                self.statistics.files_rendered += 1;
            }
            ReadOutcome::Skipped => self.statistics.files_skipped += 1,
        }
        Ok(())
    }
}

/// Split a directory's immediate entries into `(name, path)` lists of
/// subdirectories and files, each sorted by name.
///
/// Symlinks are not followed into directories; a symlink to a file counts
/// as a file. Entries that cannot be listed are logged and dropped.
fn list_directory(dir: &Path) -> (Vec<(String, PathBuf)>, Vec<(String, PathBuf)>) {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    let entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        let file_type = entry.file_type();
        if file_type.is_dir() {
            dirs.push((name, entry.into_path()));
        } else if file_type.is_symlink() && entry.path().is_dir() {
            tracing::debug!("Not following directory symlink {}", entry.path().display());
        } else {
            files.push((name, entry.into_path()));
        }
    }

    (dirs, files)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Read a file as UTF-8 text, warning on stderr when it has to be skipped
fn read_text(path: &Path) -> ReadOutcome {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn_skip(&format!(
                "Warning: Skipping file {} due to read error: {}",
                path.display(),
                e
            ));
            return ReadOutcome::Skipped;
        }
    };

    match String::from_utf8(bytes) {
        Ok(text) => ReadOutcome::Text(normalize_newlines(text)),
        Err(_) => {
            warn_skip(&format!(
                "Warning: Skipping file {} due to UnicodeDecodeError",
                path.display()
            ));
            ReadOutcome::Skipped
        }
    }
}

fn warn_skip(message: &str) {
    eprintln!("{}", message.red());
}

/// Convert `\r\n` and lone `\r` line endings to `\n`
fn normalize_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
