/*!
 * Ignore rules: pattern matching and rule loading
 *
 * Rules are shell-style globs matched against an entry's base name only.
 * Directories are also tested with a trailing `/`, so a pattern such as
 * `build/` excludes a `build` directory but not a file of the same name.
 * There is no negation and no anchoring to the directory a rule came from.
 */

use std::fs;
use std::io;
use std::path::Path;

use glob_match::glob_match;

/// Name of the per-directory rule file
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Rules shipped with the tool and applied on every run
const BUNDLED_RULES: &str = include_str!("../assets/ftpignore");

/// An ordered, append-only list of ignore patterns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRuleSet {
    patterns: Vec<String>,
}

impl IgnoreRuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// The always-applied rule list bundled into the binary
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_RULES)
    }

    /// Parse rule-file text: one pattern per line, trimmed, skipping blank
    /// lines and `#` comments
    pub fn parse(text: &str) -> Self {
        let patterns = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect();
        Self { patterns }
    }

    /// Build a rule set from patterns taken verbatim
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Read the `.gitignore` in `dir`, if there is one.
    ///
    /// A missing file yields an empty set. A file that exists but cannot be
    /// read is logged and also treated as empty.
    pub fn load_gitignore(dir: &Path) -> Self {
        let path = dir.join(GITIGNORE_FILE);
        if !path.is_file() {
            return Self::new();
        }

        match read_rules_file(&path) {
            Ok(rules) => {
                tracing::debug!("Loaded {} rules from {}", rules.len(), path.display());
                rules
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    /// Append all rules of `other`, keeping their order. Duplicates are kept.
    pub fn extend(&mut self, other: IgnoreRuleSet) {
        self.patterns.extend(other.patterns);
    }

    /// Whether an entry with this base name is excluded by any rule
    pub fn is_ignored(&self, name: &str, is_dir: bool) -> bool {
        matches_entry(name, is_dir, &self.patterns)
    }

    /// The patterns in load order
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Read a rule file from disk
pub fn read_rules_file(path: &Path) -> io::Result<IgnoreRuleSet> {
    let text = fs::read_to_string(path)?;
    Ok(IgnoreRuleSet::parse(&text))
}

/// Whether `name` matches any of `patterns`
pub fn matches_name(name: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .any(|pattern| glob_match(&escape_pattern(pattern), name))
}

/// Restrict a pattern to `*`, `?` and `[...]` wildcards.
///
/// Braces and backslashes are made literal, and a `[` with no closing `]`
/// matches itself.
fn escape_pattern(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    for &c in &chars[i..=end] {
                        if c == '\\' {
                            out.push('\\');
                        }
                        out.push(c);
                    }
                    i = end;
                }
                None => out.push_str("\\["),
            },
            c @ ('{' | '}' | '\\' | ']') => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
        i += 1;
    }
    out
}

/// Index of the `]` closing the class opened at `start`. A `]` directly
/// after `[` or `[!` is a member, not the end.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    (j..chars.len()).find(|&k| chars[k] == ']')
}

/// Like [`matches_name`], but directories are also tested as `name/`
pub fn matches_entry(name: &str, is_dir: bool, patterns: &[String]) -> bool {
    if matches_name(name, patterns) {
        return true;
    }
    if is_dir {
        let with_slash = format!("{}/", name);
        return matches_name(&with_slash, patterns);
    }
    false
}
