/*!
 * Drives a full rendering run over all input paths
 */

use std::io::Write;
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::rules::IgnoreRuleSet;
use crate::walker::{WalkStatistics, Walker};
use crate::writer::DocumentWriter;

/// Render every input path in `config` to `out`.
///
/// `bundled` seeds the rule list of each input path; it is cloned, never
/// modified. The envelope is opened before the first path and closed after
/// the last one. Returns the stream and the walk statistics.
pub fn render_paths<W: Write>(
    config: &Config,
    bundled: &IgnoreRuleSet,
    out: W,
) -> Result<(W, WalkStatistics)> {
    let mut writer = DocumentWriter::new(out, config.format);
    let mut walker = Walker::new(config);

    writer.begin()?;

    for path in &config.paths {
        crate::ensure!(path.exists(), PathNotFound, path.as_path());

        let mut rules = bundled.clone();
        if !config.ignore_gitignore {
            rules.extend(IgnoreRuleSet::load_gitignore(parent_dir(path)));
        }

        tracing::debug!("Processing {} with {} initial rules", path.display(), rules.len());
        walker.walk_path(path, &mut rules, &mut writer)?;
    }

    let out = writer.finish()?;
    let statistics = walker.statistics();
    tracing::debug!(
        "Rendered {} files, skipped {}, visited {} directories",
        statistics.files_rendered,
        statistics.files_skipped,
        statistics.directories_visited
    );

    Ok((out, statistics))
}

/// Directory part of `path` as written: everything before the last
/// separator, so `dir/` yields `dir` itself and a bare name resolves to the
/// current directory
fn parent_dir(path: &Path) -> &Path {
    if path.as_os_str().to_string_lossy().ends_with(std::path::is_separator) {
        return path;
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir(Path::new("src/lib.rs")), Path::new("src"));
        assert_eq!(parent_dir(Path::new("src")), Path::new("."));
        assert_eq!(parent_dir(Path::new("src/")), Path::new("src"));
        assert_eq!(parent_dir(Path::new("/")), Path::new("/"));
    }
}
