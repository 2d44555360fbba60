/*!
 * Content transforms applied before rendering
 */

use std::path::Path;

use crate::minify::minify_js;

/// How a file's content is rewritten, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// JavaScript and TypeScript sources, minified
    Script,
    /// JSON documents, re-serialized compactly
    Json,
    /// Everything else, passed through
    Plain,
}

impl ContentKind {
    /// Classify a path by its extension, ignoring case
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "ts" | "tsx" | "mjs" | "js" => ContentKind::Script,
            "json" => ContentKind::Json,
            _ => ContentKind::Plain,
        }
    }
}

/// Transform file content for output. Never fails: if a transform cannot be
/// applied the original content is returned.
pub fn transform_content(path: &Path, content: String) -> String {
    match ContentKind::from_path(path) {
        ContentKind::Script => match minify_js(&content) {
            Ok(minified) => minified,
            Err(e) => {
                tracing::debug!("Not minifying {}: {}", path.display(), e);
                content
            }
        },
        ContentKind::Json => compact_json(&content).unwrap_or(content),
        ContentKind::Plain => content,
    }
}

/// Re-serialize JSON without insignificant whitespace, keeping key order.
/// Returns `None` if `content` is not valid JSON.
pub fn compact_json(content: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    serde_json::to_string(&value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(ContentKind::from_path(Path::new("a/app.ts")), ContentKind::Script);
        assert_eq!(ContentKind::from_path(Path::new("view.TSX")), ContentKind::Script);
        assert_eq!(ContentKind::from_path(Path::new("lib.mjs")), ContentKind::Script);
        assert_eq!(ContentKind::from_path(Path::new("data.Json")), ContentKind::Json);
        assert_eq!(ContentKind::from_path(Path::new("README.md")), ContentKind::Plain);
        assert_eq!(ContentKind::from_path(Path::new("Makefile")), ContentKind::Plain);
        assert_eq!(ContentKind::from_path(Path::new(".json")), ContentKind::Plain);
    }

    #[test]
    fn test_json_is_compacted() {
        let out = transform_content(Path::new("b.json"), "{\"a\": 1}".to_string());
        assert_eq!(out, "{\"a\":1}");
    }

    #[test]
    fn test_json_keeps_key_order() {
        let src = "{\n  \"zeta\": [1, 2, 3],\n  \"alpha\": {\"nested\": true}\n}\n";
        let out = transform_content(Path::new("c.json"), src.to_string());
        assert_eq!(out, "{\"zeta\":[1,2,3],\"alpha\":{\"nested\":true}}");
    }

    #[test]
    fn test_compact_json_preserves_structure() {
        let src = "{ \"name\": \"x y\", \"list\": [ 1.5, null, \"z\" ], \"ok\": false }";
        let compact = compact_json(src).unwrap();
        let before: serde_json::Value = serde_json::from_str(src).unwrap();
        let after: serde_json::Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_json_keeps_large_integers_exact() {
        let src = "{\"id\": 123456789012345678901234567890}";
        let out = transform_content(Path::new("ids.json"), src.to_string());
        assert_eq!(out, "{\"id\":123456789012345678901234567890}");
    }

    #[test]
    fn test_invalid_json_passes_through() {
        let src = "{\"a\": 1,,}";
        assert_eq!(transform_content(Path::new("bad.json"), src.to_string()), src);
    }

    #[test]
    fn test_script_is_minified() {
        let out = transform_content(Path::new("main.js"), "let  x = 1;  // one\n".to_string());
        assert_eq!(out, "let x=1;");
    }

    #[test]
    fn test_broken_script_passes_through() {
        let src = "let s = 'never closed";
        assert_eq!(transform_content(Path::new("x.ts"), src.to_string()), src);
    }

    #[test]
    fn test_other_files_untouched() {
        let src = "  keep   spacing  \n";
        assert_eq!(transform_content(Path::new("notes.txt"), src.to_string()), src);
    }
}
