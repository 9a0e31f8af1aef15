use std::path::Path;

/// Comment syntax for one document, derived once per save.
///
/// `suffix` carries its leading space (e.g. " -->") so stamp lines can be
/// assembled by plain concatenation. `force_above` styles never place inline
/// trailing stamps; the annotation always goes on its own line above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentStyle {
    pub prefix: String,
    pub suffix: String,
    pub force_above: bool,
}

impl CommentStyle {
    pub fn new(prefix: &str, suffix: &str, force_above: bool) -> Self {
        CommentStyle {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            force_above,
        }
    }

    /// Resolve the comment style for a document. Always succeeds; unknown
    /// languages fall back to `//`, or `#` above-line for dotfile-style
    /// names like `.gitignore` and `.env`.
    pub fn for_document(language_id: &str, file_name: &str) -> CommentStyle {
        match language_id {
            "python" | "yaml" | "shellscript" | "dockerfile" | "makefile" | "gitignore"
            | "ignore" | "ini" | "properties" => CommentStyle::new("#", "", true),
            "html" | "xml" | "markdown" => CommentStyle::new("<!--", " -->", false),
            "css" | "scss" | "less" => CommentStyle::new("/*", " */", false),
            "bat" => CommentStyle::new("REM", "", false),
            _ => {
                if file_name.ends_with(".gitignore") || file_name.ends_with(".env") {
                    CommentStyle::new("#", "", true)
                } else {
                    CommentStyle::new("//", "", false)
                }
            }
        }
    }
}

/// JSON has no comment syntax; stamping would corrupt files like
/// package.json, so such documents are passed through untouched.
pub fn is_unstampable(language_id: &str, file_name: &str) -> bool {
    language_id == "json" || file_name.ends_with(".json")
}

/// Infer a language identifier from a file path for CLI invocations that
/// don't pass `--language`. Only has to cover the languages the style table
/// distinguishes; everything else lands in the `//` default.
pub fn language_from_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    match file_name.as_str() {
        "Dockerfile" => return "dockerfile".to_string(),
        "Makefile" | "makefile" => return "makefile".to_string(),
        ".gitignore" => return "gitignore".to_string(),
        _ => {}
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "py" => "python",
        "yml" | "yaml" => "yaml",
        "sh" | "bash" | "zsh" => "shellscript",
        "ini" => "ini",
        "properties" => "properties",
        "html" | "htm" => "html",
        "xml" => "xml",
        "md" | "markdown" => "markdown",
        "css" => "css",
        "scss" => "scss",
        "less" => "less",
        "bat" | "cmd" => "bat",
        "json" => "json",
        other => other,
    }
    .to_string()
}
