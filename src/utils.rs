/// Check if debug logging is enabled via environment variable
///
/// This is checked once at module initialization to avoid repeated environment
/// variable lookups.
static DEBUG_ENABLED: std::sync::OnceLock<bool> = std::sync::OnceLock::new();

fn is_debug_enabled() -> bool {
    *DEBUG_ENABLED.get_or_init(|| {
        (cfg!(debug_assertions) || std::env::var("CODESTAMP_DEBUG").unwrap_or_default() == "1")
            && std::env::var("CODESTAMP_DEBUG").unwrap_or_default() != "0"
    })
}

/// Debug logging utility function
///
/// Prints debug messages with a colored prefix when debug assertions are
/// enabled or when the `CODESTAMP_DEBUG` environment variable is set to "1".
pub fn debug_log(msg: &str) {
    if is_debug_enabled() {
        eprintln!("\x1b[1;33m[codestamp]\x1b[0m {}", msg);
    }
}

/// Leading whitespace of a line, used to indent inserted stamp lines.
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_whitespace_of_indented_line() {
        assert_eq!(leading_whitespace("    let x = 1;"), "    ");
        assert_eq!(leading_whitespace("\t\tfoo"), "\t\t");
        assert_eq!(leading_whitespace("bare"), "");
        assert_eq!(leading_whitespace("   "), "   ");
    }
}
