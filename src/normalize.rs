use once_cell::sync::Lazy;
use regex::Regex;

/// Leading decoration: optional slash, one or more stars, optional slash, spaces.
static LEADING_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*/?\*+/?\s*").expect("valid leading marker regex"));

/// Closing delimiter at the end of the last line.
static TRAILING_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\*+/\s*$").expect("valid trailing marker regex"));

static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n|\r|\n").expect("valid line break regex"));

/// Strip comment-marker punctuation (`/*`, `/**`, ` * `, `*/`) from one line.
///
/// Lines without a leading star keep their indentation, blank lines stay blank.
pub fn strip_comment_markers(line: &str) -> &str {
    let line = match LEADING_MARKER.find(line) {
        Some(leading) => &line[leading.end()..],
        None => line,
    };
    match TRAILING_MARKER.find(line) {
        Some(trailing) => &line[..trailing.start()],
        None => line,
    }
}

/// Split a block comment into lines and strip each line's markers.
pub fn normalize_block_comment(text: &str) -> Vec<&str> {
    LINE_BREAK.split(text).map(strip_comment_markers).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_comment_block() {
        assert_eq!(strip_comment_markers("/* Hello world */"), "Hello world");
        assert_eq!(strip_comment_markers("/** doc */"), "doc");
        assert_eq!(strip_comment_markers("/**/"), "");
    }

    #[test]
    fn test_decorated_lines() {
        assert_eq!(strip_comment_markers(" * item"), "item");
        assert_eq!(strip_comment_markers("  **  bold"), "bold");
        assert_eq!(strip_comment_markers(" */"), "");
        assert_eq!(strip_comment_markers("last line */"), "last line");
    }

    #[test]
    fn test_preserves_undecorated_indentation() {
        assert_eq!(strip_comment_markers("    indented()"), "    indented()");
        assert_eq!(strip_comment_markers(""), "");
    }

    #[test]
    fn test_normalize_block_comment() {
        let lines = normalize_block_comment("/**\r\n * Title\n *\n * Body\r */");
        assert_eq!(lines, vec!["", "Title", "", "Body", ""]);
    }

    #[test]
    fn test_inner_stars_are_kept() {
        assert_eq!(strip_comment_markers(" * a * b"), "a * b");
    }
}
