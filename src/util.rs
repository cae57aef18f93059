//! Small text helpers shared by the value model and the reporters.

use once_cell::sync::Lazy;
use regex::Regex;

static FUNCTION_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"function(\s*)(\w*)").expect("static regex"));

static FRAME_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w*)").expect("static regex"));

/// Strips whitespace from both ends of `text`.
pub fn trim(text: &str) -> &str {
    text.trim()
}

/// True when `text` is empty after trimming.
pub fn is_blank(text: &str) -> bool {
    trim(text).is_empty()
}

/// Returns the declared name in `function <name>` source text, or
/// `"anonymous"` when there is none.
///
/// ```rust
/// use gsunit::util::function_name;
/// assert_eq!(function_name("function setUp() {}"), "setUp");
/// assert_eq!(function_name("function () {}"), "anonymous");
/// assert_eq!(function_name("x => x"), "anonymous");
/// ```
pub fn function_name(source: &str) -> String {
    FUNCTION_NAME
        .captures(source)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("anonymous")
        .to_string()
}

/// Splits stack text into frame names.
///
/// Each line contributes its leading identifier (`"anonymous"` when it has
/// none). The final line is treated as the trailer and skipped, and trailing
/// anonymous frames are dropped.
pub fn parse_error_stack(stack: &str) -> Vec<String> {
    let lines: Vec<&str> = stack.split('\n').collect();
    let frame_count = lines.len().saturating_sub(1);
    let mut frames: Vec<String> = lines[..frame_count]
        .iter()
        .map(|line| {
            FRAME_NAME
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
                .filter(|name| !name.is_empty())
                .unwrap_or("anonymous")
                .to_string()
        })
        .collect();
    while frames.last().is_some_and(|name| name == "anonymous") {
        frames.pop();
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\n"));
        assert!(!is_blank(" a "));
        assert_eq!(trim("  a b  "), "a b");
    }

    #[test]
    fn stack_frames_drop_trailer_and_anonymous_tail() {
        let stack = "inner@code.js:3\nouter@code.js:9\n@code.js:12\n@code.js:14\n";
        assert_eq!(parse_error_stack(stack), vec!["inner", "outer"]);
    }

    #[test]
    fn anonymous_frames_in_the_middle_survive() {
        let stack = "top@a:1\n@a:2\nbottom@a:3\n";
        assert_eq!(parse_error_stack(stack), vec!["top", "anonymous", "bottom"]);
        assert!(parse_error_stack("").is_empty());
    }
}
