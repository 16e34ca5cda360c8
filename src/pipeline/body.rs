//! Body selection and line-ending normalization.

use crate::parser::html::html_to_markdown;

/// Produce the post body from a message's text and optional HTML.
///
/// With `prefer_html` set and an HTML alternative present, the HTML is
/// converted to Markdown; a failed conversion quietly falls back to `text`.
/// Carriage returns are then dropped and every newline doubled so each
/// source line renders as its own paragraph. A non-empty result always ends
/// with a blank line.
pub fn convert_body(text: &str, html: Option<&str>, prefer_html: bool) -> String {
    let source = match html {
        Some(html) if prefer_html => match html_to_markdown(html) {
            Ok(markdown) => markdown,
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to plain-text body");
                text.to_string()
            }
        },
        _ => text.to_string(),
    };

    let mut body = source.replace('\r', "").replace('\n', "\n\n");
    if !body.is_empty() && !body.ends_with('\n') {
        body.push_str("\n\n");
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newlines_doubled() {
        assert_eq!(convert_body("line1\nline2", None, false), "line1\n\nline2\n\n");
        assert_eq!(convert_body("line1\nline2\n", None, false), "line1\n\nline2\n\n");
    }

    #[test]
    fn test_carriage_returns_stripped() {
        assert_eq!(convert_body("a\r\nb\r\n", None, false), "a\n\nb\n\n");
    }

    #[test]
    fn test_blank_lines_doubled_too() {
        assert_eq!(convert_body("a\n\nb", None, false), "a\n\n\n\nb\n\n");
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(convert_body("", None, false), "");
    }

    #[test]
    fn test_html_ignored_unless_preferred() {
        assert_eq!(convert_body("plain", Some("<p>rich</p>"), false), "plain\n\n");
    }

    #[test]
    fn test_html_preferred() {
        assert_eq!(
            convert_body("plain", Some("<p><b>rich</b></p>"), true),
            "**rich**\n\n"
        );
    }

    #[test]
    fn test_preferred_without_html_uses_text() {
        assert_eq!(convert_body("plain", None, true), "plain\n\n");
    }

    #[test]
    fn test_failed_conversion_falls_back() {
        assert_eq!(convert_body("plain", Some("<div> </div>"), true), "plain\n\n");
    }
}
