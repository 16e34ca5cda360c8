//! Parsed inbound message and its MIME parts.

/// Where a part sat in the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOrigin {
    /// `Content-Disposition: inline`, usually referenced from the body by a
    /// `[image: <filename>]` placeholder.
    Inline,
    /// Any other non-body part (a conventional attachment).
    Other,
}

/// One decoded MIME body part.
#[derive(Debug, Clone)]
pub struct Part {
    /// Lowercase `type/subtype`, e.g. `"image/png"`.
    pub content_type: String,
    /// Transfer-decoded payload.
    pub content: Vec<u8>,
    /// Filename from `Content-Disposition` or `Content-Type` `name=`.
    pub filename: Option<String>,
    /// `Content-ID`, without angle brackets.
    pub content_id: Option<String>,
}

impl Part {
    /// Whether the part is a raster image candidate (`image/*`).
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Filename used in placeholders and alt text; empty when absent.
    pub fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("")
    }
}

/// A parsed e-mail message.
///
/// Built once by [`crate::parser::envelope::parse_envelope`] and only read
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    /// `(lowercase_name, value)` pairs in message order. Values are unfolded;
    /// `subject` and `from` are RFC 2047 decoded.
    pub headers: Vec<(String, String)>,
    /// Plain-text body (empty when the message has none).
    pub text: String,
    /// HTML alternative, if present.
    pub html: Option<String>,
    /// Inline parts in MIME order.
    pub inlines: Vec<Part>,
    /// Other non-body parts in MIME order.
    pub others: Vec<Part>,
}

impl Envelope {
    /// Get the first value for a header name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The decoded `Subject:`, or the empty string.
    pub fn subject(&self) -> &str {
        self.header("subject").unwrap_or("")
    }

    /// The `Message-ID:` value as it appeared in the message.
    pub fn message_id(&self) -> &str {
        self.header("message-id").unwrap_or("")
    }

    /// Inline parts followed by other parts, each tagged with its origin.
    ///
    /// This is the single ordering attachment numbering is based on.
    pub fn parts(&self) -> impl Iterator<Item = (PartOrigin, &Part)> {
        self.inlines
            .iter()
            .map(|p| (PartOrigin::Inline, p))
            .chain(self.others.iter().map(|p| (PartOrigin::Other, p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(ct: &str, name: &str) -> Part {
        Part {
            content_type: ct.to_string(),
            content: Vec::new(),
            filename: Some(name.to_string()),
            content_id: None,
        }
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let env = Envelope {
            headers: vec![
                ("subject".into(), "Hi".into()),
                ("message-id".into(), "<a@b>".into()),
            ],
            ..Default::default()
        };
        assert_eq!(env.header("Subject"), Some("Hi"));
        assert_eq!(env.header("MESSAGE-ID"), Some("<a@b>"));
        assert_eq!(env.header("From"), None);
        assert_eq!(env.subject(), "Hi");
    }

    #[test]
    fn test_missing_subject_is_empty() {
        let env = Envelope::default();
        assert_eq!(env.subject(), "");
        assert_eq!(env.message_id(), "");
    }

    #[test]
    fn test_parts_inline_first() {
        let env = Envelope {
            inlines: vec![part("image/png", "a.png")],
            others: vec![part("image/gif", "b.gif"), part("application/pdf", "c.pdf")],
            ..Default::default()
        };
        let order: Vec<_> = env
            .parts()
            .map(|(origin, p)| (origin, p.display_name().to_string()))
            .collect();
        assert_eq!(
            order,
            vec![
                (PartOrigin::Inline, "a.png".to_string()),
                (PartOrigin::Other, "b.gif".to_string()),
                (PartOrigin::Other, "c.pdf".to_string()),
            ]
        );
    }

    #[test]
    fn test_is_image() {
        assert!(part("image/jpeg", "x").is_image());
        assert!(!part("application/pdf", "x").is_image());
    }
}
