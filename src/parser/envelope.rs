//! MIME message parsing: headers, bodies and inline/other part classification.

use mail_parser::{MessageParser, MimeHeaders, PartType};

use crate::error::{MoblogError, Result};
use crate::model::envelope::{Envelope, Part};

/// Parse a complete raw message (headers + body) into an [`Envelope`].
///
/// Uses `mail-parser` for MIME structure and transfer decoding. A message
/// without a header block is rejected with `InputParse`.
pub fn parse_envelope(raw_message: &[u8]) -> Result<Envelope> {
    let message_bytes = skip_bom(raw_message);

    let mut headers = unfold_headers(&extract_raw_headers(message_bytes));
    if headers.is_empty() {
        return Err(MoblogError::InputParse("message has no headers".into()));
    }

    let msg = MessageParser::default()
        .parse(message_bytes)
        .ok_or_else(|| MoblogError::InputParse("not an RFC 5322 message".into()))?;

    // Prefer mail-parser's RFC 2047 decoding for the fields we reuse.
    if let Some(subject) = msg.subject() {
        set_header(&mut headers, "subject", subject);
    }
    if let Some(addr) = msg.from().and_then(|a| a.first()) {
        if let Some(address) = addr.address.as_deref() {
            let from = match addr.name.as_deref() {
                Some(name) if !name.trim().is_empty() => format!("\"{name}\" <{address}>"),
                _ => address.to_string(),
            };
            set_header(&mut headers, "from", &from);
        }
    }

    let text = msg
        .body_text(0)
        .map(|s| s.into_owned())
        .unwrap_or_default();
    // body_html() synthesizes HTML from a text part; only keep a real one.
    let html = msg
        .html_part(0)
        .filter(|p| matches!(p.body, PartType::Html(_)))
        .and_then(|_| msg.body_html(0))
        .map(|s| s.into_owned());

    let mut inlines = Vec::new();
    let mut others = Vec::new();

    for part in msg.attachments() {
        let content_type = part
            .content_type()
            .map(|ct: &mail_parser::ContentType| {
                let main = ct.ctype();
                match ct.subtype() {
                    Some(sub) => format!("{main}/{sub}"),
                    None => main.to_string(),
                }
            })
            .unwrap_or_else(|| "application/octet-stream".to_string())
            .to_lowercase();

        let is_inline = part
            .content_disposition()
            .map(|d: &mail_parser::ContentType| d.ctype().eq_ignore_ascii_case("inline"))
            .unwrap_or(false);

        let parsed = Part {
            content_type,
            content: part.contents().to_vec(),
            filename: part.attachment_name().map(String::from),
            content_id: part
                .content_id()
                .map(|id| id.trim_matches(|c| c == '<' || c == '>').to_string()),
        };

        tracing::debug!(
            content_type = %parsed.content_type,
            filename = parsed.display_name(),
            inline = is_inline,
            size = parsed.content.len(),
            "Found MIME part"
        );

        if is_inline {
            inlines.push(parsed);
        } else {
            others.push(parsed);
        }
    }

    Ok(Envelope {
        headers,
        text,
        html,
        inlines,
        others,
    })
}

/// Strip a UTF-8 byte order mark, if present.
fn skip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data)
}

/// Extract the raw headers as a string (everything before the first blank line).
fn extract_raw_headers(data: &[u8]) -> String {
    let text = String::from_utf8_lossy(data);
    let end = match (text.find("\n\n"), text.find("\r\n\r\n")) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => text.len(),
    };
    text[..end].to_string()
}

/// Unfold headers: join continuation lines (starting with space or tab) with the previous header.
///
/// Returns a list of `(lowercase_name, raw_value)` pairs. Parsing stops at the
/// first line that is neither a header nor a continuation.
fn unfold_headers(text: &str) -> Vec<(String, String)> {
    let mut result: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(last) = result.last_mut() {
                last.1.push(' ');
                last.1.push_str(line.trim());
            }
            continue;
        }
        match line.split_once(':') {
            Some((name, value)) if is_field_name(name) => {
                result.push((name.to_lowercase(), value.trim().to_string()));
            }
            _ => break,
        }
    }

    result
}

/// RFC 5322 field names are printable ASCII without spaces or colons.
fn is_field_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| (33..=126).contains(&b))
}

/// Replace the first header with `name`, or append it.
fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(k, _)| k == name) {
        Some(entry) => entry.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}
