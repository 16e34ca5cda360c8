//! HTML to Markdown conversion for HTML-only or HTML-preferred mail bodies.
//!
//! Covers the markup mail clients actually produce:
//! - headings, paragraphs, `<div>` and `<br>` become line structure
//! - `<b>`/`<strong>`, `<i>`/`<em>`, `<code>` become inline emphasis
//! - `<a href>` becomes `[text](href)`, `<img src>` becomes `![alt](src)`
//! - `<ul>`/`<ol>` items become `- ` / `1. ` lines, `<blockquote>` gets `> `
//! - `<pre>` becomes a fenced code block with whitespace preserved
//! - `<script>`, `<style>`, `<head>` are dropped

use scraper::node::Node;
use scraper::{ElementRef, Html};

use crate::error::{MoblogError, Result};

/// Maximum element nesting before the input is treated as unconvertible.
const MAX_DEPTH: usize = 64;

/// Convert an HTML document or fragment to Markdown.
///
/// Fails with `Conversion` when the markup is nested deeper than
/// `MAX_DEPTH` or yields no text at all; callers fall back to the
/// plain-text body in that case.
pub fn html_to_markdown(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let mut out = String::with_capacity(html.len());
    render_children(document.root_element(), &mut out, 0, false)?;

    let markdown = collapse_blank_lines(&out);
    if markdown.is_empty() {
        return Err(MoblogError::Conversion("no text content".into()));
    }
    Ok(markdown)
}

fn render_children(el: ElementRef<'_>, out: &mut String, depth: usize, pre: bool) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(MoblogError::Conversion(format!(
            "elements nested deeper than {MAX_DEPTH}"
        )));
    }
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                if pre {
                    out.push_str(text);
                } else {
                    push_collapsed(out, text);
                }
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    render_element(child_el, out, depth + 1, pre)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn render_element(el: ElementRef<'_>, out: &mut String, depth: usize, pre: bool) -> Result<()> {
    let name = el.value().name().to_ascii_lowercase();
    match name.as_str() {
        "script" | "style" | "head" | "title" | "meta" | "link" => {}
        "br" => out.push('\n'),
        "hr" => {
            block_break(out);
            out.push_str("* * *\n\n");
        }
        "p" => {
            block_break(out);
            render_children(el, out, depth, pre)?;
            out.push_str("\n\n");
        }
        "div" | "section" | "article" | "tr" => {
            line_break(out);
            render_children(el, out, depth, pre)?;
            line_break(out);
        }
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = name[1..].parse::<usize>().unwrap_or(1);
            block_break(out);
            out.push_str(&"#".repeat(level));
            out.push(' ');
            out.push_str(render_inline(el, depth)?.trim());
            out.push_str("\n\n");
        }
        "strong" | "b" => wrap_inline(el, out, depth, "**")?,
        "em" | "i" => wrap_inline(el, out, depth, "*")?,
        "code" if !pre => wrap_inline(el, out, depth, "`")?,
        "a" => match el.value().attr("href") {
            Some(href) if !href.is_empty() => {
                wrap_inline_with(el, out, depth, "[", &format!("]({href})"))?
            }
            _ => wrap_inline_with(el, out, depth, "", "")?,
        },
        "img" => {
            if let Some(src) = el.value().attr("src") {
                let alt = el.value().attr("alt").unwrap_or("");
                out.push_str(&format!("![{alt}]({src})"));
            }
        }
        "ul" | "ol" => {
            block_break(out);
            let ordered = name == "ol";
            let mut n = 1;
            for item in el.child_elements() {
                if !item.value().name().eq_ignore_ascii_case("li") {
                    continue;
                }
                let content = render_inline(item, depth + 1)?;
                let marker = if ordered {
                    format!("{n}. ")
                } else {
                    "- ".to_string()
                };
                out.push_str(&marker);
                out.push_str(&indent_continuation(content.trim(), marker.len()));
                out.push('\n');
                n += 1;
            }
            out.push('\n');
        }
        "blockquote" => {
            block_break(out);
            let inner = collapse_blank_lines(&render_inline(el, depth)?);
            for line in inner.lines() {
                if line.is_empty() {
                    out.push_str(">\n");
                } else {
                    out.push_str(&format!("> {line}\n"));
                }
            }
            out.push('\n');
        }
        "pre" => {
            block_break(out);
            let mut code = String::new();
            render_children(el, &mut code, depth, true)?;
            out.push_str("```\n");
            out.push_str(code.trim_matches('\n'));
            out.push_str("\n```\n\n");
        }
        _ => render_children(el, out, depth, pre)?,
    }
    Ok(())
}

/// Render an element's children into a fresh buffer.
fn render_inline(el: ElementRef<'_>, depth: usize) -> Result<String> {
    let mut buf = String::new();
    render_children(el, &mut buf, depth, false)?;
    Ok(buf)
}

fn wrap_inline(el: ElementRef<'_>, out: &mut String, depth: usize, mark: &str) -> Result<()> {
    wrap_inline_with(el, out, depth, mark, mark)
}

/// Wrap the rendered text of `el` in `open`/`close`. Whitespace at the
/// element's edges stays outside the markers so neighbouring words keep
/// their separation.
fn wrap_inline_with(
    el: ElementRef<'_>,
    out: &mut String,
    depth: usize,
    open: &str,
    close: &str,
) -> Result<()> {
    let text = render_inline(el, depth)?;
    let trimmed = text.trim();
    let texts: Vec<&str> = el.text().filter(|t| !t.is_empty()).collect();
    let leading = texts.first().is_some_and(|t| t.starts_with(char::is_whitespace));
    let trailing = texts.last().is_some_and(|t| t.ends_with(char::is_whitespace));

    if trimmed.is_empty() {
        if leading || trailing {
            push_collapsed(out, " ");
        }
        return Ok(());
    }
    if leading {
        push_collapsed(out, " ");
    }
    out.push_str(open);
    out.push_str(trimmed);
    out.push_str(close);
    if trailing {
        out.push(' ');
    }
    Ok(())
}

/// Append text with runs of whitespace collapsed to one space.
fn push_collapsed(out: &mut String, text: &str) {
    let mut prev_space = out.is_empty() || out.ends_with([' ', '\n']);
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
}

/// Make sure the output ends on a fresh line.
fn line_break(out: &mut String) {
    trim_trailing_spaces(out);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Make sure the output ends with a blank line.
fn block_break(out: &mut String) {
    line_break(out);
    if !out.is_empty() && !out.ends_with("\n\n") {
        out.push('\n');
    }
}

fn trim_trailing_spaces(out: &mut String) {
    let len = out.trim_end_matches(' ').len();
    out.truncate(len);
}

fn indent_continuation(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trim each line's trailing spaces and collapse blank-line runs to one.
fn collapse_blank_lines(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut prev_was_blank = true;
    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            if !prev_was_blank {
                cleaned.push('\n');
                prev_was_blank = true;
            }
        } else {
            cleaned.push_str(line);
            cleaned.push('\n');
            prev_was_blank = false;
        }
    }
    cleaned.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_and_emphasis() {
        let md = html_to_markdown("<p>Hello <b>world</b></p><p>Second <em>one</em></p>").unwrap();
        assert_eq!(md, "Hello **world**\n\nSecond *one*");
    }

    #[test]
    fn test_edge_whitespace_kept_outside_markers() {
        let md = html_to_markdown("<p>This is <b>bold </b>text and<i> italic</i></p>").unwrap();
        assert_eq!(md, "This is **bold** text and *italic*");

        let md = html_to_markdown(r#"<p>Go<a href="/x"> here </a>now<b> </b>ok</p>"#).unwrap();
        assert_eq!(md, "Go [here](/x) now ok");
    }

    #[test]
    fn test_links_and_images() {
        let md = html_to_markdown(
            r#"<div>See <a href="https://example.com">this</a> <img src="cid:x" alt="pic"></div>"#,
        )
        .unwrap();
        assert_eq!(md, "See [this](https://example.com) ![pic](cid:x)");
    }

    #[test]
    fn test_br_and_divs() {
        let md = html_to_markdown("<div>one<br>two</div><div>three</div>").unwrap();
        assert_eq!(md, "one\ntwo\nthree");
    }

    #[test]
    fn test_heading_and_list() {
        let md = html_to_markdown("<h2>Title</h2><ul><li>a</li><li>b</li></ul><ol><li>x</li></ol>")
            .unwrap();
        assert_eq!(md, "## Title\n\n- a\n- b\n\n1. x");
    }

    #[test]
    fn test_blockquote_and_pre() {
        let md = html_to_markdown("<blockquote>quoted</blockquote><pre>a  b\n  c</pre>").unwrap();
        assert_eq!(md, "> quoted\n\n```\na  b\n  c\n```");
    }

    #[test]
    fn test_scripts_removed() {
        let md = html_to_markdown("<p>Before<script>alert('x')</script>After</p>").unwrap();
        assert_eq!(md, "BeforeAfter");
    }

    #[test]
    fn test_entities_decoded() {
        let md = html_to_markdown("<p>Tom &amp; Jerry &lt;3&gt;</p>").unwrap();
        assert_eq!(md, "Tom & Jerry <3>");
    }

    #[test]
    fn test_empty_html_is_error() {
        assert!(matches!(
            html_to_markdown("<html><body>  </body></html>"),
            Err(MoblogError::Conversion(_))
        ));
    }

    #[test]
    fn test_excessive_nesting_is_error() {
        let html = format!("{}deep{}", "<span>".repeat(200), "</span>".repeat(200));
        assert!(html_to_markdown(&html).is_err());
    }
}
