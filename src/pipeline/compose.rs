//! Post composition: Jekyll front-matter plus body.

use chrono::{DateTime, FixedOffset};

use crate::model::post::{PostDocument, Slug};

/// Repository directory holding posts.
pub const POSTS_DIR: &str = "_posts";

/// Front-matter `layout` value.
pub const LAYOUT: &str = "post";

/// Front-matter date format: nanosecond-trimmed fraction and zone offset.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

impl PostDocument {
    pub fn new(title: &str, date: DateTime<FixedOffset>, body: String) -> Self {
        Self {
            title: title.to_string(),
            date,
            body,
        }
    }

    /// Render the file contents.
    ///
    /// The title is written verbatim; quoting it for YAML is left to the
    /// site generator.
    pub fn render(&self) -> String {
        format!(
            "---\nlayout: {LAYOUT}\ntitle: {}\ndate: {}\n---\n\n{}",
            self.title,
            self.date.format(DATE_FORMAT),
            self.body
        )
    }

    /// Repository-relative path: `_posts/<YYYY-MM-DD>-<slug>.md`, using the
    /// same timestamp as the front-matter.
    pub fn relative_path(&self, slug: &Slug) -> String {
        format!("{POSTS_DIR}/{}-{slug}.md", self.date.format("%Y-%m-%d"))
    }
}
