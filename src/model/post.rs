//! Output-side types: post identity, written assets and the post document.

use chrono::{DateTime, FixedOffset};

/// Hex-encoded identity shared by a post and all of its assets.
///
/// Produced by [`crate::pipeline::slug::derive_slug`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(pub(crate) String);

impl Slug {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a written asset shows up in the post body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Replace every occurrence of `marker`; nothing happens if it is absent.
    Replace { marker: String },
    /// Append an image line after the body.
    Append,
}

/// An image asset written into the repository for this post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    /// Repository-relative path with `/` separators, e.g. `assets/<slug>-001.jpg`.
    pub path: String,
    /// Filename of the originating part (may be empty).
    pub filename: String,
    /// 1-based sequence number shared by all assets of the post.
    pub sequence: usize,
    pub placement: Placement,
    /// Content-ID of the originating part, without angle brackets.
    pub content_id: Option<String>,
}

impl AssetRef {
    /// Markdown image syntax pointing at the site-absolute asset path.
    pub fn markdown(&self) -> String {
        format!("![{}](/{})", self.filename, self.path)
    }
}

/// A post ready to be rendered and written.
#[derive(Debug, Clone)]
pub struct PostDocument {
    /// Raw subject; never escaped.
    pub title: String,
    /// Generation timestamp, also used for the file name.
    pub date: DateTime<FixedOffset>,
    /// Body with all asset placements applied.
    pub body: String,
}
