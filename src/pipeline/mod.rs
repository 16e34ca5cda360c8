//! The mail-to-post pipeline.
//!
//! ```text
//! clean ─► parse envelope ─► accept sender ─► slug ─► body ─► assets ─► post
//!                                                              │
//!                 notify ◄─ push ◄─ commit ◄─ stage ◄──────────┘
//! ```
//!
//! [`run`] executes the stages strictly in order. The first error aborts the
//! invocation; nothing after the failing stage runs, so a failure before the
//! commit never publishes a partial post.

pub mod attachments;
pub mod body;
pub mod compose;
pub mod normalize;
pub mod slug;

use std::path::Path;

use chrono::{DateTime, FixedOffset};

use crate::config::Config;
use crate::error::{MoblogError, Result};
use crate::model::address::EmailAddress;
use crate::model::post::{PostDocument, Slug};
use crate::notify::{Confirmation, Notifier};
use crate::parser::envelope::parse_envelope;
use crate::publish::RepositoryPublisher;

use self::attachments::{apply_assets, resolve_attachments};
use self::body::convert_body;
use self::slug::derive_slug;

/// What a successful run published.
#[derive(Debug, Clone)]
pub struct Publication {
    pub slug: Slug,
    /// Repository-relative post path.
    pub post_path: String,
    /// Repository-relative asset paths in sequence order.
    pub assets: Vec<String>,
}

/// Turn one raw RFC 5322 message into a published post.
///
/// `now` is the single timestamp used for both the front-matter date and the
/// post file name.
pub fn run(
    raw_message: &[u8],
    config: &Config,
    publisher: &mut dyn RepositoryPublisher,
    notifier: &dyn Notifier,
    now: DateTime<FixedOffset>,
) -> Result<Publication> {
    publisher.clean()?;
    let root = publisher.workdir().to_path_buf();

    let envelope = parse_envelope(raw_message)?;
    let from = envelope
        .header("from")
        .ok_or_else(|| MoblogError::InputParse("missing From header".into()))?;
    let sender = EmailAddress::parse(from)?;
    if !sender.is_accepted_by(&config.mail.accept) {
        return Err(MoblogError::SenderRejected(sender.address));
    }

    let subject = envelope.subject();
    let slug = derive_slug(subject);
    tracing::info!(%subject, %slug, from = %sender.address, "Processing message");

    let body = convert_body(
        &envelope.text,
        envelope.html.as_deref(),
        config.blog.use_html,
    );
    let assets = resolve_attachments(&envelope, &slug, &root)?;

    let post = PostDocument::new(subject, now, apply_assets(&body, &assets));
    let post_path = post.relative_path(&slug);
    write_file(&root, &post_path, post.render().as_bytes())?;
    tracing::info!(path = %post_path, assets = assets.len(), "Wrote post");

    let mut staged: Vec<String> = assets.into_iter().map(|a| a.path).collect();
    staged.push(post_path.clone());
    publisher.stage(&staged)?;
    publisher.commit(&format!("Add entry: {subject}"))?;
    publisher.push()?;
    tracing::info!(path = %post_path, "Published");

    notifier.notify(&Confirmation::new(
        sender,
        subject,
        envelope.message_id(),
        &post_path,
    ))?;

    staged.pop();
    Ok(Publication {
        slug,
        post_path,
        assets: staged,
    })
}

/// Write `bytes` to `root/relative`, creating parent directories.
pub(crate) fn write_file(root: &Path, relative: &str, bytes: &[u8]) -> Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| MoblogError::write(parent, e))?;
    }
    std::fs::write(&path, bytes).map_err(|e| MoblogError::write(&path, e))
}
