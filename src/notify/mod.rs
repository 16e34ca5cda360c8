//! Confirmation replies to the sender of a published post.

pub mod memory;
pub mod smtp;

use crate::error::Result;
use crate::model::address::EmailAddress;

pub use memory::MemoryNotifier;
pub use smtp::SmtpNotifier;

/// The reply sent once a post is live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Sender of the inbound message.
    pub to: EmailAddress,
    /// `RE: <inbound subject>`.
    pub subject: String,
    /// Inbound `Message-ID`, used for `In-Reply-To` and `References`.
    pub in_reply_to: String,
    pub body: String,
}

impl Confirmation {
    pub fn new(to: EmailAddress, subject: &str, message_id: &str, post_path: &str) -> Self {
        Self {
            to,
            subject: format!("RE: {subject}"),
            in_reply_to: message_id.to_string(),
            body: format!("Your post has been published as {post_path}.\n"),
        }
    }
}

/// Delivers confirmations.
pub trait Notifier {
    fn notify(&self, confirmation: &Confirmation) -> Result<()>;
}
