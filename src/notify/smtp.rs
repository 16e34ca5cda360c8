//! [`Notifier`] delivering over plain SMTP with `lettre`.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{Address, Message, SmtpTransport, Transport};

use crate::error::{MoblogError, Result};

use super::{Confirmation, Notifier};

const DEFAULT_PORT: u16 = 25;

/// Sends through an unauthenticated relay such as the local MTA.
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    host: String,
    port: u16,
    from: Mailbox,
}

impl SmtpNotifier {
    /// `server` is `host` or `host:port`; `sender`/`sender_name` form the
    /// `From:` mailbox.
    pub fn new(server: &str, sender: &str, sender_name: &str) -> Result<Self> {
        let (host, port) = match server.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|e| {
                    MoblogError::Notification(format!("invalid mail server '{server}': {e}"))
                })?;
                (host.to_string(), port)
            }
            None => (server.to_string(), DEFAULT_PORT),
        };

        let address = sender.parse::<Address>().map_err(|e| {
            MoblogError::Notification(format!("invalid sender address '{sender}': {e}"))
        })?;
        let name = (!sender_name.is_empty()).then(|| sender_name.to_string());

        Ok(Self {
            host,
            port,
            from: Mailbox::new(name, address),
        })
    }

    fn build(&self, confirmation: &Confirmation) -> Result<Message> {
        let to_address = confirmation.to.address.parse::<Address>().map_err(|e| {
            MoblogError::Notification(format!(
                "invalid recipient '{}': {e}",
                confirmation.to.address
            ))
        })?;
        let to_name = &confirmation.to.display_name;
        let to = Mailbox::new((!to_name.is_empty()).then(|| to_name.clone()), to_address);

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(confirmation.subject.as_str());
        if !confirmation.in_reply_to.is_empty() {
            builder = builder
                .in_reply_to(confirmation.in_reply_to.clone())
                .references(confirmation.in_reply_to.clone());
        }

        builder
            .header(ContentType::TEXT_PLAIN)
            .body(confirmation.body.clone())
            .map_err(|e| MoblogError::Notification(format!("failed to build e-mail: {e}")))
    }
}

impl Notifier for SmtpNotifier {
    fn notify(&self, confirmation: &Confirmation) -> Result<()> {
        let email = self.build(confirmation)?;

        let transport = SmtpTransport::builder_dangerous(self.host.as_str())
            .port(self.port)
            .build();
        transport
            .send(&email)
            .map_err(|e| MoblogError::Notification(format!("SMTP send failed: {e}")))?;

        tracing::info!(to = %confirmation.to.address, "Confirmation sent");
        Ok(())
    }
}
