//! Sender address handling: `From:` parsing and the accept filter.

use crate::error::{MoblogError, Result};

/// A parsed mailbox from a `From:` header.
///
/// # Examples
/// - `"Juan García <juan@ejemplo.com>"` → `display_name = "Juan García"`, `address = "juan@ejemplo.com"`
/// - `"user@example.com"` → `display_name = ""`, `address = "user@example.com"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    /// Human-readable display name (may be empty).
    pub display_name: String,
    /// The bare email address (`user@domain`).
    pub address: String,
}

impl EmailAddress {
    /// Parse a sender mailbox from a header value.
    ///
    /// Supported formats:
    /// - `"user@domain.com"`
    /// - `"<user@domain.com>"`
    /// - `"Display Name <user@domain.com>"`
    /// - `"\"Display, Name\" <user@domain.com>"`
    ///
    /// Anything without a `local@domain` address is an `InputParse` error.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();

        let (display_name, address) = match (trimmed.rfind('<'), trimmed.rfind('>')) {
            (Some(start), Some(end)) if end > start => (
                strip_quotes(&trimmed[..start]),
                trimmed[start + 1..end].trim().to_string(),
            ),
            _ => (String::new(), trimmed.to_string()),
        };

        if !is_addr_spec(&address) {
            return Err(MoblogError::InputParse(format!(
                "invalid From address '{trimmed}'"
            )));
        }

        Ok(Self {
            display_name,
            address,
        })
    }

    /// Check this address against an accept list.
    ///
    /// - Empty list → deny all
    /// - `*` in list → allow all
    /// - `@domain.com` or `domain.com` → domain match
    /// - `user@domain.com` → exact match
    ///
    /// All comparisons ignore ASCII case.
    pub fn is_accepted_by(&self, accept: &[String]) -> bool {
        let email = self.address.to_lowercase();
        accept.iter().any(|pattern| {
            let pattern = pattern.trim().to_lowercase();
            if pattern == "*" {
                true
            } else if pattern.starts_with('@') {
                email.ends_with(&pattern)
            } else if pattern.contains('@') {
                email == pattern
            } else {
                email.ends_with(&format!("@{pattern}"))
            }
        })
    }

    /// Format for display: `"Display Name <address>"` or just `"address"`.
    pub fn display(&self) -> String {
        if self.display_name.is_empty() {
            self.address.clone()
        } else {
            format!("{} <{}>", self.display_name, self.address)
        }
    }
}

/// Minimal `local@domain` shape check.
fn is_addr_spec(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !s.chars().any(|c| c.is_whitespace() || c == '<' || c == '>')
        }
        None => false,
    }
}

/// Strip surrounding double-quotes and trim whitespace.
fn strip_quotes(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
