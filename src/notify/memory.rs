//! In-memory [`Notifier`] that keeps every confirmation.

use std::cell::RefCell;

use crate::error::{MoblogError, Result};

use super::{Confirmation, Notifier};

#[derive(Debug, Default)]
pub struct MemoryNotifier {
    pub sent: RefCell<Vec<Confirmation>>,
    /// Fail every delivery with `Notification`.
    pub fail: bool,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, confirmation: &Confirmation) -> Result<()> {
        if self.fail {
            return Err(MoblogError::Notification("injected failure".into()));
        }
        self.sent.borrow_mut().push(confirmation.clone());
        Ok(())
    }
}
