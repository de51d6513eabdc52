//! Player notifications and staff alerts.
//!
//! The desk never prints anything itself. Discovery announcements, refund
//! notices, and staff alerts all go through a [`Notifier`]. [`Inbox`] is the
//! stock implementation: it keeps every message so a front end can show or
//! persist them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use spur_core::CharacterId;

/// Category for investigation results, refunds, and shares.
pub const INVESTIGATIONS: &str = "Investigations";
/// Category for revelation announcements.
pub const DISCOVERY: &str = "Discovery";

/// Delivers messages to players and staff.
pub trait Notifier {
    /// Send a message to a character's player.
    fn notify(&mut self, recipient: CharacterId, message: &str, category: &str);

    /// Alert staff.
    fn alert_staff(&mut self, message: &str, category: &str);
}

/// Who a notification is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    /// A character's player.
    Character(CharacterId),
    /// The staff channel.
    Staff,
}

/// A delivered message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Who it was sent to.
    pub recipient: Recipient,
    /// The text.
    pub message: String,
    /// Inform category, e.g. [`INVESTIGATIONS`].
    pub category: String,
    /// When it was sent.
    pub timestamp: DateTime<Utc>,
}

/// Every notification sent, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inbox {
    entries: Vec<Notification>,
}

impl Inbox {
    /// Create an empty inbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications.
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    /// Notifications sent to a character.
    pub fn for_character(&self, character: CharacterId) -> Vec<&Notification> {
        self.entries
            .iter()
            .filter(|n| n.recipient == Recipient::Character(character))
            .collect()
    }

    /// Staff alerts.
    pub fn staff(&self) -> Vec<&Notification> {
        self.entries
            .iter()
            .filter(|n| n.recipient == Recipient::Staff)
            .collect()
    }

    /// Remove and return a character's notifications.
    pub fn take_for(&mut self, character: CharacterId) -> Vec<Notification> {
        let (taken, kept) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|n| n.recipient == Recipient::Character(character));
        self.entries = kept;
        taken
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been sent.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, recipient: Recipient, message: &str, category: &str) {
        self.entries.push(Notification {
            recipient,
            message: message.to_string(),
            category: category.to_string(),
            timestamp: Utc::now(),
        });
    }
}

impl Notifier for Inbox {
    fn notify(&mut self, recipient: CharacterId, message: &str, category: &str) {
        tracing::debug!(%recipient, category, "notify");
        self.push(Recipient::Character(recipient), message, category);
    }

    fn alert_staff(&mut self, message: &str, category: &str) {
        tracing::info!(category, "staff alert: {message}");
        self.push(Recipient::Staff, message, category);
    }
}
