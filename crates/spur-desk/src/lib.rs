//! The investigation desk for Spurensuche.
//!
//! Wraps a [`spur_core::LoreStore`] with everything a running game needs:
//! the discovery cascade that turns clues into revelations, the weekly
//! success and failure rules, player and staff text commands, per-character
//! cost caching, unlock hooks, and notifications.
//!
//! ```no_run
//! use spur_core::{GameSettings, LoreStore};
//! use spur_desk::{Desk, DeskConfig, WeeklyCycle};
//!
//! let mut desk = Desk::new(LoreStore::new(), GameSettings::new(), DeskConfig::default());
//! let report = WeeklyCycle::run(&mut desk);
//! println!("{} investigations processed", report.processed);
//! ```

/// Per-character investigation costs.
pub mod cache;
/// Player and staff text commands.
pub mod command;
/// Desk configuration.
pub mod config;
/// The desk itself.
pub mod desk;
/// Discovery, sharing, and revelation unlocks.
pub mod discovery;
/// Player-facing text.
pub mod display;
/// Desk errors.
pub mod error;
/// Draft investigations.
pub mod form;
/// Unlock handlers.
pub mod hooks;
/// Notifications.
pub mod notify;
/// Weekly success and failure.
pub mod outcome;
/// Topic parsing and target selection.
pub mod target;
/// The end-of-week pass.
pub mod weekly;

pub use cache::{CostCache, Costs};
pub use command::{Actor, COMMANDS, Command, CommandKind};
pub use config::DeskConfig;
pub use desk::Desk;
pub use error::{DeskError, DeskResult};
pub use form::{FormStage, InvestigationForm};
pub use hooks::{LogUnlocks, UnlockHandler, UnlockHooks};
pub use notify::{Inbox, Notification, Notifier, Recipient};
pub use outcome::Outcome;
pub use target::TopicSearch;
pub use weekly::{WeekReport, WeeklyCycle};
