//! Initiative roll notifications for host chat surfaces.
//!
//! The session worker forwards every initiative roll through a
//! [`NotificationSink`] so hosts can mirror them into a chat log or overlay.
//! Delivery is fire-and-forget; a slow or dropped sink never blocks a
//! commit.

use chrono::{SecondsFormat, Utc};
use combat_core::InitiativeRoll;
use tokio::sync::mpsc;

/// One initiative roll in display-ready form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitiativeRollNote {
    pub creature_name: String,
    pub roll: u32,
    pub modifier: i32,
    pub total: i32,
    /// Wall-clock time the note was produced, ISO-8601.
    pub timestamp: String,
    /// Pre-rendered chat line.
    pub content: String,
}

impl InitiativeRollNote {
    pub fn from_roll(roll: &InitiativeRoll) -> Self {
        let sign = if roll.modifier < 0 { '-' } else { '+' };
        let content = format!(
            "{} rolled initiative: {} ({} {} {})",
            roll.name,
            roll.total,
            roll.d20_roll,
            sign,
            roll.modifier.abs(),
        );
        Self {
            creature_name: roll.name.clone(),
            roll: roll.d20_roll,
            modifier: roll.modifier,
            total: roll.total,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            content,
        }
    }
}

/// Receives initiative roll notes from the session worker.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, note: InitiativeRollNote);
}

/// Logs each note at info; the default sink.
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, note: InitiativeRollNote) {
        tracing::info!(
            target: "runtime::notify",
            creature = %note.creature_name,
            total = note.total,
            "{}",
            note.content
        );
    }
}

/// Forwards notes into an unbounded channel for a host UI to drain.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<InitiativeRollNote>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<InitiativeRollNote>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, note: InitiativeRollNote) {
        if self.tx.send(note).is_err() {
            tracing::trace!(target: "runtime::notify", "notification receiver dropped");
        }
    }
}
