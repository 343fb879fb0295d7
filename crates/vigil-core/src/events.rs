use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::CanonicalStatus;

/// Every externally visible state change produces an Event.
/// Shells (CLI, GUI) render them; tests assert on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The debounced status changed.
    StatusChanged {
        from: CanonicalStatus,
        to: CanonicalStatus,
        at: DateTime<Utc>,
    },
    /// The gatekeeper fired an alert. `delivered` is false while muted:
    /// the bookkeeping happened but nothing reached the dispatcher.
    AlertFired {
        status: CanonicalStatus,
        text: String,
        streak: u32,
        reminder: bool,
        escalated: bool,
        delivered: bool,
        at: DateTime<Utc>,
    },
    /// Focused time or a session reward credited XP.
    XpGained {
        amount: u64,
        xp: u64,
        at: DateTime<Utc>,
    },
    /// A fired alert deducted XP. `amount` is what was actually taken
    /// after the zero floor.
    XpPenalized {
        amount: u64,
        xp: u64,
        at: DateTime<Utc>,
    },
    /// XP crossed the requirement for the current level.
    LevelUp { level: u32, at: DateTime<Utc> },
    SessionStarted {
        minutes: u64,
        xp_reward: u64,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        minutes: u64,
        xp_reward: u64,
        at: DateTime<Utc>,
    },
    SessionAborted {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
}
