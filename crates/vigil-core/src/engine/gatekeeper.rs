//! Alert pacing.
//!
//! The normalizer can report the same distraction thirty times a second.
//! The gatekeeper decides which of those reports deserve a spoken alert:
//! every fresh transition fires at once, and a distraction that persists
//! re-fires on a cooldown. It also tracks the consecutive-alert streak
//! that drives message escalation.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::status::CanonicalStatus;

/// Pacing and persona knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Minimum gap between repeated alerts for a sustained status, in
    /// milliseconds.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    /// Streak at which messages switch to the escalated form.
    #[serde(default = "default_escalation_streak")]
    pub escalation_streak: u32,
    /// Persona whose message table alerts are drawn from.
    #[serde(default = "default_persona")]
    pub persona: String,
    /// Start muted. Alerts are still evaluated and penalized, only the
    /// spoken delivery is skipped.
    #[serde(default)]
    pub muted: bool,
    /// Whether cooldown reminders advance the streak. When false, only
    /// fresh transitions move it and reminders repeat the current level.
    #[serde(default = "default_reminder_advances_streak")]
    pub reminder_advances_streak: bool,
}

fn default_cooldown_ms() -> u64 {
    10_000
}
fn default_escalation_streak() -> u32 {
    3
}
fn default_persona() -> String {
    "strict_parent".to_string()
}
fn default_reminder_advances_streak() -> bool {
    true
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
            escalation_streak: default_escalation_streak(),
            persona: default_persona(),
            muted: false,
            reminder_advances_streak: default_reminder_advances_streak(),
        }
    }
}

/// Verdict for a single tick that should produce an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertDecision {
    pub status: CanonicalStatus,
    /// Consecutive alerts for this status, this one included.
    pub streak: u32,
    /// True when this is a cooldown repeat rather than a fresh transition.
    pub reminder: bool,
    /// True when the streak has reached the escalation threshold.
    pub escalated: bool,
}

/// Decides when a status report becomes an alert.
#[derive(Debug)]
pub struct Gatekeeper {
    config: AlertConfig,
    last_status: CanonicalStatus,
    last_alert_at: Option<Instant>,
    streak: u32,
}

impl Gatekeeper {
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config,
            last_status: CanonicalStatus::Focus,
            last_alert_at: None,
            streak: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn last_status(&self) -> CanonicalStatus {
        self.last_status
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Evaluate one normalized status. Returns the alert to raise, if any.
    pub fn evaluate(&mut self, status: CanonicalStatus, now: Instant) -> Option<AlertDecision> {
        let fresh = status != self.last_status;
        self.last_status = status;

        if !status.is_distraction() {
            // Back to focus: the streak starts over.
            self.streak = 0;
            return None;
        }

        if fresh {
            // A new kind of distraction alerts immediately, cooldown or not.
            self.streak = 1;
        } else {
            let elapsed = self
                .last_alert_at
                .map(|at| now.duration_since(at))
                .unwrap_or(Duration::MAX);
            if elapsed < self.cooldown() {
                return None;
            }
            if self.config.reminder_advances_streak {
                self.streak += 1;
            } else {
                self.streak = self.streak.max(1);
            }
        }

        self.last_alert_at = Some(now);
        Some(AlertDecision {
            status,
            streak: self.streak,
            reminder: !fresh,
            escalated: self.streak >= self.config.escalation_streak
                && status != CanonicalStatus::Tired,
        })
    }

    /// Forget pacing state, as when a study session starts.
    pub fn reset(&mut self) {
        self.last_status = CanonicalStatus::Focus;
        self.last_alert_at = None;
        self.streak = 0;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn cooldown(&self) -> Duration {
        Duration::from_millis(self.config.cooldown_ms)
    }
}
