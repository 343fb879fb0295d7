//! Timed study sessions.
//!
//! A session is a countdown with an XP bounty. The engine handles the
//! announcements and the reward; this module only knows durations and
//! the preset table.

use std::time::{Duration, Instant};

/// Built-in session lengths with their completion rewards.
pub const SESSION_PRESETS: [(u64, u64); 4] = [(25, 50), (30, 65), (45, 100), (60, 150)];

/// Completion reward for a session of `minutes`. Non-preset lengths pay
/// two XP per minute.
pub fn reward_for_minutes(minutes: u64) -> u64 {
    SESSION_PRESETS
        .iter()
        .find(|(m, _)| *m == minutes)
        .map(|(_, xp)| *xp)
        .unwrap_or(minutes.saturating_mul(2))
}

/// A running countdown.
#[derive(Debug, Clone, Copy)]
pub struct StudySession {
    start: Instant,
    minutes: u64,
    xp_reward: u64,
}

impl StudySession {
    pub fn begin(minutes: u64, now: Instant) -> Self {
        Self {
            start: now,
            minutes,
            xp_reward: reward_for_minutes(minutes),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn minutes(&self) -> u64 {
        self.minutes
    }

    pub fn xp_reward(&self) -> u64 {
        self.xp_reward
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.minutes.saturating_mul(60))
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.duration_since(self.start)
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.duration().saturating_sub(self.elapsed(now))
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        self.elapsed(now) >= self.duration()
    }
}
