//! Persisted learner state.
//!
//! The profile is everything that survives a restart: XP and level, the
//! task list, and the session history. It is a plain serde struct so the
//! store can write it as JSON and older files with missing fields still
//! load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line on the study checklist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            done: false,
        }
    }
}

/// One completed study session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub date: DateTime<Utc>,
    /// Task the session was spent on, or "Free study".
    pub task: String,
    pub minutes: u64,
    pub xp: u64,
}

/// Everything persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(default)]
    pub xp: u64,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

fn default_level() -> u32 {
    1
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            xp: 0,
            level: default_level(),
            tasks: Vec::new(),
            history: Vec::new(),
        }
    }
}

impl Profile {
    // ── Queries ──────────────────────────────────────────────────────

    /// The task a session is attributed to: the first unfinished one.
    pub fn active_task(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| !t.done)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn add_task(&mut self, text: impl Into<String>) {
        self.tasks.push(Task::new(text));
    }

    /// Flip the done flag on the task at `index`. Returns the task after
    /// the flip, or None when the index is out of range.
    pub fn toggle_task(&mut self, index: usize) -> Option<&Task> {
        let task = self.tasks.get_mut(index)?;
        task.done = !task.done;
        Some(&*task)
    }

    pub fn log_session(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }
}
