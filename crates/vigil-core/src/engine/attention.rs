//! The engine facade.
//!
//! `AttentionEngine` wires the normalizer, gatekeeper, and ledger into a
//! single `tick` call and owns the persisted profile. Shells drive it one
//! observation at a time and render the events it returns; nothing inside
//! blocks, speech goes through the notifier handle.

use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

use crate::dispatcher::Notifier;
use crate::engine::gatekeeper::Gatekeeper;
use crate::engine::ledger::XpLedger;
use crate::engine::normalizer::StatusNormalizer;
use crate::error::{CatalogError, Result};
use crate::events::Event;
use crate::messages::{MessageCatalog, MessageKey};
use crate::observation::Observation;
use crate::profile::{HistoryEntry, Profile, Task};
use crate::session::StudySession;
use crate::status::CanonicalStatus;
use crate::storage::Config;

/// Point-in-time view for status lines and shells.
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    pub status: CanonicalStatus,
    pub xp: u64,
    pub level: u32,
    pub xp_to_next: u64,
    pub streak: u32,
    pub muted: bool,
}

/// Single-writer core. One `tick` per observation; everything else is
/// queries and session bookkeeping.
pub struct AttentionEngine {
    normalizer: StatusNormalizer,
    gatekeeper: Gatekeeper,
    ledger: XpLedger,
    catalog: MessageCatalog,
    persona: String,
    notifier: Notifier,
    profile: Profile,
}

impl AttentionEngine {
    /// Build an engine from config, a message catalog, a notifier handle,
    /// and the persisted profile. Fails when the configured persona is
    /// missing from the catalog or has an incomplete message table.
    pub fn new(
        config: &Config,
        catalog: MessageCatalog,
        notifier: Notifier,
        profile: Profile,
    ) -> Result<Self> {
        catalog.validate(&config.alerts.persona)?;
        notifier.set_muted(config.alerts.muted);
        Ok(Self {
            normalizer: StatusNormalizer::new(config.detection.clone()),
            gatekeeper: Gatekeeper::new(config.alerts.clone()),
            ledger: XpLedger::restore(config.xp.clone(), profile.xp, profile.level),
            persona: config.alerts.persona.clone(),
            catalog,
            notifier,
            profile,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            status: self.normalizer.last_status(),
            xp: self.ledger.xp(),
            level: self.ledger.level(),
            xp_to_next: self.ledger.xp_to_next(),
            streak: self.gatekeeper.streak(),
            muted: self.notifier.is_muted(),
        }
    }

    /// The persisted view: ledger progress over the stored tasks and
    /// history. This is what the profile store writes to disk.
    pub fn profile(&self) -> Profile {
        Profile {
            xp: self.ledger.xp(),
            level: self.ledger.level(),
            tasks: self.profile.tasks.clone(),
            history: self.profile.history.clone(),
        }
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn is_muted(&self) -> bool {
        self.notifier.is_muted()
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.profile.active_task()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Process one observation. Returns the events it produced, in the
    /// order they happened.
    pub fn tick(&mut self, obs: &Observation) -> Vec<Event> {
        let mut events = Vec::new();

        let previous = self.normalizer.last_status();
        let status = self.normalizer.normalize(obs);
        if status != previous {
            events.push(Event::StatusChanged {
                from: previous,
                to: status,
                at: Utc::now(),
            });
        }

        if status == CanonicalStatus::Focus {
            let gained = self.ledger.accrue_focus(obs.timestamp);
            if gained > 0 {
                events.push(Event::XpGained {
                    amount: gained,
                    xp: self.ledger.xp(),
                    at: Utc::now(),
                });
            }
        } else {
            self.ledger.break_focus();
        }

        if let Some(decision) = self.gatekeeper.evaluate(status, obs.timestamp) {
            // Penalty applies whether or not the alert is audible.
            let deducted = self.ledger.penalize();
            let (text, delivered) =
                match self
                    .catalog
                    .alert_text(&self.persona, decision.status, decision.escalated)
                {
                    Ok(text) => {
                        let delivered = self.notifier.enqueue(text.clone());
                        (text, delivered)
                    }
                    Err(e) => {
                        error!(error = %e, "message catalog lookup failed");
                        (decision.status.label().to_string(), false)
                    }
                };
            events.push(Event::AlertFired {
                status: decision.status,
                text,
                streak: decision.streak,
                reminder: decision.reminder,
                escalated: decision.escalated,
                delivered,
                at: Utc::now(),
            });
            if deducted > 0 {
                events.push(Event::XpPenalized {
                    amount: deducted,
                    xp: self.ledger.xp(),
                    at: Utc::now(),
                });
            }
        }

        events.extend(self.settle());
        events
    }

    pub fn set_muted(&self, muted: bool) {
        self.notifier.set_muted(muted);
    }

    pub fn add_task(&mut self, text: impl Into<String>) {
        self.profile.add_task(text);
    }

    pub fn toggle_task(&mut self, index: usize) -> Option<&Task> {
        self.profile.toggle_task(index)
    }

    /// Start a timed session. Alert pacing starts over so the first
    /// distraction of the session alerts immediately.
    pub fn begin_session(&mut self, minutes: u64, now: Instant) -> (StudySession, Vec<Event>) {
        self.gatekeeper.reset();
        let session = StudySession::begin(minutes, now);
        self.announce(self.catalog.session_text(
            &self.persona,
            MessageKey::SessionStart,
            minutes,
            session.xp_reward(),
        ));
        let events = vec![Event::SessionStarted {
            minutes,
            xp_reward: session.xp_reward(),
            at: Utc::now(),
        }];
        (session, events)
    }

    /// Credit a finished session: a history line against the active task,
    /// the XP bounty, and any level-ups that follow.
    pub fn complete_session(&mut self, session: &StudySession) -> Vec<Event> {
        let minutes = session.minutes();
        let reward = session.xp_reward();
        let task = self
            .profile
            .active_task()
            .map(|t| t.text.clone())
            .unwrap_or_else(|| "Free study".to_string());
        self.profile.log_session(HistoryEntry {
            date: Utc::now(),
            task,
            minutes,
            xp: reward,
        });
        self.ledger.award(reward);
        self.announce(self.catalog.session_text(
            &self.persona,
            MessageKey::SessionComplete,
            minutes,
            reward,
        ));

        let mut events = vec![
            Event::SessionCompleted {
                minutes,
                xp_reward: reward,
                at: Utc::now(),
            },
            Event::XpGained {
                amount: reward,
                xp: self.ledger.xp(),
                at: Utc::now(),
            },
        ];
        events.extend(self.settle());
        events
    }

    /// Abandon a session. No reward, no history line.
    pub fn abort_session(&mut self, session: &StudySession, now: Instant) -> Vec<Event> {
        let elapsed_secs = session.elapsed(now).as_secs();
        self.announce(self.catalog.session_text(
            &self.persona,
            MessageKey::SessionAbort,
            elapsed_secs / 60,
            0,
        ));
        vec![Event::SessionAborted {
            elapsed_secs,
            at: Utc::now(),
        }]
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Consume completed level requirements, announcing each level.
    /// Level-up announcements skip the alert cooldown entirely, they go
    /// straight to the notifier.
    fn settle(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        for level in self.ledger.settle_levels() {
            info!(level, "level up");
            self.announce(self.catalog.level_up_text(&self.persona, level));
            events.push(Event::LevelUp {
                level,
                at: Utc::now(),
            });
        }
        events
    }

    /// Queue announcement text. Lookup failures are logged, not fatal:
    /// `new()` validated the persona, so a failure here means the catalog
    /// was swapped out from under us.
    fn announce(&self, text: std::result::Result<String, CatalogError>) {
        match text {
            Ok(text) => {
                self.notifier.enqueue(text);
            }
            Err(e) => error!(error = %e, "message catalog lookup failed"),
        }
    }
}
