//! Persona-themed message catalog.
//!
//! Alert text is resolved through a persona table rather than hardcoded at
//! the call sites, so the nagging voice is swappable. Every key must map to
//! non-empty text; a gap is a configuration error surfaced at engine
//! construction, not a silently skipped alert.

use std::collections::HashMap;

use crate::error::CatalogError;
use crate::status::CanonicalStatus;

/// What a message is being resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// A distraction alert for the given status.
    Distraction(CanonicalStatus),
    /// The repetition warning used once the streak escalates.
    Escalation,
    LevelUp,
    SessionStart,
    SessionComplete,
    SessionAbort,
}

impl MessageKey {
    /// Every key a persona must define.
    pub const ALL: [MessageKey; 9] = [
        MessageKey::Distraction(CanonicalStatus::Away),
        MessageKey::Distraction(CanonicalStatus::Phone),
        MessageKey::Distraction(CanonicalStatus::MultiplePeople),
        MessageKey::Distraction(CanonicalStatus::Tired),
        MessageKey::Escalation,
        MessageKey::LevelUp,
        MessageKey::SessionStart,
        MessageKey::SessionComplete,
        MessageKey::SessionAbort,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::Distraction(status) => status.as_str(),
            MessageKey::Escalation => "escalation",
            MessageKey::LevelUp => "level_up",
            MessageKey::SessionStart => "session_start",
            MessageKey::SessionComplete => "session_complete",
            MessageKey::SessionAbort => "session_abort",
        }
    }
}

/// Default persona used when the config does not name one.
pub const DEFAULT_PERSONA: &str = "strict_parent";

/// Persona tables mapping message keys to text templates.
///
/// Templates substitute `{status}` (spoken condition name), `{level}`,
/// `{minutes}`, and `{xp}` where the key provides them.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    personas: HashMap<String, HashMap<MessageKey, String>>,
}

impl MessageCatalog {
    /// Catalog containing the built-in personas.
    pub fn builtin() -> Self {
        let mut personas = HashMap::new();
        personas.insert("strict_parent".to_string(), strict_parent());
        personas.insert("coach".to_string(), coach());
        Self { personas }
    }

    /// Empty catalog for app-supplied personas.
    pub fn new() -> Self {
        Self {
            personas: HashMap::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn persona_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.personas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Raw template for a key.
    pub fn resolve(&self, persona: &str, key: MessageKey) -> Result<&str, CatalogError> {
        let table = self
            .personas
            .get(persona)
            .ok_or_else(|| CatalogError::UnknownPersona(persona.to_string()))?;
        let text = table.get(&key).ok_or_else(|| CatalogError::MissingMessage {
            persona: persona.to_string(),
            key: key.as_str().to_string(),
        })?;
        if text.trim().is_empty() {
            return Err(CatalogError::EmptyMessage {
                persona: persona.to_string(),
                key: key.as_str().to_string(),
            });
        }
        Ok(text)
    }

    /// Check that every key resolves to non-empty text for this persona.
    pub fn validate(&self, persona: &str) -> Result<(), CatalogError> {
        for key in MessageKey::ALL {
            self.resolve(persona, key)?;
        }
        Ok(())
    }

    /// Alert text for a gatekeeper decision.
    ///
    /// Tiredness always gets the fixed wake-up line; other statuses switch
    /// to the escalated repetition warning once the streak crosses the
    /// threshold.
    pub fn alert_text(
        &self,
        persona: &str,
        status: CanonicalStatus,
        escalated: bool,
    ) -> Result<String, CatalogError> {
        if status != CanonicalStatus::Tired && escalated {
            let template = self.resolve(persona, MessageKey::Escalation)?;
            return Ok(template.replace("{status}", status.label()));
        }
        Ok(self
            .resolve(persona, MessageKey::Distraction(status))?
            .to_string())
    }

    pub fn level_up_text(&self, persona: &str, level: u32) -> Result<String, CatalogError> {
        Ok(self
            .resolve(persona, MessageKey::LevelUp)?
            .replace("{level}", &level.to_string()))
    }

    /// Text for session lifecycle announcements.
    pub fn session_text(
        &self,
        persona: &str,
        key: MessageKey,
        minutes: u64,
        xp: u64,
    ) -> Result<String, CatalogError> {
        Ok(self
            .resolve(persona, key)?
            .replace("{minutes}", &minutes.to_string())
            .replace("{xp}", &xp.to_string()))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Add or replace a persona table.
    pub fn insert_persona(&mut self, name: impl Into<String>, table: HashMap<MessageKey, String>) {
        self.personas.insert(name.into(), table);
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strict_parent() -> HashMap<MessageKey, String> {
    let entries = [
        (
            MessageKey::Distraction(CanonicalStatus::Away),
            "Where did you go? Your books are still open!",
        ),
        (
            MessageKey::Distraction(CanonicalStatus::Phone),
            "Put that phone away! Study time is not phone time.",
        ),
        (
            MessageKey::Distraction(CanonicalStatus::MultiplePeople),
            "This is study time, not social hour!",
        ),
        (
            MessageKey::Distraction(CanonicalStatus::Tired),
            "Wake up! Sleep is for after the exam!",
        ),
        (
            MessageKey::Escalation,
            "I have told you again and again: put that {status} away!",
        ),
        (
            MessageKey::LevelUp,
            "Level {level} already? Fine. Don't let it go to your head.",
        ),
        (
            MessageKey::SessionStart,
            "A {minutes} minute session starts now. Eyes on your work!",
        ),
        (
            MessageKey::SessionComplete,
            "Session finished, {xp} points earned. Acceptable.",
        ),
        (
            MessageKey::SessionAbort,
            "Giving up already? We will try this again later.",
        ),
    ];
    entries
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect()
}

fn coach() -> HashMap<MessageKey, String> {
    let entries = [
        (
            MessageKey::Distraction(CanonicalStatus::Away),
            "Looks like you stepped away. Come back when you're ready.",
        ),
        (
            MessageKey::Distraction(CanonicalStatus::Phone),
            "Phone down, eyes up. You've got this.",
        ),
        (
            MessageKey::Distraction(CanonicalStatus::MultiplePeople),
            "Company can wait. Let's finish this block first.",
        ),
        (
            MessageKey::Distraction(CanonicalStatus::Tired),
            "Eyes closing? Stand up, stretch, take a breath.",
        ),
        (
            MessageKey::Escalation,
            "That {status} keeps winning. Put it out of reach and reset.",
        ),
        (
            MessageKey::LevelUp,
            "Level {level}! Great consistency, keep stacking wins.",
        ),
        (
            MessageKey::SessionStart,
            "Starting a {minutes} minute block. One thing at a time.",
        ),
        (
            MessageKey::SessionComplete,
            "Block complete, {xp} XP banked. Well done.",
        ),
        (
            MessageKey::SessionAbort,
            "Stopped early. No problem, reset and go again.",
        ),
    ];
    entries
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect()
}
