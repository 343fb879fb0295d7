//! The canonical attentiveness classification.

use serde::{Deserialize, Serialize};

/// Debounced behavioral status derived from raw observations.
///
/// Recomputed every tick; never stored historically except as the previous
/// status inside the normalizer and gatekeeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalStatus {
    /// One person, no device, eyes open.
    Focus,
    /// Nobody in frame past the face-loss threshold.
    Away,
    /// A handheld device is visible.
    Phone,
    /// More than one person in frame.
    MultiplePeople,
    /// Eyes closed past the frame threshold.
    Tired,
}

impl CanonicalStatus {
    /// Statuses that trigger alerts, in gatekeeper terms.
    pub const DISTRACTIONS: [CanonicalStatus; 4] = [
        CanonicalStatus::Away,
        CanonicalStatus::Phone,
        CanonicalStatus::MultiplePeople,
        CanonicalStatus::Tired,
    ];

    pub fn is_distraction(self) -> bool {
        !matches!(self, CanonicalStatus::Focus)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalStatus::Focus => "focus",
            CanonicalStatus::Away => "away",
            CanonicalStatus::Phone => "phone",
            CanonicalStatus::MultiplePeople => "multiple_people",
            CanonicalStatus::Tired => "tired",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "focus" => Some(CanonicalStatus::Focus),
            "away" => Some(CanonicalStatus::Away),
            "phone" => Some(CanonicalStatus::Phone),
            "multiple_people" => Some(CanonicalStatus::MultiplePeople),
            "tired" => Some(CanonicalStatus::Tired),
            _ => None,
        }
    }

    /// Spoken name of the condition, used in message templates.
    pub fn label(self) -> &'static str {
        match self {
            CanonicalStatus::Focus => "focus",
            CanonicalStatus::Away => "wandering",
            CanonicalStatus::Phone => "phone",
            CanonicalStatus::MultiplePeople => "visitor",
            CanonicalStatus::Tired => "drowsiness",
        }
    }
}

impl std::fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
