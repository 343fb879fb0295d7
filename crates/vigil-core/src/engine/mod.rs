//! The attention pipeline.
//!
//! Three stages, one owner:
//! - the normalizer debounces raw observations into a stable status,
//! - the gatekeeper paces alerts and tracks the escalation streak,
//! - the ledger turns focus time and alerts into XP and levels.
//!
//! `AttentionEngine` composes them behind a single `tick` call.

mod attention;
mod gatekeeper;
mod ledger;
mod normalizer;

pub use attention::{AttentionEngine, EngineSnapshot};
pub use gatekeeper::{AlertConfig, AlertDecision, Gatekeeper};
pub use ledger::{XpConfig, XpLedger};
pub use normalizer::{DetectionConfig, StatusNormalizer};
