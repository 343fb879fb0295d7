//! # Vigil Core Library
//!
//! This library provides the core logic for Vigil, a study-time attention
//! monitor. It implements a CLI-first philosophy where all operations are
//! available via a standalone binary; any GUI would be a thin shell over
//! the same core library.
//!
//! ## Architecture
//!
//! - **Attention Engine**: a single-writer pipeline driven by one `tick()`
//!   per observation: debounce raw detections into a stable status, pace
//!   alerts on a cooldown with escalation streaks, and settle XP/levels
//! - **Dispatcher**: an unbounded queue with a dedicated worker thread
//!   that serializes alert delivery to a speech sink
//! - **Storage**: TOML-based configuration and a JSON profile store
//! - **Sources**: simulated and replay observation sources for running
//!   without a camera
//!
//! ## Key Components
//!
//! - [`AttentionEngine`]: the facade shells drive
//! - [`Dispatcher`]: decoupled speech delivery
//! - [`MessageCatalog`]: persona message tables
//! - [`Config`]: application configuration management

pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod events;
pub mod messages;
pub mod observation;
pub mod profile;
pub mod session;
pub mod source;
pub mod status;
pub mod storage;

pub use dispatcher::{AlertMessage, Dispatcher, Notifier, SinkError, SpeechSink};
pub use engine::{AttentionEngine, EngineSnapshot};
pub use error::{CatalogError, ConfigError, CoreError, StoreError};
pub use events::Event;
pub use messages::{MessageCatalog, MessageKey, DEFAULT_PERSONA};
pub use observation::{Observation, SignalSource};
pub use profile::{HistoryEntry, Profile, Task};
pub use session::{reward_for_minutes, StudySession, SESSION_PRESETS};
pub use source::{ReplaySource, SimulatedSource, SimulationConfig};
pub use status::CanonicalStatus;
pub use storage::{data_dir, Config, ProfileStore, SpeechConfig};
