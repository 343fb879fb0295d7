//! Observation debouncing.
//!
//! Raw per-frame detections flicker. Presence-loss and eye-closure are the
//! noisiest signals, so each must persist (wall-clock for absence, frame
//! count for closure) before it changes the status. Device and multi-person
//! detections take effect on the frame they appear.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::observation::Observation;
use crate::status::CanonicalStatus;

/// Hysteresis thresholds for the noisy signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Continuous absence required before `Away`, in milliseconds.
    #[serde(default = "default_face_loss_ms")]
    pub face_loss_ms: u64,
    /// Consecutive closed-eye frames required before `Tired`.
    /// The default assumes roughly 30 observations per second.
    #[serde(default = "default_eyes_closed_frames")]
    pub eyes_closed_frames: u32,
}

fn default_face_loss_ms() -> u64 {
    2000
}
fn default_eyes_closed_frames() -> u32 {
    60
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            face_loss_ms: default_face_loss_ms(),
            eyes_closed_frames: default_eyes_closed_frames(),
        }
    }
}

/// Maps observations to a stable `CanonicalStatus`.
///
/// Priority order, first match wins: debounced absence, sustained eye
/// closure, device, crowd, focus. The order is a strict precedence when
/// several conditions hold at once (tiredness masks a stray device hit).
#[derive(Debug)]
pub struct StatusNormalizer {
    config: DetectionConfig,
    face_lost_since: Option<Instant>,
    closed_frames: u32,
    last_status: CanonicalStatus,
}

impl StatusNormalizer {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            face_lost_since: None,
            closed_frames: 0,
            last_status: CanonicalStatus::Focus,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// The status from the most recent tick.
    pub fn last_status(&self) -> CanonicalStatus {
        self.last_status
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Classify one observation.
    pub fn normalize(&mut self, obs: &Observation) -> CanonicalStatus {
        if obs.person_count == 0 {
            if self.face_lost_since.is_none() {
                self.face_lost_since = Some(obs.timestamp);
            }
        } else {
            self.face_lost_since = None;
        }

        // Closed-eye evidence requires a visible face.
        if obs.eyes_closed && obs.person_count > 0 {
            self.closed_frames = self.closed_frames.saturating_add(1);
        } else {
            self.closed_frames = 0;
        }

        let status = if let Some(since) = self.face_lost_since {
            if obs.timestamp.duration_since(since) >= self.face_loss_threshold() {
                CanonicalStatus::Away
            } else {
                // Absence not yet confirmed: retain the previous status.
                self.last_status
            }
        } else if self.closed_frames >= self.config.eyes_closed_frames {
            CanonicalStatus::Tired
        } else if obs.device_detected {
            CanonicalStatus::Phone
        } else if obs.person_count > 1 {
            CanonicalStatus::MultiplePeople
        } else {
            CanonicalStatus::Focus
        };

        if status != self.last_status {
            debug!(from = %self.last_status, to = %status, "status changed");
        }
        self.last_status = status;
        status
    }

    fn face_loss_threshold(&self) -> Duration {
        Duration::from_millis(self.config.face_loss_ms)
    }
}
