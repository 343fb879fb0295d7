//! Raw per-tick perceptual readings.

use std::time::Instant;

/// One sampling tick's raw perceptual reading.
///
/// Transient: consumed by the engine on the tick it was produced, never
/// persisted. All engine timing (hysteresis, cooldowns, XP accrual) derives
/// from `timestamp`, so scripted sequences of observations replay
/// deterministically.
#[derive(Debug, Clone, Copy)]
pub struct Observation {
    /// Number of people in frame. Zero means the user is absent.
    pub person_count: u32,
    /// A handheld device is visible in frame.
    pub device_detected: bool,
    /// The user's eyes are closed this frame.
    pub eyes_closed: bool,
    /// Monotonic capture instant.
    pub timestamp: Instant,
}

impl Observation {
    pub fn new(
        person_count: u32,
        device_detected: bool,
        eyes_closed: bool,
        timestamp: Instant,
    ) -> Self {
        Self {
            person_count,
            device_detected,
            eyes_closed,
            timestamp,
        }
    }

    /// The empty-scene sentinel a source reports when it has no frame.
    ///
    /// Reads as nobody present, which the normalizer debounces into `Away`,
    /// so downstream logic always has a defined status.
    pub fn absent(timestamp: Instant) -> Self {
        Self {
            person_count: 0,
            device_detected: false,
            eyes_closed: false,
            timestamp,
        }
    }
}

/// A perceptual signal source feeding the engine one observation per tick.
///
/// Sources never fail: when no frame is available they report
/// [`Observation::absent`] instead.
pub trait SignalSource {
    fn next_observation(&mut self) -> Observation;

    /// True once the source can produce no further real frames.
    /// Live sources never exhaust.
    fn is_exhausted(&self) -> bool {
        false
    }
}
