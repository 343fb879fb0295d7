//! Signal sources for driving the engine without a real camera.
//!
//! The perception stack itself lives outside this crate; these sources
//! exist for demos, replay, and testing. `SimulatedSource` fabricates a
//! plausible study scene, `ReplaySource` feeds back a recorded one.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use std::time::Instant;

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::observation::{Observation, SignalSource};

/// Knobs for the simulated scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Probability per tick of a distraction episode starting while focused.
    #[serde(default = "default_distraction_probability")]
    pub distraction_probability: f64,
    /// Episode length range in ticks, inclusive.
    #[serde(default = "default_min_episode_ticks")]
    pub min_episode_ticks: u32,
    #[serde(default = "default_max_episode_ticks")]
    pub max_episode_ticks: u32,
    /// Random seed for reproducibility (None = random).
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_distraction_probability() -> f64 {
    0.02
}
fn default_min_episode_ticks() -> u32 {
    10
}
fn default_max_episode_ticks() -> u32 {
    120
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            distraction_probability: default_distraction_probability(),
            min_episode_ticks: default_min_episode_ticks(),
            max_episode_ticks: default_max_episode_ticks(),
            seed: None,
        }
    }
}

/// What the simulated user is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Episode {
    Focused,
    SteppedOut,
    OnPhone,
    Drowsy,
    Visited,
}

/// Stochastic observation generator: mostly focused, with occasional
/// distraction episodes of random kind and length.
pub struct SimulatedSource {
    config: SimulationConfig,
    rng: Mcg128Xsl64,
    episode: Episode,
    remaining_ticks: u32,
}

impl SimulatedSource {
    pub fn new(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self {
            config,
            rng,
            episode: Episode::Focused,
            remaining_ticks: 0,
        }
    }

    fn begin_episode(&mut self) {
        self.episode = match self.rng.gen_range(0..4) {
            0 => Episode::SteppedOut,
            1 => Episode::OnPhone,
            2 => Episode::Drowsy,
            _ => Episode::Visited,
        };
        let lo = self.config.min_episode_ticks.max(1);
        let hi = self.config.max_episode_ticks.max(lo);
        self.remaining_ticks = self.rng.gen_range(lo..=hi);
    }
}

impl SignalSource for SimulatedSource {
    fn next_observation(&mut self) -> Observation {
        let now = Instant::now();
        if self.episode == Episode::Focused {
            if self.rng.gen::<f64>() < self.config.distraction_probability {
                self.begin_episode();
            }
        } else {
            self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
            if self.remaining_ticks == 0 {
                self.episode = Episode::Focused;
            }
        }
        match self.episode {
            Episode::Focused => Observation::new(1, false, false, now),
            Episode::SteppedOut => Observation::absent(now),
            Episode::OnPhone => Observation::new(1, true, false, now),
            Episode::Drowsy => Observation::new(1, false, true, now),
            Episode::Visited => Observation::new(2, false, false, now),
        }
    }
}

/// One line of a JSONL replay file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayRecord {
    pub person_count: u32,
    #[serde(default)]
    pub device_detected: bool,
    #[serde(default)]
    pub eyes_closed: bool,
}

/// Replays observations from a JSONL file, one record per tick.
///
/// Unreadable or malformed lines degrade to the empty-scene sentinel rather
/// than erroring, matching the source contract.
pub struct ReplaySource {
    lines: Lines<BufReader<File>>,
    exhausted: bool,
}

impl ReplaySource {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            exhausted: false,
        })
    }
}

impl SignalSource for ReplaySource {
    fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn next_observation(&mut self) -> Observation {
        let now = Instant::now();
        loop {
            match self.lines.next() {
                None => {
                    self.exhausted = true;
                    return Observation::absent(now);
                }
                Some(Err(e)) => {
                    warn!("replay read failed: {e}");
                    self.exhausted = true;
                    return Observation::absent(now);
                }
                Some(Ok(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<ReplayRecord>(&line) {
                        Ok(rec) => {
                            return Observation::new(
                                rec.person_count,
                                rec.device_detected,
                                rec.eyes_closed,
                                now,
                            );
                        }
                        Err(e) => {
                            warn!("skipping malformed replay line: {e}");
                            return Observation::absent(now);
                        }
                    }
                }
            }
        }
    }
}
