pub mod config;
pub mod profile;
pub mod run;
pub mod session;
pub mod task;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use vigil_core::{
    AttentionEngine, Config, Dispatcher, Event, MessageCatalog, ProfileStore, ReplaySource,
    SignalSource, SimulatedSource,
};

use crate::sink;

/// Wire up the engine, its dispatcher, and the profile store from config.
pub(crate) fn engine_context(
    config: &Config,
    mute: bool,
) -> Result<(AttentionEngine, Dispatcher, ProfileStore), Box<dyn std::error::Error>> {
    let dispatcher = Dispatcher::spawn(sink::from_config(&config.speech));
    let store = ProfileStore::open_default()?;
    let profile = store.load();
    let engine = AttentionEngine::new(
        config,
        MessageCatalog::builtin(),
        dispatcher.notifier(),
        profile,
    )?;
    if mute {
        engine.set_muted(true);
    }
    Ok((engine, dispatcher, store))
}

/// Pick the observation source: a JSONL replay file when given, otherwise
/// the simulated scene, with `--seed` overriding the configured seed.
pub(crate) fn build_source(
    replay: Option<&Path>,
    seed: Option<u64>,
    config: &Config,
) -> Result<Box<dyn SignalSource>, Box<dyn std::error::Error>> {
    match replay {
        Some(path) => Ok(Box::new(ReplaySource::open(path)?)),
        None => {
            let mut sim = config.simulation.clone();
            if seed.is_some() {
                sim.seed = seed;
            }
            Ok(Box::new(SimulatedSource::new(sim)))
        }
    }
}

/// Arm a Ctrl+C flag for loop shutdown.
pub(crate) fn interrupt_flag() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");
    running
}

/// Render one engine event, either as a human line or a JSON line.
pub(crate) fn print_event(event: &Event, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        Event::StatusChanged { from, to, at } => {
            println!("[{}] status: {from} -> {to}", local_time(at));
        }
        Event::AlertFired {
            status,
            text,
            streak,
            escalated,
            delivered,
            at,
            ..
        } => {
            let mut tags = format!("{status}, streak {streak}");
            if *escalated {
                tags.push_str(", escalated");
            }
            if !*delivered {
                tags.push_str(", muted");
            }
            println!("[{}] alert ({tags}): {text}", local_time(at));
        }
        // Accrual fires on every focused tick; the periodic status line
        // carries the running total instead.
        Event::XpGained { .. } => {}
        Event::XpPenalized { amount, xp, at } => {
            println!("[{}] -{amount} xp ({xp} total)", local_time(at));
        }
        Event::LevelUp { level, at } => {
            println!("[{}] level up: now level {level}", local_time(at));
        }
        Event::SessionStarted {
            minutes,
            xp_reward,
            at,
        } => {
            println!(
                "[{}] session started: {minutes} min, {xp_reward} xp on completion",
                local_time(at)
            );
        }
        Event::SessionCompleted {
            minutes,
            xp_reward,
            at,
        } => {
            println!(
                "[{}] session complete: {minutes} min, +{xp_reward} xp",
                local_time(at)
            );
        }
        Event::SessionAborted { elapsed_secs, at } => {
            println!(
                "[{}] session aborted after {} min",
                local_time(at),
                elapsed_secs / 60
            );
        }
    }
    Ok(())
}

fn local_time(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}
