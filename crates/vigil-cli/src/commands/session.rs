use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

use chrono::Local;
use clap::Args;
use vigil_core::Config;

#[derive(Args)]
pub struct SessionArgs {
    /// Session length in minutes
    #[arg(long, default_value = "25")]
    pub minutes: u64,
    /// Replay observations from a JSONL file instead of simulating
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,
    /// Seed for the simulated source
    #[arg(long)]
    pub seed: Option<u64>,
    /// Mute voice alerts
    #[arg(long)]
    pub mute: bool,
    /// Emit events as JSON lines
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: SessionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let (mut engine, mut dispatcher, store) = super::engine_context(&config, args.mute)?;
    let mut source = super::build_source(args.replay.as_deref(), args.seed, &config)?;

    let (session, events) = engine.begin_session(args.minutes, Instant::now());
    for event in &events {
        super::print_event(event, args.json)?;
    }
    if !args.json {
        match engine.active_task() {
            Some(task) => println!("working on: {}", task.text),
            None => println!("no active task, logging as free study"),
        }
    }

    let running = super::interrupt_flag();
    let interval = Duration::from_millis(1000);
    let mut minutes_left = session.minutes();

    let completed = loop {
        let now = Instant::now();
        if session.is_complete(now) {
            break true;
        }
        if !running.load(Ordering::SeqCst) {
            break false;
        }
        if source.is_exhausted() {
            if !args.json {
                println!("replay exhausted");
            }
            break false;
        }

        let obs = source.next_observation();
        for event in engine.tick(&obs) {
            super::print_event(&event, args.json)?;
        }

        let left = session.remaining(now).as_secs().div_ceil(60);
        if left < minutes_left {
            minutes_left = left;
            if !args.json {
                let s = engine.snapshot();
                println!(
                    "[{}] {left} min remaining | {} | {} xp",
                    Local::now().format("%H:%M:%S"),
                    s.status,
                    s.xp
                );
            }
        }
        thread::sleep(interval);
    };

    let events = if completed {
        engine.complete_session(&session)
    } else {
        engine.abort_session(&session, Instant::now())
    };
    for event in &events {
        super::print_event(event, args.json)?;
    }

    store.save(&engine.profile())?;
    dispatcher.shutdown();
    Ok(())
}
