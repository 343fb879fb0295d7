use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use chrono::Local;
use clap::Args;
use vigil_core::Config;

#[derive(Args)]
pub struct RunArgs {
    /// Replay observations from a JSONL file instead of simulating
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,
    /// Seed for the simulated source
    #[arg(long)]
    pub seed: Option<u64>,
    /// Tick interval in milliseconds
    #[arg(long, default_value = "1000")]
    pub interval_ms: u64,
    /// Mute voice alerts
    #[arg(long)]
    pub mute: bool,
    /// Emit events as JSON lines
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let (mut engine, mut dispatcher, store) = super::engine_context(&config, args.mute)?;
    let mut source = super::build_source(args.replay.as_deref(), args.seed, &config)?;

    if !args.json {
        let s = engine.snapshot();
        println!(
            "vigil | persona {} | level {} | {} xp ({} to next)",
            engine.persona(),
            s.level,
            s.xp,
            s.xp_to_next
        );
        println!("Press Ctrl+C to stop");
        println!();
    }

    let running = super::interrupt_flag();
    let interval = Duration::from_millis(args.interval_ms.max(1));
    let mut ticks: u64 = 0;

    while running.load(Ordering::SeqCst) {
        let obs = source.next_observation();
        for event in engine.tick(&obs) {
            super::print_event(&event, args.json)?;
        }

        ticks += 1;
        if !args.json && ticks % 60 == 0 {
            let s = engine.snapshot();
            println!(
                "[{}] {} | level {} | {} xp ({} to next)",
                Local::now().format("%H:%M:%S"),
                s.status,
                s.level,
                s.xp,
                s.xp_to_next
            );
        }

        if source.is_exhausted() {
            if !args.json {
                println!("replay exhausted");
            }
            break;
        }
        thread::sleep(interval);
    }

    if !args.json {
        let s = engine.snapshot();
        println!();
        println!(
            "stopped | level {} | {} xp ({} to next)",
            s.level, s.xp, s.xp_to_next
        );
    }

    store.save(&engine.profile())?;
    dispatcher.shutdown();
    Ok(())
}
