use chrono::Local;
use clap::Subcommand;
use vigil_core::engine::XpLedger;
use vigil_core::{Config, Profile, ProfileStore};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show level, xp, and task summary
    Show {
        /// Print the raw profile as JSON
        #[arg(long)]
        json: bool,
    },
    /// List completed study sessions
    History {
        /// Only the most recent N entries
        #[arg(long, value_name = "N")]
        last: Option<usize>,
    },
    /// Reset xp, level, tasks, and history
    Reset,
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = ProfileStore::open_default()?;

    match action {
        ProfileAction::Show { json } => {
            let profile = store.load();
            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
                return Ok(());
            }
            let config = Config::load_or_default();
            let ledger = XpLedger::restore(config.xp, profile.xp, profile.level);
            let open = profile.tasks.iter().filter(|t| !t.done).count();
            let done = profile.tasks.len() - open;
            let minutes: u64 = profile.history.iter().map(|h| h.minutes).sum();
            println!(
                "level {} | {} xp ({} to next)",
                ledger.level(),
                ledger.xp(),
                ledger.xp_to_next()
            );
            println!("tasks: {open} open, {done} done");
            println!(
                "history: {} sessions, {} minutes studied",
                profile.history.len(),
                minutes
            );
            if let Some(task) = profile.active_task() {
                println!("active task: {}", task.text);
            }
        }
        ProfileAction::History { last } => {
            let profile = store.load();
            if profile.history.is_empty() {
                println!("no sessions recorded");
                return Ok(());
            }
            let skip = last.map_or(0, |n| profile.history.len().saturating_sub(n));
            for entry in &profile.history[skip..] {
                println!(
                    "{}  {:>3} min  {:>4} xp  {}",
                    entry.date.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    entry.minutes,
                    entry.xp,
                    entry.task
                );
            }
        }
        ProfileAction::Reset => {
            store.save(&Profile::default())?;
            println!("profile reset");
        }
    }
    Ok(())
}
