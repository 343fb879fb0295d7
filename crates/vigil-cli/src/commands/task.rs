use clap::Subcommand;
use vigil_core::ProfileStore;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the list
    Add {
        /// Task text
        text: String,
    },
    /// List tasks with their indices
    List {
        /// Print the raw task list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle a task done/undone by its list index
    Done {
        /// Task index as shown by `task list`
        index: usize,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = ProfileStore::open_default()?;
    let mut profile = store.load();

    match action {
        TaskAction::Add { text } => {
            profile.add_task(text);
            store.save(&profile)?;
            println!("added ({} tasks)", profile.tasks.len());
        }
        TaskAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&profile.tasks)?);
            } else if profile.tasks.is_empty() {
                println!("no tasks");
            } else {
                let active = profile.tasks.iter().position(|t| !t.done);
                for (index, task) in profile.tasks.iter().enumerate() {
                    let mark = if task.done { "x" } else { " " };
                    let tag = if active == Some(index) { "  (active)" } else { "" };
                    println!("{index:>3} [{mark}] {}{tag}", task.text);
                }
            }
        }
        TaskAction::Done { index } => {
            let task = profile
                .toggle_task(index)
                .ok_or(format!("no task at index {index}"))?;
            let line = format!(
                "{}: {}",
                if task.done { "done" } else { "reopened" },
                task.text
            );
            store.save(&profile)?;
            println!("{line}");
        }
    }
    Ok(())
}
