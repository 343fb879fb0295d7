//! Speech sinks backing the notification dispatcher.

use std::process::Command;

use vigil_core::{SinkError, SpeechConfig, SpeechSink};

/// Prints alert text to stdout. Fallback when no speech command is set.
pub struct ConsoleSink;

impl SpeechSink for ConsoleSink {
    fn deliver(&mut self, text: &str) -> Result<(), SinkError> {
        println!("[voice] {text}");
        Ok(())
    }
}

/// Pipes alert text to an external text-to-speech command such as
/// `espeak-ng` or `say`. The text goes in as the final argument and the
/// command runs to completion, so utterances stay serialized.
pub struct CommandSink {
    program: String,
    args: Vec<String>,
}

impl CommandSink {
    /// Parse a whitespace-separated command line. Empty input yields None.
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl SpeechSink for CommandSink {
    fn deliver(&mut self, text: &str) -> Result<(), SinkError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .status()?;
        if !status.success() {
            return Err(format!("{} exited with {status}", self.program).into());
        }
        Ok(())
    }
}

/// Build the sink named by `[speech] command`; empty means console output.
pub fn from_config(speech: &SpeechConfig) -> Box<dyn SpeechSink> {
    match CommandSink::parse(&speech.command) {
        Some(sink) => Box::new(sink),
        None => Box::new(ConsoleSink),
    }
}
