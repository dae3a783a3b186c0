//! External switch executable.

use crate::domain::config::SwitchCommand;
use crate::domain::error::TriggerError;
use crate::ports::SwitchTrigger;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Longest stderr excerpt carried into an error detail.
const MAX_STDERR_CHARS: usize = 2048;

/// Runs the configured command and waits for it to exit.
pub struct CommandSwitchTrigger {
    command: SwitchCommand,
}

impl CommandSwitchTrigger {
    pub fn new(command: SwitchCommand) -> Self {
        Self { command }
    }
}

impl SwitchTrigger for CommandSwitchTrigger {
    fn trigger(&self) -> Result<(), TriggerError> {
        let program = &self.command.program;
        debug!(program = %program, args = ?self.command.args, "Running wifi switch");

        let output = Command::new(program)
            .args(&self.command.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| TriggerError::Launch {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(TriggerError::NonZeroExit {
                program: program.clone(),
                code: output.status.code(),
                stderr: excerpt(&output.stderr),
            });
        }

        info!(program = %program, "Wifi switch completed");
        Ok(())
    }
}

fn excerpt(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    match text.char_indices().nth(MAX_STDERR_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
