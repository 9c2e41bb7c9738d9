use crate::error::{Result, ServiceError};
use std::process::Command;
use tracing::{debug, warn};

/// Captured result of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stderr and stdout joined, for embedding in error messages.
    pub fn combined(&self) -> String {
        let stderr = self.stderr.trim();
        let stdout = self.stdout.trim();
        match (stderr.is_empty(), stdout.is_empty()) {
            (false, false) => format!("{stderr}\n{stdout}"),
            (false, true) => stderr.to_string(),
            (true, false) => stdout.to_string(),
            (true, true) => String::from("no output"),
        }
    }

    fn status_label(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {code}"),
            None => String::from("terminated by signal"),
        }
    }
}

/// Everything the core spawns goes through this seam.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;

    /// Runs the command and turns a non-zero exit into [`ServiceError::CommandFailed`].
    fn run_checked(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let output = self.run(program, args)?;
        if !output.success() {
            let command = command_line(program, args);
            warn!(%command, code = ?output.code, "command failed");
            return Err(ServiceError::CommandFailed {
                command,
                status: output.status_label(),
                output: output.combined(),
            });
        }
        Ok(output)
    }
}

pub fn command_line(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Spawns real processes and waits for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        debug!(command = %command_line(program, args), "running");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| ServiceError::Spawn {
                command: command_line(program, args),
                source,
            })?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
