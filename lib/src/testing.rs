use crate::environment::{Environment, OsFamily, DEFAULT_WINDOWS_BRIDGE};
use crate::error::{Result, ServiceError};
use crate::process::{command_line, CommandOutput, CommandRunner};
use crate::InstallOptions;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Fixed host used by renderer tests.
pub fn environment(root: &Path) -> Environment {
    Environment {
        os: OsFamily::Linux,
        root: root.to_path_buf(),
        home: PathBuf::from("/home/u"),
        cwd: PathBuf::from("/srv/app"),
        user: Some("u".into()),
        privileged: false,
        temp_dir: root.join("tmp"),
        runtime: PathBuf::from("/opt/deno/bin/deno"),
        windows_bridge: DEFAULT_WINDOWS_BRIDGE.into(),
    }
}

/// Host whose root, home and temp directory live inside a fresh temp dir.
pub fn sandbox() -> (TempDir, Environment) {
    let dir = tempfile::tempdir().unwrap();
    let mut env = environment(dir.path());
    env.home = dir.path().join("home/u");
    std::fs::create_dir_all(&env.home).unwrap();
    std::fs::create_dir_all(&env.temp_dir).unwrap();
    (dir, env)
}

pub fn options(name: &str, cmd: &str) -> InstallOptions {
    InstallOptions {
        name: name.into(),
        cmd: cmd.into(),
        ..Default::default()
    }
}

/// Records every command and answers with scripted outputs.
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: RefCell<Vec<String>>,
    responses: Vec<(String, CommandOutput)>,
    missing: Vec<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands whose line starts with `prefix` exit with `code`.
    pub fn fail(mut self, prefix: &str, code: i32, stderr: &str) -> Self {
        self.responses.push((
            prefix.to_string(),
            CommandOutput {
                code: Some(code),
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        ));
        self
    }

    /// Commands whose line starts with `prefix` succeed printing `stdout`.
    pub fn reply(mut self, prefix: &str, stdout: &str) -> Self {
        self.responses.push((
            prefix.to_string(),
            CommandOutput {
                code: Some(0),
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        ));
        self
    }

    /// Programs named `program` cannot be started at all.
    pub fn missing(mut self, program: &str) -> Self {
        self.missing.push(program.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let line = command_line(program, args);
        self.calls.borrow_mut().push(line.clone());
        if self.missing.iter().any(|missing| missing == program) {
            return Err(ServiceError::Spawn {
                command: line,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }
        let output = self
            .responses
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or(CommandOutput {
                code: Some(0),
                ..Default::default()
            });
        Ok(output)
    }
}
