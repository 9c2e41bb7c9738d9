mod detect;
mod generate;
mod install;
mod uninstall;

pub use detect::Detect;
pub use generate::Generate;
pub use install::Install;
pub use uninstall::Uninstall;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use servicelib::{InstallOptions, ManualStep};
use std::path::Path;

/// Options shared by `install` and `generate`.
#[derive(Debug, Args)]
pub struct ServiceArgs {
    #[arg(short, long, help = "Service name")]
    name: String,

    #[arg(long, help = "Install machine-wide instead of for the current user")]
    system: bool,

    #[arg(short, long, help = "Command line to run, alternatively given after --")]
    cmd: Option<String>,

    #[arg(short, long, help = "Account the service runs as")]
    user: Option<String>,

    #[arg(long, help = "Home directory for user services")]
    home: Option<String>,

    #[arg(long, help = "Working directory of the service")]
    cwd: Option<String>,

    #[arg(short, long = "path", help = "Extra PATH entry, may be repeated")]
    path: Vec<String>,

    #[arg(short, long = "env", value_parser = parse_env, help = "Extra KEY=VALUE, may be repeated")]
    env: Vec<String>,

    #[arg(last = true)]
    command: Vec<String>,
}

impl ServiceArgs {
    pub fn options(&self) -> Result<InstallOptions> {
        let cmd = match (&self.cmd, self.command.is_empty()) {
            (Some(cmd), true) => cmd.clone(),
            (None, false) => self.command.join(" "),
            (Some(_), false) => bail!("Give the command either with --cmd or after --, not both"),
            (None, true) => bail!("No command given; use --cmd or pass it after --"),
        };
        if cmd.trim().is_empty() {
            bail!("Command cannot be empty");
        }
        Ok(InstallOptions {
            system: self.system,
            name: self.name.clone(),
            cmd,
            user: self.user.clone(),
            home: self.home.clone(),
            cwd: self.cwd.clone(),
            path: self.path.clone(),
            env: self.env.clone(),
        })
    }
}

fn parse_env(value: &str) -> Result<String, String> {
    if value.contains('=') {
        Ok(value.to_string())
    } else {
        Err(format!("'{value}' is not in KEY=VALUE form"))
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_outcome(path: Option<&Path>, steps: Option<&[ManualStep]>, done: &str) {
    match steps {
        None => {
            if let Some(path) = path {
                println!("{done} ({})", path.display());
            } else {
                println!("{done}");
            }
        }
        Some(steps) => {
            println!("Elevated privileges are needed; finish with these steps:\n");
            for (i, step) in steps.iter().enumerate() {
                println!("{}. {}", i + 1, step.text);
                if let Some(command) = &step.command {
                    println!("     {command}");
                }
            }
        }
    }
}
