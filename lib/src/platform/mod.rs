//! Backend managers, one per init system, and the helpers they share for
//! existence checks, writes, temp files and rollback.
mod launchd;
mod systemd;
mod sysvinit;
mod upstart;
mod windows;

pub use launchd::Launchd;
pub use systemd::Systemd;
pub use sysvinit::SysVInit;
pub use upstart::Upstart;
pub use windows::Windows;

use crate::environment::Environment;
use crate::error::{Result, ServiceError};
use crate::process::{CommandOutput, CommandRunner};
use crate::{InstallOptions, ServiceInstallResult, ServiceUninstallResult, UninstallOptions};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a backend needs from the outside world for one call.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub env: &'a Environment,
    pub runner: &'a dyn CommandRunner,
}

impl<'a> Context<'a> {
    pub fn new(env: &'a Environment, runner: &'a dyn CommandRunner) -> Self {
        Context { env, runner }
    }

    /// Runs a command, failing on a non-zero exit.
    pub fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        self.runner.run_checked(program, &owned(args))
    }

    /// Runs a command whose failure only deserves a warning.
    pub fn run_lenient(&self, program: &str, args: &[&str]) {
        match self.runner.run_checked(program, &owned(args)) {
            Ok(_) => {}
            Err(e) => warn!("{e}"),
        }
    }
}

/// The capability set every init system backend provides.
pub trait Backend: Send + Sync {
    fn render(&self, options: &InstallOptions, env: &Environment) -> Result<String>;

    /// Installs the service, or only renders it when `only_generate` is set.
    fn install(
        &self,
        ctx: &Context<'_>,
        options: &InstallOptions,
        only_generate: bool,
    ) -> Result<ServiceInstallResult>;

    fn uninstall(
        &self,
        ctx: &Context<'_>,
        options: &UninstallOptions,
    ) -> Result<ServiceUninstallResult>;

    /// Where the service file for `name` belongs on this host.
    fn target_path(
        &self,
        env: &Environment,
        system: bool,
        home: Option<&str>,
        name: &str,
    ) -> PathBuf;
}

/// A command followed by its arguments.
pub(crate) type Step<'a> = (&'a str, Vec<&'a str>);

/// Quotes `value` for a POSIX shell when it holds anything but plain path
/// characters.
pub(crate) fn quoted(value: impl std::fmt::Display) -> String {
    let value = value.to_string();
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+:,@=%".contains(c));
    if plain {
        value
    } else {
        format!("'{}'", value.replace('\'', "'\\''"))
    }
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}

pub(crate) fn ensure_absent<P: AsRef<Path>>(name: &str, paths: &[P]) -> Result<()> {
    for path in paths {
        let path = path.as_ref();
        if path.exists() {
            return Err(ServiceError::AlreadyExists {
                name: name.to_string(),
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

pub(crate) fn ensure_present(name: &str, path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ServiceError::NotFound {
            name: name.to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

pub(crate) fn generated(content: String) -> ServiceInstallResult {
    ServiceInstallResult {
        service_path: None,
        service_file_content: content,
        manual_steps: None,
    }
}

pub(crate) fn write_service_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ServiceError::io(format!("Failed to create {}", parent.display()), e)
        })?;
    }
    fs::write(path, content)
        .map_err(|e| ServiceError::io(format!("Failed to write {}", path.display()), e))?;
    info!(path = %path.display(), "wrote service file");
    Ok(())
}

/// Writes `content` to a file the caller can read later, for an operator to
/// copy into a privileged location.
pub(crate) fn write_temp_file(
    env: &Environment,
    name: &str,
    suffix: &str,
    content: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(&env.temp_dir).map_err(|e| {
        ServiceError::io(format!("Failed to create {}", env.temp_dir.display()), e)
    })?;
    let mut file = tempfile::Builder::new()
        .prefix(&format!("{name}-"))
        .suffix(suffix)
        .tempfile_in(&env.temp_dir)
        .map_err(|e| ServiceError::io("Failed to create temporary file", e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| ServiceError::io("Failed to write temporary file", e))?;
    let (_, path) = file
        .keep()
        .map_err(|e| ServiceError::io("Failed to keep temporary file", e.error))?;
    info!(path = %path.display(), "wrote service file to temporary location");
    Ok(path)
}

pub(crate) fn remove_service_file(path: &Path) -> Result<()> {
    fs::remove_file(path)
        .map_err(|e| ServiceError::io(format!("Failed to remove {}", path.display()), e))?;
    info!(path = %path.display(), "removed service file");
    Ok(())
}

/// Runs `steps` in order after `path` has been written. The first failing
/// step rolls the installation back and its error is returned.
pub(crate) fn run_install_steps(
    ctx: &Context<'_>,
    path: &Path,
    steps: &[Step<'_>],
    reload: Option<Step<'_>>,
) -> Result<()> {
    for (program, args) in steps {
        if let Err(e) = ctx.run(program, args) {
            rollback(ctx, path, reload.as_ref());
            return Err(e);
        }
    }
    Ok(())
}

/// Best effort undo of a failed install. Problems are logged, never returned.
pub(crate) fn rollback(ctx: &Context<'_>, path: &Path, reload: Option<&Step<'_>>) {
    warn!(path = %path.display(), "rolling back installation");
    if let Err(e) = remove_service_file(path) {
        warn!("rollback: {e}");
    }
    if let Some((program, args)) = reload {
        if let Err(e) = ctx.run(program, args) {
            warn!("rollback: {e}");
        }
    }
}
