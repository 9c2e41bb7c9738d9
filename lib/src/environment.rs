//! Snapshot of the host the core runs on: OS family, identity, directories and
//! the runtime binary that services are launched with.
use crate::error::{Result, ServiceError};
use std::path::{Component, Path, PathBuf};

/// Arguments handed to the runtime in the Windows wrapper so it can host the
/// command inside the Service Control Manager.
pub const DEFAULT_WINDOWS_BRIDGE: &str = "run -A --allow-ffi --unstable-ffi service-bridge.ts";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl OsFamily {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "linux" => OsFamily::Linux,
            "macos" => OsFamily::MacOs,
            "windows" => OsFamily::Windows,
            _ => OsFamily::Other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Environment {
    pub os: OsFamily,
    /// Prefix for absolute system paths such as `/etc/systemd/system`.
    pub root: PathBuf,
    pub home: PathBuf,
    pub cwd: PathBuf,
    pub user: Option<String>,
    /// Whether the process may write system locations itself.
    pub privileged: bool,
    pub temp_dir: PathBuf,
    pub runtime: PathBuf,
    pub windows_bridge: String,
}

impl Environment {
    /// Captures the current process' view of the host.
    ///
    /// `runtime` overrides the executable services are started with. Without
    /// it, `deno` is looked up on `PATH` and the current executable is the
    /// last resort.
    pub fn detect(runtime: Option<PathBuf>, windows_bridge: Option<String>) -> Result<Self> {
        let home = dirs::home_dir().ok_or(ServiceError::MissingOption {
            field: "home",
            reason: "the home directory of the current user could not be determined",
        })?;
        let cwd = std::env::current_dir()
            .map_err(|e| ServiceError::io("Failed to read current directory", e))?;
        let runtime = match runtime {
            Some(path) => path,
            None => match which::which("deno") {
                Ok(path) => path,
                Err(_) => std::env::current_exe()
                    .map_err(|e| ServiceError::io("Failed to resolve current executable", e))?,
            },
        };

        Ok(Environment {
            os: OsFamily::current(),
            root: PathBuf::from("/"),
            home,
            cwd,
            user: current_user(),
            privileged: is_root(),
            temp_dir: std::env::temp_dir(),
            runtime,
            windows_bridge: windows_bridge.unwrap_or_else(|| DEFAULT_WINDOWS_BRIDGE.to_string()),
        })
    }

    /// Maps an absolute system path onto [`Environment::root`].
    pub fn system_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let mut resolved = self.root.clone();
        for component in path.as_ref().components() {
            if let Component::Normal(part) = component {
                resolved.push(part);
            }
        }
        resolved
    }

    /// Directory containing the runtime binary, appended to every service PATH.
    pub fn runtime_dir(&self) -> PathBuf {
        self.runtime
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    pub fn home_or(&self, home: Option<&str>) -> PathBuf {
        home.map(PathBuf::from).unwrap_or_else(|| self.home.clone())
    }

    pub fn cwd_or(&self, cwd: Option<&str>) -> String {
        cwd.map(str::to_string)
            .unwrap_or_else(|| self.cwd.display().to_string())
    }

    /// Caller supplied PATH entries followed by the runtime directory.
    pub fn service_path_var(&self, extra: &[String], separator: char) -> String {
        let mut entries: Vec<String> = extra.to_vec();
        entries.push(self.runtime_dir().display().to_string());
        entries.join(&separator.to_string())
    }
}

fn current_user() -> Option<String> {
    #[cfg(unix)]
    {
        if let Ok(Some(user)) = nix::unistd::User::from_uid(nix::unistd::geteuid()) {
            return Some(user.name);
        }
    }
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|name| !name.is_empty())
}

fn is_root() -> bool {
    #[cfg(unix)]
    {
        nix::unistd::geteuid().is_root()
    }
    #[cfg(not(unix))]
    {
        false
    }
}
