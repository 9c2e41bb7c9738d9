pub mod batch;
pub mod detect;
pub mod environment;
pub mod error;
pub mod manager;
pub mod platform;
pub mod plist;
pub mod process;
pub mod systemd;
pub mod sysvinit;
pub mod upstart;

#[cfg(test)]
pub(crate) mod testing;

use serde::Serialize;
use std::path::PathBuf;

pub use environment::{Environment, OsFamily};
pub use error::{Result, ServiceError};
pub use manager::{Registry, ServiceManager};
pub use process::{CommandOutput, CommandRunner, SystemRunner};

/// Suffix appended to the service name in human readable descriptions.
pub const DESCRIPTION_SUFFIX: &str = "(Deno Service)";

#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub system: bool,
    pub name: String,
    pub cmd: String,
    pub user: Option<String>,
    pub home: Option<String>,
    pub cwd: Option<String>,
    pub path: Vec<String>,
    pub env: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UninstallOptions {
    pub system: bool,
    pub name: String,
    pub home: Option<String>,
}

impl From<&InstallOptions> for UninstallOptions {
    fn from(options: &InstallOptions) -> Self {
        UninstallOptions {
            system: options.system,
            name: options.name.clone(),
            home: options.home.clone(),
        }
    }
}

/// One instruction the operator has to carry out by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualStep {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl ManualStep {
    pub fn new(text: impl Into<String>, command: impl Into<String>) -> Self {
        ManualStep {
            text: text.into(),
            command: Some(command.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstallResult {
    pub service_path: Option<PathBuf>,
    pub service_file_content: String,
    pub manual_steps: Option<Vec<ManualStep>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUninstallResult {
    pub service_path: Option<PathBuf>,
    pub manual_steps: Option<Vec<ManualStep>>,
}
