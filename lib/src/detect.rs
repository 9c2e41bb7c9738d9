//! Init system detection. Nothing is cached, every call probes the host again.
use crate::environment::{Environment, OsFamily};
use crate::error::{Result, ServiceError};
use crate::process::CommandRunner;
use tracing::debug;

pub const SYSTEMD: &str = "systemd";
pub const SYSVINIT: &str = "sysvinit";
pub const DOCKER_INIT: &str = "docker-init";
pub const UPSTART: &str = "upstart";
pub const LAUNCHD: &str = "launchd";
pub const WINDOWS: &str = "windows";
/// Reported for OpenRC hosts; no backend handles it.
pub const OPENRC: &str = "openrc";
/// Reported when PID 1 is `docker-init`. The sysvinit backend is registered
/// under [`DOCKER_INIT`], so this identifier does not resolve.
pub const DOCKERINIT: &str = "dockerinit";

/// Returns the identifier of the init system managing this host.
pub fn detect(env: &Environment, runner: &dyn CommandRunner) -> Result<String> {
    match env.os {
        OsFamily::MacOs => return Ok(LAUNCHD.to_string()),
        OsFamily::Windows => return Ok(WINDOWS.to_string()),
        OsFamily::Linux | OsFamily::Other => {}
    }

    let args = ["-p", "1", "-o", "comm="].map(String::from);
    let output = runner.run("ps", &args).map_err(|e| {
        ServiceError::DetectionFailed(format!("could not inspect process 1: {e}"))
    })?;
    if !output.success() {
        return Err(ServiceError::DetectionFailed(format!(
            "could not read the command of process 1: {}",
            output.combined()
        )));
    }
    let comm = output.stdout.trim();
    debug!(pid1 = comm, "inspected process 1");

    if comm.contains("systemd") {
        Ok(SYSTEMD.to_string())
    } else if comm.contains("init") {
        if has_upstart(env) {
            Ok(UPSTART.to_string())
        } else {
            Ok(SYSVINIT.to_string())
        }
    } else if comm.contains("openrc") {
        Ok(OPENRC.to_string())
    } else if comm.contains("docker-init") {
        Ok(DOCKERINIT.to_string())
    } else {
        Err(ServiceError::DetectionFailed(format!(
            "process 1 is '{}'",
            comm
        )))
    }
}

fn has_upstart(env: &Environment) -> bool {
    env.system_path("/sbin/initctl").is_file() && env.system_path("/etc/init").is_dir()
}
