use super::{
    ensure_absent, ensure_present, generated, quoted, remove_service_file, rollback,
    run_install_steps, write_service_file, write_temp_file, Backend, Context,
};
use crate::environment::Environment;
use crate::error::{Result, ServiceError};
use crate::{
    sysvinit, InstallOptions, ManualStep, ServiceInstallResult, ServiceUninstallResult,
    UninstallOptions,
};
use std::path::{Path, PathBuf};
use tracing::info;

const UPDATE_RC_D: &str = "/usr/sbin/update-rc.d";

/// Init scripts under `/etc/init.d`. Also serves containers started through
/// `docker-init`, where `update-rc.d` is usually absent.
pub struct SysVInit;

impl SysVInit {
    fn script_path(env: &Environment, name: &str) -> PathBuf {
        env.system_path(format!("/etc/init.d/{}", name))
    }

    fn has_update_rc_d(env: &Environment) -> bool {
        env.system_path(UPDATE_RC_D).is_file()
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .map_err(|e| ServiceError::io(format!("Failed to chmod {}", path.display()), e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

impl Backend for SysVInit {
    fn render(&self, options: &InstallOptions, env: &Environment) -> Result<String> {
        Ok(sysvinit::generate_file(options, env))
    }

    fn install(
        &self,
        ctx: &Context<'_>,
        options: &InstallOptions,
        only_generate: bool,
    ) -> Result<ServiceInstallResult> {
        let name = options.name.as_str();
        let path = Self::script_path(ctx.env, name);
        ensure_absent(name, &[&path])?;

        let content = self.render(options, ctx.env)?;
        if only_generate {
            return Ok(generated(content));
        }

        let script = path.display().to_string();
        if !ctx.env.privileged {
            let temp_path = write_temp_file(ctx.env, name, ".sh", &content)?;
            let target = quoted(&script);
            let steps = vec![
                ManualStep::new(
                    "Copy the generated script into /etc/init.d",
                    format!("sudo cp {} {}", quoted(temp_path.display()), target),
                ),
                ManualStep::new("Make the script executable", format!("sudo chmod +x {}", target)),
                ManualStep::new(
                    "Register the script for the default runlevels",
                    format!("sudo update-rc.d {} defaults", quoted(name)),
                ),
                ManualStep::new("Start the service", format!("sudo {} start", target)),
            ];
            return Ok(ServiceInstallResult {
                service_path: Some(temp_path),
                service_file_content: content,
                manual_steps: Some(steps),
            });
        }

        write_service_file(&path, &content)?;
        if let Err(e) = make_executable(&path) {
            rollback(ctx, &path, None);
            return Err(e);
        }

        let mut steps = Vec::new();
        let mut undo = None;
        if Self::has_update_rc_d(ctx.env) {
            steps.push(("update-rc.d", vec![name, "defaults"]));
            undo = Some(("update-rc.d", vec!["-f", name, "remove"]));
        } else {
            info!("update-rc.d not available, service will not start at boot");
        }
        steps.push((script.as_str(), vec!["start"]));
        run_install_steps(ctx, &path, &steps, undo)?;

        Ok(ServiceInstallResult {
            service_path: Some(path),
            service_file_content: content,
            manual_steps: None,
        })
    }

    fn uninstall(
        &self,
        ctx: &Context<'_>,
        options: &UninstallOptions,
    ) -> Result<ServiceUninstallResult> {
        let name = options.name.as_str();
        let path = Self::script_path(ctx.env, name);
        ensure_present(name, &path)?;
        let script = path.display().to_string();

        if !ctx.env.privileged {
            let target = quoted(&script);
            let steps = vec![
                ManualStep::new("Stop the service", format!("sudo {} stop", target)),
                ManualStep::new(
                    "Remove the runlevel links",
                    format!("sudo update-rc.d -f {} remove", quoted(name)),
                ),
                ManualStep::new("Remove the init script", format!("sudo rm {}", target)),
            ];
            return Ok(ServiceUninstallResult {
                service_path: Some(path),
                manual_steps: Some(steps),
            });
        }

        ctx.run(&script, &["stop"])?;
        if Self::has_update_rc_d(ctx.env) {
            ctx.run("update-rc.d", &["-f", name, "remove"])?;
        }
        remove_service_file(&path)?;

        Ok(ServiceUninstallResult {
            service_path: Some(path),
            manual_steps: None,
        })
    }

    fn target_path(
        &self,
        env: &Environment,
        _system: bool,
        _home: Option<&str>,
        name: &str,
    ) -> PathBuf {
        Self::script_path(env, name)
    }
}
