use super::{
    ensure_absent, ensure_present, generated, quoted, remove_service_file, run_install_steps,
    write_service_file, write_temp_file, Backend, Context,
};
use crate::environment::Environment;
use crate::error::{Result, ServiceError};
use crate::{
    systemd, InstallOptions, ManualStep, ServiceInstallResult, ServiceUninstallResult,
    UninstallOptions,
};
use std::path::PathBuf;
use tracing::{info, warn};

pub struct Systemd;

impl Systemd {
    fn user_path(env: &Environment, home: Option<&str>, name: &str) -> PathBuf {
        env.home_or(home)
            .join(".config/systemd/user")
            .join(format!("{}.service", name))
    }

    fn system_path(env: &Environment, name: &str) -> PathBuf {
        env.system_path(format!("/etc/systemd/system/{}.service", name))
    }

    fn check_active(ctx: &Context<'_>, name: &str) {
        let args = vec!["--user".to_string(), "is-active".to_string(), name.to_string()];
        match ctx.runner.run("systemctl", &args) {
            Ok(output) if output.success() => info!(service = name, "service is active"),
            Ok(output) => warn!(
                service = name,
                state = output.stdout.trim(),
                "service was installed but is not active"
            ),
            Err(e) => warn!(service = name, "could not query service state: {e}"),
        }
    }
}

impl Backend for Systemd {
    fn render(&self, options: &InstallOptions, env: &Environment) -> Result<String> {
        Ok(systemd::generate_file(options, env))
    }

    fn install(
        &self,
        ctx: &Context<'_>,
        options: &InstallOptions,
        only_generate: bool,
    ) -> Result<ServiceInstallResult> {
        let name = options.name.as_str();
        let user_path = Self::user_path(ctx.env, options.home.as_deref(), name);
        let system_path = Self::system_path(ctx.env, name);
        ensure_absent(name, &[&user_path, &system_path])?;

        let content = self.render(options, ctx.env)?;
        if only_generate {
            return Ok(generated(content));
        }

        if options.system {
            let temp_path = write_temp_file(ctx.env, name, ".service", &content)?;
            let steps = vec![
                ManualStep::new(
                    "Copy the generated unit into the systemd system directory",
                    format!(
                        "sudo cp {} {}",
                        quoted(temp_path.display()),
                        quoted(system_path.display())
                    ),
                ),
                ManualStep::new(
                    "Reload the systemd configuration",
                    "sudo systemctl daemon-reload",
                ),
                ManualStep::new(
                    "Enable the service at boot",
                    format!("sudo systemctl enable {}", quoted(name)),
                ),
                ManualStep::new(
                    "Start the service",
                    format!("sudo systemctl start {}", quoted(name)),
                ),
            ];
            return Ok(ServiceInstallResult {
                service_path: Some(temp_path),
                service_file_content: content,
                manual_steps: Some(steps),
            });
        }

        let user = options.user.as_deref().ok_or(ServiceError::MissingOption {
            field: "user",
            reason: "user services need lingering enabled for a named account",
        })?;
        ctx.run("loginctl", &["enable-linger", user])?;

        write_service_file(&user_path, &content)?;
        run_install_steps(
            ctx,
            &user_path,
            &[
                ("systemctl", vec!["--user", "daemon-reload"]),
                ("systemctl", vec!["--user", "enable", name]),
                ("systemctl", vec!["--user", "start", name]),
            ],
            Some(("systemctl", vec!["--user", "daemon-reload"])),
        )?;
        Self::check_active(ctx, name);

        Ok(ServiceInstallResult {
            service_path: Some(user_path),
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

        if options.system {
            let path = Self::system_path(ctx.env, name);
            ensure_present(name, &path)?;
            let steps = vec![
                ManualStep::new(
                    "Stop the service",
                    format!("sudo systemctl stop {}", quoted(name)),
                ),
                ManualStep::new(
                    "Disable the service",
                    format!("sudo systemctl disable {}", quoted(name)),
                ),
                ManualStep::new(
                    "Remove the unit file",
                    format!("sudo rm {}", quoted(path.display())),
                ),
                ManualStep::new(
                    "Reload the systemd configuration",
                    "sudo systemctl daemon-reload",
                ),
            ];
            return Ok(ServiceUninstallResult {
                service_path: Some(path),
                manual_steps: Some(steps),
            });
        }

        let path = Self::user_path(ctx.env, options.home.as_deref(), name);
        ensure_present(name, &path)?;
        ctx.run("systemctl", &["--user", "stop", name])?;
        ctx.run("systemctl", &["--user", "disable", name])?;
        remove_service_file(&path)?;
        ctx.run("systemctl", &["--user", "daemon-reload"])?;

        Ok(ServiceUninstallResult {
            service_path: Some(path),
            manual_steps: None,
        })
    }

    fn target_path(
        &self,
        env: &Environment,
        system: bool,
        home: Option<&str>,
        name: &str,
    ) -> PathBuf {
        if system {
            Self::system_path(env, name)
        } else {
            Self::user_path(env, home, name)
        }
    }
}
