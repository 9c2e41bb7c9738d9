use super::{
    ensure_absent, ensure_present, generated, quoted, remove_service_file, run_install_steps,
    write_service_file, write_temp_file, Backend, Context,
};
use crate::environment::Environment;
use crate::error::Result;
use crate::{
    upstart, InstallOptions, ManualStep, ServiceInstallResult, ServiceUninstallResult,
    UninstallOptions,
};
use std::path::PathBuf;

pub struct Upstart;

impl Upstart {
    fn job_path(env: &Environment, name: &str) -> PathBuf {
        env.system_path(format!("/etc/init/{}.conf", name))
    }
}

impl Backend for Upstart {
    fn render(&self, options: &InstallOptions, env: &Environment) -> Result<String> {
        Ok(upstart::generate_file(options, env))
    }

    fn install(
        &self,
        ctx: &Context<'_>,
        options: &InstallOptions,
        only_generate: bool,
    ) -> Result<ServiceInstallResult> {
        let name = options.name.as_str();
        let path = Self::job_path(ctx.env, name);
        ensure_absent(name, &[&path])?;

        let content = self.render(options, ctx.env)?;
        if only_generate {
            return Ok(generated(content));
        }

        if !ctx.env.privileged {
            let temp_path = write_temp_file(ctx.env, name, ".conf", &content)?;
            let steps = vec![
                ManualStep::new(
                    "Copy the generated job into /etc/init",
                    format!(
                        "sudo cp {} {}",
                        quoted(temp_path.display()),
                        quoted(path.display())
                    ),
                ),
                ManualStep::new(
                    "Reload the upstart configuration",
                    "sudo initctl reload-configuration",
                ),
                ManualStep::new("Start the service", format!("sudo initctl start {}", quoted(name))),
            ];
            return Ok(ServiceInstallResult {
                service_path: Some(temp_path),
                service_file_content: content,
                manual_steps: Some(steps),
            });
        }

        write_service_file(&path, &content)?;
        run_install_steps(
            ctx,
            &path,
            &[
                ("initctl", vec!["reload-configuration"]),
                ("initctl", vec!["start", name]),
            ],
            Some(("initctl", vec!["reload-configuration"])),
        )?;

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
        let path = Self::job_path(ctx.env, name);
        ensure_present(name, &path)?;

        if !ctx.env.privileged {
            let steps = vec![
                ManualStep::new(
                    "Stop the service",
                    format!("sudo initctl stop {}", quoted(name)),
                ),
                ManualStep::new(
                    "Remove the job file",
                    format!("sudo rm {}", quoted(path.display())),
                ),
                ManualStep::new(
                    "Reload the upstart configuration",
                    "sudo initctl reload-configuration",
                ),
            ];
            return Ok(ServiceUninstallResult {
                service_path: Some(path),
                manual_steps: Some(steps),
            });
        }

        // initctl refuses to stop a job that is not running
        ctx.run_lenient("initctl", &["stop", name]);
        remove_service_file(&path)?;
        ctx.run("initctl", &["reload-configuration"])?;

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
        Self::job_path(env, name)
    }
}
