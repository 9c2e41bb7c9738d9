use super::{
    ensure_absent, ensure_present, generated, remove_service_file, run_install_steps,
    write_service_file, Backend, Context,
};
use crate::environment::Environment;
use crate::error::Result;
use crate::{batch, InstallOptions, ServiceInstallResult, ServiceUninstallResult, UninstallOptions};
use std::path::{Path, PathBuf};

/// Services registered with the Service Control Manager through a batch
/// wrapper. Every `sc.exe` call goes through an elevation prompt.
pub struct Windows;

impl Windows {
    fn wrapper_path(env: &Environment, home: Option<&str>, name: &str) -> PathBuf {
        env.home_or(home)
            .join(".service")
            .join(format!("{}.bat", name))
    }
}

/// PowerShell arguments that run `sc.exe <arguments>` elevated and exit with
/// its status.
fn elevated_sc(arguments: &str) -> Vec<String> {
    vec![
        "-NoProfile".to_string(),
        "-Command".to_string(),
        format!(
            "$p = Start-Process -FilePath sc.exe -ArgumentList '{}' -Verb RunAs -Wait -PassThru; exit $p.ExitCode",
            arguments.replace('\'', "''")
        ),
    ]
}

fn create_arguments(name: &str, wrapper: &Path) -> String {
    format!(
        "create \"{}\" binPath= \"{}\" start= auto",
        name,
        wrapper.display()
    )
}

impl Backend for Windows {
    fn render(&self, options: &InstallOptions, env: &Environment) -> Result<String> {
        Ok(batch::generate_file(options, env))
    }

    fn install(
        &self,
        ctx: &Context<'_>,
        options: &InstallOptions,
        only_generate: bool,
    ) -> Result<ServiceInstallResult> {
        let name = options.name.as_str();
        let path = Self::wrapper_path(ctx.env, options.home.as_deref(), name);
        ensure_absent(name, &[&path])?;

        let content = self.render(options, ctx.env)?;
        if only_generate {
            return Ok(generated(content));
        }

        write_service_file(&path, &content)?;
        let args = elevated_sc(&create_arguments(name, &path));
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_install_steps(ctx, &path, &[("powershell.exe", args)], None)?;

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
        let path = Self::wrapper_path(ctx.env, options.home.as_deref(), name);
        ensure_present(name, &path)?;

        let stop = elevated_sc(&format!("stop \"{}\"", name));
        let stop: Vec<&str> = stop.iter().map(String::as_str).collect();
        ctx.run_lenient("powershell.exe", &stop);

        let delete = elevated_sc(&format!("delete \"{}\"", name));
        let delete: Vec<&str> = delete.iter().map(String::as_str).collect();
        ctx.run("powershell.exe", &delete)?;
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
        home: Option<&str>,
        name: &str,
    ) -> PathBuf {
        Self::wrapper_path(env, home, name)
    }
}
