use super::{
    ensure_absent, ensure_present, generated, quoted, remove_service_file, run_install_steps,
    write_service_file, write_temp_file, Backend, Context,
};
use crate::environment::Environment;
use crate::error::Result;
use crate::{
    plist, InstallOptions, ManualStep, ServiceInstallResult, ServiceUninstallResult,
    UninstallOptions,
};
use std::path::PathBuf;

pub struct Launchd;

impl Launchd {
    fn agent_path(env: &Environment, home: Option<&str>, name: &str) -> PathBuf {
        env.home_or(home)
            .join("Library/LaunchAgents")
            .join(format!("{}.plist", name))
    }

    fn daemon_path(env: &Environment, name: &str) -> PathBuf {
        env.system_path(format!("/Library/LaunchDaemons/{}.plist", name))
    }
}

impl Backend for Launchd {
    fn render(&self, options: &InstallOptions, env: &Environment) -> Result<String> {
        plist::generate_file(options, env)
    }

    fn install(
        &self,
        ctx: &Context<'_>,
        options: &InstallOptions,
        only_generate: bool,
    ) -> Result<ServiceInstallResult> {
        let name = options.name.as_str();
        let agent_path = Self::agent_path(ctx.env, options.home.as_deref(), name);
        let daemon_path = Self::daemon_path(ctx.env, name);
        ensure_absent(name, &[&agent_path, &daemon_path])?;

        let content = self.render(options, ctx.env)?;
        if only_generate {
            return Ok(generated(content));
        }

        if options.system {
            let temp_path = write_temp_file(ctx.env, name, ".plist", &content)?;
            let target = quoted(daemon_path.display());
            let steps = vec![
                ManualStep::new(
                    "Copy the generated property list into /Library/LaunchDaemons",
                    format!("sudo cp {} {}", quoted(temp_path.display()), target),
                ),
                ManualStep::new(
                    "Hand the file to root",
                    format!("sudo chown root:wheel {}", target),
                ),
                ManualStep::new(
                    "Load the daemon",
                    format!("sudo launchctl load {}", target),
                ),
            ];
            return Ok(ServiceInstallResult {
                service_path: Some(temp_path),
                service_file_content: content,
                manual_steps: Some(steps),
            });
        }

        write_service_file(&agent_path, &content)?;
        let agent = agent_path.display().to_string();
        run_install_steps(ctx, &agent_path, &[("launchctl", vec!["load", agent.as_str()])], None)?;

        Ok(ServiceInstallResult {
            service_path: Some(agent_path),
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
            let path = Self::daemon_path(ctx.env, name);
            ensure_present(name, &path)?;
            let target = quoted(path.display());
            let steps = vec![
                ManualStep::new(
                    "Unload the daemon",
                    format!("sudo launchctl unload {}", target),
                ),
                ManualStep::new(
                    "Remove the property list",
                    format!("sudo rm {}", target),
                ),
            ];
            return Ok(ServiceUninstallResult {
                service_path: Some(path),
                manual_steps: Some(steps),
            });
        }

        let path = Self::agent_path(ctx.env, options.home.as_deref(), name);
        ensure_present(name, &path)?;
        let agent = path.display().to_string();
        ctx.run("launchctl", &["unload", agent.as_str()])?;
        remove_service_file(&path)?;

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
            Self::daemon_path(env, name)
        } else {
            Self::agent_path(env, home, name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::testing::{options, sandbox, RecordingRunner};
    use std::fs;

    #[test]
    fn existing_daemon_blocks_agent_install() {
        let (_dir, env) = sandbox();
        let daemon = env.system_path("/Library/LaunchDaemons/com.example.app.plist");
        fs::create_dir_all(daemon.parent().unwrap()).unwrap();
        fs::write(&daemon, "").unwrap();
        let runner = RecordingRunner::new();

        let err = Launchd
            .install(
                &Context::new(&env, &runner),
                &options("com.example.app", "app"),
                false,
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists { ref path, .. } if *path == daemon));
        assert!(!env.home.join("Library/LaunchAgents").exists());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn agent_round_trip() {
        let (_dir, env) = sandbox();
        let runner = RecordingRunner::new();
        let ctx = Context::new(&env, &runner);
        let opts = options("com.example.app", "deno run app.ts");

        let installed = Launchd.install(&ctx, &opts, false).unwrap();
        let path = env.home.join("Library/LaunchAgents/com.example.app.plist");
        assert_eq!(installed.service_path.as_deref(), Some(path.as_path()));
        assert!(path.exists());

        let removed = Launchd.uninstall(&ctx, &(&opts).into()).unwrap();
        assert_eq!(removed.service_path.as_deref(), Some(path.as_path()));
        assert!(!path.exists());
        assert_eq!(
            runner.calls(),
            [
                format!("launchctl load {}", path.display()),
                format!("launchctl unload {}", path.display()),
            ]
        );
    }

    #[test]
    fn failed_load_removes_agent() {
        let (_dir, env) = sandbox();
        let runner = RecordingRunner::new().fail("launchctl load", 5, "Input/output error");
        let err = Launchd
            .install(
                &Context::new(&env, &runner),
                &options("com.example.app", "app"),
                false,
            )
            .unwrap_err();
        assert!(err.to_string().contains("Input/output error"));
        assert!(!env
            .home
            .join("Library/LaunchAgents/com.example.app.plist")
            .exists());
    }

    #[test]
    fn daemon_install_is_manual() {
        let (_dir, env) = sandbox();
        let runner = RecordingRunner::new();
        let mut opts = options("com.example.app", "app");
        opts.system = true;
        let result = Launchd
            .install(&Context::new(&env, &runner), &opts, false)
            .unwrap();
        let steps = result.manual_steps.unwrap();
        assert!(steps
            .last()
            .and_then(|s| s.command.as_deref())
            .unwrap()
            .starts_with("sudo launchctl load "));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn manual_steps_quote_paths_with_spaces() {
        let (_dir, mut env) = sandbox();
        env.temp_dir = env.root.join("my tmp");
        let mut opts = options("com.example.app", "app");
        opts.system = true;
        let result = Launchd
            .install(&Context::new(&env, &RecordingRunner::new()), &opts, false)
            .unwrap();
        let temp = result.service_path.unwrap();
        let steps = result.manual_steps.unwrap();
        assert_eq!(
            steps[0].command.as_deref(),
            Some(
                format!(
                    "sudo cp '{}' {}",
                    temp.display(),
                    env.system_path("/Library/LaunchDaemons/com.example.app.plist").display()
                )
                .as_str()
            )
        );
    }
}
