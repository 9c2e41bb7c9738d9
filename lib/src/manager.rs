use crate::detect::{self, DOCKER_INIT, LAUNCHD, SYSTEMD, SYSVINIT, UPSTART, WINDOWS};
use crate::environment::Environment;
use crate::error::{Result, ServiceError};
use crate::platform::{Backend, Context, Launchd, SysVInit, Systemd, Upstart, Windows};
use crate::process::CommandRunner;
use crate::{InstallOptions, ServiceInstallResult, ServiceUninstallResult, UninstallOptions};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Backends keyed by init system identifier.
#[derive(Default, Clone)]
pub struct Registry {
    backends: BTreeMap<String, Arc<dyn Backend>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in backends. `sysvinit` and `docker-init` share one instance.
    pub fn builtin() -> Self {
        let sysvinit: Arc<dyn Backend> = Arc::new(SysVInit);
        let mut registry = Self::new();
        registry.register(SYSTEMD, Arc::new(Systemd));
        registry.register(SYSVINIT, sysvinit.clone());
        registry.register(DOCKER_INIT, sysvinit);
        registry.register(UPSTART, Arc::new(Upstart));
        registry.register(LAUNCHD, Arc::new(Launchd));
        registry.register(WINDOWS, Arc::new(Windows));
        registry
    }

    pub fn register(&mut self, id: impl Into<String>, backend: Arc<dyn Backend>) {
        self.backends.insert(id.into(), backend);
    }

    pub fn get(&self, id: &str) -> Result<&dyn Backend> {
        self.backends
            .get(id)
            .map(|backend| backend.as_ref())
            .ok_or_else(|| ServiceError::UnsupportedInitSystem(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }
}

/// Entry point used by the CLI: resolves a backend and delegates to it.
pub struct ServiceManager {
    registry: Registry,
    env: Environment,
    runner: Box<dyn CommandRunner>,
}

impl ServiceManager {
    pub fn new(registry: Registry, env: Environment, runner: Box<dyn CommandRunner>) -> Self {
        ServiceManager {
            registry,
            env,
            runner,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn detect(&self) -> Result<String> {
        detect::detect(&self.env, self.runner.as_ref())
    }

    fn context(&self) -> Context<'_> {
        Context::new(&self.env, self.runner.as_ref())
    }

    fn resolve(&self, force: Option<&str>) -> Result<(String, &dyn Backend)> {
        let id = match force {
            Some(id) => id.to_string(),
            None => self.detect()?,
        };
        let backend = self.registry.get(&id)?;
        Ok((id, backend))
    }

    /// Installs against the detected init system. Installing never honours a
    /// forced backend.
    pub fn install(&self, options: &InstallOptions) -> Result<ServiceInstallResult> {
        require_name(&options.name)?;
        let (id, backend) = self.resolve(None)?;
        info!(backend = %id, service = %options.name, "installing service");
        backend.install(&self.context(), options, false)
    }

    /// Renders the service file without touching the system.
    pub fn generate(
        &self,
        options: &InstallOptions,
        force: Option<&str>,
    ) -> Result<ServiceInstallResult> {
        require_name(&options.name)?;
        let (id, backend) = self.resolve(force)?;
        info!(backend = %id, service = %options.name, "generating service file");
        backend.install(&self.context(), options, true)
    }

    /// Where the service file for `options` would be installed.
    pub fn target_path(&self, options: &InstallOptions, force: Option<&str>) -> Result<PathBuf> {
        require_name(&options.name)?;
        let (_, backend) = self.resolve(force)?;
        Ok(backend.target_path(
            &self.env,
            options.system,
            options.home.as_deref(),
            &options.name,
        ))
    }

    pub fn uninstall(
        &self,
        options: &UninstallOptions,
        force: Option<&str>,
    ) -> Result<ServiceUninstallResult> {
        require_name(&options.name)?;
        let (id, backend) = self.resolve(force)?;
        info!(backend = %id, service = %options.name, "uninstalling service");
        backend.uninstall(&self.context(), options)
    }
}

fn require_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ServiceError::MissingOption {
            field: "name",
            reason: "a service needs a name",
        });
    }
    Ok(())
}
