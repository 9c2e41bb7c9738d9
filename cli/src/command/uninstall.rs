use anyhow::{Context, Result};
use clap::Args;
use servicelib::{ServiceManager, UninstallOptions};

use super::{print_json, print_outcome};

#[derive(Debug, Args)]
pub struct Uninstall {
    #[arg(short, long, help = "Service name")]
    name: String,

    #[arg(long, help = "Remove a machine-wide service")]
    system: bool,

    #[arg(long, help = "Home directory for user services")]
    home: Option<String>,

    #[arg(long, help = "Use this init system instead of detecting it")]
    force: Option<String>,
}

impl Uninstall {
    pub fn run(&self, manager: &ServiceManager, json: bool) -> Result<()> {
        let options = UninstallOptions {
            system: self.system,
            name: self.name.clone(),
            home: self.home.clone(),
        };
        let result = manager
            .uninstall(&options, self.force.as_deref())
            .with_context(|| format!("Failed to uninstall service '{}'", self.name))?;

        if json {
            return print_json(&result);
        }
        print_outcome(
            result.service_path.as_deref(),
            result.manual_steps.as_deref(),
            &format!("Service '{}' uninstalled", self.name),
        );
        Ok(())
    }
}
