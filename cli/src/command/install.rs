use anyhow::{Context, Result};
use clap::Args;
use servicelib::ServiceManager;

use super::{print_json, print_outcome, ServiceArgs};

#[derive(Debug, Args)]
pub struct Install {
    #[command(flatten)]
    service: ServiceArgs,
}

impl Install {
    pub fn run(&self, manager: &ServiceManager, json: bool) -> Result<()> {
        let options = self.service.options()?;
        let result = manager
            .install(&options)
            .with_context(|| format!("Failed to install service '{}'", options.name))?;

        if json {
            return print_json(&result);
        }
        print_outcome(
            result.service_path.as_deref(),
            result.manual_steps.as_deref(),
            &format!("Service '{}' installed", options.name),
        );
        Ok(())
    }
}
