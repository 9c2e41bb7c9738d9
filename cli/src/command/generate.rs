use anyhow::{Context, Result};
use clap::Args;
use servicelib::ServiceManager;
use std::path::Path;
use tracing::debug;

use super::{print_json, ServiceArgs};

#[derive(Debug, Args)]
pub struct Generate {
    #[command(flatten)]
    service: ServiceArgs,

    #[arg(long, help = "Generate for this init system instead of the detected one")]
    force: Option<String>,
}

impl Generate {
    pub fn run(&self, manager: &ServiceManager, json: bool) -> Result<()> {
        let options = self.service.options()?;
        let backend = match &self.force {
            Some(id) => id.clone(),
            None => manager.detect().context("Failed to detect the init system")?,
        };
        debug!(backend = %backend, "generating service file");

        let result = manager
            .generate(&options, Some(&backend))
            .with_context(|| format!("Failed to generate service '{}'", options.name))?;

        if json {
            return print_json(&result);
        }
        print!("{}", result.service_file_content);
        if atty::is(atty::Stream::Stdout) {
            let path = manager.target_path(&options, Some(&backend))?;
            eprintln!("\n{}", suggested_path(&path));
        }
        Ok(())
    }
}

fn suggested_path(path: &Path) -> String {
    format!("{} is the suggested file path.", path.display())
}
