use anyhow::Result;
use clap::Args;
use servicelib::ServiceManager;

#[derive(Debug, Args)]
pub struct Detect {}

impl Detect {
    pub fn run(&self, manager: &ServiceManager) -> Result<()> {
        println!("{}", manager.detect()?);
        Ok(())
    }
}
