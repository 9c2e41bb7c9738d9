use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use servicelib::{Environment, Registry, ServiceManager, SystemRunner};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod command;

#[derive(Parser)]
#[command(name = "service")]
#[command(about = "Install any command as a system or user service")]
#[command(version)]
struct Cli {
    /// Print all executed commands to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Runtime executable services are launched with
    #[arg(long, global = true, env = "SERVICE_RUNTIME")]
    runtime: Option<PathBuf>,

    /// Arguments passed to the runtime to host a command as a Windows service
    #[arg(long, global = true, env = "SERVICE_WINDOWS_BRIDGE")]
    windows_bridge: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Install a command as a service")]
    Install(command::Install),
    #[command(about = "Uninstall a service")]
    #[command(alias = "remove")]
    Uninstall(command::Uninstall),
    #[command(about = "Generate the service file to stdout")]
    Generate(command::Generate),
    #[command(about = "Print the init system of this host")]
    Detect(command::Detect),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let env = Environment::detect(cli.runtime, cli.windows_bridge)
        .context("Failed to inspect the host environment")?;
    debug!(
        os = ?env.os,
        runtime = %env.runtime.display(),
        privileged = env.privileged,
        "host environment"
    );
    let manager = ServiceManager::new(Registry::builtin(), env, Box::new(SystemRunner));

    match cli.command {
        Commands::Install(install_cmd) => install_cmd.run(&manager, cli.json)?,
        Commands::Uninstall(uninstall_cmd) => uninstall_cmd.run(&manager, cli.json)?,
        Commands::Generate(generate_cmd) => generate_cmd.run(&manager, cli.json)?,
        Commands::Detect(detect_cmd) => detect_cmd.run(&manager)?,
    }
    Ok(())
}
