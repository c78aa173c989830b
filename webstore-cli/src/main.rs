use std::io;
use std::path::PathBuf;

use clap::Parser;

use webstore_cli::open_storage;
use webstore_cli::settings::Settings;
use webstore_cli::shell::Shell;

/// Reads get/set/remove/clear commands from stdin against a session area
/// held in memory and a persistent area kept on disk.
#[derive(Debug, Parser)]
#[command(name = "webstore", version, about)]
struct Args {
    /// Configuration file, overrides WEBSTORE_CONFIG.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::new(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let app_name = env!("CARGO_PKG_NAME").replace('-', "_");
            let level = settings.logger.level.as_str();

            format!("{app_name}={level},webstore_core={level}").into()
        }))
        .init();

    let storage = open_storage(&settings)?;
    let mut shell = Shell::new(storage);

    shell.run(io::stdin().lock(), io::stdout().lock(), io::stderr().lock())
}
