//! Frost CLI - forecast minimum temperature and frost risk from a daily history.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "frost-cli",
    version,
    about = "Frost risk forecasting for Madrid, Cundinamarca"
)]
struct Cli {
    #[command(subcommand)]
    command: frost_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("[Frost] cli: starting");
    frost_cmd::run(cli.command)
}
