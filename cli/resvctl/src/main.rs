//! resvctl - CLI for dynamic reservations on Mesos agents.
//!
//! Reserves and releases cpus, memory, and disk for a role, destroys
//! persistent volumes, and tears down everything a role holds on an agent.

use anyhow::Result;
use clap::Parser;

mod agent;
mod client;
mod commands;
mod config;
mod dispatcher;
mod engine;
mod error;
mod logging;
mod output;
#[cfg(test)]
mod testing;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.log_format);

    if let Err(e) = cli.run().await {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
