//! CLI commands.

mod list;
mod reserve;
mod unreserve;
mod volumes;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::client::HttpTransport;
use crate::config::{Config, Endpoints};
use crate::logging::LogFormat;
use crate::output::{ConsolePrinter, OutputFormat};

/// Principal used when a command does not require one explicitly.
pub const DEFAULT_PRINCIPAL: &str = "my-principal";

/// resvctl - Manage dynamic reservations on Mesos agents.
#[derive(Debug, Parser)]
#[command(name = "resvctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Tsv)]
    format: OutputFormat,

    /// Cluster URL (overrides the config file).
    #[arg(long, global = true, env = "RESV_CLUSTER_URL")]
    cluster_url: Option<String>,

    /// ACS token sent with every request.
    #[arg(long, global = true, env = "RESV_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log debug details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log format for stderr diagnostics.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Reserve cpus and memory for a role.
    #[command(alias = "reserves")]
    Reserve(reserve::ReserveCommand),

    /// Unreserve labeled cpus, memory, and disk.
    #[command(alias = "unreserves")]
    Unreserve(unreserve::UnreserveCommand),

    /// Unreserve a single labeled reservation.
    UnreserveOne(unreserve::UnreserveOneCommand),

    /// Unreserve all resources of a role and principal.
    #[command(alias = "unreservesall")]
    UnreserveAll(unreserve::UnreserveAllCommand),

    /// Destroy a persistent volume.
    #[command(alias = "destroyvolume")]
    DestroyPersistVolume(volumes::DestroyVolumeCommand),

    /// List reserved resources on an agent.
    #[command(alias = "list-resources", alias = "listresources")]
    List(list::ListCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        self.run_with(Config::load).await
    }

    /// Run with a given config loader. The config is only loaded by
    /// commands that talk to the cluster.
    async fn run_with(self, load_config: impl FnOnce() -> Result<Config>) -> Result<()> {
        let Cli {
            format,
            cluster_url,
            token,
            command,
            ..
        } = self;

        let context = move || -> Result<CommandContext> {
            let config = load_config()?.with_overrides(cluster_url, token);
            Ok(CommandContext {
                endpoints: config.endpoints(),
                config,
                printer: ConsolePrinter::new(format),
            })
        };

        match command {
            Commands::Reserve(cmd) => cmd.run(context()?).await,
            Commands::Unreserve(cmd) => cmd.run(context()?).await,
            Commands::UnreserveOne(cmd) => cmd.run(context()?).await,
            Commands::UnreserveAll(cmd) => cmd.run(context()?).await,
            Commands::DestroyPersistVolume(cmd) => cmd.run(context()?).await,
            Commands::List(cmd) => cmd.run(context()?).await,
            Commands::Version => {
                println!("resvctl {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub endpoints: Endpoints,
    pub printer: ConsolePrinter,
}

impl CommandContext {
    /// Get an HTTP transport for the configured cluster.
    pub fn transport(&self) -> Result<HttpTransport> {
        HttpTransport::new(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_aliases_resolve() {
        let cli = Cli::try_parse_from([
            "resvctl",
            "unreservesall",
            "--agent-id",
            "a1",
            "--role",
            "r",
            "--principal",
            "ops",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::UnreserveAll(_)));

        let cli =
            Cli::try_parse_from(["resvctl", "list-resources", "--agent-id", "a1", "--role", "r"])
                .unwrap();
        assert!(matches!(cli.command, Commands::List(_)));
    }

    fn malformed_config() -> Result<Config> {
        Err(anyhow::anyhow!("Failed to parse config"))
    }

    #[tokio::test]
    async fn test_version_skips_config() {
        let cli = Cli::try_parse_from(["resvctl", "version"]).unwrap();
        assert!(cli.run_with(malformed_config).await.is_ok());
    }

    #[tokio::test]
    async fn test_config_error_fails_cluster_commands() {
        let cli =
            Cli::try_parse_from(["resvctl", "list", "--agent-id", "a1", "--role", "r"]).unwrap();
        let err = cli.run_with(malformed_config).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "resvctl",
            "--format",
            "json",
            "-v",
            "list",
            "--agent-id",
            "a1",
            "--role",
            "r",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
    }
}
