//! List command.

use anyhow::Result;
use clap::Args;

use crate::agent::AgentStateReader;
use crate::engine;

use super::CommandContext;

/// List a role's reserved resources and the resources its executors use.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Agent ID to list.
    #[arg(long)]
    agent_id: String,

    /// Role to list.
    #[arg(long)]
    role: String,
}

impl ListCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let transport = ctx.transport()?;
        let reader = AgentStateReader::new(&transport, &ctx.endpoints);

        engine::list_resources(&reader, &ctx.printer, &self.agent_id, &self.role).await?;
        Ok(())
    }
}
