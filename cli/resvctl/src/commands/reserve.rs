//! Reserve command.

use anyhow::Result;
use clap::Args;
use resv_resources::ReserveRequest;

use crate::dispatcher::OperationDispatcher;

use super::{CommandContext, DEFAULT_PRINCIPAL};

/// Reserve cpus and memory for a role on one agent.
#[derive(Debug, Args)]
pub struct ReserveCommand {
    /// Agent ID to reserve on.
    #[arg(long)]
    agent_id: String,

    /// Role for the reservation.
    #[arg(long)]
    role: String,

    /// Principal for the reservation.
    #[arg(long, default_value = DEFAULT_PRINCIPAL)]
    principal: String,

    /// Amount of cpus to reserve.
    #[arg(long, default_value_t = 0.0)]
    cpus: f64,

    /// Amount of memory to reserve, in MB.
    #[arg(long, default_value_t = 0.0)]
    mem: f64,
}

impl ReserveCommand {
    fn request(&self) -> ReserveRequest {
        ReserveRequest {
            agent_id: self.agent_id.clone(),
            role: self.role.clone(),
            principal: self.principal.clone(),
            cpus: self.cpus,
            mem: self.mem,
        }
    }

    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let transport = ctx.transport()?;
        let dispatcher = OperationDispatcher::new(&transport, &ctx.endpoints, &ctx.printer);

        dispatcher.reserve(&self.request()).await?;
        Ok(())
    }
}
