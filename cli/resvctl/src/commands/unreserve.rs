//! Unreserve commands.

use anyhow::Result;
use clap::Args;
use resv_resources::{ResourceKind, UnreserveOneRequest, UnreserveRequest};

use crate::agent::AgentStateReader;
use crate::dispatcher::OperationDispatcher;
use crate::engine;

use super::{CommandContext, DEFAULT_PRINCIPAL};

/// Unreserve labeled cpus, memory, and disk. Amounts of zero are left alone.
#[derive(Debug, Args)]
pub struct UnreserveCommand {
    /// Agent ID to unreserve on.
    #[arg(long)]
    agent_id: String,

    /// Role of the reservation.
    #[arg(long)]
    role: String,

    /// Principal of the reservation.
    #[arg(long, default_value = DEFAULT_PRINCIPAL)]
    principal: String,

    /// Framework ID label.
    #[arg(long, default_value = "")]
    framework_id: String,

    /// Amount of cpus to unreserve.
    #[arg(long, default_value_t = 0.0)]
    cpus: f64,

    /// Resource id of the cpus reservation.
    #[arg(long, default_value = "")]
    cpus_resource_id: String,

    /// Amount of memory to unreserve, in MB.
    #[arg(long, default_value_t = 0.0)]
    mem: f64,

    /// Resource id of the memory reservation.
    #[arg(long, default_value = "")]
    mem_resource_id: String,

    /// Amount of disk to unreserve, in MB.
    #[arg(long, default_value_t = 0.0)]
    disk: f64,

    /// Resource id of the disk reservation.
    #[arg(long, default_value = "")]
    disk_resource_id: String,
}

impl UnreserveCommand {
    fn request(&self) -> UnreserveRequest {
        UnreserveRequest {
            agent_id: self.agent_id.clone(),
            role: self.role.clone(),
            principal: self.principal.clone(),
            cpus: self.cpus,
            cpus_resource_id: self.cpus_resource_id.clone(),
            mem: self.mem,
            mem_resource_id: self.mem_resource_id.clone(),
            disk: self.disk,
            disk_resource_id: self.disk_resource_id.clone(),
            framework_id: self.framework_id.clone(),
        }
    }

    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let transport = ctx.transport()?;
        let dispatcher = OperationDispatcher::new(&transport, &ctx.endpoints, &ctx.printer);

        dispatcher.unreserve(&self.request()).await?;
        Ok(())
    }
}

/// Unreserve one labeled reservation of any scalar type.
#[derive(Debug, Args)]
pub struct UnreserveOneCommand {
    /// Agent ID to unreserve on.
    #[arg(long)]
    agent_id: String,

    /// Role of the reservation.
    #[arg(long)]
    role: String,

    /// Principal of the reservation.
    #[arg(long, default_value = DEFAULT_PRINCIPAL)]
    principal: String,

    /// Resource type (cpus, mem, disk, gpus, ...).
    #[arg(long = "type")]
    kind: String,

    /// Amount to unreserve.
    #[arg(long)]
    value: f64,

    /// Resource id of the reservation.
    #[arg(long)]
    resource_id: String,

    /// Framework ID label.
    #[arg(long, default_value = "")]
    framework_id: String,
}

impl UnreserveOneCommand {
    fn request(&self) -> UnreserveOneRequest {
        UnreserveOneRequest {
            agent_id: self.agent_id.clone(),
            role: self.role.clone(),
            principal: self.principal.clone(),
            kind: ResourceKind::from(self.kind.as_str()),
            value: self.value,
            resource_id: self.resource_id.clone(),
            framework_id: self.framework_id.clone(),
        }
    }

    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let transport = ctx.transport()?;
        let dispatcher = OperationDispatcher::new(&transport, &ctx.endpoints, &ctx.printer);

        dispatcher.unreserve_one(&self.request()).await?;
        Ok(())
    }
}

/// Unreserve every resource a role and principal hold on one agent,
/// destroying persistent volumes first.
#[derive(Debug, Args)]
pub struct UnreserveAllCommand {
    /// Agent ID to unreserve on.
    #[arg(long)]
    agent_id: String,

    /// Role to release.
    #[arg(long)]
    role: String,

    /// Principal whose reservations are released.
    #[arg(long)]
    principal: String,

    /// Print the plan without changing anything.
    #[arg(long)]
    dry_run: bool,
}

impl UnreserveAllCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let transport = ctx.transport()?;
        let reader = AgentStateReader::new(&transport, &ctx.endpoints);

        if self.dry_run {
            engine::unreserve_all_dry_run(
                &reader,
                &ctx.printer,
                &self.agent_id,
                &self.role,
                &self.principal,
            )
            .await?;
            return Ok(());
        }

        let dispatcher = OperationDispatcher::new(&transport, &ctx.endpoints, &ctx.printer);
        engine::unreserve_all(
            &reader,
            &dispatcher,
            &ctx.printer,
            &self.agent_id,
            &self.role,
            &self.principal,
        )
        .await?;
        Ok(())
    }
}
