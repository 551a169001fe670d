//! Persistent volume commands.

use anyhow::Result;
use clap::Args;
use resv_resources::DestroyVolumeRequest;
use tracing::warn;

use crate::dispatcher::OperationDispatcher;

use super::{CommandContext, DEFAULT_PRINCIPAL};

/// Destroy one persistent volume. The disk reservation backing it stays in
/// place; release it with `unreserve`.
#[derive(Debug, Args)]
pub struct DestroyVolumeCommand {
    /// Agent ID holding the volume.
    #[arg(long)]
    agent_id: String,

    /// Role of the disk reservation.
    #[arg(long)]
    role: String,

    /// Principal of the disk reservation.
    #[arg(long, default_value = DEFAULT_PRINCIPAL)]
    principal: String,

    /// Framework ID label.
    #[arg(long, default_value = "")]
    framework_id: String,

    /// Size of the disk reservation, in MB.
    #[arg(long, default_value_t = 0.0)]
    disk: f64,

    /// Resource id of the disk reservation.
    #[arg(long, default_value = "")]
    disk_resource_id: String,

    /// Persistence id of the volume.
    #[arg(long, default_value = "")]
    disk_persist_id: String,

    /// Container path of the volume.
    #[arg(long, default_value = "")]
    container_path: String,

    /// Host path of the volume. Accepted but not sent.
    #[arg(long)]
    host_path: Option<String>,
}

impl DestroyVolumeCommand {
    fn request(&self) -> DestroyVolumeRequest {
        DestroyVolumeRequest {
            agent_id: self.agent_id.clone(),
            role: self.role.clone(),
            principal: self.principal.clone(),
            disk: self.disk,
            resource_id: self.disk_resource_id.clone(),
            framework_id: self.framework_id.clone(),
            persistence_id: self.disk_persist_id.clone(),
            container_path: self.container_path.clone(),
            host_path: self.host_path.clone(),
        }
    }

    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        if let Some(host_path) = &self.host_path {
            warn!(host_path = %host_path, "--host-path is not sent to the master");
        }

        let transport = ctx.transport()?;
        let dispatcher = OperationDispatcher::new(&transport, &ctx.endpoints, &ctx.printer);

        dispatcher.destroy_volume(&self.request()).await?;
        Ok(())
    }
}
