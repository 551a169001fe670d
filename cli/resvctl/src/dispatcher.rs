//! Operation dispatcher.
//!
//! Sends reserve, unreserve, and destroy-volume calls to the master. One
//! request per operation, no retries; an error from the transport is returned
//! as is. Success means the master accepted the HTTP exchange, the response
//! body is not inspected.

use async_trait::async_trait;
use bytes::Bytes;
use resv_reconcile::ReservationOps;
use resv_resources::{
    DestroyVolumeRequest, MasterCall, ReserveRequest, ResourceDescriptor, UnreserveOneRequest,
    UnreserveRequest,
};
use tracing::{debug, info};

use crate::client::Transport;
use crate::config::Endpoints;
use crate::error::ResvError;
use crate::output::Printer;

/// Dispatches master operations for one command invocation.
pub struct OperationDispatcher<'a> {
    transport: &'a dyn Transport,
    endpoints: &'a Endpoints,
    printer: &'a dyn Printer,
}

impl<'a> OperationDispatcher<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        endpoints: &'a Endpoints,
        printer: &'a dyn Printer,
    ) -> Self {
        Self {
            transport,
            endpoints,
            printer,
        }
    }

    /// Reserve cpus and memory.
    pub async fn reserve(&self, request: &ReserveRequest) -> Result<(), ResvError> {
        info!(
            agent_id = %request.agent_id,
            role = %request.role,
            principal = %request.principal,
            cpus = request.cpus,
            mem = request.mem,
            "Reserving resources"
        );
        self.send(&request.to_call()).await?;
        self.printer.message("Reservation is successful.");
        Ok(())
    }

    /// Unreserve the labeled cpus, memory, and disk amounts that are positive.
    pub async fn unreserve(&self, request: &UnreserveRequest) -> Result<(), ResvError> {
        info!(
            agent_id = %request.agent_id,
            role = %request.role,
            principal = %request.principal,
            "Unreserving resources"
        );
        self.send(&request.to_call()).await?;
        self.printer.message("Unreservation is successful.");
        Ok(())
    }

    /// Unreserve one labeled reservation.
    pub async fn unreserve_one(&self, request: &UnreserveOneRequest) -> Result<(), ResvError> {
        info!(
            agent_id = %request.agent_id,
            role = %request.role,
            resource = %request.kind,
            resource_id = %request.resource_id,
            "Unreserving resource"
        );
        self.send(&request.to_call()).await?;
        self.printer.message("Unreservation is successful.");
        Ok(())
    }

    /// Unreserve descriptors as the agent reported them.
    pub async fn unreserve_raw(
        &self,
        agent_id: &str,
        resources: &[ResourceDescriptor],
    ) -> Result<(), ResvError> {
        info!(agent_id, count = resources.len(), "Unreserving reported resources");
        self.send(&MasterCall::unreserve(agent_id, resources.to_vec()))
            .await?;
        self.printer.message("Unreservation is successful.");
        Ok(())
    }

    /// Destroy one persistent volume.
    pub async fn destroy_volume(&self, request: &DestroyVolumeRequest) -> Result<(), ResvError> {
        info!(
            agent_id = %request.agent_id,
            role = %request.role,
            persistence_id = %request.persistence_id,
            resource_id = %request.resource_id,
            "Destroying persistent volume"
        );
        self.send(&request.to_call()).await?;
        self.printer
            .message("Persistence Volume is successfully removed.");
        Ok(())
    }

    async fn send(&self, call: &MasterCall) -> Result<Bytes, ResvError> {
        debug!(
            call = %call.call_type,
            operands = call.operands().len(),
            "Sending master call"
        );
        let body = serde_json::to_vec(call)?;
        self.transport
            .post_json(self.endpoints.master(), Bytes::from(body))
            .await
    }
}

#[async_trait]
impl ReservationOps for OperationDispatcher<'_> {
    type Error = ResvError;

    async fn destroy_volume(&self, request: &DestroyVolumeRequest) -> Result<(), ResvError> {
        OperationDispatcher::destroy_volume(self, request).await
    }

    async fn unreserve_raw(
        &self,
        agent_id: &str,
        resources: &[ResourceDescriptor],
    ) -> Result<(), ResvError> {
        OperationDispatcher::unreserve_raw(self, agent_id, resources).await
    }
}
