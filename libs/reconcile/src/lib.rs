//! Unreserve-all reconciliation.
//!
//! Tears down every reservation a role/principal holds on one agent. The
//! engine works in two phases:
//!
//! - **Plan**: turn the discovered descriptors into an ordered list of typed
//!   steps. Pure and deterministic.
//! - **Execute**: run the steps one at a time against a [`ReservationOps`]
//!   implementation, stopping at the first failure.
//!
//! # Invariants
//!
//! - Every persistent volume is destroyed before any reservation is released
//! - Disks backing a volume are still unreserved after their volume is gone
//! - Range-typed and zero-valued resources are never operands
//! - The first failing step aborts the run; completed steps are not rolled back

use async_trait::async_trait;
use resv_resources::labels::{self, LabelError};
use resv_resources::{DestroyVolumeRequest, ResourceDescriptor, ResourceKind};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Planning errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// A volume's labels cannot identify its reservation.
    #[error("cannot identify persistent volume '{persistence_id}': {source}")]
    Labels {
        persistence_id: String,
        #[source]
        source: LabelError,
    },
}

/// Operations the engine needs from the resource manager.
#[async_trait]
pub trait ReservationOps: Send + Sync {
    type Error: Send;

    /// Destroy one persistent volume.
    async fn destroy_volume(&self, request: &DestroyVolumeRequest) -> Result<(), Self::Error>;

    /// Unreserve descriptors exactly as the agent reported them.
    async fn unreserve_raw(
        &self,
        agent_id: &str,
        resources: &[ResourceDescriptor],
    ) -> Result<(), Self::Error>;
}

/// One step of a reconciliation plan.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileStep {
    /// Destroy the persistent volume on a disk reservation.
    DestroyVolume(DestroyVolumeRequest),

    /// Release a reservation, forwarding the reported descriptor.
    ///
    /// The descriptor is sent as the agent reported it. A disk whose volume
    /// was destroyed earlier in the run still carries its `disk.persistence`
    /// and `volume` objects here; the manager may reject unreserving it as a
    /// volume, which surfaces as that step's error.
    Unreserve(ResourceDescriptor),
}

impl std::fmt::Display for ReconcileStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileStep::DestroyVolume(request) => write!(
                f,
                "destroy volume {} (resource {})",
                request.persistence_id, request.resource_id
            ),
            ReconcileStep::Unreserve(resource) => {
                let rid = labels::decode(resource.labels())
                    .map(|ids| ids.resource_id)
                    .unwrap_or_default();
                write!(
                    f,
                    "unreserve {} {} (resource {})",
                    resource.display_value(),
                    resource.kind(),
                    rid
                )
            }
        }
    }
}

/// Why a discovered descriptor was left out of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Range-typed resources (ports) are not released in bulk.
    RangeResource,
    /// Nothing to release.
    ZeroValue,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::RangeResource => write!(f, "range resource"),
            SkipReason::ZeroValue => write!(f, "zero value"),
        }
    }
}

/// Ordered reconciliation plan for one agent.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilePlan {
    pub agent_id: String,
    pub steps: Vec<ReconcileStep>,
    pub skipped: Vec<(ResourceKind, SkipReason)>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn volume_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, ReconcileStep::DestroyVolume(_)))
            .count()
    }
}

/// Build the plan: all volume destroys first, then one unreserve per
/// releasable descriptor, both in discovery order.
pub fn plan(agent_id: &str, descriptors: &[ResourceDescriptor]) -> Result<ReconcilePlan, PlanError> {
    let mut skipped = Vec::new();
    let mut releasable = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        if descriptor.is_range() {
            skipped.push((descriptor.kind().clone(), SkipReason::RangeResource));
        } else if descriptor.value() <= 0.0 {
            skipped.push((descriptor.kind().clone(), SkipReason::ZeroValue));
        } else {
            releasable.push(descriptor);
        }
    }

    let mut steps = Vec::with_capacity(releasable.len() * 2);

    for descriptor in releasable.iter().filter(|d| d.is_persistent_volume()) {
        let ids = labels::decode(descriptor.labels()).map_err(|source| PlanError::Labels {
            persistence_id: descriptor.persistence_id().to_string(),
            source,
        })?;

        steps.push(ReconcileStep::DestroyVolume(DestroyVolumeRequest {
            agent_id: agent_id.to_string(),
            role: descriptor.role.clone(),
            principal: descriptor.principal().to_string(),
            disk: descriptor.value(),
            resource_id: ids.resource_id,
            framework_id: ids.framework_id,
            persistence_id: descriptor.persistence_id().to_string(),
            container_path: descriptor.container_path().to_string(),
            host_path: None,
        }));
    }

    steps.extend(
        releasable
            .into_iter()
            .map(|d| ReconcileStep::Unreserve(d.clone())),
    );

    Ok(ReconcilePlan {
        agent_id: agent_id.to_string(),
        steps,
        skipped,
    })
}

/// Steps completed by a successful run, in execution order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReconcileReport {
    pub completed: Vec<ReconcileStep>,
}

/// A run that stopped at a failing step.
#[derive(Debug)]
pub struct StepFailure<E> {
    /// Steps that completed before the failure; they are not rolled back.
    pub completed: Vec<ReconcileStep>,
    pub failed: ReconcileStep,
    pub error: E,
}

/// Execute a plan step by step, aborting on the first error.
pub async fn execute<O>(
    plan: &ReconcilePlan,
    ops: &O,
) -> Result<ReconcileReport, StepFailure<O::Error>>
where
    O: ReservationOps + ?Sized,
{
    for (kind, reason) in &plan.skipped {
        warn!(agent_id = %plan.agent_id, resource = %kind, reason = %reason, "Skipping resource");
    }

    let mut completed = Vec::with_capacity(plan.steps.len());

    for step in &plan.steps {
        debug!(agent_id = %plan.agent_id, step = %step, "Executing reconcile step");

        let result = match step {
            ReconcileStep::DestroyVolume(request) => ops.destroy_volume(request).await,
            ReconcileStep::Unreserve(resource) => {
                ops.unreserve_raw(&plan.agent_id, std::slice::from_ref(resource))
                    .await
            }
        };

        if let Err(error) = result {
            warn!(
                agent_id = %plan.agent_id,
                step = %step,
                completed = completed.len(),
                "Reconcile step failed"
            );
            return Err(StepFailure {
                completed,
                failed: step.clone(),
                error,
            });
        }

        completed.push(step.clone());
    }

    info!(agent_id = %plan.agent_id, steps = completed.len(), "Reconciliation complete");
    Ok(ReconcileReport { completed })
}
