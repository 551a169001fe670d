//! Multi-step flows: unreserve-all and listing.
//!
//! Unreserve-all discovers a role's reservations, destroys the persistent
//! volumes on them, then releases every reservation, stopping at the first
//! error. Discovery is re-read on each run, so a failed run is simply run
//! again.

use resv_reconcile::{ReconcilePlan, ReconcileReport};
use tracing::{error, info};

use crate::agent::AgentStateReader;
use crate::dispatcher::OperationDispatcher;
use crate::error::ResvError;
use crate::output::{ExecutorResourceRow, Printer, ResourceRow};

/// Discover and plan the teardown of a role/principal's reservations.
pub async fn plan_unreserve_all(
    reader: &AgentStateReader<'_>,
    agent_id: &str,
    role: &str,
    principal: &str,
) -> Result<ReconcilePlan, ResvError> {
    let descriptors = reader.discover(agent_id, role, principal).await?;
    let plan = resv_reconcile::plan(agent_id, &descriptors)?;

    info!(
        agent_id,
        role,
        principal,
        volumes = plan.volume_count(),
        steps = plan.steps.len(),
        skipped = plan.skipped.len(),
        "Planned unreserve-all"
    );

    Ok(plan)
}

/// Release everything a role/principal holds on one agent.
pub async fn unreserve_all(
    reader: &AgentStateReader<'_>,
    dispatcher: &OperationDispatcher<'_>,
    printer: &dyn Printer,
    agent_id: &str,
    role: &str,
    principal: &str,
) -> Result<ReconcileReport, ResvError> {
    printer.message(&format!("Unreserve all resources for {}", role));

    let plan = plan_unreserve_all(reader, agent_id, role, principal).await?;

    for step in &plan.steps {
        printer.message(&format!("Planned: {}", step));
    }

    resv_reconcile::execute(&plan, dispatcher)
        .await
        .map_err(|failure| {
            error!(
                agent_id,
                role,
                completed = failure.completed.len(),
                failed = %failure.failed,
                "Unreserve-all aborted"
            );
            failure.error
        })
}

/// Print the plan without executing it.
pub async fn unreserve_all_dry_run(
    reader: &AgentStateReader<'_>,
    printer: &dyn Printer,
    agent_id: &str,
    role: &str,
    principal: &str,
) -> Result<ReconcilePlan, ResvError> {
    let plan = plan_unreserve_all(reader, agent_id, role, principal).await?;

    for step in &plan.steps {
        printer.message(&format!("Would {}", step));
    }
    for (kind, reason) in &plan.skipped {
        printer.message(&format!("Would skip {} ({})", kind, reason));
    }

    Ok(plan)
}

/// List a role's reserved resources, then its executors' resources.
pub async fn list_resources(
    reader: &AgentStateReader<'_>,
    printer: &dyn Printer,
    agent_id: &str,
    role: &str,
) -> Result<(), ResvError> {
    let descriptors = reader.discover(agent_id, role, "").await?;
    let rows: Vec<ResourceRow> = descriptors.iter().map(ResourceRow::from_descriptor).collect();
    printer.resources(&rows);

    let executors = reader.fetch_executors(agent_id).await?;
    let rows: Vec<ExecutorResourceRow> = executors
        .iter()
        .flat_map(|executor| {
            let info = &executor.executor_info;
            info.resources
                .iter()
                .filter(|r| {
                    r.allocation_info
                        .as_ref()
                        .and_then(|a| a.role.as_deref())
                        == Some(role)
                })
                .map(|r| ExecutorResourceRow {
                    executor_id: info.executor_id.value.clone(),
                    resource: ResourceRow::from_descriptor(r),
                })
        })
        .collect();
    printer.executor_resources(&rows);

    Ok(())
}
