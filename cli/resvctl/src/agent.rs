//! Agent state reader.
//!
//! Fetches an agent's reserved resources and its executors. Nothing is
//! cached; every call reads a fresh snapshot.

use bytes::Bytes;
use resv_resources::{filter_by_principal, AgentCall, AgentReservedState, AgentResponse, Executor};
use resv_resources::ResourceDescriptor;
use tracing::debug;

use crate::client::Transport;
use crate::config::Endpoints;
use crate::error::ResvError;

/// Reads reservation state from agents.
pub struct AgentStateReader<'a> {
    transport: &'a dyn Transport,
    endpoints: &'a Endpoints,
}

impl<'a> AgentStateReader<'a> {
    pub fn new(transport: &'a dyn Transport, endpoints: &'a Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Fetch and decode the agent's reserved-resource snapshot.
    pub async fn fetch_state(&self, agent_id: &str) -> Result<AgentReservedState, ResvError> {
        let path = format!("{}/state", self.endpoints.agent_v0(agent_id));
        let body = self.transport.get(&path).await?;
        let state = AgentReservedState::from_state_json(&body)?;

        for role in state.roles() {
            debug!(agent_id, role = %role, "Agent reports reservations for role");
        }

        Ok(state)
    }

    /// Descriptors reserved for `role`, restricted to `principal` unless it
    /// is empty.
    pub async fn discover(
        &self,
        agent_id: &str,
        role: &str,
        principal: &str,
    ) -> Result<Vec<ResourceDescriptor>, ResvError> {
        let state = self.fetch_state(agent_id).await?;
        let descriptors = state.select_role(role)?;
        let selected = filter_by_principal(descriptors, principal);

        debug!(
            agent_id,
            role,
            principal,
            reported = descriptors.len(),
            selected = selected.len(),
            "Discovered reservations"
        );

        Ok(selected)
    }

    /// Fetch the agent's running executors.
    pub async fn fetch_executors(&self, agent_id: &str) -> Result<Vec<Executor>, ResvError> {
        let body = serde_json::to_vec(&AgentCall::get_executors())?;
        let response = self
            .transport
            .post_json(&self.endpoints.agent_v1(agent_id), Bytes::from(body))
            .await?;
        let response: AgentResponse = serde_json::from_slice(&response)?;

        Ok(response.into_executors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{agent_state, mem_json, volume_json, RecordingTransport};

    #[tokio::test]
    async fn test_fetch_state_reads_agent_state_path() {
        let transport = RecordingTransport::new();
        transport.respond_get("/agent/a1/state", agent_state("r", vec![mem_json("ops", "r1")]));
        let endpoints = Endpoints::default();
        let reader = AgentStateReader::new(&transport, &endpoints);

        let state = reader.fetch_state("a1").await.unwrap();

        assert_eq!(state.select_role("r").unwrap().len(), 1);
        assert_eq!(transport.requests()[0].path, "/agent/a1/state");
    }

    #[tokio::test]
    async fn test_fetch_state_malformed_json() {
        let transport = RecordingTransport::new();
        transport.respond_get("/agent/a1/state", "<html>");
        let endpoints = Endpoints::default();
        let reader = AgentStateReader::new(&transport, &endpoints);

        let err = reader.fetch_state("a1").await.unwrap_err();

        assert!(matches!(err, ResvError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_state_transport_error() {
        let transport = RecordingTransport::new();
        let endpoints = Endpoints::default();
        let reader = AgentStateReader::new(&transport, &endpoints);

        let err = reader.fetch_state("a1").await.unwrap_err();

        assert!(matches!(
            err,
            ResvError::Transport { status: Some(404), ref path, .. } if path == "/agent/a1/state"
        ));
    }

    #[tokio::test]
    async fn test_discover_filters_principal() {
        let transport = RecordingTransport::new();
        transport.respond_get(
            "/agent/a1/state",
            agent_state(
                "r",
                vec![mem_json("ops", "r1"), volume_json("other", "r2", "p1")],
            ),
        );
        let endpoints = Endpoints::default();
        let reader = AgentStateReader::new(&transport, &endpoints);

        let all = reader.discover("a1", "r", "").await.unwrap();
        let mine = reader.discover("a1", "r", "ops").await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].principal(), "ops");
    }

    #[tokio::test]
    async fn test_discover_absent_role() {
        let transport = RecordingTransport::new();
        transport.respond_get("/agent/a1/state", agent_state("r", vec![mem_json("ops", "r1")]));
        let endpoints = Endpoints::default();
        let reader = AgentStateReader::new(&transport, &endpoints);

        let err = reader.discover("a1", "absent-role", "").await.unwrap_err();

        assert!(matches!(err, ResvError::RoleNotFound { role } if role == "absent-role"));
    }

    #[tokio::test]
    async fn test_fetch_executors_posts_get_executors() {
        let transport = RecordingTransport::new();
        transport.respond_post(
            "/agent/a1/api/v1",
            serde_json::json!({
                "type": "GET_EXECUTORS",
                "get_executors": { "executors": [{ "executor_info": {
                    "executor_id": { "value": "e1" },
                    "resources": []
                }}]}
            })
            .to_string(),
        );
        let endpoints = Endpoints::default();
        let reader = AgentStateReader::new(&transport, &endpoints);

        let executors = reader.fetch_executors("a1").await.unwrap();

        assert_eq!(executors.len(), 1);
        let request = &transport.requests()[0];
        assert_eq!(request.json()["type"], "GET_EXECUTORS");
    }
}
