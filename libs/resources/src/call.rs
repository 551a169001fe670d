//! Master and agent v1 call envelopes.

use serde::{Deserialize, Serialize};

use crate::model::ResourceDescriptor;

/// Agent identifier as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentId {
    pub value: String,
}

impl AgentId {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Master call type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MasterCallType {
    ReserveResources,
    UnreserveResources,
    DestroyVolumes,
}

impl std::fmt::Display for MasterCallType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MasterCallType::ReserveResources => "RESERVE_RESOURCES",
            MasterCallType::UnreserveResources => "UNRESERVE_RESOURCES",
            MasterCallType::DestroyVolumes => "DESTROY_VOLUMES",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcesOnAgent {
    pub agent_id: AgentId,
    pub resources: Vec<ResourceDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumesOnAgent {
    pub agent_id: AgentId,
    pub volumes: Vec<ResourceDescriptor>,
}

/// Call envelope POSTed to the master operator API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterCall {
    #[serde(rename = "type")]
    pub call_type: MasterCallType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserve_resources: Option<ResourcesOnAgent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unreserve_resources: Option<ResourcesOnAgent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destroy_volumes: Option<VolumesOnAgent>,
}

impl MasterCall {
    pub fn reserve(agent_id: &str, resources: Vec<ResourceDescriptor>) -> Self {
        Self {
            call_type: MasterCallType::ReserveResources,
            reserve_resources: Some(ResourcesOnAgent {
                agent_id: AgentId::new(agent_id),
                resources,
            }),
            unreserve_resources: None,
            destroy_volumes: None,
        }
    }

    pub fn unreserve(agent_id: &str, resources: Vec<ResourceDescriptor>) -> Self {
        Self {
            call_type: MasterCallType::UnreserveResources,
            reserve_resources: None,
            unreserve_resources: Some(ResourcesOnAgent {
                agent_id: AgentId::new(agent_id),
                resources,
            }),
            destroy_volumes: None,
        }
    }

    pub fn destroy_volumes(agent_id: &str, volumes: Vec<ResourceDescriptor>) -> Self {
        Self {
            call_type: MasterCallType::DestroyVolumes,
            reserve_resources: None,
            unreserve_resources: None,
            destroy_volumes: Some(VolumesOnAgent {
                agent_id: AgentId::new(agent_id),
                volumes,
            }),
        }
    }

    /// Operand descriptors, whichever call type this is.
    pub fn operands(&self) -> &[ResourceDescriptor] {
        let operands = match self.call_type {
            MasterCallType::ReserveResources => self
                .reserve_resources
                .as_ref()
                .map(|c| c.resources.as_slice()),
            MasterCallType::UnreserveResources => self
                .unreserve_resources
                .as_ref()
                .map(|c| c.resources.as_slice()),
            MasterCallType::DestroyVolumes => {
                self.destroy_volumes.as_ref().map(|c| c.volumes.as_slice())
            }
        };
        operands.unwrap_or_default()
    }
}

/// Agent v1 call type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentCallType {
    GetExecutors,
}

/// Call envelope POSTed to an agent's v1 API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCall {
    #[serde(rename = "type")]
    pub call_type: AgentCallType,
}

impl AgentCall {
    pub fn get_executors() -> Self {
        Self {
            call_type: AgentCallType::GetExecutors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExecutorId {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExecutorInfo {
    #[serde(default)]
    pub executor_id: ExecutorId,

    #[serde(default)]
    pub resources: Vec<ResourceDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Executor {
    #[serde(default)]
    pub executor_info: ExecutorInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GetExecutors {
    #[serde(default)]
    pub executors: Vec<Executor>,

    #[serde(default)]
    pub completed_executors: Vec<Executor>,
}

/// Response to an agent v1 call; only `GET_EXECUTORS` is decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AgentResponse {
    #[serde(default)]
    pub get_executors: Option<GetExecutors>,
}

impl AgentResponse {
    /// Running executors, or none if the response carried no executor list.
    pub fn into_executors(self) -> Vec<Executor> {
        self.get_executors.map(|g| g.executors).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_scalar;
    use crate::model::ResourceKind;
    use rstest::rstest;

    #[rstest]
    #[case::reserve(MasterCallType::ReserveResources)]
    #[case::unreserve(MasterCallType::UnreserveResources)]
    #[case::destroy(MasterCallType::DestroyVolumes)]
    fn test_call_type_display_matches_wire_name(#[case] call_type: MasterCallType) {
        let wire = serde_json::to_value(call_type).unwrap();
        assert_eq!(wire, call_type.to_string());
    }

    #[test]
    fn test_reserve_envelope_shape() {
        let call = MasterCall::reserve(
            "agent-1",
            vec![build_scalar(ResourceKind::Cpus, "r", "ops", 1.0)],
        );
        let value = serde_json::to_value(&call).unwrap();

        assert_eq!(value["type"], "RESERVE_RESOURCES");
        assert_eq!(value["reserve_resources"]["agent_id"]["value"], "agent-1");
        assert_eq!(value["reserve_resources"]["resources"][0]["name"], "cpus");
        assert!(value.get("unreserve_resources").is_none());
    }

    #[test]
    fn test_destroy_envelope_uses_volumes_key() {
        let call = MasterCall::destroy_volumes("agent-1", Vec::new());
        let value = serde_json::to_value(&call).unwrap();

        assert_eq!(value["type"], "DESTROY_VOLUMES");
        assert!(value["destroy_volumes"]["volumes"].is_array());
    }

    #[test]
    fn test_get_executors_call() {
        let value = serde_json::to_value(AgentCall::get_executors()).unwrap();
        assert_eq!(value, serde_json::json!({ "type": "GET_EXECUTORS" }));
    }

    #[test]
    fn test_decode_executors_response() {
        let json = serde_json::json!({
            "type": "GET_EXECUTORS",
            "get_executors": {
                "executors": [{
                    "executor_info": {
                        "executor_id": { "value": "exec-1" },
                        "resources": [{
                            "name": "cpus",
                            "type": "SCALAR",
                            "scalar": { "value": 0.1 },
                            "allocation_info": { "role": "r" }
                        }]
                    }
                }]
            }
        });

        let response: AgentResponse = serde_json::from_value(json).unwrap();
        let executors = response.into_executors();

        assert_eq!(executors.len(), 1);
        let info = &executors[0].executor_info;
        assert_eq!(info.executor_id.value, "exec-1");
        assert_eq!(
            info.resources[0]
                .allocation_info
                .as_ref()
                .and_then(|a| a.role.as_deref()),
            Some("r")
        );
    }
}
