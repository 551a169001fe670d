//! Agent reserved-resource snapshot.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::model::ResourceDescriptor;

/// Agent state errors.
#[derive(Debug, Error)]
pub enum StateError {
    /// The role holds no reserved resources on the agent.
    #[error("no resources are reserved for role '{role}'")]
    RoleNotFound { role: String },

    /// The state document is not valid JSON of the expected shape.
    #[error("invalid agent state: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The subset of an agent's `/state` document this crate reads.
#[derive(Debug, Deserialize)]
struct AgentStateDocument {
    #[serde(default)]
    reserved_resources_full: BTreeMap<String, Vec<ResourceDescriptor>>,
}

/// Reserved resources reported by one agent, keyed by role.
///
/// Rebuilt from a fresh snapshot on every query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AgentReservedState {
    roles: BTreeMap<String, Vec<ResourceDescriptor>>,
}

impl AgentReservedState {
    pub fn new(roles: BTreeMap<String, Vec<ResourceDescriptor>>) -> Self {
        Self { roles }
    }

    /// Decode an agent `/state` response body.
    pub fn from_state_json(body: &[u8]) -> Result<Self, StateError> {
        let document: AgentStateDocument = serde_json::from_slice(body)?;
        Ok(Self::new(document.reserved_resources_full))
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    /// Descriptors reserved for `role`.
    ///
    /// An absent role and a role whose reservations were all released are
    /// indistinguishable; both fail with `RoleNotFound`.
    pub fn select_role(&self, role: &str) -> Result<&[ResourceDescriptor], StateError> {
        match self.roles.get(role) {
            Some(descriptors) if !descriptors.is_empty() => Ok(descriptors),
            _ => Err(StateError::RoleNotFound {
                role: role.to_string(),
            }),
        }
    }
}

/// Keep only descriptors reserved by `principal`; an empty principal keeps
/// everything.
pub fn filter_by_principal(
    descriptors: &[ResourceDescriptor],
    principal: &str,
) -> Vec<ResourceDescriptor> {
    if principal.is_empty() {
        return descriptors.to_vec();
    }

    descriptors
        .iter()
        .filter(|d| d.principal() == principal)
        .cloned()
        .collect()
}
