//! Identifying labels carried by dynamic reservations.
//!
//! Every dynamically reserved resource carries a `resource_id` label, the
//! manager-assigned key needed to release it. Reservations made on behalf of
//! a scheduler framework also carry a `framework_id` label.

use thiserror::Error;

use crate::model::{Label, Labels};

/// Label key of the reservation correlation id.
pub const RESOURCE_ID_KEY: &str = "resource_id";

/// Label key of the owning framework.
pub const FRAMEWORK_ID_KEY: &str = "framework_id";

/// Label decoding errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// A recognized key appeared more than once.
    #[error("duplicate label '{key}': '{first}' and '{second}'")]
    Duplicate {
        key: &'static str,
        first: String,
        second: String,
    },
}

/// Identifiers extracted from a reservation's labels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReservationIds {
    pub resource_id: String,
    /// Empty when the reservation was not made for a framework.
    pub framework_id: String,
}

impl ReservationIds {
    pub fn new(resource_id: impl Into<String>, framework_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            framework_id: framework_id.into(),
        }
    }
}

/// Encode identifiers as labels.
///
/// `framework_id` comes first and only when non-empty, followed by
/// `resource_id`; this is the order the manager echoes labels back in.
pub fn encode(resource_id: &str, framework_id: &str) -> Labels {
    let mut labels = Vec::with_capacity(2);
    if !framework_id.is_empty() {
        labels.push(Label::new(FRAMEWORK_ID_KEY, framework_id));
    }
    labels.push(Label::new(RESOURCE_ID_KEY, resource_id));
    Labels { labels }
}

/// Decode identifiers from labels in a single scan.
///
/// Unrecognized keys are ignored; missing keys decode as empty strings. A
/// recognized key seen twice is rejected rather than overwritten.
pub fn decode(labels: &[Label]) -> Result<ReservationIds, LabelError> {
    let mut resource_id: Option<&str> = None;
    let mut framework_id: Option<&str> = None;

    for label in labels {
        let (key, slot) = match label.key.as_str() {
            RESOURCE_ID_KEY => (RESOURCE_ID_KEY, &mut resource_id),
            FRAMEWORK_ID_KEY => (FRAMEWORK_ID_KEY, &mut framework_id),
            _ => continue,
        };
        let value = label.value.as_deref().unwrap_or_default();
        if let Some(first) = slot.replace(value) {
            return Err(LabelError::Duplicate {
                key,
                first: first.to_string(),
                second: value.to_string(),
            });
        }
    }

    Ok(ReservationIds {
        resource_id: resource_id.unwrap_or_default().to_string(),
        framework_id: framework_id.unwrap_or_default().to_string(),
    })
}
