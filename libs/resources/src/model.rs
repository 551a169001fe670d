//! Resource descriptor model.
//!
//! The types mirror the JSON shape the Mesos master and agent use for
//! `Resource` objects, so a descriptor read from an agent can be forwarded
//! back to the master without losing fields. Fields this crate does not model
//! are kept in `extra` maps and written back verbatim.

use serde::{Deserialize, Serialize};

/// Name of a resource as reported by the resource manager.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceKind {
    Cpus,
    Mem,
    Disk,
    Ports,
    /// Any other resource name (gpus, custom resources).
    Other(String),
}

impl ResourceKind {
    /// Wire name of the resource.
    pub fn as_str(&self) -> &str {
        match self {
            ResourceKind::Cpus => "cpus",
            ResourceKind::Mem => "mem",
            ResourceKind::Disk => "disk",
            ResourceKind::Ports => "ports",
            ResourceKind::Other(name) => name,
        }
    }
}

impl From<String> for ResourceKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "cpus" => ResourceKind::Cpus,
            "mem" => ResourceKind::Mem,
            "disk" => ResourceKind::Disk,
            "ports" => ResourceKind::Ports,
            _ => ResourceKind::Other(name),
        }
    }
}

impl From<&str> for ResourceKind {
    fn from(name: &str) -> Self {
        ResourceKind::from(name.to_string())
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Other(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value type tag of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    #[default]
    Scalar,
    Ranges,
    Set,
    Text,
}

/// Scalar quantity (cpus, MB of memory, MB of disk).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Scalar {
    pub value: f64,
}

/// A set of inclusive ranges, used by port resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Ranges {
    #[serde(default)]
    pub range: Vec<Range>,
}

/// One inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub begin: u64,
    pub end: u64,
}

impl std::fmt::Display for Ranges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .range
            .iter()
            .map(|r| format!("{}-{}", r.begin, r.end))
            .collect();
        write!(f, "[{}]", parts.join(","))
    }
}

/// How a reservation was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationKind {
    /// Configured at agent startup.
    #[default]
    Static,
    /// Created through a reserve call; releasable with unreserve.
    Dynamic,
}

/// A key/value label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Label {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

/// Label list wrapper, matching the `{"labels": [...]}` wire nesting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Labels {
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// Ownership metadata attached to a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReservationInfo {
    /// Absent in the pre-refinement `reservation` object.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ReservationKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ReservationInfo {
    /// Principal, or an empty string when none was recorded.
    pub fn principal(&self) -> &str {
        self.principal.as_deref().unwrap_or_default()
    }

    /// Labels, or an empty slice when none were recorded.
    pub fn labels(&self) -> &[Label] {
        self.labels
            .as_ref()
            .map(|l| l.labels.as_slice())
            .unwrap_or_default()
    }
}

/// Persistent volume identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Persistence {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,
}

/// Volume access mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VolumeMode {
    #[default]
    #[serde(rename = "RW")]
    ReadWrite,
    #[serde(rename = "RO")]
    ReadOnly,
}

/// Where a persistent volume is mounted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Volume {
    #[serde(default)]
    pub mode: VolumeMode,

    #[serde(default)]
    pub container_path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_path: Option<String>,
}

/// Disk-specific metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DiskInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistence: Option<Persistence>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Volume>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Role a resource is currently allocated to (executor resources only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AllocationInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// One reservable quantity on one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub name: ResourceKind,

    #[serde(rename = "type", default)]
    pub value_type: ValueType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranges: Option<Ranges>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,

    /// Pre-refinement reservation object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation: Option<ReservationInfo>,

    /// Reservation stack; the last entry is the most refined.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reservations: Vec<ReservationInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<DiskInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation_info: Option<AllocationInfo>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ResourceDescriptor {
    pub fn kind(&self) -> &ResourceKind {
        &self.name
    }

    /// Scalar value, or zero for non-scalar resources.
    pub fn value(&self) -> f64 {
        self.scalar.map(|s| s.value).unwrap_or_default()
    }

    /// True for range-typed resources such as ports.
    pub fn is_range(&self) -> bool {
        self.value_type == ValueType::Ranges
    }

    /// Effective reservation metadata: the most refined reservation if the
    /// stack is present, otherwise the pre-refinement object.
    pub fn reservation_info(&self) -> Option<&ReservationInfo> {
        self.reservations.last().or(self.reservation.as_ref())
    }

    pub fn principal(&self) -> &str {
        self.reservation_info()
            .map(ReservationInfo::principal)
            .unwrap_or_default()
    }

    pub fn reservation_kind(&self) -> ReservationKind {
        self.reservation_info()
            .and_then(|r| r.kind)
            .unwrap_or_default()
    }

    pub fn labels(&self) -> &[Label] {
        self.reservation_info()
            .map(ReservationInfo::labels)
            .unwrap_or_default()
    }

    /// Persistence id, or an empty string for plain disk reservations.
    pub fn persistence_id(&self) -> &str {
        self.disk
            .as_ref()
            .and_then(|d| d.persistence.as_ref())
            .map(|p| p.id.as_str())
            .unwrap_or_default()
    }

    pub fn container_path(&self) -> &str {
        self.disk
            .as_ref()
            .and_then(|d| d.volume.as_ref())
            .map(|v| v.container_path.as_str())
            .unwrap_or_default()
    }

    /// A disk descriptor carrying a persistence id is a created volume.
    pub fn is_persistent_volume(&self) -> bool {
        self.name == ResourceKind::Disk && !self.persistence_id().is_empty()
    }

    /// Human-readable value: the scalar, or the ranges for range resources.
    pub fn display_value(&self) -> String {
        match (&self.ranges, self.is_range()) {
            (Some(ranges), true) => ranges.to_string(),
            _ => self.value().to_string(),
        }
    }
}
