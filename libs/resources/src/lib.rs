//! # resv-resources
//!
//! Resource descriptors and reservation metadata for Mesos dynamic
//! reservations.
//!
//! ## Contents
//!
//! - [`model`]: descriptor types in the manager's JSON shape
//! - [`builder`]: pure constructors for reserve, unreserve and volume operands
//! - [`labels`]: the `resource_id` / `framework_id` label codec
//! - [`call`]: master and agent call envelopes
//! - [`request`]: operation requests and the calls they produce
//! - [`state`]: the agent's reserved-resource snapshot
//!
//! ## Invariants
//!
//! - Operands of unreserve and destroy-volume calls are dynamic reservations
//!   carrying a `resource_id` label
//! - Zero-valued amounts are never unreserved; reserve always sends cpus and mem
//! - Descriptors read from an agent re-encode with their unknown fields intact

pub mod builder;
pub mod call;
pub mod labels;
pub mod model;
pub mod request;
pub mod state;

pub use builder::{build_disk, build_labeled_scalar, build_scalar};
pub use call::{AgentCall, AgentResponse, Executor, MasterCall, MasterCallType};
pub use labels::{LabelError, ReservationIds};
pub use model::{ReservationKind, ResourceDescriptor, ResourceKind};
pub use request::{DestroyVolumeRequest, ReserveRequest, UnreserveOneRequest, UnreserveRequest};
pub use state::{filter_by_principal, AgentReservedState, StateError};
