//! Resource descriptor builders.
//!
//! All builders are pure: the output is a function of the inputs only.

use crate::labels;
use crate::model::{
    DiskInfo, Persistence, ReservationInfo, ReservationKind, ResourceDescriptor, ResourceKind,
    Scalar, ValueType, Volume, VolumeMode,
};

/// Scalar descriptor with a bare principal reservation and no labels.
///
/// Used by the reserve path; the manager assigns the labels.
pub fn build_scalar(kind: ResourceKind, role: &str, principal: &str, value: f64) -> ResourceDescriptor {
    let reservation = ReservationInfo {
        principal: Some(principal.to_string()),
        ..Default::default()
    };

    scalar_descriptor(kind, role, value, Some(reservation), Vec::new())
}

/// Scalar descriptor for a dynamic reservation identified by its labels.
///
/// The `resource_id` label is always attached; `framework_id` only when
/// non-empty.
pub fn build_labeled_scalar(
    kind: ResourceKind,
    role: &str,
    principal: &str,
    value: f64,
    resource_id: &str,
    framework_id: &str,
) -> ResourceDescriptor {
    let labels = labels::encode(resource_id, framework_id);

    let reservation = ReservationInfo {
        principal: Some(principal.to_string()),
        labels: Some(labels.clone()),
        ..Default::default()
    };

    let dynamic = ReservationInfo {
        kind: Some(ReservationKind::Dynamic),
        role: Some(role.to_string()),
        principal: Some(principal.to_string()),
        labels: Some(labels),
        ..Default::default()
    };

    scalar_descriptor(kind, role, value, Some(reservation), vec![dynamic])
}

/// Disk descriptor for a persistent volume on a dynamic reservation.
pub fn build_disk(
    role: &str,
    principal: &str,
    value: f64,
    resource_id: &str,
    framework_id: &str,
    persistence_id: &str,
    container_path: &str,
) -> ResourceDescriptor {
    let mut descriptor = build_labeled_scalar(
        ResourceKind::Disk,
        role,
        principal,
        value,
        resource_id,
        framework_id,
    );

    descriptor.disk = Some(DiskInfo {
        persistence: Some(Persistence {
            id: persistence_id.to_string(),
            principal: Some(principal.to_string()),
        }),
        volume: Some(Volume {
            mode: VolumeMode::ReadWrite,
            container_path: container_path.to_string(),
            host_path: None,
        }),
        extra: Default::default(),
    });

    descriptor
}

fn scalar_descriptor(
    kind: ResourceKind,
    role: &str,
    value: f64,
    reservation: Option<ReservationInfo>,
    reservations: Vec<ReservationInfo>,
) -> ResourceDescriptor {
    ResourceDescriptor {
        name: kind,
        value_type: ValueType::Scalar,
        scalar: Some(Scalar { value }),
        ranges: None,
        role: role.to_string(),
        reservation,
        reservations,
        disk: None,
        allocation_info: None,
        extra: Default::default(),
    }
}
