//! Operation requests and the master calls they translate to.

use crate::builder::{build_disk, build_labeled_scalar, build_scalar};
use crate::call::MasterCall;
use crate::model::{ResourceDescriptor, ResourceKind};

/// Reserve cpus and memory for a role.
#[derive(Debug, Clone, PartialEq)]
pub struct ReserveRequest {
    pub agent_id: String,
    pub role: String,
    pub principal: String,
    pub cpus: f64,
    pub mem: f64,
}

impl ReserveRequest {
    /// Always exactly two operands, cpus then mem, even for zero amounts.
    pub fn to_call(&self) -> MasterCall {
        let resources = vec![
            build_scalar(ResourceKind::Cpus, &self.role, &self.principal, self.cpus),
            build_scalar(ResourceKind::Mem, &self.role, &self.principal, self.mem),
        ];
        MasterCall::reserve(&self.agent_id, resources)
    }
}

/// Release labeled cpus, memory, and disk reservations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnreserveRequest {
    pub agent_id: String,
    pub role: String,
    pub principal: String,
    pub cpus: f64,
    pub cpus_resource_id: String,
    pub mem: f64,
    pub mem_resource_id: String,
    pub disk: f64,
    pub disk_resource_id: String,
    pub framework_id: String,
}

impl UnreserveRequest {
    /// One operand per resource type with a strictly positive amount.
    pub fn descriptors(&self) -> Vec<ResourceDescriptor> {
        let amounts = [
            (ResourceKind::Cpus, self.cpus, &self.cpus_resource_id),
            (ResourceKind::Mem, self.mem, &self.mem_resource_id),
            (ResourceKind::Disk, self.disk, &self.disk_resource_id),
        ];

        amounts
            .into_iter()
            .filter(|(_, value, _)| *value > 0.0)
            .map(|(kind, value, resource_id)| {
                build_labeled_scalar(
                    kind,
                    &self.role,
                    &self.principal,
                    value,
                    resource_id,
                    &self.framework_id,
                )
            })
            .collect()
    }

    pub fn to_call(&self) -> MasterCall {
        MasterCall::unreserve(&self.agent_id, self.descriptors())
    }
}

/// Release a single labeled reservation of any scalar type.
#[derive(Debug, Clone, PartialEq)]
pub struct UnreserveOneRequest {
    pub agent_id: String,
    pub role: String,
    pub principal: String,
    pub kind: ResourceKind,
    pub value: f64,
    pub resource_id: String,
    pub framework_id: String,
}

impl UnreserveOneRequest {
    pub fn to_call(&self) -> MasterCall {
        let resource = build_labeled_scalar(
            self.kind.clone(),
            &self.role,
            &self.principal,
            self.value,
            &self.resource_id,
            &self.framework_id,
        );
        MasterCall::unreserve(&self.agent_id, vec![resource])
    }
}

/// Destroy one persistent volume.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DestroyVolumeRequest {
    pub agent_id: String,
    pub role: String,
    pub principal: String,
    pub disk: f64,
    pub resource_id: String,
    pub framework_id: String,
    pub persistence_id: String,
    pub container_path: String,
    /// Accepted for compatibility; the volume model does not carry it, so it
    /// never reaches the wire.
    pub host_path: Option<String>,
}

impl DestroyVolumeRequest {
    pub fn descriptor(&self) -> ResourceDescriptor {
        build_disk(
            &self.role,
            &self.principal,
            self.disk,
            &self.resource_id,
            &self.framework_id,
            &self.persistence_id,
            &self.container_path,
        )
    }

    pub fn to_call(&self) -> MasterCall {
        MasterCall::destroy_volumes(&self.agent_id, vec![self.descriptor()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::MasterCallType;
    use crate::labels;

    fn unreserve(cpus: f64, mem: f64, disk: f64) -> UnreserveRequest {
        UnreserveRequest {
            agent_id: "agent-1".into(),
            role: "r".into(),
            principal: "ops".into(),
            cpus,
            cpus_resource_id: "c1".into(),
            mem,
            mem_resource_id: "m1".into(),
            disk,
            disk_resource_id: "d1".into(),
            framework_id: String::new(),
        }
    }

    #[test]
    fn test_reserve_sends_zero_amounts() {
        let request = ReserveRequest {
            agent_id: "agent-1".into(),
            role: "r".into(),
            principal: "ops".into(),
            cpus: 0.0,
            mem: 0.0,
        };
        let call = request.to_call();

        assert_eq!(call.call_type, MasterCallType::ReserveResources);
        let kinds: Vec<_> = call.operands().iter().map(|d| d.kind().clone()).collect();
        assert_eq!(kinds, vec![ResourceKind::Cpus, ResourceKind::Mem]);
    }

    #[test]
    fn test_unreserve_only_mem() {
        let call = unreserve(0.0, 256.0, 0.0).to_call();
        let operands = call.operands();

        assert_eq!(call.call_type, MasterCallType::UnreserveResources);
        assert_eq!(operands.len(), 1);
        assert_eq!(operands[0].kind(), &ResourceKind::Mem);
        assert_eq!(operands[0].value(), 256.0);
        let ids = labels::decode(operands[0].labels()).unwrap();
        assert_eq!(ids.resource_id, "m1");
    }

    #[test]
    fn test_unreserve_skips_negative_amounts() {
        let descriptors = unreserve(-1.0, 0.0, 10.0).descriptors();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].kind(), &ResourceKind::Disk);
    }

    #[test]
    fn test_unreserve_keeps_type_order() {
        let kinds: Vec<_> = unreserve(1.0, 2.0, 3.0)
            .descriptors()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(
            kinds,
            vec![ResourceKind::Cpus, ResourceKind::Mem, ResourceKind::Disk]
        );
    }

    #[test]
    fn test_destroy_ignores_host_path() {
        let request = DestroyVolumeRequest {
            agent_id: "agent-1".into(),
            role: "r".into(),
            principal: "ops".into(),
            disk: 1024.0,
            resource_id: "r2".into(),
            framework_id: String::new(),
            persistence_id: "p1".into(),
            container_path: "data".into(),
            host_path: Some("/mnt/data".into()),
        };
        let call = request.to_call();
        let volume = &call.operands()[0];

        assert_eq!(call.call_type, MasterCallType::DestroyVolumes);
        assert_eq!(volume.persistence_id(), "p1");
        let mount = volume.disk.as_ref().and_then(|d| d.volume.as_ref()).unwrap();
        assert_eq!(mount.host_path, None);
    }
}
