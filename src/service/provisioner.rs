// Copyright (c) 2025 - Cowboy AI, Inc.
//! Compute Provisioning Port
//!
//! Given a workload placement (subnet, image, init script), an implementation
//! returns the provisioned workload with its assigned private address. The
//! core only consumes that address for record resolution; it never allocates
//! host addresses itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use tracing::debug;

use crate::domain::SpokeName;
use crate::plan::WorkloadPlacement;
use crate::service::{ProvisionedId, ServiceError, ServiceResult};

/// A workload placed by the provisioning service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedWorkload {
    pub spoke: SpokeName,
    pub id: ProvisionedId,
    pub private_address: Ipv4Addr,
}

/// Port to the external compute-provisioning service
#[async_trait]
pub trait ComputeProvisioner: Send + Sync {
    /// Provision one workload and return its assigned private address
    async fn provision(&self, placement: &WorkloadPlacement) -> ServiceResult<ProvisionedWorkload>;
}

/// Deterministic provisioner assigning network address + fixed host offset
///
/// Stands in for a real provisioning service in tests and previews. The
/// default offset of 5 matches the conventional first pinned host address in
/// a fresh subnet.
#[derive(Debug, Clone)]
pub struct FixedOffsetProvisioner {
    host_offset: u32,
}

impl FixedOffsetProvisioner {
    pub fn new(host_offset: u32) -> Self {
        Self { host_offset }
    }
}

impl Default for FixedOffsetProvisioner {
    fn default() -> Self {
        Self::new(5)
    }
}

#[async_trait]
impl ComputeProvisioner for FixedOffsetProvisioner {
    async fn provision(&self, placement: &WorkloadPlacement) -> ServiceResult<ProvisionedWorkload> {
        let network = u32::from(placement.subnet_cidr.network());
        let broadcast = u32::from(placement.subnet_cidr.broadcast());

        let host = network
            .checked_add(self.host_offset)
            .filter(|h| *h > network && *h < broadcast)
            .ok_or_else(|| ServiceError::Provisioning {
                workload: placement.name.to_string(),
                reason: format!(
                    "host offset {} does not fit in subnet {}",
                    self.host_offset, placement.subnet_cidr
                ),
            })?;

        let private_address = Ipv4Addr::from(host);
        debug!(
            workload = %placement.name,
            spoke = %placement.spoke,
            %private_address,
            "provisioned workload"
        );

        Ok(ProvisionedWorkload {
            spoke: placement.spoke.clone(),
            id: ProvisionedId::mint("i"),
            private_address,
        })
    }
}
