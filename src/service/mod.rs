// Copyright (c) 2025 - Cowboy AI, Inc.
//! External Service Ports
//!
//! The compiler's only contracts with the outside world: an orchestration
//! engine that realizes a [`crate::plan::TopologyPlan`] against a cloud
//! control plane, and a compute-provisioning service that places workloads
//! and assigns their private addresses. Both are async traits; deterministic
//! in-memory implementations are provided for tests and previews.
//!
//! Transient faults (throttling, eventual consistency) live entirely behind
//! these ports and are never surfaced into the compile-time taxonomy.

pub mod orchestration;
pub mod provisioner;

pub use orchestration::{AppliedTopology, ExportSet, InMemoryEngine, OrchestrationEngine};
pub use provisioner::{ComputeProvisioner, FixedOffsetProvisioner, ProvisionedWorkload};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Service layer result type
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Apply-phase errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Workload provisioning failed
    #[error("provisioning failed for workload {workload}: {reason}")]
    Provisioning { workload: String, reason: String },

    /// The engine could not realize the plan
    #[error("apply failed: {0}")]
    Apply(String),
}

/// Identifier minted for a provisioned resource
///
/// Opaque to the core; the compiler never assumes these values exist before
/// the apply phase completes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvisionedId(String);

impl ProvisionedId {
    /// Mint a fresh identifier with a resource-class prefix
    pub fn mint(prefix: &str) -> Self {
        Self(format!("{}-{}", prefix, Uuid::now_v7().simple()))
    }

    /// Wrap an identifier returned by an external control plane
    pub fn from_external(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProvisionedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
