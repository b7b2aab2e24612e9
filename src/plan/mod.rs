// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Plan Artifacts
//!
//! The declarative output of compilation, handed unchanged to the external
//! orchestration engine. Every collection is ordered (`BTreeSet`, sorted
//! `Vec`) so that compiling the same input twice serializes byte-identically.

pub mod address;
pub mod policy;
pub mod record;
pub mod route;

pub use address::{AddressBlock, BlockOwner};
pub use policy::{Direction, PolicyRule, RuleOrigin};
pub use record::{DnsRecord, RecordTarget, RecordType, Zone};
pub use route::{NextHop, Route};

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::{AvailabilityZone, ImageRef, RecordName, Spoke, SpokeName};

/// The association linking a spoke's subnet to the hub
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Attachment {
    pub spoke: SpokeName,
    /// The subnet placed on the hub
    pub subnet: SpokeName,
}

impl fmt::Display for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.spoke, self.subnet)
    }
}

/// The central transit hub; exactly one per topology
///
/// Invariant: the attachment set equals the full spoke set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hub {
    pub attachments: BTreeSet<Attachment>,
}

impl Hub {
    /// Whether the given spoke is attached
    pub fn is_attached(&self, spoke: &SpokeName) -> bool {
        self.attachments.iter().any(|a| &a.spoke == spoke)
    }
}

/// Per-spoke internet egress point, the next hop of the default route
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InternetEgress {
    pub spoke: SpokeName,
}

/// Where and how a spoke's workload is provisioned
///
/// Consumed by the compute-provisioning port; the image and init script are
/// opaque to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadPlacement {
    pub spoke: SpokeName,
    pub subnet: SpokeName,
    pub subnet_cidr: Ipv4Net,
    pub availability_zone: AvailabilityZone,
    pub name: RecordName,
    pub image: ImageRef,
    pub associate_public_ip: bool,
    pub user_data: Option<String>,
}

/// The fully synthesized, validated topology
///
/// Built once per compilation and never mutated after validation succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyPlan {
    /// Spokes with their assigned address space, sorted by name
    pub spokes: Vec<Spoke>,
    /// Every assigned address block
    pub blocks: BTreeSet<AddressBlock>,
    /// The transit hub and its attachments
    pub hub: Hub,
    /// One egress point per spoke
    pub egress: BTreeSet<InternetEgress>,
    /// Per-spoke routing entries
    pub routes: BTreeSet<Route>,
    /// Per-spoke security policy
    pub rules: BTreeSet<PolicyRule>,
    /// The shared private zone
    pub zone: Zone,
    /// Workload records, targets pending until apply
    pub records: BTreeSet<DnsRecord>,
    /// Workload placements, sorted by spoke name
    pub workloads: Vec<WorkloadPlacement>,
}

impl TopologyPlan {
    /// Look up a spoke by name
    pub fn spoke(&self, name: &SpokeName) -> Option<&Spoke> {
        self.spokes.iter().find(|s| &s.name == name)
    }

    /// Routes belonging to one spoke
    pub fn routes_for(&self, name: &SpokeName) -> impl Iterator<Item = &Route> {
        let name = name.clone();
        self.routes.iter().filter(move |r| r.spoke == name)
    }

    /// Rules belonging to one spoke
    pub fn rules_for(&self, name: &SpokeName) -> impl Iterator<Item = &PolicyRule> {
        let name = name.clone();
        self.rules.iter().filter(move |r| r.spoke == name)
    }

    /// Canonical JSON rendering; equal plans serialize byte-identically
    pub fn to_canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
