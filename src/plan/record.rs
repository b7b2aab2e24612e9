// Copyright (c) 2025 - Cowboy AI, Inc.
//! DNS Plan Artifacts
//!
//! Record targets are placeholders at compile time: a workload's private
//! address exists only after the orchestration engine has applied the plan, so
//! the compiled record points at the workload and is resolved to a concrete
//! address in a second pass (two-phase plan/apply).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::net::Ipv4Addr;

use crate::domain::{RecordName, SpokeName, ZoneName};

/// The private zone, associated with every spoke network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub name: ZoneName,
    /// Spoke networks the zone is associated with, so resolution works from
    /// any spoke
    pub networks: BTreeSet<SpokeName>,
}

/// DNS record type; the planner only emits address records
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordType {
    A,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::A => write!(f, "A"),
        }
    }
}

/// Target of a DNS record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordTarget {
    /// Placeholder: the private address of the named spoke's workload,
    /// known only after apply
    WorkloadAddress { spoke: SpokeName },
    /// A resolved concrete address
    Address(Ipv4Addr),
}

impl RecordTarget {
    /// Whether this target still awaits apply-phase resolution
    pub fn is_pending(&self) -> bool {
        matches!(self, RecordTarget::WorkloadAddress { .. })
    }
}

impl fmt::Display for RecordTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordTarget::WorkloadAddress { spoke } => write!(f, "workload:{}", spoke),
            RecordTarget::Address(addr) => write!(f, "{}", addr),
        }
    }
}

/// One DNS record within the private zone
///
/// Invariant: record names are unique within the zone; each spoke workload has
/// exactly one record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DnsRecord {
    pub name: RecordName,
    pub record_type: RecordType,
    pub target: RecordTarget,
    pub ttl: u32,
}

impl DnsRecord {
    /// Resolve a pending workload target to a concrete address
    pub fn resolved(&self, address: Ipv4Addr) -> Self {
        Self {
            name: self.name.clone(),
            record_type: self.record_type,
            target: RecordTarget::Address(address),
            ttl: self.ttl,
        }
    }
}

impl fmt::Display for DnsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} (ttl {})",
            self.name, self.record_type, self.target, self.ttl
        )
    }
}
