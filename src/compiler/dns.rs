// Copyright (c) 2025 - Cowboy AI, Inc.
//! Name Resolution Planner
//!
//! One private zone, associated with every spoke network so resolution works
//! from any spoke, and one A record per workload pointing at that workload's
//! private address placeholder. Record names collide by failing, never by
//! overwriting.

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

use crate::compiler::graph::TopologyGraph;
use crate::domain::{RecordName, SpokeName, ZoneName};
use crate::plan::{DnsRecord, RecordTarget, RecordType, Zone};

/// DNS planning failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DnsError {
    #[error("duplicate record name {name} in zone {zone}: workloads of {spoke_a} and {spoke_b}")]
    DuplicateRecordName {
        name: RecordName,
        zone: ZoneName,
        spoke_a: SpokeName,
        spoke_b: SpokeName,
    },
}

/// The assembled DNS plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsPlan {
    pub zone: Zone,
    pub records: BTreeSet<DnsRecord>,
}

/// Derive the zone and one record per spoke workload
///
/// Record targets stay pending (`RecordTarget::WorkloadAddress`) until the
/// orchestration engine has provisioned the workloads; the TTL is short by
/// default since private addresses may be reassigned on replacement.
pub fn plan(
    zone_name: &ZoneName,
    graph: &TopologyGraph,
    ttl: u32,
) -> Result<DnsPlan, DnsError> {
    let mut seen: BTreeMap<RecordName, SpokeName> = BTreeMap::new();
    let mut records = BTreeSet::new();

    for spoke in graph.spokes() {
        let name = spoke.workload.name.clone();

        if let Some(existing) = seen.get(&name) {
            return Err(DnsError::DuplicateRecordName {
                name,
                zone: zone_name.clone(),
                spoke_a: existing.clone(),
                spoke_b: spoke.name.clone(),
            });
        }
        seen.insert(name.clone(), spoke.name.clone());

        records.insert(DnsRecord {
            name,
            record_type: RecordType::A,
            target: RecordTarget::WorkloadAddress {
                spoke: spoke.name.clone(),
            },
            ttl,
        });
    }

    let zone = Zone {
        name: zone_name.clone(),
        networks: graph.spokes().iter().map(|s| s.name.clone()).collect(),
    };

    debug!(zone = %zone.name, records = records.len(), "planned dns zone");
    Ok(DnsPlan { zone, records })
}
