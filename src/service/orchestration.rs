// Copyright (c) 2025 - Cowboy AI, Inc.
//! Orchestration Engine Port
//!
//! An engine consumes a validated [`TopologyPlan`] and owns everything the
//! core does not: create/update/delete reconciliation, dependency ordering
//! between resources (zone before record, hub before attachment), idempotent
//! retries. The in-memory engine here is the deterministic reference
//! implementation used by tests and previews: it walks the plan in dependency
//! order, mints identifiers, and resolves record placeholders in a second
//! pass once workload addresses exist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;
use tracing::{debug, info};

use crate::domain::{RecordName, SpokeName};
use crate::plan::{DnsRecord, RecordTarget, TopologyPlan};
use crate::service::provisioner::ComputeProvisioner;
use crate::service::{ProvisionedId, ServiceError, ServiceResult};

/// Flat mapping of logical names to provisioned identifiers
///
/// The downstream-consumption contract after a successful apply: one
/// identifier per workload and record, plus the hub and the zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSet {
    pub hub: ProvisionedId,
    pub zone: ProvisionedId,
    pub workloads: BTreeMap<SpokeName, ProvisionedId>,
    pub records: BTreeMap<RecordName, ProvisionedId>,
}

impl ExportSet {
    /// Render as one flat name → identifier map
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut flat = BTreeMap::new();
        flat.insert("hub".to_string(), self.hub.to_string());
        flat.insert("zone".to_string(), self.zone.to_string());
        for (spoke, id) in &self.workloads {
            flat.insert(format!("workload/{}", spoke), id.to_string());
        }
        for (name, id) in &self.records {
            flat.insert(format!("record/{}", name), id.to_string());
        }
        flat
    }
}

/// Outcome of a successful apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedTopology {
    pub exports: ExportSet,
    /// DNS records with every workload placeholder resolved
    pub records: BTreeSet<DnsRecord>,
    /// Assigned private address per spoke workload
    pub workload_addresses: BTreeMap<SpokeName, Ipv4Addr>,
    pub applied_at: DateTime<Utc>,
}

/// Port to the external orchestration engine
#[async_trait]
pub trait OrchestrationEngine: Send + Sync {
    /// Realize a validated plan and return the export set
    async fn apply(&self, plan: &TopologyPlan) -> ServiceResult<AppliedTopology>;
}

/// Deterministic in-memory engine
pub struct InMemoryEngine<P> {
    provisioner: P,
}

impl<P> InMemoryEngine<P> {
    pub fn new(provisioner: P) -> Self {
        Self { provisioner }
    }
}

#[async_trait]
impl<P: ComputeProvisioner> OrchestrationEngine for InMemoryEngine<P> {
    async fn apply(&self, plan: &TopologyPlan) -> ServiceResult<AppliedTopology> {
        let hub = ProvisionedId::mint("tgw");
        debug!(hub = %hub, attachments = plan.hub.attachments.len(), "realized hub");

        // Workloads are independent of one another; provision them concurrently.
        let provisioned = try_join_all(
            plan.workloads
                .iter()
                .map(|placement| self.provisioner.provision(placement)),
        )
        .await?;

        let mut workloads = BTreeMap::new();
        let mut workload_addresses = BTreeMap::new();
        for workload in provisioned {
            workload_addresses.insert(workload.spoke.clone(), workload.private_address);
            workloads.insert(workload.spoke, workload.id);
        }

        let zone = ProvisionedId::mint("zone");

        // Second pass: record targets become concrete now that addresses exist.
        let mut records = BTreeSet::new();
        let mut record_ids = BTreeMap::new();
        for record in &plan.records {
            let resolved = match &record.target {
                RecordTarget::WorkloadAddress { spoke } => {
                    let address = workload_addresses.get(spoke).ok_or_else(|| {
                        ServiceError::Apply(format!(
                            "record {} targets workload of unknown spoke {}",
                            record.name, spoke
                        ))
                    })?;
                    record.resolved(*address)
                }
                RecordTarget::Address(_) => record.clone(),
            };

            record_ids.insert(resolved.name.clone(), ProvisionedId::mint("record"));
            records.insert(resolved);
        }

        let exports = ExportSet {
            hub,
            zone,
            workloads,
            records: record_ids,
        };

        info!(
            workloads = exports.workloads.len(),
            records = records.len(),
            "applied topology plan"
        );

        Ok(AppliedTopology {
            exports,
            records,
            workload_addresses,
            applied_at: Utc::now(),
        })
    }
}
