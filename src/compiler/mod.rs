// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Compiler
//!
//! Composes the planning components in dependency order and validates global
//! invariants before exposing the plan:
//!
//! ```text
//! SpokeRequests ─► AddressPlanner ─► TopologyGraph ─► RouteSynthesizer
//!                                         │           SecurityPolicySynthesizer
//!                                         ▼                    │
//!                               NameResolutionPlanner ─────────┤
//!                                                              ▼
//!                                              validate ─► TopologyPlan
//! ```
//!
//! The pipeline is single-threaded and purely computational; the first failure
//! aborts compilation and no partial plan escapes.

pub mod address;
pub mod dns;
pub mod graph;
pub mod policy;
pub mod routes;
pub mod validate;

pub use address::{AddressPlan, AllocationError};
pub use dns::{DnsError, DnsPlan};
pub use graph::{TopologyError, TopologyGraph};
pub use policy::PolicyError;
pub use routes::RouteConflictError;
pub use validate::ValidationError;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

use crate::config::CompilerConfig;
use crate::domain::{AccessRequirement, Spoke, SpokeRequest, Subnet, ZoneName};
use crate::errors::CompileError;
use crate::plan::{InternetEgress, TopologyPlan, WorkloadPlacement};

/// Everything the compiler needs for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyInput {
    /// Name of the shared private zone
    pub zone: ZoneName,
    /// Spoke declarations
    pub spokes: Vec<SpokeRequest>,
    /// Declared cross-spoke reachability
    #[serde(default)]
    pub requirements: Vec<AccessRequirement>,
}

/// The topology compiler
#[derive(Debug, Clone, Default)]
pub struct TopologyCompiler {
    config: CompilerConfig,
}

impl TopologyCompiler {
    /// Create a compiler with the given configuration
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Compile an input into a validated topology plan
    ///
    /// Runs address planning, graph construction, route/policy/DNS synthesis
    /// and global validation in dependency order. Errors are surfaced verbatim
    /// with the offending spoke/CIDR/name; none are retried internally since
    /// they indicate structurally invalid input.
    pub fn compile(&self, input: &TopologyInput) -> Result<TopologyPlan, CompileError> {
        check_input(input)?;

        let addresses = address::plan(self.config.pool, &input.spokes)?;
        let spokes = materialize(&input.spokes, &addresses)?;
        let graph = TopologyGraph::build(spokes)?;

        let routes = routes::synthesize(&graph)?;
        let rules = policy::synthesize(&graph, &input.requirements, &self.config.management)?;
        let dns = dns::plan(&input.zone, &graph, self.config.record_ttl)?;

        let hub = graph.hub();
        let spokes = graph.spokes().to_vec();

        let egress = spokes
            .iter()
            .map(|s| InternetEgress {
                spoke: s.name.clone(),
            })
            .collect();

        let workloads = spokes
            .iter()
            .map(|s| {
                let subnet = s.workload_subnet();
                WorkloadPlacement {
                    spoke: s.name.clone(),
                    subnet: subnet.name.clone(),
                    subnet_cidr: subnet.cidr,
                    availability_zone: s.availability_zone.clone(),
                    name: s.workload.name.clone(),
                    image: s.workload.image.clone(),
                    associate_public_ip: s.workload.associate_public_ip,
                    user_data: s.workload.user_data.clone(),
                }
            })
            .collect();

        let plan = TopologyPlan {
            spokes,
            blocks: addresses.blocks().clone(),
            hub,
            egress,
            routes,
            rules,
            zone: dns.zone,
            records: dns.records,
            workloads,
        };

        validate::plan(&plan, &input.requirements)?;

        info!(
            spokes = plan.spokes.len(),
            routes = plan.routes.len(),
            rules = plan.rules.len(),
            records = plan.records.len(),
            "compiled topology plan"
        );
        Ok(plan)
    }
}

/// Structural input checks that run before any planning
fn check_input(input: &TopologyInput) -> Result<(), TopologyError> {
    if input.spokes.is_empty() {
        return Err(TopologyError::EmptyTopology);
    }

    let mut names = HashSet::with_capacity(input.spokes.len());
    for request in &input.spokes {
        if !names.insert(&request.name) {
            return Err(TopologyError::DuplicateSpoke(request.name.clone()));
        }

        if request.subnets.is_empty() {
            return Err(TopologyError::SpokeWithoutSubnets(request.name.clone()));
        }

        let mut subnet_names = HashSet::with_capacity(request.subnets.len());
        for subnet in &request.subnets {
            if !subnet_names.insert(&subnet.name) {
                return Err(TopologyError::DuplicateSubnet {
                    spoke: request.name.clone(),
                    subnet: subnet.name.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Attach assigned blocks to the declared spokes
fn materialize(
    requests: &[SpokeRequest],
    addresses: &AddressPlan,
) -> Result<Vec<Spoke>, TopologyError> {
    requests
        .iter()
        .map(|request| {
            let cidr = addresses
                .spoke_cidr(&request.name)
                .ok_or_else(|| TopologyError::UnknownSpoke(request.name.clone()))?;

            let subnets = request
                .subnets
                .iter()
                .map(|s| {
                    addresses
                        .subnet_cidr(&request.name, &s.name)
                        .map(|cidr| Subnet {
                            name: s.name.clone(),
                            cidr,
                        })
                        .ok_or_else(|| TopologyError::UnknownSpoke(request.name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Spoke {
                name: request.name.clone(),
                availability_zone: request.availability_zone.clone(),
                cidr,
                subnets,
                workload: request.workload.clone(),
            })
        })
        .collect()
}
