// Copyright (c) 2025 - Cowboy AI, Inc.
//! Security Policy Synthesizer
//!
//! Derives the minimal rule set for every spoke: one provider-side ingress
//! rule per declared access requirement, the always-present management rule,
//! and one allow-all egress rule per spoke. Egress stays open by documented
//! design choice; tightening it is a policy decision outside this model.

use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

use crate::compiler::graph::TopologyGraph;
use crate::config::{any_ipv4, ManagementAccess};
use crate::domain::{AccessRequirement, PortRange, Protocol, SpokeName};
use crate::plan::{Direction, PolicyRule, RuleOrigin};

/// Policy synthesis failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("access requirement references unknown spoke {spoke} ({requirement})")]
    UnknownSpoke {
        spoke: SpokeName,
        requirement: String,
    },
}

/// Synthesize the full policy rule set
///
/// Ingress rules admitting a peer CIDR exist iff the matching requirement was
/// declared; removing one requirement removes exactly one peer rule. The
/// management rule carries its own origin so peer changes can never disturb
/// administrative access.
pub fn synthesize(
    graph: &TopologyGraph,
    requirements: &[AccessRequirement],
    management: &ManagementAccess,
) -> Result<BTreeSet<PolicyRule>, PolicyError> {
    let mut rules = BTreeSet::new();

    for requirement in requirements {
        let consumer = graph.get(&requirement.consumer).ok_or_else(|| {
            PolicyError::UnknownSpoke {
                spoke: requirement.consumer.clone(),
                requirement: requirement.to_string(),
            }
        })?;

        if !graph.contains(&requirement.provider) {
            return Err(PolicyError::UnknownSpoke {
                spoke: requirement.provider.clone(),
                requirement: requirement.to_string(),
            });
        }

        rules.insert(PolicyRule {
            spoke: requirement.provider.clone(),
            direction: Direction::Ingress,
            protocol: requirement.protocol,
            ports: requirement.port,
            remote: consumer.cidr,
            origin: RuleOrigin::PeerAccess {
                consumer: requirement.consumer.clone(),
            },
        });
    }

    for spoke in graph.spokes() {
        if management.enabled {
            rules.insert(PolicyRule {
                spoke: spoke.name.clone(),
                direction: Direction::Ingress,
                protocol: management.protocol,
                ports: management.port,
                remote: management.source,
                origin: RuleOrigin::Management,
            });
        }

        rules.insert(PolicyRule {
            spoke: spoke.name.clone(),
            direction: Direction::Egress,
            protocol: Protocol::All,
            ports: PortRange::any(),
            remote: any_ipv4(),
            origin: RuleOrigin::EgressBaseline,
        });
    }

    debug!(rules = rules.len(), "synthesized policy rule set");
    Ok(rules)
}
