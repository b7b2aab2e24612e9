// Copyright (c) 2025 - Cowboy AI, Inc.
//! Global Plan Invariants
//!
//! Pure re-validation of the assembled plan before it is handed to the
//! orchestration engine. Each synthesizer already enforces its own contract;
//! these checks hold across component boundaries so that no half-correct
//! topology can escape compilation.
//!
//! # Invariant Categories
//!
//! 1. **Address invariants**: spoke blocks disjoint, subnets strictly nested
//! 2. **Route invariants**: one default per spoke, every ordered pair covered
//! 3. **Policy invariants**: requirements and peer rules in bijection
//! 4. **DNS invariants**: record names unique, one record per workload
//! 5. **Structural invariants**: hub attaches every spoke, one egress each

use ipnet::Ipv4Net;
use thiserror::Error;
use tracing::debug;

use crate::compiler::address::blocks_overlap;
use crate::domain::{AccessRequirement, RecordName, SpokeName};
use crate::plan::{Direction, NextHop, RecordTarget, RuleOrigin, TopologyPlan};

/// Validation result with detailed error information
pub type ValidationResult = Result<(), ValidationError>;

/// A global invariant violated by the assembled plan
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("spoke blocks overlap: {spoke_a} ({cidr_a}) and {spoke_b} ({cidr_b})")]
    SpokeBlocksOverlap {
        spoke_a: SpokeName,
        cidr_a: Ipv4Net,
        spoke_b: SpokeName,
        cidr_b: Ipv4Net,
    },

    #[error("subnet block {cidr} of {spoke} is not strictly inside its spoke block {spoke_cidr}")]
    SubnetNotNested {
        spoke: SpokeName,
        cidr: Ipv4Net,
        spoke_cidr: Ipv4Net,
    },

    #[error("spoke {spoke} has {count} default routes, expected exactly one")]
    DefaultRouteCardinality { spoke: SpokeName, count: usize },

    #[error("no hub route from {from} covering {to} ({to_cidr})")]
    MissingHubRoute {
        from: SpokeName,
        to: SpokeName,
        to_cidr: Ipv4Net,
    },

    #[error("expected {expected} hub routes for {spokes} spokes, found {actual}")]
    HubRouteCardinality {
        spokes: usize,
        expected: usize,
        actual: usize,
    },

    #[error("access requirement not realized as an ingress rule: {requirement}")]
    UnrealizedRequirement { requirement: String },

    #[error("orphaned peer rule on {spoke} admitting {remote} with no matching requirement")]
    OrphanedPeerRule { spoke: SpokeName, remote: Ipv4Net },

    #[error("duplicate DNS record name: {name}")]
    DuplicateRecordName { name: RecordName },

    #[error("spoke {spoke} workload has {count} DNS records, expected exactly one")]
    WorkloadRecordCardinality { spoke: SpokeName, count: usize },

    #[error("hub attachment set does not match the spoke set: {detail}")]
    HubAttachmentMismatch { detail: String },

    #[error("spoke {spoke} has no internet egress point")]
    MissingEgress { spoke: SpokeName },
}

/// Validate every global invariant; first violation aborts
pub fn plan(plan: &TopologyPlan, requirements: &[AccessRequirement]) -> ValidationResult {
    validate_addresses(plan)?;
    validate_structure(plan)?;
    validate_routes(plan)?;
    validate_policy(plan, requirements)?;
    validate_dns(plan)?;
    debug!("plan passed global validation");
    Ok(())
}

/// Spoke blocks pairwise disjoint; every subnet strictly nested in its spoke
fn validate_addresses(plan: &TopologyPlan) -> ValidationResult {
    for (i, a) in plan.spokes.iter().enumerate() {
        for b in plan.spokes.iter().skip(i + 1) {
            if blocks_overlap(&a.cidr, &b.cidr) {
                return Err(ValidationError::SpokeBlocksOverlap {
                    spoke_a: a.name.clone(),
                    cidr_a: a.cidr,
                    spoke_b: b.name.clone(),
                    cidr_b: b.cidr,
                });
            }
        }

        for subnet in &a.subnets {
            let nested = a.cidr.contains(&subnet.cidr.network())
                && subnet.cidr.prefix_len() > a.cidr.prefix_len();
            if !nested {
                return Err(ValidationError::SubnetNotNested {
                    spoke: a.name.clone(),
                    cidr: subnet.cidr,
                    spoke_cidr: a.cidr,
                });
            }
        }
    }
    Ok(())
}

/// Hub attaches exactly the spoke set; every spoke has an egress point
fn validate_structure(plan: &TopologyPlan) -> ValidationResult {
    let attached: Vec<&SpokeName> = plan.hub.attachments.iter().map(|a| &a.spoke).collect();

    if attached.len() != plan.spokes.len() {
        return Err(ValidationError::HubAttachmentMismatch {
            detail: format!(
                "{} attachments for {} spokes",
                attached.len(),
                plan.spokes.len()
            ),
        });
    }

    for spoke in &plan.spokes {
        if !plan.hub.is_attached(&spoke.name) {
            return Err(ValidationError::HubAttachmentMismatch {
                detail: format!("spoke {} is not attached", spoke.name),
            });
        }

        if !plan.egress.iter().any(|e| e.spoke == spoke.name) {
            return Err(ValidationError::MissingEgress {
                spoke: spoke.name.clone(),
            });
        }
    }

    Ok(())
}

/// One default route per spoke; one hub route covering every ordered pair
fn validate_routes(plan: &TopologyPlan) -> ValidationResult {
    let n = plan.spokes.len();

    for spoke in &plan.spokes {
        let defaults = plan
            .routes_for(&spoke.name)
            .filter(|r| r.is_default() && r.next_hop == NextHop::LocalEgress)
            .count();
        if defaults != 1 {
            return Err(ValidationError::DefaultRouteCardinality {
                spoke: spoke.name.clone(),
                count: defaults,
            });
        }

        for peer in &plan.spokes {
            if peer.name == spoke.name {
                continue;
            }

            let covering = plan
                .routes_for(&spoke.name)
                .filter(|r| {
                    r.next_hop == NextHop::Hub && r.destination.contains(&peer.cidr.network())
                })
                .count();
            if covering != 1 {
                return Err(ValidationError::MissingHubRoute {
                    from: spoke.name.clone(),
                    to: peer.name.clone(),
                    to_cidr: peer.cidr,
                });
            }
        }
    }

    let hub_routes = plan
        .routes
        .iter()
        .filter(|r| r.next_hop == NextHop::Hub)
        .count();
    let expected = n * n.saturating_sub(1);
    if hub_routes != expected {
        return Err(ValidationError::HubRouteCardinality {
            spokes: n,
            expected,
            actual: hub_routes,
        });
    }

    Ok(())
}

/// Peer-derived ingress rules and requirements are in bijection
fn validate_policy(plan: &TopologyPlan, requirements: &[AccessRequirement]) -> ValidationResult {
    for requirement in requirements {
        let consumer_cidr = plan
            .spoke(&requirement.consumer)
            .map(|s| s.cidr);

        let realized = plan
            .rules_for(&requirement.provider)
            .filter(|r| {
                r.direction == Direction::Ingress
                    && r.protocol == requirement.protocol
                    && r.ports == requirement.port
                    && Some(r.remote) == consumer_cidr
                    && r.origin
                        == RuleOrigin::PeerAccess {
                            consumer: requirement.consumer.clone(),
                        }
            })
            .count();

        if realized != 1 {
            return Err(ValidationError::UnrealizedRequirement {
                requirement: requirement.to_string(),
            });
        }
    }

    for rule in plan.rules.iter().filter(|r| r.is_peer_rule()) {
        let RuleOrigin::PeerAccess { consumer } = &rule.origin else {
            continue;
        };

        let matched = requirements.iter().any(|req| {
            req.provider == rule.spoke
                && &req.consumer == consumer
                && req.protocol == rule.protocol
                && req.port == rule.ports
        });

        if !matched {
            return Err(ValidationError::OrphanedPeerRule {
                spoke: rule.spoke.clone(),
                remote: rule.remote,
            });
        }
    }

    Ok(())
}

/// Record names unique; exactly one record per spoke workload
fn validate_dns(plan: &TopologyPlan) -> ValidationResult {
    let mut names = std::collections::BTreeSet::new();
    for record in &plan.records {
        if !names.insert(&record.name) {
            return Err(ValidationError::DuplicateRecordName {
                name: record.name.clone(),
            });
        }
    }

    for spoke in &plan.spokes {
        let count = plan
            .records
            .iter()
            .filter(|r| {
                r.target
                    == RecordTarget::WorkloadAddress {
                        spoke: spoke.name.clone(),
                    }
            })
            .count();
        if count != 1 {
            return Err(ValidationError::WorkloadRecordCardinality {
                spoke: spoke.name.clone(),
                count,
            });
        }
    }

    Ok(())
}
