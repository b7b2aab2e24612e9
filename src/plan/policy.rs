// Copyright (c) 2025 - Cowboy AI, Inc.
//! Security Policy Plan Artifacts

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{PortRange, Protocol, SpokeName};

/// Traffic direction for a policy rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Ingress,
    Egress,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ingress => write!(f, "ingress"),
            Direction::Egress => write!(f, "egress"),
        }
    }
}

/// Why a rule exists
///
/// Peer-derived, management, and egress-baseline rules are tagged separately
/// so that removing a peer relationship can never remove management access,
/// and validation can match peer rules one-to-one against requirements.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOrigin {
    /// Derived from a declared access requirement; records the consumer
    PeerAccess { consumer: SpokeName },
    /// Always-present administrative access
    Management,
    /// The per-spoke allow-all egress baseline
    EgressBaseline,
}

/// A single security policy rule on a spoke
///
/// `remote` is the source CIDR for ingress rules and the destination CIDR for
/// egress rules. Egress is allow-all by documented design choice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PolicyRule {
    pub spoke: SpokeName,
    pub direction: Direction,
    pub protocol: Protocol,
    pub ports: PortRange,
    pub remote: Ipv4Net,
    pub origin: RuleOrigin,
}

impl PolicyRule {
    /// Whether this rule was derived from an access requirement
    pub fn is_peer_rule(&self) -> bool {
        matches!(self.origin, RuleOrigin::PeerAccess { .. })
    }
}

impl fmt::Display for PolicyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {}/{} {}",
            self.spoke, self.direction, self.protocol, self.ports, self.remote
        )
    }
}
