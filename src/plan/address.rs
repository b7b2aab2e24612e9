// Copyright (c) 2025 - Cowboy AI, Inc.
//! Address Block Plan Artifacts

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::SpokeName;

/// The entity an address block is assigned to
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockOwner {
    /// The block covers an entire spoke
    Spoke { spoke: SpokeName },
    /// The block covers one subnet within a spoke
    Subnet { spoke: SpokeName, subnet: SpokeName },
}

impl fmt::Display for BlockOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockOwner::Spoke { spoke } => write!(f, "spoke:{}", spoke),
            BlockOwner::Subnet { spoke, subnet } => write!(f, "subnet:{}/{}", spoke, subnet),
        }
    }
}

/// A CIDR prefix plus the entity it is assigned to
///
/// Invariants (enforced by the address planner and re-checked at plan
/// validation): blocks of different spokes never overlap; a subnet block is a
/// strict subset of its spoke block.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AddressBlock {
    pub owner: BlockOwner,
    pub cidr: Ipv4Net,
}

impl AddressBlock {
    /// Spoke this block belongs to (directly or through its subnet)
    pub fn spoke(&self) -> &SpokeName {
        match &self.owner {
            BlockOwner::Spoke { spoke } => spoke,
            BlockOwner::Subnet { spoke, .. } => spoke,
        }
    }

    /// Whether this is a spoke-level block
    pub fn is_spoke_block(&self) -> bool {
        matches!(self.owner, BlockOwner::Spoke { .. })
    }
}

impl fmt::Display for AddressBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.owner, self.cidr)
    }
}
