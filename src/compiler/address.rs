// Copyright (c) 2025 - Cowboy AI, Inc.
//! Address Planner
//!
//! Assigns non-overlapping CIDR blocks to spokes and their subnets. Explicit
//! blocks are verified for pairwise non-overlap; size-only requests are
//! allocated from the configured pool largest-first (ties broken by name so
//! allocation is independent of declaration order), using a first-fit gap
//! search over a `BTreeMap` keyed by network address. Subnets are carved from
//! their spoke's block with the same allocator one level down.

use ipnet::Ipv4Net;
use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;
use thiserror::Error;
use tracing::debug;

use crate::domain::{AddressRequest, SpokeName, SpokeRequest};
use crate::plan::{AddressBlock, BlockOwner};

/// Address allocation failure; fatal, no partial plan is returned
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("address blocks overlap: {owner_a} ({cidr_a}) and {owner_b} ({cidr_b})")]
    Overlap {
        owner_a: String,
        cidr_a: Ipv4Net,
        owner_b: String,
        cidr_b: Ipv4Net,
    },

    #[error("address pool {pool} exhausted while allocating /{prefix_len} for {owner}")]
    PoolExhausted {
        owner: String,
        prefix_len: u8,
        pool: Ipv4Net,
    },

    #[error("subnet {spoke}/{subnet} ({cidr}) is not a strict subset of its spoke block {spoke_cidr}")]
    SubnetOutsideSpoke {
        spoke: SpokeName,
        subnet: SpokeName,
        cidr: Ipv4Net,
        spoke_cidr: Ipv4Net,
    },

    #[error("invalid prefix length /{prefix_len} requested for {owner}")]
    InvalidPrefix { owner: String, prefix_len: u8 },
}

/// Two CIDR blocks intersect iff one contains the other's network address
pub(crate) fn blocks_overlap(a: &Ipv4Net, b: &Ipv4Net) -> bool {
    a.contains(&b.network()) || b.contains(&a.network())
}

/// The assembled address plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressPlan {
    blocks: BTreeSet<AddressBlock>,
    spoke_cidrs: BTreeMap<SpokeName, Ipv4Net>,
    subnet_cidrs: BTreeMap<(SpokeName, SpokeName), Ipv4Net>,
}

impl AddressPlan {
    /// All assigned blocks
    pub fn blocks(&self) -> &BTreeSet<AddressBlock> {
        &self.blocks
    }

    /// The block assigned to a spoke
    pub fn spoke_cidr(&self, spoke: &SpokeName) -> Option<Ipv4Net> {
        self.spoke_cidrs.get(spoke).copied()
    }

    /// The block assigned to a subnet within a spoke
    pub fn subnet_cidr(&self, spoke: &SpokeName, subnet: &SpokeName) -> Option<Ipv4Net> {
        self.subnet_cidrs
            .get(&(spoke.clone(), subnet.clone()))
            .copied()
    }
}

/// One reserved block inside a [`BlockAllocator`]
#[derive(Debug, Clone)]
struct Reserved {
    cidr: Ipv4Net,
    owner: String,
}

/// First-fit CIDR allocator over one address space
///
/// Reserved blocks are keyed by network address so gap search walks them in
/// address order. Explicit blocks outside the space may be reserved too; they
/// participate in overlap checks but never constrain gap search.
#[derive(Debug, Clone)]
struct BlockAllocator {
    space: Ipv4Net,
    reserved: BTreeMap<u32, Reserved>,
}

impl BlockAllocator {
    fn new(space: Ipv4Net) -> Self {
        Self {
            space,
            reserved: BTreeMap::new(),
        }
    }

    /// Find any reserved block overlapping `cidr`
    fn find_overlap(&self, cidr: &Ipv4Net) -> Option<(Ipv4Net, String)> {
        self.reserved
            .values()
            .find(|r| blocks_overlap(&r.cidr, cidr))
            .map(|r| (r.cidr, r.owner.clone()))
    }

    /// Reserve an explicit block; the caller has already checked overlap
    fn reserve(&mut self, cidr: Ipv4Net, owner: String) {
        self.reserved
            .insert(u32::from(cidr.network()), Reserved { cidr, owner });
    }

    /// Round `addr` up to the next boundary of a /`prefix_len` block
    fn align_up(addr: u64, prefix_len: u8) -> u64 {
        let size = 1u64 << (32 - prefix_len);
        (addr + size - 1) & !(size - 1)
    }

    /// Allocate the first free /`prefix_len` block in the space
    fn allocate(&mut self, prefix_len: u8, owner: String) -> Option<Ipv4Net> {
        if prefix_len < self.space.prefix_len() || prefix_len > 32 {
            return None;
        }

        let size = 1u64 << (32 - prefix_len);
        let space_start = u64::from(u32::from(self.space.network()));
        let space_end = u64::from(u32::from(self.space.broadcast()));

        let mut cursor = space_start;

        for reserved in self.reserved.values() {
            let block_start = u64::from(u32::from(reserved.cidr.network()));
            let block_end = u64::from(u32::from(reserved.cidr.broadcast()));

            // Blocks entirely outside the space never constrain the search
            if block_end < space_start {
                continue;
            }
            if block_start > space_end {
                break;
            }

            if block_start > cursor {
                let aligned = Self::align_up(cursor, prefix_len);
                if aligned + size <= block_start && aligned + size - 1 <= space_end {
                    return self.take(aligned, prefix_len, owner);
                }
            }

            cursor = cursor.max(block_end + 1);
        }

        let aligned = Self::align_up(cursor, prefix_len);
        if aligned + size - 1 <= space_end {
            return self.take(aligned, prefix_len, owner);
        }

        None
    }

    fn take(&mut self, start: u64, prefix_len: u8, owner: String) -> Option<Ipv4Net> {
        let addr = Ipv4Addr::from(u32::try_from(start).ok()?);
        let cidr = Ipv4Net::new(addr, prefix_len).ok()?;
        self.reserve(cidr, owner);
        Some(cidr)
    }
}

/// Allocate non-overlapping blocks for every spoke and subnet
///
/// Explicit CIDRs are normalized (`trunc`) and verified against every block
/// reserved so far; size-only requests are then allocated largest-first.
pub fn plan(pool: Ipv4Net, requests: &[SpokeRequest]) -> Result<AddressPlan, AllocationError> {
    let mut allocator = BlockAllocator::new(pool);
    let mut plan = AddressPlan {
        blocks: BTreeSet::new(),
        spoke_cidrs: BTreeMap::new(),
        subnet_cidrs: BTreeMap::new(),
    };

    // Explicit blocks first: they are fixed points the allocator must respect.
    for request in requests {
        if let AddressRequest::Cidr(cidr) = request.address {
            let cidr = cidr.trunc();
            reserve_spoke(&mut allocator, &mut plan, &request.name, cidr)?;
        }
    }

    // Size-only requests, largest block first; name breaks ties so the
    // outcome is independent of declaration order.
    let mut sized: Vec<(&SpokeName, u8)> = requests
        .iter()
        .filter_map(|r| match r.address {
            AddressRequest::PrefixLen(len) => Some((&r.name, len)),
            AddressRequest::Cidr(_) => None,
        })
        .collect();
    sized.sort_by_key(|(name, len)| (*len, (*name).clone()));

    for (name, prefix_len) in sized {
        validate_prefix(name.as_str(), prefix_len)?;
        let cidr = allocator
            .allocate(prefix_len, format!("spoke:{}", name))
            .ok_or_else(|| AllocationError::PoolExhausted {
                owner: format!("spoke:{}", name),
                prefix_len,
                pool,
            })?;
        debug!(spoke = %name, %cidr, "allocated spoke block");
        record_spoke(&mut plan, name, cidr);
    }

    // Carve subnets from each spoke block, same scheme one level down.
    for request in requests {
        let spoke_cidr = plan.spoke_cidrs[&request.name];
        plan_subnets(&mut plan, request, spoke_cidr)?;
    }

    Ok(plan)
}

fn reserve_spoke(
    allocator: &mut BlockAllocator,
    plan: &mut AddressPlan,
    name: &SpokeName,
    cidr: Ipv4Net,
) -> Result<(), AllocationError> {
    let owner = format!("spoke:{}", name);

    if let Some((other_cidr, other_owner)) = allocator.find_overlap(&cidr) {
        return Err(AllocationError::Overlap {
            owner_a: other_owner,
            cidr_a: other_cidr,
            owner_b: owner,
            cidr_b: cidr,
        });
    }

    allocator.reserve(cidr, owner);
    debug!(spoke = %name, %cidr, "reserved explicit spoke block");
    record_spoke(plan, name, cidr);
    Ok(())
}

fn record_spoke(plan: &mut AddressPlan, name: &SpokeName, cidr: Ipv4Net) {
    plan.spoke_cidrs.insert(name.clone(), cidr);
    plan.blocks.insert(AddressBlock {
        owner: BlockOwner::Spoke {
            spoke: name.clone(),
        },
        cidr,
    });
}

fn plan_subnets(
    plan: &mut AddressPlan,
    request: &SpokeRequest,
    spoke_cidr: Ipv4Net,
) -> Result<(), AllocationError> {
    let mut allocator = BlockAllocator::new(spoke_cidr);

    for subnet in &request.subnets {
        if let AddressRequest::Cidr(cidr) = subnet.request {
            let cidr = cidr.trunc();

            if !strict_subset(&cidr, &spoke_cidr) {
                return Err(AllocationError::SubnetOutsideSpoke {
                    spoke: request.name.clone(),
                    subnet: subnet.name.clone(),
                    cidr,
                    spoke_cidr,
                });
            }

            let owner = format!("subnet:{}/{}", request.name, subnet.name);
            if let Some((other_cidr, other_owner)) = allocator.find_overlap(&cidr) {
                return Err(AllocationError::Overlap {
                    owner_a: other_owner,
                    cidr_a: other_cidr,
                    owner_b: owner,
                    cidr_b: cidr,
                });
            }

            allocator.reserve(cidr, owner);
            record_subnet(plan, &request.name, &subnet.name, cidr);
        }
    }

    let mut sized: Vec<(&SpokeName, u8)> = request
        .subnets
        .iter()
        .filter_map(|s| match s.request {
            AddressRequest::PrefixLen(len) => Some((&s.name, len)),
            AddressRequest::Cidr(_) => None,
        })
        .collect();
    sized.sort_by_key(|(name, len)| (*len, (*name).clone()));

    for (name, prefix_len) in sized {
        validate_prefix(&format!("{}/{}", request.name, name), prefix_len)?;

        if prefix_len <= spoke_cidr.prefix_len() {
            return Err(AllocationError::InvalidPrefix {
                owner: format!("subnet:{}/{}", request.name, name),
                prefix_len,
            });
        }

        let owner = format!("subnet:{}/{}", request.name, name);
        let cidr = allocator.allocate(prefix_len, owner.clone()).ok_or_else(|| {
            AllocationError::PoolExhausted {
                owner,
                prefix_len,
                pool: spoke_cidr,
            }
        })?;
        debug!(spoke = %request.name, subnet = %name, %cidr, "allocated subnet block");
        record_subnet(plan, &request.name, name, cidr);
    }

    Ok(())
}

fn record_subnet(plan: &mut AddressPlan, spoke: &SpokeName, subnet: &SpokeName, cidr: Ipv4Net) {
    plan.subnet_cidrs
        .insert((spoke.clone(), subnet.clone()), cidr);
    plan.blocks.insert(AddressBlock {
        owner: BlockOwner::Subnet {
            spoke: spoke.clone(),
            subnet: subnet.clone(),
        },
        cidr,
    });
}

fn strict_subset(inner: &Ipv4Net, outer: &Ipv4Net) -> bool {
    outer.contains(&inner.network()) && inner.prefix_len() > outer.prefix_len()
}

fn validate_prefix(owner: &str, prefix_len: u8) -> Result<(), AllocationError> {
    if prefix_len == 0 || prefix_len > 30 {
        return Err(AllocationError::InvalidPrefix {
            owner: owner.to_string(),
            prefix_len,
        });
    }
    Ok(())
}
