// Copyright (c) 2025 - Cowboy AI, Inc.
//! Address Allocation Properties

use ipnet::Ipv4Net;
use proptest::prelude::*;

use cim_topology::compiler::{AllocationError, TopologyCompiler};
use cim_topology::domain::AddressRequest;
use cim_topology::errors::CompileError;
use cim_topology::plan::BlockOwner;

use super::{indexed_spoke, sized_input};

fn overlap(a: &Ipv4Net, b: &Ipv4Net) -> bool {
    a.contains(&b.network()) || b.contains(&a.network())
}

proptest! {
    /// No two spoke blocks in a successful plan ever intersect
    #[test]
    fn prop_spoke_blocks_disjoint(prefixes in prop::collection::vec(12u8..=24, 1..8)) {
        let plan = TopologyCompiler::default()
            .compile(&sized_input(&prefixes))
            .expect("sized requests always fit the default pool");

        let spoke_blocks: Vec<Ipv4Net> = plan
            .blocks
            .iter()
            .filter(|b| b.is_spoke_block())
            .map(|b| b.cidr)
            .collect();

        for (i, a) in spoke_blocks.iter().enumerate() {
            for b in spoke_blocks.iter().skip(i + 1) {
                prop_assert!(!overlap(a, b), "blocks {} and {} intersect", a, b);
            }
        }
    }

    /// Every subnet block is a strict subset of its spoke block
    #[test]
    fn prop_subnets_strictly_nested(prefixes in prop::collection::vec(12u8..=22, 1..8)) {
        let plan = TopologyCompiler::default()
            .compile(&sized_input(&prefixes))
            .expect("sized requests always fit the default pool");

        for block in plan.blocks.iter().filter(|b| !b.is_spoke_block()) {
            let BlockOwner::Subnet { spoke, .. } = &block.owner else {
                continue;
            };
            let spoke_cidr = plan
                .spoke(spoke)
                .expect("subnet owner exists in plan")
                .cidr;

            prop_assert!(spoke_cidr.contains(&block.cidr.network()));
            prop_assert!(block.cidr.prefix_len() > spoke_cidr.prefix_len());
        }
    }

    /// Explicit requests either produce a disjoint plan or abort with an
    /// allocation error; a plan with intersecting blocks never escapes
    #[test]
    fn prop_explicit_requests_never_yield_overlap(octets in prop::collection::vec(1u8..=6, 2..6)) {
        let mut input = sized_input(&vec![16; octets.len()]);
        for (request, octet) in input.spokes.iter_mut().zip(&octets) {
            request.address = AddressRequest::Cidr(
                format!("10.{}.0.0/16", octet).parse().expect("valid cidr"),
            );
            request.subnets[0].request = AddressRequest::Cidr(
                format!("10.{}.1.0/24", octet).parse().expect("valid cidr"),
            );
        }

        match TopologyCompiler::default().compile(&input) {
            Ok(plan) => {
                let blocks: Vec<Ipv4Net> = plan
                    .blocks
                    .iter()
                    .filter(|b| b.is_spoke_block())
                    .map(|b| b.cidr)
                    .collect();
                for (i, a) in blocks.iter().enumerate() {
                    for b in blocks.iter().skip(i + 1) {
                        prop_assert!(!overlap(a, b));
                    }
                }
            }
            Err(CompileError::Allocation(AllocationError::Overlap { .. })) => {
                // Duplicate octets collide; aborting is the correct outcome
            }
            Err(other) => {
                prop_assert!(false, "unexpected error: {}", other);
            }
        }
    }

    /// A pool too small for the requests aborts with exhaustion, never panics
    #[test]
    fn prop_small_pool_exhausts_cleanly(count in 2usize..6) {
        let mut compiler_input = sized_input(&vec![16; count]);
        // Shrink every spoke into a /16 pool that only fits one of them
        for request in &mut compiler_input.spokes {
            request.address = AddressRequest::PrefixLen(16);
        }

        let config = cim_topology::CompilerConfig {
            pool: "10.0.0.0/16".parse().expect("valid pool"),
            ..Default::default()
        };

        let result = TopologyCompiler::new(config).compile(&compiler_input);
        let matched = matches!(
            result,
            Err(CompileError::Allocation(AllocationError::PoolExhausted { .. }))
        );
        prop_assert!(matched);
    }
}

#[test]
fn indexed_spoke_requests_are_well_formed() {
    let request = indexed_spoke(3, 16);
    assert_eq!(request.name.as_str(), "s3");
    assert_eq!(request.subnets.len(), 1);
}
