// Copyright (c) 2025 - Cowboy AI, Inc.
//! Route, Policy, and DNS Synthesis Properties

use std::collections::BTreeSet;

use proptest::prelude::*;

use cim_topology::compiler::{TopologyCompiler, TopologyInput};
use cim_topology::domain::{AccessRequirement, PortRange, Protocol, SpokeName};
use cim_topology::plan::NextHop;

use super::sized_input;

/// Distinct requirements between indexed spokes `s0..s<count>`
fn requirements_strategy(
    spoke_count: usize,
) -> impl Strategy<Value = Vec<AccessRequirement>> {
    prop::collection::btree_set(
        (0..spoke_count, 0..spoke_count, 1u16..1024).prop_map(|(c, p, port)| {
            AccessRequirement {
                consumer: SpokeName::new(format!("s{}", c)).expect("generated name"),
                provider: SpokeName::new(format!("s{}", p)).expect("generated name"),
                protocol: Protocol::Tcp,
                port: PortRange::single(port),
            }
        }),
        1..6,
    )
    .prop_map(|set| set.into_iter().collect())
}

/// A topology input with generated requirements plus one victim index to drop
fn injective_case() -> impl Strategy<Value = (TopologyInput, usize)> {
    (2usize..5)
        .prop_flat_map(|n| (Just(n), requirements_strategy(n)))
        .prop_flat_map(|(n, requirements)| {
            let len = requirements.len();
            (Just(n), Just(requirements), 0..len)
        })
        .prop_map(|(n, requirements, victim)| {
            let mut input = sized_input(&vec![16; n]);
            input.requirements = requirements;
            (input, victim)
        })
}

proptest! {
    /// N spokes yield exactly N default routes and N·(N−1) hub routes
    #[test]
    fn prop_route_cardinality(prefixes in prop::collection::vec(14u8..=24, 2..7)) {
        let n = prefixes.len();
        let plan = TopologyCompiler::default()
            .compile(&sized_input(&prefixes))
            .expect("sized requests always fit the default pool");

        prop_assert_eq!(plan.routes.len(), n + n * (n - 1));
        prop_assert_eq!(plan.routes.iter().filter(|r| r.is_default()).count(), n);
        prop_assert_eq!(
            plan.routes.iter().filter(|r| r.next_hop == NextHop::Hub).count(),
            n * (n - 1)
        );

        // Every ordered pair of distinct spokes is covered exactly once
        for spoke in &plan.spokes {
            for peer in &plan.spokes {
                if spoke.name == peer.name {
                    continue;
                }
                let covering = plan
                    .routes_for(&spoke.name)
                    .filter(|r| r.next_hop == NextHop::Hub
                        && r.destination.contains(&peer.cidr.network()))
                    .count();
                prop_assert_eq!(covering, 1);
            }
        }
    }

    /// Policy synthesis is injective: dropping one requirement removes exactly
    /// one peer-derived ingress rule and leaves everything else untouched
    #[test]
    fn prop_policy_injective_on_requirements((mut input, victim) in injective_case()) {
        let compiler = TopologyCompiler::default();
        let with = compiler.compile(&input).expect("valid generated input");

        let removed_requirement = input.requirements.remove(victim);
        let without = compiler.compile(&input).expect("valid generated input");

        prop_assert_eq!(with.rules.len(), without.rules.len() + 1);

        let removed: Vec<_> = with.rules.difference(&without.rules).collect();
        prop_assert_eq!(removed.len(), 1);
        prop_assert!(removed[0].is_peer_rule());
        prop_assert_eq!(&removed[0].spoke, &removed_requirement.provider);
        prop_assert_eq!(removed[0].ports, removed_requirement.port);

        // Nothing appeared that was not there before
        let added: Vec<_> = without.rules.difference(&with.rules).collect();
        prop_assert!(added.is_empty());
    }

    /// Record names are unique and compilation is byte-identical on repeat
    #[test]
    fn prop_dns_unique_and_compilation_deterministic(
        prefixes in prop::collection::vec(14u8..=24, 1..7)
    ) {
        let input = sized_input(&prefixes);
        let compiler = TopologyCompiler::default();

        let first = compiler.compile(&input).expect("valid generated input");
        let second = compiler.compile(&input).expect("valid generated input");

        prop_assert_eq!(
            first.to_canonical_json().expect("plan serializes"),
            second.to_canonical_json().expect("plan serializes")
        );

        let names: BTreeSet<_> = first.records.iter().map(|r| &r.name).collect();
        prop_assert_eq!(names.len(), first.records.len());
        prop_assert_eq!(first.records.len(), first.spokes.len());
    }
}
