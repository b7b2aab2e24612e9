// Copyright (c) 2025 - Cowboy AI, Inc.
//! End-to-End Compiler Scenarios
//!
//! Drives the full pipeline against deterministic fixtures: the canonical
//! two-spoke topology, degenerate single-spoke topologies, and the negative
//! scenarios that must abort without producing a plan.

mod fixtures;

use std::net::Ipv4Addr;

use pretty_assertions::assert_eq;
use test_case::test_case;

use cim_topology::compiler::{TopologyCompiler, TopologyInput};
use cim_topology::domain::ZoneName;
use cim_topology::errors::CompileError;
use cim_topology::plan::{Direction, NextHop, RecordTarget, Route, RuleOrigin};
use cim_topology::service::{
    FixedOffsetProvisioner, InMemoryEngine, OrchestrationEngine,
};

use fixtures::{
    explicit_spoke, record_name, sized_spoke, spoke_name, tcp_requirement, two_spoke_input,
};

#[test]
fn test_two_spoke_routes() {
    let plan = TopologyCompiler::default()
        .compile(&two_spoke_input())
        .unwrap();

    let a = spoke_name("a");
    let b = spoke_name("b");

    let expected: Vec<Route> = vec![
        Route {
            spoke: a.clone(),
            destination: Route::default_destination(),
            next_hop: NextHop::LocalEgress,
        },
        Route {
            spoke: a,
            destination: "10.2.0.0/16".parse().unwrap(),
            next_hop: NextHop::Hub,
        },
        Route {
            spoke: b.clone(),
            destination: Route::default_destination(),
            next_hop: NextHop::LocalEgress,
        },
        Route {
            spoke: b,
            destination: "10.1.0.0/16".parse().unwrap(),
            next_hop: NextHop::Hub,
        },
    ];

    let actual: Vec<Route> = plan.routes.iter().cloned().collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_two_spoke_policy() {
    let plan = TopologyCompiler::default()
        .compile(&two_spoke_input())
        .unwrap();

    let a = spoke_name("a");
    let b = spoke_name("b");

    // Provider-side ingress derived from "b may reach a on tcp/80"
    let peer_rules: Vec<_> = plan.rules.iter().filter(|r| r.is_peer_rule()).collect();
    assert_eq!(peer_rules.len(), 1);
    assert_eq!(peer_rules[0].spoke, a);
    assert_eq!(peer_rules[0].direction, Direction::Ingress);
    assert_eq!(peer_rules[0].remote.to_string(), "10.2.0.0/16");
    assert_eq!(
        peer_rules[0].origin,
        RuleOrigin::PeerAccess { consumer: b.clone() }
    );

    // Allow-all egress on both spokes
    for spoke in [&a, &b] {
        assert_eq!(
            plan.rules_for(spoke)
                .filter(|r| r.origin == RuleOrigin::EgressBaseline
                    && r.direction == Direction::Egress)
                .count(),
            1
        );
    }

    // Management ingress on both spokes, admitting the world on tcp/22
    for spoke in [&a, &b] {
        let management: Vec<_> = plan
            .rules_for(spoke)
            .filter(|r| r.origin == RuleOrigin::Management)
            .collect();
        assert_eq!(management.len(), 1);
        assert_eq!(management[0].remote.to_string(), "0.0.0.0/0");
        assert_eq!(management[0].ports.start(), 22);
    }
}

#[test]
fn test_two_spoke_dns() {
    let plan = TopologyCompiler::default()
        .compile(&two_spoke_input())
        .unwrap();

    assert_eq!(plan.zone.name.as_str(), fixtures::ZONE);
    assert_eq!(plan.zone.networks.len(), 2);
    assert_eq!(plan.records.len(), 2);

    let record_a = plan
        .records
        .iter()
        .find(|r| r.name == record_name("instancea"))
        .unwrap();
    assert_eq!(
        record_a.target,
        RecordTarget::WorkloadAddress {
            spoke: spoke_name("a")
        }
    );
    assert_eq!(record_a.ttl, 60);
    assert_eq!(record_a.name.fqdn(&plan.zone.name), "instancea.corp.local");
}

#[test]
fn test_workload_placements_carry_subnet_and_image() {
    let plan = TopologyCompiler::default()
        .compile(&two_spoke_input())
        .unwrap();

    assert_eq!(plan.workloads.len(), 2);

    let placement_a = &plan.workloads[0];
    assert_eq!(placement_a.spoke, spoke_name("a"));
    assert_eq!(placement_a.subnet_cidr.to_string(), "10.1.1.0/24");
    assert_eq!(placement_a.image.as_str(), fixtures::IMAGE);
    assert_eq!(placement_a.availability_zone.as_str(), "eu-west-1a");
    assert!(placement_a.associate_public_ip);
}

#[test]
fn test_explicit_overlap_aborts_without_plan() {
    let input = TopologyInput {
        zone: ZoneName::new(fixtures::ZONE).unwrap(),
        spokes: vec![
            explicit_spoke("a", "eu-west-1a", "10.1.0.0/16", "10.1.1.0/24", "instancea"),
            explicit_spoke("b", "eu-west-1b", "10.1.0.0/16", "10.1.2.0/24", "instanceb"),
        ],
        requirements: vec![],
    };

    let err = TopologyCompiler::default().compile(&input).unwrap_err();
    assert!(matches!(err, CompileError::Allocation(_)));
}

#[test]
fn test_unknown_spoke_in_requirement_aborts() {
    let mut input = two_spoke_input();
    input.requirements.push(tcp_requirement("ghost", "a", 443));

    let err = TopologyCompiler::default().compile(&input).unwrap_err();
    assert!(matches!(err, CompileError::Policy(_)));
}

#[test]
fn test_duplicate_workload_name_aborts() {
    let input = TopologyInput {
        zone: ZoneName::new(fixtures::ZONE).unwrap(),
        spokes: vec![
            explicit_spoke("a", "eu-west-1a", "10.1.0.0/16", "10.1.1.0/24", "web"),
            explicit_spoke("b", "eu-west-1b", "10.2.0.0/16", "10.2.1.0/24", "web"),
        ],
        requirements: vec![],
    };

    let err = TopologyCompiler::default().compile(&input).unwrap_err();
    assert!(matches!(err, CompileError::Dns(_)));
}

#[test]
fn test_single_spoke_degenerate_topology() {
    let input = TopologyInput {
        zone: ZoneName::new(fixtures::ZONE).unwrap(),
        spokes: vec![explicit_spoke(
            "only",
            "eu-west-1a",
            "10.1.0.0/16",
            "10.1.1.0/24",
            "instance",
        )],
        requirements: vec![],
    };

    let plan = TopologyCompiler::default().compile(&input).unwrap();
    assert_eq!(plan.hub.attachments.len(), 1);
    assert_eq!(plan.routes.len(), 1); // default route only, no peer traffic
    assert!(plan.routes.iter().next().unwrap().is_default());
}

#[test_case(1 ; "one spoke")]
#[test_case(2 ; "two spokes")]
#[test_case(3 ; "three spokes")]
#[test_case(5 ; "five spokes")]
fn test_route_cardinality(n: usize) {
    let input = TopologyInput {
        zone: ZoneName::new(fixtures::ZONE).unwrap(),
        spokes: (0..n)
            .map(|i| sized_spoke(&format!("s{}", i), 16, &format!("instance{}", i)))
            .collect(),
        requirements: vec![],
    };

    let plan = TopologyCompiler::default().compile(&input).unwrap();
    assert_eq!(plan.routes.len(), n + n * (n - 1));
    assert_eq!(plan.routes.iter().filter(|r| r.is_default()).count(), n);
    assert_eq!(
        plan.routes
            .iter()
            .filter(|r| r.next_hop == NextHop::Hub)
            .count(),
        n * (n - 1)
    );
}

#[test]
fn test_compile_is_idempotent() {
    let compiler = TopologyCompiler::default();
    let first = compiler.compile(&two_spoke_input()).unwrap();
    let second = compiler.compile(&two_spoke_input()).unwrap();

    assert_eq!(
        first.to_canonical_json().unwrap(),
        second.to_canonical_json().unwrap()
    );
}

#[test]
fn test_plan_independent_of_declaration_order() {
    let forward = two_spoke_input();
    let mut reverse = two_spoke_input();
    reverse.spokes.reverse();

    let compiler = TopologyCompiler::default();
    assert_eq!(
        compiler.compile(&forward).unwrap().to_canonical_json().unwrap(),
        compiler.compile(&reverse).unwrap().to_canonical_json().unwrap()
    );
}

#[test]
fn test_removing_requirement_removes_exactly_one_rule() {
    let compiler = TopologyCompiler::default();

    let with = compiler.compile(&two_spoke_input()).unwrap();

    let mut input = two_spoke_input();
    input.requirements.clear();
    let without = compiler.compile(&input).unwrap();

    assert_eq!(with.rules.len(), without.rules.len() + 1);
    let removed: Vec<_> = with.rules.difference(&without.rules).collect();
    assert_eq!(removed.len(), 1);
    assert!(removed[0].is_peer_rule());

    // Management access is untouched by the peer change
    assert_eq!(
        without
            .rules
            .iter()
            .filter(|r| r.origin == RuleOrigin::Management)
            .count(),
        2
    );
}

#[tokio::test]
async fn test_compile_then_apply_end_to_end() {
    let plan = TopologyCompiler::default()
        .compile(&two_spoke_input())
        .unwrap();

    let engine = InMemoryEngine::new(FixedOffsetProvisioner::default());
    let applied = engine.apply(&plan).await.unwrap();

    // Workload addresses come from each spoke's subnet, offset 5
    assert_eq!(
        applied.workload_addresses[&spoke_name("a")],
        Ipv4Addr::new(10, 1, 1, 5)
    );
    assert_eq!(
        applied.workload_addresses[&spoke_name("b")],
        Ipv4Addr::new(10, 2, 1, 5)
    );

    // Every record resolved, one export per workload/record plus hub and zone
    assert!(applied.records.iter().all(|r| !r.target.is_pending()));
    assert_eq!(applied.exports.flatten().len(), 6);
}
