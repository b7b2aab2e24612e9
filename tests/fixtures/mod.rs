// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-topology
//!
//! Deterministic topology inputs for scenario tests. All names, CIDRs and
//! constants are fixed so compiled plans are reproducible; nothing here
//! touches the wall clock or mints identifiers.

use cim_topology::compiler::TopologyInput;
use cim_topology::domain::{
    AccessRequirement, AddressRequest, AvailabilityZone, ImageRef, PortRange, Protocol,
    RecordName, SpokeName, SpokeRequest, SubnetRequest, WorkloadSpec, ZoneName,
};

pub const ZONE: &str = "corp.local";
pub const IMAGE: &str = "ami-0f78f261d6135456a";

pub fn spoke_name(name: &str) -> SpokeName {
    SpokeName::new(name).expect("invalid spoke name in fixture")
}

pub fn record_name(name: &str) -> RecordName {
    RecordName::new(name).expect("invalid record name in fixture")
}

/// A spoke request with an explicit CIDR and a single subnet
pub fn explicit_spoke(
    name: &str,
    az: &str,
    cidr: &str,
    subnet_cidr: &str,
    workload: &str,
) -> SpokeRequest {
    SpokeRequest {
        name: spoke_name(name),
        availability_zone: AvailabilityZone::new(az).expect("invalid az in fixture"),
        address: AddressRequest::Cidr(cidr.parse().expect("invalid cidr in fixture")),
        subnets: vec![SubnetRequest {
            name: spoke_name("main"),
            request: AddressRequest::Cidr(
                subnet_cidr.parse().expect("invalid subnet cidr in fixture"),
            ),
        }],
        workload: WorkloadSpec {
            name: record_name(workload),
            image: ImageRef::new(IMAGE).expect("invalid image in fixture"),
            ports: vec![80],
            associate_public_ip: true,
            user_data: Some("#!/bin/bash\nsystemctl start nginx\n".to_string()),
        },
    }
}

/// A spoke request asking the allocator for a block of the given size
pub fn sized_spoke(name: &str, prefix_len: u8, workload: &str) -> SpokeRequest {
    SpokeRequest {
        name: spoke_name(name),
        availability_zone: AvailabilityZone::new("eu-west-1a").expect("invalid az in fixture"),
        address: AddressRequest::PrefixLen(prefix_len),
        subnets: vec![SubnetRequest {
            name: spoke_name("main"),
            request: AddressRequest::PrefixLen(24),
        }],
        workload: WorkloadSpec {
            name: record_name(workload),
            image: ImageRef::new(IMAGE).expect("invalid image in fixture"),
            ports: vec![80],
            associate_public_ip: true,
            user_data: None,
        },
    }
}

/// "Consumer may reach provider's workload on tcp/<port>"
pub fn tcp_requirement(consumer: &str, provider: &str, port: u16) -> AccessRequirement {
    AccessRequirement {
        consumer: spoke_name(consumer),
        provider: spoke_name(provider),
        protocol: Protocol::Tcp,
        port: PortRange::single(port),
    }
}

/// The canonical two-spoke topology: a (10.1.0.0/16) and b (10.2.0.0/16),
/// one requirement "b may reach a on tcp/80"
pub fn two_spoke_input() -> TopologyInput {
    TopologyInput {
        zone: ZoneName::new(ZONE).expect("invalid zone in fixture"),
        spokes: vec![
            explicit_spoke("a", "eu-west-1a", "10.1.0.0/16", "10.1.1.0/24", "instancea"),
            explicit_spoke("b", "eu-west-1b", "10.2.0.0/16", "10.2.1.0/24", "instanceb"),
        ],
        requirements: vec![tcp_requirement("b", "a", 80)],
    }
}
