// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property Test Modules

mod allocation;
mod synthesis;

use cim_topology::compiler::TopologyInput;
use cim_topology::domain::{
    AddressRequest, AvailabilityZone, ImageRef, RecordName, SpokeName, SpokeRequest,
    SubnetRequest, WorkloadSpec, ZoneName,
};

/// A sized spoke request named by index; subnets are one prefix level down
pub fn indexed_spoke(index: usize, prefix_len: u8) -> SpokeRequest {
    let subnet_prefix = (prefix_len + 8).min(30);
    SpokeRequest {
        name: SpokeName::new(format!("s{}", index)).expect("generated spoke name"),
        availability_zone: AvailabilityZone::new("eu-west-1a").expect("fixed az"),
        address: AddressRequest::PrefixLen(prefix_len),
        subnets: vec![SubnetRequest {
            name: SpokeName::new("main").expect("fixed subnet name"),
            request: AddressRequest::PrefixLen(subnet_prefix),
        }],
        workload: WorkloadSpec {
            name: RecordName::new(format!("instance{}", index)).expect("generated record name"),
            image: ImageRef::new("ami-test").expect("fixed image"),
            ports: vec![80],
            associate_public_ip: true,
            user_data: None,
        },
    }
}

/// Input with `prefixes.len()` sized spokes
pub fn sized_input(prefixes: &[u8]) -> TopologyInput {
    TopologyInput {
        zone: ZoneName::new("corp.local").expect("fixed zone"),
        spokes: prefixes
            .iter()
            .enumerate()
            .map(|(i, &p)| indexed_spoke(i, p))
            .collect(),
        requirements: vec![],
    }
}
