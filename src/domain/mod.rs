// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Domain Models
//!
//! Core domain concepts for hub-and-spoke topology planning: spoke
//! declarations, access requirements, and DNS names, all modeled as immutable
//! value objects validated on construction.
//!
//! # Value Objects with Invariants
//!
//! - [`SpokeName`] - lowercase DNS-label-safe spoke identifiers
//! - [`AvailabilityZone`] / [`ImageRef`] - opaque, non-empty placement inputs
//! - [`AddressRequest`] - explicit CIDR or desired prefix length
//! - [`Protocol`] / [`PortRange`] - policy rule building blocks
//! - [`ZoneName`] / [`RecordName`] - RFC 1123 validated DNS names
//!
//! # Declarations
//!
//! - [`SpokeRequest`] - immutable spoke declaration (input)
//! - [`Spoke`] - spoke with its assigned address space (planned)
//! - [`AccessRequirement`] - declared consumer → provider reachability

pub mod access;
pub mod dns;
pub mod spoke;

pub use access::{AccessError, AccessRequirement, PortRange, Protocol};
pub use dns::{DnsNameError, RecordName, ZoneName};
pub use spoke::{
    AddressRequest, AvailabilityZone, ImageRef, Spoke, SpokeError, SpokeName, SpokeRequest,
    Subnet, SubnetRequest, WorkloadSpec,
};
