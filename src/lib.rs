//! Hub-and-spoke network topology compiler
//!
//! Given a set of spoke declarations and access requirements, this crate
//! deterministically derives non-overlapping address allocations, per-spoke
//! routing tables, minimal symmetric security policy, and a shared private
//! DNS namespace, composed into a single validated [`plan::TopologyPlan`].
//! Realizing the plan against a cloud control plane is delegated to an
//! external orchestration engine behind the [`service`] ports; the compiler
//! itself is purely computational.
//!
//! ```rust
//! use cim_topology::compiler::{TopologyCompiler, TopologyInput};
//! use cim_topology::domain::{
//!     AddressRequest, AvailabilityZone, ImageRef, RecordName, SpokeName, SpokeRequest,
//!     SubnetRequest, WorkloadSpec, ZoneName,
//! };
//!
//! let input = TopologyInput {
//!     zone: ZoneName::new("corp.local").unwrap(),
//!     spokes: vec![SpokeRequest {
//!         name: SpokeName::new("a").unwrap(),
//!         availability_zone: AvailabilityZone::new("eu-west-1a").unwrap(),
//!         address: AddressRequest::Cidr("10.1.0.0/16".parse().unwrap()),
//!         subnets: vec![SubnetRequest {
//!             name: SpokeName::new("main").unwrap(),
//!             request: AddressRequest::Cidr("10.1.1.0/24".parse().unwrap()),
//!         }],
//!         workload: WorkloadSpec {
//!             name: RecordName::new("instancea").unwrap(),
//!             image: ImageRef::new("ami-0f78f261d6135456a").unwrap(),
//!             ports: vec![80],
//!             associate_public_ip: true,
//!             user_data: None,
//!         },
//!     }],
//!     requirements: vec![],
//! };
//!
//! let plan = TopologyCompiler::default().compile(&input).unwrap();
//! assert_eq!(plan.spokes.len(), 1);
//! ```

pub mod compiler;
pub mod config;
pub mod domain;
pub mod errors;
pub mod plan;
pub mod service;

// Re-export commonly used types
pub use compiler::{TopologyCompiler, TopologyInput};
pub use config::{CompilerConfig, ManagementAccess};
pub use errors::{CompileError, CompileResult};
pub use plan::TopologyPlan;
