//! Error types for topology compilation

use thiserror::Error;

use crate::compiler::{
    AllocationError, DnsError, PolicyError, RouteConflictError, TopologyError, ValidationError,
};

/// Errors that can abort a compilation attempt
///
/// All variants indicate structurally invalid input, not transient faults;
/// none are retried internally. The first failure aborts compilation and is
/// surfaced verbatim with enough context (offending spoke/CIDR/name) to fix
/// the input. Transient failures during the apply phase are the orchestration
/// engine's concern and are not modeled here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Address overlap or pool exhaustion
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// Empty topology or dangling spoke reference
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// A synthesized route would shadow a spoke's own address space
    #[error(transparent)]
    RouteConflict(#[from] RouteConflictError),

    /// Access requirement references an unknown spoke
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// Duplicate DNS record name
    #[error(transparent)]
    Dns(#[from] DnsError),

    /// A global invariant failed on the assembled plan
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type for compilation
pub type CompileResult<T> = Result<T, CompileError>;
