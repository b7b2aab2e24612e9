// Copyright (c) 2025 - Cowboy AI, Inc.
//! Access Requirement Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::spoke::SpokeName;

/// Access requirement validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("Invalid port range: {start}-{end} (start must not exceed end)")]
    InvalidPortRange { start: u16, end: u16 },
}

/// IP protocol for a policy rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
    /// All protocols (rendered as "-1" by most control planes)
    All,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
            Protocol::Icmp => write!(f, "icmp"),
            Protocol::All => write!(f, "-1"),
        }
    }
}

/// Inclusive port range value object
///
/// Invariant: `start <= end`. The zero range `0-0` combined with
/// [`Protocol::All`] means "all traffic".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    /// Create a new port range with validation
    pub fn new(start: u16, end: u16) -> Result<Self, AccessError> {
        if start > end {
            return Err(AccessError::InvalidPortRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A single port
    pub fn single(port: u16) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    /// The all-traffic range (0-0, paired with [`Protocol::All`])
    pub fn any() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A declared need for one spoke's workloads to reach another's
///
/// "Workloads in `consumer` may reach `provider`'s workload on
/// `protocol`/`port`." Each requirement yields exactly one ingress rule on the
/// provider side; removing the requirement removes exactly that rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccessRequirement {
    pub consumer: SpokeName,
    pub provider: SpokeName,
    pub protocol: Protocol,
    pub port: PortRange,
}

impl fmt::Display for AccessRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} on {}/{}",
            self.consumer, self.provider, self.protocol, self.port
        )
    }
}
