// Copyright (c) 2025 - Cowboy AI, Inc.
//! Spoke Value Objects with Validation Invariants

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::dns::RecordName;

/// Spoke validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpokeError {
    #[error("Spoke name is empty")]
    EmptyName,

    #[error("Spoke name exceeds maximum length of 63 characters: {0}")]
    NameTooLong(String),

    #[error("Invalid character in spoke name: {0}")]
    InvalidCharacter(char),

    #[error("Spoke name cannot start or end with hyphen: {0}")]
    InvalidNameFormat(String),

    #[error("Availability zone is empty")]
    EmptyAvailabilityZone,

    #[error("Image reference is empty")]
    EmptyImageRef,

    #[error("Invalid prefix length: {0} (must be 1-30)")]
    InvalidPrefixLength(u8),
}

/// Spoke name value object
///
/// Unique identifier for a spoke and the deterministic naming seed for every
/// resource derived from it (address blocks, routes, rules, attachments).
/// Invariants:
/// - Non-empty, at most 63 characters (fits a DNS label)
/// - Lowercase alphanumeric and hyphens only
/// - Cannot start or end with a hyphen
///
/// # Examples
///
/// ```rust
/// use cim_topology::domain::SpokeName;
///
/// let name = SpokeName::new("spoke-a").unwrap();
/// assert_eq!(name.as_str(), "spoke-a");
/// assert!(SpokeName::new("Spoke_A").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpokeName(String);

impl SpokeName {
    /// Maximum length (one DNS label)
    pub const MAX_LENGTH: usize = 63;

    /// Create a new spoke name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, SpokeError> {
        let name = name.into();

        if name.is_empty() {
            return Err(SpokeError::EmptyName);
        }

        if name.len() > Self::MAX_LENGTH {
            return Err(SpokeError::NameTooLong(name));
        }

        for ch in name.chars() {
            if !ch.is_ascii_lowercase() && !ch.is_ascii_digit() && ch != '-' {
                return Err(SpokeError::InvalidCharacter(ch));
            }
        }

        if name.starts_with('-') || name.ends_with('-') {
            return Err(SpokeError::InvalidNameFormat(name));
        }

        Ok(Self(name))
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpokeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SpokeName {
    type Err = SpokeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for SpokeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Availability zone value object
///
/// Opaque placement hint passed through to the provisioning layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityZone(String);

impl AvailabilityZone {
    pub fn new(zone: impl Into<String>) -> Result<Self, SpokeError> {
        let zone = zone.into();
        if zone.is_empty() {
            return Err(SpokeError::EmptyAvailabilityZone);
        }
        Ok(Self(zone))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AvailabilityZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Machine image reference, opaque to the core
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(image: impl Into<String>) -> Result<Self, SpokeError> {
        let image = image.into();
        if image.is_empty() {
            return Err(SpokeError::EmptyImageRef);
        }
        Ok(Self(image))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Workload descriptor for a spoke
///
/// Describes the single workload hosted in a spoke. The image reference and
/// init script are opaque to the core and carried through to the provisioning
/// port untouched; the workload name becomes the spoke's DNS record name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadSpec {
    /// Workload name, used as the DNS record name within the private zone
    pub name: RecordName,
    /// Machine image to boot
    pub image: ImageRef,
    /// Application ports the workload serves
    pub ports: Vec<u16>,
    /// Whether the workload also gets a public address for egress testing
    #[serde(default = "default_true")]
    pub associate_public_ip: bool,
    /// Opaque bootstrap script, passed through verbatim
    #[serde(default)]
    pub user_data: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Address-space request for a spoke or subnet
///
/// Either an explicit CIDR block (verified for non-overlap) or a desired
/// prefix length (allocated from the configured pool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressRequest {
    /// Explicit CIDR block
    Cidr(Ipv4Net),
    /// Desired prefix length, block chosen by the allocator
    PrefixLen(u8),
}

impl AddressRequest {
    /// Validate the request is satisfiable in principle
    ///
    /// # Invariants
    /// - Requested prefix length 1-30 (a /31 or /32 cannot host a workload)
    pub fn validate(&self) -> Result<(), SpokeError> {
        if let AddressRequest::PrefixLen(len) = self {
            if *len == 0 || *len > 30 {
                return Err(SpokeError::InvalidPrefixLength(*len));
            }
        }
        Ok(())
    }

    /// Prefix length this request resolves to
    pub fn prefix_len(&self) -> u8 {
        match self {
            AddressRequest::Cidr(net) => net.prefix_len(),
            AddressRequest::PrefixLen(len) => *len,
        }
    }
}

/// Subnet declaration within a spoke request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetRequest {
    /// Subnet name, unique within the spoke
    pub name: SpokeName,
    /// Address request, carved from the spoke's block
    pub request: AddressRequest,
}

/// Declaration of a spoke, immutable once planning begins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokeRequest {
    /// Unique spoke name
    pub name: SpokeName,
    /// Placement hint
    pub availability_zone: AvailabilityZone,
    /// Address space request for the whole spoke
    pub address: AddressRequest,
    /// Subnets to carve from the spoke block; at least one required
    pub subnets: Vec<SubnetRequest>,
    /// The spoke's workload
    pub workload: WorkloadSpec,
}

/// A subnet with its assigned block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    pub name: SpokeName,
    pub cidr: Ipv4Net,
}

/// A spoke with its assigned address space
///
/// Materialized from a [`SpokeRequest`] once the address planner has assigned
/// blocks. The first subnet hosts the workload and the hub attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spoke {
    pub name: SpokeName,
    pub availability_zone: AvailabilityZone,
    pub cidr: Ipv4Net,
    pub subnets: Vec<Subnet>,
    pub workload: WorkloadSpec,
}

impl Spoke {
    /// The subnet hosting the workload and the hub attachment
    ///
    /// Invariant: every spoke carries at least one subnet, enforced before
    /// address planning begins.
    pub fn workload_subnet(&self) -> &Subnet {
        &self.subnets[0]
    }
}
