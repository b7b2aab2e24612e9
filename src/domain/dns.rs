// Copyright (c) 2025 - Cowboy AI, Inc.
//! DNS Name Value Objects with RFC 1123 Validation Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// DNS name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DnsNameError {
    #[error("DNS name is empty")]
    Empty,

    #[error("DNS name exceeds maximum length of 253 characters: {0}")]
    TooLong(usize),

    #[error("Label exceeds maximum length of 63 characters: {0}")]
    LabelTooLong(String),

    #[error("Invalid character in DNS name: {0}")]
    InvalidCharacter(char),

    #[error("Label cannot start or end with hyphen: {0}")]
    InvalidLabelFormat(String),

    #[error("Record name must be a single label, got: {0}")]
    NotALabel(String),
}

/// Validate a single DNS label (RFC 1123)
fn validate_label(label: &str) -> Result<(), DnsNameError> {
    if label.is_empty() {
        return Err(DnsNameError::Empty);
    }

    if label.len() > 63 {
        return Err(DnsNameError::LabelTooLong(label.to_string()));
    }

    for ch in label.chars() {
        if !ch.is_ascii_alphanumeric() && ch != '-' {
            return Err(DnsNameError::InvalidCharacter(ch));
        }
    }

    if label.starts_with('-') || label.ends_with('-') {
        return Err(DnsNameError::InvalidLabelFormat(label.to_string()));
    }

    Ok(())
}

/// Private zone name value object
///
/// The shared namespace every spoke resolves against (e.g. `corp.local`).
/// Invariants:
/// - Total length ≤ 253 characters
/// - Each dot-separated label valid per RFC 1123
/// - Stored in canonical lowercase form
///
/// # Examples
///
/// ```rust
/// use cim_topology::domain::ZoneName;
///
/// let zone = ZoneName::new("corp.local").unwrap();
/// assert_eq!(zone.as_str(), "corp.local");
/// assert!(ZoneName::new("bad..zone").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneName(String);

impl ZoneName {
    /// Maximum total length for a zone name (RFC 1123)
    pub const MAX_LENGTH: usize = 253;

    /// Create a new zone name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, DnsNameError> {
        let name = name.into().to_lowercase();

        if name.is_empty() {
            return Err(DnsNameError::Empty);
        }

        if name.len() > Self::MAX_LENGTH {
            return Err(DnsNameError::TooLong(name.len()));
        }

        for label in name.split('.') {
            validate_label(label)?;
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Zone labels, outermost last
    pub fn labels(&self) -> Vec<&str> {
        self.0.split('.').collect()
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ZoneName {
    type Err = DnsNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Record name value object
///
/// A single label naming one workload inside the private zone. Record names
/// must be unique within a zone; the planner fails on collision rather than
/// overwrite.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordName(String);

impl RecordName {
    /// Create a new record name with validation
    ///
    /// # Invariants
    /// - Exactly one RFC 1123 label (no dots)
    /// - Canonical lowercase form
    pub fn new(name: impl Into<String>) -> Result<Self, DnsNameError> {
        let name = name.into().to_lowercase();

        if name.contains('.') {
            return Err(DnsNameError::NotALabel(name));
        }

        validate_label(&name)?;

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully qualified name within a zone: `<record>.<zone>`
    pub fn fqdn(&self, zone: &ZoneName) -> String {
        format!("{}.{}", self.0, zone)
    }
}

impl fmt::Display for RecordName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordName {
    type Err = DnsNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
