//! Compiler configuration

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use crate::domain::{PortRange, Protocol};

/// Always-present administrative access policy
///
/// Kept distinct from peer-derived rules so that removing a peer relationship
/// never removes management access. Configurable globally; the default matches
/// the classic fixed SSH rule (tcp/22 from anywhere).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementAccess {
    /// Emit the management ingress rule at all
    pub enabled: bool,
    /// Protocol for the management rule
    pub protocol: Protocol,
    /// Port range for the management rule
    pub port: PortRange,
    /// Source CIDR admitted by the management rule
    pub source: Ipv4Net,
}

impl Default for ManagementAccess {
    fn default() -> Self {
        Self {
            enabled: true,
            protocol: Protocol::Tcp,
            port: PortRange::single(22),
            source: any_ipv4(),
        }
    }
}

/// Configuration for the topology compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Address pool that size-only requests are allocated from
    pub pool: Ipv4Net,
    /// TTL for workload records; short, since private addresses may be
    /// reassigned on workload replacement
    pub record_ttl: u32,
    /// Administrative access policy
    pub management: ManagementAccess,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            pool: Ipv4Net::new(Ipv4Addr::new(10, 0, 0, 0), 8)
                .expect("10.0.0.0/8 is a valid prefix"),
            record_ttl: 60,
            management: ManagementAccess::default(),
        }
    }
}

/// The 0.0.0.0/0 catch-all network
pub(crate) fn any_ipv4() -> Ipv4Net {
    Ipv4Net::new(Ipv4Addr::UNSPECIFIED, 0).expect("0.0.0.0/0 is a valid prefix")
}
