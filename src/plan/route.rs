// Copyright (c) 2025 - Cowboy AI, Inc.
//! Route Plan Artifacts

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

use crate::domain::SpokeName;

/// Next hop for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextHop {
    /// The spoke's own internet egress point
    LocalEgress,
    /// The central transit hub
    Hub,
}

impl fmt::Display for NextHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextHop::LocalEgress => write!(f, "local-egress"),
            NextHop::Hub => write!(f, "hub"),
        }
    }
}

/// A (spoke, destination, next-hop) routing entry
///
/// Invariants: every spoke has exactly one default route to its local egress,
/// and exactly one hub route covering each peer spoke's CIDR. Routes form a
/// set, not a sequence; the orchestration engine applies them idempotently.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Route {
    pub spoke: SpokeName,
    pub destination: Ipv4Net,
    pub next_hop: NextHop,
}

impl Route {
    /// The default destination, 0.0.0.0/0
    pub fn default_destination() -> Ipv4Net {
        Ipv4Net::new(Ipv4Addr::UNSPECIFIED, 0).expect("0.0.0.0/0 is a valid prefix")
    }

    /// Whether this is a spoke's default route
    pub fn is_default(&self) -> bool {
        self.destination == Self::default_destination()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} via {}", self.spoke, self.destination, self.next_hop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_route_detection() {
        let route = Route {
            spoke: SpokeName::new("a").unwrap(),
            destination: Route::default_destination(),
            next_hop: NextHop::LocalEgress,
        };
        assert!(route.is_default());
        assert_eq!(route.to_string(), "a: 0.0.0.0/0 via local-egress");
    }

    #[test]
    fn test_hub_route_display() {
        let route = Route {
            spoke: SpokeName::new("a").unwrap(),
            destination: "10.2.0.0/16".parse().unwrap(),
            next_hop: NextHop::Hub,
        };
        assert!(!route.is_default());
        assert_eq!(route.to_string(), "a: 10.2.0.0/16 via hub");
    }
}
