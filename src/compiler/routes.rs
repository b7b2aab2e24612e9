// Copyright (c) 2025 - Cowboy AI, Inc.
//! Route Synthesizer
//!
//! Derives each spoke's routing table from the graph: one default route to the
//! spoke's local egress, plus one hub route per peer. The address planner
//! guarantees peer blocks never overlap a spoke's own block; that invariant is
//! re-checked here, and a peer destination that would shadow the spoke's own
//! address space is rejected rather than silently installed.

use ipnet::Ipv4Net;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

use crate::compiler::address::blocks_overlap;
use crate::compiler::graph::TopologyGraph;
use crate::domain::SpokeName;
use crate::plan::{NextHop, Route};

/// A synthesized peer route would overlap the spoke's own address space
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("route conflict on {spoke}: peer {peer} destination {destination} overlaps own block {spoke_cidr}")]
pub struct RouteConflictError {
    pub spoke: SpokeName,
    pub spoke_cidr: Ipv4Net,
    pub peer: SpokeName,
    pub destination: Ipv4Net,
}

/// Synthesize the full route set for every spoke
///
/// N spokes yield exactly N default routes plus N·(N−1) hub routes. The
/// result is a set; application order is the orchestration engine's concern.
pub fn synthesize(graph: &TopologyGraph) -> Result<BTreeSet<Route>, RouteConflictError> {
    let mut routes = BTreeSet::new();

    for (i, spoke) in graph.spokes().iter().enumerate() {
        routes.insert(Route {
            spoke: spoke.name.clone(),
            destination: Route::default_destination(),
            next_hop: NextHop::LocalEgress,
        });

        for peer in graph.peers(i) {
            if blocks_overlap(&spoke.cidr, &peer.cidr) {
                return Err(RouteConflictError {
                    spoke: spoke.name.clone(),
                    spoke_cidr: spoke.cidr,
                    peer: peer.name.clone(),
                    destination: peer.cidr,
                });
            }

            routes.insert(Route {
                spoke: spoke.name.clone(),
                destination: peer.cidr,
                next_hop: NextHop::Hub,
            });
        }
    }

    debug!(routes = routes.len(), "synthesized route set");
    Ok(routes)
}
