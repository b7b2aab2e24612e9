// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Graph
//!
//! The abstract hub-and-spoke connectivity graph: one hub node, one
//! attachment per spoke, no direct spoke-to-spoke edges. All inter-spoke
//! traffic is modeled as passing through the hub, matching the physical
//! constraint. Spokes live in a slice with index-based peer lookup; peer
//! iteration is simply "every other index".

use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::domain::{Spoke, SpokeName};
use crate::plan::{Attachment, Hub};

/// Topology structure failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("topology has no spokes")]
    EmptyTopology,

    #[error("duplicate spoke name: {0}")]
    DuplicateSpoke(SpokeName),

    #[error("duplicate subnet name {subnet} in spoke {spoke}")]
    DuplicateSubnet { spoke: SpokeName, subnet: SpokeName },

    #[error("spoke {0} declares no subnets")]
    SpokeWithoutSubnets(SpokeName),

    #[error("unknown spoke: {0}")]
    UnknownSpoke(SpokeName),
}

/// The hub-and-spoke connectivity graph
#[derive(Debug, Clone)]
pub struct TopologyGraph {
    spokes: Vec<Spoke>,
    index: HashMap<SpokeName, usize>,
}

impl TopologyGraph {
    /// Build the graph from planned spokes
    ///
    /// Spokes are sorted by name so every derived artifact is independent of
    /// declaration order. A single spoke yields a hub with one attachment and
    /// no peer traffic; zero spokes is an error.
    pub fn build(mut spokes: Vec<Spoke>) -> Result<Self, TopologyError> {
        if spokes.is_empty() {
            return Err(TopologyError::EmptyTopology);
        }

        spokes.sort_by(|a, b| a.name.cmp(&b.name));

        let mut index = HashMap::with_capacity(spokes.len());
        for (i, spoke) in spokes.iter().enumerate() {
            if spoke.subnets.is_empty() {
                return Err(TopologyError::SpokeWithoutSubnets(spoke.name.clone()));
            }
            if index.insert(spoke.name.clone(), i).is_some() {
                return Err(TopologyError::DuplicateSpoke(spoke.name.clone()));
            }
        }

        debug!(spokes = spokes.len(), "built topology graph");
        Ok(Self { spokes, index })
    }

    /// All spokes, sorted by name
    pub fn spokes(&self) -> &[Spoke] {
        &self.spokes
    }

    /// Look up a spoke by name
    pub fn get(&self, name: &SpokeName) -> Option<&Spoke> {
        self.index.get(name).map(|&i| &self.spokes[i])
    }

    /// Whether a spoke exists in the topology
    pub fn contains(&self, name: &SpokeName) -> bool {
        self.index.contains_key(name)
    }

    /// Every spoke reachable from `i` via the hub: all other spokes
    pub fn peers(&self, i: usize) -> impl Iterator<Item = &Spoke> {
        self.spokes
            .iter()
            .enumerate()
            .filter(move |(j, _)| *j != i)
            .map(|(_, s)| s)
    }

    /// The hub entity with its full attachment set
    ///
    /// Invariant: one attachment per spoke, through the spoke's workload
    /// subnet.
    pub fn hub(&self) -> Hub {
        Hub {
            attachments: self
                .spokes
                .iter()
                .map(|s| Attachment {
                    spoke: s.name.clone(),
                    subnet: s.workload_subnet().name.clone(),
                })
                .collect(),
        }
    }
}
