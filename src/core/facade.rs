//! Routing data facade - read-only lookups used while rendering
//!
//! Renderers never own routing data. They resolve node coordinates and road
//! names through `RoutingDataFacade`, which must be safe to share between
//! concurrent renders (it is only ever borrowed immutably).

use crc::{Crc, CRC_32_ISO_HDLC};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::Result;
use super::route::{FixedPointCoordinate, NameId, NodeId};

/// CRC-32 used to fingerprint a snapshot (and thus validate hint tokens)
const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Read-only lookups against a routing data snapshot
pub trait RoutingDataFacade {
    /// Coordinate of a graph node
    fn coordinate_of_node(&self, node: NodeId) -> FixedPointCoordinate;

    /// Road name for a name table id, empty when unknown
    fn name_for_name_id(&self, name_id: NameId) -> String;

    /// Fingerprint of the loaded data, echoed back in hint payloads
    fn check_sum(&self) -> u32;
}

impl<T: RoutingDataFacade + ?Sized> RoutingDataFacade for &T {
    fn coordinate_of_node(&self, node: NodeId) -> FixedPointCoordinate {
        (**self).coordinate_of_node(node)
    }

    fn name_for_name_id(&self, name_id: NameId) -> String {
        (**self).name_for_name_id(name_id)
    }

    fn check_sum(&self) -> u32 {
        (**self).check_sum()
    }
}

/// On-disk layout of a snapshot file
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    nodes: Vec<FixedPointCoordinate>,
    #[serde(default)]
    names: Vec<String>,
}

/// In-memory node coordinate and name tables
#[derive(Debug, Clone)]
pub struct NetworkSnapshot {
    nodes: Vec<FixedPointCoordinate>,
    names: Vec<String>,
    check_sum: u32,
}

impl NetworkSnapshot {
    pub fn new(nodes: Vec<FixedPointCoordinate>, names: Vec<String>) -> Self {
        let check_sum = fingerprint(&nodes, &names);
        Self {
            nodes,
            names,
            check_sum,
        }
    }

    /// Load a snapshot from a JSON file (`{"nodes": [{"lat":..,"lon":..}], "names": [..]}`)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        let file: SnapshotFile = serde_json::from_slice(data)?;
        Ok(Self::new(file.nodes, file.names))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn name_count(&self) -> usize {
        self.names.len()
    }
}

impl RoutingDataFacade for NetworkSnapshot {
    fn coordinate_of_node(&self, node: NodeId) -> FixedPointCoordinate {
        self.nodes.get(node as usize).copied().unwrap_or_default()
    }

    fn name_for_name_id(&self, name_id: NameId) -> String {
        self.names.get(name_id as usize).cloned().unwrap_or_default()
    }

    fn check_sum(&self) -> u32 {
        self.check_sum
    }
}

fn fingerprint(nodes: &[FixedPointCoordinate], names: &[String]) -> u32 {
    let mut digest = CRC32.digest();
    digest.update(&(nodes.len() as u64).to_le_bytes());
    for node in nodes {
        digest.update(&node.lat.to_le_bytes());
        digest.update(&node.lon.to_le_bytes());
    }
    digest.update(&(names.len() as u64).to_le_bytes());
    for name in names {
        digest.update(&(name.len() as u64).to_le_bytes());
        digest.update(name.as_bytes());
    }
    digest.finalize()
}
