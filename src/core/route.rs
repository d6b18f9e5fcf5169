//! Raw route data produced by the search
//!
//! A `RawRoute` is read-only input for one render call. Lengths and
//! durations are in deciseconds of travel time, coordinates are fixed-point.

use serde::{Deserialize, Serialize};

use super::turn::TurnInstruction;

/// Fixed-point scale of stored coordinates (units per degree)
pub const COORDINATE_PRECISION: f64 = 1_000_000.0;

/// Sentinel length meaning "no route found"
pub const INVALID_EDGE_WEIGHT: EdgeWeight = u32::MAX;

pub type EdgeWeight = u32;
pub type NodeId = u32;
pub type NameId = u32;

/// A WGS84 location stored as fixed-point integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FixedPointCoordinate {
    pub lat: i32,
    pub lon: i32,
}

impl FixedPointCoordinate {
    pub fn new(lat: i32, lon: i32) -> Self {
        Self { lat, lon }
    }

    /// Build from floating-point degrees, rounding to the nearest fixed-point unit
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self {
            lat: (lat * COORDINATE_PRECISION).round() as i32,
            lon: (lon * COORDINATE_PRECISION).round() as i32,
        }
    }

    pub fn lat_degrees(&self) -> f64 {
        self.lat as f64 / COORDINATE_PRECISION
    }

    pub fn lon_degrees(&self) -> f64 {
        self.lon as f64 / COORDINATE_PRECISION
    }
}

/// One sample along an unpacked leg
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PathData {
    /// Graph node, resolved to a coordinate through the facade
    pub node: NodeId,
    /// Name table id of the road this sample lies on
    pub name_id: NameId,
    #[serde(default)]
    pub turn_instruction: TurnInstruction,
    /// Duration of the segment leading to this sample, deciseconds
    #[serde(default)]
    pub segment_duration: EdgeWeight,
}

/// A route endpoint snapped onto the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhantomNode {
    pub forward_node_id: NodeId,
    pub reverse_node_id: NodeId,
    pub name_id: NameId,
    /// Weight of the partial edge when traversed forward, deciseconds
    pub forward_weight: EdgeWeight,
    /// Weight of the partial edge when traversed in reverse, deciseconds
    pub reverse_weight: EdgeWeight,
    pub location: FixedPointCoordinate,
}

impl PhantomNode {
    /// Weight of the partial edge for the given traversal direction
    pub fn weight(&self, traversed_in_reverse: bool) -> EdgeWeight {
        if traversed_in_reverse {
            self.reverse_weight
        } else {
            self.forward_weight
        }
    }
}

/// Source and target attachment of one leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhantomNodes {
    pub source_phantom: PhantomNode,
    pub target_phantom: PhantomNode,
}

/// Search result handed to the renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRoute {
    pub shortest_path_length: EdgeWeight,
    /// One sample sequence per leg
    pub unpacked_path_segments: Vec<Vec<PathData>>,
    /// One phantom pair per leg, parallel to `unpacked_path_segments`
    pub segment_end_coordinates: Vec<PhantomNodes>,
    #[serde(default)]
    pub source_traversed_in_reverse: Vec<bool>,
    #[serde(default)]
    pub target_traversed_in_reverse: Vec<bool>,
    #[serde(default)]
    pub check_sum: u32,
    #[serde(default = "invalid_edge_weight")]
    pub alternative_path_length: EdgeWeight,
    #[serde(default)]
    pub unpacked_alternative: Vec<PathData>,
    #[serde(default)]
    pub alt_source_traversed_in_reverse: Vec<bool>,
    #[serde(default)]
    pub alt_target_traversed_in_reverse: Vec<bool>,
}

fn invalid_edge_weight() -> EdgeWeight {
    INVALID_EDGE_WEIGHT
}

impl Default for RawRoute {
    fn default() -> Self {
        Self {
            shortest_path_length: INVALID_EDGE_WEIGHT,
            unpacked_path_segments: Vec::new(),
            segment_end_coordinates: Vec::new(),
            source_traversed_in_reverse: Vec::new(),
            target_traversed_in_reverse: Vec::new(),
            check_sum: 0,
            alternative_path_length: INVALID_EDGE_WEIGHT,
            unpacked_alternative: Vec::new(),
            alt_source_traversed_in_reverse: Vec::new(),
            alt_target_traversed_in_reverse: Vec::new(),
        }
    }
}

impl RawRoute {
    pub fn is_found(&self) -> bool {
        self.shortest_path_length != INVALID_EDGE_WEIGHT
    }

    /// Alternative fields are only meaningful when this returns true
    pub fn has_alternative(&self) -> bool {
        self.alternative_path_length != INVALID_EDGE_WEIGHT
    }

    /// Every leg but the last ends at a via point
    pub fn is_via_leg(&self, leg: usize) -> bool {
        leg + 1 != self.unpacked_path_segments.len()
    }

    pub fn leg_count(&self) -> usize {
        self.unpacked_path_segments.len()
    }

    /// Source phantom of the whole route (first leg)
    pub fn start_phantom(&self) -> Option<&PhantomNode> {
        self.segment_end_coordinates.first().map(|p| &p.source_phantom)
    }

    /// Target phantom of the whole route (last leg)
    pub fn end_phantom(&self) -> Option<&PhantomNode> {
        self.segment_end_coordinates.last().map(|p| &p.target_phantom)
    }

    pub fn source_reversed(&self, leg: usize) -> bool {
        self.source_traversed_in_reverse.get(leg).copied().unwrap_or(false)
    }

    pub fn target_reversed(&self, leg: usize) -> bool {
        self.target_traversed_in_reverse.get(leg).copied().unwrap_or(false)
    }

    /// Leg boundary phantoms: first source, then every leg's target
    pub fn leg_boundaries(&self) -> impl Iterator<Item = &PhantomNode> {
        self.segment_end_coordinates
            .first()
            .map(|p| &p.source_phantom)
            .into_iter()
            .chain(self.segment_end_coordinates.iter().map(|p| &p.target_phantom))
    }

    /// Checks the shape invariants the renderers rely on
    pub(crate) fn debug_check_invariants(&self) {
        debug_assert_eq!(
            self.unpacked_path_segments.len(),
            self.segment_end_coordinates.len(),
            "every leg needs exactly one phantom pair"
        );
        debug_assert!(
            !self.is_found() || !self.segment_end_coordinates.is_empty(),
            "a found route must have at least one leg"
        );
    }
}
