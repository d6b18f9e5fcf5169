//! Path description - accumulates one route's legs into a segment sequence
//!
//! The leg walker appends every sample of every leg here, framed by a start
//! marker and one end marker per leg. `run` then post-processes the sequence:
//! lengths, aggregation between turns, generalization, bearings and the leg
//! boundary (via) indices. The narration pass and the geometry encoder both
//! read the result.
//!
//! One `PathDescription` describes exactly one route. The primary and the
//! alternative route each get their own instance.

pub mod generalize;
pub mod names;
pub mod polyline;

use geo::{Bearing, Distance, Haversine, Point};
use serde::Serialize;

use crate::core::facade::RoutingDataFacade;
use crate::core::route::{
    EdgeWeight, FixedPointCoordinate, NameId, PathData, PhantomNode, PhantomNodes,
};
use crate::core::turn::TurnInstruction;

pub use generalize::{generalize, zoom_epsilon};
pub use names::{extract_route_names, RouteNames, Segment};
pub use polyline::{decode_polyline, encode_polyline};

/// Where a segment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Start phantom of the route
    Start,
    /// A path sample from the search
    Sample,
    /// Target phantom of a leg; `via` is set for every leg but the last
    LegEnd { via: bool },
}

/// One vertex of a described route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentInformation {
    pub location: FixedPointCoordinate,
    pub name_id: NameId,
    /// Deciseconds; after `run` this covers the stretch up to the next turn
    pub duration: EdgeWeight,
    /// Meters; after `run` this covers the stretch up to the next turn
    pub length: f64,
    /// Deci-degrees towards the next vertex, set on necessary vertices
    pub bearing: u32,
    pub turn_instruction: TurnInstruction,
    /// Decision point or retained geometry vertex
    pub necessary: bool,
    pub kind: SegmentKind,
}

impl SegmentInformation {
    pub fn sample(
        location: FixedPointCoordinate,
        name_id: NameId,
        duration: EdgeWeight,
        turn_instruction: TurnInstruction,
    ) -> Self {
        Self {
            location,
            name_id,
            duration,
            length: 0.0,
            bearing: 0,
            turn_instruction,
            necessary: turn_instruction != TurnInstruction::NoTurn,
            kind: SegmentKind::Sample,
        }
    }

    pub fn is_via_location(&self) -> bool {
        matches!(self.kind, SegmentKind::LegEnd { via: true })
    }
}

/// Route geometry as placed in the response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RouteGeometry {
    /// Encoded polyline string
    Encoded(String),
    /// `[lat, lon]` pairs in degrees
    Coordinates(Vec<[f64; 2]>),
}

/// Totals of a described route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSummary {
    /// Meters
    pub distance: u64,
    /// Seconds
    pub duration: u64,
    pub source_name_id: NameId,
    pub target_name_id: NameId,
}

/// Accumulator for one route
#[derive(Debug, Clone, Default)]
pub struct PathDescription {
    path: Vec<SegmentInformation>,
    start_phantom: PhantomNode,
    target_phantom: PhantomNode,
    via_indices: Vec<usize>,
    entire_length: f64,
}

impl PathDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the route's start phantom, must precede every other append
    pub fn set_start_segment(&mut self, source: &PhantomNode, traversed_in_reverse: bool) {
        debug_assert!(self.path.is_empty(), "start segment registered twice");
        self.start_phantom = *source;
        self.path.push(SegmentInformation {
            necessary: true,
            kind: SegmentKind::Start,
            ..SegmentInformation::sample(
                source.location,
                source.name_id,
                source.weight(traversed_in_reverse),
                TurnInstruction::HeadOn,
            )
        });
    }

    /// Append one path sample at its resolved coordinate
    pub fn append_segment(&mut self, coordinate: FixedPointCoordinate, sample: &PathData) {
        if let [only] = self.path.as_mut_slice() {
            if only.location == coordinate {
                only.name_id = sample.name_id;
                return;
            }
        }
        self.path.push(SegmentInformation::sample(
            coordinate,
            sample.name_id,
            sample.segment_duration,
            sample.turn_instruction,
        ));
    }

    /// Walk one leg: append every sample, then close the leg at its target
    ///
    /// Returns the number of appended elements, the samples plus the end
    /// marker.
    pub fn describe_leg<F: RoutingDataFacade>(
        &mut self,
        facade: &F,
        leg: &[PathData],
        phantoms: &PhantomNodes,
        target_traversed_in_reverse: bool,
        is_via_leg: bool,
    ) -> usize {
        for sample in leg {
            self.append_segment(facade.coordinate_of_node(sample.node), sample);
        }
        self.set_end_segment(&phantoms.target_phantom, target_traversed_in_reverse, is_via_leg);

        let added = leg.len() + 1;
        tracing::trace!(samples = leg.len(), via = is_via_leg, "leg described");
        added
    }

    /// Close a leg at its target phantom
    pub fn set_end_segment(
        &mut self,
        target: &PhantomNode,
        traversed_in_reverse: bool,
        is_via_leg: bool,
    ) {
        self.target_phantom = *target;
        let turn = if is_via_leg {
            TurnInstruction::ReachViaLocation
        } else {
            TurnInstruction::NoTurn
        };
        self.path.push(SegmentInformation {
            necessary: true,
            kind: SegmentKind::LegEnd { via: is_via_leg },
            ..SegmentInformation::sample(
                target.location,
                target.name_id,
                target.weight(traversed_in_reverse),
                turn,
            )
        });
    }

    /// Post-process the accumulated sequence for rendering at `zoom_level`
    pub fn run(&mut self, zoom_level: u8) {
        if self.path.is_empty() {
            return;
        }

        self.path[0].length = 0.0;
        for i in 1..self.path.len() {
            // Each vertex names the road leaving it
            self.path[i - 1].name_id = self.path[i].name_id;
            self.path[i].length = haversine_m(self.path[i - 1].location, self.path[i].location);
        }

        self.drop_degenerate_ends();
        self.aggregate_between_turns();
        generalize(&mut self.path, zoom_level);
        self.compute_bearings();
        self.compute_via_indices();

        tracing::trace!(
            vertices = self.path.len(),
            necessary = self.path.iter().filter(|s| s.necessary).count(),
            length_m = self.entire_length,
            "path description ready"
        );
    }

    fn drop_degenerate_ends(&mut self) {
        let n = self.path.len();
        if n > 2 && self.path[n - 1].length < f64::EPSILON {
            self.path.pop();
            let n = self.path.len();
            if let Some(last) = self.path.last_mut() {
                last.necessary = true;
                last.turn_instruction = TurnInstruction::NoTurn;
            }
            self.target_phantom.name_id = self.path[n.saturating_sub(2)].name_id;
        }
        if self.path.len() > 2 && self.path[1].length < f64::EPSILON {
            self.path.remove(0);
            let first = &mut self.path[0];
            first.turn_instruction = TurnInstruction::HeadOn;
            first.necessary = true;
            first.length = 0.0;
            self.start_phantom.name_id = first.name_id;
        }
    }

    fn aggregate_between_turns(&mut self) {
        self.entire_length = 0.0;
        let mut segment_length = 0.0;
        let mut segment_duration: EdgeWeight = 0;
        let mut segment_start = 0;

        for i in 1..self.path.len() {
            let (length, duration) = (self.path[i].length, self.path[i].duration);
            self.entire_length += length;
            segment_length += length;
            segment_duration = segment_duration.saturating_add(duration);
            self.path[segment_start].length = segment_length;
            self.path[segment_start].duration = segment_duration;

            if self.path[i].turn_instruction != TurnInstruction::NoTurn {
                segment_length = 0.0;
                segment_duration = 0;
                segment_start = i;
            }
        }
    }

    fn compute_bearings(&mut self) {
        for i in 0..self.path.len().saturating_sub(1) {
            if self.path[i].necessary {
                let angle = bearing_deg(self.path[i].location, self.path[i + 1].location);
                self.path[i].bearing = ((angle * 10.0).round() as u32) % 3600;
            }
        }
    }

    fn compute_via_indices(&mut self) {
        self.via_indices.clear();
        let mut necessary_samples = 0;
        for segment in &self.path {
            if segment.kind == SegmentKind::Sample && segment.necessary {
                necessary_samples += 1;
            }
            if segment.is_via_location() {
                self.via_indices.push(necessary_samples);
            }
        }
        self.via_indices.push(necessary_samples);
    }

    /// Post-processed segments (valid after `run`)
    pub fn segments(&self) -> &[SegmentInformation] {
        &self.path
    }

    /// Leg boundary indices, one per leg (valid after `run`)
    ///
    /// Each value counts the necessary path samples up to the end of its leg.
    /// Phantom markers are not counted, so these are not positions in
    /// `route_geometry` or in the instruction rows' running index.
    pub fn via_indices(&self) -> &[usize] {
        &self.via_indices
    }

    /// Accumulated length in meters (valid after `run`)
    pub fn entire_length(&self) -> f64 {
        self.entire_length
    }

    /// Geometry of the necessary vertices
    pub fn geometry(&self, encode: bool) -> RouteGeometry {
        let necessary = self.path.iter().filter(|s| s.necessary).map(|s| s.location);
        if encode {
            RouteGeometry::Encoded(encode_polyline(&necessary.collect::<Vec<_>>()))
        } else {
            RouteGeometry::Coordinates(
                necessary.map(|c| [c.lat_degrees(), c.lon_degrees()]).collect(),
            )
        }
    }

    /// Totals for the route; `raw_length` is the search's length in deciseconds
    pub fn summary(&self, raw_length: EdgeWeight) -> RouteSummary {
        RouteSummary {
            distance: self.entire_length.round() as u64,
            duration: (raw_length as f64 / 10.0).round() as u64,
            source_name_id: self.start_phantom.name_id,
            target_name_id: self.target_phantom.name_id,
        }
    }
}

fn haversine_m(a: FixedPointCoordinate, b: FixedPointCoordinate) -> f64 {
    Haversine::distance(to_point(a), to_point(b))
}

/// Initial bearing from `a` to `b` in degrees, 0..360 clockwise from north
fn bearing_deg(a: FixedPointCoordinate, b: FixedPointCoordinate) -> f64 {
    Haversine::bearing(to_point(a), to_point(b)).rem_euclid(360.0)
}

fn to_point(c: FixedPointCoordinate) -> Point<f64> {
    Point::new(c.lon_degrees(), c.lat_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::facade::NetworkSnapshot;

    fn coord(lat: f64, lon: f64) -> FixedPointCoordinate {
        FixedPointCoordinate::from_degrees(lat, lon)
    }

    fn phantom(lat: f64, lon: f64, name_id: NameId, weight: EdgeWeight) -> PhantomNode {
        PhantomNode {
            name_id,
            forward_weight: weight,
            reverse_weight: weight * 2,
            location: coord(lat, lon),
            ..Default::default()
        }
    }

    fn sample(name_id: NameId, turn: TurnInstruction, duration: EdgeWeight) -> PathData {
        PathData {
            node: 0,
            name_id,
            turn_instruction: turn,
            segment_duration: duration,
        }
    }

    #[test]
    fn test_straight_leg() {
        let mut description = PathDescription::new();
        description.set_start_segment(&phantom(50.0, 4.0, 1, 5), false);
        description.append_segment(coord(50.001, 4.0), &sample(2, TurnInstruction::NoTurn, 10));
        description.append_segment(coord(50.002, 4.0), &sample(2, TurnInstruction::NoTurn, 10));
        description.set_end_segment(&phantom(50.003, 4.0, 3, 4), false, false);
        description.run(18);

        let necessary = description.segments().iter().filter(|s| s.necessary).count();
        assert_eq!(necessary, 2);
        assert_eq!(description.via_indices(), &[0]);
        assert!((description.entire_length() - 333.6).abs() < 1.0);

        match description.geometry(false) {
            RouteGeometry::Coordinates(points) => {
                assert_eq!(points.len(), 2);
                assert!((points[0][0] - 50.0).abs() < 1e-9);
                assert!((points[1][0] - 50.003).abs() < 1e-9);
            }
            other => panic!("expected coordinates, got {other:?}"),
        }
    }

    #[test]
    fn test_names_shift_to_outgoing_road() {
        let mut description = PathDescription::new();
        description.set_start_segment(&phantom(50.0, 4.0, 1, 5), false);
        description.append_segment(coord(50.001, 4.0), &sample(2, TurnInstruction::NoTurn, 10));
        description.set_end_segment(&phantom(50.002, 4.0, 3, 4), false, false);
        description.run(18);

        let names: Vec<NameId> = description.segments().iter().map(|s| s.name_id).collect();
        assert_eq!(names, vec![2, 3, 3]);
    }

    #[test]
    fn test_start_marker_adopts_name_on_same_coordinate() {
        let mut description = PathDescription::new();
        description.set_start_segment(&phantom(50.0, 4.0, 1, 5), false);
        description.append_segment(coord(50.0, 4.0), &sample(7, TurnInstruction::NoTurn, 10));
        assert_eq!(description.segments().len(), 1);
        assert_eq!(description.segments()[0].name_id, 7);
    }

    #[test]
    fn test_start_marker_uses_direction_weight() {
        let mut description = PathDescription::new();
        description.set_start_segment(&phantom(50.0, 4.0, 1, 5), true);
        let start = description.segments()[0];
        assert_eq!(start.duration, 10);
        assert_eq!(start.turn_instruction, TurnInstruction::HeadOn);
        assert!(start.necessary);
        assert_eq!(start.kind, SegmentKind::Start);
    }

    #[test]
    fn test_zero_length_target_dropped() {
        let mut description = PathDescription::new();
        description.set_start_segment(&phantom(50.0, 4.0, 1, 5), false);
        description.append_segment(coord(50.001, 4.0), &sample(2, TurnInstruction::NoTurn, 10));
        description.append_segment(coord(50.002, 4.0), &sample(2, TurnInstruction::NoTurn, 10));
        description.set_end_segment(&phantom(50.002, 4.0, 3, 4), false, false);
        description.run(18);

        let segments = description.segments();
        assert_eq!(segments.len(), 3);
        let last = segments[2];
        assert!(last.necessary);
        assert_eq!(last.turn_instruction, TurnInstruction::NoTurn);
    }

    #[test]
    fn test_lengths_and_durations_aggregate_between_turns() {
        let mut description = PathDescription::new();
        description.set_start_segment(&phantom(50.0, 4.0, 1, 5), false);
        description.append_segment(coord(50.001, 4.0), &sample(2, TurnInstruction::TurnRight, 10));
        description.append_segment(coord(50.001, 4.001), &sample(2, TurnInstruction::NoTurn, 30));
        description.set_end_segment(&phantom(50.001, 4.002, 3, 7), false, false);
        description.run(18);

        let segments = description.segments();
        assert_eq!(segments[0].duration, 10);
        assert_eq!(segments[1].duration, 37);
        let total = segments[0].length + segments[1].length;
        assert!((total - description.entire_length()).abs() < 1e-6);
    }

    #[test]
    fn test_bearings_in_deci_degrees() {
        let mut description = PathDescription::new();
        description.set_start_segment(&phantom(50.0, 4.0, 1, 5), false);
        description.append_segment(coord(50.001, 4.0), &sample(2, TurnInstruction::TurnRight, 10));
        description.set_end_segment(&phantom(50.001, 4.001, 3, 7), false, false);
        description.run(18);

        let segments = description.segments();
        assert_eq!(segments[0].bearing, 0);
        assert_eq!(segments[1].bearing, 900);
    }

    #[test]
    fn test_via_indices_per_leg() {
        let snapshot = NetworkSnapshot::new(
            vec![
                coord(50.001, 4.0),
                coord(50.001, 4.001),
                coord(50.002, 4.001),
                coord(50.004, 4.001),
            ],
            vec![],
        );
        let first_leg = vec![
            PathData {
                node: 0,
                ..sample(1, TurnInstruction::TurnRight, 10)
            },
            PathData {
                node: 1,
                ..sample(1, TurnInstruction::TurnLeft, 10)
            },
            PathData {
                node: 2,
                ..sample(1, TurnInstruction::TurnLeft, 10)
            },
        ];
        let second_leg = vec![PathData {
            node: 3,
            ..sample(1, TurnInstruction::NoTurn, 10)
        }];
        let first = PhantomNodes {
            source_phantom: phantom(50.0, 4.0, 1, 5),
            target_phantom: phantom(50.003, 4.001, 1, 5),
        };
        let second = PhantomNodes {
            source_phantom: first.target_phantom,
            target_phantom: phantom(50.005, 4.001, 1, 5),
        };

        let mut description = PathDescription::new();
        description.set_start_segment(&first.source_phantom, false);
        assert_eq!(description.describe_leg(&snapshot, &first_leg, &first, false, true), 4);
        assert_eq!(description.describe_leg(&snapshot, &second_leg, &second, false, false), 2);
        description.run(18);

        assert_eq!(description.via_indices(), &[3, 3]);
        assert!(description.segments()[4].is_via_location());

        // The via vertex sits after the start marker in the geometry
        let via_in_geometry = description.segments()[..4].iter().filter(|s| s.necessary).count();
        assert_eq!(via_in_geometry, 4);
        assert_ne!(via_in_geometry, description.via_indices()[0]);
    }

    #[test]
    fn test_summary_rounds_time() {
        let mut description = PathDescription::new();
        description.set_start_segment(&phantom(50.0, 4.0, 1, 5), false);
        description.set_end_segment(&phantom(50.001, 4.0, 3, 4), false, false);
        description.run(18);

        let summary = description.summary(125);
        assert_eq!(summary.duration, 13);
        assert_eq!(summary.distance, 111);
        assert_eq!(summary.source_name_id, 1);
        assert_eq!(summary.target_name_id, 3);
    }

    #[test]
    fn test_empty_description_runs() {
        let mut description = PathDescription::new();
        description.run(18);
        assert!(description.segments().is_empty());
        assert_eq!(description.geometry(true), RouteGeometry::Encoded(String::new()));
    }
}
