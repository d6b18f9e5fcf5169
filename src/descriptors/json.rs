//! JSON route narration
//!
//! Renders the primary route and, when the search found one, the
//! alternative route. Both go through their own `PathDescription` and their
//! own narration pass; only the facade is shared.

use serde::Serialize;

use super::narration::{build_instructions, InstructionRow, Narration};
use super::{Descriptor, DescriptorConfig};
use crate::core::error::Result;
use crate::core::facade::RoutingDataFacade;
use crate::core::hint::encode_hint;
use crate::core::route::{EdgeWeight, PhantomNode, RawRoute};
use crate::description::{extract_route_names, PathDescription, RouteGeometry, RouteSummary};

const STATUS_FOUND: u32 = 0;
const STATUS_NOT_FOUND: u32 = 207;

/// Response document; absent sections are left out of the output
#[derive(Debug, Default, Serialize)]
pub struct RouteDocument {
    pub status: u32,
    pub status_message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_geometry: Option<RouteGeometry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_instructions: Option<Vec<InstructionRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_summary: Option<SummaryDocument>,
    /// `[lat, lon]` of every leg boundary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via_points: Option<Vec<[f64; 2]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via_indices: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_alternative: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_geometries: Option<Vec<RouteGeometry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_instructions: Option<Vec<Vec<InstructionRow>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_summaries: Option<Vec<SummaryDocument>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_indices: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_name: Option<[String; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_names: Option<Vec<[String; 2]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint_data: Option<HintData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryDocument {
    /// Meters
    pub total_distance: u64,
    /// Seconds
    pub total_time: u64,
    pub start_point: String,
    pub end_point: String,
}

/// Resumption data: the checksum plus one token per leg boundary phantom
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HintData {
    pub checksum: u32,
    pub locations: Vec<String>,
}

/// One fully rendered route
struct RenderedRoute {
    geometry: Option<RouteGeometry>,
    narration: Option<Narration>,
    summary: SummaryDocument,
    via_indices: Vec<usize>,
}

/// JSON narration renderer
pub struct JsonDescriptor<'a, F: RoutingDataFacade> {
    facade: &'a F,
    config: DescriptorConfig,
}

impl<'a, F: RoutingDataFacade> JsonDescriptor<'a, F> {
    pub fn new(facade: &'a F, config: DescriptorConfig) -> Self {
        Self { facade, config }
    }

    /// Assemble the document without serializing it
    pub fn build(&self, route: &RawRoute) -> Result<RouteDocument> {
        if !route.is_found() {
            return Ok(RouteDocument {
                status: STATUS_NOT_FOUND,
                status_message: "Cannot find route between points",
                ..Default::default()
            });
        }
        route.debug_check_invariants();

        let (Some(start), Some(end)) = (route.start_phantom(), route.end_phantom()) else {
            // Only reachable in release builds with a malformed route
            return Ok(RouteDocument {
                status: STATUS_NOT_FOUND,
                status_message: "Cannot find route between points",
                ..Default::default()
            });
        };

        let mut document = RouteDocument {
            status: STATUS_FOUND,
            status_message: "Found route between points",
            ..Default::default()
        };

        let primary = self.render_primary(route, start);
        let via_points = route
            .leg_boundaries()
            .map(|p| [p.location.lat_degrees(), p.location.lon_degrees()])
            .collect();

        let alternative = route
            .has_alternative()
            .then(|| self.render_alternative(route, start, end));

        let no_segments = Vec::new();
        let names = extract_route_names(
            primary.narration.as_ref().map_or(&no_segments, |n| &n.segments),
            alternative
                .as_ref()
                .and_then(|a| a.narration.as_ref())
                .map_or(&no_segments, |n| &n.segments),
            self.facade,
        );

        document.route_geometry = primary.geometry;
        document.route_instructions = primary.narration.map(|n| n.rows);
        document.route_summary = Some(primary.summary);
        document.via_points = Some(via_points);
        document.via_indices = Some(primary.via_indices);
        document.found_alternative = Some(alternative.is_some());
        document.route_name = Some([names.shortest_path_name_1, names.shortest_path_name_2]);

        if let Some(alternative) = alternative {
            document.alternative_geometries = alternative.geometry.map(|g| vec![g]);
            document.alternative_instructions = alternative.narration.map(|n| vec![n.rows]);
            document.alternative_summaries = Some(vec![alternative.summary]);
            document.alternative_indices = Some(alternative.via_indices);
            document.alternative_names =
                Some(vec![[names.alternative_path_name_1, names.alternative_path_name_2]]);
        }

        document.hint_data = Some(HintData {
            checksum: route.check_sum,
            locations: route
                .segment_end_coordinates
                .iter()
                .map(|p| &p.source_phantom)
                .chain(std::iter::once(end))
                .map(encode_hint)
                .collect::<Result<_>>()?,
        });

        tracing::debug!(
            legs = route.leg_count(),
            alternative = route.has_alternative(),
            "route document assembled"
        );
        Ok(document)
    }

    fn render_primary(&self, route: &RawRoute, start: &PhantomNode) -> RenderedRoute {
        let mut description = PathDescription::new();
        description.set_start_segment(start, route.source_reversed(0));

        for (leg, (samples, phantoms)) in route
            .unpacked_path_segments
            .iter()
            .zip(&route.segment_end_coordinates)
            .enumerate()
        {
            let added = description.describe_leg(
                self.facade,
                samples,
                phantoms,
                route.target_reversed(leg),
                route.is_via_leg(leg),
            );
            debug_assert!(added > 0, "leg {leg} added no elements");
        }

        self.finish(description, route.shortest_path_length)
    }

    fn render_alternative(
        &self,
        route: &RawRoute,
        start: &PhantomNode,
        end: &PhantomNode,
    ) -> RenderedRoute {
        let source_reversed = route
            .alt_source_traversed_in_reverse
            .first()
            .copied()
            .unwrap_or(false);
        let target_reversed = route
            .alt_target_traversed_in_reverse
            .last()
            .copied()
            .unwrap_or(false);

        let mut description = PathDescription::new();
        description.set_start_segment(start, source_reversed);
        for sample in &route.unpacked_alternative {
            description.append_segment(self.facade.coordinate_of_node(sample.node), sample);
        }
        description.set_end_segment(end, target_reversed, false);

        self.finish(description, route.alternative_path_length)
    }

    fn finish(&self, mut description: PathDescription, raw_length: EdgeWeight) -> RenderedRoute {
        description.run(self.config.zoom_level);

        let geometry = self
            .config
            .geometry
            .then(|| description.geometry(self.config.encode_geometry));
        let narration = self.config.instructions.then(|| {
            build_instructions(
                description.segments(),
                self.facade,
                self.config.terminal_index,
            )
        });

        RenderedRoute {
            geometry,
            narration,
            summary: self.summary_document(description.summary(raw_length)),
            via_indices: description.via_indices().to_vec(),
        }
    }

    fn summary_document(&self, summary: RouteSummary) -> SummaryDocument {
        SummaryDocument {
            total_distance: summary.distance,
            total_time: summary.duration,
            start_point: self.facade.name_for_name_id(summary.source_name_id),
            end_point: self.facade.name_for_name_id(summary.target_name_id),
        }
    }
}

impl<F: RoutingDataFacade> Descriptor for JsonDescriptor<'_, F> {
    fn run(&self, route: &RawRoute) -> Result<Vec<u8>> {
        let document = self.build(route)?;
        Ok(serde_json::to_vec(&document)?)
    }
}
