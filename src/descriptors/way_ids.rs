//! Waypoint and way-id XML document
//!
//! Lists every coordinate along the route followed by the road ids it
//! travels, with consecutive repeats collapsed.

use std::fmt::Write as _;

use super::Descriptor;
use crate::core::error::Result;
use crate::core::facade::RoutingDataFacade;
use crate::core::route::{FixedPointCoordinate, NameId, RawRoute};

const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<genrob>\n";
const FOOTER: &str = "</genrob>";

/// Raw waypoint renderer
pub struct WayIdDescriptor<'a, F: RoutingDataFacade> {
    facade: &'a F,
}

impl<'a, F: RoutingDataFacade> WayIdDescriptor<'a, F> {
    pub fn new(facade: &'a F) -> Self {
        Self { facade }
    }
}

impl<F: RoutingDataFacade> Descriptor for WayIdDescriptor<'_, F> {
    fn run(&self, route: &RawRoute) -> Result<Vec<u8>> {
        let mut out = String::from(HEADER);
        let samples = || route.unpacked_path_segments.iter().flatten();

        if let (true, Some(start), Some(end)) = (
            route.is_found() && samples().next().is_some(),
            route.start_phantom(),
            route.end_phantom(),
        ) {
            out.push_str("<route>\n");
            push_waypoint(&mut out, start.location);
            for sample in samples() {
                push_waypoint(&mut out, self.facade.coordinate_of_node(sample.node));
            }
            push_waypoint(&mut out, end.location);
            out.push_str("</route>\n");

            out.push_str("<wayids>\n");
            for id in distinct_way_ids(samples().map(|s| s.name_id)) {
                let _ = writeln!(out, "\t<id>{id}</id>");
            }
            out.push_str("</wayids>\n");
        }

        out.push_str(FOOTER);
        Ok(out.into_bytes())
    }
}

fn push_waypoint(out: &mut String, c: FixedPointCoordinate) {
    let _ = writeln!(
        out,
        "\t<waypoint><lon>{:.6}</lon><lat>{:.6}</lat></waypoint>",
        c.lon_degrees(),
        c.lat_degrees()
    );
}

/// Road ids in travel order with adjacent repeats collapsed
///
/// Unnamed roads (id 0) at the very start of the route are not listed.
fn distinct_way_ids(ids: impl Iterator<Item = NameId>) -> Vec<NameId> {
    let mut last = 0;
    let mut out = Vec::new();
    for id in ids {
        if id != last {
            out.push(id);
            last = id;
        }
    }
    out
}
