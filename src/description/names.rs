//! Route naming - picks the two most telling road names of each route

use std::collections::HashSet;

use crate::core::facade::RoutingDataFacade;
use crate::core::route::NameId;

/// One emitted instruction as seen by route naming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub name_id: NameId,
    /// Meters, rounded
    pub length: u32,
    /// Index of the instruction row that produced this record
    pub position: usize,
}

impl Segment {
    pub fn new(name_id: NameId, length: u32, position: usize) -> Self {
        Self {
            name_id,
            length,
            position,
        }
    }
}

/// Two names per route, in travel order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteNames {
    pub shortest_path_name_1: String,
    pub shortest_path_name_2: String,
    pub alternative_path_name_1: String,
    pub alternative_path_name_2: String,
}

/// Derive route names from the name-tracking lists of both routes
///
/// For each route the longest segment is picked first. The second pick is
/// the longest segment whose road does not occur on the other route, has a
/// different name than the first pick and is not unnamed (id 0). The two
/// picks are returned in the order they are travelled; a missing pick gives
/// an empty name.
pub fn extract_route_names<F: RoutingDataFacade>(
    shortest: &[Segment],
    alternative: &[Segment],
    facade: &F,
) -> RouteNames {
    let (s1, s2) = pick_names(shortest, alternative, facade);
    let (a1, a2) = pick_names(alternative, shortest, facade);
    RouteNames {
        shortest_path_name_1: s1,
        shortest_path_name_2: s2,
        alternative_path_name_1: a1,
        alternative_path_name_2: a2,
    }
}

fn pick_names<F: RoutingDataFacade>(
    own: &[Segment],
    other: &[Segment],
    facade: &F,
) -> (String, String) {
    let Some(first) = longest(own.iter()) else {
        return (String::new(), String::new());
    };

    let other_names: HashSet<NameId> = other.iter().map(|s| s.name_id).collect();
    let second = longest(own.iter().filter(|s| {
        s.name_id != 0 && s.name_id != first.name_id && !other_names.contains(&s.name_id)
    }));

    match second {
        Some(second) if second.position < first.position => (
            facade.name_for_name_id(second.name_id),
            facade.name_for_name_id(first.name_id),
        ),
        Some(second) => (
            facade.name_for_name_id(first.name_id),
            facade.name_for_name_id(second.name_id),
        ),
        None => (facade.name_for_name_id(first.name_id), String::new()),
    }
}

/// Longest segment, the earliest one on ties
fn longest<'a>(segments: impl Iterator<Item = &'a Segment>) -> Option<&'a Segment> {
    segments.fold(None, |best: Option<&Segment>, s| match best {
        Some(b) if b.length >= s.length => Some(b),
        _ => Some(s),
    })
}
