//! Zoom-dependent line generalization
//!
//! Vertices already marked necessary (turns, leg endpoints) split the path
//! into spans. Each span is simplified with Douglas-Peucker and the vertices
//! it keeps are marked necessary too, so they end up in the geometry.

use geo::{LineString, SimplifyIdx};

use super::SegmentInformation;

/// Highest zoom level with its own tolerance
pub const MAX_ZOOM_LEVEL: u8 = 18;

/// Tolerance in degrees: the width of one 256px tile pixel at this zoom level
pub fn zoom_epsilon(zoom_level: u8) -> f64 {
    let zoom = zoom_level.min(MAX_ZOOM_LEVEL) as i32;
    360.0 / (256.0 * 2f64.powi(zoom))
}

/// Mark the vertices that survive generalization at `zoom_level` as necessary
pub fn generalize(path: &mut [SegmentInformation], zoom_level: u8) {
    if path.len() < 2 {
        return;
    }
    if let Some(first) = path.first_mut() {
        first.necessary = true;
    }
    if let Some(last) = path.last_mut() {
        last.necessary = true;
    }

    let epsilon = zoom_epsilon(zoom_level);
    let anchors: Vec<usize> = path
        .iter()
        .enumerate()
        .filter(|(_, s)| s.necessary)
        .map(|(i, _)| i)
        .collect();

    for pair in anchors.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        if end - start < 2 {
            continue;
        }
        let line: LineString<f64> = path[start..=end]
            .iter()
            .map(|s| (s.location.lon_degrees(), s.location.lat_degrees()))
            .collect::<Vec<_>>()
            .into();
        for kept in line.simplify_idx(&epsilon) {
            path[start + kept].necessary = true;
        }
    }
}
