//! Encoded polyline format (precision 5)

use crate::core::route::{FixedPointCoordinate, COORDINATE_PRECISION};

const POLYLINE_PRECISION: f64 = 100_000.0;

/// Encode coordinates as an encoded polyline string
pub fn encode_polyline(coordinates: &[FixedPointCoordinate]) -> String {
    let mut output = String::with_capacity(coordinates.len() * 8);
    let mut prev_lat = 0i64;
    let mut prev_lon = 0i64;

    for c in coordinates {
        let lat = to_polyline_units(c.lat);
        let lon = to_polyline_units(c.lon);
        encode_value(lat - prev_lat, &mut output);
        encode_value(lon - prev_lon, &mut output);
        prev_lat = lat;
        prev_lon = lon;
    }

    output
}

/// Decode an encoded polyline into `[lat, lon]` degree pairs
///
/// Truncated input stops at the last complete coordinate.
pub fn decode_polyline(encoded: &str) -> Vec<[f64; 2]> {
    let bytes = encoded.as_bytes();
    let mut coordinates = Vec::new();
    let mut index = 0;
    let mut lat = 0i64;
    let mut lon = 0i64;

    while index < bytes.len() {
        let Some(dlat) = decode_value(bytes, &mut index) else { break };
        let Some(dlon) = decode_value(bytes, &mut index) else { break };
        lat += dlat;
        lon += dlon;
        coordinates.push([lat as f64 / POLYLINE_PRECISION, lon as f64 / POLYLINE_PRECISION]);
    }

    coordinates
}

fn to_polyline_units(fixed: i32) -> i64 {
    (fixed as f64 / COORDINATE_PRECISION * POLYLINE_PRECISION).round() as i64
}

fn encode_value(value: i64, output: &mut String) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        output.push(char::from((((v & 0x1f) | 0x20) + 63) as u8));
        v >>= 5;
    }
    output.push(char::from((v + 63) as u8));
}

fn decode_value(bytes: &[u8], index: &mut usize) -> Option<i64> {
    let mut result = 0i64;
    let mut shift = 0;
    loop {
        let b = (*bytes.get(*index)? as i64) - 63;
        *index += 1;
        result |= (b & 0x1f) << shift;
        shift += 5;
        if b < 0x20 {
            break;
        }
    }
    Some(if result & 1 != 0 { !(result >> 1) } else { result >> 1 })
}
