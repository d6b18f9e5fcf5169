//! Compass labels for bearings

/// Eight-point compass label for a bearing in degrees (0 = north, clockwise)
///
/// Sector boundaries belong to the sector clockwise-before them, so 22.5
/// is still "N" and 22.6 is "NE". Values outside 0..360 wrap around.
pub fn compass_label(bearing: f64) -> &'static str {
    let heading = bearing.rem_euclid(360.0);
    if heading <= 202.5 {
        if heading <= 22.5 {
            return "N";
        }
        if heading <= 67.5 {
            return "NE";
        }
        if heading <= 112.5 {
            return "E";
        }
        if heading <= 157.5 {
            return "SE";
        }
        return "S";
    }
    if heading <= 247.5 {
        return "SW";
    }
    if heading <= 292.5 {
        return "W";
    }
    if heading <= 337.5 {
        return "NW";
    }
    "N"
}
