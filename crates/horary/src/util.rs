//! Shared angle helpers for ecliptic longitudes.

/// Normalize an angle to [0, 360) degrees.
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg % 360.0;
    let r = if r < 0.0 { r + 360.0 } else { r };
    // -1e-20 % 360 + 360 rounds to exactly 360.0
    if r >= 360.0 { 0.0 } else { r }
}

/// Normalize an angle to (-180, +180].
pub fn normalize_to_pm180(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Shortest arc between two longitudes, in [0, 180].
pub fn angular_separation(lon_a: f64, lon_b: f64) -> f64 {
    let raw = (normalize_360(lon_a) - normalize_360(lon_b)).abs() % 360.0;
    if raw > 180.0 { 360.0 - raw } else { raw }
}

/// Distance from `from` to `to` travelling in the direction of increasing longitude.
pub fn forward_distance(from: f64, to: f64) -> f64 {
    normalize_360(to - from)
}

/// Degrees already travelled inside the current 30-degree sign.
pub fn degree_in_sign(lon: f64) -> f64 {
    normalize_360(lon) % 30.0
}
