pub mod interpolation;
pub mod norm;
pub mod vector;

/// Normalizes an angle in degrees into the [0, 360) interval
pub fn normalize_angle(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Smallest absolute difference between two angles in degrees
pub fn angle_distance(a: f64, b: f64) -> f64 {
    let diff = normalize_angle(a - b);
    diff.min(360.0 - diff)
}
