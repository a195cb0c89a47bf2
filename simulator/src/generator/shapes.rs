/// Squared distance from `(row, col)` to `center`, in pixels².
pub fn distance_sq(row: usize, col: usize, center: [usize; 2]) -> f64 {
    let dr = row as f64 - center[0] as f64;
    let dc = col as f64 - center[1] as f64;
    dr * dr + dc * dc
}

pub fn in_disc(row: usize, col: usize, center: [usize; 2], radius: usize) -> bool {
    distance_sq(row, col, center) <= (radius * radius) as f64
}

/// Height profile of a spherical cap: `peak` at the center, 0 at the rim.
pub fn dome_height(row: usize, col: usize, center: [usize; 2], radius: usize, peak: f32) -> f32 {
    if radius == 0 {
        return 0.0;
    }
    let normalized = distance_sq(row, col, center) / (radius * radius) as f64;
    if normalized >= 1.0 {
        0.0
    } else {
        peak * (1.0 - normalized).sqrt() as f32
    }
}
