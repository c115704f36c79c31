//! Subdivide long segments so no step exceeds a maximum length
//!
//! Interpolated points lie on the straight segment between two original
//! points. Every original point is kept, so the path keeps its corners and its
//! exact endpoints.

use glam::DVec2;

/// Number of output points each segment contributes, its destination included.
fn segment_steps(from: DVec2, to: DVec2, max_step: f64) -> u64 {
    let distance = from.distance(to);
    if distance <= max_step {
        1
    } else {
        // float-to-int casts saturate, so an infinite ratio becomes u64::MAX
        (distance / max_step).ceil() as u64
    }
}

/// Length [`densify`] would produce, computed without allocating.
pub fn planned_len(points: &[DVec2], max_step: f64) -> u64 {
    if points.len() < 2 {
        return points.len() as u64;
    }
    points.windows(2).fold(1u64, |total, pair| {
        total.saturating_add(segment_steps(pair[0], pair[1], max_step))
    })
}

/// Insert points so consecutive points are at most `max_step` apart.
///
/// `max_step` must be positive; fewer than two points are returned unchanged.
pub fn densify(points: &[DVec2], max_step: f64) -> Vec<DVec2> {
    let [first, ..] = points else {
        return Vec::new();
    };
    if points.len() < 2 {
        return points.to_vec();
    }

    let mut dense = Vec::with_capacity(points.len());
    dense.push(*first);
    for pair in points.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let steps = segment_steps(from, to, max_step);
        for i in 1..steps {
            dense.push(from.lerp(to, i as f64 / steps as f64));
        }
        dense.push(to);
    }
    dense
}
