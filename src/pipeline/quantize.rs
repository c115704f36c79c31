//! Drawing points to integer stitches

use glam::{DVec2, IVec2};

use crate::types::{Bounds, Scale};

/// Scale, flip y and round each point, then re-center the result.
///
/// Output has the same length and order as the input.
pub fn quantize(points: &[DVec2], scale: Scale) -> Vec<IVec2> {
    let stitches = points
        .iter()
        .map(|&p| to_stitch(scale.to_device(p)))
        .collect();
    recenter(stitches)
}

/// Device space is y-down. `f64::round` rounds half away from zero and the
/// casts saturate at the `i32` range.
fn to_stitch(device: DVec2) -> IVec2 {
    IVec2::new(device.x.round() as i32, (-device.y).round() as i32)
}

/// Shift every stitch by the rounded integer bounding-box center.
pub fn recenter(mut stitches: Vec<IVec2>) -> Vec<IVec2> {
    let Some(bounds) = Bounds::<IVec2>::from_points(&stitches) else {
        return stitches;
    };
    let shift = bounds.center();
    if shift != IVec2::ZERO {
        for stitch in &mut stitches {
            *stitch = stitch.saturating_sub(shift);
        }
    }
    stitches
}
