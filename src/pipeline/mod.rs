//! Points to stitches
//!
//! This module is organized into submodules:
//! - `normalize`: bounding-box centering
//! - `densify`: segment subdivision
//! - `quantize`: scaling, rounding and integer re-centering
//!
//! [`build_stitches`] is the only path from points to stitches; script and
//! structured-command input both go through it.

pub mod densify;
pub mod normalize;
pub mod quantize;

pub use densify::{densify, planned_len};
pub use normalize::{Centered, center};
pub use quantize::{quantize, recenter};

use glam::{DVec2, IVec2};
use serde::Serialize;

use crate::config::StitchConfig;
use crate::defaults;
use crate::errors::PipelineError;

/// Stitches plus the metadata an encoder needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StitchPlan {
    /// Device-unit stitches in needle order
    pub stitches: Vec<IVec2>,
    pub stitch_count: usize,
    /// Bounding-box midpoint subtracted from the raw points
    pub center_offset: DVec2,
    /// Raw points after centering, before densification
    pub centered_points: Vec<DVec2>,
}

/// Center, densify and quantize a raw point sequence.
pub fn build_stitches(points: &[DVec2], config: &StitchConfig) -> Result<StitchPlan, PipelineError> {
    let scale = config.scale()?;
    let max_stitch = config.max_stitch()?;

    if points.len() < defaults::MIN_POINTS {
        return Err(PipelineError::InsufficientPoints {
            count: points.len(),
        });
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(PipelineError::NonFinitePoint { index });
    }

    let max_step = scale.to_drawing_len(max_stitch);
    let Centered { points: centered, offset } = center(points);

    // Measure the centered points: that is what densify walks, and the
    // translation can move a segment length across a step boundary.
    let planned = planned_len(&centered, max_step);
    if planned > u64::try_from(config.max_stitches).unwrap_or(u64::MAX) {
        return Err(PipelineError::TooManyStitches {
            count: planned,
            limit: config.max_stitches,
        });
    }

    let dense = densify(&centered, max_step);
    let stitches = quantize(&dense, scale);
    crate::log::debug!(
        points = points.len(),
        stitches = stitches.len(),
        %scale,
        max_step,
        "built stitches"
    );

    Ok(StitchPlan {
        stitch_count: stitches.len(),
        stitches,
        center_offset: offset,
        centered_points: centered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bounds, NumericError};

    fn line(from: (f64, f64), to: (f64, f64)) -> Vec<DVec2> {
        vec![DVec2::new(from.0, from.1), DVec2::new(to.0, to.1)]
    }

    #[test]
    fn ten_unit_line() {
        let plan = build_stitches(&line((0.0, 0.0), (10.0, 0.0)), &StitchConfig::new(1.0, 3.0))
            .unwrap();
        assert_eq!(plan.center_offset, DVec2::new(5.0, 0.0));
        assert_eq!(plan.centered_points, line((-5.0, 0.0), (5.0, 0.0)));
        assert_eq!(plan.stitch_count, 5);
        assert_eq!(
            plan.stitches,
            vec![
                IVec2::new(-5, 0),
                IVec2::new(-3, 0),
                IVec2::new(0, 0),
                IVec2::new(3, 0),
                IVec2::new(5, 0),
            ]
        );
    }

    #[test]
    fn max_stitch_is_in_device_units() {
        // 10 drawing units at scale 10 is 100 device units; 100 / 30 -> 4 steps
        let plan = build_stitches(&line((0.0, 0.0), (0.0, 10.0)), &StitchConfig::new(10.0, 30.0))
            .unwrap();
        assert_eq!(plan.stitch_count, 5);
        assert_eq!(plan.stitches.first(), Some(&IVec2::new(0, 50)));
        assert_eq!(plan.stitches.last(), Some(&IVec2::new(0, -50)));
    }

    #[test]
    fn stitch_box_is_centered() {
        let points = [
            DVec2::new(65.0, 85.0),
            DVec2::new(85.0, 85.0),
            DVec2::new(99.142, 70.858),
            DVec2::new(99.142, 50.858),
        ];
        let plan = build_stitches(&points, &StitchConfig::new(3.0, 3.0)).unwrap();
        let bounds = Bounds::<IVec2>::from_points(&plan.stitches).unwrap();
        let skew = bounds.min + bounds.max;
        assert!(skew.x.abs() <= 1 && skew.y.abs() <= 1, "skew {skew}");
        assert_eq!(plan.stitch_count, plan.stitches.len());
        assert_eq!(plan.centered_points.len(), points.len());
    }

    #[test]
    fn too_few_points() {
        let config = StitchConfig::default();
        assert_eq!(
            build_stitches(&[], &config),
            Err(PipelineError::InsufficientPoints { count: 0 })
        );
        assert_eq!(
            build_stitches(&[DVec2::ZERO], &config),
            Err(PipelineError::InsufficientPoints { count: 1 })
        );
    }

    #[test]
    fn config_is_checked_before_points() {
        let err = build_stitches(&[], &StitchConfig::new(-1.0, 3.0)).unwrap_err();
        assert_eq!(
            err,
            PipelineError::InvalidConfig {
                field: "scale_mm",
                value: -1.0,
                reason: NumericError::Negative
            }
        );
        let err = build_stitches(&[], &StitchConfig::new(1.0, f64::NAN)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidConfig {
                field: "max_stitch_mm",
                reason: NumericError::NaN,
                ..
            }
        ));
    }

    #[test]
    fn non_finite_point() {
        let points = [DVec2::ZERO, DVec2::new(1.0, f64::INFINITY), DVec2::ONE];
        assert_eq!(
            build_stitches(&points, &StitchConfig::default()),
            Err(PipelineError::NonFinitePoint { index: 1 })
        );
    }

    #[test]
    fn stitch_ceiling() {
        let points = line((0.0, 0.0), (10.0, 0.0));
        let config = StitchConfig::new(1.0, 3.0).with_max_stitches(4);
        assert_eq!(
            build_stitches(&points, &config),
            Err(PipelineError::TooManyStitches { count: 5, limit: 4 })
        );
        assert!(build_stitches(&points, &config.with_max_stitches(5)).is_ok());
    }

    #[test]
    fn ceiling_bounds_the_stitches_actually_emitted() {
        // Segment lengths sit near exact multiples of the step, where
        // centering shifts ceil(d / step) by one.
        let points = [
            DVec2::new(367.1749300545181, 644.3991494953773),
            DVec2::new(485.4980906790787, 40.396325867894205),
            DVec2::new(546.5511140947892, 893.0485855044678),
        ];
        let config = StitchConfig::new(1.0, 9.769577334386417).with_max_stitches(152);
        match build_stitches(&points, &config) {
            Ok(plan) => assert!(
                plan.stitch_count <= config.max_stitches,
                "{} stitches over a limit of {}",
                plan.stitch_count,
                config.max_stitches
            ),
            Err(PipelineError::TooManyStitches { count, limit }) => {
                assert!(count > limit as u64);
            }
            Err(other) => panic!("unexpected error: {other:?}"),
        }

        let centered = center(&points).points;
        let max_step = 9.769577334386417;
        assert_eq!(
            planned_len(&centered, max_step),
            densify(&centered, max_step).len() as u64
        );
    }

    #[test]
    fn huge_extent_hits_ceiling_instead_of_allocating() {
        let points = line((-1e300, 0.0), (1e300, 0.0));
        let err = build_stitches(&points, &StitchConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::TooManyStitches { .. }));
    }

    #[test]
    fn plan_serializes_as_plain_arrays() {
        let plan = build_stitches(&line((0.0, 0.0), (2.0, 0.0)), &StitchConfig::new(1.0, 3.0))
            .unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "stitches": [[-1, 0], [1, 0]],
                "stitch_count": 2,
                "center_offset": [1.0, 0.0],
                "centered_points": [[-1.0, 0.0], [1.0, 0.0]],
            })
        );
    }
}
