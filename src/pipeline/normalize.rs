//! Bounding-box centering

use glam::DVec2;

use crate::types::Bounds;

/// Points translated so their bounding box is centered on the origin
#[derive(Debug, Clone, PartialEq)]
pub struct Centered {
    pub points: Vec<DVec2>,
    /// Midpoint that was subtracted from every point
    pub offset: DVec2,
}

/// Center a point sequence. An empty input gives an empty output and a zero offset.
pub fn center(points: &[DVec2]) -> Centered {
    let Some(bounds) = Bounds::<DVec2>::from_points(points) else {
        return Centered {
            points: Vec::new(),
            offset: DVec2::ZERO,
        };
    };
    let offset = bounds.center();
    Centered {
        points: points.iter().map(|&p| p - offset).collect(),
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        let centered = center(&[]);
        assert!(centered.points.is_empty());
        assert_eq!(centered.offset, DVec2::ZERO);
    }

    #[test]
    fn single_point_moves_to_origin() {
        let centered = center(&[DVec2::new(65.0, 85.0)]);
        assert_eq!(centered.points, vec![DVec2::ZERO]);
        assert_eq!(centered.offset, DVec2::new(65.0, 85.0));
    }

    #[test]
    fn box_becomes_symmetric() {
        let centered = center(&[
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 4.0),
        ]);
        assert_eq!(centered.offset, DVec2::new(5.0, 2.0));
        assert_eq!(
            centered.points,
            vec![
                DVec2::new(-5.0, -2.0),
                DVec2::new(5.0, -2.0),
                DVec2::new(5.0, 2.0)
            ]
        );
        let bounds = Bounds::<DVec2>::from_points(&centered.points).unwrap();
        assert_eq!(bounds.min, -bounds.max);
    }

    #[test]
    fn centering_is_idempotent() {
        let points = [
            DVec2::new(65.0, 85.0),
            DVec2::new(79.142, 70.858),
            DVec2::new(79.142, 50.858),
            DVec2::new(-3.7, 12.25),
        ];
        let once = center(&points);
        let twice = center(&once.points);
        assert!(twice.offset.abs_diff_eq(DVec2::ZERO, 1e-9));
        for (a, b) in once.points.iter().zip(&twice.points) {
            assert!(a.abs_diff_eq(*b, 1e-9), "{a} != {b}");
        }
    }
}
