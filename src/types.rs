//! Validated numeric primitives and bounding boxes.
//!
//! Drawing coordinates are `DVec2` in abstract drawing units; stitches are
//! `IVec2` in device units. The only conversion between the two spaces goes
//! through [`Scale`].

use std::fmt;

use glam::{DVec2, IVec2};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Accept only finite, strictly positive values.
pub fn require_positive(value: f64) -> Result<f64, NumericError> {
    if value.is_nan() {
        Err(NumericError::NaN)
    } else if value.is_infinite() {
        Err(NumericError::Infinite)
    } else if value == 0.0 {
        Err(NumericError::Zero)
    } else if value < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(value)
    }
}

/// Device units per drawing unit.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Scale(f64);

impl Scale {
    /// Create a Scale with validation (rejects NaN, infinite, zero, negative)
    pub fn try_new(device_per_drawing: f64) -> Result<Self, NumericError> {
        require_positive(device_per_drawing).map(Scale)
    }

    /// Convert a point in drawing units to device units (no axis flip).
    #[inline]
    pub fn to_device(self, p: DVec2) -> DVec2 {
        p * self.0
    }

    /// Convert a length in device units to drawing units.
    #[inline]
    pub fn to_drawing_len(self, device_len: f64) -> f64 {
        device_len / self.0
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds<V> {
    pub min: V,
    pub max: V,
}

impl Bounds<DVec2> {
    /// Bounding box of a point set, `None` when empty.
    pub fn from_points(points: &[DVec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(
            Bounds { min: *first, max: *first },
            |b, &p| Bounds { min: b.min.min(p), max: b.max.max(p) },
        ))
    }

    /// Midpoint of the box. Halves before adding so extreme extents cannot overflow.
    pub fn center(&self) -> DVec2 {
        self.min * 0.5 + self.max * 0.5
    }

    /// Width and height
    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }
}

impl Bounds<IVec2> {
    /// Bounding box of a stitch set, `None` when empty.
    pub fn from_points(points: &[IVec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(
            Bounds { min: *first, max: *first },
            |b, &p| Bounds { min: b.min.min(p), max: b.max.max(p) },
        ))
    }

    /// Midpoint of the box rounded to the nearest integer (half away from zero).
    pub fn center(&self) -> IVec2 {
        let mid = |lo: i32, hi: i32| ((i64::from(lo) + i64::from(hi)) as f64 / 2.0).round() as i32;
        IVec2::new(mid(self.min.x, self.max.x), mid(self.min.y, self.max.y))
    }
}
