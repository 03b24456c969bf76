use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::geometry::{Orientation, Ring};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::{Bounds, DistanceField, Evaluation};

/// Vertices of the polygonal outline reported for visualization.
const OUTLINE_SEGMENTS: u32 = 100;

/// A circular inclusion boundary.
///
/// The signed distance is `radius - |P - center|`: positive inside.
#[derive(Debug, Clone)]
pub struct CircleBoundary {
    center: Point2,
    radius: f64,
    outline: Ring,
}

impl CircleBoundary {
    /// Creates a circle boundary.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidRadius` if `radius` is not positive and
    /// finite, or `GeometryError::Degenerate` if the centre is not finite.
    pub fn new(center: Point2, radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::InvalidRadius(radius).into());
        }
        if !center.x.is_finite() || !center.y.is_finite() {
            return Err(GeometryError::Degenerate("non-finite circle centre".into()).into());
        }
        let outline = Ring::new(&outline_points(center, radius), Orientation::CounterClockwise)?;
        Ok(Self {
            center,
            radius,
            outline,
        })
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Polygonal approximation of the circle.
    #[must_use]
    pub fn ring(&self) -> &Ring {
        &self.outline
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let r = Vector2::new(self.radius, self.radius);
        Bounds {
            min: self.center - r,
            max: self.center + r,
        }
    }
}

impl DistanceField for CircleBoundary {
    fn rows_per_point(&self) -> usize {
        1
    }

    fn push_point(&self, p: &Point2, out: &mut Evaluation) {
        let offset = p - self.center;
        let r = offset.norm();
        // The gradient is undefined at the centre.
        let gradient = if r < TOLERANCE {
            Vector2::zeros()
        } else {
            -offset / r
        };
        out.push(self.radius - r, gradient);
    }
}

/// Samples `OUTLINE_SEGMENTS` evenly spaced angles over `[0, 2pi]`, both ends
/// included; the repeated end point is dropped by ring normalization.
fn outline_points(center: Point2, radius: f64) -> Vec<Point2> {
    let last = f64::from(OUTLINE_SEGMENTS - 1);
    (0..OUTLINE_SEGMENTS)
        .map(|i| {
            let angle = TAU * f64::from(i) / last;
            Point2::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}
