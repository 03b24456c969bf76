use crate::error::Result;
use crate::geometry::{EdgeTable, Orientation, Ring};
use crate::math::{Point2, Vector2};

use super::{DistanceField, Evaluation};

/// A single, possibly non-convex, inclusion polygon.
///
/// Each point reports the signed distance to its nearest edge or vertex.
#[derive(Debug, Clone)]
pub struct PolygonBoundary {
    ring: Ring,
    edges: EdgeTable,
}

impl PolygonBoundary {
    /// Normalizes `points` into a counter-clockwise ring.
    ///
    /// # Errors
    ///
    /// Propagates the normalization errors of [`Ring::new`].
    pub fn new(points: &[Point2]) -> Result<Self> {
        let ring = Ring::new(points, Orientation::CounterClockwise)?;
        let edges = EdgeTable::from_rings([&ring]);
        Ok(Self { ring, edges })
    }

    #[must_use]
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    #[must_use]
    pub fn edges(&self) -> &EdgeTable {
        &self.edges
    }
}

impl DistanceField for PolygonBoundary {
    fn rows_per_point(&self) -> usize {
        1
    }

    fn push_point(&self, p: &Point2, out: &mut Evaluation) {
        match self.edges.nearest(p) {
            Some(d) => out.push(d.distance, d.gradient),
            // A normalized ring always has edges.
            None => out.push(f64::NEG_INFINITY, Vector2::zeros()),
        }
    }
}
