use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::{left_normal, signed_double_area};
use crate::math::{Point2, TOLERANCE};

use super::edge::Edge;

/// Winding direction of a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
}

/// A closed, consistently wound boundary loop.
///
/// Invariants established by [`Ring::new`]:
/// - at least three distinct vertices,
/// - the last stored point repeats the first,
/// - the signed area is non-zero and its sign matches the requested
///   orientation.
///
/// With this winding the left normal of every edge points to the feasible
/// side: into the polygon for a counter-clockwise inclusion ring, out of the
/// hole for a clockwise exclusion ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    points: Vec<Point2>,
}

impl Ring {
    /// Normalizes a raw vertex sequence into a closed ring with the requested
    /// winding.
    ///
    /// Consecutive duplicate vertices are collapsed and an open sequence is
    /// closed. The vertex order is reversed if its winding does not match.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewVertices` if fewer than three distinct
    /// vertices remain, or `GeometryError::Degenerate` if a coordinate is not
    /// finite or the signed area is zero (collinear or repeated points).
    pub fn new(points: &[Point2], orientation: Orientation) -> Result<Self> {
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(GeometryError::Degenerate("non-finite vertex coordinate".into()).into());
        }

        let mut open: Vec<Point2> = points.to_vec();
        open.dedup_by(|a, b| (*a - *b).norm() < TOLERANCE);
        if open.len() > 1 && (open[0] - open[open.len() - 1]).norm() < TOLERANCE {
            open.pop();
        }
        if open.len() < 3 {
            return Err(GeometryError::TooFewVertices { count: open.len() }.into());
        }

        let double_area = signed_double_area(&open);
        if double_area.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "ring of {} vertices has zero signed area",
                open.len()
            ))
            .into());
        }

        let is_ccw = double_area > 0.0;
        if is_ccw != (orientation == Orientation::CounterClockwise) {
            open.reverse();
        }
        open.push(open[0]);
        Ok(Self { points: open })
    }

    /// Returns the vertices without the repeated closing vertex.
    #[must_use]
    pub fn vertices(&self) -> &[Point2] {
        &self.points[..self.points.len() - 1]
    }

    /// Returns the vertices including the repeated closing vertex.
    #[must_use]
    pub fn closed_points(&self) -> &[Point2] {
        &self.points
    }

    /// Number of edges (equal to the number of distinct vertices).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Signed area: positive for counter-clockwise rings.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_double_area(self.vertices()) * 0.5
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        if self.signed_area() > 0.0 {
            Orientation::CounterClockwise
        } else {
            Orientation::Clockwise
        }
    }

    /// Builds the edge list with unit normals and averaged vertex normals.
    ///
    /// The normal at vertex `i` is the mean of the normals of the edges
    /// ending and starting there.
    #[must_use]
    pub fn edges(&self) -> Vec<Edge> {
        let n = self.edge_count();
        let normals: Vec<_> = (0..n)
            .map(|i| {
                let ab = self.points[i + 1] - self.points[i];
                left_normal(ab) / ab.norm()
            })
            .collect();
        let vertex_normals: Vec<_> = (0..n)
            .map(|i| (normals[i] + normals[(i + n - 1) % n]) / 2.0)
            .collect();

        (0..n)
            .map(|i| Edge {
                a: self.points[i],
                b: self.points[i + 1],
                normal: normals[i],
                a_normal: vertex_normals[i],
                b_normal: vertex_normals[(i + 1) % n],
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::BoundaryError;
    use crate::math::{pt, Vector2};

    fn square_cw() -> Vec<Point2> {
        vec![pt(0.0, 0.0), pt(0.0, 10.0), pt(10.0, 10.0), pt(10.0, 0.0)]
    }

    #[test]
    fn closes_open_ring() {
        let ring = Ring::new(&square_cw(), Orientation::Clockwise).unwrap();
        let pts = ring.closed_points();
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], pts[4]);
        assert_eq!(ring.edge_count(), 4);
    }

    #[test]
    fn already_closed_ring_is_not_closed_twice() {
        let mut pts = square_cw();
        pts.push(pts[0]);
        let ring = Ring::new(&pts, Orientation::Clockwise).unwrap();
        assert_eq!(ring.closed_points().len(), 5);
    }

    #[test]
    fn reverses_to_requested_winding() {
        let ring = Ring::new(&square_cw(), Orientation::CounterClockwise).unwrap();
        assert_eq!(ring.orientation(), Orientation::CounterClockwise);
        assert!((ring.signed_area() - 100.0).abs() < TOLERANCE);

        let ring = Ring::new(&square_cw(), Orientation::Clockwise).unwrap();
        assert_eq!(ring.orientation(), Orientation::Clockwise);
        assert!((ring.signed_area() + 100.0).abs() < TOLERANCE);
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let pts = vec![pt(0.0, 0.0), pt(1.0, 1.0), pt(3.0, 3.0)];
        let err = Ring::new(&pts, Orientation::CounterClockwise).unwrap_err();
        assert!(matches!(
            err,
            BoundaryError::Geometry(GeometryError::Degenerate(_))
        ));
    }

    #[test]
    fn duplicate_points_collapse() {
        let pts = vec![pt(0.0, 0.0), pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 0.0)];
        let err = Ring::new(&pts, Orientation::CounterClockwise).unwrap_err();
        assert!(matches!(
            err,
            BoundaryError::Geometry(GeometryError::TooFewVertices { count: 2 })
        ));
    }

    #[test]
    fn non_finite_rejected() {
        let pts = vec![pt(0.0, 0.0), pt(f64::NAN, 0.0), pt(1.0, 1.0)];
        assert!(Ring::new(&pts, Orientation::CounterClockwise).is_err());
    }

    #[test]
    fn ccw_edge_normals_point_inward() {
        let ring = Ring::new(&square_cw(), Orientation::CounterClockwise).unwrap();
        let centre = pt(5.0, 5.0);
        for edge in ring.edges() {
            let mid = edge.a + (edge.b - edge.a) / 2.0;
            assert!((centre - mid).dot(&edge.normal) > 0.0);
            assert!((edge.normal.norm() - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn cw_edge_normals_point_outward() {
        let ring = Ring::new(&square_cw(), Orientation::Clockwise).unwrap();
        let centre = pt(5.0, 5.0);
        for edge in ring.edges() {
            let mid = edge.a + (edge.b - edge.a) / 2.0;
            assert!((centre - mid).dot(&edge.normal) < 0.0);
        }
    }

    #[test]
    fn vertex_normals_are_shared_between_neighbours() {
        let ring = Ring::new(&square_cw(), Orientation::CounterClockwise).unwrap();
        let edges = ring.edges();
        for i in 0..edges.len() {
            let next = &edges[(i + 1) % edges.len()];
            assert!((edges[i].b_normal - next.a_normal).norm() < TOLERANCE);
        }
        // Corner at the origin: mean of the inward normals (1,0) and (0,1).
        let corner = edges.iter().find(|e| e.a == pt(0.0, 0.0)).unwrap();
        assert!((corner.a_normal - Vector2::new(0.5, 0.5)).norm() < TOLERANCE);
    }
}
