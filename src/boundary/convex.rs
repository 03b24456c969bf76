use crate::error::{GeometryError, Result};
use crate::geometry::{Edge, Orientation, Ring};
use crate::math::polygon_2d::{bounding_box, convex_hull};
use crate::math::{Point2, Vector2};

use super::{BoundaryKind, DistanceField, Evaluation};

/// How a convex boundary is derived from the input points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvexShape {
    /// Convex hull of the points.
    Hull,
    /// Smallest axis-aligned rectangle covering the points.
    Rectangle,
    /// Smallest axis-aligned square covering the points, centred on the
    /// bounding box.
    Square,
}

impl ConvexShape {
    #[must_use]
    pub fn kind(self) -> BoundaryKind {
        match self {
            Self::Hull => BoundaryKind::ConvexHull,
            Self::Rectangle => BoundaryKind::Rectangle,
            Self::Square => BoundaryKind::Square,
        }
    }
}

/// A convex polygon whose faces are constrained independently.
///
/// The distance to face `j` is `(P - A_j) . n_j` with `n_j` the inward unit
/// normal, so every face reports a positive value for interior points. For a
/// convex polygon the point is feasible exactly when all face distances are
/// non-negative, so each (point, face) pair is its own constraint row.
#[derive(Debug, Clone)]
pub struct ConvexBoundary {
    shape: ConvexShape,
    ring: Ring,
    faces: Vec<Edge>,
}

impl ConvexBoundary {
    /// Builds the convex boundary of `points` for the given shape.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewVertices` when fewer than three distinct
    /// points are given, and `GeometryError::Degenerate` when a coordinate is
    /// not finite or the derived polygon has zero area.
    pub fn new(points: &[Point2], shape: ConvexShape) -> Result<Self> {
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(GeometryError::Degenerate("non-finite vertex coordinate".into()).into());
        }
        let vertices = match shape {
            ConvexShape::Hull => convex_hull(points),
            ConvexShape::Rectangle | ConvexShape::Square => box_corners(points, shape)?,
        };
        let ring = Ring::new(&vertices, Orientation::CounterClockwise)?;
        let faces = ring.edges();
        Ok(Self { shape, ring, faces })
    }

    #[must_use]
    pub fn shape(&self) -> ConvexShape {
        self.shape
    }

    /// The counter-clockwise convex ring.
    #[must_use]
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Inward unit normals, one per face.
    pub fn normals(&self) -> impl Iterator<Item = Vector2> + '_ {
        self.faces.iter().map(|f| f.normal)
    }

    /// Signed distance from `p` to every face.
    pub fn face_distances<'a>(&'a self, p: &'a Point2) -> impl Iterator<Item = f64> + 'a {
        self.faces.iter().map(move |f| (p - f.a).dot(&f.normal))
    }
}

impl DistanceField for ConvexBoundary {
    fn rows_per_point(&self) -> usize {
        self.faces.len()
    }

    fn push_point(&self, p: &Point2, out: &mut Evaluation) {
        for face in &self.faces {
            out.push((p - face.a).dot(&face.normal), face.normal);
        }
    }
}

fn box_corners(points: &[Point2], shape: ConvexShape) -> Result<Vec<Point2>> {
    let (min, max) = bounding_box(points).ok_or(GeometryError::TooFewVertices { count: 0 })?;
    let centre = Point2::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
    let mut half = (max - min) / 2.0;
    if shape == ConvexShape::Square {
        let r = half.x.max(half.y);
        half = Vector2::new(r, r);
    }
    Ok(vec![
        Point2::new(centre.x - half.x, centre.y - half.y),
        Point2::new(centre.x + half.x, centre.y - half.y),
        Point2::new(centre.x + half.x, centre.y + half.y),
        Point2::new(centre.x - half.x, centre.y + half.y),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::BoundaryError;
    use crate::math::pt;
    use approx::assert_abs_diff_eq;

    fn square() -> Vec<Point2> {
        vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)]
    }

    #[test]
    fn centre_of_square_is_five_from_every_face() {
        let b = ConvexBoundary::new(&square(), ConvexShape::Hull).unwrap();
        let d: Vec<f64> = b.face_distances(&pt(5.0, 5.0)).collect();
        assert_eq!(d.len(), 4);
        for v in d {
            assert_abs_diff_eq!(v, 5.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn outside_right_face_is_negative_five() {
        let b = ConvexBoundary::new(&square(), ConvexShape::Hull).unwrap();
        let d: Vec<f64> = b.face_distances(&pt(15.0, 5.0)).collect();
        let min = d.iter().copied().fold(f64::INFINITY, f64::min);
        assert_abs_diff_eq!(min, -5.0, epsilon = 1e-12);
        // Exactly one face is violated.
        assert_eq!(d.iter().filter(|v| **v < 0.0).count(), 1);
    }

    #[test]
    fn zero_on_a_face() {
        let b = ConvexBoundary::new(&square(), ConvexShape::Hull).unwrap();
        let d: Vec<f64> = b.face_distances(&pt(10.0, 3.0)).collect();
        let min = d.iter().copied().fold(f64::INFINITY, f64::min);
        assert_abs_diff_eq!(min, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn hull_ignores_interior_points_and_input_winding() {
        let pts = vec![
            pt(0.0, 10.0),
            pt(10.0, 10.0),
            pt(4.0, 6.0),
            pt(10.0, 0.0),
            pt(0.0, 0.0),
        ];
        let b = ConvexBoundary::new(&pts, ConvexShape::Hull).unwrap();
        assert_eq!(b.face_count(), 4);
        assert_eq!(b.ring().orientation(), Orientation::CounterClockwise);
    }

    #[test]
    fn rectangle_covers_points() {
        let pts = vec![pt(0.0, 0.0), pt(6.0, 1.0), pt(2.0, 4.0)];
        let b = ConvexBoundary::new(&pts, ConvexShape::Rectangle).unwrap();
        let v = b.ring().vertices();
        assert_eq!(v.len(), 4);
        assert_abs_diff_eq!(b.ring().signed_area(), 24.0, epsilon = 1e-9);
    }

    #[test]
    fn square_uses_larger_extent_about_centre() {
        let pts = vec![pt(0.0, 0.0), pt(6.0, 1.0), pt(2.0, 4.0)];
        let b = ConvexBoundary::new(&pts, ConvexShape::Square).unwrap();
        assert_abs_diff_eq!(b.ring().signed_area(), 36.0, epsilon = 1e-9);
        let (min, max) = bounding_box(b.ring().vertices()).unwrap();
        assert_abs_diff_eq!(min.y, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(max.y, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn normals_are_inward_units() {
        let b = ConvexBoundary::new(&square(), ConvexShape::Hull).unwrap();
        let sum: Vector2 = b.normals().sum();
        assert!(sum.norm() < 1e-12);
        for n in b.normals() {
            assert_abs_diff_eq!(n.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn collinear_points_fail() {
        let pts = vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0)];
        assert!(matches!(
            ConvexBoundary::new(&pts, ConvexShape::Hull).unwrap_err(),
            BoundaryError::Geometry(_)
        ));
        assert!(ConvexBoundary::new(&pts, ConvexShape::Rectangle).is_err());
    }

    #[test]
    fn non_finite_points_fail() {
        let mut pts = square();
        pts.push(pt(f64::NAN, 3.0));
        for shape in [ConvexShape::Hull, ConvexShape::Rectangle, ConvexShape::Square] {
            assert!(matches!(
                ConvexBoundary::new(&pts, shape).unwrap_err(),
                BoundaryError::Geometry(GeometryError::Degenerate(_))
            ));
        }
        pts[4] = pt(2.0, f64::INFINITY);
        assert!(ConvexBoundary::new(&pts, ConvexShape::Square).is_err());
    }
}
