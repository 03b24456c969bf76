mod circle;
mod convex;
mod multi_polygon;
mod polygon;
mod relaxation;

pub use circle::CircleBoundary;
pub use convex::{ConvexBoundary, ConvexShape};
pub use multi_polygon::{MultiPolygonBoundary, MultiPolygonOptions, ReductionMethod};
pub use polygon::PolygonBoundary;
pub use relaxation::RelaxationSchedule;

use std::fmt;
use std::str::FromStr;

use nalgebra::DMatrix;

use crate::error::{BoundaryError, ConfigError, QueryError, Result};
use crate::geometry::{Ring, ZoneKind};
use crate::math::{Point2, Vector2};

/// Boundary type tag as used in layout configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    ConvexHull,
    Rectangle,
    Square,
    Polygon,
    MultiPolygon,
    Circle,
}

impl BoundaryKind {
    /// Returns the configuration tag for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConvexHull => "convex_hull",
            Self::Rectangle => "rectangle",
            Self::Square => "square",
            Self::Polygon => "polygon",
            Self::MultiPolygon => "multi_polygon",
            Self::Circle => "circle",
        }
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryKind {
    type Err = BoundaryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "convex_hull" => Ok(Self::ConvexHull),
            "rectangle" => Ok(Self::Rectangle),
            "square" => Ok(Self::Square),
            "polygon" => Ok(Self::Polygon),
            "multi_polygon" => Ok(Self::MultiPolygon),
            "circle" => Ok(Self::Circle),
            other => Err(ConfigError::UnsupportedBoundaryType(other.to_owned()).into()),
        }
    }
}

/// Distances and point-local derivatives for every constraint row.
///
/// Row `r` belongs to point `r / rows_per_point`. `ddx[r]` and `ddy[r]` are
/// the derivatives of `distances[r]` with respect to that point's own
/// coordinates; all other derivatives are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub distances: Vec<f64>,
    pub ddx: Vec<f64>,
    pub ddy: Vec<f64>,
    pub rows_per_point: usize,
}

impl Evaluation {
    fn with_capacity(points: usize, rows_per_point: usize) -> Self {
        let rows = points * rows_per_point;
        Self {
            distances: Vec::with_capacity(rows),
            ddx: Vec::with_capacity(rows),
            ddy: Vec::with_capacity(rows),
            rows_per_point,
        }
    }

    fn push(&mut self, distance: f64, gradient: Vector2) {
        self.distances.push(distance);
        self.ddx.push(gradient.x);
        self.ddy.push(gradient.y);
    }

    /// Number of points this evaluation covers.
    #[must_use]
    pub fn point_count(&self) -> usize {
        if self.rows_per_point == 0 {
            0
        } else {
            self.distances.len() / self.rows_per_point
        }
    }

    /// Dense `rows x points` Jacobian of the distances with respect to x.
    #[must_use]
    pub fn jacobian_x(&self) -> DMatrix<f64> {
        self.dense(&self.ddx)
    }

    /// Dense `rows x points` Jacobian of the distances with respect to y.
    #[must_use]
    pub fn jacobian_y(&self) -> DMatrix<f64> {
        self.dense(&self.ddy)
    }

    fn dense(&self, values: &[f64]) -> DMatrix<f64> {
        let mut m = DMatrix::zeros(values.len(), self.point_count());
        for (row, v) in values.iter().enumerate() {
            m[(row, row / self.rows_per_point)] = *v;
        }
        m
    }
}

/// A boundary that yields signed distances for points.
pub trait DistanceField {
    /// Constraint rows produced per point.
    fn rows_per_point(&self) -> usize;

    /// Appends the rows for `p` to `out`.
    fn push_point(&self, p: &Point2, out: &mut Evaluation);
}

/// Axis-aligned extent of a boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point2,
    pub max: Point2,
}

/// Coordinate axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Bounds {
    /// Tightens design-variable limits for `axis` to the boundary extent.
    ///
    /// Without existing limits the boundary extent itself is returned.
    #[must_use]
    pub fn limits(&self, axis: Axis, current: Option<(f64, f64)>) -> (f64, f64) {
        let (lo, hi) = match axis {
            Axis::X => (self.min.x, self.max.x),
            Axis::Y => (self.min.y, self.max.y),
        };
        match current {
            Some((cur_lo, cur_hi)) => (cur_lo.max(lo), cur_hi.min(hi)),
            None => (lo, hi),
        }
    }
}

/// An immutable, fully built boundary.
#[derive(Debug, Clone)]
pub enum BoundaryGeometry {
    Convex(ConvexBoundary),
    Polygon(PolygonBoundary),
    Circle(CircleBoundary),
    MultiPolygon(MultiPolygonBoundary),
}

impl BoundaryGeometry {
    /// The configuration tag this geometry was built for.
    #[must_use]
    pub fn kind(&self) -> BoundaryKind {
        match self {
            Self::Convex(c) => c.shape().kind(),
            Self::Polygon(_) => BoundaryKind::Polygon,
            Self::Circle(_) => BoundaryKind::Circle,
            Self::MultiPolygon(_) => BoundaryKind::MultiPolygon,
        }
    }

    fn field(&self) -> &dyn DistanceField {
        match self {
            Self::Convex(c) => c,
            Self::Polygon(p) => p,
            Self::Circle(c) => c,
            Self::MultiPolygon(m) => m,
        }
    }

    /// Constraint rows produced per point.
    #[must_use]
    pub fn rows_per_point(&self) -> usize {
        self.field().rows_per_point()
    }

    /// Total constraint rows for `n_points` points.
    #[must_use]
    pub fn constraint_count(&self, n_points: usize) -> usize {
        n_points * self.rows_per_point()
    }

    /// Evaluates signed distances and derivatives for all points.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::LengthMismatch` if `x` and `y` differ in length.
    pub fn evaluate(&self, x: &[f64], y: &[f64]) -> Result<Evaluation> {
        if x.len() != y.len() {
            return Err(QueryError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            }
            .into());
        }
        let field = self.field();
        let mut out = Evaluation::with_capacity(x.len(), field.rows_per_point());
        for (&px, &py) in x.iter().zip(y) {
            field.push_point(&Point2::new(px, py), &mut out);
        }
        Ok(out)
    }

    /// Resolved oriented rings, for visualization.
    #[must_use]
    pub fn rings(&self) -> Vec<(Ring, ZoneKind)> {
        match self {
            Self::Convex(c) => vec![(c.ring().clone(), ZoneKind::Inclusion)],
            Self::Polygon(p) => vec![(p.ring().clone(), ZoneKind::Inclusion)],
            Self::Circle(c) => vec![(c.ring().clone(), ZoneKind::Inclusion)],
            Self::MultiPolygon(m) => m.rings().to_vec(),
        }
    }

    /// Axis-aligned extent used to limit design variables.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Convex(c) => ring_bounds(c.ring()),
            Self::Polygon(p) => ring_bounds(p.ring()),
            Self::Circle(c) => c.bounds(),
            Self::MultiPolygon(m) => m.bounds(),
        }
    }

    /// Re-merges a multi-polygon with the given simplification tolerance.
    /// Other kinds are returned unchanged.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`MultiPolygonBoundary::simplified`].
    pub fn simplified(&self, tolerance: f64) -> Result<Self> {
        match self {
            Self::MultiPolygon(m) => Ok(Self::MultiPolygon(m.simplified(tolerance)?)),
            other => Ok(other.clone()),
        }
    }
}

fn ring_bounds(ring: &Ring) -> Bounds {
    let (min, max) = crate::math::polygon_2d::bounding_box(ring.vertices())
        .unwrap_or((Point2::origin(), Point2::origin()));
    Bounds { min, max }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::pt;

    fn square() -> Vec<Point2> {
        vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)]
    }

    #[test]
    fn kind_tags_round_trip() {
        for kind in [
            BoundaryKind::ConvexHull,
            BoundaryKind::Rectangle,
            BoundaryKind::Square,
            BoundaryKind::Polygon,
            BoundaryKind::MultiPolygon,
            BoundaryKind::Circle,
        ] {
            assert_eq!(kind.as_str().parse::<BoundaryKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "hexagon".parse::<BoundaryKind>().unwrap_err();
        assert!(matches!(
            err,
            BoundaryError::Config(ConfigError::UnsupportedBoundaryType(ref s)) if s == "hexagon"
        ));
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let geom = BoundaryGeometry::Polygon(PolygonBoundary::new(&square()).unwrap());
        let err = geom.evaluate(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            BoundaryError::Query(QueryError::LengthMismatch { x: 2, y: 1 })
        ));
    }

    #[test]
    fn convex_rows_per_point_and_jacobian_layout() {
        let geom = BoundaryGeometry::Convex(
            ConvexBoundary::new(&square(), ConvexShape::Hull).unwrap(),
        );
        assert_eq!(geom.rows_per_point(), 4);
        assert_eq!(geom.constraint_count(3), 12);

        let eval = geom.evaluate(&[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0]).unwrap();
        let jx = eval.jacobian_x();
        assert_eq!(jx.shape(), (12, 3));
        for row in 0..12 {
            for col in 0..3 {
                if col != row / 4 {
                    assert!(jx[(row, col)].abs() < 1e-15);
                }
            }
        }
    }

    #[test]
    fn per_point_jacobian_is_diagonal() {
        let geom = BoundaryGeometry::Polygon(PolygonBoundary::new(&square()).unwrap());
        let eval = geom.evaluate(&[1.0, 5.0], &[5.0, 9.0]).unwrap();
        let jx = eval.jacobian_x();
        let jy = eval.jacobian_y();
        assert_eq!(jx.shape(), (2, 2));
        assert!((jx[(0, 0)] - 1.0).abs() < 1e-12);
        assert!((jy[(1, 1)] + 1.0).abs() < 1e-12);
        assert!(jx[(0, 1)].abs() < 1e-15 && jx[(1, 0)].abs() < 1e-15);
    }

    #[test]
    fn bounds_tighten_existing_limits() {
        let b = Bounds {
            min: pt(0.0, -5.0),
            max: pt(10.0, 5.0),
        };
        assert_eq!(b.limits(Axis::X, None), (0.0, 10.0));
        assert_eq!(b.limits(Axis::X, Some((-3.0, 7.0))), (0.0, 7.0));
        assert_eq!(b.limits(Axis::Y, Some((-1.0, 20.0))), (-1.0, 5.0));
    }
}
