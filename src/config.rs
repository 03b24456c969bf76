use crate::boundary::{
    BoundaryGeometry, BoundaryKind, CircleBoundary, ConvexBoundary, ConvexShape,
    MultiPolygonBoundary, MultiPolygonOptions, PolygonBoundary, ReductionMethod,
    RelaxationSchedule,
};
use crate::error::{ConfigError, Result};
use crate::geometry::Zone;
use crate::math::Point2;

/// The raw geometry a boundary is built from.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryShape {
    /// One vertex sequence, for the convex, box and polygon kinds. A
    /// multi-polygon treats it as a single inclusion zone.
    Points(Vec<Point2>),
    Circle { center: Point2, radius: f64 },
    /// Ordered inclusion and exclusion zones.
    Zones(Vec<Zone>),
}

impl BoundaryShape {
    fn name(&self) -> &'static str {
        match self {
            Self::Points(_) => "a point list",
            Self::Circle { .. } => "a centre and radius",
            Self::Zones(_) => "a zone list",
        }
    }
}

/// Everything needed to build a boundary constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryConfig {
    pub kind: BoundaryKind,
    pub shape: BoundaryShape,
    /// Only read for [`BoundaryKind::MultiPolygon`].
    pub multi_polygon: MultiPolygonOptions,
    pub relaxation: Option<RelaxationSchedule>,
}

impl BoundaryConfig {
    /// A single-ring boundary of the given kind.
    #[must_use]
    pub fn new(kind: BoundaryKind, points: Vec<Point2>) -> Self {
        Self {
            kind,
            shape: BoundaryShape::Points(points),
            multi_polygon: MultiPolygonOptions::default(),
            relaxation: None,
        }
    }

    /// A single-ring boundary from a configuration tag such as
    /// `"convex_hull"` or `"polygon"`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedBoundaryType` for an unknown tag.
    pub fn from_tag(tag: &str, points: Vec<Point2>) -> Result<Self> {
        Ok(Self::new(tag.parse()?, points))
    }

    #[must_use]
    pub fn circle(center: Point2, radius: f64) -> Self {
        Self {
            kind: BoundaryKind::Circle,
            shape: BoundaryShape::Circle { center, radius },
            multi_polygon: MultiPolygonOptions::default(),
            relaxation: None,
        }
    }

    #[must_use]
    pub fn zones(zones: Vec<Zone>) -> Self {
        Self {
            kind: BoundaryKind::MultiPolygon,
            shape: BoundaryShape::Zones(zones),
            multi_polygon: MultiPolygonOptions::default(),
            relaxation: None,
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: ReductionMethod) -> Self {
        self.multi_polygon.method = method;
        self
    }

    #[must_use]
    pub fn with_simplify(mut self, tolerance: f64) -> Self {
        self.multi_polygon.simplify = Some(tolerance);
        self
    }

    #[must_use]
    pub fn with_area_threshold(mut self, threshold: f64) -> Self {
        self.multi_polygon.area_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_relaxation(mut self, schedule: RelaxationSchedule) -> Self {
        self.relaxation = Some(schedule);
        self
    }

    /// Identifier derived from the boundary content.
    ///
    /// Circles give `circle_boundary_comp_<cx>_<cy>_<r>`; everything else
    /// gives `xyboundary_comp_<kind>_<sum>` where `sum` adds up all
    /// coordinates of the (first) vertex sequence. Numbers are truncated to
    /// integers.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn constraint_id(&self) -> String {
        match &self.shape {
            BoundaryShape::Circle { center, radius } => format!(
                "circle_boundary_comp_{}_{}_{}",
                center.x as i64, center.y as i64, *radius as i64
            ),
            BoundaryShape::Points(points) => {
                format!("xyboundary_comp_{}_{}", self.kind, coordinate_sum(points) as i64)
            }
            BoundaryShape::Zones(zones) => {
                let sum = zones.first().map_or(0.0, |z| coordinate_sum(&z.points));
                format!("xyboundary_comp_{}_{}", self.kind, sum as i64)
            }
        }
    }
}

fn coordinate_sum(points: &[Point2]) -> f64 {
    points.iter().map(|p| p.x + p.y).sum()
}

/// Builds the immutable geometry described by `config`.
///
/// # Errors
///
/// Returns `ConfigError::ShapeMismatch` if the shape does not fit the kind,
/// `ConfigError::MissingZones` for an empty multi-polygon, and any geometry
/// error raised while normalizing the input.
pub fn build(config: &BoundaryConfig) -> Result<BoundaryGeometry> {
    let geometry = match (config.kind, &config.shape) {
        (BoundaryKind::ConvexHull, BoundaryShape::Points(p)) => {
            BoundaryGeometry::Convex(ConvexBoundary::new(p, ConvexShape::Hull)?)
        }
        (BoundaryKind::Rectangle, BoundaryShape::Points(p)) => {
            BoundaryGeometry::Convex(ConvexBoundary::new(p, ConvexShape::Rectangle)?)
        }
        (BoundaryKind::Square, BoundaryShape::Points(p)) => {
            BoundaryGeometry::Convex(ConvexBoundary::new(p, ConvexShape::Square)?)
        }
        (BoundaryKind::Polygon, BoundaryShape::Points(p)) => {
            BoundaryGeometry::Polygon(PolygonBoundary::new(p)?)
        }
        (BoundaryKind::Circle, BoundaryShape::Circle { center, radius }) => {
            BoundaryGeometry::Circle(CircleBoundary::new(*center, *radius)?)
        }
        (BoundaryKind::MultiPolygon, BoundaryShape::Zones(zones)) => {
            if zones.is_empty() {
                return Err(ConfigError::MissingZones.into());
            }
            BoundaryGeometry::MultiPolygon(MultiPolygonBoundary::new(
                zones.clone(),
                &config.multi_polygon,
            )?)
        }
        (BoundaryKind::MultiPolygon, BoundaryShape::Points(p)) => BoundaryGeometry::MultiPolygon(
            MultiPolygonBoundary::new(vec![Zone::inclusion(p.clone())], &config.multi_polygon)?,
        ),
        _ => {
            return Err(ConfigError::ShapeMismatch {
                kind: config.kind.as_str(),
                shape: config.shape.name(),
            }
            .into())
        }
    };
    Ok(geometry)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::BoundaryError;
    use crate::math::pt;

    fn square() -> Vec<Point2> {
        vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)]
    }

    #[test]
    fn builds_every_single_ring_kind() {
        for (tag, rows) in [
            ("convex_hull", 4),
            ("rectangle", 4),
            ("square", 4),
            ("polygon", 1),
            ("multi_polygon", 1),
        ] {
            let config = BoundaryConfig::from_tag(tag, square()).unwrap();
            let geometry = build(&config).unwrap();
            assert_eq!(geometry.kind().as_str(), tag);
            assert_eq!(geometry.rows_per_point(), rows);
        }
    }

    #[test]
    fn unknown_tag_fails() {
        assert!(matches!(
            BoundaryConfig::from_tag("triangle", square()).unwrap_err(),
            BoundaryError::Config(ConfigError::UnsupportedBoundaryType(_))
        ));
    }

    #[test]
    fn shape_must_match_kind() {
        let config = BoundaryConfig {
            kind: BoundaryKind::Circle,
            ..BoundaryConfig::new(BoundaryKind::Polygon, square())
        };
        assert!(matches!(
            build(&config).unwrap_err(),
            BoundaryError::Config(ConfigError::ShapeMismatch { kind: "circle", .. })
        ));
    }

    #[test]
    fn empty_zones_fail() {
        assert!(matches!(
            build(&BoundaryConfig::zones(Vec::new())).unwrap_err(),
            BoundaryError::Config(ConfigError::MissingZones)
        ));
    }

    #[test]
    fn builder_sets_multi_polygon_options() {
        let config = BoundaryConfig::zones(vec![Zone::inclusion(square())])
            .with_method(ReductionMethod::SmoothMin { sharpness: 4.0 })
            .with_simplify(0.5)
            .with_area_threshold(1.0);
        assert_eq!(
            config.multi_polygon.method,
            ReductionMethod::SmoothMin { sharpness: 4.0 }
        );
        assert_eq!(config.multi_polygon.simplify, Some(0.5));
        let BoundaryGeometry::MultiPolygon(m) = build(&config).unwrap() else {
            panic!("expected a multi-polygon");
        };
        assert_eq!(m.method(), ReductionMethod::SmoothMin { sharpness: 4.0 });
    }

    #[test]
    fn identifiers_follow_content() {
        let polygon = BoundaryConfig::new(BoundaryKind::Polygon, square());
        assert_eq!(polygon.constraint_id(), "xyboundary_comp_polygon_40");

        let circle = BoundaryConfig::circle(pt(3.7, -2.2), 10.9);
        assert_eq!(circle.constraint_id(), "circle_boundary_comp_3_-2_10");

        let zones = BoundaryConfig::zones(vec![
            Zone::inclusion(square()),
            Zone::exclusion(vec![pt(1.0, 1.0), pt(2.0, 1.0), pt(2.0, 2.0)]),
        ]);
        assert_eq!(zones.constraint_id(), "xyboundary_comp_multi_polygon_40");
    }
}
