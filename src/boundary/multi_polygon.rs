use std::fmt;
use std::str::FromStr;

use crate::error::{BoundaryError, ConfigError, GeometryError, Result};
use crate::geometry::edge::nearest_index;
use crate::geometry::{EdgeTable, Ring, Zone, ZoneKind};
use crate::math::distance_2d::SignedDistance;
use crate::math::polygon_2d::bounding_box;
use crate::math::smooth_min::smooth_min;
use crate::math::{Point2, Vector2};
use crate::operations::merge_zones::{MergeZones, DEFAULT_AREA_THRESHOLD};

use super::{Bounds, DistanceField, Evaluation};

/// How per-edge distances collapse into one value per point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ReductionMethod {
    /// Distance to the nearest edge or vertex. Exact, but the gradient jumps
    /// where the nearest feature changes.
    #[default]
    Nearest,
    /// Soft minimum of the absolute edge distances, re-signed by the nearest
    /// feature. Larger `sharpness` tracks `Nearest` more closely.
    SmoothMin { sharpness: f64 },
}

impl ReductionMethod {
    /// Soft-minimum reduction with unit sharpness.
    #[must_use]
    pub fn smooth_min() -> Self {
        Self::SmoothMin { sharpness: 1.0 }
    }

    /// Checks that a soft-minimum sharpness is positive and finite.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSmoothing` otherwise.
    pub fn validate(self) -> Result<Self> {
        match self {
            Self::SmoothMin { sharpness } if !sharpness.is_finite() || sharpness <= 0.0 => {
                Err(ConfigError::InvalidSmoothing(sharpness).into())
            }
            _ => Ok(self),
        }
    }
}

impl fmt::Display for ReductionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("nearest"),
            Self::SmoothMin { .. } => f.write_str("smooth_min"),
        }
    }
}

impl FromStr for ReductionMethod {
    type Err = BoundaryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nearest" => Ok(Self::Nearest),
            "smooth_min" => Ok(Self::smooth_min()),
            other => Err(ConfigError::UnsupportedMethod(other.to_owned()).into()),
        }
    }
}

/// Settings for building a [`MultiPolygonBoundary`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiPolygonOptions {
    pub method: ReductionMethod,
    /// Ramer-Douglas-Peucker tolerance applied to every zone before merging.
    pub simplify: Option<f64>,
    /// Merged components with an area at or below this are dropped.
    pub area_threshold: f64,
}

impl Default for MultiPolygonOptions {
    fn default() -> Self {
        Self {
            method: ReductionMethod::Nearest,
            simplify: None,
            area_threshold: DEFAULT_AREA_THRESHOLD,
        }
    }
}

/// Feasible region built from ordered inclusion and exclusion zones.
///
/// The zones are merged once into polygons with holes. All resulting rings
/// share a single edge table, and each point reports one signed distance
/// reduced over every edge.
#[derive(Debug, Clone)]
pub struct MultiPolygonBoundary {
    zones: Vec<Zone>,
    options: MultiPolygonOptions,
    rings: Vec<(Ring, ZoneKind)>,
    edges: EdgeTable,
}

impl MultiPolygonBoundary {
    /// Merges `zones` and builds the edge table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingZones` for an empty zone list,
    /// `ConfigError::InvalidSmoothing` for a bad sharpness, any zone
    /// normalization error, and `GeometryError::Degenerate` when nothing
    /// feasible remains after merging.
    pub fn new(zones: Vec<Zone>, options: &MultiPolygonOptions) -> Result<Self> {
        if zones.is_empty() {
            return Err(ConfigError::MissingZones.into());
        }
        let options = MultiPolygonOptions {
            method: options.method.validate()?,
            ..*options
        };

        let domain = MergeZones::new(&zones)
            .with_area_threshold(options.area_threshold)
            .with_simplify(options.simplify)
            .execute()?;
        let rings = domain.rings();
        if !rings.iter().any(|(_, kind)| *kind == ZoneKind::Inclusion) {
            return Err(GeometryError::Degenerate(
                "merged zones leave no feasible area".into(),
            )
            .into());
        }
        let edges = EdgeTable::from_rings(rings.iter().map(|(ring, _)| ring));

        tracing::debug!(
            zones = zones.len(),
            polygons = domain.polygons().len(),
            rings = rings.len(),
            edges = edges.len(),
            area = domain.area(),
            method = %options.method,
            "multi-polygon boundary ready"
        );

        Ok(Self {
            zones,
            options,
            rings,
            edges,
        })
    }

    /// Rebuilds the boundary from the same zones with a new simplification
    /// tolerance.
    ///
    /// # Errors
    ///
    /// Same as [`MultiPolygonBoundary::new`].
    pub fn simplified(&self, tolerance: f64) -> Result<Self> {
        let options = MultiPolygonOptions {
            simplify: Some(tolerance),
            ..self.options
        };
        Self::new(self.zones.clone(), &options)
    }

    /// The input zones, before merging.
    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    #[must_use]
    pub fn options(&self) -> &MultiPolygonOptions {
        &self.options
    }

    #[must_use]
    pub fn method(&self) -> ReductionMethod {
        self.options.method
    }

    /// Merged rings: exteriors counter-clockwise, holes clockwise.
    #[must_use]
    pub fn rings(&self) -> &[(Ring, ZoneKind)] {
        &self.rings
    }

    #[must_use]
    pub fn edges(&self) -> &EdgeTable {
        &self.edges
    }

    /// Extent of all input zones, exclusions included.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let all: Vec<Point2> = self
            .zones
            .iter()
            .flat_map(|z| z.points.iter().copied())
            .collect();
        let (min, max) = bounding_box(&all).unwrap_or((Point2::origin(), Point2::origin()));
        Bounds { min, max }
    }
}

impl DistanceField for MultiPolygonBoundary {
    fn rows_per_point(&self) -> usize {
        1
    }

    fn push_point(&self, p: &Point2, out: &mut Evaluation) {
        let all = self.edges.distances_from(p);
        let Some(nearest) = nearest_index(&all) else {
            out.push(f64::NEG_INFINITY, Vector2::zeros());
            return;
        };
        match self.options.method {
            ReductionMethod::Nearest => out.push(all[nearest].distance, all[nearest].gradient),
            ReductionMethod::SmoothMin { sharpness } => {
                let (distance, gradient) = reduce_smooth(&all, &all[nearest], sharpness);
                out.push(distance, gradient);
            }
        }
    }
}

/// Soft minimum over `|d_j|`, signed by the nearest feature.
///
/// With `s` the sign of the nearest distance and `S` the soft minimum, the
/// result is `s * S` and its gradient is `s * sum_j dS/d|d_j| * sign(d_j) * g_j`.
fn reduce_smooth(
    all: &[SignedDistance],
    nearest: &SignedDistance,
    sharpness: f64,
) -> (f64, Vector2) {
    let sign = |d: f64| if d < 0.0 { -1.0 } else { 1.0 };
    let magnitudes: Vec<f64> = all.iter().map(|d| d.distance.abs()).collect();
    let soft = smooth_min(&magnitudes, sharpness);
    let gradient = all
        .iter()
        .zip(&soft.partials)
        .fold(Vector2::zeros(), |acc, (d, w)| acc + d.gradient * (w * sign(d.distance)));
    let s = sign(nearest.distance);
    (s * soft.value, gradient * s)
}
