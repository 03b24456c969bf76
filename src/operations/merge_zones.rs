use geo::coordinate_position::CoordPos;
use geo::dimensions::Dimensions;
use geo::{
    Area, BooleanOps, Contains, Coord, Intersects, LineString, MultiPolygon, Polygon, Relate,
    Simplify,
};

use crate::error::Result;
use crate::geometry::{Ring, Zone, ZoneKind};
use crate::math::Point2;

/// Components with an area at or below this are dropped after every step.
pub const DEFAULT_AREA_THRESHOLD: f64 = 1e-3;

/// The feasible region left after merging all zones: disjoint polygons,
/// possibly with holes.
#[derive(Debug, Clone, Default)]
pub struct EffectiveDomain {
    polygons: Vec<Polygon<f64>>,
}

impl EffectiveDomain {
    #[must_use]
    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.polygons
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Total feasible area, holes excluded.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.polygons.iter().map(Area::unsigned_area).sum()
    }

    /// Number of holes over all polygons.
    #[must_use]
    pub fn hole_count(&self) -> usize {
        self.polygons.iter().map(|p| p.interiors().len()).sum()
    }

    /// Flattens the domain into oriented rings.
    ///
    /// Exteriors come out counter-clockwise as inclusions, holes clockwise as
    /// exclusions. Rings that collapsed during the boolean operations are
    /// skipped with a warning.
    #[must_use]
    pub fn rings(&self) -> Vec<(Ring, ZoneKind)> {
        let mut out = Vec::new();
        for (index, polygon) in self.polygons.iter().enumerate() {
            let loops = std::iter::once((polygon.exterior(), ZoneKind::Inclusion))
                .chain(polygon.interiors().iter().map(|r| (r, ZoneKind::Exclusion)));
            for (line, kind) in loops {
                let points: Vec<Point2> = line.coords().map(|c| Point2::new(c.x, c.y)).collect();
                match Ring::new(&points, kind.orientation()) {
                    Ok(ring) => out.push((ring, kind)),
                    Err(err) => {
                        tracing::warn!(polygon = index, %err, "skipping degenerate merged ring");
                    }
                }
            }
        }
        out
    }
}

/// Merges inclusion and exclusion zones, in input order, into an
/// [`EffectiveDomain`].
///
/// An inclusion zone is unioned with every component it overlaps or shares an
/// edge with, and kept as a new component otherwise. Zones meeting only at
/// isolated points stay separate components. An exclusion zone is subtracted from every
/// component it touches, which can punch holes or split components. The
/// result depends on zone order: an exclusion only affects what was included
/// before it.
pub struct MergeZones<'a> {
    zones: &'a [Zone],
    area_threshold: f64,
    simplify: Option<f64>,
}

impl<'a> MergeZones<'a> {
    #[must_use]
    pub fn new(zones: &'a [Zone]) -> Self {
        Self {
            zones,
            area_threshold: DEFAULT_AREA_THRESHOLD,
            simplify: None,
        }
    }

    #[must_use]
    pub fn with_area_threshold(mut self, threshold: f64) -> Self {
        self.area_threshold = threshold;
        self
    }

    /// Simplifies every zone with the given Ramer-Douglas-Peucker tolerance
    /// before merging.
    #[must_use]
    pub fn with_simplify(mut self, tolerance: Option<f64>) -> Self {
        self.simplify = tolerance;
        self
    }

    /// Runs the merge.
    ///
    /// # Errors
    ///
    /// Returns a geometry error if any zone does not normalize into a valid
    /// ring.
    pub fn execute(&self) -> Result<EffectiveDomain> {
        let mut domain: Vec<Polygon<f64>> = Vec::new();

        for (index, zone) in self.zones.iter().enumerate() {
            let polygon = self.to_polygon(zone)?;
            if domain.is_empty() {
                match zone.kind {
                    ZoneKind::Inclusion if polygon.unsigned_area() > self.area_threshold => {
                        domain.push(polygon);
                    }
                    ZoneKind::Inclusion => {
                        tracing::warn!(zone = index, "inclusion zone below area threshold");
                    }
                    ZoneKind::Exclusion => {
                        tracing::warn!(zone = index, "exclusion zone has nothing to cut from");
                    }
                }
                continue;
            }

            domain = match zone.kind {
                ZoneKind::Inclusion => self.include(index, domain, &polygon),
                ZoneKind::Exclusion => self.exclude(index, domain, &polygon),
            };
        }

        Ok(EffectiveDomain { polygons: domain })
    }

    fn to_polygon(&self, zone: &Zone) -> Result<Polygon<f64>> {
        let ring = zone.ring()?;
        let polygon = ring_to_polygon(&ring);
        Ok(match self.simplify {
            Some(tolerance) if tolerance > 0.0 => polygon.simplify(&tolerance),
            _ => polygon,
        })
    }

    fn include(
        &self,
        index: usize,
        domain: Vec<Polygon<f64>>,
        zone: &Polygon<f64>,
    ) -> Vec<Polygon<f64>> {
        let mut merged = MultiPolygon::new(vec![zone.clone()]);
        let mut kept = Vec::with_capacity(domain.len() + 1);

        for (component, existing) in domain.into_iter().enumerate() {
            if existing.contains(zone) {
                tracing::warn!(zone = index, component, "inclusion zone inside existing component");
                merged = merged.union(&MultiPolygon::new(vec![existing]));
            } else if zone.contains(&existing) {
                tracing::warn!(zone = index, component, "inclusion zone overrides component");
            } else if shares_area_or_edge(zone, &existing) {
                merged = merged.union(&MultiPolygon::new(vec![existing]));
            } else {
                kept.push(existing);
            }
        }

        kept.extend(self.large_enough(merged));
        kept
    }

    fn exclude(
        &self,
        index: usize,
        domain: Vec<Polygon<f64>>,
        zone: &Polygon<f64>,
    ) -> Vec<Polygon<f64>> {
        let mut kept = Vec::with_capacity(domain.len());

        for (component, existing) in domain.into_iter().enumerate() {
            if zone.contains(&existing) {
                tracing::warn!(zone = index, component, "exclusion zone consumes component");
            } else if existing.intersects(zone) {
                if existing.contains(zone) {
                    tracing::debug!(zone = index, component, "exclusion zone becomes a hole");
                }
                kept.extend(self.large_enough(existing.difference(zone)));
            } else {
                kept.push(existing);
            }
        }

        kept
    }

    fn large_enough(&self, parts: MultiPolygon<f64>) -> impl Iterator<Item = Polygon<f64>> + '_ {
        parts
            .into_iter()
            .filter(move |p| p.unsigned_area() > self.area_threshold)
    }
}

fn shares_area_or_edge(a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
    let relation = a.relate(b);
    relation.get(CoordPos::Inside, CoordPos::Inside) == Dimensions::TwoDimensional
        || relation.get(CoordPos::OnBoundary, CoordPos::OnBoundary) == Dimensions::OneDimensional
}

/// Converts a normalized ring into a hole-free `geo` polygon.
#[must_use]
pub fn ring_to_polygon(ring: &Ring) -> Polygon<f64> {
    let exterior: LineString<f64> = ring
        .closed_points()
        .iter()
        .map(|p| Coord { x: p.x, y: p.y })
        .collect();
    Polygon::new(exterior, Vec::new())
}
