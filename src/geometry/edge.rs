use crate::math::distance_2d::{signed_edge_distance, SignedDistance};
use crate::math::{Point2, Vector2};

use super::ring::Ring;

/// One boundary edge `a -> b` with its precomputed normals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: Point2,
    pub b: Point2,
    /// Unit normal pointing to the feasible side.
    pub normal: Vector2,
    /// Mean of the normals of the two edges meeting at `a`.
    pub a_normal: Vector2,
    /// Mean of the normals of the two edges meeting at `b`.
    pub b_normal: Vector2,
}

impl Edge {
    /// Signed distance and gradient from `p` to this edge.
    #[must_use]
    pub fn distance_to(&self, p: &Point2) -> SignedDistance {
        signed_edge_distance(p, &self.a, &self.b, &self.normal, &self.a_normal, &self.b_normal)
    }
}

/// All edges of one or more rings, flattened into a single table.
///
/// Vertex normals are computed per ring before flattening, so they never mix
/// edges of different rings.
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    edges: Vec<Edge>,
}

impl EdgeTable {
    /// Flattens the edges of `rings` in order.
    pub fn from_rings<'a>(rings: impl IntoIterator<Item = &'a Ring>) -> Self {
        let edges = rings.into_iter().flat_map(Ring::edges).collect();
        Self { edges }
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Signed distance from `p` to every edge, in table order.
    #[must_use]
    pub fn distances_from(&self, p: &Point2) -> Vec<SignedDistance> {
        self.edges.iter().map(|e| e.distance_to(p)).collect()
    }

    /// The edge result with the smallest absolute distance, or `None` for an
    /// empty table.
    #[must_use]
    pub fn nearest(&self, p: &Point2) -> Option<SignedDistance> {
        let all = self.distances_from(p);
        nearest_index(&all).map(|i| all[i])
    }
}

/// Index of the entry with the smallest `|distance|`; the first index wins
/// ties.
#[must_use]
pub fn nearest_index(distances: &[SignedDistance]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, d) in distances.iter().enumerate() {
        let abs = d.distance.abs();
        match best {
            Some((_, b)) if abs >= b => {}
            _ => best = Some((i, abs)),
        }
    }
    best.map(|(i, _)| i)
}
