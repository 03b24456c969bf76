use super::{Point2, Vector2, TOLERANCE};

/// The part of an edge that lies nearest to a query point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NearestFeature {
    /// The start vertex `A`.
    Start,
    /// A point strictly between the endpoints.
    Interior,
    /// The end vertex `B`.
    End,
}

/// Signed distance from a point to one edge, with its gradient.
///
/// Positive on the feasible side of the edge.
#[derive(Debug, Clone, Copy)]
pub struct SignedDistance {
    pub distance: f64,
    /// `(d distance / dx, d distance / dy)` at the query point.
    pub gradient: Vector2,
    pub feature: NearestFeature,
}

/// Classifies the projection parameter `along = (P - A) . AB / |AB|`.
#[must_use]
pub fn classify_projection(along: f64, length: f64) -> NearestFeature {
    if along < 0.0 {
        NearestFeature::Start
    } else if along > length {
        NearestFeature::End
    } else {
        NearestFeature::Interior
    }
}

/// Returns the signed distance from `p` to the edge `a -> b`.
///
/// `normal` is the unit normal of the edge pointing to the feasible side;
/// `a_normal` and `b_normal` are the averaged normals at the endpoints, used to
/// decide the sign when a vertex is the nearest feature. Signs come from
/// dot-product tests only.
///
/// A zero-length edge degenerates to its start vertex.
#[must_use]
pub fn signed_edge_distance(
    p: &Point2,
    a: &Point2,
    b: &Point2,
    normal: &Vector2,
    a_normal: &Vector2,
    b_normal: &Vector2,
) -> SignedDistance {
    let ab = b - a;
    let length = ab.norm();
    let ap = p - a;

    let feature = if length < TOLERANCE {
        NearestFeature::Start
    } else {
        classify_projection(ap.dot(&ab) / length, length)
    };

    match feature {
        NearestFeature::Start => vertex_distance(&ap, a_normal, feature),
        NearestFeature::End => vertex_distance(&(p - b), b_normal, feature),
        NearestFeature::Interior => SignedDistance {
            distance: ap.dot(normal),
            gradient: *normal,
            feature,
        },
    }
}

/// Distance from a vertex along `offset = P - vertex`, signed by which side of
/// the vertex normal the point falls on.
fn vertex_distance(
    offset: &Vector2,
    vertex_normal: &Vector2,
    feature: NearestFeature,
) -> SignedDistance {
    let radius = offset.norm();
    if radius < TOLERANCE {
        // Direction is undefined on the vertex itself.
        return SignedDistance {
            distance: 0.0,
            gradient: Vector2::zeros(),
            feature,
        };
    }
    let sign = if offset.dot(vertex_normal) > 0.0 { 1.0 } else { -1.0 };
    SignedDistance {
        distance: sign * radius,
        gradient: offset * (sign / radius),
        feature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::pt;

    const TOL: f64 = 1e-10;

    // Edge (0,0)→(2,0) of a CCW ring: the feasible side is +y.
    fn edge_args() -> (Point2, Point2, Vector2, Vector2, Vector2) {
        let n = Vector2::new(0.0, 1.0);
        // Neighbouring edges of an axis-aligned CCW square.
        let a_n = (n + Vector2::new(1.0, 0.0)) / 2.0;
        let b_n = (n + Vector2::new(-1.0, 0.0)) / 2.0;
        (pt(0.0, 0.0), pt(2.0, 0.0), n, a_n, b_n)
    }

    #[test]
    fn interior_projection_inside() {
        let (a, b, n, an, bn) = edge_args();
        let d = signed_edge_distance(&pt(1.0, 1.0), &a, &b, &n, &an, &bn);
        assert_eq!(d.feature, NearestFeature::Interior);
        assert!((d.distance - 1.0).abs() < TOL, "d={}", d.distance);
        assert!((d.gradient - n).norm() < TOL);
    }

    #[test]
    fn interior_projection_outside() {
        let (a, b, n, an, bn) = edge_args();
        let d = signed_edge_distance(&pt(1.5, -3.0), &a, &b, &n, &an, &bn);
        assert_eq!(d.feature, NearestFeature::Interior);
        assert!((d.distance + 3.0).abs() < TOL, "d={}", d.distance);
    }

    #[test]
    fn start_vertex_outside_corner() {
        let (a, b, n, an, bn) = edge_args();
        let d = signed_edge_distance(&pt(-3.0, -4.0), &a, &b, &n, &an, &bn);
        assert_eq!(d.feature, NearestFeature::Start);
        assert!((d.distance + 5.0).abs() < TOL, "d={}", d.distance);
        // Gradient points from the point back towards the vertex.
        assert!((d.gradient - Vector2::new(0.6, 0.8)).norm() < TOL);
    }

    #[test]
    fn end_vertex_inside_side() {
        let (a, b, n, an, bn) = edge_args();
        let d = signed_edge_distance(&pt(2.5, 0.1), &a, &b, &n, &an, &bn);
        assert_eq!(d.feature, NearestFeature::End);
        // b_normal = (-0.5, 0.5): offset (0.5, 0.1) is on the wrong side.
        assert!(d.distance < 0.0);
        let expected = (0.25_f64 + 0.01).sqrt();
        assert!((d.distance.abs() - expected).abs() < TOL);
    }

    #[test]
    fn point_on_vertex_is_finite() {
        let (a, b, n, an, bn) = edge_args();
        let d = signed_edge_distance(&pt(2.0, 0.0), &a, &b, &n, &an, &bn);
        assert!(d.distance.abs() < TOL);
        assert!(d.gradient.iter().all(|g| g.is_finite()));
    }

    #[test]
    fn zero_length_edge_uses_start_vertex() {
        let n = Vector2::new(0.0, 1.0);
        let a = pt(1.0, 1.0);
        let d = signed_edge_distance(&pt(1.0, 4.0), &a, &a, &n, &n, &n);
        assert_eq!(d.feature, NearestFeature::Start);
        assert!((d.distance - 3.0).abs() < TOL);
        assert!((d.gradient - n).norm() < TOL);
    }

    #[test]
    fn classify_boundaries() {
        assert_eq!(classify_projection(-1e-12, 1.0), NearestFeature::Start);
        assert_eq!(classify_projection(0.0, 1.0), NearestFeature::Interior);
        assert_eq!(classify_projection(1.0, 1.0), NearestFeature::Interior);
        assert_eq!(classify_projection(1.0 + 1e-12, 1.0), NearestFeature::End);
    }
}
