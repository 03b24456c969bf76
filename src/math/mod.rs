pub mod distance_2d;
pub mod polygon_2d;
pub mod smooth_min;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Shorthand for building a [`Point2`].
#[must_use]
pub fn pt(x: f64, y: f64) -> Point2 {
    Point2::new(x, y)
}
