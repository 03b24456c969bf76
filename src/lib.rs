pub mod boundary;
pub mod config;
pub mod constraint;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;

pub use boundary::{BoundaryGeometry, BoundaryKind, Evaluation};
pub use config::{build, BoundaryConfig, BoundaryShape};
pub use constraint::{BoundaryConstraint, Gradients};
pub use error::{BoundaryError, Result};
