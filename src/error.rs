use thiserror::Error;

/// Top-level error type for the boundary constraint engine.
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Errors related to the supplied boundary geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("ring needs at least 3 distinct vertices, got {count}")]
    TooFewVertices { count: usize },

    #[error("circle radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
}

/// Errors related to boundary configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported boundary type '{0}'")]
    UnsupportedBoundaryType(String),

    #[error("unsupported zone kind '{0}'")]
    UnsupportedZoneKind(String),

    #[error("unsupported reduction method '{0}'")]
    UnsupportedMethod(String),

    #[error("boundary type '{kind}' cannot be built from {shape}")]
    ShapeMismatch { kind: &'static str, shape: &'static str },

    #[error("multi-polygon boundary needs at least one zone")]
    MissingZones,

    #[error("invalid relaxation schedule: {0}")]
    InvalidSchedule(String),

    #[error("smoothing sharpness must be positive and finite, got {0}")]
    InvalidSmoothing(f64),
}

/// Errors raised by per-iteration queries.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("coordinate arrays differ in length: x has {x}, y has {y}")]
    LengthMismatch { x: usize, y: usize },
}

/// Convenience type alias for results using [`BoundaryError`].
pub type Result<T> = std::result::Result<T, BoundaryError>;
