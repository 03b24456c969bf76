use std::str::FromStr;

use crate::error::{BoundaryError, ConfigError, Result};
use crate::math::Point2;

use super::ring::{Orientation, Ring};

/// Whether a zone adds to or removes from the feasible domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ZoneKind {
    #[default]
    Inclusion,
    Exclusion,
}

impl ZoneKind {
    /// Canonical winding for rings of this kind: counter-clockwise for
    /// inclusion, clockwise for exclusion.
    #[must_use]
    pub fn orientation(self) -> Orientation {
        match self {
            Self::Inclusion => Orientation::CounterClockwise,
            Self::Exclusion => Orientation::Clockwise,
        }
    }

    /// Parses an optional tag; a missing tag means inclusion.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedZoneKind` for an unknown tag.
    pub fn from_tag(tag: Option<&str>) -> Result<Self> {
        tag.map_or(Ok(Self::Inclusion), str::parse)
    }
}

impl From<bool> for ZoneKind {
    fn from(include: bool) -> Self {
        if include {
            Self::Inclusion
        } else {
            Self::Exclusion
        }
    }
}

impl FromStr for ZoneKind {
    type Err = BoundaryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "i" | "include" | "inclusion" | "true" | "1" => Ok(Self::Inclusion),
            "e" | "exclude" | "exclusion" | "false" | "0" => Ok(Self::Exclusion),
            other => Err(ConfigError::UnsupportedZoneKind(other.to_owned()).into()),
        }
    }
}

/// A raw vertex sequence tagged as inclusion or exclusion.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub points: Vec<Point2>,
    pub kind: ZoneKind,
}

impl Zone {
    #[must_use]
    pub fn new(points: Vec<Point2>, kind: ZoneKind) -> Self {
        Self { points, kind }
    }

    #[must_use]
    pub fn inclusion(points: Vec<Point2>) -> Self {
        Self::new(points, ZoneKind::Inclusion)
    }

    #[must_use]
    pub fn exclusion(points: Vec<Point2>) -> Self {
        Self::new(points, ZoneKind::Exclusion)
    }

    /// Normalizes the zone into a ring wound for its kind.
    ///
    /// # Errors
    ///
    /// Propagates the normalization errors of [`Ring::new`].
    pub fn ring(&self) -> Result<Ring> {
        Ring::new(&self.points, self.kind.orientation())
    }
}
