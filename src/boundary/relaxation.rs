use crate::error::{ConfigError, Result};

/// Linearly shrinking constraint relaxation.
///
/// At optimizer iteration `i` the signed distance is increased by
/// `max(0, rate * (horizon - i))`, so early iterates may sit slightly outside
/// the boundary and the constraint becomes exact once `i >= horizon`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxationSchedule {
    rate: f64,
    horizon: u32,
}

impl RelaxationSchedule {
    /// Creates a schedule.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSchedule` if `rate` is negative or not
    /// finite.
    pub fn new(rate: f64, horizon: u32) -> Result<Self> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(ConfigError::InvalidSchedule(format!(
                "rate must be finite and non-negative, got {rate}"
            ))
            .into());
        }
        Ok(Self { rate, horizon })
    }

    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    #[must_use]
    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Offset added to every signed distance at `iteration`.
    #[must_use]
    pub fn offset(&self, iteration: u32) -> f64 {
        (self.rate * (f64::from(self.horizon) - f64::from(iteration))).max(0.0)
    }

    /// Derivative of [`offset`](Self::offset) with respect to the iteration.
    #[must_use]
    pub fn offset_derivative(&self, iteration: u32) -> f64 {
        if iteration < self.horizon {
            -self.rate
        } else {
            0.0
        }
    }

    /// Whether the offset has reached zero.
    #[must_use]
    pub fn is_exhausted(&self, iteration: u32) -> bool {
        iteration >= self.horizon
    }
}
