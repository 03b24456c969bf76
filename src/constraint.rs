use nalgebra::{DMatrix, DVector};

use crate::boundary::{BoundaryGeometry, Bounds, Evaluation, RelaxationSchedule};
use crate::config::{build, BoundaryConfig};
use crate::error::Result;
use crate::geometry::{Ring, ZoneKind};
use crate::operations::satisfy::{Satisfy, DEFAULT_PAD};

/// Jacobians of the constraint vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    /// `rows x points` derivative with respect to the x coordinates.
    pub dx: DMatrix<f64>,
    /// `rows x points` derivative with respect to the y coordinates.
    pub dy: DMatrix<f64>,
    /// Derivative with respect to the iteration counter; present only when a
    /// relaxation schedule is configured.
    pub dt: Option<DVector<f64>>,
}

#[derive(Debug, Clone)]
struct CachedEvaluation {
    x: Vec<f64>,
    y: Vec<f64>,
    iteration: Option<u32>,
    evaluation: Evaluation,
}

impl CachedEvaluation {
    fn matches(&self, x: &[f64], y: &[f64], iteration: Option<u32>) -> bool {
        self.iteration == iteration && self.x == x && self.y == y
    }
}

/// A built boundary plus the per-run state an optimizer needs around it.
///
/// Value and Jacobian requests for the same positions share one evaluation
/// through a single-entry cache keyed on the positions and, when relaxation
/// is configured, the iteration.
#[derive(Debug, Clone)]
pub struct BoundaryConstraint {
    id: String,
    geometry: BoundaryGeometry,
    relaxation: Option<RelaxationSchedule>,
    cache: Option<CachedEvaluation>,
    evaluations: usize,
}

impl BoundaryConstraint {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        geometry: BoundaryGeometry,
        relaxation: Option<RelaxationSchedule>,
    ) -> Self {
        Self {
            id: id.into(),
            geometry,
            relaxation,
            cache: None,
            evaluations: 0,
        }
    }

    /// Builds the geometry described by `config`.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`build`].
    pub fn from_config(config: &BoundaryConfig) -> Result<Self> {
        let geometry = build(config)?;
        Ok(Self::new(config.constraint_id(), geometry, config.relaxation))
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn geometry(&self) -> &BoundaryGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn relaxation(&self) -> Option<&RelaxationSchedule> {
        self.relaxation.as_ref()
    }

    /// Length of the constraint vector for `n_points` points.
    #[must_use]
    pub fn constraint_count(&self, n_points: usize) -> usize {
        self.geometry.constraint_count(n_points)
    }

    /// Number of geometry evaluations actually performed.
    #[must_use]
    pub fn evaluation_count(&self) -> usize {
        self.evaluations
    }

    #[must_use]
    pub fn rings(&self) -> Vec<(Ring, ZoneKind)> {
        self.geometry.rings()
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.geometry.bounds()
    }

    /// Signed distances, one row per constraint. Non-negative is feasible.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::LengthMismatch` if `x` and `y` differ in length.
    pub fn distances(&mut self, x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
        Ok(self.evaluation(x, y, None)?.distances.clone())
    }

    /// Jacobians of [`distances`](Self::distances). `dt` is always `None`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::LengthMismatch` if `x` and `y` differ in length.
    pub fn gradients(&mut self, x: &[f64], y: &[f64]) -> Result<Gradients> {
        let eval = self.evaluation(x, y, None)?;
        Ok(Gradients {
            dx: eval.jacobian_x(),
            dy: eval.jacobian_y(),
            dt: None,
        })
    }

    /// Distances with the relaxation offset for `iteration` added.
    ///
    /// Without a schedule this equals [`distances`](Self::distances).
    ///
    /// # Errors
    ///
    /// Returns `QueryError::LengthMismatch` if `x` and `y` differ in length.
    pub fn relaxed_distances(
        &mut self,
        x: &[f64],
        y: &[f64],
        iteration: u32,
    ) -> Result<Vec<f64>> {
        let offset = self.relaxation.map_or(0.0, |s| s.offset(iteration));
        let eval = self.evaluation(x, y, Some(iteration))?;
        Ok(eval.distances.iter().map(|d| d + offset).collect())
    }

    /// Jacobians of [`relaxed_distances`](Self::relaxed_distances), including
    /// the iteration column when a schedule is configured.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::LengthMismatch` if `x` and `y` differ in length.
    pub fn relaxed_gradients(
        &mut self,
        x: &[f64],
        y: &[f64],
        iteration: u32,
    ) -> Result<Gradients> {
        let schedule = self.relaxation;
        let eval = self.evaluation(x, y, Some(iteration))?;
        let rows = eval.distances.len();
        Ok(Gradients {
            dx: eval.jacobian_x(),
            dy: eval.jacobian_y(),
            dt: schedule.map(|s| DVector::from_element(rows, s.offset_derivative(iteration))),
        })
    }

    /// Total violation `-sum(min(d, 0))`; zero when every row is feasible.
    #[must_use]
    pub fn penalty(distances: &[f64]) -> f64 {
        -distances.iter().map(|d| d.min(0.0)).sum::<f64>()
    }

    /// Moves violating points back inside, in place, with the default pad.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::LengthMismatch` if `x` and `y` differ in length.
    pub fn satisfy(&self, x: &mut [f64], y: &mut [f64]) -> Result<usize> {
        self.satisfy_with_pad(x, y, DEFAULT_PAD)
    }

    /// Like [`satisfy`](Self::satisfy) with an explicit overshoot factor.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::LengthMismatch` if `x` and `y` differ in length.
    pub fn satisfy_with_pad(&self, x: &mut [f64], y: &mut [f64], pad: f64) -> Result<usize> {
        Satisfy::new(&self.geometry).with_pad(pad).execute(x, y)
    }

    fn evaluation(
        &mut self,
        x: &[f64],
        y: &[f64],
        iteration: Option<u32>,
    ) -> Result<&Evaluation> {
        // Without relaxation the iteration has no effect on the result.
        let iteration = iteration.filter(|_| self.relaxation.is_some());
        let entry = match self.cache.take() {
            Some(cached) if cached.matches(x, y, iteration) => cached,
            _ => {
                let evaluation = self.geometry.evaluate(x, y)?;
                self.evaluations += 1;
                CachedEvaluation {
                    x: x.to_vec(),
                    y: y.to_vec(),
                    iteration,
                    evaluation,
                }
            }
        };
        Ok(&self.cache.insert(entry).evaluation)
    }
}
