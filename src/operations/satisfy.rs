use crate::boundary::{BoundaryGeometry, Evaluation};
use crate::error::{QueryError, Result};

/// Default overshoot factor applied to repair moves.
pub const DEFAULT_PAD: f64 = 1.1;

/// Samples per axis of the convex repair search window.
const GRID: u32 = 100;

/// Face distances are pushed at least this far negative before the search, so
/// the repaired point lands strictly inside.
const MIN_VIOLATION: f64 = 0.01;

/// Moves violating points back towards the feasible region.
///
/// Points that already satisfy every constraint row are left untouched.
/// Convex boundaries search a square displacement window for the shortest
/// move that satisfies all linearized face constraints. Every other boundary
/// steps along its distance gradient by `distance * pad`. This is a heuristic:
/// a single call is not guaranteed to restore feasibility.
pub struct Satisfy<'a> {
    geometry: &'a BoundaryGeometry,
    pad: f64,
}

impl<'a> Satisfy<'a> {
    #[must_use]
    pub fn new(geometry: &'a BoundaryGeometry) -> Self {
        Self {
            geometry,
            pad: DEFAULT_PAD,
        }
    }

    #[must_use]
    pub fn with_pad(mut self, pad: f64) -> Self {
        self.pad = pad;
        self
    }

    /// Repairs `x` and `y` in place and returns the number of points moved.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::LengthMismatch` if `x` and `y` differ in length.
    pub fn execute(&self, x: &mut [f64], y: &mut [f64]) -> Result<usize> {
        if x.len() != y.len() {
            return Err(QueryError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            }
            .into());
        }
        let eval = self.geometry.evaluate(x, y)?;
        let moved = match self.geometry {
            BoundaryGeometry::Convex(_) => self.search_convex(&eval, x, y),
            _ => self.step_along_gradient(&eval, x, y),
        };
        Ok(moved)
    }

    fn step_along_gradient(&self, eval: &Evaluation, x: &mut [f64], y: &mut [f64]) -> usize {
        let mut moved = 0;
        for (i, &d) in eval.distances.iter().enumerate() {
            if d < 0.0 {
                x[i] -= eval.ddx[i] * d * self.pad;
                y[i] -= eval.ddy[i] * d * self.pad;
                moved += 1;
            }
        }
        moved
    }

    fn search_convex(&self, eval: &Evaluation, x: &mut [f64], y: &mut [f64]) -> usize {
        let rows = eval.rows_per_point;
        let mut moved = 0;
        for i in 0..x.len() {
            let span = i * rows..(i + 1) * rows;
            let faces: Vec<(f64, f64, f64)> = eval.distances[span.clone()]
                .iter()
                .zip(&eval.ddx[span.clone()])
                .zip(&eval.ddy[span])
                .map(|((&d, &nx), &ny)| {
                    let d = if d < 0.0 { d.min(-MIN_VIOLATION) } else { d };
                    (d, nx, ny)
                })
                .collect();
            let worst = faces.iter().map(|f| f.0).fold(f64::INFINITY, f64::min);
            if worst >= 0.0 {
                continue;
            }

            match shortest_feasible_move(&faces, worst.abs() * self.pad) {
                Some((dx, dy)) => {
                    x[i] += dx;
                    y[i] += dy;
                    moved += 1;
                }
                None => {
                    tracing::warn!(point = i, violation = worst, "no feasible repair move found");
                }
            }
        }
        moved
    }
}

/// Grid search over `[-window, window]^2` for the shortest `(dx, dy)` with
/// `d_j + n_j . (dx, dy) >= 0` for every face `(d_j, n_j)`.
fn shortest_feasible_move(faces: &[(f64, f64, f64)], window: f64) -> Option<(f64, f64)> {
    let step = 2.0 * window / f64::from(GRID - 1);
    let mut best: Option<(f64, f64, f64)> = None;
    for ix in 0..GRID {
        let dx = -window + step * f64::from(ix);
        for iy in 0..GRID {
            let dy = -window + step * f64::from(iy);
            let feasible = faces.iter().all(|&(d, nx, ny)| d + nx * dx + ny * dy >= 0.0);
            if !feasible {
                continue;
            }
            let norm = dx.hypot(dy);
            if best.is_none_or(|(b, _, _)| norm < b) {
                best = Some((norm, dx, dy));
            }
        }
    }
    best.map(|(_, dx, dy)| (dx, dy))
}
