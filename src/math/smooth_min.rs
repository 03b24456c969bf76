//! Differentiable soft minimum.
//!
//! `S(v) = sum(v_j * w_j) / sum(w_j)` with `w_j = exp(-k * (v_j - min v))`.
//! `S` tends to `min v` as the sharpness `k` grows and is smooth in every
//! `v_j`, unlike `min` itself.

/// Value of the soft minimum and its partial derivatives `dS / dv_j`.
#[derive(Debug, Clone)]
pub struct SmoothMin {
    pub value: f64,
    pub partials: Vec<f64>,
}

/// Computes the soft minimum of `values` with the given `sharpness`.
///
/// Weights are shifted by the true minimum before exponentiation, so large
/// values never overflow. An empty slice yields `+inf` with no partials.
#[must_use]
pub fn smooth_min(values: &[f64], sharpness: f64) -> SmoothMin {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    if values.is_empty() || !min.is_finite() {
        return SmoothMin {
            value: min,
            partials: vec![0.0; values.len()],
        };
    }

    let weights: Vec<f64> = values
        .iter()
        .map(|v| (-sharpness * (v - min)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    let value = values
        .iter()
        .zip(&weights)
        .map(|(v, w)| v * w)
        .sum::<f64>()
        / total;

    let partials = values
        .iter()
        .zip(&weights)
        .map(|(v, w)| w / total * (1.0 - sharpness * (v - value)))
        .collect();

    SmoothMin { value, partials }
}
