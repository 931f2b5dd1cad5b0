//! Field goal make probability as a logistic function of distance-to-goal.

use serde::{Deserialize, Serialize};

/// L2 penalty on the slope. The intercept is unpenalized.
const SLOPE_PENALTY: f64 = 1.0;
const MAX_NEWTON_STEPS: usize = 50;
const STEP_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldGoalModel {
    pub intercept: f64,
    /// Log-odds change per yard of distance-to-goal.
    pub coefficient: f64,
}

fn sigmoid(t: f64) -> f64 {
    if t >= 0.0 {
        1.0 / (1.0 + (-t).exp())
    } else {
        let e = t.exp();
        e / (1.0 + e)
    }
}

impl FieldGoalModel {
    pub fn new(intercept: f64, coefficient: f64) -> Option<Self> {
        (intercept.is_finite() && coefficient.is_finite()).then_some(Self { intercept, coefficient })
    }

    /// Make probability from `distance` yards out. Always in `[0, 1]`.
    pub fn make_probability(&self, distance: f64) -> f64 {
        sigmoid(self.intercept + self.coefficient * distance)
    }

    /// Newton–Raphson on the penalized log-likelihood of `(distance, made)` pairs.
    ///
    /// `None` for an empty sample.
    pub fn fit(samples: &[(f64, bool)]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut b0 = 0.0;
        let mut b1 = 0.0;
        for _ in 0..MAX_NEWTON_STEPS {
            // gradient and Hessian of the negative penalized log-likelihood
            let (mut g0, mut g1) = (0.0, SLOPE_PENALTY * b1);
            let (mut h00, mut h01, mut h11) = (0.0, 0.0, SLOPE_PENALTY);
            for &(x, made) in samples {
                let p = sigmoid(b0 + b1 * x);
                let residual = p - f64::from(u8::from(made));
                let w = p * (1.0 - p);
                g0 += residual;
                g1 += residual * x;
                h00 += w;
                h01 += w * x;
                h11 += w * x * x;
            }

            let det = h00 * h11 - h01 * h01;
            if !(det.is_finite() && det > 1e-12) {
                break;
            }
            let step0 = (h11 * g0 - h01 * g1) / det;
            let step1 = (h00 * g1 - h01 * g0) / det;
            b0 -= step0;
            b1 -= step1;

            if step0.abs().max(step1.abs()) < STEP_TOLERANCE {
                break;
            }
        }

        Self::new(b0, b1)
    }
}
