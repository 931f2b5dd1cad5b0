//! Generalized Extreme Value distribution.
//!
//! Shape convention: `F(x) = exp(-(1 - c·z)^(1/c))` with `z = (x - loc) / scale`,
//! reducing to the Gumbel `exp(-exp(-z))` at `c = 0`. Negative `c` gives the
//! heavy right tail typical of yardage (long runs, deep completions).

use super::simplex::{self, SimplexOptions};
use rand::Rng;
use rand_distr::{Distribution, Open01};

/// Euler–Mascheroni constant, the Gumbel mean offset.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;
const GUMBEL_EPS: f64 = 1e-9;
/// Floor for scale when a sample has (near) zero spread.
pub const MIN_SCALE: f64 = 1e-6;
/// Shape search window; past `|c| = 1` the likelihood is unbounded at the support edge.
const MAX_FIT_SHAPE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gev {
    shape: f64,
    loc: f64,
    scale: f64,
}

impl Gev {
    /// `None` unless every parameter is finite and `scale > 0`.
    pub fn new(shape: f64, loc: f64, scale: f64) -> Option<Self> {
        if shape.is_finite() && loc.is_finite() && scale.is_finite() && scale > 0.0 {
            Some(Self { shape, loc, scale })
        } else {
            None
        }
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn loc(&self) -> f64 {
        self.loc
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Log density; `-inf` outside the support.
    pub fn ln_pdf(&self, x: f64) -> f64 {
        let z = (x - self.loc) / self.scale;
        if self.shape.abs() < GUMBEL_EPS {
            return -self.scale.ln() - z - (-z).exp();
        }
        let t = 1.0 - self.shape * z;
        if t <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let ln_t = t.ln();
        -self.scale.ln() + (1.0 / self.shape - 1.0) * ln_t - (ln_t / self.shape).exp()
    }

    pub fn cdf(&self, x: f64) -> f64 {
        let z = (x - self.loc) / self.scale;
        if self.shape.abs() < GUMBEL_EPS {
            return (-(-z).exp()).exp();
        }
        let t = 1.0 - self.shape * z;
        if t <= 0.0 {
            // beyond the upper bound (c > 0) or below the lower bound (c < 0)
            return if self.shape > 0.0 { 1.0 } else { 0.0 };
        }
        (-t.powf(1.0 / self.shape)).exp()
    }

    /// Inverse CDF for `u` in (0, 1).
    pub fn quantile(&self, u: f64) -> f64 {
        let y = -u.ln();
        if self.shape.abs() < GUMBEL_EPS {
            self.loc - self.scale * y.ln()
        } else {
            self.loc + self.scale * (1.0 - y.powf(self.shape)) / self.shape
        }
    }

    /// Negative log-likelihood of `data`; `+inf` if any point is outside the support.
    pub fn neg_log_likelihood(&self, data: &[f64]) -> f64 {
        let mut total = 0.0;
        for &x in data {
            let lp = self.ln_pdf(x);
            if !lp.is_finite() {
                return f64::INFINITY;
            }
            total -= lp;
        }
        total
    }

    /// Gumbel method-of-moments estimate.
    pub fn moments_estimate(data: &[f64]) -> Option<Self> {
        if data.is_empty() {
            return None;
        }
        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let scale = (variance.sqrt() * 6f64.sqrt() / std::f64::consts::PI).max(MIN_SCALE);
        Self::new(0.0, mean - EULER_GAMMA * scale, scale)
    }

    /// Maximum-likelihood fit over `(c, loc, ln scale)`.
    ///
    /// Deterministic for a given sample. Falls back to the moment estimate
    /// when the sample has no spread.
    pub fn fit(data: &[f64]) -> Option<Self> {
        let start = Self::moments_estimate(data)?;
        if start.scale <= MIN_SCALE {
            return Some(start);
        }

        let objective = |p: &[f64]| {
            if p[0].abs() >= MAX_FIT_SHAPE {
                return f64::INFINITY;
            }
            match Gev::new(p[0], p[1], p[2].exp()) {
                Some(gev) => gev.neg_log_likelihood(data),
                None => f64::INFINITY,
            }
        };
        let steps = [0.1, 0.25 * start.scale, 0.1];
        let min = simplex::minimize(
            objective,
            &[start.shape, start.loc, start.scale.ln()],
            &steps,
            SimplexOptions::default(),
        );

        let fitted = Gev::new(min.point[0], min.point[1], min.point[2].exp())?;
        if fitted.neg_log_likelihood(data) <= start.neg_log_likelihood(data) {
            Some(fitted)
        } else {
            Some(start)
        }
    }
}

impl Distribution<f64> for Gev {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = Open01.sample(rng);
        self.quantile(u)
    }
}
