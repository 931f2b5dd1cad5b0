//! Nelder–Mead downhill simplex minimizer.

use std::cmp::Ordering;

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
pub struct SimplexOptions {
    pub max_iterations: usize,
    /// Stop once the spread of objective values across the simplex falls below
    /// `tolerance · max(|best|, 1)`.
    pub tolerance: f64,
}

impl Default for SimplexOptions {
    fn default() -> Self {
        Self { max_iterations: 2_000, tolerance: 1e-10 }
    }
}

#[derive(Debug, Clone)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
}

fn by_value(a: &(Vec<f64>, f64), b: &(Vec<f64>, f64)) -> Ordering {
    a.1.total_cmp(&b.1)
}

/// Minimizes `objective` starting from `start`, with initial edge lengths `steps`.
///
/// Non-finite objective values are treated as `+inf`, so infeasible regions
/// can be expressed by returning `f64::INFINITY`.
pub fn minimize<F>(objective: F, start: &[f64], steps: &[f64], options: SimplexOptions) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    let n = start.len();
    let eval = |x: &[f64]| {
        let v = objective(x);
        if v.is_nan() {
            f64::INFINITY
        } else {
            v
        }
    };

    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
    simplex.push((start.to_vec(), eval(start)));
    for i in 0..n {
        let mut vertex = start.to_vec();
        vertex[i] += steps.get(i).copied().unwrap_or(0.1);
        let value = eval(&vertex);
        simplex.push((vertex, value));
    }

    let mut iterations = 0;
    while iterations < options.max_iterations {
        simplex.sort_by(by_value);
        let best = simplex[0].1;
        let worst = simplex[n].1;
        let threshold = options.tolerance * best.abs().max(1.0);
        if best.is_finite() && worst.is_finite() && (worst - best).abs() <= threshold {
            break;
        }
        iterations += 1;

        let mut centroid = vec![0.0; n];
        for (vertex, _) in &simplex[..n] {
            for (c, v) in centroid.iter_mut().zip(vertex) {
                *c += v / n as f64;
            }
        }
        let toward = |coefficient: f64| -> Vec<f64> {
            centroid
                .iter()
                .zip(&simplex[n].0)
                .map(|(c, w)| c + coefficient * (c - w))
                .collect()
        };

        let reflected = toward(REFLECTION);
        let reflected_value = eval(&reflected);

        if reflected_value < simplex[0].1 {
            let expanded = toward(EXPANSION);
            let expanded_value = eval(&expanded);
            simplex[n] = if expanded_value < reflected_value {
                (expanded, expanded_value)
            } else {
                (reflected, reflected_value)
            };
            continue;
        }

        if reflected_value < simplex[n - 1].1 {
            simplex[n] = (reflected, reflected_value);
            continue;
        }

        let contracted = if reflected_value < simplex[n].1 {
            toward(CONTRACTION)
        } else {
            toward(-CONTRACTION)
        };
        let contracted_value = eval(&contracted);
        if contracted_value < simplex[n].1.min(reflected_value) {
            simplex[n] = (contracted, contracted_value);
            continue;
        }

        let anchor = simplex[0].0.clone();
        for (vertex, value) in simplex.iter_mut().skip(1) {
            for (x, a) in vertex.iter_mut().zip(&anchor) {
                *x = a + SHRINK * (*x - a);
            }
            *value = eval(vertex);
        }
    }

    simplex.sort_by(by_value);
    let (point, value) = simplex.swap_remove(0);
    Minimum { point, value, iterations }
}
