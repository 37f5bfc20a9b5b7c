//! How important is it that an interval is tuned exactly? Policies that turn a matrix of relations
//! into the weighted interval pattern of a [Scale][crate::scale::Scale].

use serde_derive::{Deserialize, Serialize};

use crate::interval::{Fraction, Interval, Relation};

/// `(1 / (n * d)) ^ entropy_curve` for the fraction `n/d`. Simple ratios have a big Tenney
/// height, complex ones a small one. A `NaN` result is reported as zero.
pub fn tenney_height(fraction: &Fraction, entropy_curve: f64) -> f64 {
    let product = fraction.numer() as f64 * fraction.denom() as f64;
    let res = (1.0 / product).powf(entropy_curve);
    if res.is_nan() {
        0.0
    } else {
        res
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum WeightingPolicy {
    /// Every interval has weight one.
    Uniform,
    /// Intervals are weighted by their [tenney_height]. Bigger `curve`s make the simple intervals
    /// more dominant.
    TenneyHeight { curve: f64 },
}

impl Default for WeightingPolicy {
    fn default() -> Self {
        WeightingPolicy::TenneyHeight { curve: 1.0 }
    }
}

impl WeightingPolicy {
    pub fn weigh(&self, fraction: &Fraction) -> f64 {
        match self {
            WeightingPolicy::Uniform => 1.0,
            WeightingPolicy::TenneyHeight { curve } => tenney_height(fraction, *curve),
        }
    }

    /// Keeps the shape of `relations`.
    pub fn apply(&self, relations: &[Vec<Fraction>]) -> Vec<Vec<Interval>> {
        relations
            .iter()
            .map(|row| {
                row.iter()
                    .map(|f| Interval::new(f.to_f64(), self.weigh(f)))
                    .collect()
            })
            .collect()
    }
}

/// Relations without an exact form can only be weighted uniformly.
pub fn relations_to_intervals<R: Relation>(relations: &[Vec<R>]) -> Vec<Vec<Interval>> {
    relations
        .iter()
        .map(|row| {
            row.iter()
                .map(|r| Interval::unweighted(r.to_real()))
                .collect()
        })
        .collect()
}
