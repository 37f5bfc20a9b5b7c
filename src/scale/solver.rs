//! The weighted traversal behind [Scale::tune_scale].
//!
//! The tuning of a note relative to a root is estimated as a weighted geometric mean over all
//! paths from the note to the root. Each step of a path contributes the ideal interval it
//! crosses, and the weight of a path is the product of the (normalised) weights of its steps.
//! Paths are followed depth-first; as soon as the weight of a path drops to the cutoff, the rest
//! of it is replaced by the direct interval to the root.

use crate::{
    interval::clamp_to_limits,
    scale::{Scale, ScaleErr},
};

impl Scale {
    /// Estimate the tuning of `note` relative to `root`, taking into account all paths from `note`
    /// to `root` whose weight is above `weight_cutoff`.
    ///
    /// This is a pure function of its arguments and the intervals of the scale.
    pub fn make_tuning(
        &self,
        root: usize,
        note: usize,
        weight_cutoff: f64,
    ) -> Result<f64, ScaleErr> {
        self.check_root(root)?;
        self.check_degree(note)?;
        Ok(self.estimate(root, note, weight_cutoff))
    }

    /// [make_tuning][Scale::make_tuning] without the range checks.
    pub(super) fn estimate(&self, root: usize, note: usize, weight_cutoff: f64) -> f64 {
        let candidates: Vec<usize> = (0..self.size()).filter(|&d| d != note).collect();
        let branch_normaliser = self.branch_normaliser(note, &candidates);

        let product = self.traverse_scale(
            note,
            &candidates,
            root,
            branch_normaliser,
            weight_cutoff,
        );

        clamp_to_limits(product.powf(branch_normaliser))
    }

    /// The reciprocal of the sum of weights of the intervals from `from` to the `candidates`.
    fn branch_normaliser(&self, from: usize, candidates: &[usize]) -> f64 {
        let sum = candidates.iter().fold(0.0, |acc, &c| {
            clamp_to_limits(acc + self.get_interval(from, c).weight())
        });
        clamp_to_limits(1.0 / sum)
    }

    /// Returns the product of the contributions of all branches from `last_note`, each raised to
    /// the weight of its first step. The caller still has to apply the branch normaliser.
    ///
    /// Invariants:
    /// - `candidates` doesn't contain `last_note`
    /// - `rolling_weight` is the weight of the path so far, including the branch normaliser of
    ///   this level
    fn traverse_scale(
        &self,
        last_note: usize,
        candidates: &[usize],
        root: usize,
        rolling_weight: f64,
        weight_cutoff: f64,
    ) -> f64 {
        let mut res = 1.0;

        for &next in candidates {
            let step = self.get_interval(last_note, next);

            let contribution = if next == root
                || clamp_to_limits(step.weight() * rolling_weight) <= weight_cutoff
            {
                self.get_interval(last_note, root).size()
            } else {
                let remaining: Vec<usize> =
                    candidates.iter().copied().filter(|&c| c != next).collect();
                let branch_normaliser = self.branch_normaliser(next, &remaining);
                let next_rolling_weight =
                    clamp_to_limits(step.weight() * rolling_weight * branch_normaliser);

                let further = self.traverse_scale(
                    next,
                    &remaining,
                    root,
                    next_rolling_weight,
                    weight_cutoff,
                );

                clamp_to_limits(step.size() * clamp_to_limits(further.powf(branch_normaliser)))
            };

            res = clamp_to_limits(res * clamp_to_limits(contribution.powf(step.weight())));
        }

        res
    }
}
