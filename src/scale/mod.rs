//! Scales as complete graphs of weighted intervals, and how to tune them.

use std::{error::Error, fmt, thread};

use ndarray::{Array2, Axis};

use crate::interval::{clamp_to_limits, Interval};

mod solver;

/// The value that marks a placeholder in a tuning, see [reinsert_dummies].
pub const DUMMY: f64 = f64::NAN;

/// A scale with `N` degrees, described by the ideal [Interval]s between all pairs of degrees.
///
/// Only the intervals from lower to higher degrees are stored, as a triangular pattern: Row `i`
/// contains the intervals from degree `i` to degrees `i+1, ..., N-1`. The interval in the other
/// direction has the reciprocal size and the same weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    intervals: Vec<Vec<Interval>>,
    dummy_indices: Vec<usize>,
    name: Option<String>,
}

impl Scale {
    /// The pattern must be triangular: if it has `N-1` rows, row `i` must have `N-1-i` entries.
    /// The empty pattern describes a scale with only one degree.
    pub fn new(intervals: Vec<Vec<Interval>>) -> Result<Self, ScaleErr> {
        let rows = intervals.len();
        for (row, r) in intervals.iter().enumerate() {
            if r.len() != rows - row {
                return Err(ScaleErr::NotTriangular {
                    row,
                    expected: rows - row,
                    actual: r.len(),
                });
            }
        }
        Ok(Scale {
            intervals,
            dummy_indices: vec![],
            name: None {},
        })
    }

    /// The number of degrees.
    pub fn size(&self) -> usize {
        self.intervals.len() + 1
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// See [reinsert_dummies].
    pub fn dummy_indices(&self) -> &[usize] {
        &self.dummy_indices
    }

    pub fn set_dummy_indices(&mut self, dummy_indices: Vec<usize>) {
        self.dummy_indices = dummy_indices;
    }

    /// The ideal interval from degree `from` up (or down) to degree `to`.
    ///
    /// Both degrees must be smaller than [size][Scale::size].
    pub fn get_interval(&self, to: usize, from: usize) -> Interval {
        if from > to {
            self.intervals[to][from - to - 1].reversed()
        } else if from == to {
            Interval::identity()
        } else {
            self.intervals[from][to - from - 1]
        }
    }

    /// Compute the tuning of all degrees, relative to `true_root`, which will be tuned to exactly
    /// one.
    ///
    /// Every degree is used as a root in turn, and all other degrees are tuned relative to it (see
    /// [make_tuning][Scale::make_tuning]). These tunings are then shifted so that `true_root` comes
    /// out as one, and for each degree the geometric mean of its shifted tunings is the result.
    /// Finally, the [dummy_indices][Scale::dummy_indices] are filled with [DUMMY].
    ///
    /// The `weight_cutoff` controls how many paths through the scale are taken into account; it
    /// should be between zero (all paths, very expensive for big scales) and one (only direct
    /// intervals).
    pub fn tune_scale(&self, true_root: usize, weight_cutoff: f64) -> Result<Vec<f64>, ScaleErr> {
        self.check_root(true_root)?;
        log::debug!(
            "tuning {} degrees relative to {true_root} with weight cutoff {weight_cutoff}",
            self.size()
        );

        let n = self.size();
        let tunings = Array2::from_shape_fn((n, n), |(root, note)| {
            self.root_relative_estimate(root, note, weight_cutoff)
        });

        Ok(self.reconcile(tunings, true_root))
    }

    /// Like [tune_scale][Scale::tune_scale], with the roots distributed among up to `threads`
    /// worker threads. The result is bit-for-bit the same.
    pub fn tune_scale_parallel(
        &self,
        true_root: usize,
        weight_cutoff: f64,
        threads: usize,
    ) -> Result<Vec<f64>, ScaleErr> {
        self.check_root(true_root)?;
        let n = self.size();
        let threads = threads.clamp(1, n);
        log::debug!(
            "tuning {n} degrees relative to {true_root} with weight cutoff {weight_cutoff} on {threads} threads"
        );

        let roots: Vec<usize> = (0..n).collect();
        let chunk_size = n.div_ceil(threads);

        let mut tunings = Array2::zeros((n, n));
        thread::scope(|s| {
            let handles: Vec<_> = roots
                .chunks(chunk_size)
                .map(|chunk| {
                    s.spawn(move || {
                        chunk
                            .iter()
                            .map(|&root| {
                                (0..n)
                                    .map(|note| {
                                        self.root_relative_estimate(root, note, weight_cutoff)
                                    })
                                    .collect::<Vec<f64>>()
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            let mut root = 0;
            for handle in handles {
                // a panic in a worker is a bug in the solver, not a recoverable condition
                let rows = match handle.join() {
                    Ok(rows) => rows,
                    Err(e) => std::panic::resume_unwind(e),
                };
                for row in rows {
                    for (note, x) in row.into_iter().enumerate() {
                        tunings[[root, note]] = x;
                    }
                    root += 1;
                }
            }
        });

        Ok(self.reconcile(tunings, true_root))
    }

    fn check_root(&self, true_root: usize) -> Result<(), ScaleErr> {
        if true_root >= self.size() {
            return Err(ScaleErr::RootOutOfRange {
                root: true_root,
                size: self.size(),
            });
        }
        Ok(())
    }

    fn check_degree(&self, degree: usize) -> Result<(), ScaleErr> {
        if degree >= self.size() {
            return Err(ScaleErr::DegreeOutOfRange {
                degree,
                size: self.size(),
            });
        }
        Ok(())
    }

    fn root_relative_estimate(&self, root: usize, note: usize, weight_cutoff: f64) -> f64 {
        if root == note {
            1.0
        } else {
            self.estimate(root, note, weight_cutoff)
        }
    }

    /// `tunings[[r, n]]` is the tuning of degree `n` relative to the root `r`.
    fn reconcile(&self, mut tunings: Array2<f64>, true_root: usize) -> Vec<f64> {
        let n = self.size();

        for (root, mut row) in tunings.axis_iter_mut(Axis(0)).enumerate() {
            if root == true_root {
                continue;
            }
            let anchor = row[true_root];
            row.mapv_inplace(|x| clamp_to_limits(x / anchor));
            row[true_root] = 1.0;
            log::trace!("estimates relative to root {root}: {row}");
        }

        let exponent = 1.0 / n as f64;
        let tuning: Vec<f64> = tunings
            .axis_iter(Axis(1))
            .map(|column| {
                let product = column
                    .iter()
                    .fold(1.0, |acc, x| clamp_to_limits(acc * x));
                clamp_to_limits(product.powf(exponent))
            })
            .collect();

        reinsert_dummies(tuning, &self.dummy_indices)
    }
}

/// Insert [DUMMY] entries into `tuning`. Every index in `dummy_indices` is a position in the
/// original `tuning`: the placeholder goes right before the entry that was at that position. The
/// indices must be ascending; an index may be repeated to insert several placeholders at the same
/// place.
pub fn reinsert_dummies(mut tuning: Vec<f64>, dummy_indices: &[usize]) -> Vec<f64> {
    tuning.reserve(dummy_indices.len());
    for (inserted, &index) in dummy_indices.iter().enumerate() {
        let position = (index + inserted).min(tuning.len());
        tuning.insert(position, DUMMY);
    }
    tuning
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScaleErr {
    NotTriangular {
        row: usize,
        expected: usize,
        actual: usize,
    },
    RootOutOfRange {
        root: usize,
        size: usize,
    },
    DegreeOutOfRange {
        degree: usize,
        size: usize,
    },
}

impl fmt::Display for ScaleErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleErr::NotTriangular {
                row,
                expected,
                actual,
            } => write!(
                f,
                "invalid scale structure: row {row} of the interval pattern has {actual} entries, expected {expected}"
            ),
            ScaleErr::RootOutOfRange { root, size } => write!(
                f,
                "root degree {root} is out of range for a scale with {size} degrees"
            ),
            ScaleErr::DegreeOutOfRange { degree, size } => write!(
                f,
                "degree {degree} is out of range for a scale with {size} degrees"
            ),
        }
    }
}

impl Error for ScaleErr {}
