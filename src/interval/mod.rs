//! Everything that has to do with single intervals, exact or weighted.

pub mod fraction;
pub mod r#trait;

pub use fraction::{Fraction, FractionCoeff};
pub use r#trait::Relation;

/// Keep a value finite: `NaN` becomes zero, and infinities are clamped to the biggest finite
/// values of the same sign.
pub fn clamp_to_limits(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(f64::MIN, f64::MAX)
    }
}

/// Like [clamp_to_limits], but additionally any non-positive weight becomes `f64::MIN`.
pub fn clamp_weight(weight: f64) -> f64 {
    let weight = clamp_to_limits(weight);
    if weight <= 0.0 {
        f64::MIN
    } else {
        weight
    }
}

/// An "ideal" interval between two degrees of a [Scale][crate::scale::Scale]: how big it should
/// be, and how much it matters that it actually has that size.
///
/// Both fields can only be set through functions that keep them finite, see [clamp_to_limits] and
/// [clamp_weight].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    size: f64,
    weight: f64,
}

impl Interval {
    pub fn new(size: f64, weight: f64) -> Self {
        Interval {
            size: clamp_to_limits(size),
            weight: clamp_weight(weight),
        }
    }

    /// An interval with the default weight of one.
    pub fn unweighted(size: f64) -> Self {
        Interval::new(size, 1.0)
    }

    /// The interval from a degree to itself. Its weight is zero, which [Interval::new] would never
    /// produce; it is never used as an edge in the tuning computation.
    pub fn identity() -> Self {
        Interval {
            size: 1.0,
            weight: 0.0,
        }
    }

    /// The frequency ratio.
    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_size(&mut self, size: f64) {
        self.size = clamp_to_limits(size);
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = clamp_weight(weight);
    }

    /// The same interval in the opposite direction: reciprocal size, same weight.
    pub fn reversed(&self) -> Self {
        Interval {
            size: clamp_to_limits(1.0 / self.size),
            weight: self.weight,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp_to_limits() {
        assert_eq!(clamp_to_limits(f64::NAN), 0.0);
        assert_eq!(clamp_to_limits(f64::INFINITY), f64::MAX);
        assert_eq!(clamp_to_limits(f64::NEG_INFINITY), f64::MIN);
        assert_eq!(clamp_to_limits(1.5), 1.5);
        assert_eq!(clamp_to_limits(-1.5), -1.5);
    }

    #[test]
    fn test_interval_is_always_finite() {
        let i = Interval::new(f64::INFINITY, f64::NAN);
        assert_eq!(i.size(), f64::MAX);
        assert_eq!(i.weight(), f64::MIN);

        let mut i = Interval::unweighted(1.5);
        assert_eq!(i.weight(), 1.0);
        i.set_size(f64::NAN);
        assert_eq!(i.size(), 0.0);
        i.set_weight(0.0);
        assert_eq!(i.weight(), f64::MIN);
        i.set_weight(-3.0);
        assert_eq!(i.weight(), f64::MIN);
        i.set_weight(0.25);
        assert_eq!(i.weight(), 0.25);
    }

    #[test]
    fn test_reversed() {
        let i = Interval::new(1.25, 0.5).reversed();
        assert_relative_eq!(i.size(), 0.8, max_relative = 1e-15);
        assert_eq!(i.weight(), 0.5);
        assert_eq!(Interval::new(0.0, 1.0).reversed().size(), f64::MAX);
    }
}
