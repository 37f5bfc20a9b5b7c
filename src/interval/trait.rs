use std::fmt;

use crate::interval::{clamp_to_limits, fraction::Fraction};

/// The operations a [PitchSpace][crate::pitchspace::PitchSpace] needs from the relations it is
/// built from. There are two implementors: exact [Fraction]s, which stay exact until
/// [to_real][Relation::to_real] is called, and plain `f64` ratios.
pub trait Relation: Clone + fmt::Debug {
    /// The relation of a degree to itself.
    fn unison() -> Self;

    /// Stacking two relations. `None` if the result can't be represented.
    fn multiply(&self, other: &Self) -> Option<Self>;

    /// `None` if the result can't be represented.
    fn power(&self, exponent: u32) -> Option<Self>;

    fn reciprocal(&self) -> Self;

    /// The size of the relation as a frequency ratio.
    fn to_real(&self) -> f64;
}

impl Relation for Fraction {
    fn unison() -> Self {
        Fraction::unison()
    }

    fn multiply(&self, other: &Self) -> Option<Self> {
        self.checked_mul(other)
    }

    fn power(&self, exponent: u32) -> Option<Self> {
        self.checked_pow(exponent)
    }

    fn reciprocal(&self) -> Self {
        Fraction::reciprocal(self)
    }

    fn to_real(&self) -> f64 {
        self.to_f64()
    }
}

impl Relation for f64 {
    fn unison() -> Self {
        1.0
    }

    /// Never `None`: out of range values are clamped.
    fn multiply(&self, other: &Self) -> Option<Self> {
        Some(clamp_to_limits(self * other))
    }

    fn power(&self, exponent: u32) -> Option<Self> {
        Some(clamp_to_limits(self.powf(exponent as f64)))
    }

    fn reciprocal(&self) -> Self {
        clamp_to_limits(1.0 / self)
    }

    fn to_real(&self) -> f64 {
        *self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn one_period<R: Relation>(step: R, n: u32) -> R {
        step.power(n).unwrap().multiply(&R::unison()).unwrap()
    }

    #[test]
    fn test_both_kinds_agree() {
        let exact = one_period(Fraction::new(9, 8), 3);
        let real = one_period(9.0_f64 / 8.0, 3);
        assert_relative_eq!(exact.to_real(), real, max_relative = 1e-12);
        assert_relative_eq!(
            exact.reciprocal().to_real(),
            real.reciprocal(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_real_overflow_is_clamped() {
        assert_eq!(f64::MAX.multiply(&2.0), Some(f64::MAX));
        assert_eq!(0.0_f64.reciprocal(), f64::MAX);
        assert_eq!(10.0_f64.power(400), Some(f64::MAX));
    }

    #[test]
    fn test_exact_overflow_is_reported() {
        let octave = Fraction::new(2, 1);
        assert_eq!(octave.power(62), Some(Fraction::new(1 << 62, 1)));
        assert_eq!(octave.power(63), None);
        assert_eq!(
            Fraction::new(1 << 62, 1).multiply(&Fraction::new(3, 2)),
            Some(Fraction::new(3 << 61, 1))
        );
        assert_eq!(Fraction::new(1 << 62, 1).multiply(&octave), None);
    }
}
