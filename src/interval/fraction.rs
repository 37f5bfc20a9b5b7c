//! Exact frequency ratios.

use std::{error::Error, fmt, num::ParseIntError, ops, str::FromStr};

use num_rational::Ratio;
use num_traits::{CheckedMul, One, Zero};

/// The type of numerators and denominators of [Fraction]s
pub type FractionCoeff = i64;

/// A frequency ratio in lowest terms.
///
/// The following invariants always hold:
///
/// * `gcd(|numer|, denom) == 1`
///
/// * `denom > 0`
///
/// * `numer > FractionCoeff::MIN`, so that every fraction has a reciprocal
///
/// There's no way to construct a fraction with a zero denominator: it is coerced to one instead.
/// That is a soft contract, and not reported as an error.
///
/// Arithmetic that would leave the range of [FractionCoeff] is reported by the `checked_*`
/// methods returning `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fraction(Ratio<FractionCoeff>);

impl Fraction {
    /// # Panics
    ///
    /// If `numer` or `denom` is [FractionCoeff::MIN]. Use [Fraction::checked_new] for input that
    /// isn't known to be in range.
    pub fn new(numer: FractionCoeff, denom: FractionCoeff) -> Self {
        match Self::checked_new(numer, denom) {
            Some(f) => f,
            None => panic!("{numer}/{denom} is out of the range of fractions"),
        }
    }

    /// Like [Fraction::new], but returns `None` instead of panicking.
    pub fn checked_new(numer: FractionCoeff, denom: FractionCoeff) -> Option<Self> {
        if numer == FractionCoeff::MIN || denom == FractionCoeff::MIN {
            return None {};
        }
        if denom.is_zero() {
            Some(Fraction(Ratio::from_integer(numer)))
        } else {
            Some(Fraction(Ratio::new(numer, denom)))
        }
    }

    /// # Panics
    ///
    /// If `n` is [FractionCoeff::MIN].
    pub fn from_integer(n: FractionCoeff) -> Self {
        Fraction::new(n, 1)
    }

    pub fn unison() -> Self {
        Fraction(Ratio::one())
    }

    pub fn numer(&self) -> FractionCoeff {
        *self.0.numer()
    }

    pub fn denom(&self) -> FractionCoeff {
        *self.0.denom()
    }

    /// Swaps numerator and denominator. The reciprocal of zero is subject to the same coercion as
    /// [Fraction::new] with a zero denominator.
    pub fn reciprocal(&self) -> Self {
        Fraction::new(self.denom(), self.numer())
    }

    fn from_ratio(ratio: Ratio<FractionCoeff>) -> Option<Self> {
        (*ratio.numer() != FractionCoeff::MIN).then_some(Fraction(ratio))
    }

    /// `None` on overflow.
    pub fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        Self::from_ratio(self.0.checked_mul(&rhs.0)?)
    }

    /// Numerator and denominator are exponentiated separately; they stay coprime, so there's no
    /// need to cancel again. `None` on overflow.
    pub fn checked_pow(&self, exponent: u32) -> Option<Self> {
        Self::from_ratio(Ratio::new_raw(
            self.numer().checked_pow(exponent)?,
            self.denom().checked_pow(exponent)?,
        ))
    }

    pub fn to_f64(&self) -> f64 {
        self.numer() as f64 / self.denom() as f64
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Fraction::unison()
    }
}

/// # Panics
///
/// On overflow. See [Fraction::checked_mul].
impl ops::Mul for Fraction {
    type Output = Fraction;

    fn mul(self, rhs: Fraction) -> Fraction {
        match self.checked_mul(&rhs) {
            Some(res) => res,
            None => panic!("overflow computing {self} * {rhs}"),
        }
    }
}

impl From<Fraction> for f64 {
    fn from(value: Fraction) -> Self {
        value.to_f64()
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom().is_one() {
            write!(f, "{}", self.numer())
        } else {
            write!(f, "{}/{}", self.numer(), self.denom())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FractionParseErr {
    Syntax { input: String, cause: ParseIntError },
    OutOfRange(String),
}

impl fmt::Display for FractionParseErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FractionParseErr::Syntax { input, .. } => write!(
                f,
                "'{input}' is not a fraction of the form 'n/d' or 'n'"
            ),
            FractionParseErr::OutOfRange(input) => {
                write!(f, "'{input}' is out of the range of fractions")
            }
        }
    }
}

impl Error for FractionParseErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FractionParseErr::Syntax { cause, .. } => Some(cause),
            FractionParseErr::OutOfRange(_) => None {},
        }
    }
}

impl FromStr for Fraction {
    type Err = FractionParseErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = |cause| FractionParseErr::Syntax {
            input: s.into(),
            cause,
        };
        let (numer, denom) = match s.split_once('/') {
            None => (s.trim().parse().map_err(syntax)?, 1),
            Some((n, d)) => (
                n.trim().parse().map_err(syntax)?,
                d.trim().parse().map_err(syntax)?,
            ),
        };
        Fraction::checked_new(numer, denom).ok_or_else(|| FractionParseErr::OutOfRange(s.into()))
    }
}
