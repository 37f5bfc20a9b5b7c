//! Turning tunings into numbers people read: cents and Hertz.

use std::fmt;

/// Middle C in twelve-tone equal temperament with A4 at 440 Hz.
pub const MIDDLE_C_FREQUENCY: f64 = 261.625_565_300_598_6;

pub fn cents_from_ratio(ratio: f64) -> f64 {
    1200.0 * ratio.log2()
}

pub fn ratio_from_cents(cents: f64) -> f64 {
    (cents / 1200.0).exp2()
}

pub fn frequency_from_ratio(ratio: f64, base_frequency: f64) -> f64 {
    ratio * base_frequency
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Unit {
    Ratio,
    Cents,
    Hertz { base_frequency: f64 },
}

impl Unit {
    /// `None` for [DUMMY][crate::scale::DUMMY] entries.
    pub fn convert(&self, ratio: f64) -> Option<f64> {
        if ratio.is_nan() {
            return None {};
        }
        Some(match self {
            Unit::Ratio => ratio,
            Unit::Cents => cents_from_ratio(ratio),
            Unit::Hertz { base_frequency } => frequency_from_ratio(ratio, *base_frequency),
        })
    }

    fn suffix(&self) -> &'static str {
        match self {
            Unit::Ratio => "",
            Unit::Cents => " ct",
            Unit::Hertz { .. } => " Hz",
        }
    }
}

/// A tuning, ready to be printed one degree per line.
pub struct Rendering<'a> {
    pub tuning: &'a [f64],
    pub unit: Unit,
}

impl<'a> fmt::Display for Rendering<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.tuning.len().saturating_sub(1).to_string().len();
        for (degree, &ratio) in self.tuning.iter().enumerate() {
            match self.unit.convert(ratio) {
                None => writeln!(f, "{degree:>width$}) -")?,
                Some(x) => writeln!(f, "{degree:>width$}) {x:.4}{}", self.unit.suffix())?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cents_from_ratio() {
        let one_test = |ratio, expected| {
            assert_relative_eq!(cents_from_ratio(ratio), expected, max_relative = 1e-10)
        };

        let examples = [
            (2.0, 1200.0),
            (1.5, 701.9550008653874),
            (1.25, 386.3137138648348),
            (0.5, -1200.0),
        ];

        for (ratio, expected) in examples {
            one_test(ratio, expected)
        }
        assert_eq!(cents_from_ratio(1.0), 0.0);
    }

    #[test]
    fn test_ratio_from_cents() {
        for ratio in [0.25, 1.0, 1.2, 1.5, 3.0] {
            assert_relative_eq!(
                ratio_from_cents(cents_from_ratio(ratio)),
                ratio,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_convert() {
        assert_eq!(Unit::Ratio.convert(1.5), Some(1.5));
        assert_eq!(Unit::Cents.convert(f64::NAN), None);
        assert_eq!(
            Unit::Hertz {
                base_frequency: 220.0
            }
            .convert(1.5),
            Some(330.0)
        );
        assert_relative_eq!(
            frequency_from_ratio(2.0, MIDDLE_C_FREQUENCY),
            523.2511306011972,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_rendering() {
        let tuning = [1.0, f64::NAN, 1.5];
        assert_eq!(
            Rendering {
                tuning: &tuning,
                unit: Unit::Ratio
            }
            .to_string(),
            "0) 1.0000\n1) -\n2) 1.5000\n"
        );
        assert_eq!(
            Rendering {
                tuning: &[1.0; 11],
                unit: Unit::Cents
            }
            .to_string()
            .lines()
            .last(),
            Some("10) 0.0000 ct")
        );
    }
}
