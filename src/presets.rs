//! Named [PitchSpace]s. There's no global table: whoever needs presets builds a
//! [PresetRegistry] and passes it around.

use std::collections::BTreeMap;

use crate::{
    interval::Fraction,
    pitchspace::{PitchSpace, PitchSpaceErr},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetRegistry {
    spaces: BTreeMap<String, PitchSpace<Fraction>>,
}

fn fractions(table: &[(i64, i64)]) -> Vec<Fraction> {
    table.iter().map(|&(n, d)| Fraction::new(n, d)).collect()
}

/// Twelve notes per octave in five-limit just intonation, with the chromatic semitone 17/16 and
/// the tritone 7/5.
pub fn chromatic() -> Result<PitchSpace<Fraction>, PitchSpaceErr> {
    let mut space = PitchSpace::new(fractions(&[
        (17, 16),
        (9, 8),
        (6, 5),
        (5, 4),
        (4, 3),
        (7, 5),
        (3, 2),
        (8, 5),
        (5, 3),
        (9, 5),
        (15, 8),
        (2, 1),
    ]))?;
    space.add_signature("major", &[0, 2, 4, 5, 7, 9, 11])?;
    space.add_signature("minor", &[0, 2, 3, 5, 7, 8, 10])?;
    space.add_signature("pentatonic", &[0, 2, 4, 7, 9])?;
    space.add_signature("whole-tone", &[0, 2, 4, 6, 8, 10])?;
    Ok(space)
}

/// Seven roughly equal steps per octave, approximated by simple ratios.
pub fn seven_edo() -> Result<PitchSpace<Fraction>, PitchSpaceErr> {
    let mut space = PitchSpace::new(fractions(&[
        (10, 9),
        (11, 9),
        (4, 3),
        (3, 2),
        (18, 11),
        (9, 5),
        (2, 1),
    ]))?;
    space.add_signature("pentatonic", &[0, 1, 3, 4, 5])?;
    Ok(space)
}

impl PresetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry containing [chromatic] and [seven_edo].
    pub fn with_builtin() -> Result<Self, PitchSpaceErr> {
        let mut registry = Self::new();
        registry.insert("chromatic", chromatic()?);
        registry.insert("seven-edo", seven_edo()?);
        Ok(registry)
    }

    /// Returns the pitch space previously registered under that name, if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        space: PitchSpace<Fraction>,
    ) -> Option<PitchSpace<Fraction>> {
        self.spaces.insert(name.into(), space)
    }

    pub fn remove(&mut self, name: &str) -> Option<PitchSpace<Fraction>> {
        self.spaces.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&PitchSpace<Fraction>> {
        self.spaces.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PitchSpace<Fraction>> {
        self.spaces.get_mut(name)
    }

    /// In alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PitchSpace<Fraction>)> {
        self.spaces.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pitchspace::FULL_SIGNATURE;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin() {
        let registry = PresetRegistry::with_builtin().unwrap();
        assert_eq!(
            registry.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["chromatic", "seven-edo"]
        );

        let c = registry.get("chromatic").unwrap();
        assert_eq!(c.size(), 12);
        assert_eq!(*c.period_relation(), Fraction::new(2, 1));
        assert_eq!(c.get_relation(7, 0), Some(Fraction::new(3, 2)));
        assert_eq!(c.get_relation(19, 0), Some(Fraction::new(3, 1)));
        assert_eq!(
            c.signature_names().collect::<Vec<_>>(),
            vec![FULL_SIGNATURE, "major", "minor", "pentatonic", "whole-tone"]
        );

        let s = registry.get("seven-edo").unwrap();
        assert_eq!(s.size(), 7);
        assert_eq!(s.get_relation(0, 4), Some(Fraction::new(2, 3)));

        assert!(registry.get("bohlen-pierce").is_none());
    }

    #[test]
    fn test_registries_are_independent() {
        let mut a = PresetRegistry::with_builtin().unwrap();
        let b = PresetRegistry::with_builtin().unwrap();

        a.get_mut("chromatic")
            .unwrap()
            .add_signature("tritone", &[0, 6])
            .unwrap();
        assert!(a.remove("seven-edo").is_some());

        assert!(a.get("chromatic").unwrap().get_signature("tritone").is_some());
        assert!(b.get("chromatic").unwrap().get_signature("tritone").is_none());
        assert!(b.get("seven-edo").is_some());
        assert_eq!(PresetRegistry::new().iter().count(), 0);
    }
}
