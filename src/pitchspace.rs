//! Periodic tables of relations, and the scales ("signatures") that live in them.

use std::{collections::BTreeMap, error::Error, fmt};

use crate::interval::Relation;

/// Sorted, deduplicated degrees of one period of a [PitchSpace]. All entries are smaller than the
/// [size][PitchSpace::size] of the space they belong to.
pub type Signature = Vec<usize>;

/// The name of the signature that every [PitchSpace] has, containing all of its degrees.
pub const FULL_SIGNATURE: &str = "full";

/// A finite table of relations that describes the relation between any two integer degrees.
///
/// The `k`-th entry of the table is the relation of degree `k+1` to degree `0`. The last entry
/// is the [period relation][PitchSpace::period_relation], after which everything repeats: If the
/// table has `n` entries, degree `m+n` relates to degree `m` like degree `n` relates to degree `0`.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchSpace<R: Relation> {
    table: Vec<R>,
    signatures: BTreeMap<String, Signature>,
}

impl<R: Relation> PitchSpace<R> {
    /// The table must not be empty. The [FULL_SIGNATURE] is added automatically.
    pub fn new(table: Vec<R>) -> Result<Self, PitchSpaceErr> {
        if table.is_empty() {
            return Err(PitchSpaceErr::EmptyTable);
        }
        let mut signatures = BTreeMap::new();
        signatures.insert(FULL_SIGNATURE.into(), (0..table.len()).collect());
        Ok(PitchSpace { table, signatures })
    }

    /// The number of degrees in one period.
    pub fn size(&self) -> usize {
        self.table.len()
    }

    pub fn table(&self) -> &[R] {
        &self.table
    }

    /// The relation spanning exactly one period.
    pub fn period_relation(&self) -> &R {
        &self.table[self.size() - 1]
    }

    /// The relation of degree `to` to degree `from`. Distances longer than one period are composed
    /// of a table entry and a power of the [period relation][PitchSpace::period_relation];
    /// downward distances are the reciprocals of their upward counterparts.
    ///
    /// `None` if the relation can't be represented, which may happen for exact relations between
    /// degrees that are very far apart.
    pub fn get_relation(&self, to: i64, from: i64) -> Option<R> {
        let distance = to.checked_sub(from)?;
        if distance == 0 {
            return Some(R::unison());
        }

        let k = distance.unsigned_abs() - 1;
        let size = self.size() as u64;
        let within_period = &self.table[(k % size) as usize];
        let periods = u32::try_from(k / size).ok()?;
        let upward = within_period.multiply(&self.period_relation().power(periods)?)?;

        if distance > 0 {
            Some(upward)
        } else {
            Some(upward.reciprocal())
        }
    }

    /// Store a signature under `name`, replacing any previous signature of that name. The `degrees`
    /// are taken modulo the [size][PitchSpace::size] (so negative degrees count from the top of the
    /// period), sorted and deduplicated.
    pub fn add_signature(
        &mut self,
        name: impl Into<String>,
        degrees: &[i64],
    ) -> Result<(), PitchSpaceErr> {
        let name = name.into();
        if degrees.is_empty() {
            return Err(PitchSpaceErr::EmptySignature(name));
        }
        let size = self.size() as i64;
        let mut signature: Signature = degrees
            .iter()
            .map(|d| d.rem_euclid(size) as usize)
            .collect();
        signature.sort_unstable();
        signature.dedup();
        self.signatures.insert(name, signature);
        Ok(())
    }

    /// Returns whether there was a signature to remove. The [FULL_SIGNATURE] can't be removed.
    pub fn remove_signature(&mut self, name: &str) -> bool {
        if name == FULL_SIGNATURE {
            log::warn!("refusing to remove the '{FULL_SIGNATURE}' signature");
            return false;
        }
        self.signatures.remove(name).is_some()
    }

    pub fn get_signature(&self, name: &str) -> Option<&Signature> {
        self.signatures.get(name)
    }

    /// In alphabetical order.
    pub fn signature_names(&self) -> impl Iterator<Item = &str> {
        self.signatures.keys().map(|k| k.as_str())
    }

    /// The degree of this pitch space that is the `n`-th degree of the scale obtained by repeating
    /// `signature` once per period.
    ///
    /// `signature` must not be empty.
    pub fn expand_signature_to_degree(&self, signature: &[usize], n: usize) -> i64 {
        let len = signature.len();
        (signature[n % len] + self.size() * (n / len)) as i64
    }

    /// Like [make_ranged_scale_relations_for][PitchSpace::make_ranged_scale_relations_for], but
    /// looks up the signature by name. Also returns `None` if there's no such signature or if
    /// `range <= 1`.
    pub fn make_ranged_scale_relations(&self, name: &str, range: usize) -> Option<Vec<Vec<R>>> {
        let signature = self.get_signature(name)?;
        if range <= 1 {
            return None {};
        }
        self.make_ranged_scale_relations_for(signature, range)
    }

    /// The triangular matrix of relations between the first `range` degrees of the scale obtained
    /// by repeating `signature`. Row `i` contains the relations of degrees `i+1, ..., range-1` to
    /// degree `i`.
    ///
    /// `None` if one of the relations can't be represented (see
    /// [get_relation][PitchSpace::get_relation]).
    pub fn make_ranged_scale_relations_for(
        &self,
        signature: &[usize],
        range: usize,
    ) -> Option<Vec<Vec<R>>> {
        let degrees: Vec<i64> = (0..range)
            .map(|n| self.expand_signature_to_degree(signature, n))
            .collect();

        let mut res = Vec::with_capacity(range.saturating_sub(1));
        for (i, &from) in degrees.iter().enumerate().take(range.saturating_sub(1)) {
            res.push(
                degrees[i + 1..]
                    .iter()
                    .map(|&to| self.get_relation(to, from))
                    .collect::<Option<Vec<R>>>()?,
            );
        }
        Some(res)
    }

    /// Like [get_dummy_indices_for][PitchSpace::get_dummy_indices_for], but looks up the signature
    /// by name. Empty if there's no such signature or if `range <= 1`.
    pub fn get_dummy_indices(&self, name: &str, range: usize) -> Vec<usize> {
        match self.get_signature(name) {
            Some(signature) if range > 1 => self.get_dummy_indices_for(signature, range),
            _ => vec![],
        }
    }

    /// Where to insert placeholders into a tuning of the first `range` degrees of the scale
    /// obtained by repeating `signature`, so that every degree of the pitch space between the
    /// lowest and highest note gets an entry.
    ///
    /// Each returned index refers to a position in the tuning _without_ placeholders: a
    /// placeholder is to be inserted before that entry. Indices are ascending, and repeated if
    /// more than one degree is skipped at the same place. See
    /// [reinsert_dummies][crate::scale::reinsert_dummies].
    pub fn get_dummy_indices_for(&self, signature: &[usize], range: usize) -> Vec<usize> {
        let degrees: Vec<i64> = (0..range)
            .map(|n| self.expand_signature_to_degree(signature, n))
            .collect();

        let mut res = vec![];
        for (i, pair) in degrees.windows(2).enumerate() {
            for _ in 1..(pair[1] - pair[0]) {
                res.push(i + 1);
            }
        }
        res
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PitchSpaceErr {
    EmptyTable,
    EmptySignature(String),
}

impl fmt::Display for PitchSpaceErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PitchSpaceErr::EmptyTable => write!(f, "a pitch space needs at least one relation"),
            PitchSpaceErr::EmptySignature(name) => {
                write!(f, "signature '{name}' doesn't contain any degrees")
            }
        }
    }
}

impl Error for PitchSpaceErr {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::interval::Fraction;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn f(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d)
    }

    /// Five-note just intonation pentatonic: 9/8, 5/4, 3/2, 5/3, 2/1
    fn pentatonic() -> PitchSpace<Fraction> {
        PitchSpace::new(vec![f(9, 8), f(5, 4), f(3, 2), f(5, 3), f(2, 1)]).unwrap()
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(
            PitchSpace::<Fraction>::new(vec![]),
            Err(PitchSpaceErr::EmptyTable)
        );
    }

    #[test]
    fn test_get_relation() {
        let p = pentatonic();
        assert_eq!(p.size(), 5);
        assert_eq!(*p.period_relation(), f(2, 1));

        assert_eq!(p.get_relation(1, 0), Some(f(9, 8)));
        assert_eq!(p.get_relation(3, 0), Some(f(3, 2)));
        assert_eq!(p.get_relation(5, 0), Some(f(2, 1)));
        assert_eq!(p.get_relation(6, 0), Some(f(9, 4)));
        assert_eq!(p.get_relation(10, 0), Some(f(4, 1)));
        assert_eq!(p.get_relation(13, 0), Some(f(6, 1)));
        assert_eq!(p.get_relation(0, 3), Some(f(2, 3)));
        assert_eq!(p.get_relation(7, 4), Some(f(3, 2)));
        assert_eq!(p.get_relation(-4, -7), Some(f(3, 2)));
    }

    #[test]
    fn test_get_relation_reciprocity() {
        let p = pentatonic();
        for a in -12..12 {
            for b in -12..12 {
                let up = p.get_relation(a, b).unwrap();
                let down = p.get_relation(b, a).unwrap();
                assert_eq!(up, down.reciprocal());
                assert_eq!(up * down, Fraction::unison());
            }
            assert_eq!(p.get_relation(a, a), Some(Fraction::unison()));
        }
    }

    #[test]
    fn test_period() {
        let p = pentatonic();
        for from in -12..12 {
            assert_eq!(
                p.get_relation(from + 5, from).as_ref(),
                Some(p.period_relation())
            );
        }
    }

    #[test]
    fn test_real_relations() {
        let p = PitchSpace::new(vec![1.1, 1.3, 2.0]).unwrap();
        let r = |to, from| p.get_relation(to, from).unwrap();
        assert_relative_eq!(r(4, 0), 2.2, max_relative = 1e-15);
        assert_relative_eq!(r(0, 8), 1.0 / 5.2, max_relative = 1e-15);
        assert_relative_eq!(r(6, 0), 4.0, max_relative = 1e-15);
        assert_relative_eq!(r(9, 0), 8.0, max_relative = 1e-15);
        assert_eq!(r(3 * 1100, 0), f64::MAX);
        assert_eq!(r(0, 3 * 1100), 1.0 / f64::MAX);
    }

    #[test]
    fn test_far_apart_exact_relations() {
        let p = pentatonic();
        // 62 octaves and a fifth
        assert_eq!(p.get_relation(62 * 5 + 3, 0), Some(f(3 << 61, 1)));
        assert_eq!(p.get_relation(0, 62 * 5 + 3), Some(f(1, 3 << 61)));
        // 63 octaves
        assert_eq!(p.get_relation(63 * 5, 0), None);
        assert_eq!(p.get_relation(0, 63 * 5), None);
        assert_eq!(p.get_relation(i64::MAX, i64::MIN), None);

        assert_eq!(p.make_ranged_scale_relations(FULL_SIGNATURE, 63 * 5), None);
        assert!(p.make_ranged_scale_relations(FULL_SIGNATURE, 61 * 5).is_some());
        // dummy indices don't depend on the relations
        assert_eq!(p.get_dummy_indices(FULL_SIGNATURE, 63 * 5), Vec::<usize>::new());
    }

    #[test]
    fn test_signatures() {
        let mut p = pentatonic();
        assert_eq!(p.get_signature(FULL_SIGNATURE), Some(&vec![0, 1, 2, 3, 4]));
        assert_eq!(p.get_signature("triad"), None);

        p.add_signature("triad", &[3, 0, 7, -3, 0]).unwrap();
        assert_eq!(p.get_signature("triad"), Some(&vec![0, 2, 3]));

        p.add_signature("triad", &[0, 1]).unwrap();
        assert_eq!(p.get_signature("triad"), Some(&vec![0, 1]));

        assert_eq!(
            p.add_signature("nothing", &[]),
            Err(PitchSpaceErr::EmptySignature("nothing".into()))
        );

        assert_eq!(
            p.signature_names().collect::<Vec<_>>(),
            vec![FULL_SIGNATURE, "triad"]
        );

        assert!(p.remove_signature("triad"));
        assert!(!p.remove_signature("triad"));
        assert!(!p.remove_signature(FULL_SIGNATURE));
        assert!(p.get_signature(FULL_SIGNATURE).is_some());
    }

    #[test]
    fn test_expand_signature_to_degree() {
        let p = pentatonic();
        let sig = [0, 2, 3];
        let expanded: Vec<i64> = (0..7)
            .map(|n| p.expand_signature_to_degree(&sig, n))
            .collect();
        assert_eq!(expanded, vec![0, 2, 3, 5, 7, 8, 10]);
    }

    #[test]
    fn test_make_ranged_scale_relations() {
        let mut p = pentatonic();
        p.add_signature("triad", &[0, 2, 3]).unwrap();

        assert_eq!(
            p.make_ranged_scale_relations("triad", 4),
            Some(vec![
                vec![f(5, 4), f(3, 2), f(2, 1)],
                vec![f(9, 8), f(3, 2)],
                vec![f(5, 4)],
            ])
        );

        assert_eq!(
            p.make_ranged_scale_relations(FULL_SIGNATURE, 2),
            Some(vec![vec![f(9, 8)]])
        );

        assert_eq!(p.make_ranged_scale_relations("triad", 1), None);
        assert_eq!(p.make_ranged_scale_relations("triad", 0), None);
        assert_eq!(p.make_ranged_scale_relations("unknown", 4), None);
    }

    #[test]
    fn test_get_dummy_indices() {
        let mut p = pentatonic();
        p.add_signature("triad", &[0, 2, 3]).unwrap();
        p.add_signature("fifths", &[0, 3]).unwrap();

        // degrees 0 2 3 5 7: skipped are 1 (before the second note), 4 (before the fourth), and
        // 6 (before the fifth)
        assert_eq!(p.get_dummy_indices("triad", 5), vec![1, 3, 4]);

        // degrees 0 3 5 8: two skipped before the second note, one before the third, two
        // before the fourth
        assert_eq!(p.get_dummy_indices("fifths", 4), vec![1, 1, 2, 3, 3]);

        assert_eq!(p.get_dummy_indices(FULL_SIGNATURE, 7), Vec::<usize>::new());
        assert_eq!(p.get_dummy_indices("triad", 1), Vec::<usize>::new());
        assert_eq!(p.get_dummy_indices("unknown", 5), Vec::<usize>::new());
    }
}
