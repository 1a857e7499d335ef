use std::fmt;
use std::str::FromStr;

use rand::Rng;

use super::Nucleotide;
use crate::errors::InvalidSequence;

/// Mutable nucleotide sequence attached to a tree node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Sequence(Vec<Nucleotide>);

impl Sequence {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_nucleotides(nucleotides: Vec<Nucleotide>) -> Self {
        Self(nucleotides)
    }

    /// Draw a sequence of `len` bases i.i.d. from the uniform distribution.
    ///
    /// ```rust
    /// # use phylodyn_sim::base::Sequence;
    /// # use rand::SeedableRng;
    /// let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(1);
    /// let seq = Sequence::random(1000, &mut rng);
    /// assert_eq!(seq.len(), 1000);
    /// ```
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        Self((0..len).map(|_| Nucleotide::random(rng)).collect())
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Nucleotide> {
        self.0.get(index).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Nucleotide] {
        &self.0
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Nucleotide] {
        &mut self.0
    }

    /// Number of sites where `self` and `other` differ. Extra sites of the
    /// longer sequence are not counted.
    pub fn hamming_distance(&self, other: &Sequence) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .filter(|(a, b)| a != b)
            .count()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &nuc in &self.0 {
            write!(f, "{}", nuc.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for Sequence {
    type Err = InvalidSequence;

    /// Parse "ACGT"-style text, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data: Result<Vec<Nucleotide>, _> = s
            .chars()
            .map(|c| {
                u8::try_from(c)
                    .ok()
                    .and_then(Nucleotide::from_ascii)
                    .ok_or(InvalidSequence::InvalidChar(c))
            })
            .collect();

        Ok(Self(data?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_sequence_from_str_roundtrip_case() {
        let seq = Sequence::from_str("AcGt").unwrap();
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.to_string(), "ACGT");
    }

    #[test]
    fn test_sequence_from_str_invalid() {
        match Sequence::from_str("ACGN").unwrap_err() {
            InvalidSequence::InvalidChar(c) => assert_eq!(c, 'N'),
        }
        assert!(Sequence::from_str("ACGé").is_err());
    }

    #[test]
    fn test_sequence_random_is_deterministic() {
        let mut rng1 = Xoshiro256PlusPlus::seed_from_u64(7);
        let mut rng2 = Xoshiro256PlusPlus::seed_from_u64(7);
        let a = Sequence::random(500, &mut rng1);
        let b = Sequence::random(500, &mut rng2);
        assert_eq!(a, b);
        assert_eq!(a.len(), 500);
    }

    #[test]
    fn test_hamming_distance() {
        let a = Sequence::from_str("ACGTACGT").unwrap();
        let b = Sequence::from_str("ACGAACCT").unwrap();
        assert_eq!(a.hamming_distance(&b), 2);
        assert_eq!(a.hamming_distance(&a), 0);
    }

    #[test]
    fn test_sequence_get() {
        let seq = Sequence::from_str("ACGT").unwrap();
        assert_eq!(seq.get(2), Some(Nucleotide::G));
        assert_eq!(seq.get(4), None);
    }
}
