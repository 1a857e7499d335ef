//! Point substitutions along a single branch.
//!
//! A `SubstitutionModel` holds per-branch change probabilities rather than
//! instantaneous rates: for a branch of length `t` under a clock rate `alpha`
//! the JC69 transition matrix is
//!
//! ```text
//! P(i -> i) = 1/4 + 3/4 * exp(-4/3 * alpha * t)
//! P(i -> j) = 1/4 - 1/4 * exp(-4/3 * alpha * t)    (i != j)
//! ```
//!
//! so each site changes with total probability `3/4 * (1 - exp(-4/3 * alpha * t))`
//! and, if it changes, moves to one of the three other bases uniformly.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::base::{Nucleotide, Sequence};
pub use crate::errors::MutationError;

/// Symmetric substitution probabilities between the four bases.
///
/// Entry `(i, j)` is the probability that base `i` ends the branch as base
/// `j`. The diagonal is implied (`1 - total`). Nucleotides are indexed
/// A=0, C=1, G=2, T=3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionModel {
    /// Upper triangle: [A-C, A-G, A-T, C-G, C-T, G-T]
    rates: [f64; 6],
    /// Total change probability per base, cached
    total_rates: [f64; 4],
}

impl SubstitutionModel {
    /// Create a model from a full 4x4 matrix with zero diagonal.
    ///
    /// # Errors
    /// Returns an error if the matrix is not symmetric, has a non-zero
    /// diagonal, has an entry outside [0, 1], or a row sums above 1.
    pub fn new(matrix: [[f64; 4]; 4]) -> Result<Self, MutationError> {
        for (i, row) in matrix.iter().enumerate() {
            if row[i] != 0.0 {
                return Err(MutationError::InvalidMutationRate(row[i]));
            }
        }

        for i in 0..4 {
            for j in (i + 1)..4 {
                check_matrix_values(matrix[i][j], matrix[j][i])?;
            }
        }

        let rates = [
            matrix[0][1],
            matrix[0][2],
            matrix[0][3],
            matrix[1][2],
            matrix[1][3],
            matrix[2][3],
        ];

        let mut total_rates = [0.0; 4];
        for (i, total) in total_rates.iter_mut().enumerate() {
            *total = matrix[i].iter().sum();
            if *total > 1.0 {
                return Err(MutationError::InvalidMutationRate(*total));
            }
        }

        Ok(Self { rates, total_rates })
    }

    /// JC69 model where each base changes with total probability `p`.
    pub fn jc69(p: f64) -> Result<Self, MutationError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(MutationError::InvalidMutationRate(p));
        }
        let rate = p / 3.0;

        let matrix = [
            [0.0, rate, rate, rate],
            [rate, 0.0, rate, rate],
            [rate, rate, 0.0, rate],
            [rate, rate, rate, 0.0],
        ];

        Self::new(matrix)
    }

    /// JC69 transition probabilities for a branch of length `t` under a
    /// strict clock with substitution rate `clock_rate`.
    pub fn jc69_branch(clock_rate: f64, t: f64) -> Result<Self, MutationError> {
        if !clock_rate.is_finite() || clock_rate < 0.0 {
            return Err(MutationError::InvalidClockRate(clock_rate));
        }
        // Negative lengths only arise from float noise on zero-length edges.
        Self::jc69(jc69_change_probability(clock_rate * t.max(0.0)))
    }

    /// Upper-triangle probabilities: [A-C, A-G, A-T, C-G, C-T, G-T]
    #[inline]
    pub fn rates(&self) -> [f64; 6] {
        self.rates
    }

    #[inline]
    pub fn total_rate(&self, base: Nucleotide) -> f64 {
        self.total_rates[base.to_index() as usize]
    }

    /// Probability that `from` becomes `to`; 0.0 if they are equal.
    #[inline]
    pub fn rate(&self, from: Nucleotide, to: Nucleotide) -> f64 {
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        match (lo, hi) {
            (Nucleotide::A, Nucleotide::C) => self.rates[0],
            (Nucleotide::A, Nucleotide::G) => self.rates[1],
            (Nucleotide::A, Nucleotide::T) => self.rates[2],
            (Nucleotide::C, Nucleotide::G) => self.rates[3],
            (Nucleotide::C, Nucleotide::T) => self.rates[4],
            (Nucleotide::G, Nucleotide::T) => self.rates[5],
            _ => 0.0,
        }
    }

    /// Evolve a single base across the branch.
    #[inline]
    pub fn mutate_base<R: Rng + ?Sized>(&self, base: Nucleotide, rng: &mut R) -> Nucleotide {
        let total_rate = self.total_rates[base.to_index() as usize];

        if rng.random::<f64>() >= total_rate {
            return base;
        }

        let r = rng.random::<f64>() * total_rate;
        let targets = base.others();
        let mut cumulative = 0.0;
        for target in targets {
            cumulative += self.rate(base, target);
            if r < cumulative {
                return target;
            }
        }

        // Float rounding can leave r just above the last cumulative bound.
        targets[2]
    }

    /// Evolve every site of `sequence` in place across the branch.
    ///
    /// Returns the number of sites that changed.
    pub fn mutate_sequence<R: Rng + ?Sized>(&self, sequence: &mut Sequence, rng: &mut R) -> usize {
        let mut mutation_count = 0;
        for site in sequence.as_mut_slice() {
            let new_base = self.mutate_base(*site, rng);
            if new_base != *site {
                *site = new_base;
                mutation_count += 1;
            }
        }
        mutation_count
    }
}

/// Total JC69 change probability for `distance` expected substitutions per
/// site. Tends to 3/4 as the distance grows.
#[inline]
pub fn jc69_change_probability(distance: f64) -> f64 {
    0.75 * (1.0 - (-4.0 / 3.0 * distance).exp())
}

#[inline]
fn check_matrix_values(rate_ij: f64, rate_ji: f64) -> Result<(), MutationError> {
    if (rate_ij - rate_ji).abs() > 1e-10 {
        return Err(MutationError::InvalidMutationRate(rate_ij));
    }

    if !(0.0..=1.0).contains(&rate_ij) {
        return Err(MutationError::InvalidMutationRate(rate_ij));
    }

    Ok(())
}
