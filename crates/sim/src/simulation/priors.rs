//! Prior distributions of the model parameters.

use rand::Rng;
use rand_distr::{Distribution, Exp};
use serde::{Deserialize, Serialize};

use crate::birth_death::BirthDeathParameters;
use crate::errors::{MutationError, ParameterError};
use crate::evolution::ClockParameters;

/// Independent priors for one replicate.
///
/// Exponential priors are given by their mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorConfig {
    /// Origin time, Uniform[origin_min, origin_max]
    pub origin_min: f64,
    pub origin_max: f64,
    /// Death rate mu, Exponential
    pub death_mean: f64,
    /// Net diversification lambda - mu, Exponential
    pub net_birth_mean: f64,
    /// Sequenced sampling rate psi, Exponential
    pub psi_mean: f64,
    /// Occurrence rate omega, Exponential
    pub omega_mean: f64,
    /// Removal probability r, Uniform[removal_min, removal_max]
    pub removal_min: f64,
    pub removal_max: f64,
    /// Present sampling probability rho, Uniform[rho_min, rho_max]
    pub rho_min: f64,
    pub rho_max: f64,
    /// Clock rate alpha, Exponential
    pub clock_rate_mean: f64,
}

impl Default for PriorConfig {
    fn default() -> Self {
        Self {
            origin_min: 1.0,
            origin_max: 5.0,
            death_mean: 1.0,
            net_birth_mean: 0.01,
            psi_mean: 0.2,
            omega_mean: 0.2,
            removal_min: 0.0,
            removal_max: 1.0,
            rho_min: 0.8,
            rho_max: 1.0,
            clock_rate_mean: 0.05,
        }
    }
}

impl PriorConfig {
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.origin_min.is_finite() && self.origin_max.is_finite())
            || self.origin_min <= 0.0
            || self.origin_min > self.origin_max
        {
            return Err(ParameterError::InvalidPrior(format!(
                "origin range [{}, {}] must be finite, positive and ordered",
                self.origin_min, self.origin_max
            )));
        }

        for (name, mean) in [
            ("death_mean", self.death_mean),
            ("net_birth_mean", self.net_birth_mean),
            ("psi_mean", self.psi_mean),
            ("omega_mean", self.omega_mean),
            ("clock_rate_mean", self.clock_rate_mean),
        ] {
            if !mean.is_finite() || mean <= 0.0 {
                return Err(ParameterError::InvalidPrior(format!(
                    "{name} must be finite and > 0, got {mean}"
                )));
            }
        }

        for (name, min, max) in [
            ("removal", self.removal_min, self.removal_max),
            ("rho", self.rho_min, self.rho_max),
        ] {
            if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) || min > max {
                return Err(ParameterError::InvalidPrior(format!(
                    "{name} range [{min}, {max}] must be ordered and inside [0, 1]"
                )));
            }
        }

        Ok(())
    }

    /// Draw one replicate's parameters.
    ///
    /// Draws happen in a fixed order (origin, mu, lambda - mu, psi, omega,
    /// r, rho, alpha) so a seed always maps to the same parameter sets.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PriorSample, ParameterError> {
        self.validate()?;

        let origin = uniform(rng, self.origin_min, self.origin_max);
        let mu = exponential(rng, self.death_mean)?;
        let lamb = mu + exponential(rng, self.net_birth_mean)?;
        let psi = exponential(rng, self.psi_mean)?;
        let omega = exponential(rng, self.omega_mean)?;
        let r = uniform(rng, self.removal_min, self.removal_max);
        let rho = uniform(rng, self.rho_min, self.rho_max);
        let alpha = exponential(rng, self.clock_rate_mean)?;

        Ok(PriorSample {
            origin,
            parameters: ParameterSet {
                lamb,
                mu,
                rho,
                psi,
                r,
                omega,
                alpha,
            },
        })
    }
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + rng.random::<f64>() * (max - min)
}

fn exponential<R: Rng + ?Sized>(rng: &mut R, mean: f64) -> Result<f64, ParameterError> {
    let dist = Exp::new(1.0 / mean)
        .map_err(|e| ParameterError::InvalidPrior(format!("exponential with mean {mean}: {e}")))?;
    Ok(dist.sample(rng))
}

/// Result of one prior draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorSample {
    /// Time before present at which the process starts.
    pub origin: f64,
    pub parameters: ParameterSet,
}

/// The seven model parameters of one replicate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub lamb: f64,
    pub mu: f64,
    pub rho: f64,
    pub psi: f64,
    pub r: f64,
    pub omega: f64,
    pub alpha: f64,
}

impl ParameterSet {
    /// Parameter names in file order.
    pub const NAMES: [&'static str; 7] = ["lamb", "mu", "rho", "psi", "r", "omega", "alpha"];

    /// Name/value pairs in file order.
    pub fn named(&self) -> [(&'static str, f64); 7] {
        [
            ("lamb", self.lamb),
            ("mu", self.mu),
            ("rho", self.rho),
            ("psi", self.psi),
            ("r", self.r),
            ("omega", self.omega),
            ("alpha", self.alpha),
        ]
    }

    /// The (lambda, mu, rho, psi, r, omega) tuple for the tree simulator.
    pub fn birth_death(&self) -> Result<BirthDeathParameters, ParameterError> {
        BirthDeathParameters::new(self.lamb, self.mu, self.rho, self.psi, self.r, self.omega)
    }

    /// The clock list [alpha] for the sequence simulator.
    pub fn clock(&self) -> Result<ClockParameters, MutationError> {
        ClockParameters::new(self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_default_priors_are_valid() {
        assert!(PriorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_priors_rejected() {
        let mut priors = PriorConfig::default();
        priors.origin_min = 6.0;
        assert!(matches!(priors.validate(), Err(ParameterError::InvalidPrior(_))));

        let mut priors = PriorConfig::default();
        priors.psi_mean = 0.0;
        assert!(priors.validate().is_err());

        let mut priors = PriorConfig::default();
        priors.rho_max = 1.2;
        assert!(priors.sample(&mut Xoshiro256PlusPlus::seed_from_u64(1)).is_err());
    }

    #[test]
    fn test_samples_respect_bounds() {
        let priors = PriorConfig::default();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        for _ in 0..2000 {
            let PriorSample { origin, parameters: p } = priors.sample(&mut rng).unwrap();
            assert!((1.0..=5.0).contains(&origin));
            assert!(p.lamb > p.mu);
            assert!(p.mu >= 0.0 && p.psi >= 0.0 && p.omega >= 0.0 && p.alpha >= 0.0);
            assert!((0.0..=1.0).contains(&p.r));
            assert!((0.8..=1.0).contains(&p.rho));
            assert!(p.birth_death().is_ok());
            assert!(p.clock().is_ok());
        }
    }

    #[test]
    fn test_draw_order() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let sample = PriorConfig::default().sample(&mut rng).unwrap();

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let origin = 1.0 + rng.random::<f64>() * 4.0;
        let mu: f64 = Exp::new(1.0).unwrap().sample(&mut rng);
        let net: f64 = Exp::new(100.0).unwrap().sample(&mut rng);

        assert_eq!(sample.origin, origin);
        assert_eq!(sample.parameters.mu, mu);
        assert!((sample.parameters.lamb - sample.parameters.mu - net).abs() < 1e-12);
    }

    #[test]
    fn test_named_follows_file_order() {
        let p = ParameterSet {
            lamb: 1.5,
            mu: 1.0,
            rho: 0.9,
            psi: 0.2,
            r: 0.5,
            omega: 0.1,
            alpha: 0.05,
        };
        let named = p.named();
        assert_eq!(named[0], ("lamb", 1.5));
        assert_eq!(named[6], ("alpha", 0.05));
        assert_eq!(named.map(|(name, _)| name), ParameterSet::NAMES);
    }
}
