use serde::{Deserialize, Serialize};

use crate::errors::ParameterError;

/// Rates and probabilities of the occurrence birth-death process.
///
/// Field order follows the conventional tuple (lambda, mu, rho, psi, r, omega).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirthDeathParameters {
    /// Birth (transmission) rate, lambda
    pub birth: f64,
    /// Death (recovery) rate, mu
    pub death: f64,
    /// Probability of sampling a lineage alive at present, rho
    pub rho: f64,
    /// Sequenced sampling rate through time, psi
    pub psi: f64,
    /// Probability that a sampled lineage is removed, r
    pub removal: f64,
    /// Unsequenced occurrence rate, omega
    pub omega: f64,
}

impl BirthDeathParameters {
    /// # Errors
    /// Rejects negative or non-finite rates and probabilities outside [0, 1].
    pub fn new(
        birth: f64,
        death: f64,
        rho: f64,
        psi: f64,
        removal: f64,
        omega: f64,
    ) -> Result<Self, ParameterError> {
        let params = Self {
            birth,
            death,
            rho,
            psi,
            removal,
            omega,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        check_rate("lambda", self.birth)?;
        check_rate("mu", self.death)?;
        check_rate("psi", self.psi)?;
        check_rate("omega", self.omega)?;
        check_probability("rho", self.rho)?;
        check_probability("r", self.removal)?;
        Ok(())
    }

    /// Total per-lineage event rate.
    #[inline]
    pub fn event_rate(&self) -> f64 {
        self.birth + self.death + self.psi + self.omega
    }

    /// (lambda, mu, rho, psi, r, omega)
    pub fn as_tuple(&self) -> (f64, f64, f64, f64, f64, f64) {
        (
            self.birth,
            self.death,
            self.rho,
            self.psi,
            self.removal,
            self.omega,
        )
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ParameterError::InvalidRate(name, value))
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ParameterError::InvalidProbability(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_parameters() {
        let params = BirthDeathParameters::new(1.2, 1.0, 0.9, 0.2, 0.5, 0.1).unwrap();
        assert_eq!(params.as_tuple(), (1.2, 1.0, 0.9, 0.2, 0.5, 0.1));
        assert!((params.event_rate() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_negative_rate() {
        assert_eq!(
            BirthDeathParameters::new(1.0, -0.1, 0.9, 0.2, 0.5, 0.1),
            Err(ParameterError::InvalidRate("mu", -0.1))
        );
        assert!(BirthDeathParameters::new(f64::INFINITY, 1.0, 0.9, 0.2, 0.5, 0.1).is_err());
    }

    #[test]
    fn test_rejects_bad_probability() {
        assert_eq!(
            BirthDeathParameters::new(1.0, 0.5, 1.1, 0.2, 0.5, 0.1),
            Err(ParameterError::InvalidProbability("rho", 1.1))
        );
        assert!(BirthDeathParameters::new(1.0, 0.5, 0.9, 0.2, f64::NAN, 0.1).is_err());
    }
}
