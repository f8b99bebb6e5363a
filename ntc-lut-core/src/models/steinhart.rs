//! Steinhart-Hart polynomial model
//!
//! ```text
//! 1/T = a₀ + a₁·ln R + a₂·(ln R)² + a₃·(ln R)³
//! ```
//!
//! The common 3-term form `(A, B, C)` is the 4-term form with `a₂ = 0`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    errors::{LutError, LutResult},
    models::{check_resistance, check_temperature, ResistanceToTemperature},
    KELVIN_OFFSET,
};

/// Number of Steinhart-Hart coefficients in the general form
pub const COEFFICIENT_COUNT: usize = 4;

/// Thermistor characterized by Steinhart-Hart coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SteinhartHart {
    /// `a₀..a₃`
    pub coefficients: [f64; COEFFICIENT_COUNT],
}

impl SteinhartHart {
    /// Create from the four coefficients `a₀, a₁, a₂, a₃`
    pub fn new(coefficients: [f64; COEFFICIENT_COUNT]) -> LutResult<Self> {
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(LutError::config("steinhart_coefficients", "must be finite"));
        }
        Ok(Self { coefficients })
    }

    /// Create from the 3-term `A, B, C` form
    pub fn three_term(a: f64, b: f64, c: f64) -> LutResult<Self> {
        Self::new([a, b, 0.0, c])
    }

    /// Create from a coefficient list, which must hold exactly four values
    pub fn from_slice(coefficients: &[f64]) -> LutResult<Self> {
        let array: [f64; COEFFICIENT_COUNT] = coefficients
            .try_into()
            .map_err(|_| LutError::config("steinhart_coefficients", "requires exactly 4 values"))?;
        Self::new(array)
    }

    /// Inverse absolute temperature (1/K) at the given resistance
    pub fn inverse_kelvin(&self, resistance_ohms: f64) -> f64 {
        let l = libm::log(resistance_ohms);
        let [a0, a1, a2, a3] = self.coefficients;
        a0 + l * (a1 + l * (a2 + l * a3))
    }
}

impl ResistanceToTemperature for SteinhartHart {
    fn temperature_c(&self, resistance_ohms: f64) -> LutResult<f64> {
        check_resistance(resistance_ohms)?;
        let kelvin = 1.0 / self.inverse_kelvin(resistance_ohms);
        check_temperature(kelvin - KELVIN_OFFSET, resistance_ohms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_10k() -> SteinhartHart {
        SteinhartHart::three_term(1.009249522e-3, 2.378405444e-4, 2.019202697e-7).unwrap()
    }

    #[test]
    fn ten_k_is_near_room_temperature() {
        // These published coefficients put 10 kΩ at about 24.7 °C
        let t = standard_10k().temperature_c(10_000.0).unwrap();
        assert!((t - 24.68).abs() < 0.01, "got {}", t);
    }

    #[test]
    fn three_term_sets_quadratic_to_zero() {
        assert_eq!(standard_10k().coefficients[2], 0.0);
    }

    #[test]
    fn coefficient_count_enforced() {
        assert!(matches!(
            SteinhartHart::from_slice(&[1e-3, 2e-4, 1e-7]),
            Err(LutError::InvalidConfig { field: "steinhart_coefficients", .. })
        ));
        assert!(SteinhartHart::from_slice(&[1e-3, 2e-4, 0.0, 1e-7]).is_ok());
        assert!(SteinhartHart::from_slice(&[1e-3, 2e-4, 0.0, 1e-7, 0.0]).is_err());
    }

    #[test]
    fn matches_expanded_polynomial() {
        let model = SteinhartHart::new([1.1e-3, 2.3e-4, 1.0e-6, 9.0e-8]).unwrap();
        let l = libm::log(4_700.0);
        let expected = 1.0 / (1.1e-3 + 2.3e-4 * l + 1.0e-6 * l * l + 9.0e-8 * l * l * l) - 273.15;
        assert!((model.temperature_c(4_700.0).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_positive_resistance() {
        assert!(standard_10k().temperature_c(0.0).is_err());
    }
}
