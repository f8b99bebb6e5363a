//! Beta-equation model
//!
//! ```text
//! R∞   = R₀ · exp(-β / T₀)
//! T(R) = β / ln(R / R∞)
//! ```
//!
//! with `T₀` and `T(R)` in kelvin. Accurate near the reference point and
//! increasingly less so away from it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    errors::{LutError, LutResult},
    models::{check_resistance, check_temperature, ResistanceToTemperature},
    KELVIN_OFFSET,
};

/// Thermistor characterized by a single Beta coefficient
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BetaModel {
    /// Beta coefficient (kelvin)
    pub beta: f64,
    /// Resistance at the reference temperature (ohms)
    pub reference_resistance: f64,
    /// Reference temperature (°C)
    pub reference_temperature_c: f64,
}

impl BetaModel {
    /// Create a validated Beta model
    pub fn new(beta: f64, reference_resistance: f64, reference_temperature_c: f64) -> LutResult<Self> {
        let model = Self { beta, reference_resistance, reference_temperature_c };
        model.validate()?;
        Ok(model)
    }

    /// Check all parameters are physically meaningful
    pub fn validate(&self) -> LutResult<()> {
        if !self.beta.is_finite() || self.beta <= 0.0 {
            return Err(LutError::config("beta", "must be > 0"));
        }
        if !self.reference_resistance.is_finite() || self.reference_resistance <= 0.0 {
            return Err(LutError::config("reference_resistance", "must be > 0"));
        }
        if !self.reference_temperature_c.is_finite() || self.reference_temperature_c <= -KELVIN_OFFSET {
            return Err(LutError::config("reference_temperature", "must be above absolute zero"));
        }
        Ok(())
    }

    /// Resistance the thermistor would have at infinite temperature
    pub fn r_infinity(&self) -> f64 {
        self.reference_resistance * libm::exp(-self.beta / (self.reference_temperature_c + KELVIN_OFFSET))
    }
}

impl ResistanceToTemperature for BetaModel {
    fn temperature_c(&self, resistance_ohms: f64) -> LutResult<f64> {
        check_resistance(resistance_ohms)?;
        let kelvin = self.beta / libm::log(resistance_ohms / self.r_infinity());
        check_temperature(kelvin - KELVIN_OFFSET, resistance_ohms)
    }
}
