//! Resistance-to-temperature models
//!
//! Every characterization source implements [`ResistanceToTemperature`].
//! The table builder consumes the tagged [`TemperatureModel`], which also
//! decides how the two unreachable table ends are filled in
//! ([`BoundaryPolicy`]).

mod beta;
mod manufacturer;
mod steinhart;

pub use beta::BetaModel;
pub use manufacturer::{
    FitMethod, FittedCurve, ManufacturerData, ManufacturerFit, Sample, SteinhartHartFit, MIN_SAMPLES,
};
pub use steinhart::{SteinhartHart, COEFFICIENT_COUNT};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::{LutError, LutResult};

/// Capability shared by all thermistor models
pub trait ResistanceToTemperature {
    /// Temperature (°C) at the given resistance. The domain is `resistance > 0`.
    fn temperature_c(&self, resistance_ohms: f64) -> LutResult<f64>;
}

pub(crate) fn check_resistance(resistance_ohms: f64) -> LutResult<()> {
    if !resistance_ohms.is_finite() || resistance_ohms <= 0.0 {
        return Err(LutError::domain("resistance", resistance_ohms));
    }
    Ok(())
}

/// A model that evaluates to NaN or infinity has left its valid domain
pub(crate) fn check_temperature(temperature_c: f64, resistance_ohms: f64) -> LutResult<f64> {
    if temperature_c.is_finite() {
        Ok(temperature_c)
    } else {
        Err(LutError::domain("resistance", resistance_ohms))
    }
}

/// How table entries at divider ratio 0 and 1 are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum BoundaryPolicy {
    /// Evaluate the model one ADC LSB away from each extreme
    AdcEdge,
    /// Continue the slope of the two nearest interior entries
    LinearExtrapolation,
}

/// One of the supported thermistor characterizations
#[derive(Debug, Clone, PartialEq)]
pub enum TemperatureModel {
    /// Beta coefficient and reference point
    Beta(BetaModel),
    /// Steinhart-Hart coefficients
    SteinhartHart(SteinhartHart),
    /// Fitted manufacturer data
    Manufacturer(ManufacturerFit),
}

impl TemperatureModel {
    /// Boundary policy for this kind of model
    ///
    /// Closed-form models stay well defined one LSB from the rails. Fitted data
    /// is only trustworthy near its samples, so the ends are extrapolated from
    /// the table instead.
    pub fn boundary_policy(&self) -> BoundaryPolicy {
        match self {
            Self::Beta(_) | Self::SteinhartHart(_) => BoundaryPolicy::AdcEdge,
            Self::Manufacturer(_) => BoundaryPolicy::LinearExtrapolation,
        }
    }

    /// Temperature range (°C) backed by measured data, if any
    pub fn valid_range_c(&self) -> Option<(f64, f64)> {
        match self {
            Self::Manufacturer(fit) => Some(fit.temperature_span()),
            _ => None,
        }
    }

    /// Short model name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Beta(_) => "beta",
            Self::SteinhartHart(_) => "steinhart-hart",
            Self::Manufacturer(_) => "manufacturer",
        }
    }
}

impl ResistanceToTemperature for TemperatureModel {
    fn temperature_c(&self, resistance_ohms: f64) -> LutResult<f64> {
        match self {
            Self::Beta(model) => model.temperature_c(resistance_ohms),
            Self::SteinhartHart(model) => model.temperature_c(resistance_ohms),
            Self::Manufacturer(fit) => fit.temperature_c(resistance_ohms),
        }
    }
}
