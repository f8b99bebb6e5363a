//! Resistor-divider algebra
//!
//! The ADC reference voltage is applied across the divider and the ADC reads
//! the tap, so the normalized ADC value equals the divider ratio:
//!
//! ```text
//!   VREF ──┬── R_high ──┬── R_low ──┬── GND
//!                       │
//!                     ADC in
//!
//!   ratio = R_low / (R_high + R_low)
//! ```
//!
//! Ratio 0 and ratio 1 correspond to a 0 Ω or infinite thermistor and are
//! never sampled directly.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::{LutError, LutResult};

/// Which side of the divider the thermistor sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ThermistorPlacement {
    /// Between VREF and the tap
    Top,
    /// Between the tap and ground
    Bottom,
}

impl ThermistorPlacement {
    /// Lowercase name used in generated comments
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

/// Fixed half of the divider
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DividerConfig {
    /// Resistor on the opposite side from the thermistor (ohms)
    pub other_resistance: f64,
    /// Thermistor position
    pub placement: ThermistorPlacement,
}

impl DividerConfig {
    /// Create a validated divider configuration
    pub fn new(other_resistance: f64, placement: ThermistorPlacement) -> LutResult<Self> {
        let config = Self { other_resistance, placement };
        config.validate()?;
        Ok(config)
    }

    /// Check the fixed resistor is finite and positive
    pub fn validate(&self) -> LutResult<()> {
        if !self.other_resistance.is_finite() || self.other_resistance <= 0.0 {
            return Err(LutError::config("other_resistance", "must be > 0"));
        }
        Ok(())
    }

    /// Thermistor resistance seen at the given divider ratio
    pub fn thermistor_resistance(&self, divider_ratio: f64) -> LutResult<f64> {
        match self.placement {
            ThermistorPlacement::Top => high_side_resistance(divider_ratio, self.other_resistance),
            ThermistorPlacement::Bottom => low_side_resistance(divider_ratio, self.other_resistance),
        }
    }

    /// Thermistor resistance from the fractions of VREF across the low side
    /// (the divider ratio) and across the high side (`1 - ratio`).
    ///
    /// Taking both fractions keeps readings closer to a rail than an `f64`
    /// can resolve from `1 - ratio` finite.
    pub fn thermistor_resistance_from_fractions(&self, low: f64, high: f64) -> LutResult<f64> {
        let (numerator, denominator) = match self.placement {
            ThermistorPlacement::Top => (high, low),
            ThermistorPlacement::Bottom => (low, high),
        };
        if !(numerator.is_finite() && numerator >= 0.0) {
            return Err(LutError::domain("divider_fraction", numerator));
        }
        if !(denominator.is_finite() && denominator > 0.0) {
            return Err(LutError::domain("divider_fraction", denominator));
        }
        Ok(self.other_resistance * numerator / denominator)
    }
}

/// Low-side resistance from the divider ratio and the high-side resistance.
///
/// Valid for `ratio` in `[0, 1)`.
pub fn low_side_resistance(divider_ratio: f64, high_side: f64) -> LutResult<f64> {
    if !(0.0..1.0).contains(&divider_ratio) {
        return Err(LutError::domain("divider_ratio", divider_ratio));
    }
    if high_side.is_nan() || high_side < 0.0 {
        return Err(LutError::domain("high_side_resistance", high_side));
    }
    Ok(high_side * divider_ratio / (1.0 - divider_ratio))
}

/// High-side resistance from the divider ratio and the low-side resistance.
///
/// Valid for `ratio` in `(0, 1]`.
pub fn high_side_resistance(divider_ratio: f64, low_side: f64) -> LutResult<f64> {
    if !(divider_ratio > 0.0 && divider_ratio <= 1.0) {
        return Err(LutError::domain("divider_ratio", divider_ratio));
    }
    if low_side.is_nan() || low_side < 0.0 {
        return Err(LutError::domain("low_side_resistance", low_side));
    }
    Ok(low_side * (1.0 - divider_ratio) / divider_ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn equal_divider_mirrors_fixed_resistor() {
        assert_eq!(low_side_resistance(0.5, 10_000.0).unwrap(), 10_000.0);
        assert_eq!(high_side_resistance(0.5, 10_000.0).unwrap(), 10_000.0);
    }

    #[test]
    fn ratio_domain_edges() {
        assert_eq!(low_side_resistance(0.0, 10_000.0).unwrap(), 0.0);
        assert!(low_side_resistance(1.0, 10_000.0).is_err());
        assert_eq!(high_side_resistance(1.0, 10_000.0).unwrap(), 0.0);
        assert!(high_side_resistance(0.0, 10_000.0).is_err());
        assert!(low_side_resistance(f64::NAN, 10_000.0).is_err());
    }

    #[test]
    fn negative_fixed_resistance_rejected() {
        let err = low_side_resistance(0.5, -1.0).unwrap_err();
        assert!(matches!(err, LutError::DomainError { quantity: "high_side_resistance", .. }));
        assert!(high_side_resistance(0.5, -1.0).is_err());
    }

    #[test]
    fn placement_selects_formula() {
        let top = DividerConfig::new(4_700.0, ThermistorPlacement::Top).unwrap();
        let bottom = DividerConfig::new(4_700.0, ThermistorPlacement::Bottom).unwrap();

        // A quarter of VREF at the tap: the low side holds a third of the high side
        assert!((top.thermistor_resistance(0.25).unwrap() - 14_100.0).abs() < 1e-9);
        assert!((bottom.thermistor_resistance(0.25).unwrap() - 4_700.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn fractions_match_ratio_form() {
        for placement in [ThermistorPlacement::Top, ThermistorPlacement::Bottom] {
            let divider = DividerConfig::new(10_000.0, placement).unwrap();
            for ratio in [1.0 / 4096.0, 0.25, 0.5, 4095.0 / 4096.0] {
                assert_eq!(
                    divider.thermistor_resistance_from_fractions(ratio, 1.0 - ratio).unwrap(),
                    divider.thermistor_resistance(ratio).unwrap()
                );
            }
        }
    }

    #[test]
    fn fractions_resolve_ratios_next_to_the_rail() {
        let lsb = 1.0 / 18446744073709551616.0;
        let bottom = DividerConfig::new(10_000.0, ThermistorPlacement::Bottom).unwrap();
        let top = DividerConfig::new(10_000.0, ThermistorPlacement::Top).unwrap();

        // 1 - 2^-64 rounds to 1.0, which the ratio form rejects
        assert!(bottom.thermistor_resistance(1.0 - lsb).is_err());
        assert_eq!(bottom.thermistor_resistance_from_fractions(1.0 - lsb, lsb).unwrap(), 10_000.0 / lsb);
        assert_eq!(top.thermistor_resistance_from_fractions(1.0 - lsb, lsb).unwrap(), 10_000.0 * lsb);
        assert!(top.thermistor_resistance_from_fractions(0.0, 1.0).is_err());
        assert!(bottom.thermistor_resistance_from_fractions(0.5, f64::NAN).is_err());
    }

    #[test]
    fn other_resistance_must_be_positive() {
        assert!(DividerConfig::new(0.0, ThermistorPlacement::Top).is_err());
        assert!(DividerConfig::new(f64::INFINITY, ThermistorPlacement::Top).is_err());
    }

    proptest! {
        #[test]
        fn low_and_high_side_are_inverses(ratio in 0.001f64..0.999, resistance in 100.0f64..1.0e6) {
            let low = low_side_resistance(ratio, resistance).unwrap();
            let back = high_side_resistance(ratio, low).unwrap();
            prop_assert!((back - resistance).abs() <= resistance * 1e-12);
        }
    }
}
