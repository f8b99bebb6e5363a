//! Manufacturer-data model
//!
//! Datasheets usually tabulate resistance at fixed temperature steps. Before
//! the table can be evaluated at arbitrary resistances the tabulation has to
//! be fitted once, either by
//! - a not-a-knot cubic spline through every point (temperature as a function
//!   of resistance, extrapolated beyond the data), or
//! - a 3- or 4-term Steinhart-Hart regression against the temperatures in
//!   kelvin.
//!
//! [`ManufacturerData`] holds the raw samples; [`ManufacturerData::fit`]
//! consumes it and returns an immutable [`ManufacturerFit`], so the fit runs
//! exactly once and an unfitted tabulation can never be evaluated.

use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    errors::{LutError, LutResult},
    fit::{fit_inverse_log_polynomial, CubicSpline, InversePolynomialFit},
    models::{check_resistance, check_temperature, ResistanceToTemperature, SteinhartHart},
    KELVIN_OFFSET,
};

/// Minimum number of samples accepted for any fit
pub const MIN_SAMPLES: usize = 4;

/// One manufacturer data point
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Temperature (°C)
    pub temperature_c: f64,
    /// Thermistor resistance at that temperature (ohms)
    pub resistance_ohms: f64,
}

/// How the manufacturer data is turned into a continuous curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FitMethod {
    /// Cubic spline through every sample
    PiecewiseCubic,
    /// Regression of `1/T = A + B·ln R + C·(ln R)³`
    SteinhartHart3,
    /// Regression of the full 4-term polynomial
    SteinhartHart4,
}

impl FitMethod {
    /// Resolve the command-line selector: `piecewise-cubic`, or `steinhart`
    /// together with a term count of 3 or 4
    pub fn from_selector(method: &str, terms: Option<u32>) -> LutResult<Self> {
        match (method, terms) {
            ("piecewise-cubic", None) => Ok(Self::PiecewiseCubic),
            ("steinhart", Some(3)) => Ok(Self::SteinhartHart3),
            ("steinhart", Some(4)) => Ok(Self::SteinhartHart4),
            ("steinhart", _) => Err(LutError::config("steinhart", "term count must be 3 or 4")),
            ("piecewise-cubic", Some(_)) => {
                Err(LutError::config("steinhart", "term count only applies to steinhart interpolation"))
            }
            _ => Err(LutError::config("interpolation", "must be piecewise-cubic or steinhart")),
        }
    }

    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PiecewiseCubic => "piecewise-cubic",
            Self::SteinhartHart3 => "steinhart3",
            Self::SteinhartHart4 => "steinhart4",
        }
    }

    /// Curve name used in generated comments
    pub fn description(&self) -> &'static str {
        match self {
            Self::PiecewiseCubic => "piecewise-cubic",
            Self::SteinhartHart3 => "3 parameter Steinhart-Hart",
            Self::SteinhartHart4 => "4 parameter Steinhart-Hart",
        }
    }
}

impl fmt::Display for FitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitMethod {
    type Err = LutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "piecewise-cubic" => Ok(Self::PiecewiseCubic),
            "steinhart3" | "steinhart-3" => Ok(Self::SteinhartHart3),
            "steinhart4" | "steinhart-4" => Ok(Self::SteinhartHart4),
            _ => Err(LutError::config(
                "interpolation",
                "must be piecewise-cubic, steinhart3 or steinhart4",
            )),
        }
    }
}

/// Validated, unfitted manufacturer samples
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ManufacturerData {
    samples: Vec<Sample>,
}

impl ManufacturerData {
    /// Validate samples: at least [`MIN_SAMPLES`], positive resistances,
    /// temperatures above absolute zero
    pub fn new(samples: Vec<Sample>) -> LutResult<Self> {
        if samples.len() < MIN_SAMPLES {
            return Err(LutError::InsufficientData { required: MIN_SAMPLES, available: samples.len() });
        }
        for sample in &samples {
            if !sample.resistance_ohms.is_finite() || sample.resistance_ohms <= 0.0 {
                return Err(LutError::domain("sample resistance", sample.resistance_ohms));
            }
            if !sample.temperature_c.is_finite() || sample.temperature_c <= -KELVIN_OFFSET {
                return Err(LutError::domain("sample temperature", sample.temperature_c));
            }
        }
        Ok(Self { samples })
    }

    /// Samples in input order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Fit the samples once with the chosen method
    pub fn fit(self, method: FitMethod) -> LutResult<ManufacturerFit> {
        let mut samples = self.samples;
        samples.sort_by(|a, b| a.resistance_ohms.total_cmp(&b.resistance_ohms));
        if let Some(pair) = samples.windows(2).find(|p| p[0].resistance_ohms == p[1].resistance_ohms) {
            return Err(LutError::DuplicateResistance { resistance: pair[0].resistance_ohms });
        }

        let resistances: Vec<f64> = samples.iter().map(|s| s.resistance_ohms).collect();
        let temperatures: Vec<f64> = samples.iter().map(|s| s.temperature_c).collect();

        let curve = match method {
            FitMethod::PiecewiseCubic => {
                FittedCurve::PiecewiseCubic(CubicSpline::not_a_knot(&resistances, &temperatures)?)
            }
            FitMethod::SteinhartHart3 => {
                let kelvin: Vec<f64> = temperatures.iter().map(|t| t + KELVIN_OFFSET).collect();
                let fit = fit_inverse_log_polynomial(&resistances, &kelvin, [0, 1, 3])?;
                let [a, b, c] = fit.coefficients;
                FittedCurve::SteinhartHart(SteinhartHartFit::from_fit(SteinhartHart::three_term(a, b, c)?, &fit))
            }
            FitMethod::SteinhartHart4 => {
                let kelvin: Vec<f64> = temperatures.iter().map(|t| t + KELVIN_OFFSET).collect();
                let fit = fit_inverse_log_polynomial(&resistances, &kelvin, [0, 1, 2, 3])?;
                FittedCurve::SteinhartHart(SteinhartHartFit::from_fit(SteinhartHart::new(fit.coefficients)?, &fit))
            }
        };

        let span = temperatures.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| {
            (lo.min(t), hi.max(t))
        });

        Ok(ManufacturerFit { method, curve, samples, temperature_span: span })
    }
}

/// Outcome of a Steinhart-Hart regression
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SteinhartHartFit {
    /// The fitted curve as a 4-term model
    pub model: SteinhartHart,
    /// Fitted parameters in regression order (`A, B, C` or `a₀..a₃`)
    pub parameters: Vec<f64>,
    /// Parameter covariance
    pub covariance: Vec<Vec<f64>>,
    /// Standard error of each parameter
    pub standard_errors: Vec<f64>,
    /// Iterations the regression needed
    pub iterations: usize,
    /// Sum of squared temperature residuals (K²)
    pub residual_sum_squares: f64,
}

impl SteinhartHartFit {
    fn from_fit<const N: usize>(model: SteinhartHart, fit: &InversePolynomialFit<N>) -> Self {
        Self {
            model,
            parameters: fit.coefficients.to_vec(),
            covariance: fit.covariance.iter().map(|row| row.to_vec()).collect(),
            standard_errors: fit.standard_errors().to_vec(),
            iterations: fit.iterations,
            residual_sum_squares: fit.residual_sum_squares,
        }
    }
}

/// Fitted representation of the manufacturer curve
#[derive(Debug, Clone, PartialEq)]
pub enum FittedCurve {
    /// Spline through the samples
    PiecewiseCubic(CubicSpline),
    /// Regressed Steinhart-Hart coefficients
    SteinhartHart(SteinhartHartFit),
}

/// Manufacturer data after its one-time fit
#[derive(Debug, Clone, PartialEq)]
pub struct ManufacturerFit {
    method: FitMethod,
    curve: FittedCurve,
    samples: Vec<Sample>,
    temperature_span: (f64, f64),
}

impl ManufacturerFit {
    /// Method used for the fit
    pub fn method(&self) -> FitMethod {
        self.method
    }

    /// The fitted curve
    pub fn curve(&self) -> &FittedCurve {
        &self.curve
    }

    /// Regression results, if a Steinhart-Hart fit was used
    pub fn steinhart_hart(&self) -> Option<&SteinhartHartFit> {
        match &self.curve {
            FittedCurve::SteinhartHart(fit) => Some(fit),
            FittedCurve::PiecewiseCubic(_) => None,
        }
    }

    /// Samples sorted by resistance
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Lowest and highest sample temperature (°C)
    pub fn temperature_span(&self) -> (f64, f64) {
        self.temperature_span
    }
}

impl ResistanceToTemperature for ManufacturerFit {
    fn temperature_c(&self, resistance_ohms: f64) -> LutResult<f64> {
        check_resistance(resistance_ohms)?;
        match &self.curve {
            FittedCurve::PiecewiseCubic(spline) => {
                check_temperature(spline.evaluate(resistance_ohms), resistance_ohms)
            }
            FittedCurve::SteinhartHart(fit) => fit.model.temperature_c(resistance_ohms),
        }
    }
}
