//! Lookup table engine for NTC thermistors
//!
//! Converts the resistance/temperature characteristic of an NTC thermistor
//! wired into a two-resistor divider into a fixed-point table, plus the C
//! interpolation routine a microcontroller runs against its ratiometric ADC.
//!
//! Three characterization sources are supported and share one pipeline:
//! - Beta coefficient with a reference point ([`BetaModel`])
//! - 3- or 4-term Steinhart-Hart coefficients ([`SteinhartHart`])
//! - Manufacturer tabulations, fitted by Steinhart-Hart regression or a
//!   piecewise cubic ([`ManufacturerData`])
//!
//! ```no_run
//! use ntc_lut_core::{
//!     BetaModel, DividerConfig, GeneratorConfig, LutGenerator, ModelSource,
//!     TableSpec, ThermistorPlacement,
//! };
//!
//! let config = GeneratorConfig {
//!     table: TableSpec::new(12, 8, 0.1)?,
//!     divider: DividerConfig::new(10_000.0, ThermistorPlacement::Bottom)?,
//! };
//! let source = ModelSource::Beta(BetaModel::new(3950.0, 10_000.0, 25.0)?);
//!
//! let mut generator = LutGenerator::new(config, source)?;
//! generator.build()?;
//! let c_code = generator.emit_c()?;
//! # Ok::<(), ntc_lut_core::LutError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod data;
pub mod divider;
pub mod emit;
pub mod errors;
pub mod fit;
pub mod generator;
pub mod models;
pub mod table;
pub mod width;

// Public API
pub use data::parse_samples;
pub use divider::{high_side_resistance, low_side_resistance, DividerConfig, ThermistorPlacement};
pub use emit::{CSource, CurvePoint, TableReport};
pub use errors::{ErrorCategory, LutError, LutResult};
pub use generator::{GeneratorConfig, LutGenerator, ModelSource};
pub use models::{
    BetaModel, BoundaryPolicy, FitMethod, ManufacturerData, ManufacturerFit, ResistanceToTemperature,
    Sample, SteinhartHart, TemperatureModel,
};
pub use table::{LookupTable, TableSpec};
pub use width::{SignedWidth, UnsignedWidth};

/// Crate version, embedded in generated artifacts
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Offset between degrees Celsius and kelvin
pub const KELVIN_OFFSET: f64 = 273.15;
