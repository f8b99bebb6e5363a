//! Error Types for Table Generation Failures
//!
//! ## Design
//!
//! Table generation is a one-shot batch computation, so every error is fatal
//! for the current run. Nothing is retried and nothing is silently replaced
//! by a default value. The variants are grouped into five categories, exposed
//! through [`LutError::category`]:
//!
//! ### Configuration
//! - `InvalidConfig`: a parameter fails validation (non-positive beta,
//!   `table_bits > adc_bits`, wrong Steinhart-Hart coefficient count, unknown
//!   interpolation method, ...)
//!
//! ### Domain
//! - `DomainError`: a divider ratio or resistance outside the algebraic
//!   domain of a formula, or a model that produced a non-finite temperature
//!
//! ### Data
//! - `MalformedLine`: a line of the tabular input could not be parsed
//! - `InsufficientData`: too few samples to fit the requested curve
//! - `DuplicateResistance`: two samples share a resistance, so temperature is
//!   not a function of resistance
//! - `FitDidNotConverge` / `SingularSystem`: the curve fit failed
//!
//! ### Range
//! - `ValueOutOfRange`: a quantized temperature exceeds the 64-bit range
//! - `AdcWidthOutOfRange`: the ADC's raw values exceed the 64-bit range
//!
//! ### Sequencing
//! - `TableNotBuilt`: code emission was requested before the table exists
//!
//! ## Handling Strategy
//!
//! ```rust
//! use ntc_lut_core::{ErrorCategory, LutError};
//!
//! fn exit_code(err: &LutError) -> i32 {
//!     match err.category() {
//!         ErrorCategory::Configuration => 2,
//!         ErrorCategory::Data => 3,
//!         _ => 1,
//!     }
//! }
//!
//! let err = LutError::TableNotBuilt;
//! assert_eq!(exit_code(&err), 1);
//! ```

use alloc::string::String;

use thiserror_no_std::Error;

/// Result type for table generation operations
pub type LutResult<T> = Result<T, LutError>;

/// Broad classification of a [`LutError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected input parameters
    Configuration,
    /// Arguments outside a formula's valid domain
    Domain,
    /// Problems with manufacturer sample data or its fit
    Data,
    /// Values that no supported integer width can hold
    Range,
    /// Operations requested in the wrong order
    Sequencing,
}

/// Table generation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LutError {
    /// A configuration parameter failed validation
    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig {
        /// Name of the offending parameter
        field: &'static str,
        /// What the parameter must satisfy
        reason: &'static str,
    },

    /// Argument outside the valid domain of a formula
    #[error("{quantity} {value} outside valid domain")]
    DomainError {
        /// Name of the quantity, e.g. "divider_ratio"
        quantity: &'static str,
        /// The rejected value
        value: f64,
    },

    /// A line of tabular input could not be parsed
    #[error("Failed to read line {line}: {content}")]
    MalformedLine {
        /// 1-based line number
        line: usize,
        /// The offending line, trimmed
        content: String,
    },

    /// Not enough samples for the requested fit
    #[error("Insufficient data: need {required} samples, have {available}")]
    InsufficientData {
        /// Minimum number of samples for the fit
        required: usize,
        /// Samples actually supplied
        available: usize,
    },

    /// Two samples share the same resistance
    #[error("Duplicate resistance {resistance} ohms in sample data")]
    DuplicateResistance {
        /// The repeated resistance value
        resistance: f64,
    },

    /// Least-squares regression hit its iteration cap
    #[error("Curve fit did not converge after {iterations} iterations")]
    FitDidNotConverge {
        /// Iterations performed before giving up
        iterations: usize,
    },

    /// A linear system inside a fit could not be solved
    #[error("Singular linear system while fitting sample data")]
    SingularSystem,

    /// Quantized temperature does not fit in a 64-bit signed integer
    #[error("Value {value} out of range for the largest supported integer width")]
    ValueOutOfRange {
        /// The scaled temperature before truncation
        value: f64,
    },

    /// ADC raw values do not fit in a 64-bit unsigned integer
    #[error("ADC width of {bits} bits exceeds the largest supported integer width")]
    AdcWidthOutOfRange {
        /// Configured ADC resolution
        bits: u32,
    },

    /// Code emission was requested before the table was built
    #[error("Table must be generated before emitting code")]
    TableNotBuilt,
}

impl LutError {
    /// Shorthand for [`LutError::InvalidConfig`]
    pub(crate) fn config(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidConfig { field, reason }
    }

    /// Shorthand for [`LutError::DomainError`]
    pub(crate) fn domain(quantity: &'static str, value: f64) -> Self {
        Self::DomainError { quantity, value }
    }

    /// Category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfig { .. } => ErrorCategory::Configuration,
            Self::DomainError { .. } => ErrorCategory::Domain,
            Self::MalformedLine { .. }
            | Self::InsufficientData { .. }
            | Self::DuplicateResistance { .. }
            | Self::FitDidNotConverge { .. }
            | Self::SingularSystem => ErrorCategory::Data,
            Self::ValueOutOfRange { .. } | Self::AdcWidthOutOfRange { .. } => ErrorCategory::Range,
            Self::TableNotBuilt => ErrorCategory::Sequencing,
        }
    }
}
