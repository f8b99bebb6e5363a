//! Table construction
//!
//! The ADC is ratiometric, so an `adc_bits` reading `v` is the divider ratio
//! `v / 2^adc_bits`. The table samples that ratio on a coarser grid of
//! `2^table_bits` steps and the firmware interpolates between neighbours
//! using the low `shift = adc_bits - table_bits` bits of the reading.
//!
//! ```text
//!   index:   0        1        2      ...   2^tb - 1      2^tb
//!   ratio:   0      1/2^tb   2/2^tb   ...                 1
//!            │                                            │
//!            └── unreachable (0 Ω or ∞ Ω thermistor) ─────┘
//! ```
//!
//! Entries 0 and `2^table_bits` are filled by the model's
//! [`BoundaryPolicy`].

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    divider::{DividerConfig, ThermistorPlacement},
    errors::{LutError, LutResult},
    models::{BoundaryPolicy, ResistanceToTemperature, TemperatureModel},
};

/// Largest supported ADC resolution; the raw reading must fit a `uint64_t`
pub const MAX_ADC_BITS: u32 = 64;

/// Largest supported index width, keeping the table addressable
pub const MAX_TABLE_BITS: u32 = 24;

/// Table geometry and quantization
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableSpec {
    /// ADC resolution in bits
    pub adc_bits: u32,
    /// Index bits; the table holds `2^table_bits + 1` entries
    pub table_bits: u32,
    /// Temperature quantization unit (°C)
    pub resolution: f64,
}

impl TableSpec {
    /// Create a validated table specification
    pub fn new(adc_bits: u32, table_bits: u32, resolution: f64) -> LutResult<Self> {
        let spec = Self { adc_bits, table_bits, resolution };
        spec.validate()?;
        Ok(spec)
    }

    /// Check bit widths and resolution
    ///
    /// An ADC wider than [`MAX_ADC_BITS`] is a range error rather than a
    /// configuration error: no C integer type holds its readings.
    pub fn validate(&self) -> LutResult<()> {
        if self.adc_bits == 0 {
            return Err(LutError::config("adc_bits", "must be >= 1"));
        }
        if self.adc_bits > MAX_ADC_BITS {
            return Err(LutError::AdcWidthOutOfRange { bits: self.adc_bits });
        }
        if self.table_bits == 0 {
            return Err(LutError::config("table_bits", "must be >= 1"));
        }
        if self.table_bits > MAX_TABLE_BITS {
            return Err(LutError::config("table_bits", "must be <= 24"));
        }
        if self.table_bits > self.adc_bits {
            return Err(LutError::config("table_bits", "must be <= adc_bits"));
        }
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(LutError::config("resolution", "must be > 0"));
        }
        Ok(())
    }

    /// Number of table entries, `2^table_bits + 1`
    pub fn table_len(&self) -> usize {
        (1usize << self.table_bits) + 1
    }

    /// ADC bits below the table index
    pub fn shift(&self) -> u32 {
        self.adc_bits - self.table_bits
    }

    /// Largest raw ADC value, also the input mask
    pub fn adc_mask(&self) -> u64 {
        u64::MAX >> (64 - self.adc_bits)
    }

    /// Mask selecting the interpolation fraction
    pub fn fraction_mask(&self) -> u64 {
        // shift < 64 because table_bits >= 1
        (1u64 << self.shift()) - 1
    }

    /// Divider ratio at a table index
    pub fn ratio(&self, index: usize) -> f64 {
        index as f64 / (1u64 << self.table_bits) as f64
    }

    /// One ADC LSB as a divider ratio, `2^-adc_bits`
    pub fn lsb(&self) -> f64 {
        1.0 / (1u128 << self.adc_bits) as f64
    }

    /// Ratios one ADC LSB from each rail
    ///
    /// Above 53 bits the upper ratio rounds to 1.0; the table builder works
    /// from [`TableSpec::lsb`] directly instead.
    pub fn adc_edge_ratios(&self) -> (f64, f64) {
        let lsb = self.lsb();
        (lsb, 1.0 - lsb)
    }
}

/// Scale a temperature to resolution units.
///
/// Truncates toward zero like an integer cast rather than rounding, so
/// negative temperatures carry a bias of up to one unit towards zero. This
/// keeps tables identical to those generated by earlier tooling.
pub fn quantize(temperature_c: f64, resolution: f64) -> LutResult<i64> {
    let scaled = temperature_c / resolution;
    if !scaled.is_finite() {
        return Err(LutError::domain("temperature", temperature_c));
    }
    if scaled < i64::MIN as f64 || scaled >= i64::MAX as f64 {
        return Err(LutError::ValueOutOfRange { value: scaled });
    }
    Ok(scaled as i64)
}

/// Built lookup table, immutable once constructed
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    spec: TableSpec,
    placement: ThermistorPlacement,
    boundary_policy: BoundaryPolicy,
    valid_range_c: Option<(f64, f64)>,
    entries: Vec<i64>,
}

impl LookupTable {
    /// Sample the model over the divider-ratio domain
    pub fn build(model: &TemperatureModel, divider: &DividerConfig, spec: &TableSpec) -> LutResult<Self> {
        spec.validate()?;
        divider.validate()?;

        let policy = model.boundary_policy();
        if policy == BoundaryPolicy::LinearExtrapolation && spec.table_bits < 2 {
            return Err(LutError::config("table_bits", "must be >= 2 to extrapolate boundary entries"));
        }

        let sample = |ratio: f64| -> LutResult<i64> {
            let resistance = divider.thermistor_resistance(ratio)?;
            quantize(model.temperature_c(resistance)?, spec.resolution)
        };

        let len = spec.table_len();
        let mut entries = Vec::with_capacity(len);
        entries.push(0);
        for index in 1..len - 1 {
            entries.push(sample(spec.ratio(index))?);
        }
        entries.push(0);

        let last = len - 1;
        match policy {
            BoundaryPolicy::AdcEdge => {
                // Both sides of the divider are passed separately so the
                // upper edge stays exact for ADCs wider than an f64 mantissa
                let lsb = spec.lsb();
                let edge = |low: f64, high: f64| -> LutResult<i64> {
                    let resistance = divider.thermistor_resistance_from_fractions(low, high)?;
                    quantize(model.temperature_c(resistance)?, spec.resolution)
                };
                entries[0] = edge(lsb, 1.0 - lsb)?;
                entries[last] = edge(1.0 - lsb, lsb)?;
                log_debug!("Boundary entries evaluated one LSB from the rails: {}, {}", entries[0], entries[last]);
            }
            BoundaryPolicy::LinearExtrapolation => {
                entries[0] = extrapolate(entries[1], entries[2])?;
                entries[last] = extrapolate(entries[last - 1], entries[last - 2])?;
                log_debug!("Boundary entries extrapolated: {}, {}", entries[0], entries[last]);
            }
        }

        let table = Self {
            spec: *spec,
            placement: divider.placement,
            boundary_policy: policy,
            valid_range_c: model.valid_range_c(),
            entries,
        };
        table.log_summary();
        Ok(table)
    }

    #[cfg_attr(not(feature = "log"), allow(unused_variables))]
    fn log_summary(&self) {
        let (min, max) = self.value_range();
        log_debug!(
            "Built {} entries ({} index bits), values {}..={}",
            self.entries.len(),
            self.spec.table_bits,
            min,
            max
        );
        if !self.is_monotonic() {
            log_warn!("Table is not monotonic; interpolation will be inaccurate");
        }
        let outside = self.in_range_flags().filter(|in_range| !in_range).count();
        if outside > 0 {
            log_warn!("{} entries lie outside the sample data temperature range (reduced accuracy)", outside);
        }
    }

    /// Table geometry
    pub fn spec(&self) -> &TableSpec {
        &self.spec
    }

    /// Thermistor placement the table was built for
    pub fn placement(&self) -> ThermistorPlacement {
        self.placement
    }

    /// How the two end entries were produced
    pub fn boundary_policy(&self) -> BoundaryPolicy {
        self.boundary_policy
    }

    /// Quantized temperatures in resolution units
    pub fn entries(&self) -> &[i64] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a built table
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Smallest and largest entry
    pub fn value_range(&self) -> (i64, i64) {
        self.entries
            .iter()
            .fold((i64::MAX, i64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// Entry converted back to °C
    pub fn temperature_c(&self, index: usize) -> Option<f64> {
        self.entries.get(index).map(|&v| v as f64 * self.spec.resolution)
    }

    /// Whether each entry falls inside the measured data range
    ///
    /// Always true for closed-form models.
    pub fn in_range_flags(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.entries.len()).map(move |i| match (self.valid_range_c, self.temperature_c(i)) {
            (Some((lo, hi)), Some(t)) => t >= lo && t <= hi,
            _ => true,
        })
    }

    /// Entries never change direction
    pub fn is_monotonic(&self) -> bool {
        let pairs = || self.entries.windows(2);
        pairs().all(|p| p[0] <= p[1]) || pairs().all(|p| p[0] >= p[1])
    }

    /// Evaluate the generated C function for a raw ADC reading
    ///
    /// Reproduces the emitted integer arithmetic: mask to `adc_bits`, index
    /// with the high bits, one multiply by the low bits, arithmetic shift.
    pub fn interpolate(&self, adc_value: u64) -> i64 {
        let adc = adc_value & self.spec.adc_mask();
        let shift = self.spec.shift();
        let index = (adc >> shift) as usize;
        let p1 = i128::from(self.entries[index]);
        let p2 = i128::from(self.entries[index + 1]);
        let fraction = i128::from(adc & self.spec.fraction_mask());

        // |p2 - p1| < 2^64 and fraction < 2^63, so the product fits in i128
        let value = match self.placement {
            ThermistorPlacement::Top => p1 + (((p2 - p1) * fraction) >> shift),
            ThermistorPlacement::Bottom => p1 - (((p1 - p2) * fraction) >> shift),
        };
        // Lies between p1 and p2, both of which are i64
        value as i64
    }
}

/// `near - (far - near)`, checked
fn extrapolate(near: i64, far: i64) -> LutResult<i64> {
    far.checked_sub(near)
        .and_then(|step| near.checked_sub(step))
        .ok_or(LutError::ValueOutOfRange { value: 2.0 * near as f64 - far as f64 })
}
