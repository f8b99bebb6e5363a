//! Integer width selection for the emitted C types
//!
//! Table entries get the narrowest signed `intN_t` holding every value; the
//! ADC argument gets the narrowest `uintN_t` holding `2^adc_bits - 1`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::{LutError, LutResult};

/// Signed C integer type for table entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SignedWidth {
    /// `int8_t`
    I8,
    /// `int16_t`
    I16,
    /// `int32_t`
    I32,
    /// `int64_t`
    I64,
}

impl SignedWidth {
    /// All widths, narrowest first
    pub const ALL: [Self; 4] = [Self::I8, Self::I16, Self::I32, Self::I64];

    /// Narrowest width containing `[min, max]`
    pub fn select(min: i128, max: i128) -> LutResult<Self> {
        let widest = Self::I64;
        let offending = if widest.contains(max) { min } else { max };
        Self::ALL
            .iter()
            .copied()
            .find(|w| w.contains(min) && w.contains(max))
            .ok_or(LutError::ValueOutOfRange { value: offending as f64 })
    }

    /// Bit count
    pub fn bits(self) -> u32 {
        match self {
            Self::I8 => 8,
            Self::I16 => 16,
            Self::I32 => 32,
            Self::I64 => 64,
        }
    }

    /// C type name
    pub fn c_type(self) -> &'static str {
        match self {
            Self::I8 => "int8_t",
            Self::I16 => "int16_t",
            Self::I32 => "int32_t",
            Self::I64 => "int64_t",
        }
    }

    /// Whether `value` is representable
    pub fn contains(self, value: i128) -> bool {
        let half = 1i128 << (self.bits() - 1);
        value >= -half && value < half
    }

    /// Next narrower width, if any
    pub fn narrower(self) -> Option<Self> {
        match self {
            Self::I8 => None,
            Self::I16 => Some(Self::I8),
            Self::I32 => Some(Self::I16),
            Self::I64 => Some(Self::I32),
        }
    }
}

/// Unsigned C integer type for raw ADC values
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UnsignedWidth {
    /// `uint8_t`
    U8,
    /// `uint16_t`
    U16,
    /// `uint32_t`
    U32,
    /// `uint64_t`
    U64,
}

impl UnsignedWidth {
    /// All widths, narrowest first
    pub const ALL: [Self; 4] = [Self::U8, Self::U16, Self::U32, Self::U64];

    /// Narrowest width containing `max`
    pub fn select(max: u128) -> Option<Self> {
        Self::ALL.iter().copied().find(|w| w.contains(max))
    }

    /// Narrowest width holding every `adc_bits` reading
    pub fn for_adc_bits(adc_bits: u32) -> LutResult<Self> {
        if adc_bits > 64 {
            return Err(LutError::AdcWidthOutOfRange { bits: adc_bits });
        }
        Self::select((1u128 << adc_bits) - 1).ok_or(LutError::AdcWidthOutOfRange { bits: adc_bits })
    }

    /// Bit count
    pub fn bits(self) -> u32 {
        match self {
            Self::U8 => 8,
            Self::U16 => 16,
            Self::U32 => 32,
            Self::U64 => 64,
        }
    }

    /// C type name
    pub fn c_type(self) -> &'static str {
        match self {
            Self::U8 => "uint8_t",
            Self::U16 => "uint16_t",
            Self::U32 => "uint32_t",
            Self::U64 => "uint64_t",
        }
    }

    /// Whether `value` is representable
    pub fn contains(self, value: u128) -> bool {
        value < 1u128 << self.bits()
    }

    /// Next narrower width, if any
    pub fn narrower(self) -> Option<Self> {
        match self {
            Self::U8 => None,
            Self::U16 => Some(Self::U8),
            Self::U32 => Some(Self::U16),
            Self::U64 => Some(Self::U32),
        }
    }
}
