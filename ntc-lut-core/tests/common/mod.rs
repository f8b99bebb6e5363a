//! Shared fixtures for integration tests
//!
//! Provides a Beta-3950 10 kΩ datasheet tabulation and ready-made generator
//! configurations for the common divider layouts.

#![allow(dead_code)]

use ntc_lut_core::{
    BetaModel, DividerConfig, GeneratorConfig, ManufacturerData, ModelSource, Sample, SteinhartHart,
    TableSpec, ThermistorPlacement,
};

/// Beta-3950 10 kΩ thermistor, -40..125 °C in 5 °C steps
pub const B3950_TABLE: &[(f64, f64)] = &[
    (-40.0, 401_859.7),
    (-35.0, 281_576.8),
    (-30.0, 200_203.9),
    (-25.0, 144_316.9),
    (-20.0, 105_384.7),
    (-15.0, 77_898.1),
    (-10.0, 58_245.7),
    (-5.0, 44_026.0),
    (0.0, 33_620.6),
    (5.0, 25_924.6),
    (10.0, 20_174.6),
    (15.0, 15_837.1),
    (20.0, 12_535.3),
    (25.0, 10_000.0),
    (30.0, 8_037.1),
    (35.0, 6_505.5),
    (40.0, 5_301.5),
    (45.0, 4_348.1),
    (50.0, 3_588.2),
    (55.0, 2_978.4),
    (60.0, 2_486.2),
    (65.0, 2_086.4),
    (70.0, 1_759.8),
    (75.0, 1_491.7),
    (80.0, 1_270.3),
    (85.0, 1_086.7),
    (90.0, 933.6),
    (95.0, 805.4),
    (100.0, 697.5),
    (105.0, 606.4),
    (110.0, 529.1),
    (115.0, 463.3),
    (120.0, 407.1),
    (125.0, 358.8),
];

/// The fixture as samples
pub fn b3950_samples() -> Vec<Sample> {
    B3950_TABLE
        .iter()
        .map(|&(temperature_c, resistance_ohms)| Sample { temperature_c, resistance_ohms })
        .collect()
}

/// The fixture in the tabular text format
pub fn b3950_text() -> String {
    let mut text = String::from("# Beta 3950, 10k @ 25 C\n");
    for (t, r) in B3950_TABLE {
        text.push_str(&format!("{} {}\n", t, r));
    }
    text
}

pub fn b3950_data() -> ManufacturerData {
    ManufacturerData::new(b3950_samples()).expect("fixture is valid")
}

pub fn beta_source() -> ModelSource {
    ModelSource::Beta(BetaModel::new(3950.0, 10_000.0, 25.0).expect("valid beta"))
}

/// Widely published 10 kΩ coefficients
pub fn steinhart_source() -> ModelSource {
    ModelSource::SteinhartHart(
        SteinhartHart::three_term(1.009249522e-3, 2.378405444e-4, 2.019202697e-7).expect("valid coefficients"),
    )
}

pub fn config(adc_bits: u32, table_bits: u32, resolution: f64, placement: ThermistorPlacement) -> GeneratorConfig {
    GeneratorConfig {
        table: TableSpec::new(adc_bits, table_bits, resolution).expect("valid table spec"),
        divider: DividerConfig::new(10_000.0, placement).expect("valid divider"),
    }
}
