//! ADC lookup table from Steinhart-Hart coefficients

fn main() {
    ntc_lut_cli::main_with(ntc_lut_cli::Tool::Steinhart);
}
