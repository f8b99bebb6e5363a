//! ADC lookup table from a thermistor Beta coefficient

fn main() {
    ntc_lut_cli::main_with(ntc_lut_cli::Tool::Beta);
}
