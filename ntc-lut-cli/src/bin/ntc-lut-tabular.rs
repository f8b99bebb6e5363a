//! ADC lookup table from manufacturer temperature/resistance data

fn main() {
    ntc_lut_cli::main_with(ntc_lut_cli::Tool::Tabular);
}
