//! Command-line parsing shared by the three generators
//!
//! Every tool accepts:
//!   --adc_bits <N>        Bits of ADC resolution
//!   --table_bits <N>      Index bits; table length is 2^N + 1
//!   --resolution <DEG>    Temperature unit, typically 0.1 or 0.01
//!   -r <OHMS>             Fixed resistor on the other side of the divider
//!   -t, --top             Thermistor between VREF and the ADC input
//!   -b, --bottom          Thermistor between the ADC input and ground
//!   -o, --output <PATH>   Write the artifact here instead of stdout
//!   --plot <PATH>         Write plot data as JSON
//!   --json                Emit a JSON report instead of C
//!   -v, --verbose         Debug logging
//!   -q, --quiet           Errors only
//!   -h, --help            Print usage
//!
//! Underscore and dash spellings of long options are interchangeable.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use log::LevelFilter;
use ntc_lut_core::{DividerConfig, FitMethod, GeneratorConfig, TableSpec, ThermistorPlacement};

/// Which generator is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Beta coefficient and reference point
    Beta,
    /// Four Steinhart-Hart coefficients
    Steinhart,
    /// Manufacturer data file
    Tabular,
}

impl Tool {
    /// Binary name
    pub fn name(self) -> &'static str {
        match self {
            Self::Beta => "ntc-lut-beta",
            Self::Steinhart => "ntc-lut-steinhart",
            Self::Tabular => "ntc-lut-tabular",
        }
    }

    /// Full usage text
    pub fn usage(self) -> String {
        let model_options = match self {
            Self::Beta => {
                "  -B, --beta <K>        Thermistor beta value\n\
                 \x20 -R <OHMS>             Thermistor reference resistance\n\
                 \x20 -T <DEG>              Thermistor reference temperature (C)\n"
            }
            Self::Steinhart => {
                "  -S, --steinhart <a0> <a1> <a2> <a3>\n\
                 \x20                       Steinhart-Hart coefficients; for the 3-term\n\
                 \x20                       form (A, B, C) pass A B 0 C\n"
            }
            Self::Tabular => {
                "  -f <FILE>             Temperature/resistance pairs, one per line\n\
                 \x20 --interpolation <M>   piecewise-cubic (default) or steinhart\n\
                 \x20 --steinhart <3|4>     Fit a 3 or 4 term Steinhart-Hart curve\n"
            }
        };
        format!(
            "Usage: {} [options]\n\n\
             Generate a C lookup table converting ratiometric ADC readings of an NTC\n\
             thermistor divider directly to temperature.\n\n\
             Model options:\n{}\n\
             Table options:\n\
             \x20 --adc_bits <N>        Bits of ADC resolution\n\
             \x20 --table_bits <N>      Index bits; table length is 2^N + 1\n\
             \x20 --resolution <DEG>    Temperature unit (C), typically 0.01\n\
             \x20 -r <OHMS>             Other resistor in the divider\n\
             \x20 -t, --top             Thermistor on the top side of the divider\n\
             \x20 -b, --bottom          Thermistor on the bottom side of the divider\n\n\
             Output options:\n\
             \x20 -o, --output <PATH>   Output file (default: stdout)\n\
             \x20 --plot <PATH>         Write plot data as JSON\n\
             \x20 --json                Write a JSON report instead of C code\n\
             \x20 -v, --verbose         Debug logging\n\
             \x20 -q, --quiet           Only log errors\n\
             \x20 -h, --help            Print this help\n",
            self.name(),
            model_options
        )
    }
}

/// Model parameters as given on the command line
#[derive(Debug, Clone, PartialEq)]
pub enum ModelArgs {
    /// `-B`, `-R`, `-T`
    Beta {
        /// Beta coefficient
        beta: f64,
        /// Reference resistance (ohms)
        reference_resistance: f64,
        /// Reference temperature (°C)
        reference_temperature_c: f64,
    },
    /// `-S a0 a1 a2 a3`
    Steinhart {
        /// Coefficients as given; the count is checked by the model
        coefficients: Vec<f64>,
    },
    /// `-f FILE` with the fit selection
    Tabular {
        /// Data file
        input: PathBuf,
        /// Fit method
        method: FitMethod,
    },
}

/// Where and how to write results
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputArgs {
    /// Artifact path; stdout if absent
    pub path: Option<PathBuf>,
    /// Plot data path
    pub plot: Option<PathBuf>,
    /// JSON report instead of C
    pub json: bool,
}

/// A fully parsed and validated invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Table and divider configuration
    pub config: GeneratorConfig,
    /// Model parameters
    pub model: ModelArgs,
    /// Output selection
    pub output: OutputArgs,
    /// Logging threshold
    pub log_level: LevelFilter,
    /// Command line as typed, recorded in the artifact header
    pub command_line: String,
}

/// Result of parsing
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// Generate a table
    Run(Invocation),
    /// `--help` was given
    Help,
}

#[derive(Default)]
struct Raw {
    adc_bits: Option<u32>,
    table_bits: Option<u32>,
    resolution: Option<f64>,
    other_resistance: Option<f64>,
    placement: Option<ThermistorPlacement>,
    output: OutputArgs,
    verbose: bool,
    quiet: bool,
    beta: Option<f64>,
    reference_resistance: Option<f64>,
    reference_temperature: Option<f64>,
    coefficients: Option<Vec<f64>>,
    input: Option<PathBuf>,
    interpolation: Option<String>,
    steinhart_terms: Option<u32>,
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i).map(String::as_str).ok_or_else(|| anyhow!("{} requires a value", flag))
}

fn parse_value<T: FromStr>(args: &[String], i: &mut usize, flag: &str) -> Result<T> {
    let raw = next_value(args, i, flag)?;
    raw.parse().map_err(|_| anyhow!("Invalid value for {}: {}", flag, raw))
}

fn set_placement(raw: &mut Raw, placement: ThermistorPlacement) -> Result<()> {
    match raw.placement {
        Some(existing) if existing != placement => bail!("-t/--top and -b/--bottom are mutually exclusive"),
        _ => {
            raw.placement = Some(placement);
            Ok(())
        }
    }
}

fn required<T>(value: Option<T>, flag: &str) -> Result<T> {
    value.ok_or_else(|| anyhow!("{} is required", flag))
}

/// Parse `args` (program name first) for the given tool
pub fn parse(tool: Tool, args: &[String]) -> Result<Parsed> {
    let mut raw = Raw::default();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match (flag, tool) {
            ("-h" | "--help", _) => return Ok(Parsed::Help),
            ("--adc_bits" | "--adc-bits", _) => raw.adc_bits = Some(parse_value(args, &mut i, flag)?),
            ("--table_bits" | "--table-bits", _) => raw.table_bits = Some(parse_value(args, &mut i, flag)?),
            ("--resolution", _) => raw.resolution = Some(parse_value(args, &mut i, flag)?),
            ("-r", _) => raw.other_resistance = Some(parse_value(args, &mut i, flag)?),
            ("-t" | "--top", _) => set_placement(&mut raw, ThermistorPlacement::Top)?,
            ("-b" | "--bottom", _) => set_placement(&mut raw, ThermistorPlacement::Bottom)?,
            ("-o" | "--output", _) => raw.output.path = Some(PathBuf::from(next_value(args, &mut i, flag)?)),
            ("--plot", _) => raw.output.plot = Some(PathBuf::from(next_value(args, &mut i, flag)?)),
            ("--json", _) => raw.output.json = true,
            ("-v" | "--verbose", _) => raw.verbose = true,
            ("-q" | "--quiet", _) => raw.quiet = true,

            ("-B" | "--beta", Tool::Beta) => raw.beta = Some(parse_value(args, &mut i, flag)?),
            ("-R", Tool::Beta) => raw.reference_resistance = Some(parse_value(args, &mut i, flag)?),
            ("-T", Tool::Beta) => raw.reference_temperature = Some(parse_value(args, &mut i, flag)?),

            ("-S" | "--steinhart", Tool::Steinhart) => {
                // Coefficients may be negative, so collect until a token is not a number
                let mut coefficients = Vec::new();
                while let Some(value) = args.get(i + 1).and_then(|a| a.parse::<f64>().ok()) {
                    coefficients.push(value);
                    i += 1;
                }
                if coefficients.is_empty() {
                    bail!("{} requires 4 coefficients", flag);
                }
                raw.coefficients = Some(coefficients);
            }

            ("-f", Tool::Tabular) => raw.input = Some(PathBuf::from(next_value(args, &mut i, flag)?)),
            ("--interpolation", Tool::Tabular) => {
                raw.interpolation = Some(next_value(args, &mut i, flag)?.to_string())
            }
            ("--steinhart", Tool::Tabular) => raw.steinhart_terms = Some(parse_value(args, &mut i, flag)?),

            _ => bail!("Unknown argument: {}", flag),
        }
        i += 1;
    }

    if raw.verbose && raw.quiet {
        bail!("-v/--verbose and -q/--quiet are mutually exclusive");
    }
    let log_level = match (raw.verbose, raw.quiet) {
        (true, _) => LevelFilter::Debug,
        (_, true) => LevelFilter::Error,
        _ => LevelFilter::Info,
    };

    let table = TableSpec::new(
        required(raw.adc_bits, "--adc_bits")?,
        required(raw.table_bits, "--table_bits")?,
        required(raw.resolution, "--resolution")?,
    )?;
    let divider = DividerConfig::new(
        required(raw.other_resistance, "-r")?,
        required(raw.placement, "one of -t/--top or -b/--bottom")?,
    )?;

    let model = match tool {
        Tool::Beta => ModelArgs::Beta {
            beta: required(raw.beta, "-B/--beta")?,
            reference_resistance: required(raw.reference_resistance, "-R")?,
            reference_temperature_c: required(raw.reference_temperature, "-T")?,
        },
        Tool::Steinhart => ModelArgs::Steinhart { coefficients: required(raw.coefficients, "-S/--steinhart")? },
        Tool::Tabular => {
            let selector = match (&raw.interpolation, raw.steinhart_terms) {
                (Some(method), _) => method.as_str(),
                (None, Some(_)) => "steinhart",
                (None, None) => "piecewise-cubic",
            };
            ModelArgs::Tabular {
                input: required(raw.input, "-f")?,
                method: FitMethod::from_selector(selector, raw.steinhart_terms)?,
            }
        }
    };

    Ok(Parsed::Run(Invocation {
        config: GeneratorConfig { table, divider },
        model,
        output: raw.output,
        log_level,
        command_line: args.join(" "),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn value_helpers() {
        let args = argv("tool --adc_bits 12 --resolution");
        let mut i = 1;
        assert_eq!(parse_value::<u32>(&args, &mut i, "--adc_bits").unwrap(), 12);
        assert_eq!(i, 2);
        let mut i = 3;
        assert_eq!(next_value(&args, &mut i, "--resolution").unwrap_err().to_string(), "--resolution requires a value");
    }

    #[test]
    fn placement_conflict() {
        let mut raw = Raw::default();
        set_placement(&mut raw, ThermistorPlacement::Top).unwrap();
        set_placement(&mut raw, ThermistorPlacement::Top).unwrap();
        assert!(set_placement(&mut raw, ThermistorPlacement::Bottom).is_err());
    }

    #[test]
    fn usage_mentions_model_flags() {
        assert!(Tool::Beta.usage().contains("-B, --beta"));
        assert!(Tool::Steinhart.usage().contains("-S, --steinhart"));
        assert!(Tool::Tabular.usage().contains("--interpolation"));
        assert!(Tool::Tabular.usage().starts_with("Usage: ntc-lut-tabular [options]"));
    }
}
