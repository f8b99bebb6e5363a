//! Command-line front ends for `ntc-lut-core`
//!
//! Three binaries share this library and differ only in how the thermistor is
//! characterized:
//! - `ntc-lut-beta`: Beta coefficient and reference point
//! - `ntc-lut-steinhart`: four Steinhart-Hart coefficients
//! - `ntc-lut-tabular`: a manufacturer temperature/resistance file
//!
//! Nothing is written until the table has been generated successfully.

pub mod args;
pub mod logger;
pub mod output;

use std::fs;
use std::process;

use anyhow::{Context, Result};
use log::{debug, info};
use ntc_lut_core::{
    parse_samples, BetaModel, LutGenerator, ManufacturerData, ModelSource, ResistanceToTemperature,
    SteinhartHart, TemperatureModel,
};

pub use args::{Invocation, ModelArgs, OutputArgs, Parsed, Tool};

use output::PlotData;

/// Resistance at which fitted curves are spot-checked
const CHECK_RESISTANCE: f64 = 10_000.0;

impl ModelArgs {
    /// Build the model source, reading the data file for tabular input
    pub fn into_source(self) -> Result<ModelSource> {
        Ok(match self {
            Self::Beta { beta, reference_resistance, reference_temperature_c } => {
                ModelSource::Beta(BetaModel::new(beta, reference_resistance, reference_temperature_c)?)
            }
            Self::Steinhart { coefficients } => ModelSource::SteinhartHart(SteinhartHart::from_slice(&coefficients)?),
            Self::Tabular { input, method } => {
                let text = fs::read_to_string(&input)
                    .with_context(|| format!("Failed to read {}", input.display()))?;
                let samples = parse_samples(&text).with_context(|| format!("In {}", input.display()))?;
                debug!("Read {} samples from {}", samples.len(), input.display());
                ModelSource::Tabular { data: ManufacturerData::new(samples)?, method }
            }
        })
    }
}

fn log_fit(model: &TemperatureModel) {
    let fit = match model {
        TemperatureModel::Manufacturer(fit) => fit,
        _ => return,
    };
    info!("Fitted {} curve to {} samples", fit.method().description(), fit.samples().len());

    if let Some(regression) = fit.steinhart_hart() {
        let names: &[&str] = if regression.parameters.len() == 3 { &["A", "B", "C"] } else { &["a0", "a1", "a2", "a3"] };
        for ((name, value), error) in names.iter().zip(&regression.parameters).zip(&regression.standard_errors) {
            info!("  {} = {:.6e} (standard error {:.3e})", name, value, error);
        }
        debug!(
            "Converged after {} iterations, residual sum of squares {:.3e} K^2",
            regression.iterations, regression.residual_sum_squares
        );
    }

    match fit.temperature_c(CHECK_RESISTANCE) {
        Ok(t) => info!("Temperature at {} ohms: {:.3} deg C", CHECK_RESISTANCE, t),
        Err(e) => debug!("No temperature at {} ohms: {}", CHECK_RESISTANCE, e),
    }
}

/// Run one tool invocation; `args` starts with the program name
pub fn run(tool: Tool, args: &[String]) -> Result<()> {
    let invocation = match args::parse(tool, args)? {
        Parsed::Help => {
            print!("{}", tool.usage());
            return Ok(());
        }
        Parsed::Run(invocation) => invocation,
    };
    logger::init(invocation.log_level);

    let Invocation { config, model, output, command_line, .. } = invocation;
    let mut generator = LutGenerator::new(config, model.into_source()?)?.with_command_line(command_line);
    log_fit(generator.model());

    let table = generator.build()?;
    info!("Generated {} entries for a {}-bit ADC", table.len(), config.table.adc_bits);

    let text = if output.json {
        let mut json = serde_json::to_string_pretty(&generator.report()?).context("Failed to serialize report")?;
        json.push('\n');
        json
    } else {
        generator.emit_c()?
    };

    let plot = match &output.plot {
        Some(path) => Some((path, output::render_plot(&PlotData::new(&generator)?)?)),
        None => None,
    };

    // Artifact before plot: a failed artifact write must leave nothing behind
    output::write_artifact(&text, output.path.as_deref())?;
    if let Some(path) = &output.path {
        info!("Wrote {}", path.display());
    }
    if let Some((path, json)) = plot {
        output::write_plot(path, &json)?;
        info!("Wrote plot data to {}", path.display());
    }
    Ok(())
}

/// Binary entry point: report failures on stderr and exit non-zero
pub fn main_with(tool: Tool) {
    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(tool, &args) {
        eprintln!("Error: {:#}", e);
        eprintln!();
        eprintln!("Run `{} --help` for usage", tool.name());
        process::exit(1);
    }
}
