//! Artifact and plot writers

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use ntc_lut_core::{CurvePoint, LutGenerator, Sample, TemperatureModel};
use serde::Serialize;

/// Plot data: the table curve plus the measured samples behind it
#[derive(Debug, Serialize)]
pub struct PlotData<'a> {
    /// Model kind
    pub model: &'static str,
    /// Temperature unit (°C)
    pub resolution: f64,
    /// One point per table entry
    pub points: Vec<CurvePoint>,
    /// Manufacturer samples, empty for coefficient models
    pub samples: &'a [Sample],
}

impl<'a> PlotData<'a> {
    /// Collect plot data from a built generator
    pub fn new(generator: &'a LutGenerator) -> Result<Self> {
        let samples = match generator.model() {
            TemperatureModel::Manufacturer(fit) => fit.samples(),
            _ => &[][..],
        };
        Ok(Self {
            model: generator.model().name(),
            resolution: generator.config().table.resolution,
            points: generator.curve_points()?,
            samples,
        })
    }
}

/// Write `text` to `path`, or to stdout when no path is given
pub fn write_artifact(text: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => fs::write(path, text).with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes()).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to write to stdout")
        }
    }
}

/// Render plot data as pretty JSON
pub fn render_plot(plot: &PlotData<'_>) -> Result<String> {
    let mut json = serde_json::to_string_pretty(plot).context("Failed to serialize plot data")?;
    json.push('\n');
    Ok(json)
}

/// Write rendered plot data to `path`
pub fn write_plot(path: &Path, json: &str) -> Result<()> {
    fs::write(path, json).with_context(|| format!("Failed to write plot data to {}", path.display()))
}
