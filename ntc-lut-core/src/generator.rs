//! End-to-end table generation
//!
//! ```text
//! GeneratorConfig + ModelSource
//!        │ validate, fit once
//!        ▼
//!   LutGenerator ──build()──▶ LookupTable ──emit_c()──▶ C source
//!                                        └──report()──▶ TableReport
//! ```
//!
//! Configuration is checked once in [`LutGenerator::new`] and never changes
//! afterwards. Emission before [`LutGenerator::build`] fails with
//! [`LutError::TableNotBuilt`].

use alloc::string::{String, ToString};
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    divider::DividerConfig,
    emit::{curve_points, CSource, CurvePoint, TableReport},
    errors::{LutError, LutResult},
    models::{BetaModel, FitMethod, ManufacturerData, SteinhartHart, TemperatureModel},
    table::{LookupTable, TableSpec},
};

/// Table geometry and divider wiring
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeneratorConfig {
    /// Table geometry
    pub table: TableSpec,
    /// Divider wiring
    pub divider: DividerConfig,
}

impl GeneratorConfig {
    /// Validate all fields
    pub fn validate(&self) -> LutResult<()> {
        self.table.validate()?;
        self.divider.validate()
    }
}

/// Where the resistance/temperature characteristic comes from
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ModelSource {
    /// Beta coefficient and reference point
    Beta(BetaModel),
    /// Steinhart-Hart coefficients
    SteinhartHart(SteinhartHart),
    /// Manufacturer samples and the fit to apply to them
    Tabular {
        /// Raw samples
        data: ManufacturerData,
        /// Fit method
        method: FitMethod,
    },
}

impl ModelSource {
    /// Validate and, for tabular data, run the one-time fit
    pub fn into_model(self) -> LutResult<TemperatureModel> {
        match self {
            Self::Beta(beta) => {
                beta.validate()?;
                Ok(TemperatureModel::Beta(beta))
            }
            Self::SteinhartHart(sh) => Ok(TemperatureModel::SteinhartHart(SteinhartHart::new(sh.coefficients)?)),
            Self::Tabular { data, method } => {
                // Re-check in case the samples were deserialized
                let data = ManufacturerData::new(data.samples().to_vec())?;
                Ok(TemperatureModel::Manufacturer(data.fit(method)?))
            }
        }
    }
}

/// Builds one table from one validated configuration
#[derive(Debug, Clone)]
pub struct LutGenerator {
    config: GeneratorConfig,
    model: TemperatureModel,
    command_line: Option<String>,
    table: Option<LookupTable>,
}

impl LutGenerator {
    /// Validate the configuration and prepare the model
    pub fn new(config: GeneratorConfig, source: ModelSource) -> LutResult<Self> {
        config.validate()?;
        let model = source.into_model()?;
        Ok(Self { config, model, command_line: None, table: None })
    }

    /// Record the invocation in the generated header
    pub fn with_command_line(mut self, command_line: impl Into<String>) -> Self {
        self.command_line = Some(command_line.into());
        self
    }

    /// Validated configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Prepared model
    pub fn model(&self) -> &TemperatureModel {
        &self.model
    }

    /// Build the table. Later calls return the table built first.
    pub fn build(&mut self) -> LutResult<&LookupTable> {
        if self.table.is_none() {
            let table = LookupTable::build(&self.model, &self.config.divider, &self.config.table)?;
            self.table = Some(table);
        }
        self.table.as_ref().ok_or(LutError::TableNotBuilt)
    }

    /// Built table, if any
    pub fn table(&self) -> Option<&LookupTable> {
        self.table.as_ref()
    }

    fn source(&self) -> LutResult<CSource<'_>> {
        let table = self.table.as_ref().ok_or(LutError::TableNotBuilt)?;
        Ok(CSource::new(table, &self.model, &self.config.divider)?.with_command_line(self.command_line.as_deref()))
    }

    /// Render the C artifact
    pub fn emit_c(&self) -> LutResult<String> {
        Ok(self.source()?.to_string())
    }

    /// Machine-readable summary
    pub fn report(&self) -> LutResult<TableReport> {
        Ok(TableReport::new(&self.source()?))
    }

    /// Plot points for every entry
    pub fn curve_points(&self) -> LutResult<Vec<CurvePoint>> {
        self.table.as_ref().map(curve_points).ok_or(LutError::TableNotBuilt)
    }
}
