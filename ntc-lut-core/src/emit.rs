//! Artifact rendering
//!
//! [`CSource`] renders the table and its interpolation routine as a
//! self-contained C translation unit. The routine needs exactly one integer
//! multiply:
//!
//! ```text
//! p1 = ntc_table[adc >> shift]
//! p2 = ntc_table[(adc >> shift) + 1]
//! top:     p1 + (((p2 - p1) * (adc & fraction_mask)) >> shift)
//! bottom:  p1 - (((p1 - p2) * (adc & fraction_mask)) >> shift)
//! ```
//!
//! The operand order keeps the product non-negative: entries rise with the
//! ADC value when the thermistor is on top and fall when it is on the bottom.
//!
//! [`TableReport`] carries the same information for machine consumption and
//! [`curve_points`] feeds external plotting.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    divider::{DividerConfig, ThermistorPlacement},
    errors::LutResult,
    models::{BoundaryPolicy, FitMethod, SteinhartHartFit, TemperatureModel},
    table::LookupTable,
    width::{SignedWidth, UnsignedWidth},
    VERSION,
};

/// Lines wrap before reaching this column
const LINE_LIMIT: usize = 80;

const INDENT: &str = "    ";

/// Human-readable description of the model, one comment line per entry
pub fn describe_model(model: &TemperatureModel) -> Vec<String> {
    match model {
        TemperatureModel::Beta(beta) => alloc::vec![format!(
            "{} ohms @ {} deg C. Beta: {}.",
            beta.reference_resistance as i64,
            beta.reference_temperature_c as i64,
            beta.beta as i64
        )],
        TemperatureModel::SteinhartHart(sh) => {
            let [a0, a1, a2, a3] = sh.coefficients;
            alloc::vec![
                "Steinhart-Hart coefficients a0, a1, a2, a3:".to_string(),
                format!("  {:e}, {:e}, {:e}, {:e}", a0, a1, a2, a3),
            ]
        }
        TemperatureModel::Manufacturer(fit) => {
            let mut lines = alloc::vec![
                "Table derived from manufacturer-provided temperature/resistance data which is".to_string(),
                format!("interpolated to fit a {} curve.", fit.method().description()),
            ];
            if let Some(regression) = fit.steinhart_hart() {
                lines.extend(fitted_coefficient_lines(fit.method(), regression));
            }
            lines
        }
    }
}

fn fitted_coefficient_lines(method: FitMethod, regression: &SteinhartHartFit) -> Vec<String> {
    let p = &regression.parameters;
    match method {
        FitMethod::SteinhartHart3 => ["A", "B", "C"]
            .iter()
            .zip(p.iter())
            .map(|(name, value)| format!("  {}: {:.6e}", name, value))
            .collect(),
        _ => p
            .iter()
            .enumerate()
            .map(|(i, value)| format!("  A{}: {:.6e}", i, value))
            .collect(),
    }
}

/// Wrap table values into indented lines shorter than [`LINE_LIMIT`]
fn wrap_entries(entries: &[i64]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::from(INDENT);
    for (i, entry) in entries.iter().enumerate() {
        let mut value = entry.to_string();
        if i + 1 != entries.len() {
            value.push_str(", ");
        }
        if line.len() + value.len() < LINE_LIMIT {
            line.push_str(&value);
        } else {
            lines.push(line);
            line = format!("{}{}", INDENT, value);
        }
    }
    lines.push(line);
    lines
}

/// C rendering of a built table
#[derive(Debug, Clone)]
pub struct CSource<'a> {
    table: &'a LookupTable,
    model: &'a TemperatureModel,
    divider: &'a DividerConfig,
    command_line: Option<&'a str>,
    entry_type: SignedWidth,
    adc_type: UnsignedWidth,
}

impl<'a> CSource<'a> {
    /// Select integer widths for the table; fails if no width fits
    pub fn new(table: &'a LookupTable, model: &'a TemperatureModel, divider: &'a DividerConfig) -> LutResult<Self> {
        let (min, max) = table.value_range();
        let entry_type = SignedWidth::select(i128::from(min), i128::from(max))?;
        let adc_type = UnsignedWidth::for_adc_bits(table.spec().adc_bits)?;
        log_debug!("Entry type {}, ADC type {}", entry_type.c_type(), adc_type.c_type());
        Ok(Self { table, model, divider, command_line: None, entry_type, adc_type })
    }

    /// Record the invocation in the header comment
    pub fn with_command_line(mut self, command_line: Option<&'a str>) -> Self {
        self.command_line = command_line;
        self
    }

    /// Type of the table entries
    pub fn entry_type(&self) -> SignedWidth {
        self.entry_type
    }

    /// Type of the ADC argument
    pub fn adc_type(&self) -> UnsignedWidth {
        self.adc_type
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spec = self.table.spec();
        writeln!(f, "#include <stdint.h>")?;
        writeln!(f)?;
        writeln!(f, "/* ADC to temperature lookup table.")?;
        writeln!(f, " * Generated by ntc-lut {}", VERSION)?;
        writeln!(f, " *")?;
        if let Some(command_line) = self.command_line {
            writeln!(f, " * Command:")?;
            writeln!(f, " * {}", command_line)?;
            writeln!(f, " *")?;
        }
        for line in describe_model(self.model) {
            writeln!(f, " * {}", line)?;
        }
        writeln!(f, " * NTC thermistor location: {} side of the voltage divider.", self.divider.placement.as_str())?;
        writeln!(
            f,
            " * {} ohm resistor on opposite side of the voltage divider.",
            self.divider.other_resistance as i64
        )?;
        writeln!(f, " * Input: {} MSBs of the ADC value.", spec.table_bits)?;
        writeln!(f, " * Output: Temperature in units of {} deg C.", spec.resolution)?;
        writeln!(f, " * LSBs of ADC value should be used to interpolate between the nearest points.")?;
        writeln!(f, " */")
    }

    fn write_table(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "const {} ntc_table[{}] = {{", self.entry_type.c_type(), self.table.len())?;
        for line in wrap_entries(self.table.entries()) {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "}};")
    }

    fn write_function(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spec = self.table.spec();
        let shift = spec.shift();
        let ttype = self.entry_type.c_type();
        let fraction_mask = spec.fraction_mask();

        writeln!(f, "/*")?;
        writeln!(f, " * Convert an ADC value into a temperature value.")?;
        writeln!(f, " * The ADC value must be a ratiometric measurement of the NTC voltage divider.")?;
        writeln!(f, " *")?;
        writeln!(f, " * p1 and p2 are the interpolating points just before and after the ADC value.")?;
        writeln!(f, " * The function interpolates between these two points. The resulting code is")?;
        writeln!(f, " * very small and fast. Only one integer multiplication is used.")?;
        writeln!(f, " *")?;
        writeln!(f, " * adc_value: the ADC measurement, {} bits full scale, right justified.", spec.adc_bits)?;
        writeln!(f, " * Returns the temperature in units of {} deg C", spec.resolution)?;
        writeln!(f, " */")?;
        writeln!(f, "{} adc_to_temperature({} adc_value)", ttype, self.adc_type.c_type())?;
        writeln!(f, "{{")?;
        writeln!(f, "  adc_value &= 0x{:X};", spec.adc_mask())?;
        writeln!(f)?;
        writeln!(f, "  /* Estimate the interpolating point before and after the ADC value. */")?;
        writeln!(f, "  {} p1 = ntc_table[ (adc_value >> {})  ];", ttype, shift)?;
        writeln!(f, "  {} p2 = ntc_table[ (adc_value >> {})+1];", ttype, shift)?;
        writeln!(f)?;
        writeln!(f, "  /* Interpolate between both points. */")?;
        match self.table.placement() {
            ThermistorPlacement::Top => {
                writeln!(f, "  return p1 + (((p2-p1) * (adc_value & 0x{:X}))>>{});", fraction_mask, shift)?
            }
            ThermistorPlacement::Bottom => {
                writeln!(f, "  return p1 - (((p1-p2) * (adc_value & 0x{:X}))>>{});", fraction_mask, shift)?
            }
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for CSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;
        self.write_table(f)?;
        writeln!(f)?;
        self.write_function(f)
    }
}

/// Machine-readable summary of a generated table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableReport {
    /// Generator name and version
    pub generator: String,
    /// Model kind
    pub model: String,
    /// Model description as written into the C header
    pub description: Vec<String>,
    /// Regression results for fitted Steinhart-Hart data
    pub fit: Option<SteinhartHartFit>,
    /// Thermistor placement
    pub placement: ThermistorPlacement,
    /// Fixed divider resistor (ohms)
    pub other_resistance: f64,
    /// ADC resolution in bits
    pub adc_bits: u32,
    /// Index bits
    pub table_bits: u32,
    /// Temperature unit (°C)
    pub resolution: f64,
    /// Right shift from ADC value to table index
    pub shift: u32,
    /// Mask applied to the ADC input
    pub adc_mask: u64,
    /// Mask selecting the interpolation fraction
    pub fraction_mask: u64,
    /// Table entry type
    pub entry_type: SignedWidth,
    /// ADC argument type
    pub adc_type: UnsignedWidth,
    /// How the end entries were produced
    pub boundary_policy: BoundaryPolicy,
    /// Quantized temperatures
    pub entries: Vec<i64>,
}

impl TableReport {
    /// Summarize a rendered table
    pub fn new(source: &CSource<'_>) -> Self {
        let spec = source.table.spec();
        let fit = match source.model {
            TemperatureModel::Manufacturer(fit) => fit.steinhart_hart().cloned(),
            _ => None,
        };
        Self {
            generator: format!("ntc-lut {}", VERSION),
            model: source.model.name().to_string(),
            description: describe_model(source.model),
            fit,
            placement: source.table.placement(),
            other_resistance: source.divider.other_resistance,
            adc_bits: spec.adc_bits,
            table_bits: spec.table_bits,
            resolution: spec.resolution,
            shift: spec.shift(),
            adc_mask: spec.adc_mask(),
            fraction_mask: spec.fraction_mask(),
            entry_type: source.entry_type,
            adc_type: source.adc_type,
            boundary_policy: source.table.boundary_policy(),
            entries: source.table.entries().to_vec(),
        }
    }
}

/// One table entry prepared for plotting
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurvePoint {
    /// Table index
    pub index: usize,
    /// Divider ratio at this index
    pub ratio: f64,
    /// Entry converted back to °C
    pub temperature_c: f64,
    /// False where the entry lies outside the measured data
    pub in_range: bool,
}

/// Plot points for every table entry
pub fn curve_points(table: &LookupTable) -> Vec<CurvePoint> {
    table
        .in_range_flags()
        .enumerate()
        .map(|(index, in_range)| CurvePoint {
            index,
            ratio: table.spec().ratio(index),
            temperature_c: table.entries()[index] as f64 * table.spec().resolution,
            in_range,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BetaModel, ManufacturerData, Sample, SteinhartHart};
    use crate::table::TableSpec;

    fn beta_setup(placement: ThermistorPlacement) -> (LookupTable, TemperatureModel, DividerConfig) {
        let model = TemperatureModel::Beta(BetaModel::new(3950.0, 10_000.0, 25.0).unwrap());
        let divider = DividerConfig::new(10_000.0, placement).unwrap();
        let spec = TableSpec::new(12, 8, 0.1).unwrap();
        let table = LookupTable::build(&model, &divider, &spec).unwrap();
        (table, model, divider)
    }

    #[test]
    fn wrapping_keeps_lines_short() {
        let entries: Vec<i64> = (0..100).map(|i| -12_345 + i * 7).collect();
        let lines = wrap_entries(&entries);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() < LINE_LIMIT && l.starts_with(INDENT)));
        let rejoined: String = lines.iter().map(|l| l.trim_start()).collect();
        assert!(rejoined.ends_with("-11652"));
        assert_eq!(rejoined.matches(", ").count(), 99);
    }

    #[test]
    fn single_line_when_short() {
        assert_eq!(wrap_entries(&[1, 2, 3]), alloc::vec!["    1, 2, 3".to_string()]);
    }

    #[test]
    fn beta_header_and_types() {
        let (table, model, divider) = beta_setup(ThermistorPlacement::Bottom);
        let source = CSource::new(&table, &model, &divider).unwrap();
        let text = source.to_string();
        assert!(text.starts_with("#include <stdint.h>\n\n/* ADC to temperature lookup table.\n"));
        assert!(text.contains(" * 10000 ohms @ 25 deg C. Beta: 3950.\n"));
        assert!(text.contains(" * NTC thermistor location: bottom side of the voltage divider.\n"));
        assert!(text.contains(" * 10000 ohm resistor on opposite side of the voltage divider.\n"));
        assert!(text.contains(" * Input: 8 MSBs of the ADC value.\n"));
        assert!(text.contains(" * Output: Temperature in units of 0.1 deg C.\n"));
        assert!(text.contains("const int16_t ntc_table[257] = {\n"));
        assert!(text.contains("int16_t adc_to_temperature(uint16_t adc_value)\n{\n  adc_value &= 0xFFF;\n"));
        assert!(text.contains("  int16_t p1 = ntc_table[ (adc_value >> 4)  ];\n"));
        assert!(text.contains("  int16_t p2 = ntc_table[ (adc_value >> 4)+1];\n"));
        assert!(text.contains("  return p1 - (((p1-p2) * (adc_value & 0xF))>>4);\n}\n"));
        assert!(!text.contains("Command:"));
    }

    #[test]
    fn top_placement_formula() {
        let (table, model, divider) = beta_setup(ThermistorPlacement::Top);
        let text = CSource::new(&table, &model, &divider).unwrap().to_string();
        assert!(text.contains("  return p1 + (((p2-p1) * (adc_value & 0xF))>>4);\n"));
    }

    #[test]
    fn command_line_recorded() {
        let (table, model, divider) = beta_setup(ThermistorPlacement::Bottom);
        let text = CSource::new(&table, &model, &divider)
            .unwrap()
            .with_command_line(Some("ntc-lut-beta --adc_bits 12"))
            .to_string();
        assert!(text.contains(" * Command:\n * ntc-lut-beta --adc_bits 12\n *\n"));
    }

    #[test]
    fn table_body_lists_every_entry() {
        let (table, model, divider) = beta_setup(ThermistorPlacement::Bottom);
        let text = CSource::new(&table, &model, &divider).unwrap().to_string();
        let start = text.find("= {\n").unwrap() + 4;
        let end = text.find("\n};").unwrap();
        let values: Vec<i64> = text[start..end]
            .split(',')
            .map(|v| v.trim().parse().unwrap())
            .collect();
        assert_eq!(values, table.entries());
    }

    #[test]
    fn steinhart_header() {
        let model =
            TemperatureModel::SteinhartHart(SteinhartHart::new([1.1e-3, 2.3e-4, 0.0, 9.0e-8]).unwrap());
        let lines = describe_model(&model);
        assert_eq!(lines[0], "Steinhart-Hart coefficients a0, a1, a2, a3:");
        assert_eq!(lines[1], "  1.1e-3, 2.3e-4, 0e0, 9e-8");
    }

    #[test]
    fn fitted_header_names_coefficients() {
        let samples = (0..17)
            .map(|i| {
                let t = -40.0 + 10.0 * i as f64;
                let r = 10_000.0 * libm::exp(3950.0 * (1.0 / (t + 273.15) - 1.0 / 298.15));
                Sample { temperature_c: t, resistance_ohms: r }
            })
            .collect::<Vec<_>>();
        let three = ManufacturerData::new(samples.clone()).unwrap().fit(FitMethod::SteinhartHart3).unwrap();
        let lines = describe_model(&TemperatureModel::Manufacturer(three));
        assert_eq!(lines[1], "interpolated to fit a 3 parameter Steinhart-Hart curve.");
        assert!(lines[2].starts_with("  A: "));
        assert!(lines[4].starts_with("  C: "));

        let four = ManufacturerData::new(samples.clone()).unwrap().fit(FitMethod::SteinhartHart4).unwrap();
        let lines = describe_model(&TemperatureModel::Manufacturer(four));
        assert_eq!(lines.len(), 6);
        assert!(lines[5].starts_with("  A3: "));

        let cubic = ManufacturerData::new(samples).unwrap().fit(FitMethod::PiecewiseCubic).unwrap();
        let lines = describe_model(&TemperatureModel::Manufacturer(cubic));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "interpolated to fit a piecewise-cubic curve.");
    }

    #[test]
    fn report_matches_source() {
        let (table, model, divider) = beta_setup(ThermistorPlacement::Top);
        let source = CSource::new(&table, &model, &divider).unwrap();
        let report = TableReport::new(&source);
        assert_eq!(report.entries.len(), 257);
        assert_eq!(report.shift, 4);
        assert_eq!(report.adc_mask, 0xFFF);
        assert_eq!(report.entry_type, SignedWidth::I16);
        assert_eq!(report.adc_type, UnsignedWidth::U16);
        assert_eq!(report.boundary_policy, BoundaryPolicy::AdcEdge);
        assert!(report.fit.is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn report_serializes_readable_names() {
        let (table, model, divider) = beta_setup(ThermistorPlacement::Top);
        let report = TableReport::new(&CSource::new(&table, &model, &divider).unwrap());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["placement"], "top");
        assert_eq!(json["entry_type"], "i16");
        assert_eq!(json["boundary_policy"], "adc-edge");
    }

    #[test]
    fn curve_points_follow_entries() {
        let (table, _, _) = beta_setup(ThermistorPlacement::Bottom);
        let points = curve_points(&table);
        assert_eq!(points.len(), table.len());
        assert_eq!(points[128].ratio, 0.5);
        assert!((points[128].temperature_c - 25.0).abs() <= 0.1 + 1e-9);
        assert!(points.iter().all(|p| p.in_range));
    }
}
