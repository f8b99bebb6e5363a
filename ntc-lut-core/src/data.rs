//! Tabular manufacturer data
//!
//! Plain text, one `<temperature °C> <resistance Ω>` pair per line separated
//! by whitespace. Blank lines and lines starting with `#` are skipped;
//! anything after the second field is ignored.
//!
//! ```text
//! # B57861S0103 (10k @ 25 °C)
//! -40 205200.0
//! -35 154800.0
//! ```

use alloc::string::ToString;
use alloc::vec::Vec;

use crate::{
    errors::{LutError, LutResult},
    models::Sample,
};

/// Parse tabular data. The first unparsable line aborts with
/// [`LutError::MalformedLine`] carrying its 1-based number.
pub fn parse_samples(text: &str) -> LutResult<Vec<Sample>> {
    let mut samples = Vec::new();
    for (number, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        samples.push(parse_line(line).ok_or_else(|| LutError::MalformedLine {
            line: number + 1,
            content: line.to_string(),
        })?);
    }
    log_debug!("Read {} samples", samples.len());
    Ok(samples)
}

fn parse_line(line: &str) -> Option<Sample> {
    let mut fields = line.split_whitespace();
    let temperature_c = fields.next()?.parse().ok()?;
    let resistance_ohms = fields.next()?.parse().ok()?;
    Some(Sample { temperature_c, resistance_ohms })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# header\n\n-40 205200.0\n   \n  # indented comment\n25\t10000\n";
        let samples = parse_samples(text).unwrap();
        assert_eq!(
            samples,
            [
                Sample { temperature_c: -40.0, resistance_ohms: 205_200.0 },
                Sample { temperature_c: 25.0, resistance_ohms: 10_000.0 },
            ]
        );
    }

    #[test]
    fn malformed_line_reports_number_and_content() {
        let text = "# data\n0 33620.6\nabc xyz\n25 10000\n";
        assert_eq!(
            parse_samples(text),
            Err(LutError::MalformedLine { line: 3, content: "abc xyz".into() })
        );
    }

    #[test]
    fn missing_field_is_malformed() {
        let err = parse_samples("25\n").unwrap_err();
        assert!(matches!(err, LutError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn extra_fields_ignored() {
        let samples = parse_samples("25 10000 1%\n").unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].resistance_ohms, 10_000.0);
    }

    #[test]
    fn crlf_line_endings() {
        let samples = parse_samples("0 33620.6\r\n25 10000\r\n").unwrap();
        assert_eq!(samples.len(), 2);
    }
}
