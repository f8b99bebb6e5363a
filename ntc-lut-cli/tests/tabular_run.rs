//! Whole-tool runs against files on disk

use std::fs;

use ntc_lut_cli::{run, Tool};
use tempfile::TempDir;

const DATA: &str = "\
# Beta 3950, 10k @ 25 C
-40 401859.7
-30 200203.9
-20 105384.7
-10 58245.7
0 33620.6
10 20174.6
20 12535.3
25 10000.0
30 8037.1
40 5301.5
50 3588.2
60 2486.2
70 1759.8
80 1270.3
90 933.6
100 697.5
110 529.1
125 358.8
";

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_tabular_writes_c_and_plot() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("b3950.txt");
    let out = dir.path().join("ntc_table.c");
    let plot = dir.path().join("plot.json");
    fs::write(&data, DATA).unwrap();

    run(
        Tool::Tabular,
        &argv(&[
            "ntc-lut-tabular",
            "-f",
            data.to_str().unwrap(),
            "--steinhart",
            "3",
            "--adc_bits",
            "12",
            "--table_bits",
            "8",
            "--resolution",
            "0.1",
            "-r",
            "10000",
            "-b",
            "-q",
            "-o",
            out.to_str().unwrap(),
            "--plot",
            plot.to_str().unwrap(),
        ]),
    )
    .unwrap();

    let code = fs::read_to_string(&out).unwrap();
    assert!(code.starts_with("#include <stdint.h>\n"));
    assert!(code.contains("interpolated to fit a 3 parameter Steinhart-Hart curve."));
    assert!(code.contains("--steinhart 3"));
    assert!(code.contains("adc_value &= 0xFFF;"));

    let plot: serde_json::Value = serde_json::from_str(&fs::read_to_string(&plot).unwrap()).unwrap();
    assert_eq!(plot["model"], "manufacturer");
    assert_eq!(plot["points"].as_array().unwrap().len(), 257);
    assert_eq!(plot["samples"].as_array().unwrap().len(), 18);
    assert_eq!(plot["points"][0]["in_range"], false);
}

#[test]
fn test_json_report() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("report.json");

    run(
        Tool::Beta,
        &argv(&[
            "ntc-lut-beta",
            "-B",
            "3950",
            "-R",
            "10000",
            "-T",
            "25",
            "--adc_bits",
            "10",
            "--table_bits",
            "6",
            "--resolution",
            "0.01",
            "-r",
            "10000",
            "-t",
            "-q",
            "--json",
            "-o",
            out.to_str().unwrap(),
        ]),
    )
    .unwrap();

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(report["model"], "beta");
    assert_eq!(report["placement"], "top");
    assert_eq!(report["shift"], 4);
    assert_eq!(report["entries"].as_array().unwrap().len(), 65);
    assert_eq!(report["boundary_policy"], "adc-edge");
}

#[test]
fn test_nothing_written_on_failure() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("bad.txt");
    let out = dir.path().join("ntc_table.c");
    fs::write(&data, "0 33620.6\n25 ten-thousand\n").unwrap();

    let err = run(
        Tool::Tabular,
        &argv(&[
            "ntc-lut-tabular",
            "-f",
            data.to_str().unwrap(),
            "--adc_bits",
            "12",
            "--table_bits",
            "8",
            "--resolution",
            "0.1",
            "-r",
            "10000",
            "-b",
            "-q",
            "-o",
            out.to_str().unwrap(),
        ]),
    )
    .unwrap_err();

    assert!(format!("{:#}", err).contains("Failed to read line 2: 25 ten-thousand"));
    assert!(!out.exists());
}

#[test]
fn test_failed_artifact_write_leaves_no_plot() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("missing-dir").join("ntc_table.c");
    let plot = dir.path().join("plot.json");

    let err = run(
        Tool::Beta,
        &argv(&[
            "ntc-lut-beta",
            "-B",
            "3950",
            "-R",
            "10000",
            "-T",
            "25",
            "--adc_bits",
            "12",
            "--table_bits",
            "8",
            "--resolution",
            "0.1",
            "-r",
            "10000",
            "-b",
            "-q",
            "-o",
            out.to_str().unwrap(),
            "--plot",
            plot.to_str().unwrap(),
        ]),
    )
    .unwrap_err();

    assert!(err.to_string().starts_with("Failed to write"));
    assert!(!plot.exists());
}

#[test]
fn test_missing_data_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.txt");
    let err = run(
        Tool::Tabular,
        &argv(&[
            "ntc-lut-tabular",
            "-f",
            missing.to_str().unwrap(),
            "--adc_bits",
            "12",
            "--table_bits",
            "8",
            "--resolution",
            "0.1",
            "-r",
            "10000",
            "-t",
            "-q",
        ]),
    )
    .unwrap_err();
    assert!(err.to_string().starts_with("Failed to read"));
}
