//! Validation report storage
//!
//! Persists finalized run statistics next to the test input.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use super::validation::{RunStatistics, Verdict};

/// Suffix appended to the input file stem
const REPORT_SUFFIX: &str = "_validation";

/// Contents of the validation report file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(flatten)]
    pub statistics: RunStatistics,
    pub result: Verdict,
}

impl ValidationReport {
    pub fn new(statistics: RunStatistics) -> Self {
        let result = statistics.verdict();
        Self { statistics, result }
    }
}

/// Report path derived from the input: `tests.json` becomes `tests_validation.json`
pub fn report_path(input: &str) -> PathBuf {
    if input == "-" {
        return PathBuf::from(format!("stdin{REPORT_SUFFIX}.json"));
    }

    let path = Path::new(input);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tests".to_string());
    path.with_file_name(format!("{stem}{REPORT_SUFFIX}.json"))
}

/// Write the validation report
pub fn write_report(path: impl AsRef<Path>, report: &ValidationReport) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create validation report: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("Failed to write validation report: {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write validation report: {}", path.display()))?;

    info!("Validation report written to {}", path.display());
    Ok(())
}
