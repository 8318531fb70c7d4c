//! JSON output formatting
//!
//! The report is serialized as-is. Year buckets become an object keyed by
//! year:
//!
//! ```json
//! {
//!   "population": 10,
//!   "total_estimated_duration": 6000,
//!   "average_duration": 600.0,
//!   "year_buckets": { "2020": 8, "2021": 2 }
//! }
//! ```

use crate::coordinator::EstimationReport;
use crate::Result;
use anyhow::Context;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Serialize a report to a JSON string
pub fn to_json_string(report: &EstimationReport, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(json)
}

/// Write a report to a JSON file
pub fn write_json_output(output_path: &Path, report: &EstimationReport, pretty: bool) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
    let writer = BufWriter::new(file);

    if pretty {
        serde_json::to_writer_pretty(writer, report)?;
    } else {
        serde_json::to_writer(writer, report)?;
    }

    log::info!("Report written to {}", output_path.display());
    Ok(())
}
