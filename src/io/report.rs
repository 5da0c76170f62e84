//! JSON output for selection reports.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{MeshError, Result};
use crate::select::SelectionReport;

/// Render a report as pretty-printed JSON.
pub fn to_json(report: &SelectionReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Write a selection report to `path` as pretty-printed JSON.
///
/// # Example
///
/// ```no_run
/// use volsel::prelude::*;
///
/// let mut mesh: EditMesh = volsel::io::load("scene.obj").unwrap();
/// let ranges = vec![ThresholdRange::default()];
/// let report = select_by_ranges(&mut mesh, &ranges, &SelectOptions::default()).unwrap();
/// volsel::io::report::save_selection_report(&report, "report.json").unwrap();
/// ```
pub fn save_selection_report<P: AsRef<Path>>(report: &SelectionReport, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report).map_err(|source| MeshError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writeln!(writer)?;
    writer.flush()?;

    log::debug!("wrote selection report for {} parts to {}", report.parts.len(), path.display());
    Ok(())
}
