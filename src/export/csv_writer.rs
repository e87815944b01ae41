use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use wkt::ToWkt;

use crate::config::DataConfig;
use crate::constants::ERROR_FAILED_TO_WRITE_FILE;
use crate::models::GeoRecord;

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// One CSV row: attributes as text, then the point as WKT
pub fn to_row<R: GeoRecord>(record: &R) -> Vec<String> {
    let mut row: Vec<String> = record.attributes().iter().map(cell).collect();
    row.push(record.location().wkt_string());
    row
}

pub fn write_csv<R: GeoRecord>(path: &Path, config: &DataConfig, records: &[R]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .context(format!("{} {}", ERROR_FAILED_TO_WRITE_FILE, path.display()))?;

    writer.write_record(&config.columns)
        .context("Failed to write CSV header")?;
    for record in records {
        writer.write_record(to_row(record))
            .context("Failed to write CSV row")?;
    }
    writer.flush()
        .context(format!("{} {}", ERROR_FAILED_TO_WRITE_FILE, path.display()))?;

    Ok(())
}
