//! Vector file export of collected records.
//!
//! Each dataset is written in one pass when collection stops. Configured
//! column names are zipped positionally with a record's attributes and the
//! last column names the point geometry.
//!
//! ```no_run
//! use tsw_connect::config::DataConfig;
//! use tsw_connect::export::write_records;
//! use tsw_connect::models::AiRecord;
//!
//! # fn example(records: Vec<AiRecord>) -> anyhow::Result<()> {
//! let config = DataConfig::ai_default();
//! let path = write_records(&config, &records)?;
//! println!("wrote {}", path.display());
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::info;

use crate::config::{DataConfig, OutputFormat};
use crate::models::GeoRecord;

/// GeoJSON FeatureCollection output
pub mod geojson_writer;

/// CSV output with WKT geometry
pub mod csv_writer;

/// Write `records` to the file described by `config`, returning its path.
///
/// An empty slice still produces a valid, empty file. Missing parent
/// directories are created.
pub fn write_records<R: GeoRecord>(config: &DataConfig, records: &[R]) -> Result<PathBuf> {
    if config.columns.len() != R::ATTRIBUTE_COUNT + 1 {
        bail!(
            "{} columns configured for {}, records need {} ({} attributes + geometry)",
            config.columns.len(),
            config.filename.display(),
            R::ATTRIBUTE_COUNT + 1,
            R::ATTRIBUTE_COUNT
        );
    }

    let format = config.resolve_format()?;
    let path = config.filename.clone();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .context(format!("Failed to create output directory {}", parent.display()))?;
    }

    match format {
        OutputFormat::GeoJson => geojson_writer::write_geojson(&path, config, records)?,
        OutputFormat::Csv => csv_writer::write_csv(&path, config, records)?,
    }

    info!("Wrote {} records to {} ({})", records.len(), path.display(), format);
    Ok(path)
}
