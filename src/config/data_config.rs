use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{AI_COLUMNS, DEFAULT_AI_FILENAME, DEFAULT_CRS, DEFAULT_PLAYER_FILENAME, PLAYER_COLUMNS};

/// Vector file format of an exported dataset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// RFC 7946 FeatureCollection
    GeoJson,
    /// Delimited text with the geometry column as WKT
    Csv,
}

impl OutputFormat {
    /// Infer the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "geojson" | "json" => Some(OutputFormat::GeoJson),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::GeoJson => write!(f, "geojson"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

fn default_crs() -> String {
    DEFAULT_CRS.to_string()
}

/// Where and how one dataset (player or AI) is written.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DataConfig {
    pub filename: PathBuf,
    /// Column names in record order; the last one names the geometry
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    #[serde(default = "default_crs")]
    pub crs: String,
}

impl DataConfig {
    pub fn new(filename: impl Into<PathBuf>, columns: &[&str]) -> Self {
        DataConfig {
            filename: filename.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            format: None,
            crs: default_crs(),
        }
    }

    pub fn player_default() -> Self {
        Self::new(DEFAULT_PLAYER_FILENAME, PLAYER_COLUMNS)
    }

    pub fn ai_default() -> Self {
        Self::new(DEFAULT_AI_FILENAME, AI_COLUMNS)
    }

    /// Explicit `format`, otherwise inferred from the filename extension
    pub fn resolve_format(&self) -> Result<OutputFormat> {
        if let Some(format) = self.format {
            return Ok(format);
        }
        OutputFormat::from_path(&self.filename).ok_or_else(|| {
            anyhow!(
                "Cannot infer output format of {} (use .geojson or .csv, or set `format`)",
                self.filename.display()
            )
        })
    }

    /// Columns holding attribute values, i.e. all but the geometry column
    pub fn attribute_columns(&self) -> &[String] {
        match self.columns.split_last() {
            Some((_, attributes)) => attributes,
            None => &[],
        }
    }

    pub fn geometry_column(&self) -> Option<&str> {
        self.columns.last().map(String::as_str)
    }

    /// Check that the column list fits a record with `attribute_count`
    /// attributes plus one geometry, and that the format resolves.
    pub fn validate(&self, dataset: &str, attribute_count: usize) -> Result<()> {
        if self.filename.as_os_str().is_empty() {
            bail!("data.{}: filename must not be empty", dataset);
        }
        if self.columns.len() != attribute_count + 1 {
            bail!(
                "data.{}: expected {} columns ({} attributes + geometry), found {}",
                dataset,
                attribute_count + 1,
                attribute_count,
                self.columns.len()
            );
        }
        if self.columns.iter().any(|c| c.trim().is_empty()) {
            bail!("data.{}: column names must not be empty", dataset);
        }
        self.resolve_format()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a/b.geojson")), Some(OutputFormat::GeoJson));
        assert_eq!(OutputFormat::from_path(Path::new("b.JSON")), Some(OutputFormat::GeoJson));
        assert_eq!(OutputFormat::from_path(Path::new("b.csv")), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::from_path(Path::new("b.gpkg")), None);
        assert_eq!(OutputFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_explicit_format_wins() {
        let mut config = DataConfig::new("out.gpkg", &["a", "geometry"]);
        assert!(config.resolve_format().is_err());

        config.format = Some(OutputFormat::Csv);
        assert_eq!(config.resolve_format().unwrap(), OutputFormat::Csv);
    }

    #[test]
    fn test_defaults_validate() {
        DataConfig::player_default().validate("player", 9).unwrap();
        DataConfig::ai_default().validate("ai", 3).unwrap();
    }

    #[test]
    fn test_column_count_mismatch() {
        let config = DataConfig::new("ai.csv", &["time", "vehicle_id", "geometry"]);
        let err = config.validate("ai", 3).unwrap_err();
        assert!(err.to_string().contains("expected 4 columns"));
    }

    #[test]
    fn test_geometry_is_last_column() {
        let config = DataConfig::ai_default();
        assert_eq!(config.geometry_column(), Some("geometry"));
        assert_eq!(config.attribute_columns(), &["time", "vehicle_id", "object_class"]);
    }

    #[test]
    fn test_crs_defaults_when_omitted() {
        let yaml = "filename: ai.csv\ncolumns: [time, vehicle_id, object_class, geom]\n";
        let config: DataConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.crs, "EPSG:4326");
        assert_eq!(config.format, None);
    }
}
