use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoJsonValue};
use serde_json::json;

use crate::config::DataConfig;
use crate::constants::{DEFAULT_CRS, ERROR_FAILED_TO_WRITE_FILE};
use crate::models::GeoRecord;

/// Legacy named-CRS member, written only for non-WGS84 reference systems
fn crs_member(crs: &str) -> Option<JsonObject> {
    if crs.eq_ignore_ascii_case(DEFAULT_CRS) {
        return None;
    }
    let name = match crs.split_once(':') {
        Some((authority, code)) => format!("urn:ogc:def:crs:{}::{}", authority.to_ascii_uppercase(), code),
        None => crs.to_string(),
    };

    let mut members = JsonObject::new();
    members.insert(
        "crs".to_string(),
        json!({"type": "name", "properties": {"name": name}}),
    );
    Some(members)
}

pub fn to_feature<R: GeoRecord>(config: &DataConfig, record: &R) -> Feature {
    let mut properties = JsonObject::new();
    for (column, value) in config.attribute_columns().iter().zip(record.attributes()) {
        properties.insert(column.clone(), value);
    }

    let point = record.location();
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoJsonValue::Point(vec![point.x(), point.y()]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn to_feature_collection<R: GeoRecord>(config: &DataConfig, records: &[R]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: records.iter().map(|record| to_feature(config, record)).collect(),
        foreign_members: crs_member(&config.crs),
    }
}

pub fn write_geojson<R: GeoRecord>(path: &Path, config: &DataConfig, records: &[R]) -> Result<()> {
    let collection = to_feature_collection(config, records);

    let file = File::create(path)
        .context(format!("{} {}", ERROR_FAILED_TO_WRITE_FILE, path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &collection)
        .context("Failed to serialize GeoJSON feature collection")?;
    writer.flush()
        .context(format!("{} {}", ERROR_FAILED_TO_WRITE_FILE, path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    use crate::test_utils::generators::{test_ai_record, test_player_record};

    #[test]
    fn test_feature_properties_use_configured_columns() {
        let mut config = DataConfig::ai_default();
        config.columns = vec!["t".into(), "vid".into(), "cls".into(), "geom".into()];
        let record = test_ai_record("RVM_A", -0.5, 51.2);

        let feature = to_feature(&config, &record);
        let properties = feature.properties.unwrap();
        assert_eq!(properties.len(), 3);
        assert_eq!(properties["vid"], "RVM_A");
        assert_eq!(properties["cls"], "BP_RVM_A");
        assert!(properties.contains_key("t"));

        let geometry = feature.geometry.unwrap();
        assert_eq!(geometry.value, GeoJsonValue::Point(vec![-0.5, 51.2]));
    }

    #[test]
    fn test_write_and_parse_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("player.geojson");
        let config = DataConfig::player_default();
        let records = vec![test_player_record("1A23"), test_player_record("1A24")];

        write_geojson(&path, &config, &records).unwrap();

        let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["type"], "FeatureCollection");
        assert_eq!(parsed["features"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["features"][1]["properties"]["service_name"], "1A24");
        assert_eq!(parsed["features"][0]["properties"]["tile_y"], 2);
        assert!(parsed.get("crs").is_none());
    }

    #[test]
    fn test_empty_collection_is_valid() {
        let config = DataConfig::ai_default();
        let collection = to_feature_collection::<crate::models::AiRecord>(&config, &[]);
        let text = serde_json::to_string(&collection).unwrap();
        let parsed: geojson::GeoJson = text.parse().unwrap();
        assert!(matches!(parsed, geojson::GeoJson::FeatureCollection(fc) if fc.features.is_empty()));
    }

    #[test]
    fn test_non_default_crs_member() {
        assert!(crs_member("EPSG:4326").is_none());
        assert!(crs_member("epsg:4326").is_none());
        let members = crs_member("EPSG:27700").unwrap();
        assert_eq!(members["crs"]["properties"]["name"], "urn:ogc:def:crs:EPSG::27700");
    }
}
