//! Test utilities for tsw-connect
//!
//! Sample API payloads and record builders shared by the unit tests.

#![cfg(test)]

use chrono::Local;
use geo_types::Point;
use serde_json::{json, Value};

use crate::api::{SubscriptionEntry, SubscriptionSnapshot};
use crate::models::{AiRecord, PlayerRecord};

/// `Values` of a `DriverAid.PlayerInfo` entry
pub fn player_info_values() -> Value {
    json!({
        "currentServiceName": "1A23 London Waterloo",
        "currentTile": {"x": 5, "y": -7},
        "geoLocation": {"longitude": -0.1123, "latitude": 51.5032},
        "playerProfileName": "driver"
    })
}

/// `Values` of a `DriverAid.Data` entry
pub fn player_data_values() -> Value {
    json!({
        "trackMaxSpeed": {"value": 20.0, "unit": "m/s"},
        "nextSpeedLimit": {"value": 10.0, "unit": "m/s"},
        "distanceToNextSpeedLimit": 1234.5,
        "nextSpeedLimitPosition": {"x": 11.0, "y": -22.0},
        "gradient": 0.35
    })
}

/// A subscription snapshot with both player entries followed by an
/// `ObjectClass` and a `LatLon` entry per vehicle.
pub fn sample_snapshot(vehicles: &[&str]) -> SubscriptionSnapshot {
    let mut entries = vec![
        SubscriptionEntry {
            path: Some("DriverAid.PlayerInfo".to_string()),
            values: player_info_values(),
        },
        SubscriptionEntry {
            path: Some("DriverAid.Data".to_string()),
            values: player_data_values(),
        },
    ];

    for vid in vehicles {
        entries.push(SubscriptionEntry {
            path: Some(format!("Timetable/{}.ObjectClass", vid)),
            values: json!({"ObjectClass": format!("BP_{}", vid)}),
        });
    }
    for (i, vid) in vehicles.iter().enumerate() {
        entries.push(SubscriptionEntry {
            path: Some(format!("Timetable/{}.LatLon", vid)),
            values: json!({"Lat": 51.2 + i as f64 * 0.01, "Lon": -0.5 - i as f64 * 0.01}),
        });
    }

    SubscriptionSnapshot { subscription_id: Some(1), entries }
}

/// Test data generators for record types
pub mod generators {
    use super::*;

    pub fn test_player_record(service: &str) -> PlayerRecord {
        PlayerRecord {
            collected_at: Local::now(),
            service_name: service.to_string(),
            track_max_speed: 60.0,
            next_speed_limit: 45.0,
            distance_to_next_speed_limit: 500.0,
            next_speed_limit_x: 10.0,
            next_speed_limit_y: 20.0,
            tile_x: 1,
            tile_y: 2,
            gradient: -0.2,
            location: Point::new(-1.25, 52.5),
        }
    }

    pub fn test_ai_record(vehicle_id: &str, lon: f64, lat: f64) -> AiRecord {
        AiRecord {
            collected_at: Local::now(),
            vehicle_id: vehicle_id.to_string(),
            object_class: format!("BP_{}", vehicle_id),
            location: Point::new(lon, lat),
        }
    }
}
