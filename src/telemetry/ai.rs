use std::collections::HashMap;

use chrono::{DateTime, Local};
use geo_types::Point;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::api::SubscriptionSnapshot;
use crate::models::AiRecord;

lazy_static! {
    static ref VEHICLE_PATH: Regex =
        Regex::new(r"Timetable/(.+)\.(LatLon|ObjectClass)$").expect("valid vehicle path pattern");
}

/// Which per-vehicle value a subscription entry carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleField {
    LatLon,
    ObjectClass,
}

/// Split `.../Timetable/<vehicle>.LatLon` into the vehicle id and field
pub fn parse_vehicle_path(path: &str) -> Option<(&str, VehicleField)> {
    let caps = VEHICLE_PATH.captures(path)?;
    let id = caps.get(1)?.as_str();
    let field = match caps.get(2)?.as_str() {
        "LatLon" => VehicleField::LatLon,
        _ => VehicleField::ObjectClass,
    };
    Some((id, field))
}

/// Build one record per timetable vehicle, in timetable order.
///
/// All records share `collected_at`. Vehicles without both a position and
/// an object class in this snapshot are skipped.
pub fn ai_records(
    collected_at: DateTime<Local>,
    vehicles: &[String],
    snapshot: &SubscriptionSnapshot,
) -> Vec<AiRecord> {
    let mut positions: HashMap<&str, Point<f64>> = HashMap::new();
    let mut classes: HashMap<&str, &str> = HashMap::new();

    for entry in &snapshot.entries {
        let Some((id, field)) = entry.path.as_deref().and_then(parse_vehicle_path) else {
            continue;
        };
        match field {
            VehicleField::LatLon => {
                let lon = entry.values.get("Lon").and_then(|v| v.as_f64());
                let lat = entry.values.get("Lat").and_then(|v| v.as_f64());
                if let (Some(lon), Some(lat)) = (lon, lat) {
                    positions.insert(id, Point::new(lon, lat));
                }
            }
            VehicleField::ObjectClass => {
                if let Some(class) = entry.values.get("ObjectClass").and_then(|v| v.as_str()) {
                    classes.insert(id, class);
                }
            }
        }
    }

    vehicles
        .iter()
        .filter_map(|vid| {
            match (positions.get(vid.as_str()), classes.get(vid.as_str())) {
                (Some(location), Some(class)) => Some(AiRecord {
                    collected_at,
                    vehicle_id: vid.clone(),
                    object_class: class.to_string(),
                    location: *location,
                }),
                _ => {
                    debug!("No position/class for vehicle {} in this snapshot", vid);
                    None
                }
            }
        })
        .collect()
}
