use chrono::{DateTime, Local};
use geo_types::Point;
use serde_json::{json, Value};

/// A single geo-referenced row destined for a vector file.
///
/// `attributes` returns the non-geometry values in export column order; the
/// geometry always occupies the last configured column.
pub trait GeoRecord {
    /// Number of attribute columns, excluding the geometry
    const ATTRIBUTE_COUNT: usize;

    fn attributes(&self) -> Vec<Value>;

    fn location(&self) -> Point<f64>;
}

/// Player train state captured on one poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub collected_at: DateTime<Local>,
    pub service_name: String,
    /// Track speed limit at the player position, in mph
    pub track_max_speed: f64,
    /// Upcoming speed limit, in mph
    pub next_speed_limit: f64,
    pub distance_to_next_speed_limit: f64,
    pub next_speed_limit_x: f64,
    pub next_speed_limit_y: f64,
    pub tile_x: i64,
    pub tile_y: i64,
    pub gradient: f64,
    pub location: Point<f64>,
}

impl GeoRecord for PlayerRecord {
    const ATTRIBUTE_COUNT: usize = 9;

    fn attributes(&self) -> Vec<Value> {
        vec![
            json!(self.service_name),
            json!(self.track_max_speed),
            json!(self.next_speed_limit),
            json!(self.distance_to_next_speed_limit),
            json!(self.next_speed_limit_x),
            json!(self.next_speed_limit_y),
            json!(self.tile_x),
            json!(self.tile_y),
            json!(self.gradient),
        ]
    }

    fn location(&self) -> Point<f64> {
        self.location
    }
}

/// Position and class of one AI timetable vehicle on one poll.
#[derive(Debug, Clone, PartialEq)]
pub struct AiRecord {
    pub collected_at: DateTime<Local>,
    pub vehicle_id: String,
    pub object_class: String,
    pub location: Point<f64>,
}

impl GeoRecord for AiRecord {
    const ATTRIBUTE_COUNT: usize = 3;

    fn attributes(&self) -> Vec<Value> {
        vec![
            json!(self.collected_at.to_rfc3339()),
            json!(self.vehicle_id),
            json!(self.object_class),
        ]
    }

    fn location(&self) -> Point<f64> {
        self.location
    }
}
