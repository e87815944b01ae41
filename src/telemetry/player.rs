use chrono::{DateTime, Local};
use geo_types::Point;

use crate::api::{SubscriptionEntry, SubscriptionSnapshot};
use crate::constants::{DRIVER_AID_DATA_PATH, MS_TO_MPH, PLAYER_INFO_PATH};
use crate::models::PlayerRecord;
use crate::telemetry::{integer_at, number_at, string_at, TelemetryError};

/// Locate an entry by path suffix, falling back to an unnamed entry at the
/// position the subscription registers it in.
fn find_entry<'a>(
    snapshot: &'a SubscriptionSnapshot,
    path: &str,
    fallback_index: usize,
) -> Option<&'a SubscriptionEntry> {
    snapshot
        .entries
        .iter()
        .find(|entry| entry.path.as_deref().is_some_and(|p| p.ends_with(path)))
        .or_else(|| {
            snapshot
                .entries
                .get(fallback_index)
                .filter(|entry| entry.path.is_none())
        })
}

/// Build the player record of one poll.
///
/// Speeds arrive in metres per second and are stored in miles per hour.
pub fn player_record(
    snapshot: &SubscriptionSnapshot,
    collected_at: DateTime<Local>,
) -> Result<PlayerRecord, TelemetryError> {
    let info = &find_entry(snapshot, PLAYER_INFO_PATH, 0)
        .ok_or(TelemetryError::MissingEntry(PLAYER_INFO_PATH))?
        .values;
    let data = &find_entry(snapshot, DRIVER_AID_DATA_PATH, 1)
        .ok_or(TelemetryError::MissingEntry(DRIVER_AID_DATA_PATH))?
        .values;

    let longitude = number_at(PLAYER_INFO_PATH, info, "/geoLocation/longitude")?;
    let latitude = number_at(PLAYER_INFO_PATH, info, "/geoLocation/latitude")?;

    Ok(PlayerRecord {
        collected_at,
        service_name: string_at(PLAYER_INFO_PATH, info, "/currentServiceName")?,
        track_max_speed: number_at(DRIVER_AID_DATA_PATH, data, "/trackMaxSpeed/value")? * MS_TO_MPH,
        next_speed_limit: number_at(DRIVER_AID_DATA_PATH, data, "/nextSpeedLimit/value")? * MS_TO_MPH,
        distance_to_next_speed_limit: number_at(DRIVER_AID_DATA_PATH, data, "/distanceToNextSpeedLimit")?,
        next_speed_limit_x: number_at(DRIVER_AID_DATA_PATH, data, "/nextSpeedLimitPosition/x")?,
        next_speed_limit_y: number_at(DRIVER_AID_DATA_PATH, data, "/nextSpeedLimitPosition/y")?,
        tile_x: integer_at(PLAYER_INFO_PATH, info, "/currentTile/x")?,
        tile_y: integer_at(PLAYER_INFO_PATH, info, "/currentTile/y")?,
        gradient: number_at(DRIVER_AID_DATA_PATH, data, "/gradient")?,
        location: Point::new(longitude, latitude),
    })
}
