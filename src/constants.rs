//! Global constants for the tsw-connect application.
//!
//! This module centralizes hardcoded values for the telemetry API, the
//! collection loop and the export layer.

// Telemetry API constants
/// Base URL of the game's local HTTP API
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:31270";

/// Header carrying the communication key on every request
pub const COMM_KEY_HEADER: &str = "DTGCommKey";

/// Subscription slot used for all subscribed paths
pub const DEFAULT_SUBSCRIPTION_ID: u32 = 1;

/// Per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Delay between subscription setup attempts in milliseconds
pub const SUBSCRIPTION_RETRY_DELAY_MS: u64 = 250;

/// Locations of the communication key file, relative to the home directory
pub const COMM_KEY_RELATIVE_PATHS: &[&str] = &[
    "Documents/My Games/TrainSimWorld6/Saved/Config/CommAPIKey.txt",
    "OneDrive/Documenten/My Games/TrainSimWorld6/Saved/Config/CommAPIKey.txt",
    "OneDrive/Documents/My Games/TrainSimWorld6/Saved/Config/CommAPIKey.txt",
];

// API paths
pub const PLAYER_INFO_PATH: &str = "DriverAid.PlayerInfo";
pub const DRIVER_AID_DATA_PATH: &str = "DriverAid.Data";
pub const TIMETABLE_PATH: &str = "Timetable";
pub const LAT_LON_SUFFIX: &str = ".LatLon";
pub const OBJECT_CLASS_SUFFIX: &str = ".ObjectClass";

// Unit conversion
/// Metres per second to miles per hour
pub const MS_TO_MPH: f64 = 2.236936363826430;

// Collection loop constants
/// Default polling interval in milliseconds
pub const DEFAULT_COLLECTION_INTERVAL_MS: u64 = 500;

/// How long to wait for the poller after stop before exporting anyway
pub const DEFAULT_JOIN_TIMEOUT_MS: u64 = 2000;

/// Dashboard redraw interval in milliseconds
pub const DEFAULT_DASHBOARD_REFRESH_MS: u64 = 100;

// Export constants
/// Coordinate reference system of all collected points
pub const DEFAULT_CRS: &str = "EPSG:4326";

/// Name of the summary written next to the exported data
pub const SUMMARY_FILE_NAME: &str = "collection_summary.json";

/// Default configuration file name, resolved against the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

pub const DEFAULT_PLAYER_FILENAME: &str = "data/player.geojson";
pub const DEFAULT_AI_FILENAME: &str = "data/ai.geojson";

/// Column names of a player record, geometry last
pub const PLAYER_COLUMNS: &[&str] = &[
    "service_name",
    "track_max_speed",
    "next_speed_limit",
    "distance_to_next_speed_limit",
    "next_speed_limit_x",
    "next_speed_limit_y",
    "tile_x",
    "tile_y",
    "gradient",
    "geometry",
];

/// Column names of an AI vehicle record, geometry last
pub const AI_COLUMNS: &[&str] = &["time", "vehicle_id", "object_class", "geometry"];

// Error messages
pub const ERROR_COMM_KEY_NOT_FOUND: &str = "DTG communication key file not found";
pub const ERROR_FAILED_TO_WRITE_FILE: &str = "Failed to write file";
