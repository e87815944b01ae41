//! Configuration loading and validation.
//!
//! The YAML file nests everything under a top-level `tsw_connect` key:
//!
//! ```yaml
//! tsw_connect:
//!   api:
//!     base_url: http://127.0.0.1:31270
//!   collection:
//!     interval_ms: 500
//!   data:
//!     player:
//!       filename: data/player.geojson
//!       columns: [service_name, ..., geometry]
//!     ai:
//!       filename: data/ai.csv
//!       columns: [time, vehicle_id, object_class, geometry]
//! ```

mod app_config;
mod data_config;
mod env_vars;

pub use app_config::{
    ApiConfig,
    AppConfig,
    CollectionSettings,
    DataSection,
    load_or_create_config,
};

pub use data_config::{
    DataConfig,
    OutputFormat,
};

pub use env_vars::{
    expand_path,
    home_dir,
    parse_unix_env_vars,
    parse_windows_env_vars,
};
