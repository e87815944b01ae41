use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep;

use crate::api::error::ApiError;
use crate::api::models::{GetResponse, SubscriptionSnapshot, TimetableListing};
use crate::api::TelemetrySource;
use crate::config::ApiConfig;
use crate::constants::{
    COMM_KEY_HEADER, DRIVER_AID_DATA_PATH, LAT_LON_SUFFIX, OBJECT_CLASS_SUFFIX, PLAYER_INFO_PATH,
    TIMETABLE_PATH,
};

/// Client for the game's local HTTP telemetry API.
///
/// Every request carries the communication key header and is bounded by the
/// configured timeout. Non-2xx responses surface as [`ApiError::HttpStatus`].
#[derive(Debug, Clone)]
pub struct TswApiClient {
    http: reqwest::Client,
    base_url: String,
    comm_key: String,
    subscription_id: u32,
    retry_delay: Duration,
    max_attempts: Option<u32>,
}

impl TswApiClient {
    pub fn new(config: &ApiConfig, comm_key: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(TswApiClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            comm_key: comm_key.into(),
            subscription_id: config.subscription_id,
            retry_delay: config.retry_delay(),
            max_attempts: config.subscription_max_attempts,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self
            .http
            .get(&url)
            .header(COMM_KEY_HEADER, &self.comm_key)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus { url, status: status.as_u16() });
        }

        response.json::<T>().await.map_err(|e| ApiError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })
    }

    async fn post(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        let response = self
            .http
            .post(&url)
            .header(COMM_KEY_HEADER, &self.comm_key)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus { url, status: status.as_u16() });
        }
        Ok(())
    }

    async fn get_values(&self, path: &str) -> Result<Value, ApiError> {
        let response: GetResponse = self.get_json(&format!("get/{}", path)).await?;
        Ok(response.values)
    }

    /// Names of all AI vehicles in the current timetable
    pub async fn list_timetable(&self) -> Result<Vec<String>, ApiError> {
        let listing: TimetableListing = self.get_json(&format!("list/{}", TIMETABLE_PATH)).await?;
        Ok(listing.vehicle_ids())
    }

    pub async fn get_player_info(&self) -> Result<Value, ApiError> {
        self.get_values(PLAYER_INFO_PATH).await
    }

    pub async fn get_driver_aid_data(&self) -> Result<Value, ApiError> {
        self.get_values(DRIVER_AID_DATA_PATH).await
    }

    pub async fn get_vehicle_lat_lon(&self, vehicle_id: &str) -> Result<Value, ApiError> {
        self.get_values(&format!("{}/{}{}", TIMETABLE_PATH, vehicle_id, LAT_LON_SUFFIX)).await
    }

    pub async fn get_vehicle_object_class(&self, vehicle_id: &str) -> Result<Value, ApiError> {
        self.get_values(&format!("{}/{}{}", TIMETABLE_PATH, vehicle_id, OBJECT_CLASS_SUFFIX)).await
    }

    /// Subscription registration paths in the order they are posted:
    /// player info, driver aid data, every object class, every position.
    pub fn subscription_paths(&self, vehicles: &[String]) -> Vec<String> {
        let id = self.subscription_id;
        let mut paths = vec![
            format!("subscription/{}?Subscription={}", PLAYER_INFO_PATH, id),
            format!("subscription/{}?Subscription={}", DRIVER_AID_DATA_PATH, id),
        ];
        paths.extend(vehicles.iter().map(|vid| {
            format!("subscription/{}/{}{}?Subscription={}", TIMETABLE_PATH, vid, OBJECT_CLASS_SUFFIX, id)
        }));
        paths.extend(vehicles.iter().map(|vid| {
            format!("subscription/{}/{}{}?Subscription={}", TIMETABLE_PATH, vid, LAT_LON_SUFFIX, id)
        }));
        paths
    }

    /// Register every path with the subscription, retrying each one until it
    /// is accepted or the per-path attempt limit is reached.
    pub async fn setup_subscription(&self, vehicles: &[String]) -> Result<(), ApiError> {
        let paths = self.subscription_paths(vehicles);
        info!(
            "Setting up subscription {} ({} paths for {} vehicles)",
            self.subscription_id,
            paths.len(),
            vehicles.len()
        );

        for path in &paths {
            let mut attempts: u32 = 0;
            loop {
                attempts += 1;
                match self.post(path).await {
                    Ok(()) => break,
                    Err(e) => {
                        if self.max_attempts.is_some_and(|max| attempts >= max) {
                            return Err(e);
                        }
                        debug!("Subscription attempt {} for {} failed: {}", attempts, path, e);
                        sleep(self.retry_delay).await;
                    }
                }
            }
        }

        info!("Subscription {} ready", self.subscription_id);
        Ok(())
    }

    /// Current values of every subscribed path
    pub async fn get_subscription(&self) -> Result<SubscriptionSnapshot, ApiError> {
        self.get_json(&format!("subscription/?Subscription={}", self.subscription_id)).await
    }
}

#[async_trait]
impl TelemetrySource for TswApiClient {
    async fn fetch_snapshot(&self) -> Result<SubscriptionSnapshot, ApiError> {
        self.get_subscription().await
    }
}
