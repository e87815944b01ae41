use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `GET /subscription/?Subscription=<id>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SubscriptionSnapshot {
    #[serde(default, rename = "RequestedSubscriptionID", skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<u32>,
    #[serde(default)]
    pub entries: Vec<SubscriptionEntry>,
}

/// One subscribed path and its current values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SubscriptionEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub values: Value,
}

/// Body of a `GET /get/<path>` request.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct GetResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub values: Value,
}

/// Body of `GET /list/Timetable`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct TimetableListing {
    #[serde(default)]
    pub nodes: Vec<TimetableNode>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct TimetableNode {
    pub name: String,
}

impl TimetableListing {
    pub fn vehicle_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|node| node.name.clone()).collect()
    }
}
