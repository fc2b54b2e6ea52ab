use serde::{Deserialize, Serialize};

/// Node representation returned by administrative endpoints. Never includes
/// the api key hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct NodeResponse {
    pub id: i64,
    pub hostname: String,
    pub ip_address: Option<String>,
    pub os_info: Option<String>,
    pub display_name: Option<String>,
    pub group_name: String,
    pub tags: Vec<String>,
    pub cpu_alert_threshold: f64,
    pub memory_alert_threshold: f64,
    pub disk_alert_threshold: f64,
    pub collection_interval_minutes: i32,
    pub is_active: bool,
    pub created_at: String,
    pub last_seen: Option<String>,
}

impl From<db::models::node::Model> for NodeResponse {
    fn from(node: db::models::node::Model) -> Self {
        let tags = node.tag_list();
        Self {
            id: node.id,
            hostname: node.hostname,
            ip_address: node.ip_address,
            os_info: node.os_info,
            display_name: node.display_name,
            group_name: node.group_name,
            tags,
            cpu_alert_threshold: node.cpu_alert_threshold,
            memory_alert_threshold: node.memory_alert_threshold,
            disk_alert_threshold: node.disk_alert_threshold,
            collection_interval_minutes: node.collection_interval_minutes,
            is_active: node.is_active,
            created_at: node.created_at.to_rfc3339(),
            last_seen: node.last_seen.map(|t| t.to_rfc3339()),
        }
    }
}

/// `?hours=` query for metric history, defaulting to one day.
#[derive(Debug, Deserialize)]
pub struct HoursQuery {
    #[serde(default = "default_hours")]
    pub hours: i64,
}

fn default_hours() -> i64 {
    24
}

/// `?minutes=` query for live windows, defaulting to half an hour.
#[derive(Debug, Deserialize)]
pub struct MinutesQuery {
    #[serde(default = "default_minutes")]
    pub minutes: i64,
}

fn default_minutes() -> i64 {
    30
}
