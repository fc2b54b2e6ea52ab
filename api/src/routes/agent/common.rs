use db::models::{
    live_metric_sample::NewLiveMetricSample,
    metric_sample::NewMetricSample,
    node,
    process_snapshot::NewProcess,
    service_snapshot::NewService,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// Body of `POST /api/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterNodeRequest {
    #[validate(length(min = 1, message = "Hostname cannot be empty"))]
    pub hostname: String,
    pub ip_address: Option<String>,
    pub os_info: Option<String>,
    pub display_name: Option<String>,
    pub group_name: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl From<RegisterNodeRequest> for node::RegisterNode {
    fn from(req: RegisterNodeRequest) -> Self {
        Self {
            hostname: req.hostname,
            ip_address: req.ip_address,
            os_info: req.os_info,
            display_name: req.display_name,
            group_name: req.group_name,
            tags: req.tags,
        }
    }
}

/// Response of `POST /api/register`. The api key appears here once and is
/// never retrievable again.
#[derive(Debug, Serialize, Default)]
pub struct RegisterNodeResponse {
    pub node_id: i64,
    pub api_key: String,
}

/// Body of `POST /api/metrics`: one full collection cycle.
#[derive(Debug, Deserialize)]
pub struct MetricsSubmission {
    pub metrics: NewMetricSample,
    #[serde(default)]
    pub processes: Vec<NewProcess>,
    #[serde(default)]
    pub services: Vec<NewService>,
}

/// Response data for `POST /api/metrics`.
#[derive(Debug, Serialize, Default)]
pub struct MetricsAccepted {
    pub sample_id: i64,
    pub alerts_raised: usize,
}

/// Body of `POST /api/metrics/live`.
pub type LiveSubmission = NewLiveMetricSample;

/// Response of `GET /api/config/{node_id}`.
#[derive(Debug, Serialize, Default)]
pub struct ConfigPollResponse {
    pub has_update: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
}

/// Response of `POST /api/config/{node_id}`.
#[derive(Debug, Serialize, Default)]
pub struct ConfigConfirmResponse {
    pub applied: u64,
}
