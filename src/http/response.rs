//! Response bodies for the harness endpoints.
//!
//! Field order matches the documented key order of each endpoint; keys are
//! serialized in camelCase.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelloResponse {
    pub message: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub request_number: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub status: String,
    pub processing_time_ms: u64,
    /// The submitted payload, echoed verbatim.
    pub received_data: Map<String, Value>,
    pub request_number: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WarningResponse {
    pub message: String,
    pub request_number: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLogsResponse {
    pub status: String,
    pub logs_generated: i64,
    pub request_number: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub total_requests: u64,
    /// Epoch milliseconds.
    pub timestamp: i64,
}
