//! Google Sheets v4 values API wire models

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A block of cell values, as sent to and returned by the values endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    /// Row-major cell values. Omitted by the API when the range is blank,
    /// and trailing blank rows/cells are trimmed.
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

/// How the service interprets written values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueInputOption {
    /// Parsed as if typed into the UI: numeric strings become numbers,
    /// formulas are evaluated
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueInputOption::UserEntered => "USER_ENTERED",
        }
    }
}

/// Response to `values.update`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    #[serde(default)]
    pub updated_range: String,
    #[serde(default)]
    pub updated_cells: u32,
}

/// Response to `values.batchClear`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchClearValuesResponse {
    #[serde(default)]
    pub cleared_ranges: Vec<String>,
}

/// Request body for `values.batchClear`
#[derive(Debug, Clone, Serialize)]
pub struct BatchClearValuesRequest {
    pub ranges: Vec<String>,
}

/// Error envelope returned by Google APIs on non-success responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// An access token and when it stops being usable
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub access_token: String,
    pub expires_at: Instant,
}

impl TokenInfo {
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}
