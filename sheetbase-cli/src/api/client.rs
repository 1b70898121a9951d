//! HTTP client for the Google Sheets v4 values API

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;

use super::auth::TokenProvider;
use super::error::RemoteError;
use super::models::{
    ApiErrorEnvelope, BatchClearValuesRequest, BatchClearValuesResponse, UpdateValuesResponse,
    ValueInputOption, ValueRange,
};
use crate::sheets::{CellValue, SpreadsheetService};

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Sheets API client; one instance can serve any number of documents
#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: String,
    auth: Arc<dyn TokenProvider>,
}

impl SheetsClient {
    pub fn with_base_url(auth: Arc<dyn TokenProvider>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/spreadsheets/{id}/values/{range}` with the range percent-encoded
    fn values_url(&self, spreadsheet_id: &str, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.base_url,
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(range)
        )
    }

    fn batch_clear_url(&self, spreadsheet_id: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values:batchClear",
            self.base_url,
            urlencoding::encode(spreadsheet_id)
        )
    }

    async fn request(&self, method: Method, url: &str) -> Result<RequestBuilder, RemoteError> {
        let token = self.auth.access_token().await?;
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header("Accept", "application/json"))
    }

    /// `values.get` for `range`, one row per element, formatted values
    async fn read_request(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<RequestBuilder, RemoteError> {
        let url = self.values_url(spreadsheet_id, range);
        Ok(self.request(Method::GET, &url).await?.query(&[
            ("majorDimension", "ROWS"),
            ("valueRenderOption", "FORMATTED_VALUE"),
        ]))
    }

    /// `values.update` writing `row` as the only row of `range`
    async fn write_request(
        &self,
        spreadsheet_id: &str,
        range: &str,
        row: &[CellValue],
        input: ValueInputOption,
    ) -> Result<RequestBuilder, RemoteError> {
        let url = self.values_url(spreadsheet_id, range);
        let body = ValueRange {
            range: Some(range.to_string()),
            major_dimension: Some("ROWS".to_string()),
            values: vec![row.iter().map(CellValue::to_json).collect()],
        };
        Ok(self
            .request(Method::PUT, &url)
            .await?
            .query(&[("valueInputOption", input.as_str())])
            .json(&body))
    }

    /// `values.batchClear` for every range in `ranges`
    async fn clear_request(
        &self,
        spreadsheet_id: &str,
        ranges: &[String],
    ) -> Result<RequestBuilder, RemoteError> {
        let url = self.batch_clear_url(spreadsheet_id);
        Ok(self
            .request(Method::POST, &url)
            .await?
            .json(&BatchClearValuesRequest {
                ranges: ranges.to_vec(),
            }))
    }

    /// Send once, log timing, and decode either the body or the error envelope
    async fn send<T: DeserializeOwned>(
        &self,
        label: &str,
        request: RequestBuilder,
    ) -> Result<T, RemoteError> {
        let start = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        log::debug!(
            "{} -> {} in {:.2}ms",
            label,
            status.as_u16(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| RemoteError::Decode(format!("{}: {}", label, e)))
    }
}

async fn error_from_response(response: Response) -> RemoteError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
        Ok(envelope) => match envelope.error.status {
            Some(code) => format!("{} ({})", envelope.error.message, code),
            None => envelope.error.message,
        },
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body,
    };

    log::warn!("Spreadsheet service error {}: {}", status, message);
    RemoteError::Status { status, message }
}

#[async_trait]
impl SpreadsheetService for SheetsClient {
    async fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<CellValue>>, RemoteError> {
        let request = self.read_request(spreadsheet_id, range).await?;
        let body: ValueRange = self.send(&format!("GET {}", range), request).await?;

        Ok(body
            .values
            .iter()
            .map(|row| row.iter().map(CellValue::from_json).collect())
            .collect())
    }

    async fn write_row(
        &self,
        spreadsheet_id: &str,
        range: &str,
        row: Vec<CellValue>,
        input: ValueInputOption,
    ) -> Result<UpdateValuesResponse, RemoteError> {
        let request = self
            .write_request(spreadsheet_id, range, &row, input)
            .await?;
        self.send(&format!("PUT {}", range), request).await
    }

    async fn clear_ranges(
        &self,
        spreadsheet_id: &str,
        ranges: Vec<String>,
    ) -> Result<BatchClearValuesResponse, RemoteError> {
        let request = self.clear_request(spreadsheet_id, &ranges).await?;
        self.send(&format!("CLEAR {}", ranges.join(",")), request)
            .await
    }
}
