//! Google Sheets API Module
//!
//! HTTP access to the Sheets v4 values endpoints (read, update, batch clear)
//! plus the token providers used to authorize those calls.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod service_account;
#[cfg(test)]
pub mod stub;

pub use auth::{CommandToken, StaticToken, TokenProvider};
pub use client::{DEFAULT_BASE_URL, SheetsClient};
pub use error::RemoteError;
pub use models::{BatchClearValuesResponse, UpdateValuesResponse, ValueInputOption};
pub use service_account::ServiceAccountToken;
