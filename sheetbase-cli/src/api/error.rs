//! Errors surfaced by the remote spreadsheet service

use thiserror::Error;

/// Failure of a read, write or clear call against the remote service
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Request to spreadsheet service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Spreadsheet service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Authorization failed: {0}")]
    Auth(String),

    #[error("Unexpected response from spreadsheet service: {0}")]
    Decode(String),
}

impl RemoteError {
    /// HTTP status code, when the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            RemoteError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// 401/403 responses and token provider failures
    pub fn is_auth(&self) -> bool {
        matches!(self, RemoteError::Auth(_)) || matches!(self.status(), Some(401) | Some(403))
    }
}
