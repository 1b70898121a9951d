//! Bearer token providers for the Sheets API
//!
//! The core never refreshes credentials itself; it asks a [`TokenProvider`]
//! for a token before every request and the provider decides whether a
//! cached one is still good.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::sync::Mutex;

use super::error::RemoteError;
use super::models::TokenInfo;

/// Source of OAuth access tokens
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, RemoteError>;
}

/// A fixed token, e.g. from `SHEETBASE_ACCESS_TOKEN`
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken").field("token", &"<redacted>").finish()
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, RemoteError> {
        if self.token.trim().is_empty() {
            return Err(RemoteError::Auth("access token is empty".to_string()));
        }
        Ok(self.token.clone())
    }
}

/// Token printed by an external command, such as
/// `gcloud auth print-access-token`, cached for `lifetime`
#[derive(Debug)]
pub struct CommandToken {
    command: String,
    lifetime: Duration,
    cached: Mutex<Option<TokenInfo>>,
}

impl CommandToken {
    pub fn new(command: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            command: command.into(),
            lifetime,
            cached: Mutex::new(None),
        }
    }

    async fn fetch(&self) -> Result<String, RemoteError> {
        log::debug!("Fetching access token via `{}`", self.command);

        let output = shell(&self.command)
            .output()
            .await
            .map_err(|e| RemoteError::Auth(format!("failed to run `{}`: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RemoteError::Auth(format!(
                "`{}` exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(RemoteError::Auth(format!(
                "`{}` printed no token",
                self.command
            )));
        }
        Ok(token)
    }
}

#[async_trait]
impl TokenProvider for CommandToken {
    async fn access_token(&self) -> Result<String, RemoteError> {
        let mut cached = self.cached.lock().await;
        if let Some(info) = cached.as_ref() {
            if !info.is_expired() {
                return Ok(info.access_token.clone());
            }
            log::debug!("Cached access token expired, refreshing");
        }

        let token = self.fetch().await?;
        *cached = Some(TokenInfo {
            access_token: token.clone(),
            expires_at: Instant::now() + self.lifetime,
        });
        Ok(token)
    }
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
