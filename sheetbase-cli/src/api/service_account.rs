//! Service-account authorization
//!
//! A service account key (the `credentials.json` downloaded from the cloud
//! console) signs a short-lived JWT, which the OAuth token endpoint trades
//! for a bearer token scoped to spreadsheets.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use super::auth::TokenProvider;
use super::error::RemoteError;
use super::models::TokenInfo;

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;
/// Tokens are refreshed this long before the endpoint says they expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// The fields of a service account key file this client needs
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(text: &str) -> Result<Self, RemoteError> {
        let key: Self = serde_json::from_str(text)
            .map_err(|e| RemoteError::Auth(format!("invalid service account key: {}", e)))?;
        match key.key_type.as_deref() {
            None | Some("service_account") => Ok(key),
            Some(other) => Err(RemoteError::Auth(format!(
                "key is a '{}' credential, expected 'service_account'",
                other
            ))),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, RemoteError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            RemoteError::Auth(format!("failed to read key file {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: u64,
    exp: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS
}

/// Access tokens minted from a service account key, cached until shortly
/// before they expire
#[derive(Debug)]
pub struct ServiceAccountToken {
    key: ServiceAccountKey,
    scope: String,
    http: reqwest::Client,
    cached: Mutex<Option<TokenInfo>>,
}

impl ServiceAccountToken {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            key,
            scope: SPREADSHEETS_SCOPE.to_string(),
            http: reqwest::Client::new(),
            cached: Mutex::new(None),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, RemoteError> {
        Ok(Self::new(ServiceAccountKey::from_file(path)?))
    }

    /// RS256-signed grant assertion issued at `issued_at` (Unix seconds)
    fn assertion(&self, issued_at: u64) -> Result<String, RemoteError> {
        let claims = Claims {
            iss: self.key.client_email.clone(),
            scope: self.scope.clone(),
            aud: self.key.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes()).map_err(|e| {
            RemoteError::Auth(format!(
                "invalid private key for {}: {}",
                self.key.client_email, e
            ))
        })?;
        jsonwebtoken::encode(&header, &claims, &signing_key)
            .map_err(|e| RemoteError::Auth(format!("failed to sign token request: {}", e)))
    }

    async fn fetch(&self) -> Result<TokenInfo, RemoteError> {
        let assertion = self.assertion(unix_now())?;
        log::debug!(
            "Requesting access token for {} from {}",
            self.key.client_email,
            self.key.token_uri
        );

        let body = format!(
            "grant_type={}&assertion={}",
            urlencoding::encode(JWT_BEARER_GRANT),
            urlencoding::encode(&assertion)
        );
        let response = self
            .http
            .post(&self.key.token_uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(RemoteError::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                text.trim()
            )));
        }

        let token: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| RemoteError::Decode(format!("token response: {}", e)))?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        Ok(TokenInfo {
            access_token: token.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountToken {
    async fn access_token(&self) -> Result<String, RemoteError> {
        let mut cached = self.cached.lock().await;
        if let Some(info) = cached.as_ref() {
            if !info.is_expired() {
                return Ok(info.access_token.clone());
            }
            log::debug!("Service account token expired, refreshing");
        }

        let info = self.fetch().await?;
        let token = info.access_token.clone();
        *cached = Some(info);
        Ok(token)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
