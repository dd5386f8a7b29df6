//! Google API credentials.
//!
//! A service-account key file is exchanged for short-lived access tokens
//! (OAuth 2.0 JWT bearer grant); tokens are cached and renewed shortly
//! before they expire. Static bearer tokens and API keys are passed through.

use super::SheetError;
use crate::config::SheetAuth;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::Path;

/// Read and write access to spreadsheets.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

/// The fields of a service-account key file this client needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, SheetError> {
        let content = fs::read_to_string(path).map_err(|e| {
            SheetError::Auth(format!("cannot read credentials file {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            SheetError::Auth(format!("invalid credentials file {}: {}", path.display(), e))
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Access tokens for one service account.
pub struct ServiceAccount {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    client: Client,
    cached: RefCell<Option<CachedToken>>,
}

impl ServiceAccount {
    pub fn new(key: ServiceAccountKey, client: Client) -> Result<Self, SheetError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| SheetError::Auth(format!("invalid private key: {}", e)))?;
        Ok(Self {
            key,
            encoding_key,
            client,
            cached: RefCell::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Signed JWT asking for the spreadsheets scope.
    pub fn assertion(&self, now: DateTime<Utc>) -> Result<String, SheetError> {
        let claims = Claims {
            iss: self.key.client_email.clone(),
            scope: SHEETS_SCOPE.to_string(),
            aud: self.key.token_uri.clone(),
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| SheetError::Auth(format!("cannot sign token request: {}", e)))
    }

    /// A valid access token, from the cache when possible.
    pub fn access_token(&self) -> Result<String, SheetError> {
        let now = Utc::now();
        if let Some(token) = self.cached.borrow().as_ref() {
            if token.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now {
                return Ok(token.value.clone());
            }
        }

        let token = self.exchange(now)?;
        let value = token.value.clone();
        *self.cached.borrow_mut() = Some(token);
        Ok(value)
    }

    fn exchange(&self, now: DateTime<Utc>) -> Result<CachedToken, SheetError> {
        let assertion = self.assertion(now)?;
        tracing::debug!("Requesting access token for {}", self.key.client_email);

        let resp = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .map_err(|e| SheetError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().unwrap_or_default();
            return Err(SheetError::Auth(format!(
                "token request failed with status {}: {}",
                status, message
            )));
        }

        let body: TokenResponse = resp.json().map_err(|e| SheetError::Parse(e.to_string()))?;
        Ok(CachedToken {
            value: body.access_token,
            expires_at: now + Duration::seconds(body.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS)),
        })
    }
}

/// Credentials attached to every Sheets request.
pub enum Credentials {
    Bearer(String),
    ApiKey(String),
    ServiceAccount(ServiceAccount),
}

impl Credentials {
    pub fn from_config(auth: &SheetAuth, client: &Client) -> Result<Self, SheetError> {
        match auth {
            SheetAuth::Bearer(token) => Ok(Self::Bearer(token.clone())),
            SheetAuth::ApiKey(key) => Ok(Self::ApiKey(key.clone())),
            SheetAuth::ServiceAccount(path) => {
                let key = ServiceAccountKey::from_file(path)?;
                let account = ServiceAccount::new(key, client.clone())?;
                tracing::info!("Using service account {}", account.client_email());
                Ok(Self::ServiceAccount(account))
            }
        }
    }

    pub fn apply(&self, request: RequestBuilder) -> Result<RequestBuilder, SheetError> {
        Ok(match self {
            Self::Bearer(token) => request.bearer_auth(token),
            Self::ApiKey(key) => request.query(&[("key", key)]),
            Self::ServiceAccount(account) => request.bearer_auth(account.access_token()?),
        })
    }
}
