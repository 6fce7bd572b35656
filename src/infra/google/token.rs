use std::sync::Mutex;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::infra::google::credentials::ServiceAccountKey;

pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Signs the RS256 assertion exchanged for an access token.
pub fn signed_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String> {
    let iat = now.timestamp();
    let claims = Claims {
        iss: &key.client_email,
        scope: SCOPES.join(" "),
        aud: &key.token_uri,
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .context("service account private key is not a valid RSA PEM")?;
    encode(&header, &claims, &encoding_key).context("failed to sign token assertion")
}

/// Hands out bearer tokens for one service account, refreshing them shortly
/// before they expire.
pub struct TokenSource {
    key: ServiceAccountKey,
    http: Client,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenSource {
    pub fn new(key: ServiceAccountKey, http: Client) -> Self {
        Self {
            key,
            http,
            cached: Mutex::new(None),
        }
    }

    pub fn bearer(&self) -> Result<String> {
        let mut cached = self
            .cached
            .lock()
            .map_err(|_| anyhow!("token cache lock poisoned"))?;

        let now = Utc::now();
        if let Some(token) = cached.as_ref() {
            if now + Duration::seconds(REFRESH_MARGIN_SECS) < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let token = self.fetch(now)?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    fn fetch(&self, now: DateTime<Utc>) -> Result<AccessToken> {
        let assertion = signed_assertion(&self.key, now)?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .with_context(|| format!("failed to reach token endpoint {}", self.key.token_uri))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("token endpoint returned {status}: {body}");
        }

        let token: TokenResponse = response
            .json()
            .context("failed to decode token response")?;
        debug!(
            client_email = %self.key.client_email,
            expires_in = token.expires_in,
            "fetched access token"
        );
        Ok(AccessToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertion_rejects_malformed_private_key() {
        let key = ServiceAccountKey {
            client_email: "board@board.iam.gserviceaccount.com".to_string(),
            private_key: "not a key".to_string(),
            private_key_id: None,
            token_uri: crate::infra::google::credentials::DEFAULT_TOKEN_URI.to_string(),
        };

        let err = signed_assertion(&key, Utc::now()).expect_err("key is not PEM");
        assert!(err.to_string().contains("RSA PEM"));
    }
}
