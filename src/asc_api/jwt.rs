use crate::asc_api::types::Error;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Token lifetime in seconds (20 minutes, the App Store Connect maximum)
pub const TOKEN_LIFETIME_SECS: i64 = 1200;

/// Audience claim required by the App Store Connect API
pub const AUDIENCE: &str = "appstoreconnect-v1";

/// A signed, time-bounded API credential
///
/// Produced by [`TokenSigner::sign`] and cached by
/// [`TokenCache`](crate::asc_api::token::TokenCache). Must never be presented
/// to the API past `expires_at`.
#[derive(Debug, Clone)]
pub struct Credential {
    /// The signed JWT string
    pub token: String,
    /// Absolute expiry of the token
    pub expires_at: DateTime<Utc>,
}

/// JWT claims for App Store Connect API authentication
///
/// Consumed only during token generation, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer - the App Store Connect issuer ID
    pub iss: String,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Audience - always `appstoreconnect-v1`
    pub aud: String,
}

/// Signs time-limited ES256 JWTs for the App Store Connect API
///
/// The signer holds the issuer ID, key ID, and the PEM-encoded P-256 private
/// key downloaded from App Store Connect (the `.p8` file). Each call to
/// [`sign`](Self::sign) produces a fresh token valid for 20 minutes with the
/// key ID attached in the JWT header.
#[derive(Clone)]
pub struct TokenSigner {
    issuer_id: String,
    key_id: String,
    private_key_pem: String,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("issuer_id", &self.issuer_id)
            .field("key_id", &self.key_id)
            .field("private_key_pem", &"<redacted>")
            .finish()
    }
}

impl TokenSigner {
    /// Create a signer from pre-loaded PEM key material
    pub fn new(
        issuer_id: impl Into<String>,
        key_id: impl Into<String>,
        private_key_pem: impl Into<String>,
    ) -> Self {
        Self {
            issuer_id: issuer_id.into(),
            key_id: key_id.into(),
            private_key_pem: private_key_pem.into(),
        }
    }

    /// Create a signer by reading the private key from a `.p8` file
    ///
    /// Returns [`Error::KeyRead`] if the file is missing or unreadable.
    pub fn from_key_file(
        issuer_id: impl Into<String>,
        key_id: impl Into<String>,
        private_key_path: impl AsRef<Path>,
    ) -> Result<Self, Error> {
        let path = private_key_path.as_ref();
        let private_key_pem = std::fs::read_to_string(path).map_err(|source| Error::KeyRead {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::new(issuer_id, key_id, private_key_pem))
    }

    /// The key ID attached to every signed token header
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Sign a fresh credential valid for the next 20 minutes
    ///
    /// Returns [`Error::Signing`] if the key material is not a valid ES256
    /// private key or the cryptographic operation fails.
    pub fn sign(&self) -> Result<Credential, Error> {
        self.sign_at(Utc::now())
    }

    /// Sign with an explicit issue time. Time injection point for tests.
    pub(crate) fn sign_at(&self, now: DateTime<Utc>) -> Result<Credential, Error> {
        let expires_at = now + Duration::seconds(TOKEN_LIFETIME_SECS);

        let claims = Claims {
            iss: self.issuer_id.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            aud: AUDIENCE.to_string(),
        };

        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(self.key_id.clone());

        let key = EncodingKey::from_ec_pem(self.private_key_pem.as_bytes())
            .map_err(|e| Error::Signing(format!("invalid ES256 private key: {}", e)))?;

        let token = encode(&header, &claims, &key)
            .map_err(|e| Error::Signing(format!("JWT encoding failed: {}", e)))?;

        tracing::debug!(
            "Signed API token: kid={}, exp={}",
            self.key_id,
            expires_at.to_rfc3339()
        );

        Ok(Credential { token, expires_at })
    }
}
