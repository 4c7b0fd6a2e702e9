//! Client configuration
//!
//! The four values every client needs: the App Store Connect issuer ID, the
//! API key ID, the path to the downloaded `.p8` private key, and the app ID.
//! All are required; [`AscConfig::validate`] reports a missing value or key
//! file as a setup error before any network call is attempted.

use crate::asc_api::types::Error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for an [`XcodeCloudClient`](crate::XcodeCloudClient)
///
/// Injected at client construction; there are no process-wide globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AscConfig {
    /// App Store Connect issuer ID
    pub issuer_id: String,
    /// API key ID (the `PZZU8CMTA6` part of `AuthKey_PZZU8CMTA6.p8`)
    pub key_id: String,
    /// Path to the PEM-encoded `.p8` private key file
    pub private_key_path: PathBuf,
    /// App Store Connect ID of the app
    pub app_id: String,
}

impl AscConfig {
    /// Create a configuration from explicit values
    pub fn new(
        issuer_id: impl Into<String>,
        key_id: impl Into<String>,
        private_key_path: impl Into<PathBuf>,
        app_id: impl Into<String>,
    ) -> Self {
        Self {
            issuer_id: issuer_id.into(),
            key_id: key_id.into(),
            private_key_path: private_key_path.into(),
            app_id: app_id.into(),
        }
    }

    /// Load configuration from a JSON file
    ///
    /// Expects an object with `issuer_id`, `key_id`, `private_key_path`, and
    /// `app_id` fields.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("invalid config {}: {}", path.display(), e)))
    }

    /// Check that every field is present and the private key file is usable
    ///
    /// Returns [`Error::Config`] naming the first problem found: an empty
    /// field, a missing key file, or key material that is not PEM.
    pub fn validate(&self) -> Result<(), Error> {
        if self.issuer_id.trim().is_empty() {
            return Err(Error::Config("issuer_id must not be empty".to_string()));
        }
        if self.key_id.trim().is_empty() {
            return Err(Error::Config("key_id must not be empty".to_string()));
        }
        if self.app_id.trim().is_empty() {
            return Err(Error::Config("app_id must not be empty".to_string()));
        }

        if !self.private_key_path.is_file() {
            return Err(Error::Config(format!(
                "private key file not found: {}",
                self.private_key_path.display()
            )));
        }

        let key = std::fs::read_to_string(&self.private_key_path).map_err(|e| {
            Error::Config(format!(
                "private key file {} is unreadable: {}",
                self.private_key_path.display(),
                e
            ))
        })?;
        if !key.contains("-----BEGIN") {
            return Err(Error::Config(format!(
                "private key file {} does not look like a PEM key",
                self.private_key_path.display()
            )));
        }

        Ok(())
    }
}
