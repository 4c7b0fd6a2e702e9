use crate::asc_api::jwt::{Credential, TokenSigner};
use crate::asc_api::types::Error;
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Safety margin in seconds: refresh this long before the nominal expiry to
/// avoid races against clock skew or in-flight requests
pub const SAFETY_MARGIN_SECS: i64 = 60;

/// In-memory cache for the current API credential
///
/// Holds at most one [`Credential`] and decides reuse vs. regeneration:
/// the cached token is reused while `now < expires_at - 60s`, otherwise the
/// signer is invoked and the result stored. Check-and-refresh is serialized
/// under a mutex so concurrent callers never double-sign or observe a torn
/// credential.
///
/// This is the only state the SDK keeps between calls; entity data is never
/// cached.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: Mutex<Option<Credential>>,
}

impl TokenCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a credential that is valid for at least the safety margin
    ///
    /// Reuses the cached credential when still fresh, otherwise invokes the
    /// signer and caches the replacement. Signer failures propagate as-is.
    pub fn get_valid(&self, signer: &TokenSigner) -> Result<Credential, Error> {
        self.get_valid_at(signer, Utc::now())
    }

    /// [`get_valid`](Self::get_valid) with an explicit clock, so expiry
    /// boundaries can be tested deterministically.
    pub(crate) fn get_valid_at(
        &self,
        signer: &TokenSigner,
        now: DateTime<Utc>,
    ) -> Result<Credential, Error> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| Error::Signing(format!("token cache lock poisoned: {}", e)))?;

        if let Some(credential) = slot.as_ref() {
            if now < credential.expires_at - Duration::seconds(SAFETY_MARGIN_SECS) {
                tracing::debug!("Reusing cached API token");
                return Ok(credential.clone());
            }
            tracing::debug!("Cached API token is within the refresh margin, re-signing");
        }

        // Signing happens under the lock: cheap, CPU-only, and it guarantees
        // concurrent callers never produce redundant tokens.
        let fresh = signer.sign_at(now)?;
        tracing::info!(
            "Issued new API token, expires at {}",
            fresh.expires_at.to_rfc3339()
        );
        *slot = Some(fresh.clone());
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asc_api::jwt::TOKEN_LIFETIME_SECS;
    use chrono::TimeZone;

    const TEST_KEY: &str = include_str!("../../tests/testdata/test_key.p8");

    fn signer() -> TokenSigner {
        TokenSigner::new("iss-1", "key-1", TEST_KEY)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_token_reused_within_margin() {
        let cache = TokenCache::new();
        let signer = signer();

        let first = cache.get_valid_at(&signer, t0()).unwrap();
        let second = cache
            .get_valid_at(&signer, t0() + Duration::seconds(600))
            .unwrap();
        let third = cache
            .get_valid_at(&signer, t0() + Duration::seconds(1100))
            .unwrap();

        assert_eq!(first.token, second.token);
        assert_eq!(first.token, third.token);
        assert_eq!(first.expires_at, third.expires_at);
    }

    #[test]
    fn test_token_refreshed_after_margin() {
        let cache = TokenCache::new();
        let signer = signer();

        // Scenario from the reference behavior: 1200s window, 60s margin.
        let first = cache.get_valid_at(&signer, t0()).unwrap();
        let at_1150 = cache
            .get_valid_at(&signer, t0() + Duration::seconds(1150))
            .unwrap();

        assert_ne!(first.token, at_1150.token);
        assert_eq!(
            at_1150.expires_at,
            t0() + Duration::seconds(1150 + TOKEN_LIFETIME_SECS)
        );
    }

    #[test]
    fn test_refresh_boundary_is_expiry_minus_margin() {
        let cache = TokenCache::new();
        let signer = signer();

        let first = cache.get_valid_at(&signer, t0()).unwrap();

        // 1139s after issuance: still strictly inside the window, reused.
        let just_before = cache
            .get_valid_at(&signer, t0() + Duration::seconds(1139))
            .unwrap();
        assert_eq!(first.token, just_before.token);

        // Exactly at expiry - margin: no longer valid, re-signed.
        let at_boundary = cache
            .get_valid_at(&signer, t0() + Duration::seconds(1140))
            .unwrap();
        assert_ne!(first.token, at_boundary.token);
    }

    #[test]
    fn test_stale_token_never_returned() {
        let cache = TokenCache::new();
        let signer = signer();

        let first = cache.get_valid_at(&signer, t0()).unwrap();
        let well_past = t0() + Duration::seconds(TOKEN_LIFETIME_SECS * 3);
        let replacement = cache.get_valid_at(&signer, well_past).unwrap();

        assert_ne!(first.token, replacement.token);
        assert!(replacement.expires_at > well_past);
    }

    #[test]
    fn test_signer_failure_propagates() {
        let cache = TokenCache::new();
        let broken = TokenSigner::new("iss-1", "key-1", "not a pem key");

        let result = cache.get_valid_at(&broken, t0());
        assert!(matches!(result, Err(Error::Signing(_))));
    }

    #[test]
    fn test_concurrent_callers_share_one_token() {
        use std::sync::Arc;

        let cache = Arc::new(TokenCache::new());
        let signer = Arc::new(signer());
        let now = t0();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let signer = Arc::clone(&signer);
                std::thread::spawn(move || cache.get_valid_at(&signer, now).unwrap().token)
            })
            .collect();

        let tokens: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(tokens.iter().all(|t| *t == tokens[0]));
    }
}
