/// App Store Connect API integration module
///
/// Everything needed to drive Xcode Cloud over the App Store Connect REST
/// API: ES256 token signing, credential caching, and the typed client.
///
/// ## Authentication flow
///
/// 1. The caller constructs an [`XcodeCloudClient`] from an `AscConfig`
/// 2. Each operation asks the [`token::TokenCache`] for a valid credential
/// 3. The cache re-signs via [`jwt::TokenSigner`] one minute before the
///    token's 20-minute expiry, otherwise reuses the cached token
/// 4. The request goes out with `Authorization: Bearer <token>` and any
///    non-2xx response surfaces as an `ApiError` carrying the raw body
pub mod client;
pub mod jwt;
pub mod resources;
pub mod token;
pub mod types;

pub use client::{XcodeCloudClient, DEFAULT_BASE_URL, DEFAULT_BUILD_LIMIT};
pub use jwt::{Credential, TokenSigner};
pub use resources::*;
pub use token::TokenCache;
pub use types::{ApiError, Error};
