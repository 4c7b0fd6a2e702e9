//! Xcode Cloud SDK
//!
//! A Rust client for managing Xcode Cloud workflows and builds through the
//! App Store Connect API.
//!
//! This SDK provides:
//! - ES256 JWT generation from an App Store Connect API key, with a cached,
//!   time-bounded credential that is re-signed one minute before expiry
//! - Typed operations over workflows, build runs, and artifacts
//! - Streaming artifact download
//! - Error types that carry the status code and raw body of any API failure
//!
//! # Example
//!
//! ```no_run
//! use xcode_cloud_sdk::{AscConfig, BuildSource, XcodeCloudClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Load issuer ID, key ID, private key path, and app ID
//! let config = AscConfig::from_file("xcode_cloud_config.json")?;
//! let client = XcodeCloudClient::new(&config)?;
//!
//! // Enumerate workflows
//! let workflows = client.list_workflows().await?;
//! for workflow in &workflows {
//!     println!("{} (ID: {})", workflow.name, workflow.id);
//! }
//!
//! // Trigger a build of main on the first workflow
//! let build = client
//!     .trigger_build(&workflows[0].id, Some(BuildSource::Branch("main".to_string())))
//!     .await?;
//! println!("New build ID: {}", build.id);
//!
//! // Fetch and download its artifacts once finished
//! for artifact in client.get_build_artifacts(&build.id).await? {
//!     let name = artifact.file_name.as_deref().unwrap_or("artifact.bin");
//!     client.download_artifact(&artifact.id, name).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod asc_api;
pub mod config;

// Re-export commonly used types
pub use asc_api::{
    ApiError, Artifact, Build, BuildSource, CompletionStatus, Credential, Error, TokenCache,
    TokenSigner, Workflow, XcodeCloudClient, DEFAULT_BASE_URL, DEFAULT_BUILD_LIMIT,
};
pub use config::AscConfig;
