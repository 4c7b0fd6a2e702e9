use crate::asc_api::jwt::TokenSigner;
use crate::asc_api::resources::{
    Artifact, ArtifactAttributes, Build, BuildAttributes, BuildSource, CancelBuildRequest,
    CollectionDocument, CreateBuildRequest, Document, Workflow, WorkflowAttributes,
};
use crate::asc_api::token::TokenCache;
use crate::asc_api::types::{ApiError, Error};
use crate::config::AscConfig;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Production App Store Connect API base
pub const DEFAULT_BASE_URL: &str = "https://api.appstoreconnect.apple.com/v1";

/// Default result bound for build listings
pub const DEFAULT_BUILD_LIMIT: u32 = 20;

/// HTTP client for Xcode Cloud via the App Store Connect API
///
/// This client handles all communication with App Store Connect for one app:
/// workflow enumeration, build lifecycle (trigger, cancel, retry), and
/// artifact retrieval. Every request carries a signed ES256 bearer token; the
/// token is cached and re-signed one minute before its 20-minute expiry.
///
/// Each call is independent: no entity data is cached, no retries are
/// performed, and failures always propagate to the caller. Concurrency, retry
/// policy, and timeouts belong to the embedding application.
///
/// # Example
///
/// ```no_run
/// use xcode_cloud_sdk::{AscConfig, XcodeCloudClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AscConfig::new(
///     "1fe78bc1-c522-4611-94d9-5e49639f876e",
///     "PZZU8CMTA6",
///     "AuthKey_PZZU8CMTA6.p8",
///     "6751781514",
/// );
/// let client = XcodeCloudClient::new(&config)?;
///
/// for workflow in client.list_workflows().await? {
///     println!("{} (ID: {})", workflow.name, workflow.id);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct XcodeCloudClient {
    /// API base URL, production by default
    base_url: String,
    /// App Store Connect ID of the app whose workflows are managed
    app_id: String,
    signer: TokenSigner,
    /// Shared across clones so concurrent callers reuse one credential
    tokens: Arc<TokenCache>,
    client: reqwest::Client,
}

impl XcodeCloudClient {
    /// Create a client against the production API
    ///
    /// Validates the configuration and loads the private key before any
    /// network call is attempted; a missing key file or empty field is
    /// reported immediately.
    pub fn new(config: &AscConfig) -> Result<Self, Error> {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a client against a non-default API base (e.g. a mock server)
    pub fn with_base_url(config: &AscConfig, base_url: impl Into<String>) -> Result<Self, Error> {
        Self::with_client(config, base_url, reqwest::Client::new())
    }

    /// Create a client with a caller-supplied HTTP transport
    ///
    /// This allows configuring timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use xcode_cloud_sdk::{AscConfig, XcodeCloudClient};
    ///
    /// # fn example(config: &AscConfig) -> Result<(), Box<dyn std::error::Error>> {
    /// let http_client = reqwest::Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()?;
    ///
    /// let client = XcodeCloudClient::with_client(
    ///     config,
    ///     "https://api.appstoreconnect.apple.com/v1",
    ///     http_client,
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_client(
        config: &AscConfig,
        base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Result<Self, Error> {
        config.validate()?;

        let signer = TokenSigner::from_key_file(
            &config.issuer_id,
            &config.key_id,
            &config.private_key_path,
        )?;

        let base_url = base_url.into();
        tracing::debug!("Creating XcodeCloudClient with base URL: {}", base_url);

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            app_id: config.app_id.clone(),
            signer,
            tokens: Arc::new(TokenCache::new()),
            client,
        })
    }

    /// Get the API base URL for this client
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the app ID this client manages
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    // =========================================================================
    // Request dispatch
    // =========================================================================

    /// Perform an authenticated request and parse the JSON response
    ///
    /// Attaches the current bearer token (re-signing if stale), adds a JSON
    /// content type on bodied calls, and surfaces any non-2xx status as
    /// [`ApiError::Http`] with the raw response body.
    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, Error> {
        let credential = self.tokens.get_valid(&self.signer)?;
        let url = format!("{}{}", self.base_url, endpoint);

        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", credential.token));

        if let Some(body) = body {
            request = request.header("Content-Type", "application/json").json(body);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("API request failed: HTTP {} - {}", status.as_u16(), body);
            return Err(Error::Api(ApiError::Http {
                status: status.as_u16(),
                body,
            }));
        }

        response.json().await.map_err(|e| {
            tracing::error!("Failed to parse response JSON: {}", e);
            Error::Api(ApiError::Parse(format!(
                "failed to parse response JSON: {}",
                e
            )))
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, Error> {
        self.send::<(), T>(Method::GET, endpoint, None).await
    }

    /// Fetch an endpoint and stream the raw response body to `destination`
    ///
    /// The body is written chunk by chunk, never buffered whole in memory.
    /// Used only for artifact retrieval.
    async fn download(&self, endpoint: &str, destination: &Path) -> Result<(), Error> {
        let credential = self.tokens.get_valid(&self.signer)?;
        let url = format!("{}{}", self.base_url, endpoint);

        tracing::debug!("GET {} -> {}", url, destination.display());

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", credential.token))
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Download failed: HTTP {} - {}", status.as_u16(), body);
            return Err(Error::Api(ApiError::Http {
                status: status.as_u16(),
                body,
            }));
        }

        let mut file = tokio::fs::File::create(destination).await?;
        let mut response = response;
        while let Some(chunk) = response.chunk().await.map_err(ApiError::from)? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(())
    }

    // =========================================================================
    // Workflows
    // =========================================================================

    /// List all Xcode Cloud workflows configured for the app
    pub async fn list_workflows(&self) -> Result<Vec<Workflow>, Error> {
        let endpoint = format!("/apps/{}/ciWorkflows", self.app_id);
        let document: CollectionDocument<WorkflowAttributes> = self.get(&endpoint).await?;

        Ok(document.data.into_iter().map(Workflow::from).collect())
    }

    /// Get details of a specific workflow
    pub async fn get_workflow(&self, workflow_id: impl Into<String>) -> Result<Workflow, Error> {
        let endpoint = format!("/ciWorkflows/{}", workflow_id.into());
        let document: Document<WorkflowAttributes> = self.get(&endpoint).await?;

        Ok(Workflow::from(document.data))
    }

    // =========================================================================
    // Builds
    // =========================================================================

    /// List builds, optionally scoped to one workflow
    ///
    /// With `workflow_id` set the listing covers that workflow's builds,
    /// otherwise all build runs for the app. `limit` bounds the result count
    /// and defaults to [`DEFAULT_BUILD_LIMIT`].
    pub async fn list_builds(
        &self,
        workflow_id: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Build>, Error> {
        let limit = limit.unwrap_or(DEFAULT_BUILD_LIMIT);
        let endpoint = match workflow_id {
            Some(id) => format!("/ciWorkflows/{}/builds?limit={}", id, limit),
            None => format!("/apps/{}/ciBuildRuns?limit={}", self.app_id, limit),
        };

        let document: CollectionDocument<BuildAttributes> = self.get(&endpoint).await?;

        Ok(document.data.into_iter().map(Build::from).collect())
    }

    /// Get details of a specific build
    pub async fn get_build(&self, build_id: impl Into<String>) -> Result<Build, Error> {
        let endpoint = format!("/ciBuildRuns/{}", build_id.into());
        let document: Document<BuildAttributes> = self.get(&endpoint).await?;

        Ok(Build::from(document.data))
    }

    /// Trigger a new build for a workflow
    ///
    /// `source` names the branch, tag, or commit to build; `None` asks for
    /// the workflow's default. Triggering is not idempotent: every successful
    /// call starts another build.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use xcode_cloud_sdk::{BuildSource, XcodeCloudClient};
    ///
    /// # async fn example(client: &XcodeCloudClient) -> Result<(), Box<dyn std::error::Error>> {
    /// let build = client
    ///     .trigger_build("wf-42", Some(BuildSource::Branch("main".to_string())))
    ///     .await?;
    /// println!("New build ID: {}", build.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn trigger_build(
        &self,
        workflow_id: impl Into<String>,
        source: Option<BuildSource>,
    ) -> Result<Build, Error> {
        let workflow_id = workflow_id.into();
        let endpoint = format!("/ciWorkflows/{}/builds", workflow_id);
        let payload = CreateBuildRequest::new(source);

        tracing::info!("Triggering build for workflow {}", workflow_id);

        let document: Document<BuildAttributes> =
            self.send(Method::POST, &endpoint, Some(&payload)).await?;

        Ok(Build::from(document.data))
    }

    /// Cancel a running build
    ///
    /// Issues a PATCH marking the build canceled; the returned build reflects
    /// the remote state after the update.
    pub async fn cancel_build(&self, build_id: impl Into<String>) -> Result<Build, Error> {
        let build_id = build_id.into();
        let endpoint = format!("/ciBuildRuns/{}", build_id);
        let payload = CancelBuildRequest::new(&build_id);

        tracing::info!("Canceling build {}", build_id);

        let document: Document<BuildAttributes> =
            self.send(Method::PATCH, &endpoint, Some(&payload)).await?;

        Ok(Build::from(document.data))
    }

    /// Retry a failed build
    ///
    /// Issues a creation request against the build's retry sub-resource and
    /// returns the new build run.
    pub async fn retry_build(&self, build_id: impl Into<String>) -> Result<Build, Error> {
        let build_id = build_id.into();
        let endpoint = format!("/ciBuildRuns/{}/retry", build_id);

        tracing::info!("Retrying build {}", build_id);

        let document: Document<BuildAttributes> =
            self.send::<(), _>(Method::POST, &endpoint, None).await?;

        Ok(Build::from(document.data))
    }

    // =========================================================================
    // Artifacts
    // =========================================================================

    /// Get the artifacts produced by a build
    pub async fn get_build_artifacts(
        &self,
        build_id: impl Into<String>,
    ) -> Result<Vec<Artifact>, Error> {
        let endpoint = format!("/ciBuildRuns/{}/artifacts", build_id.into());
        let document: CollectionDocument<ArtifactAttributes> = self.get(&endpoint).await?;

        Ok(document.data.into_iter().map(Artifact::from).collect())
    }

    /// Download a build artifact to `destination`
    ///
    /// The response body is streamed to the file without buffering the whole
    /// payload in memory.
    pub async fn download_artifact(
        &self,
        artifact_id: impl Into<String>,
        destination: impl AsRef<Path>,
    ) -> Result<(), Error> {
        let artifact_id = artifact_id.into();
        let endpoint = format!("/ciArtifacts/{}/download", artifact_id);

        tracing::info!(
            "Downloading artifact {} to {}",
            artifact_id,
            destination.as_ref().display()
        );

        self.download(&endpoint, destination.as_ref()).await
    }
}
