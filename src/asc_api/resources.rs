//! Typed resources for the App Store Connect API
//!
//! The API wraps everything in a JSON:API-style envelope:
//! `{"data": {"type", "id", "attributes", ...}}` for single resources and
//! `{"data": [...]}` for collections. The envelope types here are a
//! serialization-layer concern; callers only ever see the flat domain records
//! ([`Workflow`], [`Build`], [`Artifact`]) built from them.

use serde::{Deserialize, Serialize};

/// Resource type tag for build runs on the wire
pub const BUILD_RUN_TYPE: &str = "ciBuildRuns";

// ============================================================================
// Wire envelope
// ============================================================================

/// Single-resource response envelope: `{"data": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct Document<A> {
    pub data: Resource<A>,
}

/// Collection response envelope: `{"data": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionDocument<A> {
    pub data: Vec<Resource<A>>,
}

/// One resource object inside an envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Resource<A> {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    pub attributes: A,
    #[serde(default)]
    pub relationships: Option<Relationships>,
}

/// Relationships block; only the parent workflow linkage is consumed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Relationships {
    #[serde(default)]
    pub workflow: Option<Relationship>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<RelationshipData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipData {
    pub id: String,
}

// ============================================================================
// Workflow
// ============================================================================

/// Wire attributes of a `ciWorkflows` resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAttributes {
    pub name: String,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub repository_name: Option<String>,
}

/// An Xcode Cloud workflow: a named, remotely configured CI pipeline
///
/// Read-only projection of remote state; the client never mutates workflows.
#[derive(Debug, Clone)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub is_enabled: bool,
    pub repository_name: Option<String>,
}

impl From<Resource<WorkflowAttributes>> for Workflow {
    fn from(resource: Resource<WorkflowAttributes>) -> Self {
        Self {
            id: resource.id,
            name: resource.attributes.name,
            is_enabled: resource.attributes.is_enabled,
            repository_name: resource.attributes.repository_name,
        }
    }
}

// ============================================================================
// Build
// ============================================================================

/// Completion status of a build run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Canceled,
    Errored,
}

/// Wire attributes of a `ciBuildRuns` resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildAttributes {
    #[serde(default)]
    pub number: Option<i64>,
    #[serde(default)]
    pub completion_status: Option<CompletionStatus>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub started_date: Option<String>,
    #[serde(default)]
    pub finished_date: Option<String>,
}

/// One execution instance of a [`Workflow`]
#[derive(Debug, Clone)]
pub struct Build {
    pub id: String,
    /// Parent workflow, when the response carries the relationship
    pub workflow_id: Option<String>,
    pub number: Option<i64>,
    /// Absent while the build has not finished
    pub completion_status: Option<CompletionStatus>,
    pub created_date: Option<String>,
    pub started_date: Option<String>,
    pub finished_date: Option<String>,
}

impl From<Resource<BuildAttributes>> for Build {
    fn from(resource: Resource<BuildAttributes>) -> Self {
        let workflow_id = resource
            .relationships
            .and_then(|r| r.workflow)
            .and_then(|w| w.data)
            .map(|d| d.id);

        Self {
            id: resource.id,
            workflow_id,
            number: resource.attributes.number,
            completion_status: resource.attributes.completion_status,
            created_date: resource.attributes.created_date,
            started_date: resource.attributes.started_date,
            finished_date: resource.attributes.finished_date,
        }
    }
}

/// Source-control pointer a triggered build runs against
///
/// Exactly one kind per build request; the enum makes supplying several
/// kinds at once unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildSource {
    Branch(String),
    Tag(String),
    Commit(String),
}

/// Attributes payload for a build creation request
///
/// With no source set this serializes to an empty attributes map, which asks
/// the API to build the workflow's default branch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TriggerAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

impl From<Option<BuildSource>> for TriggerAttributes {
    fn from(source: Option<BuildSource>) -> Self {
        match source {
            Some(BuildSource::Branch(branch)) => Self {
                branch: Some(branch),
                ..Self::default()
            },
            Some(BuildSource::Tag(tag)) => Self {
                tag: Some(tag),
                ..Self::default()
            },
            Some(BuildSource::Commit(commit)) => Self {
                commit: Some(commit),
                ..Self::default()
            },
            None => Self::default(),
        }
    }
}

/// Wire payload for `POST /ciWorkflows/{id}/builds`
#[derive(Debug, Clone, Serialize)]
pub struct CreateBuildRequest {
    pub data: CreateBuildData,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBuildData {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub attributes: TriggerAttributes,
}

impl CreateBuildRequest {
    pub fn new(source: Option<BuildSource>) -> Self {
        Self {
            data: CreateBuildData {
                resource_type: BUILD_RUN_TYPE.to_string(),
                attributes: TriggerAttributes::from(source),
            },
        }
    }
}

/// Wire payload for `PATCH /ciBuildRuns/{id}` marking the build canceled
#[derive(Debug, Clone, Serialize)]
pub struct CancelBuildRequest {
    pub data: CancelBuildData,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelBuildData {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    pub attributes: CancelAttributes,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelAttributes {
    pub canceled: bool,
}

impl CancelBuildRequest {
    pub fn new(build_id: impl Into<String>) -> Self {
        Self {
            data: CancelBuildData {
                resource_type: BUILD_RUN_TYPE.to_string(),
                id: build_id.into(),
                attributes: CancelAttributes { canceled: true },
            },
        }
    }
}

// ============================================================================
// Artifact
// ============================================================================

/// Wire attributes of a `ciArtifacts` resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactAttributes {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<i64>,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// A downloadable output produced by a [`Build`]
#[derive(Debug, Clone)]
pub struct Artifact {
    pub id: String,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub download_url: Option<String>,
}

impl From<Resource<ArtifactAttributes>> for Artifact {
    fn from(resource: Resource<ArtifactAttributes>) -> Self {
        Self {
            id: resource.id,
            file_name: resource.attributes.file_name,
            file_size: resource.attributes.file_size,
            download_url: resource.attributes.download_url,
        }
    }
}
