//! Envelope <-> domain mapping tests
//!
//! The App Store Connect wire format wraps resources in a
//! `{"data": {"type", "id", "attributes"}}` envelope. These tests pin the
//! mapping from that envelope to the flat domain records, and the shape of
//! the request payloads the client sends.

use serde_json::json;
use xcode_cloud_sdk::asc_api::resources::{
    Artifact, ArtifactAttributes, Build, BuildAttributes, BuildSource, CancelBuildRequest,
    CollectionDocument, CompletionStatus, CreateBuildRequest, Document, Resource, Workflow,
    WorkflowAttributes,
};

#[test]
fn test_workflow_document_maps_to_domain() {
    let body = json!({
        "data": {
            "type": "ciWorkflows",
            "id": "wf-1",
            "attributes": {
                "name": "Release",
                "isEnabled": true,
                "repositoryName": "cheffy-app"
            }
        }
    });

    let document: Document<WorkflowAttributes> = serde_json::from_value(body).unwrap();
    let workflow = Workflow::from(document.data);

    assert_eq!(workflow.id, "wf-1");
    assert_eq!(workflow.name, "Release");
    assert!(workflow.is_enabled);
    assert_eq!(workflow.repository_name.as_deref(), Some("cheffy-app"));
}

#[test]
fn test_workflow_collection_and_unknown_attributes_tolerated() {
    // Extra attributes the SDK does not model must not break parsing.
    let body = json!({
        "data": [
            {
                "type": "ciWorkflows",
                "id": "wf-1",
                "attributes": {
                    "name": "Nightly",
                    "isEnabled": false,
                    "containerFilePath": "Cheffy.xcodeproj",
                    "lastModifiedDate": "2025-05-30T08:00:00Z"
                }
            }
        ]
    });

    let document: CollectionDocument<WorkflowAttributes> = serde_json::from_value(body).unwrap();
    assert_eq!(document.data.len(), 1);

    let workflow = Workflow::from(document.data.into_iter().next().unwrap());
    assert_eq!(workflow.name, "Nightly");
    assert!(!workflow.is_enabled);
    assert_eq!(workflow.repository_name, None);
}

#[test]
fn test_completion_status_wire_values() {
    for (wire, status) in [
        ("PENDING", CompletionStatus::Pending),
        ("RUNNING", CompletionStatus::Running),
        ("SUCCEEDED", CompletionStatus::Succeeded),
        ("FAILED", CompletionStatus::Failed),
        ("CANCELED", CompletionStatus::Canceled),
        ("ERRORED", CompletionStatus::Errored),
    ] {
        let parsed: CompletionStatus =
            serde_json::from_value(json!(wire)).unwrap();
        assert_eq!(parsed, status);
        assert_eq!(serde_json::to_value(status).unwrap(), json!(wire));
    }
}

#[test]
fn test_build_without_relationships_or_status() {
    // A build that is still in flight has no completionStatus; responses may
    // also omit the relationships block entirely.
    let body = json!({
        "data": {
            "type": "ciBuildRuns",
            "id": "build-1",
            "attributes": {
                "number": 8,
                "createdDate": "2025-06-01T12:00:00Z",
                "startedDate": "2025-06-01T12:00:10Z"
            }
        }
    });

    let document: Document<BuildAttributes> = serde_json::from_value(body).unwrap();
    let build = Build::from(document.data);

    assert_eq!(build.id, "build-1");
    assert_eq!(build.number, Some(8));
    assert_eq!(build.completion_status, None);
    assert_eq!(build.workflow_id, None);
    assert_eq!(build.started_date.as_deref(), Some("2025-06-01T12:00:10Z"));
    assert_eq!(build.finished_date, None);
}

#[test]
fn test_build_workflow_relationship_extracted() {
    let body = json!({
        "data": {
            "type": "ciBuildRuns",
            "id": "build-2",
            "attributes": {
                "number": 9,
                "completionStatus": "SUCCEEDED",
                "createdDate": "2025-06-01T12:00:00Z"
            },
            "relationships": {
                "workflow": { "data": { "type": "ciWorkflows", "id": "wf-42" } },
                "product": { "data": { "type": "ciProducts", "id": "prod-1" } }
            }
        }
    });

    let document: Document<BuildAttributes> = serde_json::from_value(body).unwrap();
    let build = Build::from(document.data);

    assert_eq!(build.workflow_id.as_deref(), Some("wf-42"));
    assert_eq!(build.completion_status, Some(CompletionStatus::Succeeded));
}

#[test]
fn test_artifact_attributes_mapping() {
    let resource: Resource<ArtifactAttributes> = serde_json::from_value(json!({
        "type": "ciArtifacts",
        "id": "artifact-1",
        "attributes": {
            "fileName": "Cheffy.ipa",
            "fileSize": 2048,
            "downloadUrl": "https://example.com/Cheffy.ipa"
        }
    }))
    .unwrap();

    let artifact = Artifact::from(resource);
    assert_eq!(artifact.id, "artifact-1");
    assert_eq!(artifact.file_name.as_deref(), Some("Cheffy.ipa"));
    assert_eq!(artifact.file_size, Some(2048));
    assert_eq!(
        artifact.download_url.as_deref(),
        Some("https://example.com/Cheffy.ipa")
    );
}

#[test]
fn test_create_build_request_single_source_only() {
    let branch = CreateBuildRequest::new(Some(BuildSource::Branch("main".to_string())));
    assert_eq!(
        serde_json::to_value(&branch).unwrap(),
        json!({ "data": { "type": "ciBuildRuns", "attributes": { "branch": "main" } } })
    );

    let tag = CreateBuildRequest::new(Some(BuildSource::Tag("v1.0".to_string())));
    assert_eq!(
        serde_json::to_value(&tag).unwrap(),
        json!({ "data": { "type": "ciBuildRuns", "attributes": { "tag": "v1.0" } } })
    );

    let commit = CreateBuildRequest::new(Some(BuildSource::Commit("abc123".to_string())));
    assert_eq!(
        serde_json::to_value(&commit).unwrap(),
        json!({ "data": { "type": "ciBuildRuns", "attributes": { "commit": "abc123" } } })
    );
}

#[test]
fn test_create_build_request_empty_attributes_without_source() {
    let request = CreateBuildRequest::new(None);
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({ "data": { "type": "ciBuildRuns", "attributes": {} } })
    );
}

#[test]
fn test_cancel_build_request_shape() {
    let request = CancelBuildRequest::new("build-1");
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "data": {
                "type": "ciBuildRuns",
                "id": "build-1",
                "attributes": { "canceled": true }
            }
        })
    );
}
