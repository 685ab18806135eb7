//! Integration tests for `ProjectDeskApi` against a mock backend.
//!
//! Each test mounts the endpoint it exercises on a [`MockServer`] and drives
//! the client through the `ProjectStore` trait, the way the session layer
//! does.

use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use projectdesk_client::ProjectDeskApi;
use projectdesk_core::project::{Department, LogoRef, LogoUpload, ProjectRecord};
use projectdesk_core::roster::NewMember;
use projectdesk_core::store::{ProjectStore, StoreError};
use projectdesk_core::types::{Date, MemberId};

fn api(server: &MockServer) -> ProjectDeskApi {
    ProjectDeskApi::new(format!("{}/api", server.uri()), Duration::from_secs(5))
        .expect("client should build")
}

fn draft() -> ProjectRecord {
    ProjectRecord {
        client_code: "AC-1".into(),
        company_name: "Acme".into(),
        project_name: "Portal".into(),
        start_date: Date::from_ymd_opt(2024, 1, 10),
        end_date: Date::from_ymd_opt(2024, 1, 20),
        allotted_billing_hours: "40".into(),
        department: Department::It,
        team_member_ids: vec![MemberId::new("m1")],
        ..ProjectRecord::blank()
    }
}

// ---------------------------------------------------------------------------
// Test: roster fetch decodes the success envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_roster_decodes_members() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/team-members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "_id": "m1", "firstName": "Jane", "lastName": "Doe" },
                { "_id": "m2", "firstName": "Raj", "lastName": "K" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let roster = api(&server).fetch_roster().await.expect("fetch should succeed");

    assert_eq!(roster.len(), 2);
    assert_eq!(roster[0].id, MemberId::new("m1"));
    assert_eq!(roster[1].full_name(), "Raj K");
}

// ---------------------------------------------------------------------------
// Test: roster fetch with success=false is a rejection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_roster_failure_envelope_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/team-members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let result = api(&server).fetch_roster().await;

    assert_matches!(result, Err(StoreError::Rejected { .. }));
}

// ---------------------------------------------------------------------------
// Test: batch add posts the members wrapper
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_roster_batch_posts_members() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/team-members/batch"))
        .and(body_json(json!({
            "members": [{ "firstName": "Ada", "lastName": "Lovelace" }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": [{ "_id": "m9", "firstName": "Ada", "lastName": "Lovelace" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = api(&server)
        .add_roster_batch(&[NewMember::new("Ada", "Lovelace")])
        .await
        .expect("batch add should succeed");

    assert_eq!(created.len(), 1);
    assert_eq!(created[0].id, MemberId::new("m9"));
}

// ---------------------------------------------------------------------------
// Test: 409 with a message surfaces the backend's text
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_roster_batch_conflict_carries_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/team-members/batch"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "success": false,
            "message": "Team member Jane Doe already exists"
        })))
        .mount(&server)
        .await;

    let result = api(&server)
        .add_roster_batch(&[NewMember::new("Jane", "Doe")])
        .await;

    assert_eq!(
        result,
        Err(StoreError::Rejected {
            message: "Team member Jane Doe already exists".into()
        })
    );
}

// ---------------------------------------------------------------------------
// Test: submit returns the stored record
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_project_returns_stored_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {
                "_id": "p1",
                "clientCode": "AC-1",
                "companyName": "Acme",
                "projectName": "Portal",
                "companyLogo": "/uploads/acme.png",
                "startDate": "2024-01-10T00:00:00.000Z",
                "endDate": "2024-01-20T00:00:00.000Z",
                "allottedBillingHours": 40,
                "department": "IT",
                "teamMembers": ["m1"]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut record = draft();
    record.company_logo = Some(LogoRef::Upload(LogoUpload {
        file_name: "acme.png".into(),
        mime_type: "image/png".into(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }));

    let stored = api(&server).submit_project(&record).await.expect("submit should succeed");

    assert_eq!(stored.id.as_deref(), Some("p1"));
    assert_eq!(stored.company_logo, Some(LogoRef::Remote("/uploads/acme.png".into())));
    assert_eq!(stored.start_date, Date::from_ymd_opt(2024, 1, 10));
    assert_eq!(stored.allotted_billing_hours, "40");
}

// ---------------------------------------------------------------------------
// Test: submit validation errors are joined
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_project_validation_errors_are_joined() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "errors": [{ "msg": "Client code exists" }, { "msg": "Bad department" }]
        })))
        .mount(&server)
        .await;

    let result = api(&server).submit_project(&draft()).await;

    assert_eq!(
        result,
        Err(StoreError::Rejected {
            message: "Client code exists, Bad department".into()
        })
    );
}

// ---------------------------------------------------------------------------
// Test: list without a success flag
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_projects_reads_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "_id": "p1", "projectName": "Portal", "department": "IT" },
                { "_id": "p2", "projectName": "Payroll", "department": "Finance" }
            ]
        })))
        .mount(&server)
        .await;

    let projects = api(&server).list_projects().await.expect("list should succeed");

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[1].department, Department::Finance);
}

// ---------------------------------------------------------------------------
// Test: a row with an unknown department is skipped, the rest still load
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_projects_skips_undecodable_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "_id": "p1", "projectName": "Portal", "department": "IT" },
                { "_id": "p2", "projectName": "Contracts", "department": "Legal" },
                { "_id": "p3", "projectName": "Payroll", "department": "Finance" }
            ]
        })))
        .mount(&server)
        .await;

    let projects = api(&server).list_projects().await.expect("list should succeed");

    let ids: Vec<_> = projects.iter().map(|p| p.id.as_deref()).collect();
    assert_eq!(ids, [Some("p1"), Some("p3")]);
    assert_eq!(projects[1].department, Department::Finance);
}

// ---------------------------------------------------------------------------
// Test: a non-JSON 200 body is an unexpected response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_projects_garbage_body_is_unexpected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = api(&server).list_projects().await;

    assert_matches!(result, Err(StoreError::Unexpected(_)));
}

// ---------------------------------------------------------------------------
// Test: unreachable backend is a transport failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_backend_is_transport_failure() {
    let api = ProjectDeskApi::new("http://127.0.0.1:9/api", Duration::from_secs(2))
        .expect("client should build");

    let result = api.list_projects().await;

    assert_matches!(result, Err(StoreError::Transport(_)));
}
