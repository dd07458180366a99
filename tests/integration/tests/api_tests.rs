//! API Integration Tests
//!
//! Each test spawns its own server backed by an in-memory directory.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use family_core::{AccountStatus, DirectoryRecord, MemberFields};
use family_directory::DirectoryOperation;
use integration_tests::{
    assert_json, assert_status, fixtures::*, test_config, TestServer,
};
use reqwest::StatusCode;

// ============================================================================
// Health and state
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_initial_state_is_empty() {
    let server = TestServer::start().await.unwrap();
    let state = server.state().await.unwrap();

    assert!(!state.signed_in);
    assert!(state.identity.is_none());
    assert!(state.members.is_empty());
    assert!(state.last_error.is_none());
}

// ============================================================================
// Account check
// ============================================================================

#[tokio::test]
async fn test_account_check_loads_roster() {
    let server = TestServer::start().await.unwrap();
    let state = server.sign_in().await.unwrap();

    assert!(state.signed_in);
    assert_eq!(state.account_status.as_deref(), Some("available"));
    assert_eq!(state.identity.as_ref().unwrap().id, "device1");
    assert_eq!(state.members.len(), 3);

    let me = state.member_by_device("device1").unwrap();
    assert!(me.is_current_user);
    assert_eq!(me.name, "John Smith");
    assert_eq!(me.role, "Owner");
}

#[tokio::test]
async fn test_missing_account_is_registered_as_owner() {
    let server = TestServer::start_with_config(test_config("u2", true))
        .await
        .unwrap();
    let state = server.sign_in().await.unwrap();

    assert_eq!(state.members.len(), 4);
    let me = state.member_by_device("u2").unwrap();
    assert_eq!(me.role, "Owner");
    assert_eq!(me.name, "Family Member");
    assert!(!me.pending);
    assert_eq!(server.directory.records().len(), 4);
}

#[tokio::test]
async fn test_unavailable_account() {
    let mut config = test_config("u1", false);
    config.directory.account_status = AccountStatus::Restricted;
    let server = TestServer::start_with_config(config).await.unwrap();

    let response = server.post_empty("/api/v1/account/check").await.unwrap();
    assert_status(response, StatusCode::ACCEPTED).await.unwrap();

    let state = server
        .wait_for_state(|s| s.last_error.is_some())
        .await
        .unwrap();
    assert!(!state.signed_in);
    assert_eq!(state.error_code(), Some("ACCOUNT_UNAVAILABLE"));
    assert_eq!(state.last_error.unwrap().message, "Account not available: 2");
}

#[tokio::test]
async fn test_account_changed_resyncs() {
    let server = TestServer::start().await.unwrap();
    server.sign_in().await.unwrap();

    server.directory.set_account_id("u5");
    let response = server.post_empty("/api/v1/account/changed").await.unwrap();
    assert_status(response, StatusCode::ACCEPTED).await.unwrap();

    let state = server
        .wait_for_state(|s| {
            s.identity.as_ref().is_some_and(|i| i.id == "u5") && s.is_current_user_member && !s.loading
        })
        .await
        .unwrap();
    assert_eq!(state.members.len(), 4);
    assert!(!state.member_by_device("device1").unwrap().is_current_user);
}

// ============================================================================
// Members
// ============================================================================

#[tokio::test]
async fn test_members_carry_permissions() {
    let server = TestServer::start().await.unwrap();
    server.sign_in().await.unwrap();

    let response = server.get("/api/v1/members").await.unwrap();
    let members: Vec<MemberResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    let admin = members.iter().find(|m| m.role == "Admin").unwrap();
    assert!(admin.permissions.contains(&"ADD_MEMBERS".to_string()));
    assert!(!admin.permissions.contains(&"REMOVE_MEMBERS".to_string()));

    let owner = members.iter().find(|m| m.role == "Owner").unwrap();
    assert!(owner.permissions.contains(&"REMOVE_MEMBERS".to_string()));
    assert!(members.iter().all(|m| m.is_active));
}

#[tokio::test]
async fn test_register_self_without_identity() {
    let server = TestServer::start().await.unwrap();

    let response = server.post_empty("/api/v1/members/self").await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body.error.code, "MISSING_IDENTITY");
}

#[tokio::test]
async fn test_register_self_is_idempotent() {
    let server = TestServer::start().await.unwrap();
    server.sign_in().await.unwrap();

    for _ in 0..3 {
        let response = server
            .post("/api/v1/members/self", &RegisterSelfBody::with_role("Admin"))
            .await
            .unwrap();
        let state: StateResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
        assert_eq!(state.members.len(), 3);
    }
    assert_eq!(server.directory.call_count(DirectoryOperation::SaveRecord), 0);
}

#[tokio::test]
async fn test_register_self_rejects_unknown_role() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/api/v1/members/self", &RegisterSelfBody::with_role("Guest"))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_BODY");
}

#[tokio::test]
async fn test_remove_member() {
    let server = TestServer::start().await.unwrap();
    server.sign_in().await.unwrap();

    let response = server.delete("/api/v1/members/3").await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let state = server.state().await.unwrap();
    assert_eq!(state.members.len(), 2);
    assert!(state.member_by_device("device3").is_none());
    assert_eq!(server.directory.records().len(), 2);
}

#[tokio::test]
async fn test_remove_unknown_member_is_noop() {
    let server = TestServer::start().await.unwrap();
    server.sign_in().await.unwrap();

    let response = server.delete("/api/v1/members/nope").await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let state = server.state().await.unwrap();
    assert_eq!(state.members.len(), 3);
    assert!(state.last_error.is_none());
}

#[tokio::test]
async fn test_failed_remove_is_rolled_back() {
    let server = TestServer::start().await.unwrap();
    let before = server.sign_in().await.unwrap();
    server.directory.fail(DirectoryOperation::DeleteRecord);

    let response = server.delete("/api/v1/members/2").await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let state = server.state().await.unwrap();
    let ids: Vec<_> = state.members.iter().map(|m| m.id.clone()).collect();
    let before_ids: Vec<_> = before.members.iter().map(|m| m.id.clone()).collect();
    assert_eq!(ids, before_ids);
    assert_eq!(state.error_code(), Some("TRANSPORT_FAILURE"));
}

#[tokio::test]
async fn test_refresh_picks_up_remote_changes() {
    let server = TestServer::start().await.unwrap();
    server.sign_in().await.unwrap();

    server.directory.insert_record(DirectoryRecord::new(
        "r9",
        MemberFields {
            name: Some("Sam Smith".into()),
            role: Some("Viewer".into()),
            device_id: Some("device9".into()),
            ..Default::default()
        },
    ));

    let response = server.post_empty("/api/v1/roster/refresh").await.unwrap();
    let state: StateResponse = assert_json(response, StatusCode::OK).await.unwrap();

    let sam = state.member_by_device("device9").unwrap();
    assert_eq!(sam.id, "r9");
    assert_eq!(sam.role, "Viewer");
    assert!(sam.permissions.is_empty());
}

// ============================================================================
// Invites
// ============================================================================

#[tokio::test]
async fn test_invite_requires_membership() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/api/v1/invites", &InviteBody::new("Alex", "Member"))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "NOT_REGISTERED");

    let total: u64 = DirectoryOperation::ALL
        .iter()
        .map(|op| server.directory.call_count(*op))
        .sum();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_create_invite() {
    let server = TestServer::start().await.unwrap();
    server.sign_in().await.unwrap();

    let response = server
        .post("/api/v1/invites", &InviteBody::new("Alex Smith", "viewer"))
        .await
        .unwrap();
    let invite: InvitationResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(invite.name, "Alex Smith");
    assert_eq!(invite.role, "Viewer");
    assert_eq!(invite.inviter_id, "device1");
    assert!(invite
        .url
        .starts_with(&format!("https://familycar.app/invite?code={}", invite.token)));
    assert!(invite.url.ends_with("&name=Alex+Smith&role=Viewer"));

    // Nothing written anywhere
    assert_eq!(server.state().await.unwrap().members.len(), 3);
    assert_eq!(server.directory.records().len(), 3);
}

#[tokio::test]
async fn test_invite_validation() {
    let server = TestServer::start().await.unwrap();
    server.sign_in().await.unwrap();

    let response = server
        .post("/api/v1/invites", &InviteBody::new("", "Member"))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");
}
