//! Tests for wts2-tracker: JiraClient against a mock Jira, and QueueResolver

use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use wts2_core::{FieldConfig, IssueKey, TrackerConfig};
use wts2_tracker::*;

fn tracker_config(base_url: &str) -> TrackerConfig {
    TrackerConfig {
        base_url: base_url.to_string(),
        user: "bot@example.com".into(),
        token: "token-123".into(),
        request_timeout_secs: 5,
        ..TrackerConfig::default()
    }
}

fn field_config() -> FieldConfig {
    FieldConfig {
        group: "customfield_1".into(),
        priority: "customfield_2".into(),
    }
}

fn client(server: &MockServer) -> JiraClient {
    JiraClient::new(&tracker_config(&server.base_url()), &field_config()).unwrap()
}

// ===========================================================================
// fetch_page
// ===========================================================================

#[tokio::test]
async fn fetch_page_sends_query_and_parses_issues() {
    let server = MockServer::start_async().await;
    let search = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/api/latest/search")
                .query_param("jql", "project = WTS2 ORDER BY rank")
                .query_param("fields", "customfield_1,customfield_2")
                .query_param("startAt", "50")
                .query_param("maxResults", "50")
                .header_exists("authorization");
            then.status(200).json_body(json!({
                "startAt": 50,
                "maxResults": 50,
                "total": 51,
                "issues": [
                    {"key": "WTS2-9", "fields": {"customfield_1": {"value": "PI 1"}, "customfield_2": 4.0}}
                ]
            }));
        })
        .await;

    let page = client(&server)
        .fetch_page(
            "project = WTS2 ORDER BY rank",
            &["customfield_1", "customfield_2"],
            50,
            50,
        )
        .await
        .unwrap();

    search.assert_async().await;
    assert_eq!(page.total, 51);
    assert_eq!(page.issues.len(), 1);
    let record = page.issues[0].to_record(&field_config());
    assert_eq!(record.key.as_str(), "WTS2-9");
    assert_eq!(record.group.as_deref(), Some("PI 1"));
    assert_eq!(record.priority, Some(4.0));
}

#[tokio::test]
async fn fetch_page_malformed_body_is_protocol_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/api/latest/search");
            then.status(200).body("<html>login</html>");
        })
        .await;

    let err = client(&server)
        .fetch_page("jql", &["f"], 0, 50)
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::Protocol(_)), "got {:?}", err);
}

#[tokio::test]
async fn fetch_page_error_status_is_protocol_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/api/latest/search");
            then.status(400)
                .json_body(json!({"errorMessages": ["bad jql"]}));
        })
        .await;

    let err = client(&server)
        .fetch_page("jql", &["f"], 0, 50)
        .await
        .unwrap_err();
    match err {
        TrackerError::Protocol(message) => assert!(message.contains("bad jql")),
        other => panic!("Expected Protocol, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_tracker_is_transport_error() {
    let client = JiraClient::new(&tracker_config("http://127.0.0.1:1"), &field_config()).unwrap();
    let err = client.fetch_page("jql", &["f"], 0, 50).await.unwrap_err();
    assert!(matches!(err, TrackerError::Transport(_)), "got {:?}", err);
}

// ===========================================================================
// update_priority
// ===========================================================================

#[tokio::test]
async fn update_priority_puts_single_field() {
    let server = MockServer::start_async().await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/rest/api/latest/issue/WTS2-3")
                .json_body(json!({"fields": {"customfield_2": 2}}));
            then.status(204);
        })
        .await;

    client(&server)
        .update_priority(&IssueKey::new("WTS2-3"), 2)
        .await
        .unwrap();
    update.assert_async().await;
}

#[tokio::test]
async fn update_priority_non_204_is_update_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/rest/api/latest/issue/WTS2-4");
            then.status(400).body("Field 'customfield_2' cannot be set");
        })
        .await;

    let err = client(&server)
        .update_priority(&IssueKey::new("WTS2-4"), 1)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        TrackerError::Update {
            status_code: 400,
            body: "Field 'customfield_2' cannot be set".into(),
            reason: "Bad Request".into(),
        }
    );
    assert_eq!(
        err.to_string(),
        "400 Field 'customfield_2' cannot be set Bad Request"
    );
}

#[tokio::test]
async fn update_priority_200_is_not_success() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/rest/api/latest/issue/WTS2-5");
            then.status(200).body("{}");
        })
        .await;

    let err = client(&server)
        .update_priority(&IssueKey::new("WTS2-5"), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::Update { status_code: 200, .. }));
}

// ===========================================================================
// validate_issue_key
// ===========================================================================

#[tokio::test]
async fn validate_issue_key_matches_exact_key() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/api/latest/issue/WTS2-250")
                .query_param("fields", "key");
            then.status(200).json_body(json!({"id": "1", "key": "WTS2-250"}));
        })
        .await;

    assert!(client(&server).validate_issue_key(&IssueKey::new("WTS2-250")).await);
}

#[tokio::test]
async fn validate_issue_key_moved_issue_is_invalid() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/api/latest/issue/OLD-1");
            then.status(200).json_body(json!({"key": "WTS2-77"}));
        })
        .await;

    assert!(!client(&server).validate_issue_key(&IssueKey::new("OLD-1")).await);
}

#[tokio::test]
async fn validate_issue_key_not_found_is_invalid() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/api/latest/issue/WTS2-999");
            then.status(404)
                .json_body(json!({"errorMessages": ["Issue does not exist"]}));
        })
        .await;

    assert!(!client(&server).validate_issue_key(&IssueKey::new("WTS2-999")).await);
}

#[tokio::test]
async fn validate_issue_key_transport_failure_is_invalid() {
    let client = JiraClient::new(&tracker_config("http://127.0.0.1:1"), &field_config()).unwrap();
    assert!(!client.validate_issue_key(&IssueKey::new("WTS2-1")).await);
}

// ===========================================================================
// QueueResolver
// ===========================================================================

#[tokio::test]
async fn queue_resolver_fetches_jql_once() {
    let server = MockServer::start_async().await;
    let queue = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/servicedeskapi/servicedesk/WTS2/queue/42");
            then.status(200)
                .json_body(json!({"id": 42, "name": "Top 10", "jql": "filter = 123"}));
        })
        .await;

    let resolver = QueueResolver::new(Arc::new(client(&server)), "42");
    assert_eq!(resolver.resolve_filter_expression().await.unwrap(), "filter = 123");
    assert_eq!(resolver.resolve_filter_expression().await.unwrap(), "filter = 123");
    queue.assert_hits_async(1).await;
}

#[tokio::test]
async fn queue_resolver_does_not_cache_failures() {
    let server = MockServer::start_async().await;
    let queue = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/servicedeskapi/servicedesk/WTS2/queue/42");
            then.status(500).body("oops");
        })
        .await;

    let resolver = QueueResolver::new(Arc::new(client(&server)), "42");
    assert!(resolver.resolve_filter_expression().await.is_err());
    assert!(resolver.resolve_filter_expression().await.is_err());
    queue.assert_hits_async(2).await;
}
