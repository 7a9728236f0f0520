//! Integration tests for `ForwardClient::send_batch` against a wiremock
//! server. No real network traffic is made.

use chrono::Utc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vigil_core::{Record, RiskLevel};
use vigil_forward::{ForwardClient, ForwardError};

fn test_record(id: &str, title: &str) -> Record {
    let mut record = Record::new(
        id.to_string(),
        title.to_string(),
        "Enforcement action with penalty.".to_string(),
        "SEC News",
        "Regulatory",
        None,
        Utc::now(),
        vec!["SEC".to_string()],
    );
    record.risk_level = RiskLevel::Critical;
    record.severity = record.risk_level.severity();
    record.priority = record.risk_level.priority();
    record
}

fn client_for(server: &MockServer, token: Option<&str>) -> ForwardClient {
    let endpoint = format!("{}/api/news/process", server.uri());
    ForwardClient::new(&endpoint, token, 5, "vigil-test/0.1").expect("failed to build client")
}

#[tokio::test]
async fn send_batch_posts_articles_envelope_and_succeeds_on_200() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/news/process"))
        .and(body_partial_json(serde_json::json!({
            "articles": [{
                "title": "Penalty announced",
                "source": "SEC News",
                "riskLevel": "Critical",
                "severity": "Critical",
                "status": "Active",
                "priority": 1
            }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let records = vec![test_record("https://example.com/a", "Penalty announced")];

    let result = client.send_batch(&records).await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[tokio::test]
async fn send_batch_attaches_bearer_token_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/news/process"))
        .and(header("authorization", "Bearer intake-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("intake-token"));
    let records = vec![test_record("https://example.com/a", "Penalty announced")];

    client
        .send_batch(&records)
        .await
        .expect("authorized batch should succeed");
}

#[tokio::test]
async fn non_200_response_is_a_total_batch_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/news/process"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let records = vec![
        test_record("https://example.com/a", "Penalty announced"),
        test_record("https://example.com/b", "Routine update"),
    ];

    let err = client.send_batch(&records).await.expect_err("should fail");
    assert!(matches!(
        err,
        ForwardError::UnexpectedStatus { status: 500 }
    ));
}

#[tokio::test]
async fn empty_batch_makes_no_request() {
    let server = MockServer::start().await;

    // No mock mounted: any request would return 404 and the .expect(0)
    // below would flag it at drop time.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    client
        .send_batch(&[])
        .await
        .expect("empty batch should be a no-op");
}
