//! End-to-end delivery tests against a stub collector.

use std::collections::HashMap;

use serde_json::json;
use siteline_tracker::{
    CustomEvent, FormSubmission, Identity, PageView, SessionStart, Tracker, TrackerConfig,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tracker_for(server: &MockServer) -> Tracker {
    let config = TrackerConfig::new("test-key")
        .with_endpoint(format!("{}/api/v1/tracking/collect", server.uri()));
    Tracker::new(config).unwrap()
}

#[tokio::test]
async fn test_send_returns_true_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tracking/collect"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({"apiKey": "test-key", "type": "page.view"})))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let tracker = tracker_for(&server);
    let delivered = tracker
        .track_page_view(PageView {
            visitor_id: "v-1".into(),
            session_id: "s-1".into(),
            url: "https://example.com/products".into(),
            ..Default::default()
        })
        .await;
    assert!(delivered);
}

#[tokio::test]
async fn test_send_returns_false_on_server_errors() {
    for status in [500_u16, 404, 401] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let tracker = tracker_for(&server);
        let delivered = tracker
            .track_event(CustomEvent {
                visitor_id: "v-1".into(),
                session_id: "s-1".into(),
                name: "button_click".into(),
                ..Default::default()
            })
            .await;
        assert!(!delivered, "status {status} must not count as delivered");
    }
}

#[tokio::test]
async fn test_only_exactly_200_counts_as_success() {
    // 2xx is not enough; the collector acknowledges with 200 alone.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let tracker = tracker_for(&server);
    let delivered = tracker.end_session("v-1", "s-1", None).await;
    assert!(!delivered);
}

#[tokio::test]
async fn test_send_returns_false_on_connection_error() {
    // Nothing listens on this endpoint; the failure must collapse to false.
    let config = TrackerConfig::new("test-key")
        .with_endpoint("http://127.0.0.1:9/collect")
        .with_timeout_secs(1);
    let tracker = Tracker::new(config).unwrap();

    let delivered = tracker
        .track_page_view(PageView {
            visitor_id: "v-1".into(),
            session_id: "s-1".into(),
            url: "https://example.com/".into(),
            ..Default::default()
        })
        .await;
    assert!(!delivered);
}

#[tokio::test]
async fn test_slow_collector_hits_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let config = TrackerConfig::new("test-key")
        .with_endpoint(format!("{}/collect", server.uri()))
        .with_timeout_secs(1);
    let tracker = Tracker::new(config).unwrap();

    let delivered = tracker
        .identify(Identity {
            visitor_id: "v-1".into(),
            session_id: "s-1".into(),
            email: Some("a@b.com".into()),
            ..Default::default()
        })
        .await;
    assert!(!delivered);
}

#[tokio::test]
async fn test_start_session_generates_fresh_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"type": "session.start"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let tracker = tracker_for(&server);
    let first = tracker
        .start_session(SessionStart {
            visitor_id: "v-1".into(),
            ..Default::default()
        })
        .await;
    let second = tracker
        .start_session(SessionStart {
            visitor_id: "v-1".into(),
            ..Default::default()
        })
        .await;

    assert!(!first.session_id.is_empty());
    assert_ne!(first.session_id, second.session_id);
    assert_eq!(first.visitor_id, "v-1");
}

#[tokio::test]
async fn test_form_fields_masked_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let tracker = tracker_for(&server);
    tracker
        .track_form_submission(FormSubmission {
            visitor_id: "v-1".into(),
            session_id: "s-1".into(),
            form_id: "signup".into(),
            fields: HashMap::from([
                ("password".to_string(), "hunter2".to_string()),
                ("email".to_string(), "a@b.com".to_string()),
            ]),
            ..Default::default()
        })
        .await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(body["type"], "form.submit");
    assert_eq!(body["data"]["fields"]["password"], "***");
    assert_eq!(body["data"]["fields"]["email"], "a@b.com");
}

#[tokio::test]
async fn test_identify_envelope_drops_null_traits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let tracker = tracker_for(&server);
    tracker
        .identify(Identity {
            visitor_id: "v-1".into(),
            session_id: "s-1".into(),
            name: Some("Jane".into()),
            email: None,
            ..Default::default()
        })
        .await;

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(body["apiKey"], "test-key");
    assert_eq!(body["type"], "user.identify");
    let traits = body["data"]["traits"].as_object().unwrap();
    assert_eq!(traits["name"], "Jane");
    assert!(!traits.contains_key("email"));
}
