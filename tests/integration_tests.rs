//! Integration tests using wiremock to simulate the Dateno API.

use dateno::hooks::{Hook, HookContext};
use dateno::models::{SearchDslParams, StatsListParams};
use dateno::retry::{BackoffStrategy, RetryConfig};
use dateno::{CallOptions, Dateno, Error, BODY_PREVIEW_LIMIT};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sdk(server: &MockServer) -> Dateno {
    Dateno::builder()
        .server_url(server.uri())
        .api_key_query("test-key")
        .build()
        .unwrap()
}

fn fast_retries(retry_connection_errors: bool) -> RetryConfig {
    RetryConfig::backoff(
        BackoffStrategy {
            initial_interval: Duration::from_millis(10),
            max_interval: Duration::from_millis(20),
            exponent: 1.5,
            max_elapsed_time: Duration::from_millis(200),
        },
        retry_connection_errors,
    )
}

/// Records every hook invocation.
#[derive(Clone, Default)]
struct Recorder {
    log: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.log.lock().unwrap().push(event);
    }
}

impl Hook for Recorder {
    fn before_request(
        &self,
        ctx: &HookContext,
        request: reqwest::Request,
    ) -> dateno::Result<reqwest::Request> {
        self.push(format!("before:{}", ctx.operation_id()));
        Ok(request)
    }

    fn after_success(
        &self,
        _ctx: &HookContext,
        response: reqwest::Response,
    ) -> dateno::Result<reqwest::Response> {
        self.push(format!("success:{}", response.status().as_u16()));
        Ok(response)
    }

    fn after_error(
        &self,
        _ctx: &HookContext,
        response: Option<reqwest::Response>,
        error: Option<Error>,
    ) -> (Option<reqwest::Response>, Option<Error>) {
        let status = response.as_ref().map(|r| r.status().as_u16().to_string());
        self.push(format!("error:{}", status.unwrap_or_else(|| "none".to_string())));
        (response, error)
    }

    fn after_all(
        &self,
        _ctx: &HookContext,
        outcome: std::result::Result<&reqwest::Response, &Error>,
    ) -> dateno::Result<()> {
        self.push(format!("all:{}", if outcome.is_ok() { "ok" } else { "err" }));
        Ok(())
    }
}

#[tokio::test]
async fn test_healthz_sends_security_and_client_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthz"))
        .and(query_param("apikey", "test-key"))
        .and(header_exists("dateno-client"))
        .and(header("accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "ok", "elasticsearch": true})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = sdk(&mock_server).service().get_healthz(None).await.unwrap();

    assert!(response.data.is_ok());
    assert_eq!(response.data.elasticsearch, Some(true));
    assert_eq!(response.status.as_u16(), 200);
    assert!(response.raw_body.contains("\"ok\""));
}

#[tokio::test]
async fn test_dateno_client_header_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&mock_server)
        .await;

    sdk(&mock_server).service().get_healthz(None).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let headers = &requests[0].headers;
    let value = headers.get("dateno-client").unwrap().to_str().unwrap();
    assert_eq!(value, format!("sdk-rust/{}", env!("CARGO_PKG_VERSION")));
}

#[tokio::test]
async fn test_json_404_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/statsdb/0.1/ns/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found"})))
        .mount(&mock_server)
        .await;

    let result = sdk(&mock_server)
        .statistics()
        .get_namespace("missing", None)
        .await;

    match result {
        Err(Error::Api {
            status,
            data,
            raw_response,
            ..
        }) => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(data.detail, Some(json!("Not found")));
            assert!(raw_response.contains("Not found"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_json_422_is_validation_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/statsdb/0.1/ns"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{
                "loc": ["query", "limit"],
                "msg": "must be positive",
                "type": "value_error"
            }]
        })))
        .mount(&mock_server)
        .await;

    let result = sdk(&mock_server)
        .statistics()
        .list_namespaces(&StatsListParams::new(0, 0), None)
        .await;

    match result {
        Err(Error::Validation { status, data, .. }) => {
            assert_eq!(status.as_u16(), 422);
            assert_eq!(data.detail[0].msg, "must be positive");
            assert_eq!(data.detail[0].kind, "value_error");
        }
        other => panic!("Expected Validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_success_body_is_response_validation_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 5})))
        .mount(&mock_server)
        .await;

    let result = sdk(&mock_server).service().get_healthz(None).await;

    match result {
        Err(Error::ResponseValidation {
            message,
            status,
            raw_response,
            ..
        }) => {
            assert_eq!(message, "Response validation failed");
            assert_eq!(status.as_u16(), 200);
            assert_eq!(raw_response, r#"{"status":5}"#);
        }
        other => panic!("Expected ResponseValidation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_plain_text_500_is_default_error_with_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let err = sdk(&mock_server)
        .service()
        .get_healthz(None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Default { .. }));
    let s = err.to_string();
    assert!(s.starts_with("API error occurred"), "{}", s);
    assert!(s.contains("Status 500"));
    assert!(s.contains("text/plain"));
    assert!(s.contains("upstream exploded"));
}

#[tokio::test]
async fn test_default_error_body_is_bounded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(
            ResponseTemplate::new(502).set_body_string("x".repeat(BODY_PREVIEW_LIMIT * 3)),
        )
        .mount(&mock_server)
        .await;

    let err = sdk(&mock_server)
        .service()
        .get_healthz(None)
        .await
        .unwrap_err();

    assert_eq!(err.raw_response().map(str::len), Some(BODY_PREVIEW_LIMIT));
    assert!(err.to_string().contains(&"x".repeat(20)));
}

#[tokio::test]
async fn test_retry_on_503_then_success() {
    let mock_server = MockServer::start().await;
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(move |_req: &wiremock::Request| {
            let count = counter_clone.fetch_add(1, Ordering::SeqCst);
            if count < 2 {
                ResponseTemplate::new(503).set_body_string("busy")
            } else {
                ResponseTemplate::new(200).set_body_json(json!({"status": "ok"}))
            }
        })
        .mount(&mock_server)
        .await;

    let sdk = Dateno::builder()
        .server_url(mock_server.uri())
        .retry_config(fast_retries(false))
        .build()
        .unwrap();

    let response = sdk.service().get_healthz(None).await.unwrap();

    assert!(response.data.is_ok());
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_gives_up_after_max_elapsed_time() {
    let mock_server = MockServer::start().await;
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(move |_req: &wiremock::Request| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            ResponseTemplate::new(503).set_body_json(json!({"detail": "busy"}))
        })
        .mount(&mock_server)
        .await;

    let sdk = Dateno::builder()
        .server_url(mock_server.uri())
        .retry_config(fast_retries(false))
        .build()
        .unwrap();

    let err = sdk.service().get_healthz(None).await.unwrap_err();

    assert!(matches!(err, Error::Api { .. }), "{:?}", err);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    assert!(counter.load(Ordering::SeqCst) > 1);
}

#[tokio::test]
async fn test_non_retryable_status_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "nope"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sdk = Dateno::builder()
        .server_url(mock_server.uri())
        .retry_config(fast_retries(true))
        .build()
        .unwrap();

    let err = sdk.service().get_healthz(None).await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
}

#[tokio::test]
async fn test_connection_errors_retried_only_when_enabled() {
    for (enabled, expect_many) in [(true, true), (false, false)] {
        let recorder = Recorder::default();
        let sdk = Dateno::builder()
            .server_url("http://127.0.0.1:1")
            .retry_config(fast_retries(enabled))
            .hook(recorder.clone())
            .build()
            .unwrap();

        let err = sdk.service().get_healthz(None).await.unwrap_err();
        assert!(err.is_connection_error(), "{:?}", err);

        let attempts = recorder
            .events()
            .iter()
            .filter(|e| e.starts_with("before:"))
            .count();
        if expect_many {
            assert!(attempts > 1, "expected retries, got {} attempts", attempts);
        } else {
            assert_eq!(attempts, 1);
        }
        assert_eq!(
        recorder.events().last().map(String::as_str),
        Some("all:err")
    );
    }
}

#[tokio::test]
async fn test_missing_required_body_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/0.2/es_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = sdk(&mock_server)
        .search()
        .search_datasets_dsl(&SearchDslParams::default(), None, None)
        .await;

    assert!(matches!(result, Err(Error::RequestBodyRequired)));
}

#[tokio::test]
async fn test_dsl_search_posts_json_body() {
    let mock_server = MockServer::start().await;
    let dsl = json!({"query": {"match_all": {}}});

    Mock::given(method("POST"))
        .and(path("/search/0.2/es_search"))
        .and(query_param("limit", "1"))
        .and(header("content-type", "application/json"))
        .and(body_json(&dsl))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": {
                "total": {"value": 1, "relation": "eq"},
                "hits": [{"_id": "e1", "_source": {}}]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let params = SearchDslParams {
        limit: Some(1),
        ..Default::default()
    };
    let response = sdk(&mock_server)
        .search()
        .search_datasets_dsl(&params, Some(&dsl), None)
        .await
        .unwrap();

    assert_eq!(response.data.hits.hits[0].id, "e1");
}

#[tokio::test]
async fn test_hooks_run_in_order_on_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&mock_server)
        .await;

    let recorder = Recorder::default();
    let sdk = Dateno::builder()
        .server_url(mock_server.uri())
        .hook(recorder.clone())
        .build()
        .unwrap();

    sdk.service().get_healthz(None).await.unwrap();

    assert_eq!(
        recorder.events(),
        vec!["before:get_healthz", "success:200", "all:ok"]
    );
}

#[tokio::test]
async fn test_hooks_run_in_order_on_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
        .mount(&mock_server)
        .await;

    let recorder = Recorder::default();
    let sdk = Dateno::builder()
        .server_url(mock_server.uri())
        .hook(recorder.clone())
        .build()
        .unwrap();

    let err = sdk.service().get_healthz(None).await.unwrap_err();

    assert!(matches!(err, Error::Api { .. }));
    assert_eq!(
        recorder.events(),
        vec!["before:get_healthz", "error:500", "all:ok"]
    );
}

struct Deny;

impl Hook for Deny {
    fn after_error(
        &self,
        _ctx: &HookContext,
        _response: Option<reqwest::Response>,
        _error: Option<Error>,
    ) -> (Option<reqwest::Response>, Option<Error>) {
        (None, Some(Error::hook("denied by policy")))
    }
}

struct Swallow;

impl Hook for Swallow {
    fn after_error(
        &self,
        _ctx: &HookContext,
        _response: Option<reqwest::Response>,
        _error: Option<Error>,
    ) -> (Option<reqwest::Response>, Option<Error>) {
        (None, None)
    }
}

#[tokio::test]
async fn test_after_error_hook_can_raise() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let sdk = Dateno::builder()
        .server_url(mock_server.uri())
        .hook(Deny)
        .build()
        .unwrap();

    let err = sdk.service().get_healthz(None).await.unwrap_err();
    assert!(matches!(err, Error::Hook(_)));
    assert!(err.to_string().contains("denied by policy"));
}

#[tokio::test]
async fn test_swallowed_error_response_is_unexpected_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&mock_server)
        .await;

    let sdk = Dateno::builder()
        .server_url(mock_server.uri())
        .hook(Swallow)
        .build()
        .unwrap();

    let err = sdk.service().get_healthz(None).await.unwrap_err();
    assert!(err.to_string().starts_with("Unexpected error occurred"));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    assert_eq!(err.content_type(), Some("text/plain"));
    assert_eq!(err.raw_response(), Some(""));
}

#[tokio::test]
async fn test_swallowed_transport_error_is_no_response() {
    let sdk = Dateno::builder()
        .server_url("http://127.0.0.1:1")
        .hook(Swallow)
        .build()
        .unwrap();

    let err = sdk.service().get_healthz(None).await.unwrap_err();
    assert!(matches!(err, Error::NoResponse(_)));
    assert_eq!(err.to_string(), "No response received");
}

#[tokio::test]
async fn test_call_timeout_overrides_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "ok"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let sdk = Dateno::builder()
        .server_url(mock_server.uri())
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    let result = sdk
        .service()
        .get_healthz(Some(CallOptions::new().timeout(Duration::from_millis(50))))
        .await;
    assert!(matches!(result, Err(Error::Timeout)), "{:?}", result);

    let response = sdk.service().get_healthz(None).await.unwrap();
    assert!(response.data.is_ok());
}

#[tokio::test]
async fn test_call_options_override_server_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/registry/catalog/cdi00001616"))
        .and(header("x-request-id", "r-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cdi00001616", "name": "Portal", "software": "CKAN"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sdk = Dateno::builder()
        .server_url("http://127.0.0.1:1")
        .build()
        .unwrap();

    let options = CallOptions::new()
        .server_url(format!("{}/", mock_server.uri()))
        .header("X-Request-Id", "r-1")
        .unwrap();

    let catalog = sdk
        .data_catalogs()
        .get_catalog_by_id("cdi00001616", Some(options))
        .await
        .unwrap();

    assert_eq!(catalog.data.name.as_deref(), Some("Portal"));
    assert_eq!(catalog.data.extra["software"], "CKAN");
}

#[tokio::test]
async fn test_raw_entry_passes_apikey_param() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/raw/0.1/entry/abc123"))
        .and(query_param("apikey", "k"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "abc123", "raw": true})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let sdk = Dateno::builder()
        .server_url(mock_server.uri())
        .build()
        .unwrap();

    let entry = sdk
        .raw_data_access()
        .get_raw_entry_by_id("abc123", Some("k"), None)
        .await
        .unwrap();

    assert_eq!(entry.data.id(), Some("abc123"));
}

#[tokio::test]
async fn test_bearer_and_header_key_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/0.2/list_facets"))
        .and(header("authorization", "Bearer tok"))
        .and(header("x-api-key", "hk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["source.catalog_type"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sdk = Dateno::builder()
        .server_url(mock_server.uri())
        .bearer_auth("tok")
        .api_key_header("hk")
        .build()
        .unwrap();

    let facets = sdk.search().list_search_facets(None).await.unwrap();
    assert_eq!(facets.data, json!(["source.catalog_type"]));
}

#[tokio::test]
async fn test_basic_auth_header_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthz"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sdk = Dateno::builder()
        .server_url(mock_server.uri())
        .basic_auth("user", "pass")
        .build()
        .unwrap();

    let health = sdk.service().get_healthz(None).await.unwrap();
    assert!(health.data.is_ok());
}
