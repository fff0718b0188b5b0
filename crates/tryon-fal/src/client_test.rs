use super::*;

fn test_client(status_base: &str) -> FalClient {
    FalClient::with_endpoints("key-id:secret", 30, "https://queue.fal.run/submit", status_base)
        .expect("client construction should not fail")
}

#[test]
fn status_url_appends_request_id_segment() {
    let client = test_client("https://queue.fal.run/fal-ai/image-apps-v2/requests");
    assert_eq!(
        client.status_url("abc-123").as_str(),
        "https://queue.fal.run/fal-ai/image-apps-v2/requests/abc-123"
    );
}

#[test]
fn status_url_tolerates_trailing_slash() {
    let client = test_client("https://queue.fal.run/fal-ai/image-apps-v2/requests/");
    assert_eq!(
        client.status_url("abc").as_str(),
        "https://queue.fal.run/fal-ai/image-apps-v2/requests/abc"
    );
}

#[test]
fn status_url_encodes_request_id_as_single_segment() {
    let client = test_client("https://queue.fal.run/requests");
    let url = client.status_url("../../admin");
    assert!(
        url.as_str().starts_with("https://queue.fal.run/requests/"),
        "request id must not escape the base path: {url}"
    );
    assert!(url.as_str().contains("%2F"), "slash should be encoded: {url}");
}

#[test]
fn auth_header_uses_key_scheme() {
    let client = test_client("https://queue.fal.run/requests");
    assert_eq!(client.auth_header(), "Key key-id:secret");
}

#[test]
fn debug_redacts_api_key() {
    let client = test_client("https://queue.fal.run/requests");
    let rendered = format!("{client:?}");
    assert!(!rendered.contains("secret"), "key leaked: {rendered}");
}

#[test]
fn invalid_submit_url_is_rejected() {
    let result = FalClient::with_endpoints("k", 30, "not a url", DEFAULT_STATUS_BASE_URL);
    assert!(matches!(
        result,
        Err(GenerationError::InvalidEndpoint { .. })
    ));
}

#[test]
fn status_base_without_path_support_is_rejected() {
    let result = FalClient::with_endpoints("k", 30, DEFAULT_SUBMIT_URL, "mailto:ops@example.com");
    assert!(matches!(
        result,
        Err(GenerationError::InvalidEndpoint { .. })
    ));
}

#[test]
fn new_targets_production_queue() {
    let client = FalClient::new("key-id:secret", 30).expect("client");
    assert_eq!(client.submit_url.as_str(), DEFAULT_SUBMIT_URL);
    assert_eq!(
        client.status_url("abc").as_str(),
        format!("{}/abc", DEFAULT_STATUS_BASE_URL.trim_end_matches('/'))
    );
}
