/// Integration tests with mocked upstream APIs
/// Tests the live identity insights and number insight flows without hitting real services
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use identity_insights_demo::client::IdentityClient;
use identity_insights_demo::config::Config;
use identity_insights_demo::handlers::AppState;
use identity_insights_demo::token::ApplicationClaims;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{any, body_partial_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRIVATE_KEY: &str = include_str!("fixtures/test_private_key.pem");
const PUBLIC_KEY: &str = include_str!("fixtures/test_public_key.pem");
const APPLICATION_ID: &str = "5a7e1c4b-0d2f-4e8a-9b3c-6f1d2e3a4b5c";

/// Helper function to create test config pointing both upstreams at the mock server
fn create_test_config(server_uri: &str, credentials: Credentials) -> Config {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert(
        "IDENTITY_INSIGHTS_URL".to_string(),
        format!("{}/v0.1/identity-insights", server_uri),
    );
    vars.insert(
        "NUMBER_INSIGHT_URL".to_string(),
        format!("{}/ni/standard/json", server_uri),
    );
    if credentials != Credentials::None {
        vars.insert("API_ACCOUNT_ID".to_string(), "test_key".to_string());
        vars.insert("API_ACCOUNT_SECRET".to_string(), "test_secret".to_string());
    }
    if credentials == Credentials::Full {
        vars.insert("VCR_API_APPLICATION_ID".to_string(), APPLICATION_ID.to_string());
        vars.insert("PRIVATE_KEY".to_string(), PRIVATE_KEY.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Credentials {
    None,
    AccountOnly,
    Full,
}

fn create_test_app(server: &MockServer, credentials: Credentials) -> Router {
    let config = create_test_config(&server.uri(), credentials);
    let client = IdentityClient::from_config(&config).unwrap();
    identity_insights_demo::app(Arc::new(AppState { config, client })).unwrap()
}

async fn post_json(app: Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn identity_insights_success() -> Value {
    json!({
        "request_id": "d4f5e6a7-1111-2222-3333-444455556666",
        "insights": {
            "format": {
                "country_code": "US",
                "country_name": "United States",
                "country_prefix": "1",
                "offline_location": "New York",
                "time_zones": ["America/New_York"],
                "number_international": "+12125550123",
                "number_national": "(212) 555-0123",
                "is_format_valid": true,
                "status": { "code": "OK", "message": "Success" }
            },
            "sim_swap": {
                "latest_sim_swap_at": "2023-11-02T09:15:00.000Z",
                "is_swapped": false,
                "status": { "code": "OK", "message": "Success" }
            },
            "current_carrier": {
                "name": "Verizon Wireless",
                "network_type": "MOBILE",
                "country_code": "US",
                "network_code": "310004",
                "status": { "code": "OK", "message": "Success" }
            },
            "original_carrier": {
                "name": "Verizon Wireless",
                "network_type": "MOBILE",
                "country_code": "US",
                "network_code": "310004"
            },
            "roaming": { "is_roaming": false, "country_codes": [] },
            "reachability": { "is_reachable": true, "connectivity": ["DATA", "SMS"] },
            "location_verification": {
                "is_verified": "TRUE",
                "latest_location_at": "2024-05-01T10:00:00.000Z"
            },
            "subscriber_match": {
                "given_name_match": "EXACT",
                "family_name_match": "EXACT",
                "status": { "code": "OK", "message": "Success" }
            }
        }
    })
}

#[tokio::test]
async fn test_phone_match_live_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v0.1/identity-insights"))
        .and(header_exists("authorization"))
        .and(body_partial_json(json!({
            "phone_number": "+12125550123",
            "purpose": "FraudPreventionAndDetection",
            "insights": {
                "format": {},
                "sim_swap": { "period": 240 },
                "current_carrier": {},
                "original_carrier": {},
                "roaming": {},
                "reachability": {},
                "location_verification": {
                    "location": {
                        "type": "CIRCLE",
                        "radius": 50000,
                        "center": { "latitude": 40.7128, "longitude": -74.006 }
                    }
                },
                "subscriber_match": { "given_name": "John", "family_name": "Doe" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(identity_insights_success()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server, Credentials::Full);
    let (status, body) = post_json(
        app,
        "/api/identity/phone-match",
        json!({
            "phoneNumber": "+12125550123",
            "name": "John Doe",
            "simSwapPeriod": "240",
            "latitude": "40.7128",
            "longitude": "-74.0060",
            "radius": "50000"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Identity Insights verification result");
    assert_eq!(body["requestId"], "d4f5e6a7-1111-2222-3333-444455556666");

    let data = &body["data"];
    assert_eq!(data["phoneNumber"], "+12125550123");
    assert_eq!(data["matchScore"], 100);
    assert_eq!(data["format"]["isValid"], true);
    assert_eq!(data["format"]["countryName"], "United States");
    assert_eq!(data["simSwap"]["latestSwapAt"], "2023-11-02T09:15:00.000Z");
    assert_eq!(data["currentCarrier"]["networkType"], "MOBILE");
    assert_eq!(data["reachability"]["isReachable"], true);
    assert_eq!(data["locationVerification"]["isVerified"], "TRUE");
    assert_eq!(data["subscriberMatch"]["family_name_match"], "EXACT");
    assert!(data.get("status").is_none());
}

#[tokio::test]
async fn test_phone_match_sends_signed_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v0.1/identity-insights"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "insights": {} })))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server, Credentials::Full);
    let (status, body) = post_json(
        app,
        "/api/identity/phone-match",
        json!({ "phoneNumber": "+447700900123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["matchScore"], 50);
    assert_eq!(body["data"]["phoneNumber"], "+447700900123");

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let authorization = requests[0].headers["authorization"].to_str().unwrap();
    let token = authorization.strip_prefix("Bearer ").unwrap();

    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_aud = false;
    let key = DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap();
    let claims = decode::<ApplicationClaims>(token, &key, &validation)
        .unwrap()
        .claims;
    assert_eq!(claims.application_id, APPLICATION_ID);
    assert_eq!(claims.exp - claims.iat, 3600);

    // No subscriber or location data supplied, so neither block is sent
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(sent["insights"].get("subscriber_match").is_none());
    assert!(sent["insights"].get("location_verification").is_none());
}

#[tokio::test]
async fn test_phone_match_upstream_error_propagated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v0.1/identity-insights"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "https://developer.vonage.com/api-errors#unauthorized",
            "title": "Unauthorized",
            "detail": "You did not provide correct credentials."
        })))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server, Credentials::Full);
    let (status, body) = post_json(
        app,
        "/api/identity/phone-match",
        json!({ "phoneNumber": "+12125550123" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "You did not provide correct credentials.");
    assert_eq!(
        body["errorType"],
        "https://developer.vonage.com/api-errors#unauthorized"
    );
}

#[tokio::test]
async fn test_phone_match_error_text_preferred_over_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error_text": "Invalid phone number",
            "detail": "phone_number must be E.164"
        })))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server, Credentials::Full);
    let (status, body) = post_json(
        app,
        "/api/identity/phone-match",
        json!({ "phoneNumber": "12" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Invalid phone number");
    assert_eq!(body["errorType"], "unknown");
}

#[tokio::test]
async fn test_phone_match_non_json_error_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server, Credentials::Full);
    let (status, body) = post_json(
        app,
        "/api/identity/phone-match",
        json!({ "phoneNumber": "+12125550123" }),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Request failed with status code 503");
    assert_eq!(body["errorType"], "unknown");
}

#[tokio::test]
async fn test_phone_match_without_application_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server, Credentials::AccountOnly);
    let (status, body) = post_json(
        app,
        "/api/identity/phone-match",
        json!({ "phoneNumber": "+12125550123" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["errorType"], "configuration");
}

#[tokio::test]
async fn test_number_verify_live_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ni/standard/json"))
        .and(query_param("api_key", "test_key"))
        .and(query_param("api_secret", "test_secret"))
        .and(query_param("number", "+14155550100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "status_message": "Success",
            "request_id": "aaaaaaaa-bbbb-cccc-dddd-0123456789ab",
            "international_format_number": "14155550100",
            "country_code": "US",
            "country_name": "United States of America",
            "current_carrier": {
                "network_code": "310090",
                "name": "AT&T Mobility",
                "country": "US",
                "network_type": "mobile"
            },
            "ported": "not_ported",
            "roaming": { "status": "not_roaming" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server, Credentials::AccountOnly);
    let (status, body) = post_json(
        app,
        "/api/identity/number-verify",
        json!({ "phoneNumber": "+14155550100" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Number Verification result");
    let data = &body["data"];
    assert_eq!(data["phoneNumber"], "+14155550100");
    assert_eq!(data["status"], "Success");
    assert_eq!(data["countryCode"], "US");
    assert_eq!(data["countryName"], "United States of America");
    assert_eq!(data["carrier"], "AT&T Mobility");
    assert_eq!(data["lineType"], "mobile");
    assert_eq!(data["validNumber"], true);
    assert_eq!(data["ported"], "not_ported");
    assert_eq!(data["roaming"], json!({ "status": "not_roaming" }));
    assert!(data.get("reachable").is_none());

    // Legacy API authenticates by query string only
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_number_verify_non_zero_status_is_not_valid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ni/standard/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 3,
            "status_message": "Invalid request :: Not valid number format detected [ 12 ]"
        })))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server, Credentials::AccountOnly);
    let (status, body) = post_json(
        app,
        "/api/identity/number-verify",
        json!({ "phoneNumber": "12" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["validNumber"], false);
    assert!(body["data"].get("carrier").is_none());
}

#[tokio::test]
async fn test_number_verify_upstream_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ni/standard/json"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error_text": "Bad Credentials",
            "type": "unauthorized"
        })))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server, Credentials::AccountOnly);
    let (status, body) = post_json(
        app,
        "/api/identity/number-verify",
        json!({ "phoneNumber": "+14155550100" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Bad Credentials");
    assert!(body.get("errorType").is_none());
}

#[tokio::test]
async fn test_unreachable_upstream_is_server_error() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), Credentials::AccountOnly);
    let config = Config {
        // Nothing listens on the discard port
        number_insight_url: "http://127.0.0.1:9/ni/standard/json".to_string(),
        ..config
    };
    let client = IdentityClient::from_config(&config).unwrap();
    let app = identity_insights_demo::app(Arc::new(AppState { config, client })).unwrap();

    let (status, body) = post_json(
        app,
        "/api/identity/number-verify",
        json!({ "phoneNumber": "+14155550100" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_mock_mode_never_calls_upstream() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server, Credentials::None);

    let (status, body) = post_json(
        app.clone(),
        "/api/identity/phone-match",
        json!({
            "phoneNumber": "+12125550123",
            "name": "John Doe",
            "latitude": 40.7128,
            "longitude": -74.0060,
            "radius": 50000
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "mock");
    assert!(body["data"]["name"]["score"].is_u64());

    let (status, body) = post_json(
        app,
        "/api/identity/number-verify",
        json!({ "phoneNumber": "+12125550123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "mock");

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_phone_match_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v0.1/identity-insights"))
        .respond_with(ResponseTemplate::new(200).set_body_json(identity_insights_success()))
        .expect(10)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server, Credentials::Full);

    // Fire 10 concurrent requests; each makes exactly one upstream call
    let mut handles = vec![];
    for i in 0..10 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            post_json(
                app,
                "/api/identity/phone-match",
                json!({ "phoneNumber": format!("+1212555012{}", i) }),
            )
            .await
        }));
    }

    for handle in handles {
        let (status, _) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }
}
