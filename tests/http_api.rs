use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use platetrend::api::{app_router, InMemoryWaitlistRepository, LoggingNotifier};
use platetrend::dashboard::DashboardDefaults;
use platetrend::signup::{AdminGuard, NotificationSettings, SignupService, ADMIN_KEY_HEADER};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const ADMIN_KEY: &str = "platetrend2025";

fn build_router() -> (Router, LoggingNotifier) {
    let notifier = LoggingNotifier::default();
    let service = Arc::new(SignupService::new(
        Arc::new(InMemoryWaitlistRepository::default()),
        Arc::new(notifier.clone()),
        NotificationSettings::default(),
    ));
    let router = app_router(
        service,
        AdminGuard::new(ADMIN_KEY),
        Arc::new(DashboardDefaults::default()),
    );
    (router, notifier)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router dispatch");
    let status = response.status();
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    (status, serde_json::from_slice(&body).expect("json"))
}

fn json_request(method: &str, uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_vec(&payload).expect("serialize payload"),
        ))
        .expect("request")
}

fn signup_payload(email: &str) -> Value {
    json!({
        "restaurantName": "Taqueria Sol",
        "email": email,
        "location": "Austin, TX",
        "numLocations": "2-5",
    })
}

#[tokio::test]
async fn waitlist_signup_is_listed_for_admins_only() {
    let (router, notifier) = build_router();

    let (status, body) = send(
        &router,
        json_request("POST", "/api/waitlist", signup_payload("owner@sol.com")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["id"].is_string());
    assert_eq!(body["message"], "Successfully registered for early access!");

    let sent = notifier.sent();
    assert!(sent.iter().any(|email| email.to == "owner@sol.com"));
    assert!(sent.iter().any(|email| email.to == "admin@platetrend.com"));

    let (status, body) = send(
        &router,
        Request::builder()
            .uri("/api/waitlist")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid admin key. Access denied.");

    let (status, body) = send(
        &router,
        Request::builder()
            .uri("/api/waitlist")
            .header(ADMIN_KEY_HEADER, ADMIN_KEY)
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["entries"][0]["restaurant_name"], "Taqueria Sol");
}

#[tokio::test]
async fn duplicate_waitlist_email_is_rejected() {
    let (router, _) = build_router();

    let (status, _) = send(
        &router,
        json_request("POST", "/api/waitlist", signup_payload("owner@sol.com")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &router,
        json_request("POST", "/api/waitlist", signup_payload("OWNER@sol.com")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn invalid_waitlist_submission_names_the_problem() {
    let (router, _) = build_router();
    let payload = signup_payload("not-an-email");

    let (status, body) = send(&router, json_request("POST", "/api/waitlist", payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please enter a valid email address");
}

#[tokio::test]
async fn contact_form_forwards_to_support() {
    let (router, notifier) = build_router();

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/contact",
            json!({
                "name": "Ana",
                "email": "ana@sol.com",
                "subject": "demo",
                "message": "We would love a walkthrough next week.",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(notifier
        .sent()
        .iter()
        .any(|email| email.to == "support@platetrend.com"));
}

#[tokio::test]
async fn dashboard_config_applies_query_overrides() {
    let (router, _) = build_router();

    let (status, body) = send(
        &router,
        Request::builder()
            .uri("/api/dashboard-config?marketing_support_scenario=off&pilots_planned=10")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["version"], "1.0.0");

    let data = &body["data"];
    assert_eq!(
        data["state"]["settings"]["toggles"]["marketing_support_scenario"],
        "off"
    );
    assert_eq!(data["state"]["pilot_program"]["pilots_planned"], 10);
    assert_eq!(data["calc"]["pilot"]["spend"], 350.0);
    let timeseries = data["derived"]["timeseries"]
        .as_array()
        .expect("timeseries array");
    assert_eq!(timeseries.len(), 24);
    assert!(timeseries
        .iter()
        .all(|month| month["marketing"] == 0.0 && month["support"] == 0.0));
    assert_eq!(data["competitors_sorted_by_qvi"][0]["name"], "Sushi Go");
}

#[tokio::test]
async fn dashboard_config_patch_is_acknowledged() {
    let (router, _) = build_router();

    let (status, body) = send(
        &router,
        json_request(
            "PATCH",
            "/api/dashboard-config",
            json!({ "settings": { "toggles": { "optimizations": false } } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Configuration updated successfully");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn projection_endpoint_validates_assumptions() {
    let (router, _) = build_router();

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/v1/projection",
            json!({ "toggles": { "optimizations": false } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["toggles"]["optimizations"], false);
    assert_eq!(body["summary"]["starting_cash"], 30000.0);

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/v1/projection",
            json!({ "assumptions": { "mix": { "starter_pct": 50.0, "growth_pct": 30.0, "enterprise_pct": 10.0 } } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("tier mix"));
}

#[tokio::test]
async fn oversized_projection_inputs_are_client_errors() {
    let (router, _) = build_router();

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/v1/projection",
            json!({ "assumptions": { "new_customers_per_month": 9223372036854775808u64, "months": 3 } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("supported customer count"));

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/v1/projection",
            json!({ "assumptions": { "months": 4294967295u32 } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("month limit"));
}

#[tokio::test]
async fn dashboard_config_rejects_negative_pilot_cost() {
    let (router, _) = build_router();

    let (status, body) = send(
        &router,
        Request::builder()
            .uri("/api/dashboard-config?cost_per_pilot_usd=-35")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("cost_per_pilot_usd"));

    let (status, _) = send(
        &router,
        Request::builder()
            .uri("/api/dashboard-config?expected_conversion_pct=250")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_bodies_get_the_json_error_envelope() {
    let (router, _) = build_router();

    for uri in ["/api/waitlist", "/api/contact", "/api/v1/projection"] {
        let (status, body) = send(
            &router,
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from("{\"email\": "))
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["success"], false, "{uri}");
        assert!(body["error"].is_string(), "{uri}");
    }

    let (status, body) = send(
        &router,
        Request::builder()
            .method("PATCH")
            .uri("/api/dashboard-config")
            .body(Body::from("{}"))
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn malformed_query_gets_the_json_error_envelope() {
    let (router, _) = build_router();

    let (status, body) = send(
        &router,
        Request::builder()
            .uri("/api/dashboard-config?optimizations=maybe")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("query string"));
}
