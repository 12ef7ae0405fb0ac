//! Router tests against the in-memory store.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use http_body_util::BodyExt;
use orgdesk_core::{InMemoryStore, NoopNotifier, OnboardingService, Stores};
use orgdesk_shared::{JwtConfig, JwtService};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{AppState, create_router};

struct TestApp {
    router: Router,
    jwt: Arc<JwtService>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let service = OnboardingService::new(
            Stores::from_shared(store),
            Duration::from_secs(60),
            Arc::new(NoopNotifier),
        );
        let jwt = Arc::new(JwtService::new(JwtConfig::default()));
        let router = create_router(AppState {
            service,
            jwt_service: Arc::clone(&jwt),
        });
        Self { router, jwt }
    }

    fn token(&self, org_id: Uuid, role: &str) -> String {
        self.jwt
            .generate_access_token(Uuid::new_v4(), org_id, role)
            .unwrap()
    }

    fn reviewer(&self) -> String {
        self.token(Uuid::new_v4(), "reviewer")
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn register(&self, country: &str) -> Uuid {
        let (status, body) = self
            .send("POST", "/api/v1/organizations", None, Some(organization(country)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().parse().unwrap()
    }
}

fn organization(country: &str) -> Value {
    json!({
        "name": "Acme Health Pvt Ltd",
        "classification": {
            "country": country,
            "organization_type": "MSME",
            "entity_type": "Private Limited",
            "entity_kind": "commercial"
        },
        "contact": {
            "contact_name": "Priya Shah",
            "email": "priya@acme.example"
        },
        "membership_status": "member"
    })
}

fn marketplace_config() -> Value {
    json!({
        "scope": {
            "country": "IN",
            "organization_type": "MSME",
            "entity_type": "Private Limited",
            "engagement_model": "market_place",
            "membership_status": "member"
        },
        "unit": { "kind": "percentage", "value": "10" },
        "discount_percentage": "20",
        "currency": "INR",
        "effective_from": "2024-01-01T00:00:00Z",
        "effective_to": null
    })
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "orgdesk");
}

#[tokio::test]
async fn test_protected_routes_need_a_token() {
    let app = TestApp::new();
    let uri = format!("/api/v1/organizations/{}", Uuid::new_v4());

    let (status, body) = app.send("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, body) = app.send("GET", &uri, Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "INVALID_TOKEN");

    let owner = app.token(Uuid::new_v4(), "owner");
    let (status, _) = app.send("GET", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invalid_registration_is_rejected() {
    let app = TestApp::new();
    let mut input = organization("IN");
    input["contact"]["email"] = json!("not-an-email");

    let (status, body) = app
        .send("POST", "/api/v1/organizations", None, Some(input))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "INVALID_ORGANIZATION");
}

#[tokio::test]
async fn test_members_cannot_write_the_catalog() {
    let app = TestApp::new();
    let org_id = app.register("IN").await;
    let member = app.token(org_id, "member");

    let (status, body) = app
        .send("POST", "/api/v1/pricing/configs", Some(&member), Some(marketplace_config()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_resolve_price_and_missing_configuration() {
    let app = TestApp::new();
    let reviewer = app.reviewer();
    let (status, _) = app
        .send("POST", "/api/v1/pricing/configs", Some(&reviewer), Some(marketplace_config()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let overlap = app
        .send("POST", "/api/v1/pricing/configs", Some(&reviewer), Some(marketplace_config()))
        .await;
    assert_eq!(overlap.0, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(overlap.1["error"], "PRICING_OVERLAP");

    let org_id = app.register("IN").await;
    let member = app.token(org_id, "member");
    let request = json!({ "engagement_model": "market_place", "membership_status": "member" });
    let (status, body) = app
        .send(
            "POST",
            &format!("/api/v1/organizations/{org_id}/pricing/resolve"),
            Some(&member),
            Some(request.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["final_price"]["kind"], "percentage");
    assert_eq!(decimal(&body["final_price"]["value"]), dec!(8));

    let french = app.register("FR").await;
    let french_member = app.token(french, "member");
    let (status, body) = app
        .send(
            "POST",
            &format!("/api/v1/organizations/{french}/pricing/resolve"),
            Some(&french_member),
            Some(request),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "PRICING_NOT_FOUND");
    assert_eq!(body["reason"]["code"], "no_configuration");
}

#[tokio::test]
async fn test_unknown_term_and_stage_are_bad_requests() {
    let app = TestApp::new();
    let org_id = app.register("IN").await;
    let member = app.token(org_id, "member");

    let (status, body) = app
        .send(
            "GET",
            &format!("/api/v1/organizations/{org_id}/membership-fee?term=weekly"),
            Some(&member),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = app
        .send(
            "POST",
            &format!("/api/v1/organizations/{org_id}/validation/shipping"),
            Some(&app.reviewer()),
            Some(json!({ "status": "approved" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_onboarding_over_http() {
    let app = TestApp::new();
    let reviewer = app.reviewer();
    app.send("POST", "/api/v1/pricing/configs", Some(&reviewer), Some(marketplace_config()))
        .await;
    let org_id = app.register("IN").await;
    let member = app.token(org_id, "member");
    let base = format!("/api/v1/organizations/{org_id}");
    let payment = json!({
        "amount": "5000",
        "currency": "INR",
        "method": "upi",
        "receipt_number": "RCPT-001"
    });

    let (status, body) = app
        .send("POST", &format!("{base}/payments"), Some(&member), Some(payment.clone()))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "NO_ACTIVATION");

    let (status, activation) = app
        .send(
            "POST",
            &format!("{base}/activations"),
            Some(&member),
            Some(json!({
                "engagement_model": "market_place",
                "membership_status": "member",
                "billing_frequency": null,
                "terms_accepted": true,
                "idempotency_key": "checkout-1"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{activation}");

    let (status, profile) = app
        .send(
            "PUT",
            &format!("{base}/engagement"),
            Some(&member),
            Some(json!({ "activation_id": activation["id"], "pricing_tier": "Standard" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{profile}");
    assert_eq!(profile["workflow_step"], "engagement_selected");

    let (status, receipt) = app
        .send("POST", &format!("{base}/payments"), Some(&member), Some(payment.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{receipt}");
    assert_eq!(receipt["replayed"], false);

    let (status, replay) = app
        .send("POST", &format!("{base}/payments"), Some(&member), Some(payment))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replay["payment"]["id"], receipt["payment"]["id"]);

    let approve = json!({ "status": "approved" });
    let (status, _) = app
        .send(
            "POST",
            &format!("{base}/validation/payment"),
            Some(&member),
            Some(approve.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, outcome) = app
        .send("POST", &format!("{base}/validation/payment"), Some(&reviewer), Some(approve))
        .await;
    assert_eq!(status, StatusCode::OK, "{outcome}");
    assert_eq!(outcome["became_ready"], true);
    assert_eq!(outcome["ready"], true);

    let administrator = json!({
        "name": "Priya Shah",
        "email": "priya@acme.example",
        "contact": "+91 98765 43210"
    });
    let (status, created) = app
        .send(
            "POST",
            &format!("{base}/administrator"),
            Some(&member),
            Some(administrator.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert!(created["initial_secret"].as_str().is_some_and(|s| !s.is_empty()));
    assert!(created["credential"].get("secret_hash").is_none());

    let (status, body) = app
        .send("POST", &format!("{base}/administrator"), Some(&member), Some(administrator))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "ADMINISTRATOR_EXISTS");

    let credential_id = created["credential"]["id"].as_str().unwrap();
    let (status, updated) = app
        .send(
            "PATCH",
            &format!("/api/v1/administrators/{credential_id}"),
            Some(&member),
            Some(json!({ "name": "Priya S." })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["name"], "Priya S.");

    let (status, validation) = app
        .send("GET", &format!("{base}/validation"), Some(&member), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(validation["status"]["authorization"]["status"], "authorized");

    let (status, events) = app
        .send("GET", &format!("{base}/validation/events"), Some(&member), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(events["data"].as_array().map(Vec::len), Some(5));
    assert_eq!(events["meta"]["total"], 5);

    let (_, page) = app
        .send(
            "GET",
            &format!("{base}/validation/events?page=2&per_page=2"),
            Some(&member),
            None,
        )
        .await;
    assert_eq!(page["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["meta"]["total_pages"], 3);

    let (_, profile) = app.send("GET", &base, Some(&member), None).await;
    assert_eq!(profile["is_completed"], true);
    assert_eq!(profile["workflow_step"], "administrator_created");
}

#[tokio::test]
async fn test_other_organizations_are_forbidden() {
    let app = TestApp::new();
    let org_id = app.register("IN").await;
    let stranger = app.token(Uuid::new_v4(), "member");

    let (status, body) = app
        .send(
            "GET",
            &format!("/api/v1/organizations/{org_id}/activations"),
            Some(&stranger),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
}
