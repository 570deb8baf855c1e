//! End-to-end tests over HTTP against an in-memory server.

#![allow(clippy::panic, clippy::expect_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use expo_sales::api::build_app;
use expo_sales::app_state::AppState;
use expo_sales::auth::{PasswordHasher, TokenSigner};
use expo_sales::persistence::{MemoryStore, Store};
use expo_sales::service::ensure_admin;

const ADMIN: (&str, &str) = ("admin", "admin-pass");

struct TestServer {
    base: String,
    http: Client,
}

impl TestServer {
    async fn spawn() -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let hasher = PasswordHasher::default();
        ensure_admin(store.as_ref(), &hasher, ADMIN.0, ADMIN.1)
            .await
            .expect("seed admin");
        let state = AppState::new(
            &store,
            TokenSigner::new("integration-secret", 3600),
            hasher,
            false,
        );
        let app = build_app(state, Duration::from_secs(10));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self {
            base: format!("http://{addr}"),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                self.http
                    .post(self.url("/api/v1/auth/login"))
                    .json(&json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        let Some(token) = body["token"].as_str() else {
            panic!("no token in {body}");
        };
        token.to_string()
    }

    async fn get(&self, token: &str, path: &str) -> (StatusCode, Value) {
        self.send(self.http.get(self.url(path)).bearer_auth(token))
            .await
    }

    async fn post(&self, token: &str, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(self.http.post(self.url(path)).bearer_auth(token).json(&body))
            .await
    }

    async fn patch(&self, token: &str, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(self.http.patch(self.url(path)).bearer_auth(token).json(&body))
            .await
    }

    async fn put(&self, token: &str, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(self.http.put(self.url(path)).bearer_auth(token).json(&body))
            .await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> (StatusCode, Value) {
        let response = request.send().await.expect("request");
        let status = response.status();
        let text = response.text().await.expect("body");
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).expect("json body")
        };
        (status, body)
    }
}

fn id_of(body: &Value) -> String {
    let Some(id) = body["id"].as_str() else {
        panic!("no id in {body}");
    };
    id.to_string()
}

#[tokio::test]
async fn order_lifecycle_from_setup_to_report() {
    let server = TestServer::spawn().await;
    let admin = server.login(ADMIN.0, ADMIN.1).await;

    let (status, product) = server
        .post(
            &admin,
            "/api/v1/products",
            json!({ "name": "Silk Saree", "sku": "SS-01", "base_price": "5000" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{product}");
    let product_id = id_of(&product);

    let (status, expo) = server
        .post(
            &admin,
            "/api/v1/exhibitions",
            json!({ "name": "Spring Fair", "city": "Pune", "start_date": "2026-03-01" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{expo}");
    assert_eq!(expo["status"], "PLANNING");
    let expo_id = id_of(&expo);

    let (status, salesman) = server
        .post(
            &admin,
            "/api/v1/salesmen",
            json!({ "username": "ravi", "password": "ravi-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{salesman}");
    let salesman_id = id_of(&salesman);

    let (status, assigned) = server
        .patch(
            &admin,
            &format!("/api/v1/salesmen/{salesman_id}"),
            json!({ "assigned_exhibition_id": expo_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{assigned}");
    assert_eq!(assigned["assigned_exhibition_name"], "Spring Fair");

    let ravi = server.login("ravi", "ravi-pass").await;
    let order_body = json!({
        "customer_name": "Meera",
        "customer_phone": "98200 00000",
        "product_id": product_id,
        "quantity": 3,
        "payment_ref": "CASH",
    });

    // Still planning.
    let (status, body) = server.post(&ravi, "/api/v1/orders", order_body.clone()).await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
    assert_eq!(body["error"]["kind"], "state_conflict");

    let (status, _) = server
        .put(
            &admin,
            &format!("/api/v1/exhibitions/{expo_id}/status"),
            json!({ "status": "live" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, order) = server.post(&ravi, "/api/v1/orders", order_body.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert_eq!(order["total_amount"], 15000);
    assert_eq!(order["product_price"], 5000);
    assert_eq!(order["exhibition_id"], expo_id.as_str());

    // Repricing the product leaves the recorded order untouched.
    let (status, _) = server
        .patch(
            &admin,
            &format!("/api/v1/products/{product_id}"),
            json!({ "base_price": 9000 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = server
        .put(
            &admin,
            &format!("/api/v1/exhibitions/{expo_id}/status"),
            json!({ "status": "CLOSED" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.post(&ravi, "/api/v1/orders", order_body).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, report) = server
        .get(&admin, &format!("/api/v1/reports/exhibitions/{expo_id}"))
        .await;
    assert_eq!(status, StatusCode::OK, "{report}");
    assert_eq!(report["stats"]["total_orders"], 1);
    assert_eq!(report["stats"]["total_revenue"], 15000);
    assert_eq!(report["stats"]["avg_order_value"], 15000);
    assert_eq!(report["orders"][0]["product_price"], 5000);
    assert_eq!(report["orders"][0]["salesman_username"], "ravi");

    let (status, mine) = server.get(&ravi, "/api/v1/reports/me").await;
    assert_eq!(status, StatusCode::OK, "{mine}");
    assert_eq!(mine["stats"]["total_revenue"], 15000);

    let (status, dashboard) = server.get(&admin, "/api/v1/reports/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["total_orders"], 1);
    assert_eq!(dashboard["active_exhibitions"], 0);
    assert_eq!(dashboard["total_revenue"], 15000);
}

#[tokio::test]
async fn missing_fields_are_listed() {
    let server = TestServer::spawn().await;
    let admin = server.login(ADMIN.0, ADMIN.1).await;

    let (status, body) = server
        .post(&admin, "/api/v1/products", json!({ "name": "No SKU" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation_error");
    let Some(details) = body["error"]["details"].as_array() else {
        panic!("no details in {body}");
    };
    assert!(details.contains(&json!("sku")));
    assert!(details.contains(&json!("base_price")));
}

#[tokio::test]
async fn sessions_are_required_and_roles_enforced() {
    let server = TestServer::spawn().await;

    let (status, body) = server
        .send(server.http.get(server.url("/api/v1/products")))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["kind"], "unauthorized");

    let (status, _) = server.get("not-a-token", "/api/v1/products").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = server
        .send(
            server
                .http
                .post(server.url("/api/v1/auth/login"))
                .json(&json!({ "username": ADMIN.0, "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "invalid credentials");

    let admin = server.login(ADMIN.0, ADMIN.1).await;
    let (status, _) = server
        .post(
            &admin,
            "/api/v1/salesmen",
            json!({ "username": "ravi", "password": "ravi-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let ravi = server.login("ravi", "ravi-pass").await;

    let (status, _) = server.get(&ravi, "/api/v1/reports/dashboard").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = server.get(&ravi, "/api/v1/products").await;
    assert_eq!(status, StatusCode::OK);
    let (status, me) = server.get(&ravi, "/api/v1/auth/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["role"], "SALESMAN");
}

#[tokio::test]
async fn login_sets_the_session_cookie() {
    let server = TestServer::spawn().await;
    let response = server
        .http
        .post(server.url("/api/v1/auth/login"))
        .json(&json!({ "username": ADMIN.0, "password": ADMIN.1 }))
        .send()
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::OK);
    let Some(cookie) = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
    else {
        panic!("no cookie set");
    };
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));

    let token = cookie
        .trim_start_matches("token=")
        .split(';')
        .next()
        .unwrap_or_default()
        .to_string();
    let (status, _) = server
        .send(
            server
                .http
                .get(server.url("/api/v1/auth/me"))
                .header(reqwest::header::COOKIE, format!("token={token}")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_needs_no_session() {
    let server = TestServer::spawn().await;
    let (status, body) = server.send(server.http.get(server.url("/health"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn order_rejections_follow_the_check_order() {
    let server = TestServer::spawn().await;
    let admin = server.login(ADMIN.0, ADMIN.1).await;

    let (_, expo) = server
        .post(
            &admin,
            "/api/v1/exhibitions",
            json!({ "name": "Winter Fair", "city": "Nashik", "start_date": "2026-12-01" }),
        )
        .await;
    let expo_id = id_of(&expo);
    let (_, salesman) = server
        .post(
            &admin,
            "/api/v1/salesmen",
            json!({ "username": "asha", "password": "asha-pass" }),
        )
        .await;
    let (status, _) = server
        .patch(
            &admin,
            &format!("/api/v1/salesmen/{}", id_of(&salesman)),
            json!({ "assigned_exhibition_id": expo_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let asha = server.login("asha", "asha-pass").await;

    let garbled = json!({
        "customer_name": "Kiran",
        "product_id": "not-a-uuid",
        "quantity": 1,
        "payment_ref": "CASH",
    });

    // Role is checked before anything in the body.
    let (status, body) = server.post(&admin, "/api/v1/orders", garbled.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "{body}");
    assert_eq!(body["error"]["kind"], "unauthorized");

    // A planning exhibition refuses before the product is looked at.
    let (status, body) = server.post(&asha, "/api/v1/orders", garbled.clone()).await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
    assert_eq!(body["error"]["kind"], "state_conflict");

    let (status, _) = server
        .put(
            &admin,
            &format!("/api/v1/exhibitions/{expo_id}/status"),
            json!({ "status": "LIVE" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = server.post(&asha, "/api/v1/orders", garbled.clone()).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
    assert_eq!(body["error"]["kind"], "not_found");

    let mut elsewhere = garbled;
    elsewhere["exhibition_id"] = json!("expo-42");
    let (status, body) = server.post(&asha, "/api/v1/orders", elsewhere).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
    assert_eq!(body["error"]["message"], "exhibition not found: expo-42");
}

#[tokio::test]
async fn admin_bodies_are_not_validated_for_other_roles() {
    let server = TestServer::spawn().await;
    let admin = server.login(ADMIN.0, ADMIN.1).await;
    let (status, _) = server
        .post(
            &admin,
            "/api/v1/salesmen",
            json!({ "username": "ravi", "password": "ravi-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let ravi = server.login("ravi", "ravi-pass").await;

    let (status, body) = server
        .post(
            &ravi,
            "/api/v1/products",
            json!({ "name": "Lamp", "sku": "LP-1", "base_price": "abc" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "{body}");

    let (status, _) = server
        .post(&ravi, "/api/v1/exhibitions", json!({ "name": "Fair" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The same bad price from an admin is a validation error.
    let (status, body) = server
        .post(
            &admin,
            "/api/v1/products",
            json!({ "name": "Lamp", "sku": "LP-1", "base_price": "abc" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation_error");
}
