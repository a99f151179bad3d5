#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use bookings_api::auth::password::hash_password;
use bookings_api::config::ServerConfig;
use bookings_api::router::{build_app_router, SESSION_COOKIE};
use bookings_api::state::AppState;
use bookings_core::access::{ACCESS_LEVEL_ADMIN, ACCESS_LEVEL_USER};
use bookings_db::models::user::CreateUser;
use bookings_db::store::{MemoryStore, UserStore};
use bookings_events::{MailDispatcher, MailTransport, MemoryTransport};

pub const ADMIN_EMAIL: &str = "admin@fortsmythe.test";
pub const USER_EMAIL: &str = "staff@fortsmythe.test";
pub const PASSWORD: &str = "correct horse battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        db_query_timeout_ms: 3000,
        shutdown_timeout_secs: 5,
        mail_queue_capacity: 16,
        mail_from: "bookings@fortsmythe.test".to_string(),
        owner_email: "owner@fortsmythe.test".to_string(),
        email_templates_dir: PathBuf::from("../../email-templates"),
        static_dir: PathBuf::from("../../static"),
        session_secure_cookie: false,
        session_lifetime_hours: 1,
    }
}

/// The application wired to in-memory collaborators.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub mail: MemoryTransport,
}

impl TestApp {
    /// A fresh client with an empty cookie jar.
    pub fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Wait until at least `count` messages have been delivered.
    pub async fn wait_for_mail(&self, count: usize) -> Vec<bookings_events::MailData> {
        for _ in 0..100 {
            let sent = self.mail.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.mail.sent()
    }
}

/// Build the full application router over a seeded [`MemoryStore`].
///
/// Uses the same middleware stack as `main.rs` via `build_app_router`.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let mail = MemoryTransport::new();
    let transport: Arc<dyn MailTransport> = Arc::new(mail.clone());
    let (mailer, _worker) = MailDispatcher::spawn(config.mail_queue_capacity, transport);

    let state = AppState::new(config.clone(), store.clone(), mailer);
    TestApp {
        router: build_app_router(state, &config),
        store,
        mail,
    }
}

/// Insert an admin and a regular user, both with [`PASSWORD`].
pub async fn seed_users(store: &MemoryStore) {
    let password_hash = hash_password(PASSWORD).expect("hashing should succeed");
    for (email, access_level) in [(ADMIN_EMAIL, ACCESS_LEVEL_ADMIN), (USER_EMAIL, ACCESS_LEVEL_USER)] {
        store
            .create_user(&CreateUser {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: email.to_string(),
                password_hash: password_hash.clone(),
                access_level,
            })
            .await
            .expect("user creation should succeed");
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Status, redirect target, and JSON body (or `Null`) of one response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

/// Sends requests through the router, carrying the session cookie between
/// them like a browser would.
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request(Method::GET, uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let request = self
            .request(Method::POST, uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encode_form(fields)))
            .unwrap();
        self.send(request).await
    }

    /// Log in through the form and assert it succeeded.
    pub async fn login(&mut self, email: &str, password: &str) {
        let response = self
            .post_form("/user/login", &[("email", email), ("password", password)])
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location.as_deref(), Some("/"));
    }

    fn request(&self, method: Method, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        for value in response.headers().get_all(SET_COOKIE) {
            let value = value.to_str().unwrap();
            let pair = value.split(';').next().unwrap_or_default();
            if let Some((name, token)) = pair.split_once('=') {
                if name == SESSION_COOKIE {
                    self.cookie = (!token.is_empty()).then(|| pair.to_string());
                }
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            location,
            body,
        }
    }
}

/// `application/x-www-form-urlencoded` encoding.
pub fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
