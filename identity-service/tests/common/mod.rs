#![allow(dead_code)]

use std::sync::Arc;

use chrono::Duration;
use chrono::Utc;
use identity_service::access::AccessGate;
use identity_service::domain::user::models::DisplayName;
use identity_service::domain::user::models::EmailAddress;
use identity_service::domain::user::models::User;
use identity_service::domain::user::models::UserId;
use identity_service::domain::user::ports::UserRepository;
use identity_service::domain::user::ports::UserServicePort;
use identity_service::domain::user::service::UserService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryUserRepository;
use identity_service::outbound::security::Argon2CredentialHasher;
use identity_service::outbound::security::JwtTokenIssuer;
use serde_json::json;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over an in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: Arc<InMemoryUserRepository>,
    pub api_client: reqwest::Client,
    pub jwt_handler: auth::JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(Argon2CredentialHasher::new());
        let tokens = Arc::new(JwtTokenIssuer::new(JWT_SECRET, Duration::hours(6)));

        let user_service: Arc<dyn UserServicePort> = Arc::new(UserService::new(
            Arc::clone(&repository),
            hasher,
            Arc::clone(&tokens),
        ));
        let gate = Arc::new(AccessGate::new(Arc::clone(&user_service), tokens));

        let router = create_router(user_service, gate);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            repository,
            api_client: reqwest::Client::new(),
            jwt_handler: auth::JwtHandler::new(JWT_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a user and return the response body
    pub async fn register(&self, email: &str, password: &str, name: &str) -> serde_json::Value {
        let response = self
            .post("/register")
            .json(&json!({
                "email": email,
                "password": password,
                "name": name
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Register a user and return only the token
    pub async fn register_token(&self, email: &str, password: &str, name: &str) -> String {
        let body = self.register(email, password, name).await;
        body["token"].as_str().expect("token missing").to_string()
    }

    /// Store a deactivated user directly, bypassing registration
    pub async fn insert_inactive_user(&self, email: &str, password: &str) -> User {
        let user = User {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            name: DisplayName::new("Inactive".to_string()).unwrap(),
            password_hash: auth::PasswordHasher::new().hash(password).unwrap(),
            is_active: false,
            created_at: Utc::now(),
        };
        self.repository.insert(user).await.unwrap()
    }

    /// Mint a correctly signed token for an arbitrary subject and issue time
    pub fn mint_token(&self, subject: &str, issued_at: i64, ttl: Duration) -> String {
        self.jwt_handler
            .encode(&auth::Claims::issued_at(subject, issued_at, ttl))
            .unwrap()
    }
}
