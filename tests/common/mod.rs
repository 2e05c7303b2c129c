use std::net::SocketAddr;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use talenthub::config::{Config, StorageConfig};

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Register an account with the given role.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: &str,
    ) -> (Value, StatusCode) {
        self.post(
            "/api/v1/auth/register",
            &json!({ "email": email, "password": password, "name": name, "role": role }),
        )
        .await
    }

    /// Login and return the response body + status.
    pub async fn login(&self, email: &str, password: &str) -> (Value, StatusCode) {
        self.post(
            "/api/v1/auth/login",
            &json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Register the bootstrap account (first account = admin), return
    /// its token.
    pub async fn bootstrap_admin(&self) -> String {
        let (body, status) = self
            .register("admin@test.com", "password123", "Admin", "candidate")
            .await;
        assert_eq!(status, StatusCode::OK, "bootstrap register failed: {body}");

        let (body, status) = self.login("admin@test.com", "password123").await;
        assert_eq!(status, StatusCode::OK, "bootstrap login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Register + login a candidate, return its token.
    pub async fn create_candidate(&self, email: &str) -> String {
        let (body, status) = self.register(email, "password123", "Candidate", "candidate").await;
        assert_eq!(status, StatusCode::OK, "candidate register failed: {body}");

        let (body, status) = self.login(email, "password123").await;
        assert_eq!(status, StatusCode::OK, "candidate login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Register a recruiter, approve it as admin, login, return its
    /// token.
    pub async fn create_recruiter(&self, email: &str, admin_token: &str) -> String {
        let (body, status) = self.register(email, "password123", "Recruiter", "recruiter").await;
        assert_eq!(status, StatusCode::OK, "recruiter register failed: {body}");
        let id = body["user"]["id"].as_str().unwrap().to_string();

        let (body, status) = self
            .put_auth(
                &format!("/api/v1/admin/recruiters/{id}/approval"),
                admin_token,
                &json!({ "status": "approved" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "recruiter approval failed: {body}");

        let (body, status) = self.login(email, "password123").await;
        assert_eq!(status, StatusCode::OK, "recruiter login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Create a job posting, return the job JSON.
    pub async fn create_job(&self, token: &str, title: &str) -> Value {
        let (body, status) = self
            .post_auth(
                "/api/v1/jobs",
                token,
                &json!({
                    "title": title,
                    "description": "Build and ship things",
                    "location": "Remote",
                    "job_type": "full_time",
                    "salary_min": 60000,
                    "salary_max": 90000,
                    "skills": ["rust"],
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create job failed: {body}");
        body
    }

    /// Make an unauthenticated GET request.
    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an unauthenticated POST request with JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated GET request.
    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated POST request with JSON body.
    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated PUT request with JSON body.
    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated DELETE request.
    pub async fn delete_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    // Create a unique test database
    let db_name = format!(
        "talenthub_test_{}",
        Uuid::now_v7().to_string().replace('-', "")
    );

    // Connect to default postgres DB to create test DB
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    // Connect to test DB and run migrations
    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let config = Config {
        database_url: test_url,
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        base_url: "http://localhost:0".to_string(),
        max_body_size: 1_048_576,
        log_level: "warn".to_string(),
        storage: StorageConfig {
            base_url: "http://localhost:9000/talenthub-test".to_string(),
            signing_key: "test-storage-signing-key".to_string(),
            url_ttl_secs: 900,
        },
        smtp: None,
    };

    let app = talenthub::build_app(pool.clone(), config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .await
            .expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        pool,
        client,
        db_name,
    }
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
