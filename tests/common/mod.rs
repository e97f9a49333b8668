#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use hungry_food_api::auth::TokenService;
use hungry_food_api::database::{Collection, Document, DocumentStore, MemoryStore};
use hungry_food_api::{app, cors_layer, AppState};

pub const SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Obtain a token through POST /jwt, as a client would.
    pub async fn token_for(&self, email: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/jwt"))
            .json(&json!({ "email": email }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "token request failed: {}", res.status());
        Ok(res.text().await?)
    }

    /// Insert a user straight into storage, bypassing registration rules.
    pub async fn seed_user(&self, email: &str, role: Option<&str>) -> Result<String> {
        let mut user = json!({ "email": email, "name": email });
        if let Some(role) = role {
            user["role"] = json!(role);
        }
        self.seed(Collection::Users, user).await
    }

    pub async fn seed(&self, collection: Collection, document: Value) -> Result<String> {
        let document: Document = document
            .as_object()
            .cloned()
            .context("seed documents must be objects")?;
        let result = self.store.insert_one(collection, document).await?;
        Ok(result.inserted_id.to_string())
    }

    /// Seed an admin and return a token for it.
    pub async fn admin_token(&self) -> Result<String> {
        self.seed_user("admin@hungry.test", Some("admin")).await?;
        self.token_for("admin@hungry.test").await
    }
}

/// Start the router on a free port over a fresh in-memory store.
///
/// Each test runs on its own runtime, so each gets its own server.
pub async fn spawn_server() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), TokenService::new(SECRET, chrono::Duration::hours(1)));
    let router = app(state, cors_layer(&[]));

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let server = TestServer {
        port,
        base_url,
        store,
        client: reqwest::Client::new(),
    };
    wait_ready(&server, Duration::from_secs(5)).await?;
    Ok(server)
}

async fn wait_ready(server: &TestServer, timeout: Duration) -> Result<()> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if let Ok(resp) = server.client.get(server.url("/")).send().await {
            if resp.status() == StatusCode::OK {
                return Ok(());
            }
        }
        if tokio::time::Instant::now() > deadline {
            anyhow::bail!("server did not become ready on {} within {:?}", server.base_url, timeout);
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}
