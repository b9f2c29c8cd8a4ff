#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;

use taskboard_api::auth::{Identity, IdentityProvider, SharedSecretVerifier};
use taskboard_api::client::ApiClient;
use taskboard_api::config::AppConfig;
use taskboard_api::database::MemoryStore;
use taskboard_api::{app, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Router served in-process on a free port, backed by a fresh in-memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: MemoryStore,
    verifier: SharedSecretVerifier,
    client: Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let verifier = SharedSecretVerifier::new(TEST_SECRET, 1);
        let identity: Arc<dyn IdentityProvider> = Arc::new(verifier.clone());
        let store = MemoryStore::new();
        let state = AppState::new(Arc::new(store.clone()), Some(identity), AppConfig::development());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let server = Self {
            port,
            base_url,
            store,
            verifier,
            client: Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/api/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Signed token for `uid` with a predictable email
    pub fn token_for(&self, uid: &str) -> String {
        let identity = Identity::new(uid)
            .with_email(format!("{}@example.com", uid), true)
            .with_display_name(uid.to_uppercase());
        self.verifier.issue(&identity).expect("failed to sign test token")
    }

    pub fn request(&self, method: Method, path: &str, uid: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match uid {
            Some(uid) => builder.bearer_auth(self.token_for(uid)),
            None => builder,
        }
    }

    /// Typed client authenticated as `uid`
    pub fn api(&self, uid: &str) -> ApiClient {
        ApiClient::new(&self.base_url).with_token(self.token_for(uid))
    }
}

/// Status plus parsed JSON body
pub async fn send(builder: RequestBuilder) -> Result<(StatusCode, Value)> {
    let resp = builder.send().await?;
    let status = resp.status();
    let body = resp.json::<Value>().await.unwrap_or(Value::Null);
    Ok((status, body))
}
