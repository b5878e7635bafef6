use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use stone_locations::database::SqliteStore;
use stone_locations::{app, AppState};

pub struct TestServer {
    pub base_url: String,
}

impl TestServer {
    /// Serve a fresh in-memory database on an unused port
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let store = SqliteStore::in_memory().await?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;

        tokio::spawn(async move {
            axum::serve(listener, app(AppState::new(store))).await.ok();
        });

        let server = Self { base_url };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            // Preflight never touches the store, so it doubles as a liveness probe
            if let Ok(resp) = client
                .request(reqwest::Method::OPTIONS, &self.base_url)
                .send()
                .await
            {
                if resp.status().is_success() {
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
}
