use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// Integration tests need a reachable Postgres. When the environment does
/// not provide DATABASE_URL the tests return early instead of failing.
pub fn db_available() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

pub struct TestServer {
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Provision the appointments table first (no-op when it already exists)
        let status = Command::new("target/debug/agenda")
            .arg("init-db")
            .env("JWT_SECRET", jwt_secret())
            .status()
            .context("failed to run agenda init-db")?;
        anyhow::ensure!(status.success(), "agenda init-db failed");

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests.
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/agenda-api");
        cmd.env("PORT", port.to_string())
            .env("JWT_SECRET", jwt_secret())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "integration-test-secret".to_string())
}

/// Fetch a bearer token for `username` via the public token endpoint
#[allow(dead_code)]
pub async fn token_for(base_url: &str, username: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/oauth/token", base_url))
        .json(&serde_json::json!({ "username": username, "password": "foo" }))
        .send()
        .await?;

    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "token request failed: {}",
        res.status()
    );

    let body = res.json::<serde_json::Value>().await?;
    body["access_token"]
        .as_str()
        .map(str::to_string)
        .context("missing access_token in token response")
}

/// Usernames are unique per run so reruns against a persistent database
/// never see each other's rows
#[allow(dead_code)]
pub fn unique_username(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}
