use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Owns a locally spawned chromedriver process for the run.
///
/// The binary is taken from the `CHROMEDRIVER` environment variable when set,
/// otherwise resolved from `PATH`.
pub struct ChromeDriverManager {
    binary: PathBuf,
    port: u16,
    process: Arc<Mutex<Option<Child>>>,
}

impl ChromeDriverManager {
    pub fn new(port: u16) -> Self {
        let binary = std::env::var_os("CHROMEDRIVER")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("chromedriver"));

        Self {
            binary,
            port,
            process: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        let mut process_guard = self.process.lock().await;
        if process_guard.is_some() {
            debug!("chromedriver already running on port {}", self.port);
            return Ok(());
        }

        info!("starting chromedriver on port {}", self.port);
        let child = Command::new(&self.binary)
            .arg(format!("--port={}", self.port))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| {
                format!(
                    "failed to start chromedriver from {:?}; is it installed and on PATH?",
                    self.binary
                )
            })?;
        *process_guard = Some(child);
        drop(process_guard);

        if !self.wait_for_readiness(15).await? {
            anyhow::bail!(
                "chromedriver did not become ready on port {} within 15 seconds",
                self.port
            );
        }

        info!("chromedriver ready on port {}", self.port);
        Ok(())
    }

    pub async fn stop(&self) -> Result<()> {
        let mut process_guard = self.process.lock().await;
        if let Some(mut child) = process_guard.take() {
            let _ = child.kill();
            let _ = child.wait();
            info!("chromedriver stopped");
        }
        Ok(())
    }

    async fn wait_for_readiness(&self, timeout_secs: u64) -> Result<bool> {
        let client = reqwest::Client::new();
        let url = format!("http://localhost:{}/status", self.port);
        let timeout = tokio::time::Duration::from_secs(timeout_secs);
        let start = tokio::time::Instant::now();

        while start.elapsed() < timeout {
            if let Ok(response) = client.get(&url).send().await {
                if response.status().is_success() {
                    return Ok(true);
                }
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
        }

        Ok(false)
    }
}

impl Drop for ChromeDriverManager {
    fn drop(&mut self) {
        // Best effort cleanup
        if let Ok(mut process_guard) = self.process.try_lock() {
            if let Some(mut child) = process_guard.take() {
                let _ = child.kill();
                let _ = child.wait();
            }
        }
    }
}
