use std::fs;

use anyhow::Result;
use tokio::time::Duration;
use tracing::{error, info, warn};

mod automation;
mod chromedriver;
mod config;
mod error;
mod export;
mod loader;
mod models;

use automation::{BrowserDriver, DownloadWatcher, ExportEngine};
use chromedriver::ChromeDriverManager;
use config::{AppConfig, EmailCredentials};
use export::{ExcelExporter, Exporter, PdfExporter, PptxExporter};
use loader::DataLoader;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = AppConfig::load()?;
    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            error!("config: {issue}");
        }
        anyhow::bail!("invalid configuration");
    }

    // Fail fast on the dormant email path before any resource is acquired.
    if config.email_delivery {
        let credentials = EmailCredentials::from_env()?;
        info!("email delivery configured for {}", credentials.user);
    }

    fs::create_dir_all(&config.download_dir)?;

    if config.direct_export {
        run_direct_export(&config).await
    } else {
        run_browser_exports(&config).await
    }
}

/// Drives the running front-end through its export buttons.
async fn run_browser_exports(config: &AppConfig) -> Result<()> {
    let chromedriver = ChromeDriverManager::new(config.chromedriver_port);
    if config.manage_chromedriver {
        chromedriver.start().await?;
    }

    let browser =
        BrowserDriver::new(&config.webdriver_url, &config.download_dir, config.headless).await?;

    let result = drive_exports(&browser, config).await;
    if let Err(err) = &result {
        error!("export run failed: {err}");
    }

    // The browser is closed on every exit path, success or failure.
    browser.quit().await?;
    if config.manage_chromedriver {
        chromedriver.stop().await?;
    }

    result?;
    info!("all exports completed successfully");
    Ok(())
}

async fn drive_exports(browser: &BrowserDriver, config: &AppConfig) -> Result<()> {
    browser.open_grid(&config.target_url).await?;

    let engine = ExportEngine::new(browser, DownloadWatcher::new(&config.download_dir))
        .with_timeout(Duration::from_secs(config.download_timeout_secs))
        .with_kinds(config.enabled_kinds());
    engine.run_export_sequence().await?;

    Ok(())
}

/// Generates the artifacts directly from the data endpoint, without a
/// browser: the same fetch-then-encode path the front-end buttons take.
async fn run_direct_export(config: &AppConfig) -> Result<()> {
    let loader = DataLoader::new(config.data_endpoint.clone(), config.fetch_fan_out);
    let snapshot = loader.load().await?;
    info!(
        rows = snapshot.rows.len(),
        fetched_at = %snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S"),
        "generating artifacts"
    );

    let columns = models::default_columns();
    let exporters: Vec<Box<dyn Exporter>> = config
        .enabled_kinds()
        .into_iter()
        .map(|kind| -> Box<dyn Exporter> {
            match kind {
                automation::ExportKind::Excel => Box::new(ExcelExporter),
                automation::ExportKind::Pdf => Box::new(PdfExporter),
                automation::ExportKind::Ppt => Box::new(PptxExporter),
            }
        })
        .collect();

    for exporter in &exporters {
        match export::write_artifact(
            exporter.as_ref(),
            &columns,
            &snapshot.rows,
            &config.download_dir,
        )? {
            Some(path) => info!("artifact written: {}", path.display()),
            None => warn!("no rows loaded, skipped {}", exporter.file_name()),
        }
    }

    Ok(())
}
