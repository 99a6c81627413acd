use std::path::Path;

use async_trait::async_trait;
use thirtyfour::prelude::*;
use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, info};

use super::{ExportKind, GridPage};
use crate::error::AutomationError;

/// Rendered grid rows; once present, the page has settled enough to export.
const GRID_ROWS_SELECTOR: &str = ".ag-center-cols-container .ag-row";

const ELEMENT_WAIT_SECS: u64 = 30;

pub struct BrowserDriver {
    driver: WebDriver,
}

impl BrowserDriver {
    /// Connects to the webdriver endpoint with a Chrome session whose
    /// downloads are saved into `download_dir` without prompting.
    pub async fn new(
        webdriver_url: &str,
        download_dir: &Path,
        headless: bool,
    ) -> Result<Self, AutomationError> {
        let mut caps = DesiredCapabilities::chrome();

        let mut chrome_args = vec![
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            "--window-size=1920,1080".to_string(),
        ];
        if headless {
            chrome_args.push("--headless".to_string());
        }
        for arg in &chrome_args {
            caps.add_arg(arg)?;
        }

        // Chrome wants an absolute path for the download directory.
        let download_dir = download_dir.canonicalize()?;
        caps.add_experimental_option(
            "prefs",
            serde_json::json!({
                "download.default_directory": download_dir.to_string_lossy(),
                "download.prompt_for_download": false,
                "download.directory_upgrade": true,
                "safebrowsing.enabled": true,
            }),
        )?;

        // Connect with a couple of retries; chromedriver may still be
        // binding its port right after startup.
        let mut last_error = None;
        for attempt in 1..=3 {
            match WebDriver::new(webdriver_url, caps.clone()).await {
                Ok(driver) => {
                    info!("connected to webdriver at {webdriver_url}");
                    return Ok(Self { driver });
                }
                Err(e) => {
                    debug!("webdriver connection attempt {attempt}/3 failed: {e}");
                    last_error = Some(e);
                    if attempt < 3 {
                        sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        }

        Err(AutomationError::WebDriver(last_error.unwrap()))
    }

    /// Navigates to the grid page and waits for its rows to render.
    pub async fn open_grid(&self, url: &str) -> Result<(), AutomationError> {
        info!("navigating to {url}");
        self.driver.goto(url).await?;
        self.wait_for_element(By::Css(GRID_ROWS_SELECTOR), ELEMENT_WAIT_SECS)
            .await?;
        Ok(())
    }

    async fn wait_for_element(
        &self,
        selector: By,
        timeout_secs: u64,
    ) -> Result<WebElement, AutomationError> {
        let timeout = Duration::from_secs(timeout_secs);
        let start = Instant::now();

        loop {
            if let Ok(element) = self.driver.find(selector.clone()).await {
                if element.is_displayed().await.unwrap_or(false) {
                    return Ok(element);
                }
            }

            if start.elapsed() > timeout {
                return Err(AutomationError::SelectorNotFound {
                    selector: format!("{selector:?}"),
                    waited_secs: timeout_secs,
                });
            }

            sleep(Duration::from_millis(500)).await;
        }
    }

    pub async fn quit(&self) -> Result<(), AutomationError> {
        // quit() consumes the session; clone the handle to keep &self.
        self.driver.clone().quit().await?;
        Ok(())
    }
}

#[async_trait]
impl GridPage for BrowserDriver {
    async fn trigger_export(&self, kind: ExportKind) -> Result<(), AutomationError> {
        let button = self
            .wait_for_element(By::Id(kind.button_id()), ELEMENT_WAIT_SECS)
            .await?;
        button.click().await?;
        Ok(())
    }
}
