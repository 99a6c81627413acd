pub mod browser;
pub mod download;

use std::fmt;

use async_trait::async_trait;
use tokio::time::Duration;
use tracing::info;

use crate::error::AutomationError;

pub use browser::BrowserDriver;
pub use download::{DownloadWatcher, DEFAULT_DOWNLOAD_TIMEOUT};

/// The three grid exports, in the fixed order they are triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Excel,
    Pdf,
    Ppt,
}

impl ExportKind {
    pub const SEQUENCE: [ExportKind; 3] = [ExportKind::Excel, ExportKind::Pdf, ExportKind::Ppt];

    /// DOM id of the export button on the grid page.
    pub fn button_id(&self) -> &'static str {
        match self {
            ExportKind::Excel => "export-excel-button",
            ExportKind::Pdf => "export-pdf-button",
            ExportKind::Ppt => "export-ppt-button",
        }
    }

    /// Extension of the file the export saves.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Excel => "xlsx",
            ExportKind::Pdf => "pdf",
            ExportKind::Ppt => "pptx",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportKind::Excel => write!(f, "Excel"),
            ExportKind::Pdf => write!(f, "PDF"),
            ExportKind::Ppt => write!(f, "PPT"),
        }
    }
}

/// The already-rendered grid page, reduced to what the engine needs: activate
/// one export control. Backed by the real browser in production and by mocks
/// in tests.
#[async_trait]
pub trait GridPage {
    async fn trigger_export(&self, kind: ExportKind) -> Result<(), AutomationError>;
}

#[async_trait]
impl<'a, P: GridPage + Sync> GridPage for &'a P {
    async fn trigger_export(&self, kind: ExportKind) -> Result<(), AutomationError> {
        (**self).trigger_export(kind).await
    }
}

/// Drives the grid page through its export buttons, confirming each export
/// produced a file before moving on to the next one.
pub struct ExportEngine<P> {
    page: P,
    downloads: DownloadWatcher,
    timeout: Duration,
    kinds: Vec<ExportKind>,
}

impl<P: GridPage> ExportEngine<P> {
    pub fn new(page: P, downloads: DownloadWatcher) -> Self {
        Self {
            page,
            downloads,
            timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            kinds: ExportKind::SEQUENCE.to_vec(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_kinds(mut self, kinds: Vec<ExportKind>) -> Self {
        self.kinds = kinds;
        self
    }

    /// Triggers each export in sequence. The next export does not start
    /// until the previous download is confirmed on disk.
    pub async fn run_export_sequence(&self) -> Result<(), AutomationError> {
        for kind in &self.kinds {
            info!("triggering {kind} export");
            self.page.trigger_export(*kind).await?;

            let file = self
                .downloads
                .wait_for_download(kind.extension(), self.timeout)
                .await?;
            info!("{kind} download complete: {file}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Records trigger order and drops the finished file into the download
    /// directory, the way a click on the real page eventually would.
    struct RecordingPage {
        dir: PathBuf,
        clicks: Mutex<Vec<ExportKind>>,
    }

    impl RecordingPage {
        fn new(dir: PathBuf) -> Self {
            Self {
                dir,
                clicks: Mutex::new(Vec::new()),
            }
        }

        fn download_name(kind: ExportKind) -> String {
            format!("aggrid-data.{}", kind.extension())
        }
    }

    #[async_trait]
    impl GridPage for RecordingPage {
        async fn trigger_export(&self, kind: ExportKind) -> Result<(), AutomationError> {
            // Every previously triggered export must already be on disk,
            // otherwise the engine moved on before its wait resolved.
            for prior in &*self.clicks.lock().unwrap() {
                assert!(
                    self.dir.join(Self::download_name(*prior)).exists(),
                    "{prior} was not confirmed before {kind} was triggered"
                );
            }
            self.clicks.lock().unwrap().push(kind);
            fs::write(self.dir.join(Self::download_name(kind)), b"x")?;
            Ok(())
        }
    }

    struct FailingPage;

    #[async_trait]
    impl GridPage for FailingPage {
        async fn trigger_export(&self, _kind: ExportKind) -> Result<(), AutomationError> {
            Err(AutomationError::SelectorNotFound {
                selector: "#export-excel-button".into(),
                waited_secs: 30,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn exports_run_in_fixed_order() {
        let dir = tempfile::tempdir().unwrap();
        let page = RecordingPage::new(dir.path().to_path_buf());
        let engine = ExportEngine::new(&page, DownloadWatcher::new(dir.path()));

        engine.run_export_sequence().await.unwrap();

        assert_eq!(*page.clicks.lock().unwrap(), ExportKind::SEQUENCE.to_vec());
    }

    #[tokio::test(start_paused = true)]
    async fn interaction_failure_stops_the_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let engine = ExportEngine::new(FailingPage, DownloadWatcher::new(dir.path()));

        let err = engine.run_export_sequence().await.unwrap_err();
        assert!(matches!(err, AutomationError::SelectorNotFound { .. }));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_kinds_are_skipped_but_order_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let page = RecordingPage::new(dir.path().to_path_buf());
        let engine = ExportEngine::new(&page, DownloadWatcher::new(dir.path()))
            .with_kinds(vec![ExportKind::Pdf, ExportKind::Ppt]);

        engine.run_export_sequence().await.unwrap();

        assert_eq!(
            *page.clicks.lock().unwrap(),
            vec![ExportKind::Pdf, ExportKind::Ppt]
        );
    }
}
