use std::fs;
use std::io;
use std::path::PathBuf;

use tokio::time::{sleep, Duration, Instant};
use tracing::debug;

use crate::error::AutomationError;

pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Suffixes the browser gives in-progress downloads.
const PARTIAL_SUFFIXES: [&str; 3] = [".crdownload", ".part", ".tmp"];

/// Watches a download directory for a completed file of a given extension.
///
/// This is an explicit bounded polling loop; the browser offers no completion
/// callback for downloads triggered by page scripts.
pub struct DownloadWatcher {
    dir: PathBuf,
    poll_interval: Duration,
}

impl DownloadWatcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            poll_interval: Duration::from_secs(1),
        }
    }

    #[cfg(test)]
    fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Polls once per interval until a completed `.{extension}` file exists.
    ///
    /// Returns the matched file name as soon as one is present (first poll
    /// included). Which file wins when several match is directory-listing
    /// order; each run is expected to produce exactly one new file per
    /// extension in a clean directory.
    pub async fn wait_for_download(
        &self,
        extension: &'static str,
        timeout: Duration,
    ) -> Result<String, AutomationError> {
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(name) = self.completed_download(extension)? {
                debug!(file = %name, ".{extension} download complete");
                return Ok(name);
            }

            if Instant::now() >= deadline {
                return Err(AutomationError::DownloadTimeout {
                    extension,
                    dir: self.dir.clone(),
                    timeout_secs: timeout.as_secs(),
                });
            }

            sleep(self.poll_interval).await;
        }
    }

    fn completed_download(&self, extension: &str) -> io::Result<Option<String>> {
        let suffix = format!(".{extension}");

        for entry in fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            let name = name.to_string_lossy();
            if name.ends_with(&suffix) && !PARTIAL_SUFFIXES.iter().any(|p| name.ends_with(p)) {
                return Ok(Some(name.into_owned()));
            }
        }

        Ok(None)
    }
}
