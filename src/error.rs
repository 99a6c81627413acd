use std::path::PathBuf;

use thiserror::Error;

/// Failures while driving the grid UI through its export buttons.
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("element `{selector}` did not appear within {waited_secs}s")]
    SelectorNotFound { selector: String, waited_secs: u64 },

    #[error("no completed .{} download appeared in {} within {}s", .extension, .dir.display(), .timeout_secs)]
    DownloadTimeout {
        extension: &'static str,
        dir: PathBuf,
        timeout_secs: u64,
    },

    #[error("webdriver request failed")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("download directory access failed")]
    Io(#[from] std::io::Error),
}

/// Failures while fetching grid rows from the data endpoint.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("grid data request failed")]
    DataFetchFailure(#[from] reqwest::Error),

    #[error("grid data fetch task failed")]
    FetchTask(#[from] tokio::task::JoinError),
}

/// Configuration problems detected before any resource is acquired.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing email credentials: {0} is not set")]
    MissingCredentials(&'static str),

    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("failed to read or write config file")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON")]
    Parse(#[from] serde_json::Error),
}

/// Failures while encoding an export artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("workbook generation failed")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("pptx packaging failed")]
    Archive(#[from] zip::result::ZipError),

    #[error("artifact write failed")]
    Io(#[from] std::io::Error),
}
