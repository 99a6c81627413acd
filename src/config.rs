use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::automation::ExportKind;
use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Front-end serving the grid.
    pub target_url: String,
    /// JSON endpoint the grid loads its rows from.
    pub data_endpoint: String,
    /// Where triggered downloads and generated artifacts land.
    pub download_dir: PathBuf,
    pub webdriver_url: String,
    pub chromedriver_port: u16,
    /// Spawn and own a local chromedriver instead of expecting one running.
    pub manage_chromedriver: bool,
    pub headless: bool,
    /// Generate the artifacts directly from the data endpoint instead of
    /// clicking through the browser UI.
    pub direct_export: bool,
    /// Parallel fetches against the data endpoint. The front-end fires ten
    /// identical requests; anything above 1 only multiplies the payload.
    pub fetch_fan_out: usize,
    pub download_timeout_secs: u64,
    pub export_excel: bool,
    pub export_pdf: bool,
    pub export_ppt: bool,
    /// Dormant email delivery path; when enabled, credentials are checked
    /// before any browser or network resource is acquired.
    pub email_delivery: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_url: "http://localhost:4200/".to_string(),
            data_endpoint: "https://api.npoint.io/b66e5ba94ad1ae231518".to_string(),
            download_dir: PathBuf::from("downloads"),
            webdriver_url: "http://localhost:9515".to_string(),
            chromedriver_port: 9515,
            manage_chromedriver: true,
            headless: true,
            direct_export: false,
            fetch_fan_out: 1,
            download_timeout_secs: 60,
            export_excel: true,
            export_pdf: true,
            export_ppt: true,
            email_delivery: false,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            // First run: persist the defaults so they can be edited.
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, content)?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let proj_dirs = ProjectDirs::from("com", "aggrid", "aggrid-exporter")
            .ok_or(ConfigError::NoConfigDir)?;

        Ok(proj_dirs.config_dir().join("config.json"))
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.target_url.is_empty() {
            errors.push("Target URL is required".to_string());
        }

        if self.data_endpoint.is_empty() {
            errors.push("Data endpoint is required".to_string());
        }

        if !self.export_excel && !self.export_pdf && !self.export_ppt {
            errors.push("At least one export format must be selected".to_string());
        }

        if self.download_timeout_secs == 0 {
            errors.push("Download timeout must be at least one second".to_string());
        }

        errors
    }

    /// Enabled export kinds, always in the fixed Excel -> PDF -> PPT order.
    pub fn enabled_kinds(&self) -> Vec<ExportKind> {
        ExportKind::SEQUENCE
            .into_iter()
            .filter(|kind| match kind {
                ExportKind::Excel => self.export_excel,
                ExportKind::Pdf => self.export_pdf,
                ExportKind::Ppt => self.export_ppt,
            })
            .collect()
    }
}

/// Credentials for the dormant email delivery path, read from the
/// environment. Missing either variable aborts startup before any resource
/// is acquired.
#[derive(Debug, Clone)]
pub struct EmailCredentials {
    pub user: String,
    pub pass: String,
}

impl EmailCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        let user = std::env::var("EMAIL_USER")
            .map_err(|_| ConfigError::MissingCredentials("EMAIL_USER"))?;
        let pass = std::env::var("EMAIL_PASS")
            .map_err(|_| ConfigError::MissingCredentials("EMAIL_PASS"))?;
        Ok(Self { user, pass })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates_cleanly() {
        assert!(AppConfig::default().validate().is_empty());
    }

    #[test]
    fn disabling_every_format_is_flagged() {
        let config = AppConfig {
            export_excel: false,
            export_pdf: false,
            export_ppt: false,
            ..AppConfig::default()
        };
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn enabled_kinds_keep_the_fixed_order() {
        let config = AppConfig::default();
        assert_eq!(config.enabled_kinds(), ExportKind::SEQUENCE.to_vec());

        let without_excel = AppConfig {
            export_excel: false,
            ..AppConfig::default()
        };
        assert_eq!(
            without_excel.enabled_kinds(),
            vec![ExportKind::Pdf, ExportKind::Ppt]
        );
    }

    #[test]
    fn partial_config_files_fall_back_to_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"headless": false}"#).unwrap();
        assert!(!config.headless);
        assert_eq!(config.fetch_fan_out, 1);
        assert_eq!(config.download_timeout_secs, 60);
    }

    // One combined test: the two cases share the process environment, so
    // they cannot run as independent parallel tests.
    #[test]
    fn email_credentials_come_from_the_environment() {
        std::env::remove_var("EMAIL_USER");
        std::env::remove_var("EMAIL_PASS");
        assert!(matches!(
            EmailCredentials::from_env(),
            Err(ConfigError::MissingCredentials("EMAIL_USER"))
        ));

        std::env::set_var("EMAIL_USER", "grid@example.com");
        assert!(matches!(
            EmailCredentials::from_env(),
            Err(ConfigError::MissingCredentials("EMAIL_PASS"))
        ));

        std::env::set_var("EMAIL_PASS", "secret");
        let creds = EmailCredentials::from_env().unwrap();
        assert_eq!(creds.user, "grid@example.com");

        std::env::remove_var("EMAIL_USER");
        std::env::remove_var("EMAIL_PASS");
    }
}
