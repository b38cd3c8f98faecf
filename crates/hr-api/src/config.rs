//! API server configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Employee table; updates are written back to this file.
    #[serde(default = "default_employees_csv")]
    pub employees_csv: PathBuf,
    /// Health plan table. Missing file means no plans are offered.
    #[serde(default = "default_health_plans_csv")]
    pub health_plans_csv: Option<PathBuf>,
    /// Where generated W-2 documents are written.
    #[serde(default = "default_w2_output_dir")]
    pub w2_output_dir: PathBuf,
    #[serde(default = "default_tax_year")]
    pub tax_year: i32,
    /// Recipient of escalation emails.
    #[serde(default = "default_hr_email")]
    pub hr_email: String,
    /// Sessions untouched for this long are dropped with their pending state.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// Allowed CORS origins (e.g., ["http://localhost:5173"]). Empty allows any.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_employees_csv() -> PathBuf {
    PathBuf::from("employees.csv")
}

fn default_health_plans_csv() -> Option<PathBuf> {
    Some(PathBuf::from("health_plans.csv"))
}

fn default_w2_output_dir() -> PathBuf {
    PathBuf::from("tax_documents")
}

fn default_tax_year() -> i32 {
    2024
}

fn default_session_ttl_secs() -> u64 {
    30 * 60
}

fn default_hr_email() -> String {
    hr_core::email::DEFAULT_HR_EMAIL.to_string()
}

impl ApiConfig {
    /// Load config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        if let Ok(path) = std::env::var("EMPLOYEES_CSV_PATH") {
            config.employees_csv = path.into();
        }
        if let Ok(path) = std::env::var("HEALTH_PLANS_CSV") {
            config.health_plans_csv = (!path.is_empty()).then(|| path.into());
        }
        if let Ok(dir) = std::env::var("W2_OUTPUT_DIR") {
            config.w2_output_dir = dir.into();
        }
        if let Ok(email) = std::env::var("HR_EMAIL") {
            config.hr_email = email;
        }
        if let Some(ttl) = std::env::var("SESSION_TTL_SECS").ok().and_then(|t| t.parse().ok()) {
            config.session_ttl_secs = ttl;
        }
        config
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Load config from a TOML file path.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// `HR_API_CONFIG` file if set, otherwise the environment.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("HR_API_CONFIG") {
            Ok(path) => Self::from_file(path),
            Err(_) => Ok(Self::from_env()),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            employees_csv: default_employees_csv(),
            health_plans_csv: default_health_plans_csv(),
            w2_output_dir: default_w2_output_dir(),
            tax_year: default_tax_year(),
            hr_email: default_hr_email(),
            session_ttl_secs: default_session_ttl_secs(),
            cors_origins: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.employees_csv, PathBuf::from("employees.csv"));
        assert_eq!(config.tax_year, 2024);
        assert_eq!(config.hr_email, "hr@company.com");
        assert_eq!(config.session_ttl(), Duration::from_secs(1800));
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn deserialize_partial_toml() {
        let config: ApiConfig = toml::from_str(
            r#"
port = 9090
employees_csv = "/data/staff.csv"
tax_year = 2023
session_ttl_secs = 60
"#,
        )
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.employees_csv, PathBuf::from("/data/staff.csv"));
        assert_eq!(config.tax_year, 2023);
        assert_eq!(config.session_ttl_secs, 60);
        assert_eq!(config.w2_output_dir, PathBuf::from("tax_documents"));
        assert_eq!(
            config.health_plans_csv,
            Some(PathBuf::from("health_plans.csv"))
        );
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hr_email = \"people@example.org\"").unwrap();
        writeln!(file, "cors_origins = [\"http://localhost:5173\"]").unwrap();

        let config = ApiConfig::from_file(file.path()).unwrap();
        assert_eq!(config.hr_email, "people@example.org");
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn from_file_missing_is_error() {
        assert!(ApiConfig::from_file("/nonexistent/hr-api.toml").is_err());
    }
}
