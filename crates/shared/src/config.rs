//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Report defaults.
    #[serde(default)]
    pub reports: ReportConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Whether sqlx should log every statement.
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_database_url() -> String {
    "sqlite://homebook.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    1
}

fn default_min_connections() -> u32 {
    1
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            sqlx_logging: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter directive when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Defaults for derived report views.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReportConfig {
    /// Number of recent entries shown on the dashboard.
    #[serde(default = "default_recent_entries")]
    pub recent_entries: u64,
    /// Number of month-end points in the net worth trend.
    #[serde(default = "default_trend_months")]
    pub trend_months: u32,
}

fn default_recent_entries() -> u64 {
    30
}

fn default_trend_months() -> u32 {
    12
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            recent_entries: default_recent_entries(),
            trend_months: default_trend_months(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from `.env`, config files, and `HOMEBOOK__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("HOMEBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 5] = [
        "HOMEBOOK__DATABASE__URL",
        "HOMEBOOK__DATABASE__MAX_CONNECTIONS",
        "HOMEBOOK__LOGGING__LEVEL",
        "HOMEBOOK__LOGGING__JSON",
        "HOMEBOOK__REPORTS__TREND_MONTHS",
    ];

    #[test]
    fn test_load_uses_defaults() {
        temp_env::with_vars_unset(VARS, || {
            let config = AppConfig::load().unwrap();
            assert_eq!(config.database.url, "sqlite://homebook.db?mode=rwc");
            assert_eq!(config.database.max_connections, 1);
            assert_eq!(config.logging.level, "info");
            assert!(!config.logging.json);
            assert_eq!(config.reports.recent_entries, 30);
            assert_eq!(config.reports.trend_months, 12);
        });
    }

    #[test]
    fn test_load_reads_environment() {
        temp_env::with_vars(
            [
                ("HOMEBOOK__DATABASE__URL", Some("sqlite::memory:")),
                ("HOMEBOOK__DATABASE__MAX_CONNECTIONS", Some("4")),
                ("HOMEBOOK__LOGGING__LEVEL", Some("debug")),
                ("HOMEBOOK__LOGGING__JSON", Some("true")),
                ("HOMEBOOK__REPORTS__TREND_MONTHS", Some("6")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.database.max_connections, 4);
                assert_eq!(config.logging.level, "debug");
                assert!(config.logging.json);
                assert_eq!(config.reports.trend_months, 6);
                assert_eq!(config.reports.recent_entries, 30);
            },
        );
    }
}
