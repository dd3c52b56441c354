//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Financial statement configuration.
    #[serde(default)]
    pub reports: ReportsConfig,
    /// Electronic ledger (PLE) export configuration.
    #[serde(default)]
    pub ple: PleConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Functional currency code used when an entry does not state one.
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
        }
    }
}

fn default_base_currency() -> String {
    "PEN".to_string()
}

/// Financial statement configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
    /// Fold the unclosed income/expense result into equity on the balance sheet.
    #[serde(default)]
    pub fold_period_result: bool,
    /// Account code of the synthetic retained earnings row.
    #[serde(default = "default_retained_earnings_code")]
    pub retained_earnings_code: String,
    /// Name of the synthetic retained earnings row.
    #[serde(default = "default_retained_earnings_name")]
    pub retained_earnings_name: String,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            fold_period_result: false,
            retained_earnings_code: default_retained_earnings_code(),
            retained_earnings_name: default_retained_earnings_name(),
        }
    }
}

fn default_retained_earnings_code() -> String {
    "59".to_string()
}

fn default_retained_earnings_name() -> String {
    "Resultado del ejercicio".to_string()
}

/// Electronic ledger (PLE) export configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PleConfig {
    /// Taxpayer registry number (RUC) of the reporting company.
    #[serde(default)]
    pub taxpayer_id: Option<String>,
    /// Currency indicator in the file name (1 = PEN, 2 = USD).
    #[serde(default = "default_currency_indicator")]
    pub currency_indicator: u8,
}

impl Default for PleConfig {
    fn default() -> Self {
        Self {
            taxpayer_id: None,
            currency_indicator: default_currency_indicator(),
        }
    }
}

fn default_currency_indicator() -> u8 {
    1
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON-formatted log lines.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "contab=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(None)
    }

    /// Loads configuration, layering an explicit file over the defaults.
    ///
    /// Order (later wins): `config/default`, `config/{RUN_MODE}`, `extra_file`,
    /// `CONTAB__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn load_with(extra_file: Option<&str>) -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix("CONTAB").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(
            [
                "CONTAB__REPORTS__FOLD_PERIOD_RESULT",
                "CONTAB__LEDGER__BASE_CURRENCY",
                "CONTAB__PLE__TAXPAYER_ID",
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.ledger.base_currency, "PEN");
                assert!(!config.reports.fold_period_result);
                assert_eq!(config.reports.retained_earnings_code, "59");
                assert_eq!(config.ple.currency_indicator, 1);
                assert!(config.ple.taxpayer_id.is_none());
                assert_eq!(config.logging.filter, "contab=info");
                assert!(!config.logging.json);
            },
        );
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("CONTAB__REPORTS__FOLD_PERIOD_RESULT", Some("true")),
                ("CONTAB__LEDGER__BASE_CURRENCY", Some("USD")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert!(config.reports.fold_period_result);
                assert_eq!(config.ledger.base_currency, "USD");
            },
        );
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(AppConfig::load_with(Some("does/not/exist")).is_err());
    }
}
