use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::quote::input::{MAX_EXCHANGE_RATE, MAX_MARGIN_PERCENT};

/// Environment variable prefix, e.g. `PRICING_SIM__SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "PRICING_SIM";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub quote: QuoteConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Directory holding the workbooks
    pub data_dir: PathBuf,
    /// Flat services + recording tiers workbook
    pub services_file: String,
    /// Grouped solutions workbook
    pub solutions_file: String,
    /// Load both catalogs at startup; a failure is logged and retried on the
    /// first request
    pub preload: bool,
}

impl CatalogConfig {
    pub fn services_path(&self) -> PathBuf {
        self.data_dir.join(&self.services_file)
    }

    pub fn solutions_path(&self) -> PathBuf {
        self.data_dir.join(&self.solutions_file)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoteConfig {
    /// Global margin applied when a request does not carry one
    pub default_margin_percent: f64,
    /// Currency totals are converted into
    pub currency: String,
    /// Units of `currency` per USD
    pub exchange_rate: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub endpoint: String,
}

/// Load configuration from `path` (optional) layered with environment
/// variables. Defaults cover every key, so a missing file is not an error.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("server.log_level", "info")?
        .set_default("server.log_format", "text")?
        .set_default("catalog.data_dir", "data")?
        .set_default("catalog.services_file", "precios_software_seguridad_nube.xlsx")?
        .set_default("catalog.solutions_file", "precios.xlsx")?
        .set_default("catalog.preload", true)?
        .set_default("quote.default_margin_percent", 30.0)?
        .set_default("quote.currency", "USD")?
        .set_default("quote.exchange_rate", 1.0)?
        .set_default("metrics.enabled", true)?
        .set_default("metrics.endpoint", "/metrics")?
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        anyhow::bail!("server.port must be non-zero");
    }

    match cfg.server.log_format.as_str() {
        "text" | "json" => {}
        other => anyhow::bail!("server.log_format must be 'text' or 'json', got '{}'", other),
    }

    if cfg.catalog.services_file.trim().is_empty() {
        anyhow::bail!("catalog.services_file cannot be empty");
    }
    if cfg.catalog.solutions_file.trim().is_empty() {
        anyhow::bail!("catalog.solutions_file cannot be empty");
    }

    let margin = cfg.quote.default_margin_percent;
    if !(0.0..=MAX_MARGIN_PERCENT).contains(&margin) {
        anyhow::bail!(
            "quote.default_margin_percent must be between 0 and {}, got {}",
            MAX_MARGIN_PERCENT,
            margin
        );
    }

    let rate = cfg.quote.exchange_rate;
    if !(rate > 0.0 && rate <= MAX_EXCHANGE_RATE) {
        anyhow::bail!(
            "quote.exchange_rate must be positive and at most {}, got {}",
            MAX_EXCHANGE_RATE,
            rate
        );
    }

    if cfg.quote.currency.trim().is_empty() {
        anyhow::bail!("quote.currency cannot be empty");
    }

    if cfg.metrics.enabled && !cfg.metrics.endpoint.starts_with('/') {
        anyhow::bail!("metrics.endpoint must start with '/', got '{}'", cfg.metrics.endpoint);
    }

    Ok(())
}

#[cfg(test)]
pub(crate) fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        },
        catalog: CatalogConfig {
            data_dir: PathBuf::from("data"),
            services_file: "precios_software_seguridad_nube.xlsx".to_string(),
            solutions_file: "precios.xlsx".to_string(),
            preload: false,
        },
        quote: QuoteConfig {
            default_margin_percent: 30.0,
            currency: "USD".to_string(),
            exchange_rate: 1.0,
        },
        metrics: MetricsConfig {
            enabled: true,
            endpoint: "/metrics".to_string(),
        },
    }
}
