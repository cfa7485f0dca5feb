//! Configuration management and validation.
//!
//! One parameterized pipeline replaces the per-dashboard copies: column names,
//! tier thresholds, the status allow-list and the view definitions are all
//! injected from here. Loading is layered: built-in defaults, then a TOML
//! file, then environment variables; the CLI applies its overrides last.

use crate::classify::severity::ThresholdConfig;
use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_ALLOWED_STATUSES, DEFAULT_REFRESH_INTERVAL_SECS,
    ENV_COLUMN_PROFILE, ENV_REFRESH_SECS, PLACEHOLDER_NOT_APPLICABLE, SECONDARY_COLUMN_LIMIT,
    columns,
};
use crate::error::{Result, SemaforoError};
use crate::pipeline::filter::ViewCatalog;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Header names of every field the pipeline reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub remision: String,
    pub order_id: String,
    pub client: String,
    pub invoice_number: String,
    pub invoicing_date: String,
    pub invoicing_time: String,
    pub delivery_date: String,
    pub fulfillment_date: String,
    pub elaboration_date: String,
    pub shipment_date: String,
    pub fulfillment_duration: String,
    pub shipping_duration: String,
    pub service_time: String,
    pub delay: String,
    pub release_status: String,

    /// Order column of the pending-orders sheet
    pub pending_order_id: String,
    pub operational_status: String,

    pub timer_start: String,
    pub timer_pause: String,
    pub timer_total: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::logistica()
    }
}

impl ColumnMapping {
    /// Current "Logistica" sheet layout
    pub fn logistica() -> Self {
        Self {
            remision: columns::REMISION.to_string(),
            order_id: columns::ORDER_ID.to_string(),
            client: columns::CLIENT.to_string(),
            invoice_number: columns::INVOICE_NUMBER.to_string(),
            invoicing_date: columns::INVOICING_DATE.to_string(),
            invoicing_time: columns::INVOICING_TIME.to_string(),
            delivery_date: columns::DELIVERY_DATE.to_string(),
            fulfillment_date: columns::FULFILLMENT_DATE.to_string(),
            elaboration_date: columns::ELABORATION_DATE.to_string(),
            shipment_date: columns::SHIPMENT_DATE.to_string(),
            fulfillment_duration: columns::FULFILLMENT_DURATION.to_string(),
            shipping_duration: columns::SHIPPING_DURATION.to_string(),
            service_time: columns::SERVICE_TIME.to_string(),
            delay: columns::DELAY.to_string(),
            release_status: columns::RELEASE_STATUS.to_string(),
            pending_order_id: columns::ORDER_ID.to_string(),
            operational_status: columns::OPERATIONAL_STATUS.to_string(),
            timer_start: columns::TIMER_START.to_string(),
            timer_pause: columns::TIMER_PAUSE.to_string(),
            timer_total: columns::TIMER_TOTAL.to_string(),
        }
    }

    /// Older sheet layout: order column "Pedido", time column "Hora factura"
    pub fn legacy() -> Self {
        Self {
            order_id: columns::ORDER_ID_LEGACY.to_string(),
            pending_order_id: columns::ORDER_ID_LEGACY.to_string(),
            invoicing_time: columns::INVOICING_TIME_LEGACY.to_string(),
            ..Self::logistica()
        }
    }

    pub fn for_profile(profile: ColumnProfile) -> Self {
        match profile {
            ColumnProfile::Logistica => Self::logistica(),
            ColumnProfile::Legacy => Self::legacy(),
        }
    }

    fn named_columns(&self) -> [(&'static str, &str); 20] {
        [
            ("remision", &self.remision),
            ("order_id", &self.order_id),
            ("client", &self.client),
            ("invoice_number", &self.invoice_number),
            ("invoicing_date", &self.invoicing_date),
            ("invoicing_time", &self.invoicing_time),
            ("delivery_date", &self.delivery_date),
            ("fulfillment_date", &self.fulfillment_date),
            ("elaboration_date", &self.elaboration_date),
            ("shipment_date", &self.shipment_date),
            ("fulfillment_duration", &self.fulfillment_duration),
            ("shipping_duration", &self.shipping_duration),
            ("service_time", &self.service_time),
            ("delay", &self.delay),
            ("release_status", &self.release_status),
            ("pending_order_id", &self.pending_order_id),
            ("operational_status", &self.operational_status),
            ("timer_start", &self.timer_start),
            ("timer_pause", &self.timer_pause),
            ("timer_total", &self.timer_total),
        ]
    }
}

/// Named column-name presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnProfile {
    #[default]
    Logistica,
    Legacy,
}

impl FromStr for ColumnProfile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "logistica" => Ok(ColumnProfile::Logistica),
            "legacy" => Ok(ColumnProfile::Legacy),
            other => Err(format!(
                "unknown column profile '{other}' (expected logistica or legacy)"
            )),
        }
    }
}

impl fmt::Display for ColumnProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnProfile::Logistica => f.write_str("logistica"),
            ColumnProfile::Legacy => f.write_str("legacy"),
        }
    }
}

/// Global configuration for the classification pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub columns: ColumnMapping,
    pub thresholds: ThresholdConfig,
    /// Operational statuses eligible for the join (exact match after normalization)
    pub allowed_statuses: Vec<String>,
    /// Leading columns kept from the pending-orders sheet
    pub secondary_column_limit: usize,
    /// Literal treated the same as a blank cell
    pub placeholder: String,
    pub views: ViewCatalog,
    /// Seconds between passes of the watch loop
    pub refresh_interval_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            thresholds: ThresholdConfig::default(),
            allowed_statuses: DEFAULT_ALLOWED_STATUSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            secondary_column_limit: SECONDARY_COLUMN_LIMIT,
            placeholder: PLACEHOLDER_NOT_APPLICABLE.to_string(),
            views: ViewCatalog::default(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl PipelineConfig {
    /// Default location: `<user config dir>/semaforo/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a TOML config file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SemaforoError::configuration(format!(
                "config file not found: {}",
                path.display()
            )),
            _ => SemaforoError::Io(e),
        })?;
        toml::from_str(&text).map_err(|source| SemaforoError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, then the given (or default-location) file, then the environment
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let default_path = Self::default_config_path();
        let file = match config_file {
            Some(path) => Some(path),
            None => default_path.as_deref().filter(|path| path.exists()),
        };

        let mut config = match file {
            Some(path) => {
                info!("Using config file: {}", path.display());
                Self::from_file(path)?
            }
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `SEMAFORO_*` overrides read through `lookup`
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        if let Some(value) = lookup(ENV_REFRESH_SECS) {
            self.refresh_interval_secs = value.trim().parse().map_err(|_| {
                SemaforoError::configuration(format!(
                    "{ENV_REFRESH_SECS} must be a whole number of seconds, got '{value}'"
                ))
            })?;
        }
        if let Some(value) = lookup(ENV_COLUMN_PROFILE) {
            let profile = value.parse::<ColumnProfile>().map_err(SemaforoError::configuration)?;
            self.columns = ColumnMapping::for_profile(profile);
        }
        Ok(())
    }

    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_thresholds(mut self, thresholds: ThresholdConfig) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_allowed_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_statuses = statuses.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_refresh_interval_secs(mut self, secs: u64) -> Self {
        self.refresh_interval_secs = secs;
        self
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.allowed_statuses.is_empty()
            || self.allowed_statuses.iter().any(|s| s.trim().is_empty())
        {
            return Err(SemaforoError::configuration(
                "allowed_statuses must list at least one non-blank status",
            ));
        }
        if self.secondary_column_limit == 0 {
            return Err(SemaforoError::configuration(
                "secondary_column_limit must be at least 1",
            ));
        }
        if self.refresh_interval_secs == 0 {
            return Err(SemaforoError::configuration(
                "refresh_interval_secs must be at least 1",
            ));
        }
        if let Some((field, _)) = self
            .columns
            .named_columns()
            .into_iter()
            .find(|(_, name)| name.trim().is_empty())
        {
            return Err(SemaforoError::configuration(format!(
                "column name for '{field}' is blank"
            )));
        }

        let thresholds = [
            ("fulfillment", &self.thresholds.fulfillment),
            ("shipping", &self.thresholds.shipping),
            ("invoicing", &self.thresholds.invoicing),
            ("delay", &self.thresholds.delay),
        ];
        for (name, tiers) in thresholds {
            if !tiers.is_ordered() {
                return Err(SemaforoError::configuration(format!(
                    "{name} thresholds: warning limit {} lies below on-time limit {}",
                    tiers.warning.value, tiers.on_time.value
                )));
            }
        }

        Ok(())
    }
}
