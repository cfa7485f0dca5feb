//! Application constants for the logistics semaphore
//!
//! Column names, placeholder literals, date formats and default thresholds
//! shared by the classification pipeline and the CLI.

// =============================================================================
// Source Tables
// =============================================================================

/// Worksheet holding the primary logistics log
pub const PRIMARY_TABLE_NAME: &str = "Logistica";

/// Worksheet holding the pending-orders list
pub const SECONDARY_TABLE_NAME: &str = "Ped Pendientes";

/// Only the leading columns of the pending-orders sheet carry data
pub const SECONDARY_COLUMN_LIMIT: usize = 6;

/// Operational statuses that make a pending order eligible for the join
pub const DEFAULT_ALLOWED_STATUSES: &[&str] = &["FACTURACION/FISICO EMBARQUES", "EMBARQUES"];

/// Literal the sheets use interchangeably with a blank cell
pub const PLACEHOLDER_NOT_APPLICABLE: &str = "N/A";

// =============================================================================
// Parsing Formats
// =============================================================================

/// Primary single-date format (day first, strict)
pub const DATE_FORMAT_SLASH: &str = "%d/%m/%Y";

/// Alternate single-date format seen in some exports
pub const DATE_FORMAT_DASH: &str = "%d-%m-%Y";

/// Timestamp format of the stopwatch columns
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

// =============================================================================
// Severity Thresholds (seconds unless noted)
// =============================================================================

pub mod thresholds {
    /// Fulfillment is on time up to 2h40m inclusive
    pub const FULFILLMENT_ON_TIME_SECS: f64 = (2 * 3600 + 40 * 60) as f64;
    /// Fulfillment is a warning up to 3h inclusive
    pub const FULFILLMENT_WARNING_SECS: f64 = (3 * 3600) as f64;

    pub const SHIPPING_ON_TIME_SECS: f64 = (23 * 3600) as f64;
    pub const SHIPPING_WARNING_SECS: f64 = (24 * 3600) as f64;

    /// Invoice-vs-fulfillment gap, canonical 3h/6h pair
    pub const INVOICING_ON_TIME_SECS: f64 = (3 * 3600) as f64;
    pub const INVOICING_WARNING_SECS: f64 = (6 * 3600) as f64;

    /// Unitless delay count: below 1 is on time, exactly 1 is a warning
    pub const DELAY_ON_TIME_BELOW: f64 = 1.0;
    pub const DELAY_WARNING_MAX: f64 = 1.0;
}

// =============================================================================
// Runtime Defaults
// =============================================================================

/// Default re-run cadence of the watch command (the dashboards refreshed every 5 minutes)
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Tiles per row in the terminal grid
pub const GRID_TILES_PER_ROW: usize = 22;

/// Name of the config directory under the user config dir
pub const CONFIG_DIR_NAME: &str = "semaforo";

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment override for the watch cadence
pub const ENV_REFRESH_SECS: &str = "SEMAFORO_REFRESH_SECS";

/// Environment override for the column-name profile
pub const ENV_COLUMN_PROFILE: &str = "SEMAFORO_COLUMN_PROFILE";

// =============================================================================
// Column Name Constants
// =============================================================================

/// Header names of the "Logistica" worksheet
pub mod columns {
    pub const REMISION: &str = "Remision";
    pub const ORDER_ID: &str = "no. pedido";
    pub const ORDER_ID_LEGACY: &str = "Pedido";
    pub const CLIENT: &str = "Cliente";
    pub const INVOICE_NUMBER: &str = "Factura";
    pub const INVOICING_DATE: &str = "Fecha fact";
    pub const INVOICING_TIME: &str = "Hora facturacion";
    pub const INVOICING_TIME_LEGACY: &str = "Hora factura";
    pub const DELIVERY_DATE: &str = "Fecha Entrega";
    pub const FULFILLMENT_DATE: &str = "Fecha de SURTIMIENTO";
    pub const ELABORATION_DATE: &str = "Fecha elaboracion";
    pub const SHIPMENT_DATE: &str = "Fecha embarque";
    pub const FULFILLMENT_DURATION: &str = "Tiempo surtimiento";
    pub const SHIPPING_DURATION: &str = "Tiempo embarque";
    pub const SERVICE_TIME: &str = "T. Servicio";
    pub const DELAY: &str = "Demora";
    pub const RELEASE_STATUS: &str = "Liberacion";

    // Stopwatch columns
    pub const TIMER_START: &str = "HoraInicioP";
    pub const TIMER_PAUSE: &str = "HoraPausaP";
    pub const TIMER_TOTAL: &str = "TiempoTotalP";

    // Pending-orders worksheet
    pub const OPERATIONAL_STATUS: &str = "Estatus operativo";
}
