//! Tests for the classification pipeline
//!
//! Fixtures build small primary and pending-orders tables with the current
//! "Logistica" column layout.

pub mod pipeline_tests;

use crate::constants::{PRIMARY_TABLE_NAME, SECONDARY_TABLE_NAME};
use crate::table::RawTable;

/// Primary log columns used by the fixtures
pub const PRIMARY_HEADERS: &[&str] = &[
    "Remision",
    "no. pedido",
    "Cliente",
    "Factura",
    "Fecha fact",
    "Hora facturacion",
    "Fecha Entrega",
    "Fecha de SURTIMIENTO",
    "Tiempo surtimiento",
    "Tiempo embarque",
    "T. Servicio",
    "Demora",
    "Liberacion",
];

/// One primary row; unspecified cells are blank
#[derive(Debug, Clone, Default)]
pub struct PrimaryRow {
    pub remision: &'static str,
    pub order_id: &'static str,
    pub client: &'static str,
    pub invoice_number: &'static str,
    pub invoicing_date: &'static str,
    pub invoicing_time: &'static str,
    pub delivery_date: &'static str,
    pub fulfillment_date: &'static str,
    pub fulfillment_duration: &'static str,
    pub shipping_duration: &'static str,
    pub service_time: &'static str,
    pub delay: &'static str,
    pub release_status: &'static str,
}

impl PrimaryRow {
    pub fn new(remision: &'static str, order_id: &'static str) -> Self {
        Self {
            remision,
            order_id,
            ..Self::default()
        }
    }

    fn cells(&self) -> Vec<String> {
        [
            self.remision,
            self.order_id,
            self.client,
            self.invoice_number,
            self.invoicing_date,
            self.invoicing_time,
            self.delivery_date,
            self.fulfillment_date,
            self.fulfillment_duration,
            self.shipping_duration,
            self.service_time,
            self.delay,
            self.release_status,
        ]
        .iter()
        .map(|cell| cell.to_string())
        .collect()
    }
}

pub fn primary_table(rows: &[PrimaryRow]) -> RawTable {
    RawTable::new(
        PRIMARY_TABLE_NAME,
        PRIMARY_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows.iter().map(PrimaryRow::cells).collect(),
    )
}

/// Pending-orders sheet with filler columns around the two that matter
pub fn pending_table(rows: &[(&str, &str)]) -> RawTable {
    RawTable::new(
        SECONDARY_TABLE_NAME,
        ["no. pedido", "Cliente", "Estatus operativo", "Importe", "Vendedor", "Zona", "Notas"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        rows.iter()
            .map(|(order_id, status)| {
                vec![
                    order_id.to_string(),
                    "ACME".to_string(),
                    status.to_string(),
                    "100.00".to_string(),
                    "LP".to_string(),
                    "NORTE".to_string(),
                    "ignored".to_string(),
                ]
            })
            .collect(),
    )
}
