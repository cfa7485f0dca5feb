//! Cross-component tests for the classification building blocks
//!
//! Exercises the parser, stage and severity components together over
//! generated combinations of cell contents.


use crate::classify::parse::{date_cell, duration_cell, number_cell};
use crate::models::{CellValue, Record};

/// Cell texts covering valid, placeholder, blank and malformed inputs
pub const DATE_SAMPLES: &[&str] = &[
    "",
    "N/A",
    "n/a",
    "01/02/2025",
    "01-02-2025",
    "01/02/2025 - 03/02/2025",
    "2025-02-01",
    "31/02/2025",
    "pendiente",
];

pub const DURATION_SAMPLES: &[&str] = &["", "N/A", "0:00:00", "2:40:00", "3:00:01", "26:00:00", "2:40", "x"];

pub const NUMBER_SAMPLES: &[&str] = &["", "N/A", "0", "1", "2", "0.5", "uno"];

pub fn date(raw: &str) -> CellValue {
    date_cell(Some(raw), "N/A")
}

pub fn duration(raw: &str) -> CellValue {
    duration_cell(Some(raw), "N/A")
}

pub fn number(raw: &str) -> CellValue {
    number_cell(Some(raw), "N/A")
}

/// Every combination of invoicing/delivery/fulfillment date and fulfillment duration
pub fn record_grid() -> Vec<Record> {
    let mut records = Vec::new();
    for invoicing in DATE_SAMPLES {
        for delivery in DATE_SAMPLES {
            for fulfilled in DATE_SAMPLES {
                for elapsed in DURATION_SAMPLES {
                    let mut record = Record::new(records.len(), format!("R{}", records.len()), "P1");
                    record.invoicing_date = date(invoicing);
                    record.delivery_date = date(delivery);
                    record.fulfillment_date = date(fulfilled);
                    record.fulfillment_duration = duration(elapsed);
                    records.push(record);
                }
            }
        }
    }
    records
}
