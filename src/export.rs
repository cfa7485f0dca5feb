//! CSV export of an ordered working set
//!
//! Rows are written in severity order with the derived stage, tier and
//! metric next to the raw fields the dashboards display.

use crate::error::{Result, SemaforoError};
use crate::models::{CellValue, ClassifiedRecord, PipelineOutput};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

fn text_column<'a>(
    records: &'a [ClassifiedRecord],
    cell: impl Fn(&'a ClassifiedRecord) -> &'a CellValue,
) -> Vec<Option<String>> {
    records
        .iter()
        .map(|record| {
            let value = cell(record);
            value.is_present().then(|| value.to_string())
        })
        .collect()
}

/// Build the export frame; column order is fixed
pub fn to_dataframe(records: &[ClassifiedRecord]) -> Result<DataFrame> {
    let remision: Vec<&str> = records.iter().map(|r| r.record.remision.as_str()).collect();
    let order_id: Vec<&str> = records.iter().map(|r| r.record.order_id.as_str()).collect();
    let client: Vec<&str> = records.iter().map(|r| r.record.client.as_str()).collect();
    let stage: Vec<&str> = records.iter().map(|r| r.stage.label()).collect();
    let severity: Vec<&str> = records.iter().map(|r| r.severity.label()).collect();
    let metric: Vec<Option<String>> = records
        .iter()
        .map(|r| r.metric.map(|m| m.to_string()))
        .collect();
    let release: Vec<&str> = records
        .iter()
        .map(|r| r.record.release_status.label())
        .collect();
    let invoice: Vec<Option<&str>> = records
        .iter()
        .map(|r| r.record.invoice_number.as_deref())
        .collect();
    let operational: Vec<Option<&str>> = records
        .iter()
        .map(|r| r.record.operational_status.as_deref())
        .collect();

    let df = df!(
        "remision" => remision,
        "order_id" => order_id,
        "client" => client,
        "stage" => stage,
        "severity" => severity,
        "metric" => metric,
        "release_status" => release,
        "invoice_number" => invoice,
        "operational_status" => operational,
        "elaboration_date" => text_column(records, |r| &r.record.elaboration_date),
        "fulfillment_date" => text_column(records, |r| &r.record.fulfillment_date),
        "invoicing_date" => text_column(records, |r| &r.record.invoicing_date),
        "shipment_date" => text_column(records, |r| &r.record.shipment_date),
        "delivery_date" => text_column(records, |r| &r.record.delivery_date),
        "fulfillment_duration" => text_column(records, |r| &r.record.fulfillment_duration),
        "shipping_duration" => text_column(records, |r| &r.record.shipping_duration),
        "delay" => text_column(records, |r| &r.record.delay),
    )?;
    Ok(df)
}

/// Write the ordered records of `output` to `path`
pub fn write_csv(path: &Path, output: &PipelineOutput) -> Result<()> {
    let mut df = to_dataframe(&output.records)?;
    let mut file = File::create(path).map_err(|e| SemaforoError::Export {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| SemaforoError::Export {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    info!(
        "Exported {} records for view '{}' to {}",
        df.height(),
        output.view,
        path.display()
    );
    Ok(())
}
