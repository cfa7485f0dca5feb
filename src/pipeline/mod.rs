//! Multi-source classification pipeline
//!
//! One invocation pulls full snapshots of the primary log and the
//! pending-orders table and runs every pass to completion:
//!
//! 1. Drop rows with a blank display identifier (remision)
//! 2. Type every row into a [`Record`], parsing each cell exactly once
//! 3. Inner-join against pending orders (when the view asks for it)
//! 4. Apply the view's completeness filter
//! 5. Classify stage, then severity
//! 6. Stable severity-first ordering and aggregate counts
//!
//! Nothing here writes back to a source. Running the same snapshot twice
//! yields the same ordered output.

pub mod filter;
pub mod join;

#[cfg(test)]
pub mod tests;

pub use filter::{CompletenessFilter, ViewCatalog, ViewDefinition};
pub use join::{JoinOutcome, PendingOrderIndex, join_pending_orders};

use crate::classify::normalize::normalize;
use crate::classify::parse::{clock_cell, date_cell, duration_cell, number_cell, text_cell};
use crate::classify::validity::is_present_with;
use crate::classify::{aggregate, classify_severity, classify_stage, order_by_severity};
use crate::config::{ColumnMapping, PipelineConfig};
use crate::error::Result;
use crate::models::{
    ClassifiedRecord, PipelineOutput, PipelineStats, Record, ReleaseStatus, Severity, Summary, View,
};
use crate::table::{RawTable, RowView};
use tracing::{debug, info, warn};

/// Resolved column positions for one primary table
#[derive(Debug)]
pub struct RecordBuilder<'a> {
    placeholder: &'a str,
    remision: usize,
    order_id: usize,
    client: Option<usize>,
    invoice_number: Option<usize>,
    invoicing_date: Option<usize>,
    invoicing_time: Option<usize>,
    delivery_date: Option<usize>,
    fulfillment_date: Option<usize>,
    elaboration_date: Option<usize>,
    shipment_date: Option<usize>,
    fulfillment_duration: Option<usize>,
    shipping_duration: Option<usize>,
    service_time: Option<usize>,
    delay: Option<usize>,
    release_status: Option<usize>,
}

impl<'a> RecordBuilder<'a> {
    /// Resolve columns; identifier columns are required, the rest degrade to absent
    pub fn new(table: &RawTable, columns: &ColumnMapping, placeholder: &'a str) -> Result<Self> {
        let optional = |column: &str| {
            let index = table.column_index(column);
            if index.is_none() {
                warn!(
                    "Column '{}' not found in table '{}', its values are treated as absent",
                    column,
                    table.name()
                );
            }
            index
        };

        Ok(Self {
            placeholder,
            remision: table.require_column(&columns.remision)?,
            order_id: table.require_column(&columns.order_id)?,
            client: optional(&columns.client),
            invoice_number: optional(&columns.invoice_number),
            invoicing_date: optional(&columns.invoicing_date),
            invoicing_time: optional(&columns.invoicing_time),
            delivery_date: optional(&columns.delivery_date),
            fulfillment_date: optional(&columns.fulfillment_date),
            elaboration_date: optional(&columns.elaboration_date),
            shipment_date: optional(&columns.shipment_date),
            fulfillment_duration: optional(&columns.fulfillment_duration),
            shipping_duration: optional(&columns.shipping_duration),
            service_time: optional(&columns.service_time),
            delay: optional(&columns.delay),
            release_status: optional(&columns.release_status),
        })
    }

    /// Normalized display identifier, `None` when it normalizes to empty
    pub fn display_id(&self, row: &RowView<'_>) -> Option<String> {
        let remision = normalize(row.get_at(self.remision));
        (!remision.is_empty()).then_some(remision)
    }

    /// Type one row; `remision` comes from [`RecordBuilder::display_id`]
    pub fn build(&self, row: &RowView<'_>, remision: String) -> Record {
        let cell = |index: Option<usize>| index.and_then(|i| row.get_at(i));
        let placeholder = self.placeholder;

        Record {
            row_index: row.index(),
            remision,
            order_id: normalize(row.get_at(self.order_id)),
            client: normalize(cell(self.client)),
            invoice_number: cell(self.invoice_number)
                .filter(|v| is_present_with(Some(*v), placeholder))
                .map(|v| normalize(Some(v))),
            elaboration_date: date_cell(cell(self.elaboration_date), placeholder),
            delivery_date: date_cell(cell(self.delivery_date), placeholder),
            invoicing_date: date_cell(cell(self.invoicing_date), placeholder),
            invoicing_time: clock_cell(cell(self.invoicing_time), placeholder),
            fulfillment_date: date_cell(cell(self.fulfillment_date), placeholder),
            shipment_date: date_cell(cell(self.shipment_date), placeholder),
            fulfillment_duration: duration_cell(cell(self.fulfillment_duration), placeholder),
            shipping_duration: duration_cell(cell(self.shipping_duration), placeholder),
            service_time: text_cell(cell(self.service_time), placeholder),
            delay: number_cell(cell(self.delay), placeholder),
            release_status: cell(self.release_status)
                .map(|v| ReleaseStatus::from_raw(&normalize(Some(v))))
                .unwrap_or_default(),
            operational_status: None,
        }
    }
}

/// Totals of one view for the global overview
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOverview {
    pub view: View,
    pub summary: Summary,
    pub stats: PipelineStats,
}

/// Parameterized classification pipeline shared by every view
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one view over full snapshots of both tables
    pub fn run(&self, view: View, primary: &RawTable, secondary: &RawTable) -> Result<PipelineOutput> {
        let index = PendingOrderIndex::build(secondary, &self.config)?;
        self.run_with_index(view, primary, &index)
    }

    /// Run every view, sharing one pending-orders index
    pub fn overview(&self, primary: &RawTable, secondary: &RawTable) -> Result<Vec<ViewOverview>> {
        let index = PendingOrderIndex::build(secondary, &self.config)?;
        View::ALL
            .iter()
            .map(|&view| {
                let output = self.run_with_index(view, primary, &index)?;
                Ok(ViewOverview {
                    view,
                    summary: output.summary,
                    stats: output.stats,
                })
            })
            .collect()
    }

    fn run_with_index(
        &self,
        view: View,
        primary: &RawTable,
        index: &PendingOrderIndex,
    ) -> Result<PipelineOutput> {
        let definition = self.config.views.get(view);
        let builder = RecordBuilder::new(primary, &self.config.columns, &self.config.placeholder)?;
        let mut stats = PipelineStats {
            input_rows: primary.len(),
            ..PipelineStats::default()
        };

        let mut records = Vec::with_capacity(primary.len());
        for row in primary.rows() {
            match builder.display_id(&row) {
                Some(remision) => records.push(builder.build(&row, remision)),
                None => stats.blank_id_dropped += 1,
            }
        }

        if definition.join_pending_orders {
            let joined = join_pending_orders(records, index);
            stats.join_dropped = joined.unmatched;
            stats.status_dropped = joined.status_rejected;
            records = joined.records;
        }

        let before_filter = records.len();
        records.retain(|record| definition.filter.keeps(record));
        stats.filter_dropped = before_filter - records.len();

        let mut classified: Vec<ClassifiedRecord> = records
            .into_iter()
            .map(|record| {
                let stage = classify_stage(&record);
                let (severity, metric) = classify_severity(
                    &record,
                    stage,
                    definition.severity_basis,
                    &self.config.thresholds,
                );
                ClassifiedRecord {
                    record,
                    stage,
                    severity,
                    metric,
                }
            })
            .collect();

        order_by_severity(&mut classified);
        let summary = aggregate(&classified);
        stats.classified = classified.len();

        debug!("View '{}': {}", view, stats.summary());
        info!(
            "Classified {} records for view '{}' ({} late, {} warning)",
            summary.total,
            view,
            summary.severity_count(Severity::Late),
            summary.severity_count(Severity::Warning)
        );

        Ok(PipelineOutput {
            view,
            records: classified,
            summary,
            stats,
        })
    }
}
