//! Inner join of primary records against the pending-orders table
//!
//! The pending-orders sheet is cut to its leading columns, its order ids and
//! statuses are normalized, and only rows whose status is on the allow-list
//! take part. A primary record with no eligible match is dropped; one with
//! several matches appears once per match, as any inner join would.

use crate::classify::normalize::normalize;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::Record;
use crate::table::RawTable;
use std::collections::HashMap;
use tracing::debug;

/// One eligible row of the pending-orders table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOrder {
    pub order_id: String,
    pub operational_status: String,
}

/// Pending orders indexed by normalized order id
#[derive(Debug, Default)]
pub struct PendingOrderIndex {
    eligible: HashMap<String, Vec<PendingOrder>>,
    /// Order ids present in the table but with no allowed status
    ineligible: HashMap<String, usize>,
}

impl PendingOrderIndex {
    /// Build the index; the order and status columns are required
    pub fn build(secondary: &RawTable, config: &PipelineConfig) -> Result<Self> {
        let table = secondary
            .clone()
            .truncate_columns(config.secondary_column_limit);
        let order_idx = table.require_column(&config.columns.pending_order_id)?;
        let status_idx = table.require_column(&config.columns.operational_status)?;

        let mut index = Self::default();
        for row in table.rows() {
            let order_id = normalize(row.get_at(order_idx));
            if order_id.is_empty() {
                continue;
            }
            let status = normalize(row.get_at(status_idx));
            if config.allowed_statuses.iter().any(|allowed| *allowed == status) {
                index
                    .eligible
                    .entry(order_id.clone())
                    .or_default()
                    .push(PendingOrder {
                        order_id,
                        operational_status: status,
                    });
            } else {
                *index.ineligible.entry(order_id).or_default() += 1;
            }
        }

        debug!(
            "Pending orders: {} eligible ids, {} ids with other statuses",
            index.eligible.len(),
            index.ineligible.len()
        );
        Ok(index)
    }

    pub fn matches(&self, order_id: &str) -> &[PendingOrder] {
        self.eligible
            .get(order_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_ineligible(&self, order_id: &str) -> bool {
        self.ineligible.contains_key(order_id)
    }
}

/// Records kept by the join plus why the others were dropped
#[derive(Debug, Default)]
pub struct JoinOutcome {
    pub records: Vec<Record>,
    /// No row with that order id at all
    pub unmatched: usize,
    /// Order id present, but only with statuses outside the allow-list
    pub status_rejected: usize,
}

/// Inner join on normalized order id; input order is preserved
pub fn join_pending_orders(records: Vec<Record>, index: &PendingOrderIndex) -> JoinOutcome {
    let mut outcome = JoinOutcome::default();

    for record in records {
        let matches = index.matches(&record.order_id);
        match matches {
            [] if index.has_ineligible(&record.order_id) => outcome.status_rejected += 1,
            [] => outcome.unmatched += 1,
            [single] => outcome.records.push(Record {
                operational_status: Some(single.operational_status.clone()),
                ..record
            }),
            many => {
                for pending in many {
                    outcome.records.push(Record {
                        operational_status: Some(pending.operational_status.clone()),
                        ..record.clone()
                    });
                }
            }
        }
    }

    outcome
}
