//! Stage-appropriate completeness filters and view definitions
//!
//! Each dashboard view keeps only the records whose milestones have not
//! happened yet. A filter is a logical AND over independent "not yet"
//! predicates on already-typed fields; an absent cell counts as "not yet".

use crate::classify::severity::SeverityBasis;
use crate::models::{Record, View};
use serde::{Deserialize, Serialize};

/// Which records a view keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletenessFilter {
    /// Not invoiced, no invoicing date, no delivery date, fulfillment not dated
    PendingFulfillment,
    /// No valid delivery date and a service time recorded
    PendingShipping,
    /// Not invoiced, no valid invoicing date, no delivery date
    PendingInvoicing,
    /// Keep everything
    Unfiltered,
}

impl CompletenessFilter {
    pub fn keeps(&self, record: &Record) -> bool {
        let not_invoiced = record.invoice_number.is_none();
        match self {
            CompletenessFilter::PendingFulfillment => {
                not_invoiced
                    && !record.invoicing_date.is_valid_date()
                    && record.delivery_date.is_absent()
                    && !record.fulfillment_date.is_valid_date()
            }
            CompletenessFilter::PendingShipping => {
                !record.delivery_date.is_valid_date() && record.service_time.is_present()
            }
            CompletenessFilter::PendingInvoicing => {
                not_invoiced
                    && !record.invoicing_date.is_valid_date()
                    && record.delivery_date.is_absent()
            }
            CompletenessFilter::Unfiltered => true,
        }
    }
}

/// How one dashboard view selects and tiers its records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDefinition {
    pub filter: CompletenessFilter,
    /// Inner-join against the pending-orders table before filtering
    pub join_pending_orders: bool,
    pub severity_basis: SeverityBasis,
}

/// Definition of every view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewCatalog {
    pub fulfillment: ViewDefinition,
    pub shipping: ViewDefinition,
    pub invoicing: ViewDefinition,
    pub all: ViewDefinition,
}

impl Default for ViewCatalog {
    fn default() -> Self {
        Self {
            fulfillment: ViewDefinition {
                filter: CompletenessFilter::PendingFulfillment,
                join_pending_orders: false,
                severity_basis: SeverityBasis::StageMetric,
            },
            shipping: ViewDefinition {
                filter: CompletenessFilter::PendingShipping,
                join_pending_orders: false,
                severity_basis: SeverityBasis::DelayCount,
            },
            invoicing: ViewDefinition {
                filter: CompletenessFilter::PendingInvoicing,
                join_pending_orders: true,
                severity_basis: SeverityBasis::StageMetric,
            },
            all: ViewDefinition {
                filter: CompletenessFilter::Unfiltered,
                join_pending_orders: true,
                severity_basis: SeverityBasis::StageMetric,
            },
        }
    }
}

impl ViewCatalog {
    pub fn get(&self, view: View) -> &ViewDefinition {
        match view {
            View::Fulfillment => &self.fulfillment,
            View::Shipping => &self.shipping,
            View::Invoicing => &self.invoicing,
            View::All => &self.all,
        }
    }
}
