//! Stage inference from which milestones a record has reached.
//!
//! Canonical four-stage model, evaluated first match wins:
//!
//! 1. invoicing date valid: `Done` when the delivery date is valid too,
//!    otherwise `Invoicing`
//! 2. delivery date valid: `Shipping` (shipped, not yet invoiced)
//! 3. fulfillment duration parseable and fulfillment date valid: `Shipping`
//! 4. anything else: `Fulfillment`
//!
//! The stage is recomputed from the typed fields on every pass and never stored.

use crate::models::{Record, Stage};

pub fn classify_stage(record: &Record) -> Stage {
    let invoiced = record.invoicing_date.is_valid_date();
    let delivered = record.delivery_date.is_valid_date();

    if invoiced {
        if delivered { Stage::Done } else { Stage::Invoicing }
    } else if delivered {
        Stage::Shipping
    } else if record.fulfillment_duration.as_duration().is_some()
        && record.fulfillment_date.is_valid_date()
    {
        Stage::Shipping
    } else {
        Stage::Fulfillment
    }
}
