//! Severity tiering over a linearly ordered metric
//!
//! Every tier table has the same shape: an on-time limit, a warning limit,
//! everything beyond is late, and a missing metric is Unknown. Limits carry
//! their own inclusivity: the stage durations use `<=` on both limits, while
//! the invoice gap (`< 3h`, `< 6h`) and the delay count (`< 1` on time, `= 1`
//! warning) are strict at the on-time end.

use crate::constants::thresholds as defaults;
use crate::models::{Metric, MetricKind, Record, Severity, Stage};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Upper bound of a tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub value: f64,
    /// Whether a metric equal to `value` still belongs to the tier
    pub inclusive: bool,
}

impl Limit {
    pub fn at_most(value: f64) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    pub fn below(value: f64) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }

    pub fn admits(&self, metric: f64) -> bool {
        if self.inclusive {
            metric <= self.value
        } else {
            metric < self.value
        }
    }
}

/// On-time and warning limits for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub on_time: Limit,
    pub warning: Limit,
}

impl TierThresholds {
    /// Duration thresholds in seconds, both limits inclusive
    pub fn seconds(on_time: f64, warning: f64) -> Self {
        Self {
            on_time: Limit::at_most(on_time),
            warning: Limit::at_most(warning),
        }
    }

    pub fn fulfillment() -> Self {
        Self::seconds(
            defaults::FULFILLMENT_ON_TIME_SECS,
            defaults::FULFILLMENT_WARNING_SECS,
        )
    }

    pub fn shipping() -> Self {
        Self::seconds(
            defaults::SHIPPING_ON_TIME_SECS,
            defaults::SHIPPING_WARNING_SECS,
        )
    }

    /// Invoice gap: on time below 3h, late from 6h
    pub fn invoicing() -> Self {
        Self {
            on_time: Limit::below(defaults::INVOICING_ON_TIME_SECS),
            warning: Limit::below(defaults::INVOICING_WARNING_SECS),
        }
    }

    pub fn delay() -> Self {
        Self {
            on_time: Limit::below(defaults::DELAY_ON_TIME_BELOW),
            warning: Limit::at_most(defaults::DELAY_WARNING_MAX),
        }
    }

    /// Warning band must not end before the on-time band
    pub fn is_ordered(&self) -> bool {
        self.on_time.value <= self.warning.value
            && self.on_time.value.is_finite()
            && self.warning.value.is_finite()
    }
}

/// Map a metric to its tier; `None` and non-finite values are Unknown, never zero delay
pub fn tier(metric: Option<f64>, thresholds: &TierThresholds) -> Severity {
    match metric {
        Some(value) if value.is_finite() => {
            if thresholds.on_time.admits(value) {
                Severity::OnTime
            } else if thresholds.warning.admits(value) {
                Severity::Warning
            } else {
                Severity::Late
            }
        }
        _ => Severity::Unknown,
    }
}

/// One tier table per metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub fulfillment: TierThresholds,
    pub shipping: TierThresholds,
    pub invoicing: TierThresholds,
    pub delay: TierThresholds,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            fulfillment: TierThresholds::fulfillment(),
            shipping: TierThresholds::shipping(),
            invoicing: TierThresholds::invoicing(),
            delay: TierThresholds::delay(),
        }
    }
}

impl ThresholdConfig {
    pub fn for_metric(&self, kind: MetricKind) -> &TierThresholds {
        match kind {
            MetricKind::FulfillmentDuration => &self.fulfillment,
            MetricKind::ShippingDuration => &self.shipping,
            MetricKind::InvoiceGap => &self.invoicing,
            MetricKind::DelayCount => &self.delay,
        }
    }
}

/// What a view tiers its records by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBasis {
    /// The metric belonging to each record's own stage
    #[default]
    StageMetric,
    /// The unitless delay column, whatever the stage
    DelayCount,
}

/// Metric kind that drives the tier of a record in `stage`
pub fn stage_metric_kind(stage: Stage) -> MetricKind {
    match stage {
        Stage::Fulfillment => MetricKind::FulfillmentDuration,
        Stage::Shipping => MetricKind::ShippingDuration,
        Stage::Invoicing | Stage::Done => MetricKind::InvoiceGap,
    }
}

/// Read a metric off an already-typed record
pub fn metric_value(record: &Record, kind: MetricKind) -> Option<f64> {
    match kind {
        MetricKind::FulfillmentDuration => record
            .fulfillment_duration
            .as_duration()
            .map(|d| d.num_seconds() as f64),
        MetricKind::ShippingDuration => record
            .shipping_duration
            .as_duration()
            .map(|d| d.num_seconds() as f64),
        MetricKind::InvoiceGap => invoice_gap_seconds(record),
        MetricKind::DelayCount => record.delay.as_number(),
    }
}

/// Seconds from the fulfillment date (midnight) to the invoicing date plus time of day
///
/// A missing time of day counts as midnight. Ranges carry no single day and
/// leave the gap undefined.
pub fn invoice_gap_seconds(record: &Record) -> Option<f64> {
    let invoiced_on = record.invoicing_date.as_date()?.single()?;
    let fulfilled_on = record.fulfillment_date.as_date()?.single()?;

    let invoiced_at = invoiced_on
        .and_time(NaiveTime::MIN)
        .checked_add_signed(record.invoicing_time.as_duration().unwrap_or_default())?;
    let fulfilled_at = fulfilled_on.and_time(NaiveTime::MIN);

    Some((invoiced_at - fulfilled_at).num_seconds() as f64)
}

/// Tier a record for the given stage and basis
pub fn classify_severity(
    record: &Record,
    stage: Stage,
    basis: SeverityBasis,
    thresholds: &ThresholdConfig,
) -> (Severity, Option<Metric>) {
    let kind = match basis {
        SeverityBasis::StageMetric => stage_metric_kind(stage),
        SeverityBasis::DelayCount => MetricKind::DelayCount,
    };
    let value = metric_value(record, kind);
    let severity = tier(value, thresholds.for_metric(kind));
    (severity, value.map(|value| Metric { kind, value }))
}
